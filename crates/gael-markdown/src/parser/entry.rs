//! Entries introduced by a `### Name → `fork`` header.

use super::scanner::Scanner;
use super::{Scanned, patterns, settle_upstream};
use crate::fields::{self, FieldTarget};
use crate::model::{EntryFields, ExtraFields, ParsedEntry};
use crate::warning::ParseWarning;

pub(crate) fn scan_entry(scanner: &mut Scanner<'_>) -> Scanned {
    let header_line_number = scanner.line_number();
    let Some(header) = scanner.peek() else {
        return Scanned::Nothing;
    };
    scanner.advance();
    let Some((display_name, fork_name)) = patterns::entry_header(header) else {
        return Scanned::Nothing;
    };
    let declared_upstream = patterns::fork_of(header);

    if let Some(reference) = scanner.peek().filter(|line| patterns::is_cross_reference(line)) {
        scanner.advance();
        if fork_name.is_empty() {
            scanner.warn(ParseWarning::EmptyForkName {
                line_number: header_line_number,
            });
            return Scanned::Nothing;
        }
        let reference = reference.trim();
        let mut entry = ParsedEntry::new(display_name, fork_name);
        entry.description = reference.to_string();
        entry.fields.note = Some(format!("Cross-reference: {reference}"));
        settle_upstream(&mut entry, declared_upstream);
        return Scanned::from(Some(entry));
    }

    let description = scan_description(scanner);
    let mut body = FieldSink::default();
    scan_fields(scanner, &mut body);

    if fork_name.is_empty() {
        scanner.warn(ParseWarning::EmptyForkName {
            line_number: header_line_number,
        });
        return Scanned::Nothing;
    }

    let (fields, extra_fields) = body.finish();
    let mut entry = ParsedEntry {
        display_name: display_name.to_string(),
        fork_name: fork_name.to_string(),
        upstream_url: None,
        description,
        fields,
        extra_fields,
    };
    settle_upstream(&mut entry, declared_upstream);
    Scanned::from(Some(entry))
}

/// Prose between the header and the first field line, table row or heading.
///
/// A fenced block suspends the stop checks until it closes. A fence with no
/// closing partner is treated as an ordinary line.
fn scan_description(scanner: &mut Scanner<'_>) -> String {
    let mut parts = Vec::new();
    let mut in_code = false;
    while let Some(line) = scanner.peek() {
        if patterns::is_fence(line) {
            if in_code || scanner.any_ahead(patterns::is_fence) {
                in_code = !in_code;
            }
            scanner.advance();
            continue;
        }
        if !in_code
            && (patterns::is_heading(line)
                || patterns::is_field_line(line)
                || patterns::is_table_row(line))
        {
            break;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
        scanner.advance();
    }
    parts.join(" ")
}

/// Collects field values while the body is scanned.
#[derive(Debug, Default)]
struct FieldSink {
    fields: EntryFields,
    extra: ExtraFields,
    current: Option<FieldTarget>,
}

impl FieldSink {
    fn set(&mut self, target: FieldTarget, value: &str) {
        match &target {
            FieldTarget::Known(field) => self.fields.set(*field, value),
            FieldTarget::Extra(key) => self.extra.insert(key.clone(), value),
        }
        self.current = Some(target);
    }

    /// Append to the field opened last; joined with `\n` unless it is empty.
    fn append(&mut self, text: &str) {
        let slot = match &self.current {
            Some(FieldTarget::Known(field)) => self.fields.slot_mut(*field).get_or_insert_default(),
            Some(FieldTarget::Extra(key)) => match self.extra.get_mut(key) {
                Some(value) => value,
                None => return,
            },
            None => return,
        };
        if !slot.is_empty() {
            slot.push('\n');
        }
        slot.push_str(text);
    }

    fn finish(mut self) -> (EntryFields, ExtraFields) {
        self.fields.clear_blank();
        self.extra.clear_blank();
        (self.fields, self.extra)
    }
}

/// An open fenced block inside a field.
struct CodeBlock {
    opened_at: usize,
    indent: usize,
    lines: Vec<String>,
}

impl CodeBlock {
    fn open(fence: &str, line_number: usize) -> Self {
        Self {
            opened_at: line_number,
            indent: patterns::indent_width(fence),
            lines: Vec::new(),
        }
    }

    /// Keep the line minus the fence's own indentation.
    fn push(&mut self, line: &str) {
        let strip: usize = line
            .chars()
            .take(self.indent)
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        self.lines.push(line[strip..].trim_end().to_string());
    }

    /// Blank lines before the closing fence are not part of the value.
    fn flush(mut self, sink: &mut FieldSink) {
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        let text = self.lines.join("\n");
        if !text.trim().is_empty() {
            sink.append(&text);
        }
    }
}

/// Field lines, continuations and fenced blocks up to the end of the body.
///
/// A fenced block that reaches a `##`/`###` heading before its closing
/// fence is flushed there as unterminated, so the rest of the document
/// is still parsed.
fn scan_fields(scanner: &mut Scanner<'_>, sink: &mut FieldSink) {
    let mut code: Option<CodeBlock> = None;

    while let Some(line) = scanner.peek() {
        if let Some(block) = code.as_mut() {
            if patterns::is_heading(line) {
                break;
            }
            if patterns::is_fence(line) {
                if let Some(block) = code.take() {
                    block.flush(sink);
                }
            } else {
                block.push(line);
            }
            scanner.advance();
            continue;
        }

        if patterns::is_heading(line) {
            break;
        }

        if line.trim().is_empty() {
            let body_continues = scanner.next_non_blank().is_some_and(|next| {
                patterns::is_field_line(next) || patterns::is_continuation(next)
            });
            if !body_continues && scanner.next_non_blank().is_some() {
                break;
            }
            scanner.advance();
            continue;
        }

        if patterns::is_fence(line) {
            code = Some(CodeBlock::open(line, scanner.line_number()));
            scanner.advance();
            continue;
        }

        if let Some((key, value)) = patterns::field_line(line) {
            sink.set(fields::classify(key), value);
            scanner.advance();
            continue;
        }

        if sink.current.is_some() && patterns::is_continuation(line) {
            sink.append(line.trim());
            scanner.advance();
            continue;
        }

        break;
    }

    if let Some(block) = code {
        scanner.warn(ParseWarning::UnterminatedCodeBlock {
            line_number: block.opened_at,
        });
        block.flush(sink);
    }
}
