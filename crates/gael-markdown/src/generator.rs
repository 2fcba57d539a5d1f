//! Canonical markdown output.
//!
//! Generation is the inverse of parsing for every dialect: whatever the
//! source looked like, the output uses `### Name → `fork`` headers and
//! `- **Label**: value` field lines, which the parser reads back into the
//! same records.

use crate::fields::EntryField;
use crate::parser::patterns;
use crate::records::{DocumentData, EntryRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RE_BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

/// One generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Filename recorded on the document row.
    pub filename: String,
    /// Canonical markdown text.
    pub content: String,
}

/// Render one document in canonical form.
#[must_use]
pub fn generate_document(data: &DocumentData) -> String {
    let mut lines: Vec<String> = Vec::new();
    let document = &data.document;

    lines.push(format!("# {:02} — {}", document.doc_number, document.title));
    lines.push(String::new());
    if let Some(description) = document.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_string());
        lines.push(String::new());
    }

    for section in &data.sections {
        lines.push(format!("## {}", section.section.name));
        lines.push(String::new());
        for entry in &section.entries {
            render_entry(&mut lines, entry);
            lines.push(String::new());
        }
        for subsection in &section.subsections {
            lines.push(format!("### {}", subsection.subsection.name));
            lines.push(String::new());
            for entry in &subsection.entries {
                render_entry(&mut lines, entry);
                lines.push(String::new());
            }
        }
    }

    let text = lines.join("\n");
    let mut text = RE_BLANK_RUN.replace_all(&text, "\n\n").trim_end().to_string();
    text.push('\n');
    text
}

/// Render every document, ordered by document number.
#[must_use]
pub fn generate_all(documents: &[DocumentData]) -> Vec<GeneratedFile> {
    let mut ordered: Vec<&DocumentData> = documents.iter().collect();
    ordered.sort_by_key(|data| data.document.doc_number);
    ordered
        .into_iter()
        .map(|data| GeneratedFile {
            filename: data.document.filename.clone(),
            content: generate_document(data),
        })
        .collect()
}

fn render_entry(lines: &mut Vec<String>, entry: &EntryRecord) {
    let mut header = format!("### {} → `{}`", entry.display_name, entry.fork_name);
    if let Some(upstream) = entry
        .upstream_url
        .as_deref()
        .filter(|upstream| !upstream.is_empty() && *upstream != entry.fork_name)
    {
        header.push_str(&format!(" (fork of `{upstream}`)"));
    }
    lines.push(header);

    if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
        // Only the line right under the header reads back as a cross-reference.
        if patterns::is_cross_reference(description)
            && !is_cross_reference_entry(entry, description)
        {
            lines.push(String::new());
        }
        lines.push(description.to_string());
    }

    for field in EntryField::GENERATION_ORDER {
        if let Some(value) = entry.fields.get(field).filter(|v| !v.trim().is_empty()) {
            render_field(lines, field.label(), value, Some(field));
        }
    }

    for (key, value) in entry.extra_fields.iter() {
        if !value.trim().is_empty() {
            render_field(lines, &capitalize(key), value, None);
        }
    }
}

fn is_cross_reference_entry(entry: &EntryRecord, description: &str) -> bool {
    entry
        .fields
        .note
        .as_deref()
        .and_then(|note| note.strip_prefix("Cross-reference: "))
        .is_some_and(|reference| reference == description)
}

fn render_field(lines: &mut Vec<String>, label: &str, value: &str, field: Option<EntryField>) {
    let is_command = field.is_some_and(EntryField::is_command);

    if !value.contains('\n') {
        let value = if is_command && !value.starts_with('`') && !value.starts_with("http") {
            format!("`{value}`")
        } else {
            value.to_string()
        };
        lines.push(format!("- **{label}**: {value}"));
        return;
    }

    lines.push(format!("- **{label}**:"));
    if field == Some(EntryField::Learn) {
        lines.extend(
            value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("  {line}")),
        );
        return;
    }

    lines.push(if is_command { "  ```bash" } else { "  ```" }.to_string());
    lines.extend(value.lines().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("  {line}")
        }
    }));
    lines.push("  ```".to_string());
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
