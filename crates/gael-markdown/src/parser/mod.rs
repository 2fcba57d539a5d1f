//! Markdown catalog parser.
//!
//! A document is read in one forward pass over its lines:
//!
//! 1. the `# NN — Title` header,
//! 2. the free-text description up to the first `##` heading,
//! 3. one pass per `## Section`, where each line is offered to an ordered
//!    table of [`Shape`]s (entry header, subsection heading, table, bullet,
//!    bold bullet) and the first match consumes its lines.
//!
//! Nothing here fails. Malformed fragments are skipped and reported as
//! [`ParseWarning`]s.

mod bullet;
mod entry;
pub(crate) mod patterns;
mod scanner;
mod table;

use crate::model::{ParsedDocument, ParsedEntry, ParsedSection, ParsedSubsection};
use crate::warning::ParseWarning;
use scanner::Scanner;
use serde::{Deserialize, Serialize};

/// A parsed document together with everything that was skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// The normalized tree.
    pub document: ParsedDocument,

    /// Soft skips, in source order.
    #[serde(default)]
    pub warnings: Vec<ParseWarning>,
}

/// Parse one catalog document.
///
/// Never fails. Soft skips are logged at debug level and discarded; use
/// [`parse_document_with_warnings`] to inspect them.
#[must_use]
pub fn parse_document(text: &str, filename: &str) -> ParsedDocument {
    let report = parse_document_with_warnings(text, filename);
    for warning in &report.warnings {
        tracing::debug!(filename, %warning, "skipped while parsing");
    }
    report.document
}

/// Parse one catalog document and keep the soft-skip diagnostics.
#[must_use]
pub fn parse_document_with_warnings(text: &str, filename: &str) -> ParseReport {
    let mut scanner = Scanner::new(text);
    let mut document = ParsedDocument {
        filename: filename.to_string(),
        ..ParsedDocument::default()
    };

    let Some((doc_number, title)) = scan_header(&mut scanner) else {
        scanner.warn(ParseWarning::MissingHeader);
        return ParseReport {
            document,
            warnings: scanner.into_warnings(),
        };
    };
    document.doc_number = doc_number;
    document.title = title.to_string();
    document.description = scan_description(&mut scanner);

    while let Some(line) = scanner.peek() {
        scanner.advance();
        if let Some(name) = patterns::section_heading(line) {
            document.sections.push(scan_section(&mut scanner, name));
        }
    }

    tracing::trace!(
        filename,
        doc_number,
        sections = document.sections.len(),
        entries = document.entry_count(),
        "parsed document"
    );

    ParseReport {
        document,
        warnings: scanner.into_warnings(),
    }
}

fn scan_header<'a>(scanner: &mut Scanner<'a>) -> Option<(u32, &'a str)> {
    while let Some(line) = scanner.peek() {
        scanner.advance();
        if let Some(header) = patterns::doc_header(line) {
            return Some(header);
        }
    }
    None
}

fn scan_description(scanner: &mut Scanner<'_>) -> String {
    let mut parts = Vec::new();
    while let Some(line) = scanner.peek() {
        if patterns::section_heading(line).is_some() {
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

// -- Shape table --------------------------------------------------------------

/// What a shape handler produced from the lines it consumed.
pub(crate) enum Scanned {
    Entries(Vec<ParsedEntry>),
    Subsection(ParsedSubsection),
    Nothing,
}

impl From<Option<ParsedEntry>> for Scanned {
    fn from(entry: Option<ParsedEntry>) -> Self {
        entry.map_or(Self::Nothing, |entry| Self::Entries(vec![entry]))
    }
}

/// A line shape the section scanner recognizes.
///
/// `matches` only inspects the current line. `scan` is called with the
/// cursor on that line and must consume at least it.
struct Shape {
    name: &'static str,
    opens_subsection: bool,
    matches: fn(&str) -> bool,
    scan: fn(&mut Scanner<'_>) -> Scanned,
}

/// Tried in order; the first match wins.
const SHAPES: &[Shape] = &[
    Shape {
        name: "entry header",
        opens_subsection: false,
        matches: patterns::is_entry_header,
        scan: entry::scan_entry,
    },
    Shape {
        name: "subsection",
        opens_subsection: true,
        matches: patterns::is_subsection_heading,
        scan: scan_subsection,
    },
    Shape {
        name: "table",
        opens_subsection: false,
        matches: patterns::is_table_start,
        scan: table::scan_table,
    },
    Shape {
        name: "bullet entry",
        opens_subsection: false,
        matches: patterns::is_bullet_entry,
        scan: bullet::scan_bullet,
    },
    Shape {
        name: "bold bullet entry",
        opens_subsection: false,
        matches: patterns::is_bold_bullet,
        scan: bullet::scan_bold_bullet,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Section,
    Subsection,
}

/// Offer the current line to the shape table. `None` when nothing matched
/// and the caller should skip the line.
fn dispatch(scanner: &mut Scanner<'_>, line: &str, scope: Scope) -> Option<Scanned> {
    let shape = SHAPES
        .iter()
        .filter(|shape| scope == Scope::Section || !shape.opens_subsection)
        .find(|shape| (shape.matches)(line))?;
    tracing::trace!(shape = shape.name, line = scanner.line_number(), "matched");
    Some((shape.scan)(scanner))
}

fn scan_section(scanner: &mut Scanner<'_>, name: &str) -> ParsedSection {
    let mut section = ParsedSection::new(name);
    while let Some(line) = scanner.peek() {
        if patterns::section_heading(line).is_some() {
            break;
        }
        match dispatch(scanner, line, Scope::Section) {
            Some(Scanned::Entries(entries)) => section.entries.extend(entries),
            Some(Scanned::Subsection(subsection)) => section.subsections.push(subsection),
            Some(Scanned::Nothing) => {}
            None => scanner.advance(),
        }
    }
    section
}

fn scan_subsection(scanner: &mut Scanner<'_>) -> Scanned {
    let line_number = scanner.line_number();
    let name = scanner
        .peek()
        .and_then(patterns::subsection_heading)
        .unwrap_or_default();
    scanner.advance();

    let mut subsection = ParsedSubsection::new(name);
    while let Some(line) = scanner.peek() {
        if patterns::section_heading(line).is_some() || patterns::is_subsection_heading(line) {
            break;
        }
        match dispatch(scanner, line, Scope::Subsection) {
            Some(Scanned::Entries(entries)) => subsection.entries.extend(entries),
            Some(Scanned::Subsection(_) | Scanned::Nothing) => {}
            None => scanner.advance(),
        }
    }

    if subsection.entries.is_empty() {
        scanner.warn(ParseWarning::EmptySubsection {
            line_number,
            name: subsection.name,
        });
        return Scanned::Nothing;
    }
    Scanned::Subsection(subsection)
}

/// Move a `(fork of `X`)` annotation out of the description.
///
/// `declared` (from the header line) wins over an upstream already set on
/// the entry, which wins over one found in the description. An upstream
/// equal to the fork identifier carries no information and is dropped.
pub(crate) fn settle_upstream(entry: &mut ParsedEntry, declared: Option<&str>) {
    let upstream = declared
        .map(str::to_string)
        .or_else(|| entry.upstream_url.take())
        .or_else(|| patterns::fork_of(&entry.description).map(str::to_string));
    entry.description = patterns::strip_fork_of(&entry.description);
    entry.upstream_url = upstream.filter(|upstream| *upstream != entry.fork_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_header_yields_empty_document() {
        let report = parse_document_with_warnings("Just prose.\n\n## Section\n", "notes.md");
        assert_eq!(report.document.doc_number, 0);
        assert_eq!(report.document.filename, "notes.md");
        assert!(report.document.sections.is_empty());
        assert_eq!(report.warnings, vec![ParseWarning::MissingHeader]);
    }

    #[test]
    fn header_may_follow_leading_noise() {
        let doc = parse_document("<!-- generated -->\n# 04 — Storage\n", "04-storage.md");
        assert_eq!(doc.doc_number, 4);
        assert_eq!(doc.title, "Storage");
    }

    #[test]
    fn description_is_space_joined() {
        let text = indoc! {"
            # 01 — Foundation

            First line
              second line

            third
            ## Kernels
        "};
        let doc = parse_document(text, "01-foundation.md");
        assert_eq!(doc.description, "First line second line third");
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].entries.is_empty());
    }

    #[test]
    fn empty_subsection_is_dropped_with_warning() {
        let text = indoc! {"
            # 01 — Foundation

            ## Kernels

            ### Nothing here

            Just words.

            ### Real
            - `linux` — kernel
        "};
        let report = parse_document_with_warnings(text, "01.md");
        let section = &report.document.sections[0];
        assert_eq!(section.subsections.len(), 1);
        assert_eq!(section.subsections[0].name, "Real");
        assert_eq!(
            report.warnings,
            vec![ParseWarning::EmptySubsection {
                line_number: 5,
                name: "Nothing here".to_string(),
            }]
        );
    }

    #[test]
    fn subsection_collects_canonical_entry_headers() {
        let text = indoc! {"
            # 02 — Net

            ## Routing

            ### Daemons

            ### BIRD → `bird`
            Routing daemon.

            ### FRR → `frr`
            Another one.

            ## Next
        "};
        let doc = parse_document(text, "02.md");
        let section = &doc.sections[0];
        assert!(section.entries.is_empty());
        assert_eq!(section.subsections.len(), 1);
        let names: Vec<_> = section.subsections[0]
            .entries
            .iter()
            .map(|e| e.fork_name.as_str())
            .collect();
        assert_eq!(names, vec!["bird", "frr"]);
        assert_eq!(doc.sections[1].name, "Next");
    }

    #[test]
    fn settle_upstream_prefers_declared() {
        let mut entry = ParsedEntry::new("Linux", "me/linux");
        entry.description = "Fork. (fork of `other/linux`)".to_string();
        settle_upstream(&mut entry, Some("torvalds/linux"));
        assert_eq!(entry.upstream_url.as_deref(), Some("torvalds/linux"));
        assert_eq!(entry.description, "Fork.");
    }

    #[test]
    fn settle_upstream_drops_self_reference() {
        let mut entry = ParsedEntry::new("Linux", "torvalds/linux");
        settle_upstream(&mut entry, Some("torvalds/linux"));
        assert_eq!(entry.upstream_url, None);
    }
}
