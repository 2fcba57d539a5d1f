//! Implementation of the `check` command.
//!
//! A document is stable when generating it and parsing the result gives
//! back the tree the source parsed to. Bare commands gain backticks on the
//! first generation, so command values are compared with one surrounding
//! pair of backticks removed.
//!
//! The generated text must also be a fixed point: generating from it
//! again produces the same bytes.

use gael_markdown::{
    DocumentData, EntryField, ParsedDocument, ParsedEntry, SourceFile, generate_document,
    parse_document_with_warnings,
};
use serde::Serialize;

/// Result for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCheck {
    /// Source filename.
    pub filename: String,
    /// Number from the header, 0 if none.
    pub doc_number: u32,
    /// Entries parsed from the source.
    pub entries: usize,
    /// Differences between the source tree and the regenerated tree.
    pub problems: Vec<String>,
    /// Parser soft skips on the source.
    pub warnings: Vec<String>,
}

impl FileCheck {
    /// Returns `true` if the document round-trips.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Results for a batch of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// One result per document, in input order.
    pub files: Vec<FileCheck>,
}

impl CheckReport {
    /// Returns `true` if every document round-trips.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.files.iter().all(FileCheck::is_stable)
    }

    /// Documents that do not round-trip.
    pub fn unstable(&self) -> impl Iterator<Item = &FileCheck> {
        self.files.iter().filter(|f| !f.is_stable())
    }
}

/// Check every file.
#[must_use]
pub fn check_files(files: &[SourceFile]) -> CheckReport {
    CheckReport {
        files: files.iter().map(check_file).collect(),
    }
}

/// Check one file.
#[must_use]
pub fn check_file(file: &SourceFile) -> FileCheck {
    let report = parse_document_with_warnings(&file.content, &file.filename);
    let source = report.document;

    let canonical = generate_document(&DocumentData::from(&source));
    let reparsed = parse_document_with_warnings(&canonical, &file.filename).document;

    let mut problems = tree_differences(&normalized(&source), &normalized(&reparsed));
    if problems.is_empty() && generate_document(&DocumentData::from(&reparsed)) != canonical {
        problems.push("generated text is not a fixed point".to_string());
    }

    if !problems.is_empty() {
        tracing::debug!(filename = %file.filename, problems = problems.len(), "unstable document");
    }

    FileCheck {
        filename: file.filename.clone(),
        doc_number: source.doc_number,
        entries: source.entry_count(),
        problems,
        warnings: report.warnings.iter().map(ToString::to_string).collect(),
    }
}

fn normalized(document: &ParsedDocument) -> ParsedDocument {
    let mut document = document.clone();
    for section in &mut document.sections {
        section.entries.iter_mut().for_each(unwrap_commands);
        for subsection in &mut section.subsections {
            subsection.entries.iter_mut().for_each(unwrap_commands);
        }
    }
    document
}

fn unwrap_commands(entry: &mut ParsedEntry) {
    for field in EntryField::ALL.into_iter().filter(|f| f.is_command()) {
        let Some(inner) = entry
            .fields
            .get(field)
            .and_then(|v| v.strip_prefix('`'))
            .and_then(|v| v.strip_suffix('`'))
            .filter(|v| !v.is_empty() && !v.contains('\n'))
            .map(str::to_string)
        else {
            continue;
        };
        entry.fields.set(field, inner);
    }
}

fn tree_differences(source: &ParsedDocument, reparsed: &ParsedDocument) -> Vec<String> {
    let mut problems = Vec::new();

    if source.doc_number != reparsed.doc_number || source.title != reparsed.title {
        problems.push("header changed".to_string());
    }
    if source.description != reparsed.description {
        problems.push("document description changed".to_string());
    }
    if source.sections.len() != reparsed.sections.len() {
        problems.push(format!(
            "section count changed from {} to {}",
            source.sections.len(),
            reparsed.sections.len()
        ));
        return problems;
    }

    for (before, after) in source.sections.iter().zip(&reparsed.sections) {
        if before.name != after.name {
            problems.push(format!("section `{}` renamed to `{}`", before.name, after.name));
            continue;
        }
        compare_entries(&before.name, &before.entries, &after.entries, &mut problems);

        if before.subsections.len() != after.subsections.len() {
            problems.push(format!(
                "section `{}`: subsection count changed from {} to {}",
                before.name,
                before.subsections.len(),
                after.subsections.len()
            ));
            continue;
        }
        for (sub_before, sub_after) in before.subsections.iter().zip(&after.subsections) {
            let location = format!("{} / {}", before.name, sub_before.name);
            if sub_before.name != sub_after.name {
                problems.push(format!("subsection `{location}` renamed to `{}`", sub_after.name));
                continue;
            }
            compare_entries(&location, &sub_before.entries, &sub_after.entries, &mut problems);
        }
    }

    problems
}

fn compare_entries(
    location: &str,
    before: &[ParsedEntry],
    after: &[ParsedEntry],
    problems: &mut Vec<String>,
) {
    if before.len() != after.len() {
        problems.push(format!(
            "`{location}`: entry count changed from {} to {}",
            before.len(),
            after.len()
        ));
        return;
    }
    for (entry, regenerated) in before.iter().zip(after) {
        if entry != regenerated {
            problems.push(format!("`{location}`: entry `{}` changed", entry.fork_name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_document_is_stable() {
        let file = SourceFile::new(
            "01-boot.md",
            indoc! {"
                # 01 — Boot

                ## Loaders

                ### GRUB → `grub`
                Bootloader.
                - **Build**: `make`
            "},
        );
        let check = check_file(&file);
        assert!(check.is_stable(), "{:?}", check.problems);
        assert_eq!(check.entries, 1);
    }

    #[test]
    fn bare_commands_and_dialects_are_stable() {
        let file = SourceFile::new(
            "02-mixed.md",
            indoc! {"
                # 02 — Mixed

                ## Boards

                ### **QMK** → `qmk-fork` (fork of `qmk`)
                Keyboard firmware.
                - **Build**: make planck:default

                | Fork | Purpose |
                |------|---------|
                | `zmk` | Wireless firmware |

                ## Lists

                - `ripgrep` — fast grep
            "},
        );
        let check = check_file(&file);
        assert!(check.is_stable(), "{:?}", check.problems);
        assert_eq!(check.entries, 3);
    }

    #[test]
    fn headerless_file_reports_warning() {
        let check = check_file(&SourceFile::new("03-empty.md", "no header here\n"));
        assert!(check.is_stable());
        assert_eq!(check.warnings.len(), 1);
    }

    #[test]
    fn unwrap_commands_strips_one_pair() {
        let mut entry = ParsedEntry::new("x", "x");
        entry.fields.set(EntryField::Build, "`make`");
        entry.fields.set(EntryField::Note, "`kept`");
        unwrap_commands(&mut entry);
        assert_eq!(entry.fields.build_cmd.as_deref(), Some("make"));
        assert_eq!(entry.fields.note.as_deref(), Some("`kept`"));
    }

    #[test]
    fn differences_name_the_entry() {
        let before = gael_markdown::parse_document(
            "# 01 — A\n\n## S\n\n- `one` — first\n",
            "01-a.md",
        );
        let mut after = before.clone();
        after.sections[0].entries[0].description = "changed".to_string();

        let problems = tree_differences(&before, &after);
        assert_eq!(problems, vec!["`S`: entry `one` changed".to_string()]);
    }

    #[test]
    fn report_collects_unstable_files() {
        let report = CheckReport {
            files: vec![
                FileCheck {
                    filename: "01-a.md".to_string(),
                    doc_number: 1,
                    entries: 0,
                    problems: vec![],
                    warnings: vec![],
                },
                FileCheck {
                    filename: "02-b.md".to_string(),
                    doc_number: 2,
                    entries: 0,
                    problems: vec!["header changed".to_string()],
                    warnings: vec![],
                },
            ],
        };
        assert!(!report.is_stable());
        let names: Vec<_> = report.unstable().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["02-b.md"]);
    }
}
