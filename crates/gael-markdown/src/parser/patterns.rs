//! Line classifiers.
//!
//! Every decision the scanner makes about a single line goes through one of
//! these functions, so the grammar lives in one place.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_DOC_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(\d+)\s*[—–-]\s*(.+)$").expect("doc header regex"));

static RE_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+(.+)$").expect("section regex"));

static RE_SUBSECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+(.+)$").expect("subsection regex"));

static RE_ENTRY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+(.+?)\s*→\s*`([^`]*)`").expect("entry header regex"));

static RE_ENTRY_HEADER_BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^###?\s*\*\*(.+?)\*\*\s*→\s*`([^`]*)`").expect("bold entry header regex")
});

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###?\s+").expect("heading regex"));

static RE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+\*\*(\w[\w\s]*?)\*\*:\s*(.*)$").expect("field regex"));

static RE_FORK_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(fork of\s+`([^`]+)`\)").expect("fork-of regex"));

static RE_FORK_OF_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(fork of\s+`[^`]+`\)\s*").expect("fork-of strip regex"));

static RE_TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|(.+)\|$").expect("table row regex"));

static RE_TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[\s\-:|]+\|$").expect("table separator regex"));

static RE_CROSS_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^See\s+\[").expect("cross-reference regex"));

static RE_BACKTICKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("backtick regex"));

static RE_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+`([^`]+)`").expect("bullet regex"));

static RE_BULLET_SEPARATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s+`([^`]+)`\s*[—→–-]\s*(.+)$").expect("separated bullet regex")
});

static RE_BOLD_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s+\*\*(.+?)\*\*\s*→\s*`([^`]*)`").expect("bold bullet regex")
});

// -- Headings -----------------------------------------------------------------

/// `# 01 — Title` → `(1, "Title")`. Zero and overflowing numbers are rejected.
pub(crate) fn doc_header(line: &str) -> Option<(u32, &str)> {
    let caps = RE_DOC_HEADER.captures(line.trim_end())?;
    let number: u32 = caps.get(1)?.as_str().parse().ok()?;
    if number == 0 {
        return None;
    }
    Some((number, caps.get(2)?.as_str().trim()))
}

/// `## Name` → `"Name"`.
pub(crate) fn section_heading(line: &str) -> Option<&str> {
    RE_SECTION
        .captures(line.trim_end())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Any `##` or `###` heading.
pub(crate) fn is_heading(line: &str) -> bool {
    RE_HEADING.is_match(line)
}

/// Entry header → `(display name, fork identifier)`. The bold spelling wins.
pub(crate) fn entry_header(line: &str) -> Option<(&str, &str)> {
    let caps = RE_ENTRY_HEADER_BOLD
        .captures(line)
        .or_else(|| RE_ENTRY_HEADER.captures(line))?;
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
}

pub(crate) fn is_entry_header(line: &str) -> bool {
    RE_ENTRY_HEADER_BOLD.is_match(line) || RE_ENTRY_HEADER.is_match(line)
}

/// `### Name` without an arrow.
pub(crate) fn subsection_heading(line: &str) -> Option<&str> {
    if line.contains('→') {
        return None;
    }
    RE_SUBSECTION
        .captures(line.trim_end())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub(crate) fn is_subsection_heading(line: &str) -> bool {
    subsection_heading(line).is_some()
}

// -- Entry bodies -------------------------------------------------------------

/// `- **Key**: value` → `("Key", "value")`.
pub(crate) fn field_line(line: &str) -> Option<(&str, &str)> {
    let caps = RE_FIELD.captures(line.trim_end())?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().trim()))
}

pub(crate) fn is_field_line(line: &str) -> bool {
    RE_FIELD.is_match(line.trim_end())
}

/// Indented by at least two whitespace characters and not blank.
pub(crate) fn is_continuation(line: &str) -> bool {
    let mut chars = line.chars();
    matches!((chars.next(), chars.next()), (Some(a), Some(b)) if a.is_whitespace() && b.is_whitespace())
        && !line.trim().is_empty()
}

/// A ```` ``` ```` line, at any indentation.
pub(crate) fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Count of leading whitespace characters.
pub(crate) fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Trimmed line starts a `See [...]` cross-reference.
pub(crate) fn is_cross_reference(line: &str) -> bool {
    RE_CROSS_REF.is_match(line.trim())
}

/// Target of the first `(fork of `X`)` annotation.
pub(crate) fn fork_of(text: &str) -> Option<&str> {
    RE_FORK_OF
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|upstream| !upstream.is_empty())
}

/// Remove every `(fork of `X`)` annotation and trim.
pub(crate) fn strip_fork_of(text: &str) -> String {
    RE_FORK_OF_STRIP.replace_all(text, "").trim().to_string()
}

/// First backticked token in `text`.
pub(crate) fn backticked(text: &str) -> Option<&str> {
    RE_BACKTICKED
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// -- Tables -------------------------------------------------------------------

pub(crate) fn is_table_row(line: &str) -> bool {
    RE_TABLE_ROW.is_match(line.trim_end())
}

pub(crate) fn is_table_separator(line: &str) -> bool {
    RE_TABLE_SEPARATOR.is_match(line.trim_end())
}

/// A pipe row that can open a table (separators cannot).
pub(crate) fn is_table_start(line: &str) -> bool {
    is_table_row(line) && !is_table_separator(line)
}

/// Split a pipe row into trimmed cells, dropping only the two edge cells.
pub(crate) fn table_cells(line: &str) -> Vec<&str> {
    let line = line.trim();
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

// -- Bullets ------------------------------------------------------------------

/// `` - `token` — description `` → `("token", "description")`.
///
/// Without a separator the rest of the line is the description, possibly
/// empty. Field lines never match.
pub(crate) fn bullet_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end();
    if is_field_line(line) {
        return None;
    }
    if let Some(caps) = RE_BULLET_SEPARATED.captures(line) {
        return Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().trim()));
    }
    let caps = RE_BULLET.captures(line)?;
    let token = caps.get(1)?;
    Some((token.as_str(), line[caps.get(0)?.end()..].trim()))
}

pub(crate) fn is_bullet_entry(line: &str) -> bool {
    RE_BULLET.is_match(line) && !is_field_line(line)
}

/// `` - **Name** → `fork` `` → `("Name", "fork")`.
pub(crate) fn bold_bullet(line: &str) -> Option<(&str, &str)> {
    let caps = RE_BOLD_BULLET.captures(line)?;
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
}

pub(crate) fn is_bold_bullet(line: &str) -> bool {
    RE_BOLD_BULLET.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# 01 — System Foundation", Some((1, "System Foundation")))]
    #[case("# 7 - Networking", Some((7, "Networking")))]
    #[case("# 12 – Media ", Some((12, "Media")))]
    #[case("# 00 — Zero", None)]
    #[case("# 99999999999 — Overflow", None)]
    #[case("## 01 — Not a header", None)]
    #[case("# Title without number", None)]
    fn doc_headers(#[case] line: &str, #[case] expected: Option<(u32, &str)>) {
        assert_eq!(doc_header(line), expected);
    }

    #[rstest]
    #[case("### Linux → `linux`", Some(("Linux", "linux")))]
    #[case("### **Linux** → `linux`", Some(("Linux", "linux")))]
    #[case("## **Linux** → `linux`", Some(("Linux", "linux")))]
    #[case("### Linux → `owner/linux` (fork of `torvalds/linux`)", Some(("Linux", "owner/linux")))]
    #[case("### Blank → ``", Some(("Blank", "")))]
    #[case("### Plain subsection", None)]
    #[case("#### Linux → `linux`", None)]
    fn entry_headers(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(entry_header(line), expected);
    }

    #[test]
    fn subsections_have_no_arrow() {
        assert_eq!(subsection_heading("### Bootloaders"), Some("Bootloaders"));
        assert_eq!(subsection_heading("### Linux → `linux`"), None);
        assert_eq!(subsection_heading("## Section"), None);
    }

    #[rstest]
    #[case("- **Build**: `make`", Some(("Build", "`make`")))]
    #[case("- **Use case**: home lab", Some(("Use case", "home lab")))]
    #[case("- **Learn**:", Some(("Learn", "")))]
    #[case("- `linux` — kernel", None)]
    #[case("  - **Build**: nested", None)]
    fn field_lines(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(field_line(line), expected);
    }

    #[rstest]
    #[case("- `cpython` — Python interpreter", Some(("cpython", "Python interpreter")))]
    #[case("- `a` → arrow", Some(("a", "arrow")))]
    #[case("- `rust-lang/rust` compiler", Some(("rust-lang/rust", "compiler")))]
    #[case("- `solo`", Some(("solo", "")))]
    #[case("- **Build**: `make`", None)]
    fn bullets(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(bullet_entry(line), expected);
    }

    #[test]
    fn table_rows_and_separators() {
        assert!(is_table_start("| Fork | Purpose |"));
        assert!(is_table_row("|---|:---:|"));
        assert!(is_table_separator("|---|:---:|"));
        assert!(!is_table_start("|---|---|"));
        assert!(!is_table_row("not | a row"));
        assert_eq!(table_cells("| a |  | c |"), vec!["a", "", "c"]);
    }

    #[test]
    fn fork_of_annotations() {
        let text = "A kernel fork. (fork of `torvalds/linux`)";
        assert_eq!(fork_of(text), Some("torvalds/linux"));
        assert_eq!(strip_fork_of(text), "A kernel fork.");
        assert_eq!(fork_of("no annotation"), None);
    }

    #[rstest]
    #[case("  continued", true)]
    #[case("\t\tcontinued", true)]
    #[case(" one space", false)]
    #[case("    ", false)]
    #[case("flush", false)]
    fn continuation_lines(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_continuation(line), expected);
    }

    #[test]
    fn cross_references_are_trimmed_first() {
        assert!(is_cross_reference("  See [02 — Networking](02-networking.md)"));
        assert!(!is_cross_reference("Seen [elsewhere]"));
    }
}
