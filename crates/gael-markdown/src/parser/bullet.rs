//! Single-line list entries.

use super::scanner::Scanner;
use super::{Scanned, patterns, settle_upstream};
use crate::model::ParsedEntry;

/// `` - `token` — description ``. The token is both display name and fork.
pub(crate) fn scan_bullet(scanner: &mut Scanner<'_>) -> Scanned {
    let Some(line) = scanner.peek() else {
        return Scanned::Nothing;
    };
    scanner.advance();
    let Some((token, description)) = patterns::bullet_entry(line) else {
        return Scanned::Nothing;
    };
    let token = token.trim();
    if token.is_empty() {
        return Scanned::Nothing;
    }

    let mut entry = ParsedEntry::new(token, token);
    entry.description = description.to_string();
    settle_upstream(&mut entry, None);
    Scanned::from(Some(entry))
}

/// `` - **Name** → `fork` `` with an optional indented description below.
pub(crate) fn scan_bold_bullet(scanner: &mut Scanner<'_>) -> Scanned {
    let Some(line) = scanner.peek() else {
        return Scanned::Nothing;
    };
    scanner.advance();
    let Some((display_name, fork_name)) = patterns::bold_bullet(line) else {
        return Scanned::Nothing;
    };

    let description = scanner
        .peek()
        .filter(|next| patterns::is_continuation(next))
        .map(str::trim)
        .unwrap_or_default();
    if !description.is_empty() {
        scanner.advance();
    }

    if fork_name.is_empty() {
        return Scanned::Nothing;
    }
    let mut entry = ParsedEntry::new(display_name, fork_name);
    entry.description = description.to_string();
    settle_upstream(&mut entry, patterns::fork_of(line));
    Scanned::from(Some(entry))
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_document;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn bullet_list_entries() {
        let doc = parse_document(
            indoc! {"
                # 05 — Languages

                ## Interpreters

                - `cpython` — Reference interpreter
                - `pypy` → JIT (fork of `pypy/pypy`)
                - `solo`
                - **Build**: not an entry
            "},
            "05-languages.md",
        );
        let entries = &doc.sections[0].entries;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].display_name, "cpython");
        assert_eq!(entries[0].description, "Reference interpreter");
        assert_eq!(entries[1].description, "JIT");
        assert_eq!(entries[1].upstream_url.as_deref(), Some("pypy/pypy"));
        assert_eq!(entries[2].description, "");
    }

    #[test]
    fn bold_bullet_entries() {
        let doc = parse_document(
            indoc! {"
                # 06 — Tools

                ## Editors

                - **Helix** → `helix`
                  A modal editor.
                - **Kakoune** → `kakoune`
                - `vim` — classic
            "},
            "06-tools.md",
        );
        let entries = &doc.sections[0].entries;
        let names: Vec<_> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Helix", "Kakoune", "vim"]);
        assert_eq!(entries[0].fork_name, "helix");
        assert_eq!(entries[0].description, "A modal editor.");
        assert_eq!(entries[1].description, "");
    }
}
