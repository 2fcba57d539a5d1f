//! Markdown tables, one entry per data row.

use super::scanner::Scanner;
use super::{Scanned, patterns, settle_upstream};
use crate::fields::{self, FieldTarget};
use crate::model::{ParsedEntry, TableEntry};
use crate::warning::ParseWarning;

/// Columns that may hold the description, in priority order.
pub const DESCRIPTION_COLUMNS: &[&str] = &[
    "what it does",
    "purpose",
    "description",
    "what",
    "what it is",
    "design",
    "printer",
];

/// Columns that may hold the upstream identifier, in priority order.
pub const UPSTREAM_COLUMNS: &[&str] = &["upstream", "upstream url", "repo"];

pub(crate) fn scan_table(scanner: &mut Scanner<'_>) -> Scanned {
    let Some(header) = scanner.peek() else {
        return Scanned::Nothing;
    };
    scanner.advance();
    let headers: Vec<String> = patterns::table_cells(header)
        .into_iter()
        .map(str::to_lowercase)
        .collect();

    if scanner.peek().is_some_and(patterns::is_table_separator) {
        scanner.advance();
    }

    let mut entries = Vec::new();
    while let Some(row) = scanner.peek().filter(|line| patterns::is_table_row(line)) {
        let line_number = scanner.line_number();
        scanner.advance();
        if patterns::is_table_separator(row) {
            continue;
        }

        let cells = patterns::table_cells(row);
        if cells.iter().filter(|cell| !cell.is_empty()).count() < 2 {
            scanner.warn(ParseWarning::ShortTableRow { line_number });
            continue;
        }

        let row = TableEntry::from_cells(&headers, &cells);
        if row.fork_name.is_empty() {
            scanner.warn(ParseWarning::EmptyForkName { line_number });
            continue;
        }
        entries.push(ParsedEntry::from(row));
    }
    Scanned::Entries(entries)
}

/// Backticked token if present, else the cell without markup.
fn identifier(cell: &str) -> String {
    patterns::backticked(cell).map_or_else(
        || cell.replace(['`', '*'], "").trim().to_string(),
        |token| token.trim().to_string(),
    )
}

impl TableEntry {
    /// Build a row from lower-cased headers and trimmed cells.
    ///
    /// Cells past the last header are ignored; missing cells read as empty.
    pub(crate) fn from_cells(headers: &[String], cells: &[&str]) -> Self {
        let fork_name = cells.first().map(|cell| identifier(cell)).unwrap_or_default();
        let display_name = fork_name
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(&fork_name)
            .to_string();

        let columns: Vec<(String, String)> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cell = cells.get(i).copied().unwrap_or_default();
                (header.clone(), cell.to_string())
            })
            .collect();

        // The first column is the identifier itself, even when it is named `repo`.
        let upstream_url = UPSTREAM_COLUMNS.iter().find_map(|name| {
            columns
                .iter()
                .skip(1)
                .find(|(column, value)| column == name && !value.is_empty())
                .map(|(_, value)| identifier(value))
                .filter(|upstream| !upstream.is_empty())
        });

        Self {
            fork_name,
            display_name,
            upstream_url,
            columns,
        }
    }
}

impl From<TableEntry> for ParsedEntry {
    fn from(row: TableEntry) -> Self {
        let description_column = DESCRIPTION_COLUMNS
            .iter()
            .copied()
            .find(|name| row.column(name).is_some());

        let mut entry = ParsedEntry::new(row.display_name.clone(), row.fork_name.clone());
        entry.description = description_column
            .and_then(|name| row.column(name))
            .unwrap_or_default()
            .to_string();
        entry.upstream_url.clone_from(&row.upstream_url);
        entry.fields.build_cmd = row.column("build").map(str::to_string);
        entry.fields.usage_cmd = row.column("usage").map(str::to_string);

        for (name, value) in row.columns.iter().skip(1) {
            let consumed = Some(name.as_str()) == description_column
                || UPSTREAM_COLUMNS.contains(&name.as_str())
                || name == "build"
                || name == "usage";
            if consumed || value.is_empty() {
                continue;
            }
            let Some(key) = fields::column_key(name) else {
                continue;
            };
            match fields::classify(&key) {
                FieldTarget::Known(field) => {
                    let slot = entry.fields.slot_mut(field);
                    if slot.is_none() {
                        *slot = Some(value.clone());
                    } else {
                        tracing::trace!(column = %name, "attribute already set by another column");
                    }
                }
                FieldTarget::Extra(key) => entry.extra_fields.insert(key, value.clone()),
            }
        }

        settle_upstream(&mut entry, None);
        entry
    }
}
