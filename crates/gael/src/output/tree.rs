//! Category tree rendering for `gael stats` output.

use std::io::{self, Write};

use super::color::{bold, dimmed, info};
use super::{OutputConfig, OutputMode, print_json};
use crate::stats::CatalogStats;

/// Print catalog statistics with the per-document category tree.
///
/// Renders like:
/// ```text
/// 02 Boot (4)
/// ├── Loaders (3)
/// │   └── Extras (2)
/// └── Firmware (1)
/// ```
pub fn print_category_tree(stats: &CatalogStats, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(stats),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_category_tree(&mut handle, stats, &OutputConfig::from_env())
        }
    }
}

pub(crate) fn write_category_tree<W: Write>(
    w: &mut W,
    stats: &CatalogStats,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold("Catalog Statistics", config))?;
    writeln!(w, "==================")?;
    writeln!(w)?;
    writeln!(w, "Documents:     {}", stats.documents)?;
    writeln!(w, "Sections:      {}", stats.sections)?;
    writeln!(w, "Subsections:   {}", stats.subsections)?;
    writeln!(w, "Entries:       {}", stats.entries)?;
    writeln!(w, "With upstream: {}", stats.with_upstream)?;

    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    for document in &stats.tree {
        writeln!(w)?;
        writeln!(
            w,
            "{} {} {}",
            info(&format!("{:02}", document.doc_number), config),
            bold(&document.title, config),
            dimmed(&format!("({})", document.entry_count), config)
        )?;

        for (i, section) in document.sections.iter().enumerate() {
            let last_section = i + 1 == document.sections.len();
            let connector = if last_section { corner } else { branch };
            writeln!(
                w,
                "{}{} {}",
                dimmed(connector, config),
                section.name,
                dimmed(&format!("({})", section.entry_count), config)
            )?;

            let prefix = if last_section { space } else { pipe };
            for (j, subsection) in section.subsections.iter().enumerate() {
                let connector = if j + 1 == section.subsections.len() {
                    corner
                } else {
                    branch
                };
                writeln!(
                    w,
                    "{}{}{} {}",
                    dimmed(prefix, config),
                    dimmed(connector, config),
                    subsection.name,
                    dimmed(&format!("({})", subsection.entry_count), config)
                )?;
            }
        }
    }

    Ok(())
}
