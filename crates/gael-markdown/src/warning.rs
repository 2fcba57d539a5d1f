//! Soft-skip diagnostics.
//!
//! The parser never fails. When it has to drop something it records a
//! [`ParseWarning`] instead so callers can surface it.

use serde::{Deserialize, Serialize};

/// Something the parser skipped or repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// No `# NN — Title` line was found; the document is empty.
    #[error("no `# NN — Title` header found")]
    MissingHeader,

    /// An entry header had a blank fork identifier and was skipped.
    #[error("line {line_number}: entry header has an empty fork identifier")]
    EmptyForkName {
        /// 1-based line of the header.
        line_number: usize,
    },

    /// A table row had fewer than two non-empty cells and was skipped.
    #[error("line {line_number}: table row has fewer than two non-empty cells")]
    ShortTableRow {
        /// 1-based line of the row.
        line_number: usize,
    },

    /// A subsection heading was followed by no entries and was dropped.
    #[error("line {line_number}: subsection `{name}` contains no entries")]
    EmptySubsection {
        /// 1-based line of the heading.
        line_number: usize,
        /// Heading text.
        name: String,
    },

    /// A fenced code block was still open at end of input.
    #[error("line {line_number}: code block is never closed")]
    UnterminatedCodeBlock {
        /// 1-based line of the opening fence.
        line_number: usize,
    },
}

impl ParseWarning {
    /// Source line the warning refers to, if any.
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::MissingHeader => None,
            Self::EmptyForkName { line_number }
            | Self::ShortTableRow { line_number }
            | Self::EmptySubsection { line_number, .. }
            | Self::UnterminatedCodeBlock { line_number } => Some(*line_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line_number() {
        let warning = ParseWarning::ShortTableRow { line_number: 12 };
        assert_eq!(
            warning.to_string(),
            "line 12: table row has fewer than two non-empty cells"
        );
        assert_eq!(warning.line_number(), Some(12));
        assert_eq!(ParseWarning::MissingHeader.line_number(), None);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let warning = ParseWarning::EmptySubsection {
            line_number: 3,
            name: "Misc".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "empty_subsection");
        assert_eq!(json["name"], "Misc");
    }
}
