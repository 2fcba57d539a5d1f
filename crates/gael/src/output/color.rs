//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:   green   (stable documents, written files)
//!   - Warning:   yellow  (parser soft skips, skipped files)
//!   - Error:     red     (unstable documents)
//!   - Info:      cyan    (document numbers, paths)
//!   - Muted:     dimmed  (tree connectors, counts)
//!   - Emphasis:  bold    (headings, document titles)

use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply dimmed style to text.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Status mark for a checked document, with ASCII fallback.
pub(crate) fn status_icon(stable: bool, config: &OutputConfig) -> String {
    let icon = match (stable, config.use_ascii) {
        (true, true) => "+",
        (true, false) => "✓",
        (false, true) => "x",
        (false, false) => "✗",
    };
    if stable {
        success(icon, config)
    } else {
        error(icon, config)
    }
}
