use crate::warning::ParseWarning;

/// Forward-only cursor over the lines of one document.
///
/// Handlers look ahead freely but only ever move the cursor forward, so a
/// full parse is a single pass.
#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    warnings: Vec<ParseWarning>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
            warnings: Vec::new(),
        }
    }

    /// Current line, if any.
    pub(crate) fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Line `offset` positions past the current one.
    #[cfg(test)]
    pub(crate) fn peek_at(&self, offset: usize) -> Option<&'a str> {
        self.lines.get(self.pos + offset).copied()
    }

    /// First non-blank line strictly after the current one.
    pub(crate) fn next_non_blank(&self) -> Option<&'a str> {
        self.lines
            .iter()
            .skip(self.pos + 1)
            .find(|line| !line.trim().is_empty())
            .copied()
    }

    /// Returns `true` if some line after the current one satisfies `pred`.
    pub(crate) fn any_ahead(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.lines.iter().skip(self.pos + 1).any(|line| pred(line))
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.lines.len() {
            self.pos += 1;
        }
    }

    /// 1-based number of the current line.
    pub(crate) fn line_number(&self) -> usize {
        self.pos + 1
    }

    pub(crate) fn warn(&mut self, warning: ParseWarning) {
        tracing::trace!(%warning, "soft skip");
        self.warnings.push(warning);
    }

    pub(crate) fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }
}
