use crate::anchoring::LineLookup;
use crate::models::SelectionBoundary;

/// Line-addressable view of a source file as it is rendered for review.
///
/// Lines are 1-based. A trailing newline does not produce an extra empty line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    lines: Vec<String>,
}

impl SourceDocument {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Rendered text of a 1-based line
    pub fn line(&self, line_number: usize) -> Option<&str> {
        line_number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index + 1, line.as_str()))
    }

    /// Join the lines back into text, one newline per line
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }

    /// Text of lines `start..=end` joined by newlines, as a user would select it
    pub fn slice_lines(&self, start: usize, end: usize) -> String {
        (start..=end)
            .filter_map(|n| self.line(n))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl LineLookup for SourceDocument {
    type Boundary = SelectionBoundary;

    fn enclosing_line(&self, boundary: &SelectionBoundary) -> Option<usize> {
        self.line(boundary.line_index).map(|_| boundary.line_index)
    }

    fn char_offset(&self, boundary: &SelectionBoundary) -> usize {
        let line_chars = self
            .line(boundary.line_index)
            .map(|line| line.chars().count())
            .unwrap_or(0);
        boundary.char_offset.min(line_chars)
    }
}
