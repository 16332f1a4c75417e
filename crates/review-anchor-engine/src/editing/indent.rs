//! Tab / Shift-Tab over a text buffer.
//!
//! Edits are planned as a list of [`TextEdit`]s against the original buffer,
//! compiled into one xi-rope [`Delta`], and the selection is carried through
//! the same edit list so it keeps covering the same content.

use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

const SPACES: &str = "        ";

/// Indentation style detected in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Tab,
    /// Number of spaces per indent level, between 2 and 8
    Spaces(usize),
}

impl IndentStyle {
    pub const MIN_WIDTH: usize = 2;
    pub const MAX_WIDTH: usize = 8;

    /// Space style with the width clamped into the supported range
    pub fn spaces(width: usize) -> Self {
        IndentStyle::Spaces(width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH))
    }

    /// Text inserted for one indent level
    pub fn unit(&self) -> &'static str {
        match self {
            IndentStyle::Tab => "\t",
            IndentStyle::Spaces(width) => {
                &SPACES[..(*width).clamp(Self::MIN_WIDTH, Self::MAX_WIDTH)]
            }
        }
    }

    pub fn unit_len(&self) -> usize {
        self.unit().len()
    }

    /// Convert an indentation string to depth level
    pub fn calculate_depth(&self, indent_str: &str) -> usize {
        match self {
            IndentStyle::Tab => indent_str.chars().take_while(|&c| c == '\t').count(),
            IndentStyle::Spaces(_) => {
                let space_count = indent_str.chars().take_while(|&c| c == ' ').count();
                space_count / self.unit_len()
            }
        }
    }
}

/// Tuning for style detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentOptions {
    /// Lines examined from the top of the buffer
    pub sample_lines: usize,
    /// Space width used when no indented line is found
    pub default_width: usize,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self {
            sample_lines: 100,
            default_width: 4,
        }
    }
}

/// Detect the indentation style of a buffer from its first 100 lines.
pub fn detect_indent_style(buffer: &str) -> IndentStyle {
    detect_indent_style_with(buffer, &IndentOptions::default())
}

/// Detect the indentation style using custom sampling options.
///
/// Tabs win only when strictly more sampled lines start with a tab than with
/// a space. Otherwise the narrowest leading space run is the unit width.
/// Whitespace-only lines count like any other line.
pub fn detect_indent_style_with(buffer: &str, options: &IndentOptions) -> IndentStyle {
    let mut tab_lines = 0usize;
    let mut space_lines = 0usize;
    let mut narrowest: Option<usize> = None;

    for line in buffer.lines().take(options.sample_lines) {
        if line.starts_with('\t') {
            tab_lines += 1;
        } else if line.starts_with(' ') {
            space_lines += 1;
            let run = line.bytes().take_while(|&b| b == b' ').count();
            narrowest = Some(narrowest.map_or(run, |n| n.min(run)));
        }
    }

    if tab_lines > space_lines {
        IndentStyle::Tab
    } else {
        IndentStyle::spaces(narrowest.unwrap_or(options.default_width))
    }
}

/// One replacement against the original buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub at: usize,
    pub delete: usize,
    pub insert: &'static str,
}

impl TextEdit {
    fn insert(at: usize, text: &'static str) -> Self {
        Self {
            at,
            delete: 0,
            insert: text,
        }
    }

    fn delete(at: usize, len: usize) -> Self {
        Self {
            at,
            delete: len,
            insert: "",
        }
    }
}

/// Edits for one Tab press, in ascending, non-overlapping order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentPlan {
    pub style: IndentStyle,
    pub edits: Vec<TextEdit>,
}

impl IndentPlan {
    pub fn is_noop(&self) -> bool {
        self.edits.is_empty()
    }

    /// Compile the edits into a delta over a buffer of `base_len` bytes
    pub fn to_delta(&self, base_len: usize) -> Delta<RopeInfo> {
        let mut builder = Builder::new(base_len);
        for edit in &self.edits {
            let range = edit.at..edit.at + edit.delete;
            if edit.insert.is_empty() {
                builder.delete(range);
            } else {
                builder.replace(range, Rope::from(edit.insert));
            }
        }
        builder.build()
    }

    /// Where an offset in the original buffer lands after the edits.
    ///
    /// Insertions at the offset push it right; an offset inside deleted text
    /// moves to the start of the deletion.
    pub fn map_offset(&self, offset: usize) -> usize {
        let mut shifted = offset as isize;
        for edit in &self.edits {
            if edit.at > offset {
                break;
            }
            let removed = edit.delete.min(offset - edit.at);
            shifted += edit.insert.len() as isize - removed as isize;
        }
        shifted.max(0) as usize
    }

    /// Byte ranges of the new buffer that were inserted or collapsed
    pub fn changed_ranges(&self) -> Vec<Range<usize>> {
        let mut delta = 0isize;
        self.edits
            .iter()
            .map(|edit| {
                let start = (edit.at as isize + delta) as usize;
                delta += edit.insert.len() as isize - edit.delete as isize;
                start..start + edit.insert.len()
            })
            .collect()
    }
}

/// Result of one indent or outdent step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentEdit {
    pub buffer: String,
    pub start: usize,
    pub end: usize,
}

/// Apply one Tab (`reverse == false`) or Shift-Tab (`reverse == true`).
///
/// The style is detected from the buffer on every call so it follows live
/// edits. Offsets are byte offsets and may be given in either order.
pub fn apply_indent(
    buffer: &str,
    caret_start: usize,
    caret_end: usize,
    reverse: bool,
) -> IndentEdit {
    let style = detect_indent_style(buffer);
    apply_indent_with_style(buffer, caret_start, caret_end, reverse, style)
}

pub fn apply_indent_with_style(
    buffer: &str,
    caret_start: usize,
    caret_end: usize,
    reverse: bool,
    style: IndentStyle,
) -> IndentEdit {
    let (start, end) = normalize_selection(buffer, caret_start, caret_end);
    let plan = plan_indent(buffer, start, end, reverse, style);
    if plan.is_noop() {
        return IndentEdit {
            buffer: buffer.to_string(),
            start,
            end,
        };
    }

    let rope = Rope::from(buffer);
    let new_rope = plan.to_delta(rope.len()).apply(&rope);
    IndentEdit {
        buffer: new_rope.to_string(),
        start: plan.map_offset(start),
        end: plan.map_offset(end),
    }
}

/// Plan the edits for one indent step over an ordered selection.
pub fn plan_indent(
    buffer: &str,
    start: usize,
    end: usize,
    reverse: bool,
    style: IndentStyle,
) -> IndentPlan {
    let edits = if start == end && !caret_in_leading_indent(buffer, start) {
        plan_point(buffer, start, reverse, style)
    } else {
        plan_lines(buffer, start, end, reverse, style)
    };
    log::debug!(
        "{} {}..{} with {:?}: {} edit(s)",
        if reverse { "outdent" } else { "indent" },
        start,
        end,
        style,
        edits.len()
    );
    IndentPlan { style, edits }
}

/// Clamp both offsets onto char boundaries of `buffer` and order them
pub(crate) fn normalize_selection(buffer: &str, a: usize, b: usize) -> (usize, usize) {
    let a = floor_char_boundary(buffer, a);
    let b = floor_char_boundary(buffer, b);
    (a.min(b), a.max(b))
}

fn floor_char_boundary(buffer: &str, offset: usize) -> usize {
    let mut offset = offset.min(buffer.len());
    while !buffer.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn is_indent_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn line_start(buffer: &str, offset: usize) -> usize {
    buffer[..offset].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(buffer: &str, offset: usize) -> usize {
    buffer[offset..].find('\n').map_or(buffer.len(), |i| offset + i)
}

/// A caret with only indentation (or nothing) before it on its line
fn caret_in_leading_indent(buffer: &str, caret: usize) -> bool {
    buffer[line_start(buffer, caret)..caret].chars().all(is_indent_char)
}

fn plan_point(buffer: &str, caret: usize, reverse: bool, style: IndentStyle) -> Vec<TextEdit> {
    if !reverse {
        return vec![TextEdit::insert(caret, style.unit())];
    }

    let before = &buffer[line_start(buffer, caret)..caret];
    if before.ends_with('\t') {
        return vec![TextEdit::delete(caret - 1, 1)];
    }
    let run = before.bytes().rev().take_while(|&b| b == b' ').count();
    let remove = run.min(style.unit_len());
    if remove == 0 {
        return Vec::new();
    }
    vec![TextEdit::delete(caret - remove, remove)]
}

fn plan_lines(
    buffer: &str,
    start: usize,
    end: usize,
    reverse: bool,
    style: IndentStyle,
) -> Vec<TextEdit> {
    let first = line_start(buffer, start);
    let mut last = line_start(buffer, end);
    // A selection ending at column 0 does not touch that line.
    if end > start && last == end && last > first {
        last = line_start(buffer, end - 1);
    }

    let unit = style.unit();
    let mut edits = Vec::new();
    let mut cursor = first;
    loop {
        let line = &buffer[cursor..line_end(buffer, cursor)];
        if reverse {
            let remove = if line.starts_with(unit) {
                unit.len()
            } else {
                let leading = line.bytes().take_while(|&b| b == b' ' || b == b'\t').count();
                leading.min(style.unit_len())
            };
            if remove > 0 {
                edits.push(TextEdit::delete(cursor, remove));
            }
        } else if !line.trim().is_empty() {
            edits.push(TextEdit::insert(cursor, unit));
        }

        if cursor >= last {
            break;
        }
        cursor += line.len() + 1;
    }
    edits
}
