use std::ops::Range;

use xi_rope::Rope;

use crate::editing::indent::{
    IndentOptions, IndentStyle, detect_indent_style_with, normalize_selection, plan_indent,
};
use crate::editing::Patch;

/// Caller-owned text buffer plus selection, threaded through indent edits.
///
/// The selection is kept ordered (`start <= end`) as byte offsets into the
/// buffer.
#[derive(Debug, Clone)]
pub struct EditorState {
    buffer: Rope,
    selection: Range<usize>,
    version: u64,
    options: IndentOptions,
}

impl EditorState {
    /// Create a state with the caret at the end of the text
    pub fn new(text: &str) -> Self {
        Self::with_options(text, IndentOptions::default())
    }

    pub fn with_options(text: &str, options: IndentOptions) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len,
            version: 0,
            options,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Set the selection, ordering and clamping it to the buffer
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let len = self.buffer.len();
        let start = selection.start.min(len);
        let end = selection.end.min(len);
        self.selection = start.min(end)..start.max(end);
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Style of the current text; recomputed on every call
    pub fn indent_style(&self) -> IndentStyle {
        detect_indent_style_with(&self.text(), &self.options)
    }

    /// Tab
    pub fn indent(&mut self) -> Patch {
        self.apply_tab(false)
    }

    /// Shift-Tab
    pub fn outdent(&mut self) -> Patch {
        self.apply_tab(true)
    }

    pub fn apply_tab(&mut self, reverse: bool) -> Patch {
        let text = self.text();
        let style = detect_indent_style_with(&text, &self.options);
        let (start, end) = normalize_selection(&text, self.selection.start, self.selection.end);

        let plan = plan_indent(&text, start, end, reverse, style);
        if plan.is_noop() {
            return Patch {
                changed: Vec::new(),
                new_selection: start..end,
                version: self.version,
            };
        }

        let delta = plan.to_delta(self.buffer.len());
        self.buffer = delta.apply(&self.buffer);
        self.selection = plan.map_offset(start)..plan.map_offset(end);
        self.version += 1;

        Patch {
            changed: plan.changed_ranges(),
            new_selection: self.selection.clone(),
            version: self.version,
        }
    }
}
