//! Indentation-aware editing of a text buffer.
//!
//! - **`indent`**: style detection and the Tab / Shift-Tab algorithm
//! - **`state`**: [`EditorState`], the buffer and selection threaded through edits
//! - **`patch`**: edit result metadata including changed ranges and new selection

pub mod indent;
pub mod patch;
pub mod state;

pub use indent::{
    IndentEdit, IndentOptions, IndentPlan, IndentStyle, TextEdit, apply_indent,
    apply_indent_with_style, detect_indent_style, detect_indent_style_with, plan_indent,
};
pub use patch::Patch;
pub use state::EditorState;
