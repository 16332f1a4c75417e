//! Annotation anchoring and indentation-aware editing for a code review viewer.
//!
//! The five pure operations are [`resolve`], [`sanitize`], [`aggregate`],
//! [`apply_indent`] (with [`detect_indent_style`]) and [`place`]. Everything
//! that touches the rendering surface is injected through the
//! [`LineLookup`] and [`GeometrySource`] traits.

pub mod anchoring;
pub mod editing;
pub mod io;
pub mod markers;
pub mod models;
pub mod placement;
pub mod store;

// Re-export key types for easier usage
pub use anchoring::{AnnotationDraft, LineLookup, SelectionSnapshot, resolve, sanitize};
pub use editing::{
    EditorState, IndentEdit, IndentOptions, IndentStyle, Patch, apply_indent,
    detect_indent_style, detect_indent_style_with,
};
pub use markers::{LineMarker, MarkerType, aggregate};
pub use models::*;
pub use placement::{
    GeometrySource, PlacementOptions, PopupPlacement, Rect, Size, Viewport, place, place_for,
    place_with,
};
pub use store::{AnnotationSource, AnnotationStore, StoreError};
