//! Turning a raw selection over rendered source into an annotation draft.
//!
//! The rendering surface reports selections as a pair of opaque boundaries
//! plus the selected text. [`resolve`] maps the boundaries to a [`RangeInfo`]
//! and [`sanitize`] cleans the text; [`AnnotationDraft::capture`] runs both
//! against one [`SelectionSnapshot`] so the range and text always describe the
//! same selection.

pub mod resolver;
pub mod sanitizer;

pub use resolver::resolve;
pub use sanitizer::sanitize;

use relative_path::RelativePathBuf;

use crate::models::RangeInfo;

/// Capability supplied by the rendering surface: find the source line that
/// encloses one end of a selection.
pub trait LineLookup {
    type Boundary;

    /// 1-based line containing the boundary, or `None` when the boundary sits
    /// outside any addressable line (gutter, header, another pane).
    fn enclosing_line(&self, boundary: &Self::Boundary) -> Option<usize>;

    /// Character offset of the boundary within its line's rendered text.
    fn char_offset(&self, boundary: &Self::Boundary) -> usize;
}

/// Selection captured once at event time.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot<B> {
    pub anchor: B,
    pub focus: B,
    pub text: String,
}

impl<B> SelectionSnapshot<B> {
    pub fn new(anchor: B, focus: B, text: impl Into<String>) -> Self {
        Self {
            anchor,
            focus,
            text: text.into(),
        }
    }
}

/// A comment waiting to be submitted: where it points and the code it quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDraft {
    pub file: RelativePathBuf,
    pub range: RangeInfo,
    pub code: String,
}

impl AnnotationDraft {
    /// Resolve and sanitize one selection snapshot.
    ///
    /// Returns `None` when neither boundary resolves to a line, in which case
    /// the comment action should not be offered.
    pub fn capture<L: LineLookup>(
        lookup: &L,
        selection: &SelectionSnapshot<L::Boundary>,
        file: impl Into<RelativePathBuf>,
    ) -> Option<Self> {
        let range = resolve(&selection.anchor, &selection.focus, lookup)?;
        let code = sanitize(&selection.text);
        log::debug!(
            "captured draft for lines {}..={} ({} bytes of code)",
            range.start_line(),
            range.end_line(),
            code.len()
        );
        Some(Self {
            file: file.into(),
            range,
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SelectionBoundary, SourceDocument};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capture_pairs_range_with_clean_code() {
        let doc = SourceDocument::from_text("fn f() {\n    g();\n}\n");
        let selection = SelectionSnapshot::new(
            SelectionBoundary::new(3, 1),
            SelectionBoundary::new(1, 0),
            "1    fn f() {\n2        g();\n3    }",
        );

        let draft = AnnotationDraft::capture(&doc, &selection, "src/lib.rs").unwrap();

        assert_eq!(draft.range, RangeInfo::new(1, 0, 3, 1));
        assert_eq!(draft.code, "fn f() {\n    g();\n}");
        assert_eq!(draft.file.as_str(), "src/lib.rs");
    }

    #[test]
    fn test_capture_outside_document_is_not_eligible() {
        let doc = SourceDocument::from_text("only line");
        let selection = SelectionSnapshot::new(
            SelectionBoundary::new(7, 0),
            SelectionBoundary::new(9, 0),
            "text",
        );
        assert!(AnnotationDraft::capture(&doc, &selection, "a.rs").is_none());
    }
}
