use crate::anchoring::LineLookup;
use crate::models::RangeInfo;

/// Map a pair of selection boundaries to an ordered [`RangeInfo`].
///
/// Each boundary is resolved on its own. If only one resolves, the selection
/// collapses onto that boundary. If neither resolves, there is nothing to
/// anchor to and `None` is returned.
pub fn resolve<L: LineLookup>(
    boundary_a: &L::Boundary,
    boundary_b: &L::Boundary,
    lookup: &L,
) -> Option<RangeInfo> {
    let a = lookup
        .enclosing_line(boundary_a)
        .map(|line| (line, lookup.char_offset(boundary_a)));
    let b = lookup
        .enclosing_line(boundary_b)
        .map(|line| (line, lookup.char_offset(boundary_b)));

    let ((a_line, a_char), (b_line, b_char)) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (Some(only), None) | (None, Some(only)) => (only, only),
        (None, None) => {
            log::debug!("selection boundaries do not resolve to any line");
            return None;
        }
    };

    Some(RangeInfo::new(a_line, a_char, b_line, b_char))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SelectionBoundary, SourceDocument};
    use rstest::rstest;

    fn document() -> SourceDocument {
        SourceDocument::from_text(
            "use std::io;\n\nfn main() {\n    let x = 1;\n    println!(\"{x}\");\n}\n",
        )
    }

    fn at(line: usize, offset: usize) -> SelectionBoundary {
        SelectionBoundary::new(line, offset)
    }

    #[test]
    fn test_forward_selection() {
        let range = resolve(&at(3, 2), &at(5, 8), &document()).unwrap();
        assert_eq!(range, RangeInfo::new(3, 2, 5, 8));
    }

    #[test]
    fn test_backward_selection_swaps_offsets_with_lines() {
        let range = resolve(&at(5, 8), &at(3, 2), &document()).unwrap();
        assert_eq!(range.start_line(), 3);
        assert_eq!(range.start_char(), 2);
        assert_eq!(range.end_line(), 5);
        assert_eq!(range.end_char(), 8);
    }

    #[test]
    fn test_one_unresolved_boundary_degrades_to_single_line() {
        let range = resolve(&at(4, 3), &at(40, 0), &document()).unwrap();
        assert_eq!(range, RangeInfo::new(4, 3, 4, 3));

        let range = resolve(&at(0, 0), &at(2, 0), &document()).unwrap();
        assert_eq!(range, RangeInfo::new(2, 0, 2, 0));
    }

    #[test]
    fn test_both_unresolved_is_none() {
        assert_eq!(resolve(&at(0, 0), &at(99, 1), &document()), None);
    }

    #[test]
    fn test_offsets_are_clamped_by_lookup() {
        let range = resolve(&at(1, 500), &at(1, 0), &document()).unwrap();
        assert_eq!((range.start_char(), range.end_char()), (0, 12));
    }

    #[rstest]
    #[case(1, 6)]
    #[case(6, 1)]
    #[case(4, 4)]
    #[case(2, 5)]
    #[case(5, 2)]
    #[case(0, 3)]
    #[case(3, 17)]
    fn test_start_line_never_after_end_line(#[case] a: usize, #[case] b: usize) {
        if let Some(range) = resolve(&at(a, 3), &at(b, 1), &document()) {
            assert!(range.start_line() <= range.end_line());
        }
    }
}
