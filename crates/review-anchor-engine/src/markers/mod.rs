//! Per-line summaries of every annotation touching a line.
//!
//! The gutter shows one glyph per line. When several annotations overlap a
//! line, the one with the most urgent status wins the glyph and the rest stay
//! reachable through [`LineMarker::all_annotations`].

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{Annotation, AnnotationId};

/// Where a line sits within the primary annotation's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    Single,
    Start,
    Middle,
    End,
}

impl MarkerType {
    fn classify(annotation: &Annotation, line_number: usize) -> Self {
        let range = annotation.range;
        if !range.is_multi_line() {
            MarkerType::Single
        } else if line_number == range.start_line() {
            MarkerType::Start
        } else if line_number == range.end_line() {
            MarkerType::End
        } else {
            MarkerType::Middle
        }
    }
}

/// Derived summary of the annotations on one line. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMarker<'a> {
    pub line_number: usize,
    /// The annotation whose status is rendered for this line
    pub primary: &'a Annotation,
    pub count: usize,
    /// Deduplicated annotations on this line, in input order
    pub all_annotations: Vec<&'a Annotation>,
    pub is_multi_line: bool,
    pub marker_type: MarkerType,
}

/// Identity used to drop repeated annotations from a line's bucket
#[derive(Debug, PartialEq, Eq, Hash)]
enum DedupKey<'a> {
    Id(AnnotationId),
    Composite {
        file: String,
        timestamp: i64,
        content: &'a str,
    },
}

impl<'a> DedupKey<'a> {
    fn of(annotation: &'a Annotation) -> Self {
        match annotation.id {
            Some(id) => DedupKey::Id(id),
            None => DedupKey::Composite {
                file: annotation.normalized_file_key(),
                timestamp: annotation.timestamp,
                content: &annotation.content,
            },
        }
    }
}

#[derive(Default)]
struct Bucket<'a> {
    seen: HashSet<DedupKey<'a>>,
    members: Vec<&'a Annotation>,
}

/// Build one marker for every line touched by at least one annotation.
///
/// The result depends only on `annotations`; call again with a fresh snapshot
/// whenever the list changes.
pub fn aggregate<'a>(
    annotations: impl IntoIterator<Item = &'a Annotation>,
) -> BTreeMap<usize, LineMarker<'a>> {
    let mut buckets: BTreeMap<usize, Bucket<'a>> = BTreeMap::new();

    for annotation in annotations {
        let range = annotation.range;
        for line in range.start_line()..=range.end_line() {
            let bucket = buckets.entry(line).or_default();
            if bucket.seen.insert(DedupKey::of(annotation)) {
                bucket.members.push(annotation);
            }
        }
    }

    buckets
        .into_iter()
        .filter_map(|(line_number, bucket)| {
            let primary = select_primary(&bucket.members)?;
            Some((
                line_number,
                LineMarker {
                    line_number,
                    primary,
                    count: bucket.members.len(),
                    is_multi_line: primary.range.is_multi_line(),
                    marker_type: MarkerType::classify(primary, line_number),
                    all_annotations: bucket.members,
                },
            ))
        })
        .collect()
}

/// Lowest status priority wins; earlier annotations win ties.
fn select_primary<'a>(members: &[&'a Annotation]) -> Option<&'a Annotation> {
    members.iter().copied().reduce(|best, candidate| {
        if candidate.status.priority() < best.status.priority() {
            candidate
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationStatus, RangeInfo};
    use relative_path::RelativePathBuf;

    fn annotation(
        id: Option<AnnotationId>,
        lines: (usize, usize),
        status: AnnotationStatus,
        content: &str,
    ) -> Annotation {
        Annotation {
            id,
            file: RelativePathBuf::from("src/main.rs"),
            range: RangeInfo::lines(lines.0, lines.1),
            status,
            author: "reviewer".to_string(),
            content: content.to_string(),
            timestamp: 1_700_000_000_000,
            code: String::new(),
        }
    }

    fn with_id(lines: (usize, usize), status: AnnotationStatus) -> Annotation {
        annotation(Some(AnnotationId::new()), lines, status, "comment")
    }

    #[test]
    fn test_primary_is_most_urgent_status() {
        let annotations = vec![
            with_id((5, 5), AnnotationStatus::Resolved),
            with_id((5, 5), AnnotationStatus::Pending),
            with_id((5, 5), AnnotationStatus::Closed),
        ];

        let markers = aggregate(&annotations);
        let marker = &markers[&5];

        assert_eq!(marker.primary.status, AnnotationStatus::Pending);
        assert_eq!(marker.count, 3);
        assert_eq!(marker.all_annotations.len(), 3);
        assert_eq!(marker.marker_type, MarkerType::Single);
        assert!(!marker.is_multi_line);
    }

    #[test]
    fn test_ties_go_to_first_encountered() {
        let annotations = vec![
            with_id((2, 2), AnnotationStatus::Reopened),
            with_id((2, 2), AnnotationStatus::Reopened),
        ];

        let markers = aggregate(&annotations);

        assert!(std::ptr::eq(markers[&2].primary, &annotations[0]));
    }

    #[test]
    fn test_multi_line_marker_types() {
        let annotations = vec![with_id((3, 5), AnnotationStatus::Pending)];

        let markers = aggregate(&annotations);

        assert_eq!(markers.len(), 3);
        assert_eq!(markers[&3].marker_type, MarkerType::Start);
        assert_eq!(markers[&4].marker_type, MarkerType::Middle);
        assert_eq!(markers[&5].marker_type, MarkerType::End);
        assert!(markers.values().all(|marker| marker.is_multi_line));
    }

    #[test]
    fn test_classification_follows_primary_range() {
        // A resolved single-line note sits inside a pending range; the pending
        // range wins line 4, so line 4 is classified against lines 3..=6.
        let annotations = vec![
            with_id((4, 4), AnnotationStatus::Resolved),
            with_id((3, 6), AnnotationStatus::Pending),
        ];

        let markers = aggregate(&annotations);

        assert_eq!(markers[&4].count, 2);
        assert_eq!(markers[&4].marker_type, MarkerType::Middle);
        assert!(markers[&4].is_multi_line);
    }

    #[test]
    fn test_duplicate_ids_are_counted_once() {
        let original = with_id((1, 2), AnnotationStatus::Pending);
        let annotations = vec![original.clone(), original];

        let markers = aggregate(&annotations);

        assert_eq!(markers[&1].count, 1);
        assert_eq!(markers[&2].count, 1);
    }

    #[test]
    fn test_items_without_id_use_composite_key() {
        let mut moved = annotation(None, (7, 7), AnnotationStatus::Pending, "same words");
        moved.file = RelativePathBuf::from("src/../src/main.rs");
        let annotations = vec![
            annotation(None, (7, 7), AnnotationStatus::Pending, "same words"),
            moved,
            annotation(None, (7, 7), AnnotationStatus::Pending, "other words"),
        ];

        let markers = aggregate(&annotations);

        assert_eq!(markers[&7].count, 2);
        assert_eq!(markers[&7].all_annotations[1].content, "other words");
    }

    #[test]
    fn test_empty_input_has_no_markers() {
        assert!(aggregate(&Vec::<Annotation>::new()).is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let annotations = vec![
            with_id((1, 3), AnnotationStatus::WontFix),
            with_id((2, 2), AnnotationStatus::Pending),
        ];
        let before = annotations.clone();

        let _ = aggregate(&annotations);

        assert_eq!(annotations, before);
    }

    #[test]
    fn test_marker_snapshot() {
        #[derive(Serialize)]
        struct Row {
            line: usize,
            status: crate::models::AnnotationStatus,
            count: usize,
            marker: MarkerType,
        }

        let annotations = vec![
            with_id((1, 3), AnnotationStatus::Closed),
            with_id((3, 3), AnnotationStatus::Reopened),
        ];
        let rows: Vec<Row> = aggregate(&annotations)
            .into_values()
            .map(|marker| Row {
                line: marker.line_number,
                status: marker.primary.status,
                count: marker.count,
                marker: marker.marker_type,
            })
            .collect();

        insta::assert_yaml_snapshot!(rows, @r"
        - line: 1
          status: closed
          count: 1
          marker: start
        - line: 2
          status: closed
          count: 1
          marker: middle
        - line: 3
          status: reopened
          count: 2
          marker: single
        ");
    }
}
