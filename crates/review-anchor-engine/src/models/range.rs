use serde::{Deserialize, Serialize};

/// One end of a selection as reported by the rendering surface.
///
/// `line_index` is 1-based. `char_offset` is relative to the rendered text of
/// that line. The two boundaries of a selection are not ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionBoundary {
    pub line_index: usize,
    pub char_offset: usize,
}

impl SelectionBoundary {
    pub fn new(line_index: usize, char_offset: usize) -> Self {
        Self {
            line_index,
            char_offset,
        }
    }
}

/// Normalized location of an annotation or a pending selection.
///
/// Lines are 1-based and inclusive. `start_line <= end_line` always holds;
/// the fields are private so a `RangeInfo` can only be built in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRangeInfo", into = "RawRangeInfo")]
pub struct RangeInfo {
    start_line: usize,
    end_line: usize,
    start_char: usize,
    end_char: usize,
}

impl RangeInfo {
    /// Build a range from two line/offset pairs in any order.
    ///
    /// The earlier position becomes the start; a backwards selection within
    /// a single line is ordered by offset.
    pub fn new(start_line: usize, start_char: usize, end_line: usize, end_char: usize) -> Self {
        if (start_line, start_char) <= (end_line, end_char) {
            Self {
                start_line,
                end_line,
                start_char,
                end_char,
            }
        } else {
            // Offsets travel with their line.
            Self {
                start_line: end_line,
                end_line: start_line,
                start_char: end_char,
                end_char: start_char,
            }
        }
    }

    /// Range covering whole lines, with no character offsets.
    pub fn lines(start_line: usize, end_line: usize) -> Self {
        Self::new(start_line, 0, end_line, 0)
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn start_char(&self) -> usize {
        self.start_char
    }

    pub fn end_char(&self) -> usize {
        self.end_char
    }

    pub fn is_multi_line(&self) -> bool {
        self.start_line != self.end_line
    }

    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }

    /// Number of lines touched by the range
    pub fn line_span(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// Pull both ends back onto lines `1..=last_line`
    pub fn clamped_to(&self, last_line: usize) -> Self {
        let last_line = last_line.max(1);
        Self {
            start_line: self.start_line.clamp(1, last_line),
            end_line: self.end_line.clamp(1, last_line),
            start_char: self.start_char,
            end_char: self.end_char,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawRangeInfo {
    start_line: usize,
    end_line: usize,
    #[serde(default)]
    start_char: usize,
    #[serde(default)]
    end_char: usize,
}

impl TryFrom<RawRangeInfo> for RangeInfo {
    type Error = String;

    fn try_from(raw: RawRangeInfo) -> Result<Self, Self::Error> {
        if raw.start_line > raw.end_line {
            return Err(format!(
                "start_line {} is after end_line {}",
                raw.start_line, raw.end_line
            ));
        }
        Ok(Self {
            start_line: raw.start_line,
            end_line: raw.end_line,
            start_char: raw.start_char,
            end_char: raw.end_char,
        })
    }
}

impl From<RangeInfo> for RawRangeInfo {
    fn from(range: RangeInfo) -> Self {
        Self {
            start_line: range.start_line,
            end_line: range.end_line,
            start_char: range.start_char,
            end_char: range.end_char,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_ordered_lines() {
        let range = RangeInfo::new(3, 7, 5, 2);
        assert_eq!(range.start_line(), 3);
        assert_eq!(range.end_line(), 5);
        assert_eq!(range.start_char(), 7);
        assert_eq!(range.end_char(), 2);
    }

    #[test]
    fn test_new_swaps_offsets_with_lines() {
        let range = RangeInfo::new(9, 4, 2, 11);
        assert_eq!(range.start_line(), 2);
        assert_eq!(range.end_line(), 9);
        assert_eq!(range.start_char(), 11);
        assert_eq!(range.end_char(), 4);
    }

    #[test]
    fn test_new_orders_offsets_within_one_line() {
        let range = RangeInfo::new(4, 12, 4, 3);
        assert_eq!((range.start_char(), range.end_char()), (3, 12));
    }

    #[test]
    fn test_line_helpers() {
        let range = RangeInfo::lines(4, 6);
        assert!(range.is_multi_line());
        assert!(range.contains_line(4));
        assert!(range.contains_line(6));
        assert!(!range.contains_line(7));
        assert_eq!(range.line_span(), 3);
        assert!(!RangeInfo::lines(2, 2).is_multi_line());
    }

    #[test]
    fn test_clamped_to_document_length() {
        let range = RangeInfo::new(3, 1, usize::MAX, 2).clamped_to(10);
        assert_eq!(range, RangeInfo::new(3, 1, 10, 2));

        let past_end = RangeInfo::lines(40, 50).clamped_to(10);
        assert_eq!(past_end, RangeInfo::lines(10, 10));

        assert_eq!(RangeInfo::lines(2, 4).clamped_to(10), RangeInfo::lines(2, 4));
        assert_eq!(RangeInfo::lines(0, 0).clamped_to(0), RangeInfo::lines(1, 1));
    }

    #[test]
    fn test_deserialize_rejects_inverted_lines() {
        let result: Result<RangeInfo, _> = toml::from_str("start_line = 5\nend_line = 2\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_defaults_char_offsets() {
        let range: RangeInfo = toml::from_str("start_line = 1\nend_line = 2\n").unwrap();
        assert_eq!(range, RangeInfo::lines(1, 2));
    }
}
