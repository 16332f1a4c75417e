use std::fmt;

use relative_path::RelativePathBuf;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::RangeInfo;

/// Stable identifier of a persisted annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AnnotationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Review state of an annotation.
///
/// Variants are declared in display priority order; see [`AnnotationStatus::priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStatus {
    Pending,
    Reopened,
    Resolved,
    Closed,
    WontFix,
}

impl AnnotationStatus {
    pub const ALL: [AnnotationStatus; 5] = [
        AnnotationStatus::Pending,
        AnnotationStatus::Reopened,
        AnnotationStatus::Resolved,
        AnnotationStatus::Closed,
        AnnotationStatus::WontFix,
    ];

    /// Marker precedence: the lowest value wins a line's glyph.
    pub fn priority(self) -> u8 {
        match self {
            AnnotationStatus::Pending => 1,
            AnnotationStatus::Reopened => 2,
            AnnotationStatus::Resolved => 3,
            AnnotationStatus::Closed => 4,
            AnnotationStatus::WontFix => 5,
        }
    }

    /// Whether the annotation still needs attention
    pub fn is_open(self) -> bool {
        matches!(self, AnnotationStatus::Pending | AnnotationStatus::Reopened)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationStatus::Pending => "pending",
            AnnotationStatus::Reopened => "reopened",
            AnnotationStatus::Resolved => "resolved",
            AnnotationStatus::Closed => "closed",
            AnnotationStatus::WontFix => "wontfix",
        }
    }
}

impl fmt::Display for AnnotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review comment anchored to a line range of one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// `None` for synthetic items that were never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AnnotationId>,
    pub file: RelativePathBuf,
    pub status: AnnotationStatus,
    pub author: String,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Cleaned code captured from the selection when the comment was made
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    pub range: RangeInfo,
}

impl Annotation {
    /// Key used to normalize file paths when comparing annotations without ids.
    pub fn normalized_file_key(&self) -> String {
        self.file.normalize().into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_matches_declaration() {
        let priorities: Vec<u8> = AnnotationStatus::ALL.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_open_statuses() {
        assert!(AnnotationStatus::Pending.is_open());
        assert!(AnnotationStatus::Reopened.is_open());
        assert!(!AnnotationStatus::Resolved.is_open());
        assert!(!AnnotationStatus::Closed.is_open());
        assert!(!AnnotationStatus::WontFix.is_open());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        #[derive(Serialize)]
        struct Wrapper {
            status: AnnotationStatus,
        }
        let text = toml::to_string(&Wrapper {
            status: AnnotationStatus::WontFix,
        })
        .unwrap();
        assert_eq!(text.trim(), r#"status = "wontfix""#);
    }

    #[test]
    fn test_normalized_file_key_resolves_dots() {
        let annotation = Annotation {
            id: None,
            file: RelativePathBuf::from("src/./lib/../main.rs"),
            range: RangeInfo::lines(1, 1),
            status: AnnotationStatus::Pending,
            author: "ana".to_string(),
            content: "typo".to_string(),
            timestamp: 0,
            code: String::new(),
        };
        assert_eq!(annotation.normalized_file_key(), "src/main.rs");
    }
}
