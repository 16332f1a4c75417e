pub mod annotation;
pub mod range;
pub mod source_document;

pub use annotation::{Annotation, AnnotationId, AnnotationStatus};
pub use range::{RangeInfo, SelectionBoundary};
pub use source_document::SourceDocument;
