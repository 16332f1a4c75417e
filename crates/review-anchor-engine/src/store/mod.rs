//! Caller-owned collection of annotations for one review session.

use std::collections::BTreeMap;

use crate::anchoring::AnnotationDraft;
use crate::markers::{LineMarker, aggregate};
use crate::models::{Annotation, AnnotationId, AnnotationStatus};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown annotation: {0}")]
    UnknownAnnotation(AnnotationId),
    #[error("Cannot {action} annotation {id} while it is {status}")]
    InvalidTransition {
        id: AnnotationId,
        action: &'static str,
        status: AnnotationStatus,
    },
}

/// Point-in-time list of annotations, refreshed by the caller on change.
pub trait AnnotationSource {
    fn annotations_snapshot(&self) -> Vec<Annotation>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == Some(id))
    }

    /// Turn a draft into a pending annotation with a fresh id
    pub fn submit(
        &mut self,
        draft: AnnotationDraft,
        author: impl Into<String>,
        content: impl Into<String>,
        timestamp: i64,
    ) -> AnnotationId {
        let id = AnnotationId::new();
        log::info!(
            "new annotation {id} on {} lines {}..={}",
            draft.file,
            draft.range.start_line(),
            draft.range.end_line()
        );
        self.annotations.push(Annotation {
            id: Some(id),
            file: draft.file,
            range: draft.range,
            status: AnnotationStatus::Pending,
            author: author.into(),
            content: content.into(),
            timestamp,
            code: draft.code,
        });
        id
    }

    /// Set any status, bypassing transition checks
    pub fn set_status(
        &mut self,
        id: AnnotationId,
        status: AnnotationStatus,
    ) -> Result<(), StoreError> {
        let annotation = self.get_mut(id)?;
        log::debug!("annotation {id}: {} -> {status}", annotation.status);
        annotation.status = status;
        Ok(())
    }

    /// Mark an open annotation as resolved
    pub fn resolve(&mut self, id: AnnotationId) -> Result<(), StoreError> {
        self.transition(id, "resolve", AnnotationStatus::Resolved, |status| status.is_open())
    }

    /// Reopen a resolved, closed or won't-fix annotation
    pub fn reopen(&mut self, id: AnnotationId) -> Result<(), StoreError> {
        self.transition(id, "reopen", AnnotationStatus::Reopened, |status| !status.is_open())
    }

    pub fn close(&mut self, id: AnnotationId) -> Result<(), StoreError> {
        self.set_status(id, AnnotationStatus::Closed)
    }

    pub fn wont_fix(&mut self, id: AnnotationId) -> Result<(), StoreError> {
        self.set_status(id, AnnotationStatus::WontFix)
    }

    pub fn edit_content(
        &mut self,
        id: AnnotationId,
        content: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.get_mut(id)?.content = content.into();
        Ok(())
    }

    pub fn delete(&mut self, id: AnnotationId) -> Result<Annotation, StoreError> {
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == Some(id))
            .ok_or(StoreError::UnknownAnnotation(id))?;
        log::info!("deleted annotation {id}");
        Ok(self.annotations.remove(index))
    }

    /// Annotations whose range covers `line`, in insertion order
    pub fn on_line(&self, line: usize) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.range.contains_line(line))
            .collect()
    }

    /// Line markers for the current contents
    pub fn markers(&self) -> BTreeMap<usize, LineMarker<'_>> {
        aggregate(&self.annotations)
    }

    /// Number of annotations in each status, in priority order
    pub fn status_counts(&self) -> Vec<(AnnotationStatus, usize)> {
        AnnotationStatus::ALL
            .iter()
            .map(|&status| {
                let count = self.annotations.iter().filter(|a| a.status == status).count();
                (status, count)
            })
            .collect()
    }

    fn get_mut(&mut self, id: AnnotationId) -> Result<&mut Annotation, StoreError> {
        self.annotations
            .iter_mut()
            .find(|a| a.id == Some(id))
            .ok_or(StoreError::UnknownAnnotation(id))
    }

    fn transition(
        &mut self,
        id: AnnotationId,
        action: &'static str,
        to: AnnotationStatus,
        allowed: impl Fn(AnnotationStatus) -> bool,
    ) -> Result<(), StoreError> {
        let annotation = self.get_mut(id)?;
        if !allowed(annotation.status) {
            return Err(StoreError::InvalidTransition {
                id,
                action,
                status: annotation.status,
            });
        }
        annotation.status = to;
        Ok(())
    }
}

impl AnnotationSource for AnnotationStore {
    fn annotations_snapshot(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }
}
