//! Ordered annotation store for one open document.

use crate::annotations::{Annotation, AnnotationId, AnnotationPatch, PageIndex};
use std::collections::HashMap;
use uuid::Uuid;

/// All annotations of an editing session.
///
/// Insertion order is z-order: later annotations draw on top and win hit
/// tests. Handles stay valid until their own annotation is removed.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    annotations: HashMap<AnnotationId, Annotation>,
    /// Insertion order (back to front).
    order: Vec<AnnotationId>,
}

impl AnnotationStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation on top of everything else.
    pub fn add(&mut self, annotation: impl Into<Annotation>) -> AnnotationId {
        let id = Uuid::new_v4();
        self.order.push(id);
        self.annotations.insert(id, annotation.into());
        id
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.get_mut(&id)
    }

    /// Apply a property edit in place. Returns false for unknown handles
    /// and for fields the annotation does not have.
    pub fn update(&mut self, id: AnnotationId, patch: AnnotationPatch) -> bool {
        self.annotations
            .get_mut(&id)
            .map(|annotation| annotation.apply(patch))
            .unwrap_or(false)
    }

    /// Remove an annotation, invalidating its handle.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        self.order.retain(|&other| other != id);
        self.annotations.remove(&id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.annotations.contains_key(&id)
    }

    /// All annotations in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (AnnotationId, &Annotation)> {
        self.order
            .iter()
            .filter_map(|id| self.annotations.get(id).map(|a| (*id, a)))
    }

    /// Annotations on one page, in insertion order.
    pub fn for_page(
        &self,
        page: PageIndex,
    ) -> impl DoubleEndedIterator<Item = (AnnotationId, &Annotation)> {
        self.iter().filter(move |(_, a)| a.page() == page)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.order.clear();
    }
}
