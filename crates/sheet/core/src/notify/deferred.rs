//! Edits queued by observers during a dispatch.

use crate::document::Document;

/// A tree mutation to run after the current notification dispatch.
pub type DeferredEdit = Box<dyn FnOnce(&mut Document)>;

/// Queue of edits collected while observers are being notified.
#[derive(Default)]
pub struct DeferredEdits {
    edits: Vec<DeferredEdit>,
}

impl DeferredEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit. It runs after every observer has seen the current event.
    pub fn push(&mut self, edit: impl FnOnce(&mut Document) + 'static) {
        self.edits.push(Box::new(edit));
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Move all edits from `other` to the end of this queue.
    pub fn append(&mut self, mut other: DeferredEdits) {
        self.edits.append(&mut other.edits);
    }

    pub(crate) fn into_edits(self) -> Vec<DeferredEdit> {
        self.edits
    }
}

impl std::fmt::Debug for DeferredEdits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredEdits")
            .field("len", &self.edits.len())
            .finish()
    }
}
