//! Per-document change notification.
//!
//! Every mutation made through an editor raises one identifier (e.g.
//! `modifier.cost`) on the document's [`Notifier`]. Observers register with an
//! identifier filter and are called synchronously, in registration order.
//!
//! Observers receive no handle on the document while a dispatch is running.
//! An observer that needs to change the tree in response queues a
//! [`DeferredEdits`] entry; the document applies queued edits once the current
//! dispatch has finished.

mod deferred;
mod notifier;

pub use deferred::{DeferredEdit, DeferredEdits};
pub use notifier::{IdFilter, Notifier, Observer, ObserverId};

use crate::row::RowId;

/// Separator between the segments of a notification identifier.
pub const SEPARATOR: char = '.';

/// Notification identifiers raised by the core.
pub mod ids {
    pub const MODIFIER_PREFIX: &str = "modifier";
    pub const MODIFIER_NAME: &str = "modifier.name";
    pub const MODIFIER_ENABLED: &str = "modifier.enabled";
    pub const MODIFIER_COST: &str = "modifier.cost";
    pub const MODIFIER_AFFECTS: &str = "modifier.affects";
    pub const MODIFIER_REFERENCE: &str = "modifier.reference";
    pub const MODIFIER_LIST_CHANGED: &str = "modifier.list_changed";

    pub const TRAIT_PREFIX: &str = "trait";
    pub const TRAIT_NAME: &str = "trait.name";
    pub const TRAIT_POINTS: &str = "trait.points";
    pub const TRAIT_REFERENCE: &str = "trait.reference";
    pub const TRAIT_FEATURES: &str = "trait.features";
    pub const TRAIT_LIST_CHANGED: &str = "trait.list_changed";

    pub const ROW_NOTES: &str = "row.notes";
    pub const DOCUMENT_VERSION: &str = "document.version";
}

/// A single change event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Notification {
    /// Dotted identifier of what changed.
    pub id: &'static str,
    /// Row the change applies to, `None` for document-level changes.
    pub row: Option<RowId>,
}

impl Notification {
    pub const fn new(id: &'static str, row: Option<RowId>) -> Self {
        Self { id, row }
    }
}
