//! Character-sheet document model.
//!
//! `sheet-core` defines rows (modifiers and advantages) arranged in an
//! arena-backed tree, the per-document change notifier, the modifier cost
//! composition, and feature-derived totals. It performs no I/O; reading and
//! writing documents lives in `sheet-content`. All notified mutation flows
//! through [`document::Document`] and its editors.
pub mod advantage;
pub mod config;
pub mod document;
pub mod error;
pub mod feature;
pub mod i18n;
pub mod modifier;
pub mod notify;
pub mod row;
pub use advantage::Advantage;
pub use config::SheetConfig;
pub use document::{AdvantageEditor, Document, DocumentKind, ModifierEditor};
pub use error::{ErrorSeverity, SheetError};
pub use feature::{Attribute, DerivedTotals, Feature, LeveledAmount, derive_totals};
pub use i18n::{DefaultStrings, StringProvider, StringTable};
pub use modifier::{
    Affects, CostBase, CostBuckets, CostType, Modifier, ScopeSum, adjusted_points,
};
pub use notify::{
    DeferredEdit, DeferredEdits, IdFilter, Notification, Notifier, Observer, ObserverId,
};
pub use row::{
    AdvantageFields, DetachedRow, ModifierFields, Row, RowId, RowKind, RowTree, TreeError,
};
