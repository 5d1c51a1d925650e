//! The document: a forest of rows plus its notifier and schema version.
//!
//! Every structural or field change made through the document raises a
//! notification. [`Document::tree_mut`] is the escape hatch for bulk work
//! (loading, migrations) where per-field notifications are not wanted.

mod editor;

pub use editor::{AdvantageEditor, ModifierEditor};

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::advantage::Advantage;
use crate::config::SheetConfig;
use crate::i18n::{DefaultStrings, StringProvider};
use crate::modifier::{CostBuckets, Modifier, adjusted_points};
use crate::notify::{DeferredEdits, IdFilter, Notification, Notifier, Observer, ObserverId, ids};
use crate::row::{DetachedRow, Row, RowId, RowKind, RowTree, TreeError};

/// The two document flavours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocumentKind {
    /// Library of standalone modifiers
    ModifierList,
    /// List of traits, possibly grouped in containers
    AdvantageList,
}

impl DocumentKind {
    pub const fn root_tag(self) -> &'static str {
        match self {
            DocumentKind::ModifierList => "modifier_list",
            DocumentKind::AdvantageList => "advantage_list",
        }
    }

    /// Schema version written on save.
    pub const fn current_version(self) -> i32 {
        match self {
            DocumentKind::ModifierList => 1,
            DocumentKind::AdvantageList => 2,
        }
    }

    pub fn from_root_tag(tag: &str) -> Option<Self> {
        [DocumentKind::ModifierList, DocumentKind::AdvantageList]
            .into_iter()
            .find(|kind| kind.root_tag() == tag)
    }

    /// Whether `row` may appear at the top level of this kind of document.
    pub fn accepts_root(self, row: &Row) -> bool {
        matches!(
            (self, &row.kind),
            (DocumentKind::ModifierList, RowKind::Modifier(_))
                | (DocumentKind::AdvantageList, RowKind::Advantage(_))
        )
    }
}

/// A row forest with its notifier, schema version, and string provider.
pub struct Document {
    kind: DocumentKind,
    schema_version: i32,
    tree: RowTree,
    notifier: Notifier,
    strings: Rc<dyn StringProvider>,
}

impl Document {
    /// Empty document at the current schema version, English strings.
    pub fn new(kind: DocumentKind) -> Self {
        Self::with_strings(kind, Rc::new(DefaultStrings))
    }

    pub fn with_strings(kind: DocumentKind, strings: Rc<dyn StringProvider>) -> Self {
        Self {
            kind,
            schema_version: kind.current_version(),
            tree: RowTree::new(),
            notifier: Notifier::new(),
            strings,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn schema_version(&self) -> i32 {
        self.schema_version
    }

    /// Record the version a document was read at. Does not notify.
    pub fn set_schema_version(&mut self, version: i32) {
        self.schema_version = version;
    }

    /// Stamp the current schema version, as done on every save.
    pub fn mark_saved(&mut self) {
        let current = self.kind.current_version();
        if self.schema_version != current {
            tracing::debug!(
                from = self.schema_version,
                to = current,
                "Upgrading document schema version"
            );
            self.schema_version = current;
            self.emit(ids::DOCUMENT_VERSION, None);
        }
    }

    pub fn strings(&self) -> &dyn StringProvider {
        self.strings.as_ref()
    }

    pub fn shared_strings(&self) -> Rc<dyn StringProvider> {
        Rc::clone(&self.strings)
    }

    /// A defaulted row of the given kind, named through the string provider.
    pub fn new_modifier(&self) -> Modifier {
        Modifier::new(self.strings())
    }

    pub fn new_advantage(&self) -> Advantage {
        Advantage::new(self.strings())
    }

    // ===== notifier =====

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn observe(&mut self, observer: impl Observer + 'static, filter: IdFilter) -> ObserverId {
        self.notifier.register(observer, filter)
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.notifier.unregister(id)
    }

    /// Run `f` inside a notification batch. Notifications raised by `f` are
    /// de-duplicated and delivered when the outermost batch ends.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.notifier.start_batch();
        let result = f(self);
        let deferred = self.notifier.end_batch();
        self.apply_deferred(deferred);
        result
    }

    pub(crate) fn emit(&mut self, id: &'static str, row: Option<RowId>) {
        let deferred = self.notifier.notify(Notification::new(id, row));
        self.apply_deferred(deferred);
    }

    pub(crate) fn emit_all(&mut self, ids: &[&'static str], row: Option<RowId>) {
        match ids {
            [] => {}
            [id] => self.emit(*id, row),
            _ => self.batch(|doc| {
                for &id in ids {
                    doc.emit(id, row);
                }
            }),
        }
    }

    fn apply_deferred(&mut self, deferred: DeferredEdits) {
        if deferred.is_empty() {
            return;
        }
        tracing::debug!("Applying {} deferred edits", deferred.len());
        for edit in deferred.into_edits() {
            edit(self);
        }
    }

    // ===== tree access =====

    pub fn tree(&self) -> &RowTree {
        &self.tree
    }

    /// Direct tree access. Changes made here raise no notifications.
    pub fn tree_mut(&mut self) -> &mut RowTree {
        &mut self.tree
    }

    pub fn row(&self, id: RowId) -> Result<&Row, TreeError> {
        self.tree.row(id)
    }

    pub fn roots(&self) -> &[RowId] {
        self.tree.roots()
    }

    pub fn children(&self, id: RowId) -> &[RowId] {
        self.tree.children(id)
    }

    pub fn parent(&self, id: RowId) -> Option<RowId> {
        self.tree.parent(id)
    }

    /// Every row in pre-order.
    pub fn walk(&self) -> Vec<RowId> {
        self.tree.walk()
    }

    // ===== structural edits =====

    pub fn add_root(&mut self, row: impl Into<Row>) -> Result<RowId, TreeError> {
        self.insert_child(None, None, row)
    }

    pub fn add_child(&mut self, parent: RowId, row: impl Into<Row>) -> Result<RowId, TreeError> {
        self.insert_child(Some(parent), None, row)
    }

    /// Insert `row` beneath `parent` (top level when `None`) at `index` (end
    /// when `None`).
    pub fn insert_child(
        &mut self,
        parent: Option<RowId>,
        index: Option<usize>,
        row: impl Into<Row>,
    ) -> Result<RowId, TreeError> {
        let row = row.into();
        self.check_root_kind(parent, &row)?;
        let list_id = row.list_changed_id();
        let id = self.tree.insert(parent, index, row)?;
        self.emit(list_id, Some(id));
        Ok(id)
    }

    /// Insert a detached subtree with fresh handles.
    pub fn insert_subtree(
        &mut self,
        parent: Option<RowId>,
        index: Option<usize>,
        subtree: DetachedRow,
    ) -> Result<RowId, TreeError> {
        self.check_root_kind(parent, &subtree.row)?;
        let list_id = subtree.row.list_changed_id();
        let id = self.tree.insert_subtree(parent, index, subtree)?;
        self.emit(list_id, Some(id));
        Ok(id)
    }

    pub fn move_row(
        &mut self,
        id: RowId,
        new_parent: Option<RowId>,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        let row = self.tree.row(id)?;
        let list_id = row.list_changed_id();
        self.check_root_kind(new_parent, row)?;
        self.tree.move_row(id, new_parent, index)?;
        self.emit(list_id, Some(id));
        Ok(())
    }

    /// Remove a row and its subtree, handing them back to the caller.
    pub fn remove(&mut self, id: RowId) -> Result<DetachedRow, TreeError> {
        let detached = self.tree.remove(id)?;
        self.emit(detached.row.list_changed_id(), Some(id));
        Ok(detached)
    }

    pub fn sort_children(&mut self, parent: Option<RowId>) -> Result<(), TreeError> {
        self.tree.sort_children(parent)?;
        let list_id = match self.kind {
            DocumentKind::ModifierList => ids::MODIFIER_LIST_CHANGED,
            DocumentKind::AdvantageList => ids::TRAIT_LIST_CHANGED,
        };
        self.emit(list_id, parent);
        Ok(())
    }

    fn check_root_kind(&self, parent: Option<RowId>, row: &Row) -> Result<(), TreeError> {
        if parent.is_none() && !self.kind.accepts_root(row) {
            return Err(TreeError::KindMismatch {
                parent: None,
                kind: row.kind_name(),
            });
        }
        Ok(())
    }

    // ===== field edits =====

    /// Replace a row's notes. Returns whether anything changed.
    pub fn set_notes(&mut self, id: RowId, notes: impl Into<String>) -> Result<bool, TreeError> {
        let row = self.tree.row_mut(id)?;
        if row.as_modifier().is_some_and(|m| m.read_only) {
            tracing::warn!(row = %id, "Refusing to edit notes of a read-only modifier");
            return Ok(false);
        }
        let notes = notes.into();
        if row.notes == notes {
            return Ok(false);
        }
        row.notes = notes;
        self.emit(ids::ROW_NOTES, Some(id));
        Ok(true)
    }

    /// Borrow-scoped editor for a modifier row.
    pub fn modifier_mut(&mut self, id: RowId) -> Result<ModifierEditor<'_>, TreeError> {
        if self.tree.row(id)?.as_modifier().is_none() {
            return Err(TreeError::WrongKind {
                row: id,
                expected: "modifier",
            });
        }
        Ok(ModifierEditor::new(self, id))
    }

    /// Borrow-scoped editor for an advantage row.
    pub fn advantage_mut(&mut self, id: RowId) -> Result<AdvantageEditor<'_>, TreeError> {
        if self.tree.row(id)?.as_advantage().is_none() {
            return Err(TreeError::WrongKind {
                row: id,
                expected: "advantage",
            });
        }
        Ok(AdvantageEditor::new(self, id))
    }

    // ===== cost =====

    /// Modifiers directly owned by `id`, in child order.
    pub fn modifiers_of(&self, id: RowId) -> Vec<&Modifier> {
        self.tree
            .children(id)
            .iter()
            .filter_map(|&child| self.tree.get(child).and_then(Row::as_modifier))
            .collect()
    }

    /// Modifiers that apply to `id`: copies of those inherited from enclosing
    /// containers (outermost first, marked read-only) followed by its own.
    pub fn effective_modifiers(&self, id: RowId) -> Result<Vec<Modifier>, TreeError> {
        self.tree.row(id)?;
        let mut out = Vec::new();
        for ancestor in self.tree.ancestors(id).into_iter().rev() {
            let is_container = self
                .tree
                .get(ancestor)
                .and_then(Row::as_advantage)
                .is_some_and(|a| a.container);
            if !is_container {
                continue;
            }
            out.extend(self.modifiers_of(ancestor).into_iter().map(|modifier| {
                let mut inherited = modifier.clone();
                inherited.read_only = true;
                inherited
            }));
        }
        out.extend(self.modifiers_of(id).into_iter().cloned());
        Ok(out)
    }

    pub fn cost_buckets(&self, id: RowId) -> Result<CostBuckets, TreeError> {
        let modifiers = self.effective_modifiers(id)?;
        Ok(CostBuckets::compose(&modifiers))
    }

    /// Adjusted point cost of an advantage. Containers cost the sum of their
    /// child advantages.
    pub fn adjusted_points(&self, id: RowId, config: &SheetConfig) -> Result<i32, TreeError> {
        let advantage = self
            .tree
            .row(id)?
            .as_advantage()
            .ok_or(TreeError::WrongKind {
                row: id,
                expected: "advantage",
            })?;
        if advantage.container {
            let mut sum = 0i32;
            for &child in self.tree.children(id) {
                if self.tree.get(child).and_then(Row::as_advantage).is_some() {
                    sum = sum.saturating_add(self.adjusted_points(child, config)?);
                }
            }
            return Ok(sum);
        }
        let buckets = self.cost_buckets(id)?;
        Ok(adjusted_points(&advantage.cost_base(), &buckets, config))
    }

    // ===== comparison & nameables =====

    /// Structural equivalence: same kind and equivalent row forests.
    pub fn is_equivalent_to(&self, other: &Document) -> bool {
        self.kind == other.kind && self.tree.is_equivalent_to(&other.tree)
    }

    pub fn fill_with_nameable_keys(&self, keys: &mut BTreeSet<String>) {
        for id in self.tree.walk() {
            if let Some(row) = self.tree.get(id) {
                row.fill_with_nameable_keys(keys);
            }
        }
    }

    /// Substitute `@key@` placeholders in every row. Raises no notifications.
    pub fn apply_nameable_keys(&mut self, values: &HashMap<String, String>) {
        for id in self.tree.walk() {
            if let Some(row) = self.tree.get_mut(id) {
                row.apply_nameable_keys(values);
            }
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("kind", &self.kind)
            .field("schema_version", &self.schema_version)
            .field("rows", &self.tree.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::CostType;

    #[test]
    fn root_kind_is_enforced() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        let err = doc.add_root(Advantage::named("Nope")).unwrap_err();
        assert_eq!(
            err,
            TreeError::KindMismatch {
                parent: None,
                kind: "advantage"
            }
        );
        assert!(doc.add_root(Modifier::default()).is_ok());
    }

    #[test]
    fn mark_saved_stamps_current_version() {
        let mut doc = Document::new(DocumentKind::AdvantageList);
        doc.set_schema_version(1);
        doc.mark_saved();
        assert_eq!(doc.schema_version(), 2);
    }

    #[test]
    fn inherited_modifiers_come_first_and_are_read_only() {
        let mut doc = Document::new(DocumentKind::AdvantageList);
        let group = doc.add_root(Advantage::container("Group")).unwrap();
        doc.add_child(group, Modifier::named("Group mod").with_cost(CostType::Percentage, -10))
            .unwrap();
        let member = doc
            .add_child(group, Advantage::named("Member").with_points(20))
            .unwrap();
        doc.add_child(member, Modifier::named("Own").with_cost(CostType::Points, 5))
            .unwrap();

        let effective = doc.effective_modifiers(member).unwrap();
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[0].name, "Group mod");
        assert!(effective[0].read_only);
        assert_eq!(effective[1].name, "Own");
        assert!(!effective[1].read_only);

        // (20 + 5) × 0.9 = 22.5 → 23
        let config = SheetConfig::default();
        assert_eq!(doc.adjusted_points(member, &config).unwrap(), 23);
        assert_eq!(doc.adjusted_points(group, &config).unwrap(), 23);
    }

    #[test]
    fn adjusted_points_rejects_modifiers() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        let id = doc.add_root(Modifier::default()).unwrap();
        assert!(matches!(
            doc.adjusted_points(id, &SheetConfig::default()),
            Err(TreeError::WrongKind { .. })
        ));
    }
}
