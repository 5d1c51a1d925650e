//! Rows: the nodes of a document tree.
//!
//! A [`Row`] carries the data shared by every node (notes) plus a closed
//! [`RowKind`] for the variant-specific payload. Parent/child relationships
//! are not stored on the row; they live in the [`RowTree`] arena and are
//! addressed through stable [`RowId`] handles.

mod fields;
mod nameable;
mod tree;

pub use fields::{AdvantageFields, ModifierFields};
pub use nameable::{apply_nameables, extract_nameables};
pub use tree::{DetachedRow, RowTree, TreeError};

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::advantage::Advantage;
use crate::modifier::Modifier;
use crate::notify::ids;

/// Stable handle of a row within one document.
///
/// Handles are assigned on insertion, never reused, and never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowId(pub(crate) u32);

impl RowId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Variant payload of a row.
#[derive(Clone, Debug)]
pub enum RowKind {
    Modifier(Modifier),
    Advantage(Advantage),
}

/// A document node.
#[derive(Clone, Debug, Default)]
pub struct Row {
    pub notes: String,
    pub kind: RowKind,
}

impl Default for RowKind {
    fn default() -> Self {
        RowKind::Modifier(Modifier::default())
    }
}

impl From<Modifier> for Row {
    fn from(modifier: Modifier) -> Self {
        Row::modifier(modifier)
    }
}

impl From<Advantage> for Row {
    fn from(advantage: Advantage) -> Self {
        Row::advantage(advantage)
    }
}

impl Row {
    pub fn modifier(modifier: Modifier) -> Self {
        Self {
            notes: String::new(),
            kind: RowKind::Modifier(modifier),
        }
    }

    pub fn advantage(advantage: Advantage) -> Self {
        Self {
            notes: String::new(),
            kind: RowKind::Advantage(advantage),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// XML tag / short name of the row kind.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            RowKind::Modifier(_) => "modifier",
            RowKind::Advantage(_) => "advantage",
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            RowKind::Modifier(modifier) => &modifier.name,
            RowKind::Advantage(advantage) => &advantage.name,
        }
    }

    pub fn as_modifier(&self) -> Option<&Modifier> {
        match &self.kind {
            RowKind::Modifier(modifier) => Some(modifier),
            RowKind::Advantage(_) => None,
        }
    }

    pub fn as_modifier_mut(&mut self) -> Option<&mut Modifier> {
        match &mut self.kind {
            RowKind::Modifier(modifier) => Some(modifier),
            RowKind::Advantage(_) => None,
        }
    }

    pub fn as_advantage(&self) -> Option<&Advantage> {
        match &self.kind {
            RowKind::Advantage(advantage) => Some(advantage),
            RowKind::Modifier(_) => None,
        }
    }

    pub fn as_advantage_mut(&mut self) -> Option<&mut Advantage> {
        match &mut self.kind {
            RowKind::Advantage(advantage) => Some(advantage),
            RowKind::Modifier(_) => None,
        }
    }

    /// Notification raised when rows of this kind are added, moved or removed.
    pub fn list_changed_id(&self) -> &'static str {
        match self.kind {
            RowKind::Modifier(_) => ids::MODIFIER_LIST_CHANGED,
            RowKind::Advantage(_) => ids::TRAIT_LIST_CHANGED,
        }
    }

    /// Whether `child` may be placed directly beneath this row.
    ///
    /// Modifiers are leaves. Advantages own modifiers; only containers own
    /// other advantages.
    pub fn accepts_child(&self, child: &Row) -> bool {
        match (&self.kind, &child.kind) {
            (RowKind::Modifier(_), _) => false,
            (RowKind::Advantage(_), RowKind::Modifier(_)) => true,
            (RowKind::Advantage(parent), RowKind::Advantage(_)) => parent.container,
        }
    }

    /// Row-local equivalence: notes plus the variant's field comparison.
    ///
    /// Children are compared by [`RowTree::subtree_equivalent`].
    pub fn is_equivalent_to(&self, other: &Row) -> bool {
        if self.notes != other.notes {
            return false;
        }
        match (&self.kind, &other.kind) {
            (RowKind::Modifier(a), RowKind::Modifier(b)) => a.is_equivalent_to(b),
            (RowKind::Advantage(a), RowKind::Advantage(b)) => a.is_equivalent_to(b),
            _ => false,
        }
    }

    /// Display ordering: name, then notes.
    pub fn display_cmp(&self, other: &Row) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.notes.cmp(&other.notes))
    }

    /// Collect the `@key@` placeholders used by this row.
    ///
    /// Disabled modifiers contribute nothing.
    pub fn fill_with_nameable_keys(&self, keys: &mut BTreeSet<String>) {
        match &self.kind {
            RowKind::Modifier(modifier) => {
                if !modifier.enabled {
                    return;
                }
                extract_nameables(&modifier.name, keys);
            }
            RowKind::Advantage(advantage) => advantage.fill_with_nameable_keys(keys),
        }
        extract_nameables(&self.notes, keys);
    }

    /// Substitute `@key@` placeholders using `values`. Unknown keys are left
    /// intact. Disabled modifiers are not touched.
    pub fn apply_nameable_keys(&mut self, values: &HashMap<String, String>) {
        match &mut self.kind {
            RowKind::Modifier(modifier) => {
                if !modifier.enabled {
                    return;
                }
                modifier.name = apply_nameables(&modifier.name, values);
            }
            RowKind::Advantage(advantage) => advantage.apply_nameable_keys(values),
        }
        self.notes = apply_nameables(&self.notes, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::CostType;

    #[test]
    fn equivalence_ignores_read_only_but_not_enabled() {
        let a = Row::modifier(Modifier::default());
        let mut b = a.clone();
        assert!(a.is_equivalent_to(&b));

        b.as_modifier_mut().unwrap().read_only = true;
        assert!(a.is_equivalent_to(&b));

        b.as_modifier_mut().unwrap().enabled = false;
        assert!(!a.is_equivalent_to(&b));
    }

    #[test]
    fn kinds_are_never_equivalent() {
        let modifier = Row::modifier(Modifier::default());
        let advantage = Row::advantage(Advantage::default());
        assert!(!modifier.is_equivalent_to(&advantage));
    }

    #[test]
    fn display_order_uses_name_then_notes() {
        let a = Row::modifier(Modifier::named("Alpha")).with_notes("z");
        let b = Row::modifier(Modifier::named("Alpha")).with_notes("a");
        let c = Row::modifier(Modifier::named("Beta"));
        assert_eq!(a.display_cmp(&b), Ordering::Greater);
        assert_eq!(b.display_cmp(&c), Ordering::Less);
        // case-sensitive: uppercase sorts before lowercase
        let lower = Row::modifier(Modifier::named("alpha"));
        assert_eq!(a.display_cmp(&lower), Ordering::Less);
    }

    #[test]
    fn nameables_skip_disabled_modifiers() {
        let mut row = Row::modifier(Modifier::named("Bane (@Target@)")).with_notes("vs @Foe@");
        let mut keys = BTreeSet::new();
        row.fill_with_nameable_keys(&mut keys);
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["Foe".to_string(), "Target".to_string()]
        );

        row.as_modifier_mut().unwrap().enabled = false;
        let mut keys = BTreeSet::new();
        row.fill_with_nameable_keys(&mut keys);
        assert!(keys.is_empty());
    }

    #[test]
    fn apply_keeps_unknown_keys() {
        let mut row = Row::modifier(Modifier::named("Bane (@Target@)")).with_notes("@Other@");
        let values = HashMap::from([("Target".to_string(), "Elves".to_string())]);
        row.apply_nameable_keys(&values);
        assert_eq!(row.name(), "Bane (Elves)");
        assert_eq!(row.notes, "@Other@");
    }

    #[test]
    fn containment_rules() {
        let modifier = Row::modifier(Modifier::default().with_cost(CostType::Points, 1));
        let plain = Row::advantage(Advantage::default());
        let container = Row::advantage(Advantage::container("Group"));
        assert!(!modifier.accepts_child(&plain));
        assert!(plain.accepts_child(&modifier));
        assert!(!plain.accepts_child(&container));
        assert!(container.accepts_child(&plain));
    }
}
