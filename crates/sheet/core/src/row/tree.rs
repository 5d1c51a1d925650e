//! Arena-backed row forest.

use super::{Row, RowId};
use crate::error::{ErrorSeverity, SheetError};

/// Errors returned by structural tree operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("row {0} does not exist")]
    RowNotFound(RowId),

    #[error("cannot move row {row} beneath itself or its descendant {parent}")]
    Cycle { row: RowId, parent: RowId },

    #[error("index {index} is out of bounds for a list of {len} rows")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("a {kind} row cannot be placed {}", placement(.parent))]
    KindMismatch {
        parent: Option<RowId>,
        kind: &'static str,
    },

    #[error("row {row} is not a {expected}")]
    WrongKind { row: RowId, expected: &'static str },
}

fn placement(parent: &Option<RowId>) -> String {
    match parent {
        Some(parent) => format!("beneath row {parent}"),
        None => "at the top level of this document".to_string(),
    }
}

impl SheetError for TreeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RowNotFound(_) => ErrorSeverity::Internal,
            Self::Cycle { .. } | Self::KindMismatch { .. } | Self::WrongKind { .. } => {
                ErrorSeverity::Validation
            }
            Self::IndexOutOfBounds { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RowNotFound(_) => "TREE_ROW_NOT_FOUND",
            Self::Cycle { .. } => "TREE_CYCLE",
            Self::IndexOutOfBounds { .. } => "TREE_INDEX_OUT_OF_BOUNDS",
            Self::KindMismatch { .. } => "TREE_KIND_MISMATCH",
            Self::WrongKind { .. } => "TREE_WRONG_KIND",
        }
    }
}

/// A row removed from (or not yet inserted into) a tree, owning its subtree.
#[derive(Clone, Debug)]
pub struct DetachedRow {
    pub row: Row,
    pub children: Vec<DetachedRow>,
}

impl DetachedRow {
    pub fn new(row: impl Into<Row>) -> Self {
        Self {
            row: row.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: impl Into<DetachedRow>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Number of rows in this subtree, including the root.
    pub fn row_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DetachedRow::row_count)
            .sum::<usize>()
    }
}

impl From<Row> for DetachedRow {
    fn from(row: Row) -> Self {
        DetachedRow::new(row)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    row: Row,
    parent: Option<RowId>,
    children: Vec<RowId>,
}

/// Ordered forest of rows addressed by [`RowId`].
///
/// Slots of removed rows stay vacant so handles are never reused.
#[derive(Clone, Debug, Default)]
pub struct RowTree {
    slots: Vec<Option<Slot>>,
    roots: Vec<RowId>,
    live: usize,
}

impl RowTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently in the tree.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.slot(id).is_some()
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.slot(id).map(|slot| &slot.row)
    }

    pub fn get_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.slot_mut(id).map(|slot| &mut slot.row)
    }

    pub fn row(&self, id: RowId) -> Result<&Row, TreeError> {
        self.get(id).ok_or(TreeError::RowNotFound(id))
    }

    pub fn row_mut(&mut self, id: RowId) -> Result<&mut Row, TreeError> {
        self.get_mut(id).ok_or(TreeError::RowNotFound(id))
    }

    pub fn roots(&self) -> &[RowId] {
        &self.roots
    }

    /// Children of `id`, empty when the row does not exist.
    pub fn children(&self, id: RowId) -> &[RowId] {
        self.slot(id).map_or(&[], |slot| slot.children.as_slice())
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    pub fn child_list(&self, parent: Option<RowId>) -> Result<&[RowId], TreeError> {
        match parent {
            None => Ok(&self.roots),
            Some(id) => self
                .slot(id)
                .map(|slot| slot.children.as_slice())
                .ok_or(TreeError::RowNotFound(id)),
        }
    }

    pub fn parent(&self, id: RowId) -> Option<RowId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: RowId) -> Vec<RowId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    /// True when `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_self_or_ancestor(&self, ancestor: RowId, id: RowId) -> bool {
        ancestor == id || self.ancestors(id).contains(&ancestor)
    }

    /// Insert `row` beneath `parent` (or at top level) at `index`, or at the
    /// end when `index` is `None`.
    pub fn insert(
        &mut self,
        parent: Option<RowId>,
        index: Option<usize>,
        row: Row,
    ) -> Result<RowId, TreeError> {
        self.check_placement(parent, index, &row)?;
        let id = self.allocate(row, parent);
        self.attach(id, parent, index);
        Ok(id)
    }

    /// Append `row` beneath `parent`.
    pub fn push(&mut self, parent: Option<RowId>, row: Row) -> Result<RowId, TreeError> {
        self.insert(parent, None, row)
    }

    /// Insert a detached subtree, assigning fresh handles to every row.
    ///
    /// All or nothing: if any descendant is rejected, the rows inserted so far
    /// are removed again before the error is returned.
    pub fn insert_subtree(
        &mut self,
        parent: Option<RowId>,
        index: Option<usize>,
        subtree: DetachedRow,
    ) -> Result<RowId, TreeError> {
        let DetachedRow { row, children } = subtree;
        let id = self.insert(parent, index, row)?;
        if let Err(err) = self.insert_children(id, children) {
            self.remove(id)?;
            return Err(err);
        }
        Ok(id)
    }

    fn insert_children(&mut self, id: RowId, children: Vec<DetachedRow>) -> Result<(), TreeError> {
        for child in children {
            let DetachedRow { row, children } = child;
            let child_id = self.insert(Some(id), None, row)?;
            self.insert_children(child_id, children)?;
        }
        Ok(())
    }

    /// Move `id` beneath `new_parent` at `index` (end when `None`).
    ///
    /// The row is detached from its old parent before it is attached to the
    /// new one, so `index` refers to the destination list without the row.
    pub fn move_row(
        &mut self,
        id: RowId,
        new_parent: Option<RowId>,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::RowNotFound(id));
        }
        if let Some(parent) = new_parent {
            if !self.contains(parent) {
                return Err(TreeError::RowNotFound(parent));
            }
            if self.is_self_or_ancestor(id, parent) {
                return Err(TreeError::Cycle { row: id, parent });
            }
            let row = self.row(id)?;
            if !self.row(parent)?.accepts_child(row) {
                return Err(TreeError::KindMismatch {
                    parent: Some(parent),
                    kind: row.kind_name(),
                });
            }
        }

        let old_parent = self.parent(id);
        let old_index = self
            .child_list(old_parent)?
            .iter()
            .position(|&child| child == id);

        self.detach(id);
        let len = self.child_list(new_parent)?.len();
        if let Some(index) = index.filter(|&index| index > len) {
            // restore the original position before reporting
            self.attach(id, old_parent, old_index);
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.attach(id, new_parent, index);
        Ok(())
    }

    /// Remove `id` and its subtree, returning them by value.
    pub fn remove(&mut self, id: RowId) -> Result<DetachedRow, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::RowNotFound(id));
        }
        self.detach(id);
        Ok(self.take_subtree(id))
    }

    /// Deep copy of the subtree rooted at `id`.
    ///
    /// Rows are copied with their own `Clone`, so transient state such as a
    /// modifier's `read_only` flag is not carried over.
    pub fn clone_subtree(&self, id: RowId) -> Result<DetachedRow, TreeError> {
        let slot = self.slot(id).ok_or(TreeError::RowNotFound(id))?;
        let children = slot
            .children
            .iter()
            .map(|&child| self.clone_subtree(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DetachedRow {
            row: slot.row.clone(),
            children,
        })
    }

    /// Every row in pre-order, roots in order.
    pub fn walk(&self) -> Vec<RowId> {
        let mut out = Vec::with_capacity(self.live);
        for &root in &self.roots {
            self.walk_into(root, &mut out);
        }
        out
    }

    /// `id` and its descendants in pre-order.
    pub fn walk_from(&self, id: RowId) -> Vec<RowId> {
        let mut out = Vec::new();
        if self.contains(id) {
            self.walk_into(id, &mut out);
        }
        out
    }

    /// Nesting depth of `id`; top-level rows are at depth 0.
    pub fn depth(&self, id: RowId) -> usize {
        self.ancestors(id).len()
    }

    /// Sort the children of `parent` (or the roots) by display order.
    /// The sort is stable.
    pub fn sort_children(&mut self, parent: Option<RowId>) -> Result<(), TreeError> {
        let mut ids = self.child_list(parent)?.to_vec();
        ids.sort_by(|&a, &b| match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.display_cmp(b),
            _ => std::cmp::Ordering::Equal,
        });
        match parent {
            None => self.roots = ids,
            Some(id) => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.children = ids;
                }
            }
        }
        Ok(())
    }

    /// Structural equivalence of two subtrees, possibly in different trees.
    pub fn subtree_equivalent(&self, id: RowId, other: &RowTree, other_id: RowId) -> bool {
        let (Some(a), Some(b)) = (self.slot(id), other.slot(other_id)) else {
            return false;
        };
        a.row.is_equivalent_to(&b.row)
            && a.children.len() == b.children.len()
            && a
                .children
                .iter()
                .zip(&b.children)
                .all(|(&x, &y)| self.subtree_equivalent(x, other, y))
    }

    /// Structural equivalence of two whole forests.
    pub fn is_equivalent_to(&self, other: &RowTree) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(&a, &b)| self.subtree_equivalent(a, other, b))
    }

    // ===== internals =====

    fn slot(&self, id: RowId) -> Option<&Slot> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: RowId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn check_placement(
        &self,
        parent: Option<RowId>,
        index: Option<usize>,
        row: &Row,
    ) -> Result<(), TreeError> {
        if let Some(parent) = parent {
            let parent_row = self.row(parent)?;
            if !parent_row.accepts_child(row) {
                return Err(TreeError::KindMismatch {
                    parent: Some(parent),
                    kind: row.kind_name(),
                });
            }
        }
        let len = self.child_list(parent)?.len();
        match index {
            Some(index) if index > len => Err(TreeError::IndexOutOfBounds { index, len }),
            _ => Ok(()),
        }
    }

    fn allocate(&mut self, row: Row, parent: Option<RowId>) -> RowId {
        let id = RowId(self.slots.len() as u32);
        self.slots.push(Some(Slot {
            row,
            parent,
            children: Vec::new(),
        }));
        self.live += 1;
        id
    }

    fn attach(&mut self, id: RowId, parent: Option<RowId>, index: Option<usize>) {
        if let Some(slot) = self.slot_mut(id) {
            slot.parent = parent;
        }
        let list = match parent {
            None => &mut self.roots,
            Some(parent) => match self.slots.get_mut(parent.0 as usize).and_then(Option::as_mut) {
                Some(slot) => &mut slot.children,
                None => return,
            },
        };
        let at = index.unwrap_or(list.len()).min(list.len());
        list.insert(at, id);
    }

    fn detach(&mut self, id: RowId) {
        let parent = self.parent(id);
        let list = match parent {
            None => &mut self.roots,
            Some(parent) => match self.slots.get_mut(parent.0 as usize).and_then(Option::as_mut) {
                Some(slot) => &mut slot.children,
                None => return,
            },
        };
        list.retain(|&child| child != id);
        if let Some(slot) = self.slot_mut(id) {
            slot.parent = None;
        }
    }

    fn take_subtree(&mut self, id: RowId) -> DetachedRow {
        let slot = self.slots[id.0 as usize].take();
        let Some(Slot { row, children, .. }) = slot else {
            return DetachedRow::new(Row::default());
        };
        self.live -= 1;
        let children = children
            .into_iter()
            .map(|child| self.take_subtree(child))
            .collect();
        DetachedRow { row, children }
    }

    fn walk_into(&self, id: RowId, out: &mut Vec<RowId>) {
        out.push(id);
        for &child in self.children(id) {
            self.walk_into(child, out);
        }
    }
}
