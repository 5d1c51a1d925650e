//! Borrow-scoped row editors.
//!
//! Each setter compares old and new values, writes only on change, and raises
//! the matching notification once. Setters return `true` when the row changed.

use super::Document;
use crate::advantage::Advantage;
use crate::feature::Feature;
use crate::modifier::{Affects, CostType, Modifier};
use crate::row::{Row, RowId};

/// Editor for one modifier row, obtained from [`Document::modifier_mut`].
///
/// Modifiers flagged `read_only` refuse every edit.
pub struct ModifierEditor<'a> {
    doc: &'a mut Document,
    id: RowId,
}

impl<'a> ModifierEditor<'a> {
    pub(super) fn new(doc: &'a mut Document, id: RowId) -> Self {
        Self { doc, id }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn get(&self) -> Option<&Modifier> {
        self.doc.tree.get(self.id).and_then(Row::as_modifier)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update(|m| m.name = name)
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) -> bool {
        let reference = reference.into();
        self.update(|m| m.reference = reference)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.update(|m| m.enabled = enabled)
    }

    pub fn set_cost_type(&mut self, cost_type: CostType) -> bool {
        self.update(|m| m.cost_type = cost_type)
    }

    pub fn set_cost(&mut self, cost: i32) -> bool {
        self.update(|m| m.cost = cost)
    }

    /// Non-finite factors are refused.
    pub fn set_cost_multiplier(&mut self, multiplier: f64) -> bool {
        if !multiplier.is_finite() {
            tracing::warn!(row = %self.id, multiplier, "Refusing non-finite cost multiplier");
            return false;
        }
        self.update(|m| m.cost_multiplier = multiplier)
    }

    /// Negative values clamp to zero.
    pub fn set_levels(&mut self, levels: i32) -> bool {
        self.update(|m| m.set_levels(levels))
    }

    pub fn set_affects(&mut self, affects: Affects) -> bool {
        self.update(|m| m.affects = affects)
    }

    /// Overwrite every persisted field from `source` (e.g. undo). Each
    /// affected notification is raised once.
    pub fn restore(&mut self, source: &Modifier) -> bool {
        let source = source.clone();
        self.update(move |m| {
            let read_only = m.read_only;
            *m = source;
            m.read_only = read_only;
        })
    }

    fn update(&mut self, edit: impl FnOnce(&mut Modifier)) -> bool {
        let id = self.id;
        let Some(modifier) = self.doc.tree.get_mut(id).and_then(Row::as_modifier_mut) else {
            return false;
        };
        if modifier.read_only {
            tracing::warn!(row = %id, "Refusing to edit a read-only modifier");
            return false;
        }
        let before = modifier.clone();
        edit(modifier);
        let changed = before.diff(modifier);
        if changed.is_empty() {
            return false;
        }
        self.doc.emit_all(&changed.notification_ids(), Some(id));
        true
    }
}

/// Editor for one advantage row, obtained from [`Document::advantage_mut`].
pub struct AdvantageEditor<'a> {
    doc: &'a mut Document,
    id: RowId,
}

impl<'a> AdvantageEditor<'a> {
    pub(super) fn new(doc: &'a mut Document, id: RowId) -> Self {
        Self { doc, id }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn get(&self) -> Option<&Advantage> {
        self.doc.tree.get(self.id).and_then(Row::as_advantage)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update(|a| a.name = name)
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) -> bool {
        let reference = reference.into();
        self.update(|a| a.reference = reference)
    }

    pub fn set_base_points(&mut self, points: i32) -> bool {
        self.update(|a| a.base_points = points)
    }

    pub fn set_points_per_level(&mut self, points: i32) -> bool {
        self.update(|a| a.points_per_level = points)
    }

    /// Negative values clamp to zero.
    pub fn set_levels(&mut self, levels: i32) -> bool {
        self.update(|a| a.set_levels(levels))
    }

    pub fn set_round_down(&mut self, round_down: bool) -> bool {
        self.update(|a| a.round_down = round_down)
    }

    /// Turning a container back into a plain advantage is refused while it
    /// still holds child advantages.
    pub fn set_container(&mut self, container: bool) -> bool {
        if !container && self.has_child_advantages() {
            tracing::warn!(row = %self.id, "Container still holds advantages");
            return false;
        }
        self.update(|a| a.container = container)
    }

    pub fn add_feature(&mut self, feature: Feature) -> bool {
        self.update(|a| a.features.push(feature))
    }

    /// Remove the feature at `index`, returning it.
    pub fn remove_feature(&mut self, index: usize) -> Option<Feature> {
        let mut removed = None;
        self.update(|a| {
            if index < a.features.len() {
                removed = Some(a.features.remove(index));
            }
        });
        removed
    }

    pub fn set_features(&mut self, features: Vec<Feature>) -> bool {
        self.update(|a| a.features = features)
    }

    fn has_child_advantages(&self) -> bool {
        self.doc
            .tree
            .children(self.id)
            .iter()
            .any(|&child| self.doc.tree.get(child).and_then(Row::as_advantage).is_some())
    }

    fn update(&mut self, edit: impl FnOnce(&mut Advantage)) -> bool {
        let id = self.id;
        let Some(advantage) = self.doc.tree.get_mut(id).and_then(Row::as_advantage_mut) else {
            return false;
        };
        let before = advantage.clone();
        edit(advantage);
        let changed = before.diff(advantage);
        if changed.is_empty() {
            return false;
        }
        self.doc.emit_all(&changed.notification_ids(), Some(id));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use crate::feature::{Attribute, LeveledAmount};
    use crate::notify::{DeferredEdits, IdFilter, Notification, ids};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(doc: &mut Document) -> Rc<RefCell<Vec<&'static str>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        doc.observe(
            move |event: &Notification, _: &mut DeferredEdits| sink.borrow_mut().push(event.id),
            IdFilter::all(),
        );
        log
    }

    #[test]
    fn setters_notify_once_and_skip_no_ops() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        let id = doc.add_root(Modifier::default()).unwrap();
        let log = recording(&mut doc);

        let mut editor = doc.modifier_mut(id).unwrap();
        assert!(editor.set_cost(10));
        assert!(!editor.set_cost(10));
        assert!(!editor.set_levels(-4));
        assert!(editor.set_enabled(false));
        assert!(editor.set_name("Renamed"));

        assert_eq!(
            *log.borrow(),
            vec![ids::MODIFIER_COST, ids::MODIFIER_ENABLED, ids::MODIFIER_NAME]
        );
    }

    #[test]
    fn read_only_modifiers_refuse_edits() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        let mut inherited = Modifier::named("Inherited");
        inherited.read_only = true;
        let id = doc.add_root(inherited).unwrap();
        let log = recording(&mut doc);

        assert!(!doc.modifier_mut(id).unwrap().set_cost(5));
        assert!(!doc.set_notes(id, "nope").unwrap());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn non_finite_multipliers_are_refused() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        let id = doc.add_root(Modifier::named("x2").with_multiplier(2.0)).unwrap();
        let log = recording(&mut doc);

        let mut editor = doc.modifier_mut(id).unwrap();
        assert!(!editor.set_cost_multiplier(f64::NAN));
        assert!(!editor.set_cost_multiplier(f64::NAN));
        assert!(!editor.set_cost_multiplier(f64::INFINITY));
        assert_eq!(editor.get().unwrap().cost_multiplier, 2.0);
        assert!(editor.set_cost_multiplier(1.5));

        assert_eq!(*log.borrow(), vec![ids::MODIFIER_COST]);
    }

    #[test]
    fn restore_raises_each_id_once() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        let id = doc.add_root(Modifier::default()).unwrap();
        let log = recording(&mut doc);

        let snapshot = Modifier::named("Snapshot")
            .with_cost(CostType::Points, 3)
            .with_levels(2);
        assert!(doc.modifier_mut(id).unwrap().restore(&snapshot));
        assert_eq!(
            *log.borrow(),
            vec![ids::MODIFIER_NAME, ids::MODIFIER_COST]
        );
    }

    #[test]
    fn advantage_editor_features() {
        let mut doc = Document::new(DocumentKind::AdvantageList);
        let id = doc.add_root(Advantage::named("Strong")).unwrap();
        let log = recording(&mut doc);

        let bonus = Feature::attribute_bonus(Attribute::St, LeveledAmount::flat(2));
        let mut editor = doc.advantage_mut(id).unwrap();
        assert!(editor.add_feature(bonus.clone()));
        assert_eq!(editor.remove_feature(3), None);
        assert_eq!(editor.remove_feature(0), Some(bonus));
        assert!(editor.set_levels(2));

        assert_eq!(
            *log.borrow(),
            vec![ids::TRAIT_FEATURES, ids::TRAIT_FEATURES, ids::TRAIT_POINTS]
        );
    }

    #[test]
    fn container_with_members_stays_container() {
        let mut doc = Document::new(DocumentKind::AdvantageList);
        let group = doc.add_root(Advantage::container("Group")).unwrap();
        doc.add_child(group, Advantage::named("Member")).unwrap();
        assert!(!doc.advantage_mut(group).unwrap().set_container(false));
        assert!(doc.advantage_mut(group).unwrap().get().unwrap().container);
    }

    #[test]
    fn wrong_kind_editor_is_rejected() {
        let mut doc = Document::new(DocumentKind::AdvantageList);
        let id = doc.add_root(Advantage::default()).unwrap();
        assert!(doc.modifier_mut(id).is_err());
    }
}
