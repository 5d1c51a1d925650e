use std::cell::RefCell;
use std::rc::Rc;

use sheet_core::notify::ids;
use sheet_core::{
    Advantage, CostType, DeferredEdits, Document, DocumentKind, IdFilter, Modifier, Notification,
    RowId,
};

type Log = Rc<RefCell<Vec<(&'static str, Option<RowId>)>>>;

fn observe(doc: &mut Document, filter: IdFilter) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    doc.observe(
        move |event: &Notification, _: &mut DeferredEdits| {
            sink.borrow_mut().push((event.id, event.row));
        },
        filter,
    );
    log
}

#[test]
fn each_changed_setter_notifies_exactly_once() {
    let mut doc = Document::new(DocumentKind::ModifierList);
    let id = doc.add_root(Modifier::default()).unwrap();
    let log = observe(&mut doc, IdFilter::new([ids::MODIFIER_PREFIX]));

    {
        let mut editor = doc.modifier_mut(id).unwrap();
        assert!(editor.set_cost_type(CostType::Points));
        assert!(!editor.set_cost_type(CostType::Points));
        assert!(editor.set_reference("B121"));
        assert!(!editor.set_reference("B121"));
        assert!(editor.set_cost_multiplier(3.0));
    }

    assert_eq!(
        *log.borrow(),
        vec![
            (ids::MODIFIER_COST, Some(id)),
            (ids::MODIFIER_REFERENCE, Some(id)),
            (ids::MODIFIER_COST, Some(id)),
        ]
    );
}

#[test]
fn filters_route_by_prefix() {
    let mut doc = Document::new(DocumentKind::AdvantageList);
    let trait_id = doc.add_root(Advantage::named("Fit")).unwrap();
    let modifier_id = doc.add_child(trait_id, Modifier::default()).unwrap();

    let trait_log = observe(&mut doc, IdFilter::new([ids::TRAIT_PREFIX]));
    let notes_log = observe(&mut doc, IdFilter::new([ids::ROW_NOTES]));

    doc.advantage_mut(trait_id).unwrap().set_base_points(5);
    doc.modifier_mut(modifier_id).unwrap().set_cost(10);
    doc.set_notes(modifier_id, "stacking").unwrap();

    assert_eq!(*trait_log.borrow(), vec![(ids::TRAIT_POINTS, Some(trait_id))]);
    assert_eq!(*notes_log.borrow(), vec![(ids::ROW_NOTES, Some(modifier_id))]);
}

#[test]
fn batch_collapses_duplicates_until_outermost_end() {
    let mut doc = Document::new(DocumentKind::ModifierList);
    let id = doc.add_root(Modifier::default()).unwrap();
    let log = observe(&mut doc, IdFilter::all());

    doc.batch(|doc| {
        doc.modifier_mut(id).unwrap().set_cost(1);
        doc.batch(|doc| {
            doc.modifier_mut(id).unwrap().set_cost(2);
            doc.modifier_mut(id).unwrap().set_enabled(false);
        });
        doc.modifier_mut(id).unwrap().set_levels(3);
    });

    assert_eq!(
        *log.borrow(),
        vec![
            (ids::MODIFIER_COST, Some(id)),
            (ids::MODIFIER_ENABLED, Some(id)),
        ]
    );
}

#[test]
fn disabled_notifier_suppresses_bulk_edits() {
    let mut doc = Document::new(DocumentKind::ModifierList);
    let log = observe(&mut doc, IdFilter::all());

    doc.notifier_mut().set_enabled(false);
    for _ in 0..3 {
        doc.add_root(Modifier::default()).unwrap();
    }
    doc.notifier_mut().set_enabled(true);
    assert!(log.borrow().is_empty());

    doc.add_root(Modifier::default()).unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn observer_edits_run_after_dispatch() {
    let mut doc = Document::new(DocumentKind::AdvantageList);
    let id = doc.add_root(Advantage::named("Base")).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));

    // First observer reacts to a name change by queueing a points edit.
    let first = Rc::clone(&order);
    doc.observe(
        move |event: &Notification, deferred: &mut DeferredEdits| {
            first.borrow_mut().push(format!("first:{}", event.id));
            if event.id == ids::TRAIT_NAME {
                let row = event.row;
                deferred.push(move |doc: &mut Document| {
                    if let Some(row) = row {
                        doc.advantage_mut(row).unwrap().set_base_points(7);
                    }
                });
            }
        },
        IdFilter::all(),
    );
    let second = Rc::clone(&order);
    doc.observe(
        move |event: &Notification, _: &mut DeferredEdits| {
            second.borrow_mut().push(format!("second:{}", event.id));
        },
        IdFilter::all(),
    );

    doc.advantage_mut(id).unwrap().set_name("Renamed");

    assert_eq!(
        *order.borrow(),
        vec![
            "first:trait.name".to_string(),
            "second:trait.name".to_string(),
            "first:trait.points".to_string(),
            "second:trait.points".to_string(),
        ]
    );
    assert_eq!(doc.row(id).unwrap().as_advantage().unwrap().base_points, 7);
}

#[test]
fn structural_edits_raise_list_changed() {
    let mut doc = Document::new(DocumentKind::AdvantageList);
    let log = observe(&mut doc, IdFilter::all());

    let group = doc.add_root(Advantage::container("Group")).unwrap();
    let member = doc.add_root(Advantage::named("Member")).unwrap();
    let modifier = doc.add_child(member, Modifier::default()).unwrap();
    doc.move_row(member, Some(group), None).unwrap();
    doc.remove(modifier).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            (ids::TRAIT_LIST_CHANGED, Some(group)),
            (ids::TRAIT_LIST_CHANGED, Some(member)),
            (ids::MODIFIER_LIST_CHANGED, Some(modifier)),
            (ids::TRAIT_LIST_CHANGED, Some(member)),
            (ids::MODIFIER_LIST_CHANGED, Some(modifier)),
        ]
    );
}

#[test]
fn save_stamp_notifies_version_change() {
    let mut doc = Document::new(DocumentKind::AdvantageList);
    doc.set_schema_version(1);
    let log = observe(&mut doc, IdFilter::new(["document"]));

    doc.mark_saved();
    doc.mark_saved();
    assert_eq!(*log.borrow(), vec![(ids::DOCUMENT_VERSION, None)]);
}
