//! Integration tests for the weekly timetable.
//!
//! Drives the store, week projection, cell resolver and drop handling
//! together, the way a display shell would.

use chrono::{Duration, NaiveDate, NaiveDateTime, Weekday};
use studyplan_core::schedule::{apply_plan, plan_drop, Slot};
use studyplan_core::{
    apply_drop, CellKind, CellResolver, DragSession, DropOutcome, DropRequest, DropTarget,
    MemoryBackend, NewTimeBlock, PlannerStore, WeekAnchor,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).unwrap()
}

fn slot(day: NaiveDate, hour: u32) -> Slot {
    Slot::new(day, hour).unwrap()
}

#[test]
fn add_then_delete_removes_exactly_one() {
    let mut store = PlannerStore::new();
    let d = date(2024, 1, 1);
    store.add_time_block(NewTimeBlock::new("Other", at(d, 13, 0), at(d, 14, 0)));
    let id = store.add_time_block(NewTimeBlock::new("Study", at(d, 9, 0), at(d, 10, 0)));
    assert_eq!(store.time_block(&id).unwrap().day, d);
    let before = store.time_blocks().len();

    store.delete_time_block(&id);

    assert_eq!(store.time_blocks().len(), before - 1);
    assert!(store.time_blocks().iter().all(|b| b.id != id));
}

#[test]
fn move_two_hour_block_into_empty_cell() {
    let mut store = PlannerStore::new();
    let d1 = date(2024, 1, 1);
    let d2 = date(2024, 1, 2);
    let id = store.add_time_block(NewTimeBlock::new("Calculus", at(d1, 9, 0), at(d1, 11, 0)).with_color("teal"));

    let outcome = apply_drop(&mut store, &DropRequest::onto_cell(&id, slot(d2, 14)));
    assert_eq!(outcome, DropOutcome::Moved { id: id.clone() });

    let block = store.time_block(&id).unwrap();
    assert_eq!(block.start, at(d2, 14, 0));
    assert_eq!(block.end, at(d2, 16, 0));
    assert_eq!(block.day, d2);
    assert_eq!(block.title, "Calculus");
    assert_eq!(block.color.as_deref(), Some("teal"));
}

#[test]
fn swap_two_blocks_across_days() {
    let mut store = PlannerStore::new();
    let mon = date(2024, 1, 1);
    let thu = date(2024, 1, 4);
    let a = store.add_time_block(NewTimeBlock::new("Physics", at(mon, 9, 0), at(mon, 11, 0)));
    let b = store.add_time_block(NewTimeBlock::new("French", at(thu, 16, 30), at(thu, 17, 0)));

    let outcome = apply_drop(&mut store, &DropRequest::onto_block(&a, &b));
    assert_eq!(
        outcome,
        DropOutcome::Swapped {
            moved: a.clone(),
            target: b.clone()
        }
    );

    let moved = store.time_block(&a).unwrap();
    assert_eq!(moved.start, at(thu, 16, 30));
    assert_eq!(moved.end, at(thu, 18, 30));
    assert_eq!(moved.day, thu);

    let target = store.time_block(&b).unwrap();
    assert_eq!(target.start, at(mon, 9, 0));
    assert_eq!(target.end, at(mon, 9, 30));
    assert_eq!(target.day, mon);
}

#[test]
fn self_drop_changes_nothing() {
    let mut store = PlannerStore::new();
    let d = date(2024, 1, 1);
    let id = store.add_time_block(NewTimeBlock::new("Study", at(d, 9, 0), at(d, 10, 0)));
    let before = store.snapshot();
    let revision = store.revision();

    let outcome = apply_drop(&mut store, &DropRequest::onto_block(&id, &id));

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(store.revision(), revision);
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn swap_with_vanished_target_keeps_first_update() {
    let mut store = PlannerStore::new();
    let d = date(2024, 1, 1);
    let a = store.add_time_block(NewTimeBlock::new("A", at(d, 9, 0), at(d, 10, 0)));
    let b = store.add_time_block(NewTimeBlock::new("B", at(d, 15, 0), at(d, 17, 0)));

    let plan = plan_drop(store.time_blocks(), &DropRequest::onto_block(&a, &b));
    store.delete_time_block(&b);
    let outcome = apply_plan(&mut store, plan);

    assert_eq!(
        outcome,
        DropOutcome::PartiallySwapped {
            moved: a.clone(),
            missing: b
        }
    );
    let moved = store.time_block(&a).unwrap();
    assert_eq!(moved.start, at(d, 15, 0));
    assert_eq!(moved.end, at(d, 16, 0));
}

#[test]
fn week_view_reflects_every_mutation() {
    let backend = MemoryBackend::default();
    let mut store = PlannerStore::open(backend.clone()).unwrap();
    let anchor = WeekAnchor::new(date(2024, 1, 3), Weekday::Mon);
    let mon = date(2024, 1, 1);
    let next_mon = date(2024, 1, 8);

    let id = store.add_time_block(NewTimeBlock::new("Revision", at(mon, 9, 0), at(mon, 11, 0)));

    let projection = anchor.project(store.time_blocks());
    let resolver = CellResolver::for_week(&projection);
    assert_eq!(resolver.resolve(slot(mon, 9)).kind(), CellKind::Occupied);
    assert_eq!(resolver.resolve(slot(mon, 10)).kind(), CellKind::Spanned);
    assert_eq!(resolver.resolve(slot(mon, 11)).kind(), CellKind::Empty);

    apply_drop(&mut store, &DropRequest::onto_cell(&id, slot(next_mon, 9)));

    let this_week = anchor.project(store.time_blocks());
    assert!(this_week.blocks.is_empty());
    let next_week = anchor.next().unwrap().project(store.time_blocks());
    assert_eq!(next_week.blocks.len(), 1);

    let saved = backend.saved().unwrap();
    assert_eq!(saved.time_blocks[0].day, next_mon);
}

#[test]
fn drag_session_feeds_the_engine() {
    let mut store = PlannerStore::new();
    let d = date(2024, 1, 1);
    let id = store.add_time_block(NewTimeBlock::new("Essay", at(d, 9, 0), at(d, 10, 0)));

    let mut drag = DragSession::new();
    drag.start(&id);
    drag.over(DropTarget::Cell(slot(d, 20)));
    let request = drag.end().unwrap();
    apply_drop(&mut store, &request);

    assert_eq!(store.time_block(&id).unwrap().start, at(d, 20, 0));
}

#[test]
fn late_block_clamps_instead_of_crossing_midnight() {
    let mut store = PlannerStore::new();
    let d = date(2024, 1, 1);
    let id = store.add_time_block(NewTimeBlock::with_duration("Late", at(d, 23, 0), Duration::hours(3)));
    let block = store.time_block(&id).unwrap();
    assert_eq!(block.end, d.and_hms_opt(23, 59, 59).unwrap());
    assert_eq!(block.day, d);
}

#[test]
fn drop_onto_occupied_cell_is_refused() {
    let mut store = PlannerStore::new();
    let d = date(2024, 1, 1);
    let a = store.add_time_block(NewTimeBlock::new("A", at(d, 9, 0), at(d, 10, 0)));
    store.add_time_block(NewTimeBlock::new("B", at(d, 13, 0), at(d, 16, 0)));
    let revision = store.revision();

    for hour in [13, 14, 15] {
        let outcome = apply_drop(&mut store, &DropRequest::onto_cell(&a, slot(d, hour)));
        assert_eq!(outcome, DropOutcome::Unchanged);
    }
    assert_eq!(store.revision(), revision);
    assert_eq!(store.time_block(&a).unwrap().start, at(d, 9, 0));
}

#[test]
fn last_second_start_fails_validation() {
    let d = date(2024, 1, 1);
    let late = NewTimeBlock::new(
        "Late",
        d.and_hms_opt(23, 59, 59).unwrap(),
        date(2024, 1, 2).and_hms_opt(0, 30, 0).unwrap(),
    );
    assert!(late.validate().is_err());
}
