//! Property tests for block placement and drop handling.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use studyplan_core::{
    apply_drop, end_of_day, DropRequest, NewTimeBlock, PlannerStore, Slot, WeekProjection,
};

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i64::from(offset))
}

proptest! {
    #[test]
    fn stored_blocks_always_end_after_start(
        d in 0u32..60,
        hour in 0u32..24,
        minute in 0u32..60,
        minutes in 1i64..(26 * 60),
    ) {
        let start = day(d).and_hms_opt(hour, minute, 0).unwrap();
        let mut store = PlannerStore::new();
        let id = store.add_time_block(NewTimeBlock::with_duration("p", start, Duration::minutes(minutes)));
        let block = store.time_block(&id).unwrap();
        prop_assert!(block.end > block.start);
        prop_assert_eq!(block.end.date(), block.start.date());
        prop_assert_eq!(block.day, block.start.date());
    }

    #[test]
    fn validated_blocks_end_after_start_to_the_nanosecond(
        d in 0u32..60,
        second_of_day in 0u32..86_400,
        nanos in 0u32..1_000_000_000,
        length_millis in 1i64..(26 * 3_600_000),
    ) {
        let start = day(d)
            .and_hms_nano_opt(second_of_day / 3600, (second_of_day / 60) % 60, second_of_day % 60, nanos)
            .unwrap();
        let new = NewTimeBlock::with_duration("p", start, Duration::milliseconds(length_millis));
        prop_assume!(new.validate().is_ok());

        let mut store = PlannerStore::new();
        let id = store.add_time_block(new);
        let block = store.time_block(&id).unwrap();
        prop_assert!(block.end > block.start);
        prop_assert!(block.end <= end_of_day(block.day));
    }

    #[test]
    fn cell_move_preserves_duration_when_it_fits(
        from_hour in 0u32..12,
        length in 1i64..=12,
        to_day in 0u32..14,
        to_hour in 0u32..12,
    ) {
        let start = day(0).and_hms_opt(from_hour, 0, 0).unwrap();
        let mut store = PlannerStore::new();
        let id = store.add_time_block(NewTimeBlock::with_duration("p", start, Duration::hours(length)));
        let slot = Slot::new(day(to_day), to_hour).unwrap();

        apply_drop(&mut store, &DropRequest::onto_cell(&id, slot));

        let block = store.time_block(&id).unwrap();
        prop_assert_eq!(block.duration(), Duration::hours(length));
        prop_assert_eq!(block.start, slot.boundary());
        prop_assert_eq!(block.day, day(to_day));
    }

    #[test]
    fn swap_exchanges_starts_and_days(
        a_day in 0u32..7,
        a_hour in 0u32..12,
        a_len in 1i64..=10,
        b_day in 0u32..7,
        b_hour in 0u32..12,
        b_len in 1i64..=10,
    ) {
        let a_start = day(a_day).and_hms_opt(a_hour, 0, 0).unwrap();
        let b_start = day(b_day).and_hms_opt(b_hour, 0, 0).unwrap();
        let mut store = PlannerStore::new();
        let a = store.add_time_block(NewTimeBlock::with_duration("a", a_start, Duration::hours(a_len)));
        let b = store.add_time_block(NewTimeBlock::with_duration("b", b_start, Duration::hours(b_len)));

        apply_drop(&mut store, &DropRequest::onto_block(&a, &b));

        let moved = store.time_block(&a).unwrap();
        let target = store.time_block(&b).unwrap();
        prop_assert_eq!(moved.start, b_start);
        prop_assert_eq!(moved.day, day(b_day));
        prop_assert_eq!(moved.duration(), Duration::hours(a_len));
        prop_assert_eq!(target.start, a_start);
        prop_assert_eq!(target.day, day(a_day));
        prop_assert_eq!(target.duration(), Duration::hours(b_len));
    }

    #[test]
    fn projection_keeps_exactly_the_week_days(
        anchor in 0u32..60,
        offsets in prop::collection::vec(0u32..60, 0..20),
    ) {
        let mut store = PlannerStore::new();
        for offset in &offsets {
            let start = day(*offset).and_hms_opt(9, 0, 0).unwrap();
            store.add_time_block(NewTimeBlock::with_duration("p", start, Duration::hours(1)));
        }
        let projection = WeekProjection::compute(day(anchor), Weekday::Mon, store.time_blocks());
        let again = WeekProjection::compute(day(anchor), Weekday::Mon, store.time_blocks());

        prop_assert_eq!(&projection, &again);
        prop_assert_eq!(projection.days[0].weekday(), Weekday::Mon);
        let expected = store.time_blocks().iter().filter(|b| projection.days.contains(&b.day)).count();
        prop_assert_eq!(projection.blocks.len(), expected);
    }
}
