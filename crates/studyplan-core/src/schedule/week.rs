//! Week projection: the seven visible days for an anchor date and the blocks
//! that fall on them.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::TimeBlock;

/// First day of the week containing `anchor`. Saturates at
/// [`NaiveDate::MIN`].
pub fn week_start(anchor: NaiveDate, starts_on: Weekday) -> NaiveDate {
    let offset = (anchor.weekday().num_days_from_monday() + 7
        - starts_on.num_days_from_monday())
        % 7;
    anchor
        .checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MIN)
}

/// The seven day keys of the week containing `anchor`, week start first.
/// Days past [`NaiveDate::MAX`] saturate to it.
pub fn week_days(anchor: NaiveDate, starts_on: Weekday) -> [NaiveDate; 7] {
    let first = week_start(anchor, starts_on);
    std::array::from_fn(|i| {
        first
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(NaiveDate::MAX)
    })
}

/// Navigation state for the visible week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAnchor {
    pub date: NaiveDate,
    pub starts_on: Weekday,
}

impl WeekAnchor {
    pub fn new(date: NaiveDate, starts_on: Weekday) -> Self {
        Self { date, starts_on }
    }

    /// Anchor on today's local date.
    pub fn today(starts_on: Weekday) -> Self {
        Self::new(Local::now().date_naive(), starts_on)
    }

    pub fn next(self) -> Option<Self> {
        self.shift_weeks(1)
    }

    pub fn previous(self) -> Option<Self> {
        self.shift_weeks(-1)
    }

    /// Move the anchor by whole weeks. `None` when the result falls outside
    /// the representable calendar.
    pub fn shift_weeks(self, weeks: i64) -> Option<Self> {
        let days = Days::new(weeks.unsigned_abs().checked_mul(7)?);
        let date = if weeks >= 0 {
            self.date.checked_add_days(days)?
        } else {
            self.date.checked_sub_days(days)?
        };
        Some(Self { date, ..self })
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        week_days(self.date, self.starts_on)
    }

    pub fn project(&self, blocks: &[TimeBlock]) -> WeekProjection {
        WeekProjection::compute(self.date, self.starts_on, blocks)
    }
}

/// The visible week: its day keys and the blocks keyed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekProjection {
    pub days: [NaiveDate; 7],
    /// Blocks whose `day` is one of `days`, in collection order.
    pub blocks: Vec<TimeBlock>,
}

impl WeekProjection {
    pub fn compute(anchor: NaiveDate, starts_on: Weekday, blocks: &[TimeBlock]) -> Self {
        let days = week_days(anchor, starts_on);
        let blocks = blocks
            .iter()
            .filter(|b| days.contains(&b.day))
            .cloned()
            .collect();
        Self { days, blocks }
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    pub fn blocks_on(&self, day: NaiveDate) -> Vec<&TimeBlock> {
        self.blocks.iter().filter(|b| b.day == day).collect()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days[6]
    }

    pub fn range_label(&self) -> String {
        format!(
            "{} – {}",
            self.first_day().format("%Y-%m-%d"),
            self.last_day().format("%Y-%m-%d")
        )
    }
}
