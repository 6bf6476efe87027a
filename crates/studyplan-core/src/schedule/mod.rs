//! Time blocks on the weekly timetable.
//!
//! Block instants are local wall-clock times. A block never runs past
//! 23:59:59 of the day it starts on; see [`clamp_end`].

pub mod cell;
pub mod drag;
pub mod moves;
pub mod week;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use cell::{Cell, CellKind, CellResolver, Slot, HOURS_PER_DAY};
pub use drag::DragSession;
pub use moves::{
    accepts_drop, apply_drop, apply_plan, plan_drop, DropOutcome, DropPlan, DropRequest, DropTarget,
};
pub use week::{week_days, week_start, WeekAnchor, WeekProjection};

/// Midnight at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::default())
}

/// 23:59:59 on `day`, the latest instant a block may end at.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    start_of_day(day) + Duration::seconds(86_399)
}

/// Clamp `end` so it does not run past the end of `start`'s calendar day.
pub fn clamp_end(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    end.min(end_of_day(start.date()))
}

/// A scheduled interval of activity on the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    /// Weak reference to a task; may dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Calendar-day key. Normally `start.date()`, but not enforced.
    pub day: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TimeBlock {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Check if this block overlaps with another
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyField("title"));
    }
    Ok(())
}

fn validate_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), ValidationError> {
    if clamp_end(start, end) <= start {
        return Err(ValidationError::InvalidTimeRange { start, end });
    }
    Ok(())
}

/// A block as submitted for creation, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeBlock {
    #[serde(default)]
    pub task_id: Option<String>,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub day: NaiveDate,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewTimeBlock {
    /// A block keyed to the calendar day it starts on.
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            task_id: None,
            title: title.into(),
            start,
            end,
            day: start.date(),
            color: None,
        }
    }

    /// A block of the requested length. The store clamps the end to the
    /// start's day when it is added.
    pub fn with_duration(title: impl Into<String>, start: NaiveDateTime, duration: Duration) -> Self {
        Self::new(title, start, start + duration)
    }

    /// A block starting at the top of `slot`'s hour.
    pub fn in_slot(title: impl Into<String>, slot: Slot, duration: Duration) -> Self {
        Self::with_duration(title, slot.boundary(), duration)
    }

    pub fn for_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn on_day(mut self, day: NaiveDate) -> Self {
        self.day = day;
        self
    }

    /// Submission-time checks. The store itself never calls this.
    ///
    /// The range is checked after clamping, so a start in the last second
    /// of a day is rejected even when the requested end is next day.
    ///
    /// # Errors
    /// Returns an error for a blank title or when the clamped end is not
    /// after `start`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_range(self.start, self.end)
    }

    pub(crate) fn into_block(self, id: String) -> TimeBlock {
        TimeBlock {
            id,
            task_id: self.task_id,
            title: self.title,
            end: clamp_end(self.start, self.end),
            start: self.start,
            day: self.day,
            color: self.color,
        }
    }
}

/// Partial update for a block. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlockPatch {
    /// `Some(None)` detaches the block from its task.
    pub task_id: Option<Option<String>>,
    pub title: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub day: Option<NaiveDate>,
    /// `Some(None)` clears the color.
    pub color: Option<Option<String>>,
}

impl TimeBlockPatch {
    /// Reposition a block: start, end and day change together.
    pub fn reposition(start: NaiveDateTime, end: NaiveDateTime, day: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Submission-time checks for the fields the patch sets. The range is
    /// only checked when both `start` and `end` are present.
    ///
    /// # Errors
    /// Returns an error for a blank title or an empty clamped range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            validate_range(start, end)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, block: &mut TimeBlock) {
        if let Some(task_id) = self.task_id {
            block.task_id = task_id;
        }
        if let Some(title) = self.title {
            block.title = title;
        }
        if let Some(start) = self.start {
            block.start = start;
        }
        if let Some(end) = self.end {
            block.end = end;
        }
        if let Some(day) = self.day {
            block.day = day;
        }
        if let Some(color) = self.color {
            block.color = color;
        }
    }
}
