//! Hour-cell classification for the weekly grid.
//!
//! A block *starts* in the cell whose hour equals its start hour, and *spans*
//! every later cell whose top-of-hour boundary lies strictly inside it. The
//! display draws a starting block in full and a spanning block as a light
//! "occupied" marker, so one logical block is never drawn twice.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::week::WeekProjection;
use super::{start_of_day, TimeBlock};
use crate::error::ValidationError;

pub const HOURS_PER_DAY: u32 = 24;

/// A (day, hour) cell address on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    day: NaiveDate,
    hour: u32,
}

impl Slot {
    /// # Errors
    /// Returns an error unless `hour` is in `0..24`.
    pub fn new(day: NaiveDate, hour: u32) -> Result<Self, ValidationError> {
        if hour >= HOURS_PER_DAY {
            return Err(ValidationError::InvalidValue {
                field: "hour",
                message: format!("must be between 0 and 23, got {hour}"),
            });
        }
        Ok(Self { day, hour })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Top of the cell's hour on its day.
    pub fn boundary(&self) -> NaiveDateTime {
        start_of_day(self.day) + Duration::hours(i64::from(self.hour))
    }
}

/// Whether `block` starts in the cell for `hour`.
pub fn is_starting(block: &TimeBlock, hour: u32) -> bool {
    block.start.hour() == hour
}

/// Whether `block` covers `slot` without having started in it.
pub fn is_spanning(block: &TimeBlock, slot: Slot) -> bool {
    let boundary = slot.boundary();
    block.start < boundary && block.end > boundary
}

/// How a cell should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Nothing starts or passes through; accepts new blocks and drops.
    Empty,
    /// At least one block starts here.
    Occupied,
    /// Only covered by blocks that started in an earlier hour.
    Spanned,
}

/// Resolved contents of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell<'a> {
    pub slot: Slot,
    /// Blocks starting in this hour, stacked in collection order.
    pub starting: Vec<&'a TimeBlock>,
    pub spanning: Vec<&'a TimeBlock>,
}

impl Cell<'_> {
    pub fn is_empty(&self) -> bool {
        self.starting.is_empty() && self.spanning.is_empty()
    }

    pub fn kind(&self) -> CellKind {
        if !self.starting.is_empty() {
            CellKind::Occupied
        } else if !self.spanning.is_empty() {
            CellKind::Spanned
        } else {
            CellKind::Empty
        }
    }
}

/// Classifies grid cells against a block collection.
///
/// Only blocks whose `day` key matches the cell's day are considered.
pub struct CellResolver<'a> {
    blocks: &'a [TimeBlock],
}

impl<'a> CellResolver<'a> {
    pub fn new(blocks: &'a [TimeBlock]) -> Self {
        Self { blocks }
    }

    pub fn for_week(projection: &'a WeekProjection) -> Self {
        Self::new(&projection.blocks)
    }

    pub fn resolve(&self, slot: Slot) -> Cell<'a> {
        let mut starting = Vec::new();
        let mut spanning = Vec::new();
        for block in self.blocks.iter().filter(|b| b.day == slot.day) {
            if is_starting(block, slot.hour) {
                starting.push(block);
            } else if is_spanning(block, slot) {
                spanning.push(block);
            }
        }
        Cell {
            slot,
            starting,
            spanning,
        }
    }

    /// All 24 cells of `day`, midnight first.
    pub fn day_column(&self, day: NaiveDate) -> Vec<Cell<'a>> {
        (0..HOURS_PER_DAY)
            .map(|hour| self.resolve(Slot { day, hour }))
            .collect()
    }

    /// One column per projected day.
    pub fn week_grid(&self, projection: &WeekProjection) -> Vec<Vec<Cell<'a>>> {
        projection
            .days
            .iter()
            .map(|day| self.day_column(*day))
            .collect()
    }

    pub fn is_empty(&self, slot: Slot) -> bool {
        self.resolve(slot).is_empty()
    }
}
