//! Drop handling: repositioning a dragged block into an empty cell, or
//! swapping it with the block it was dropped onto.
//!
//! A drop never changes a block's length, only where it sits. Planning is a
//! pure function of the current blocks; applying goes through the store's
//! `update`, one call per block.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use super::cell::{CellResolver, Slot};
use super::{clamp_end, TimeBlock, TimeBlockPatch};
use crate::store::PlannerStore;

/// Where a dragged block was released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTarget {
    /// Onto another block, by id.
    Block(String),
    /// Onto a grid cell.
    Cell(Slot),
}

/// A completed drag: the moved block and where it landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropRequest {
    pub source: String,
    pub target: DropTarget,
}

impl DropRequest {
    pub fn onto_block(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: DropTarget::Block(target.into()),
        }
    }

    pub fn onto_cell(source: impl Into<String>, slot: Slot) -> Self {
        Self {
            source: source.into(),
            target: DropTarget::Cell(slot),
        }
    }
}

/// The updates a drop resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    /// Self-drop or unknown ids.
    Nothing,
    Move {
        id: String,
        patch: TimeBlockPatch,
    },
    /// Applied in order: the moved block first, then the target.
    Swap {
        moved: (String, TimeBlockPatch),
        target: (String, TimeBlockPatch),
    },
}

/// What applying a drop did to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Unchanged,
    Moved { id: String },
    Swapped { moved: String, target: String },
    /// The moved block was updated but the target was gone. The first
    /// update is kept.
    PartiallySwapped { moved: String, missing: String },
}

/// Reposition `block` to the top of `slot`'s hour, keeping its duration.
pub fn place_in_cell(block: &TimeBlock, slot: Slot) -> TimeBlockPatch {
    let start = slot.boundary();
    let end = clamp_end(start, start + block.duration());
    TimeBlockPatch::reposition(start, end, slot.day())
}

/// Give `block` a new start and day, keeping its own duration.
fn reanchor(block: &TimeBlock, start: NaiveDateTime, day: NaiveDate) -> TimeBlockPatch {
    let end = clamp_end(start, start + block.duration());
    TimeBlockPatch::reposition(start, end, day)
}

/// Exchange the positions of two blocks. Each takes the other's former
/// start and day, and keeps its own duration.
pub fn swap_positions(moved: &TimeBlock, target: &TimeBlock) -> DropPlan {
    DropPlan::Swap {
        moved: (moved.id.clone(), reanchor(moved, target.start, target.day)),
        target: (target.id.clone(), reanchor(target, moved.start, moved.day)),
    }
}

/// Whether `slot` can take `source`: nothing but `source` itself starts in
/// or spans the cell.
pub fn accepts_drop(blocks: &[TimeBlock], slot: Slot, source: &str) -> bool {
    let cell = CellResolver::new(blocks).resolve(slot);
    cell.starting
        .iter()
        .chain(cell.spanning.iter())
        .all(|b| b.id == source)
}

/// Resolve a drop against the current blocks without touching anything.
///
/// A cell target must be empty apart from the dragged block; an occupied
/// cell plans nothing.
pub fn plan_drop(blocks: &[TimeBlock], request: &DropRequest) -> DropPlan {
    let Some(source) = blocks.iter().find(|b| b.id == request.source) else {
        return DropPlan::Nothing;
    };
    match &request.target {
        DropTarget::Cell(slot) if !accepts_drop(blocks, *slot, &source.id) => DropPlan::Nothing,
        DropTarget::Cell(slot) => DropPlan::Move {
            id: source.id.clone(),
            patch: place_in_cell(source, *slot),
        },
        DropTarget::Block(target_id) if *target_id == source.id => DropPlan::Nothing,
        DropTarget::Block(target_id) => match blocks.iter().find(|b| b.id == *target_id) {
            Some(target) => swap_positions(source, target),
            None => DropPlan::Nothing,
        },
    }
}

/// Apply a plan through the store. A swap is best-effort: if the second
/// update finds no record, the first one stands.
pub fn apply_plan(store: &mut PlannerStore, plan: DropPlan) -> DropOutcome {
    match plan {
        DropPlan::Nothing => DropOutcome::Unchanged,
        DropPlan::Move { id, patch } => {
            if store.update_time_block(&id, patch) {
                DropOutcome::Moved { id }
            } else {
                DropOutcome::Unchanged
            }
        }
        DropPlan::Swap { moved, target } => {
            let (moved_id, moved_patch) = moved;
            let (target_id, target_patch) = target;
            if !store.update_time_block(&moved_id, moved_patch) {
                return DropOutcome::Unchanged;
            }
            if store.update_time_block(&target_id, target_patch) {
                DropOutcome::Swapped {
                    moved: moved_id,
                    target: target_id,
                }
            } else {
                warn!(moved = %moved_id, missing = %target_id, "swap target vanished; keeping moved block");
                DropOutcome::PartiallySwapped {
                    moved: moved_id,
                    missing: target_id,
                }
            }
        }
    }
}

/// Plan and apply a drop against the store's current blocks.
pub fn apply_drop(store: &mut PlannerStore, request: &DropRequest) -> DropOutcome {
    let plan = plan_drop(store.time_blocks(), request);
    let outcome = apply_plan(store, plan);
    info!(source = %request.source, ?outcome, "drop applied");
    outcome
}
