//! # Studyplan Core Library
//!
//! This library provides the core logic for Studyplan, a personal study
//! planner: a weekly timetable of movable time blocks, a deadline tracker,
//! and derived analytics. The `studyplan` CLI and any GUI shell are thin
//! layers over the same core.
//!
//! ## Architecture
//!
//! - **Store**: sole owner of tasks, time blocks and study sessions; publishes
//!   an immutable snapshot after every change
//! - **Week Projection**: the seven visible days for an anchor date and the
//!   blocks keyed to them
//! - **Cell Resolver**: which blocks start in, or span through, each hour cell
//! - **Move Engine**: applies drag-and-drop results, moving a block into a cell
//!   or swapping two blocks, without ever changing a block's length
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`PlannerStore`]: State owner and mutation path
//! - [`WeekProjection`]: Weekly view derivation
//! - [`CellResolver`]: Grid cell classification
//! - [`apply_drop`]: Drop handling
//! - [`PlannerConfig`]: Application configuration management

pub mod error;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use schedule::{
    apply_drop, clamp_end, end_of_day, Cell, CellKind, CellResolver, DragSession, DropOutcome,
    DropPlan, DropRequest, DropTarget, NewTimeBlock, Slot, TimeBlock, TimeBlockPatch, WeekAnchor,
    WeekProjection,
};
pub use session::{NewStudySession, StudySession, StudySessionPatch};
pub use stats::Dashboard;
pub use storage::{MemoryBackend, PlannerConfig, SqliteBackend, StateBackend};
pub use store::{PlannerState, PlannerStore, SubscriptionId};
pub use task::query::{DeadlineStatus, StatusFilter, TaskFilter, TaskSort};
pub use task::{NewTask, Priority, Task, TaskPatch};
