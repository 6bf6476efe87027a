//! Statistics module for Studyplan
//!
//! This module provides the analytics dashboard figures: task completion,
//! study time by subject, weekday and day, scheduled hours per week, and
//! estimate tracking per task.

mod dashboard;
mod estimates;

pub use dashboard::{
    daily_minutes, minutes_by_label, minutes_by_weekday, scheduled_hours,
    scheduled_hours_by_day, tasks_by_priority, Dashboard, SessionSummary, TaskSummary,
    UNASSIGNED_LABEL,
};

pub use estimates::{estimate_progress, EstimateProgress};
