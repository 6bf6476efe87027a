//! Aggregate statistics for the analytics dashboard.
//!
//! Everything here is a pure function of a state snapshot. Charting is the
//! display layer's job.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::WeekProjection;
use crate::session::StudySession;
use crate::store::PlannerState;
use crate::task::{Priority, Task};

/// Bucket for sessions without a resolvable task label.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Task completion counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
    /// Completed / total, 0.0 when there are no tasks.
    pub completion_rate: f64,
}

impl TaskSummary {
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            total,
            completed,
            active: total - completed,
            overdue,
            completion_rate,
        }
    }
}

/// Study session totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub count: usize,
    pub total_minutes: u64,
    /// Mean self-rated productivity; `None` without sessions.
    pub average_productivity: Option<f64>,
}

impl SessionSummary {
    pub fn compute(sessions: &[StudySession]) -> Self {
        let count = sessions.len();
        let total_minutes = sessions.iter().map(|s| u64::from(s.duration)).sum();
        let average_productivity = if count == 0 {
            None
        } else {
            let sum: u64 = sessions.iter().map(|s| u64::from(s.productivity)).sum();
            Some(sum as f64 / count as f64)
        };
        Self {
            count,
            total_minutes,
            average_productivity,
        }
    }
}

/// Study minutes per task label. Sessions whose task is missing or has an
/// empty label land in [`UNASSIGNED_LABEL`].
pub fn minutes_by_label(tasks: &[Task], sessions: &[StudySession]) -> BTreeMap<String, u64> {
    let mut out = BTreeMap::new();
    for session in sessions {
        let label = session
            .task_id
            .as_deref()
            .and_then(|id| tasks.iter().find(|t| t.id == id))
            .map(|t| t.label.trim())
            .filter(|l| !l.is_empty())
            .unwrap_or(UNASSIGNED_LABEL);
        *out.entry(label.to_string()).or_insert(0) += u64::from(session.duration);
    }
    out
}

/// Study minutes per weekday of the session start, Monday first.
pub fn minutes_by_weekday<Tz: TimeZone>(sessions: &[StudySession], tz: &Tz) -> [u64; 7] {
    let mut out = [0u64; 7];
    for session in sessions {
        let weekday = session.start_time.with_timezone(tz).weekday();
        out[weekday.num_days_from_monday() as usize] += u64::from(session.duration);
    }
    out
}

/// Study minutes for each of the `days` calendar days ending on `today`,
/// oldest first. Days without sessions report zero.
pub fn daily_minutes<Tz: TimeZone>(
    sessions: &[StudySession],
    tz: &Tz,
    today: NaiveDate,
    days: u32,
) -> Vec<(NaiveDate, u64)> {
    let mut totals: BTreeMap<NaiveDate, u64> = (0..days)
        .map(|back| (today - Duration::days(i64::from(back)), 0))
        .collect();
    for session in sessions {
        let day = session.start_time.with_timezone(tz).date_naive();
        if let Some(total) = totals.get_mut(&day) {
            *total += u64::from(session.duration);
        }
    }
    totals.into_iter().collect()
}

/// Number of tasks at each priority, every priority present.
pub fn tasks_by_priority(tasks: &[Task]) -> BTreeMap<Priority, usize> {
    let mut out: BTreeMap<Priority, usize> = Priority::ALL.iter().map(|p| (*p, 0)).collect();
    for task in tasks {
        *out.entry(task.priority).or_insert(0) += 1;
    }
    out
}

/// Total block time scheduled in the projected week, in hours.
pub fn scheduled_hours(projection: &WeekProjection) -> f64 {
    projection
        .blocks
        .iter()
        .map(|b| b.duration().num_seconds() as f64 / 3600.0)
        .sum()
}

/// Scheduled hours for each projected day, week start first.
pub fn scheduled_hours_by_day(projection: &WeekProjection) -> Vec<(NaiveDate, f64)> {
    projection
        .days
        .iter()
        .map(|day| {
            let hours = projection
                .blocks_on(*day)
                .iter()
                .map(|b| b.duration().num_seconds() as f64 / 3600.0)
                .sum();
            (*day, hours)
        })
        .collect()
}

/// Everything the dashboard shows in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub tasks: TaskSummary,
    pub sessions: SessionSummary,
    pub minutes_by_label: BTreeMap<String, u64>,
    pub minutes_by_weekday: [u64; 7],
    pub daily_minutes: Vec<(NaiveDate, u64)>,
    pub tasks_by_priority: BTreeMap<Priority, usize>,
}

impl Dashboard {
    pub fn compute<Tz: TimeZone>(state: &PlannerState, now: DateTime<Utc>, tz: &Tz, days: u32) -> Self {
        let today = now.with_timezone(tz).date_naive();
        Self {
            tasks: TaskSummary::compute(&state.tasks, now),
            sessions: SessionSummary::compute(&state.study_sessions),
            minutes_by_label: minutes_by_label(&state.tasks, &state.study_sessions),
            minutes_by_weekday: minutes_by_weekday(&state.study_sessions, tz),
            daily_minutes: daily_minutes(&state.study_sessions, tz, today, days),
            tasks_by_priority: tasks_by_priority(&state.tasks),
        }
    }
}
