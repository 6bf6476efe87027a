//! Estimated versus logged study time per task.

use serde::{Deserialize, Serialize};

use crate::session::StudySession;
use crate::task::Task;

/// How a task's estimate compares with the time logged against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateProgress {
    pub task_id: String,
    pub title: String,
    pub estimated_hours: f64,
    pub logged_hours: f64,
    /// Logged / estimated; `None` when the estimate is not positive.
    pub ratio: Option<f64>,
}

impl EstimateProgress {
    /// Check if more time was logged than estimated.
    pub fn is_over_estimate(&self) -> bool {
        self.logged_hours > self.estimated_hours
    }

    /// Hours left against the estimate, never negative.
    pub fn remaining_hours(&self) -> f64 {
        (self.estimated_hours - self.logged_hours).max(0.0)
    }
}

/// One entry per task, in task order. Sessions for deleted tasks are ignored.
pub fn estimate_progress(tasks: &[Task], sessions: &[StudySession]) -> Vec<EstimateProgress> {
    tasks
        .iter()
        .map(|task| {
            let logged_minutes: u64 = sessions
                .iter()
                .filter(|s| s.task_id.as_deref() == Some(task.id.as_str()))
                .map(|s| u64::from(s.duration))
                .sum();
            let logged_hours = logged_minutes as f64 / 60.0;
            let ratio = if task.estimated_time > 0.0 {
                Some(logged_hours / task.estimated_time)
            } else {
                None
            };
            EstimateProgress {
                task_id: task.id.clone(),
                title: task.title.clone(),
                estimated_hours: task.estimated_time,
                logged_hours,
                ratio,
            }
        })
        .collect()
}
