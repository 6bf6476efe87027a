//! Task types for the deadline tracker.
//!
//! Tasks are independent of time blocks. A block may carry a `task_id`, but
//! that is a lookup by value and the task may be gone by the time it is read.

pub mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Task priority, ordered from least to most pressing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(ValidationError::InvalidValue {
                field: "priority",
                message: format!("unknown priority '{other}' (expected low, medium, high or urgent)"),
            }),
        }
    }
}

/// A tracked task with a deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Free-text subject tag.
    #[serde(default)]
    pub label: String,
    /// Estimated effort in hours.
    pub estimated_time: f64,
    /// Set once on insert and never patched.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the deadline has passed without the task being completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline < now
    }
}

/// A task as submitted by a form, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub label: String,
    pub estimated_time: f64,
}

impl NewTask {
    pub fn new(title: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            deadline,
            priority: Priority::default(),
            label: String::new(),
            estimated_time: 1.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_estimated_time(mut self, hours: f64) -> Self {
        self.estimated_time = hours;
        self
    }

    /// Submission-time checks. The store itself never calls this.
    ///
    /// # Errors
    /// Returns an error for a blank title or a non-positive estimate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_estimate(self.estimated_time)
    }

    pub(crate) fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            deadline: self.deadline,
            completed: false,
            priority: self.priority,
            label: self.label,
            estimated_time: self.estimated_time,
            created_at,
        }
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyField("title"));
    }
    Ok(())
}

fn validate_estimate(hours: f64) -> Result<(), ValidationError> {
    if !(hours.is_finite() && hours > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "estimatedTime",
            message: format!("must be a positive number of hours, got {hours}"),
        });
    }
    Ok(())
}

/// Partial update for a task. `None` leaves a field untouched.
///
/// `created_at` and `id` are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub deadline: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub label: Option<String>,
    pub estimated_time: Option<f64>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The same submission-time checks as [`NewTask::validate`], applied to
    /// the fields the patch sets.
    ///
    /// # Errors
    /// Returns an error for a blank title or a non-positive estimate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(hours) = self.estimated_time {
            validate_estimate(hours)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(label) = self.label {
            task.label = label;
        }
        if let Some(estimated_time) = self.estimated_time {
            task.estimated_time = estimated_time;
        }
    }
}
