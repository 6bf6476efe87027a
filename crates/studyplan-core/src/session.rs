//! Study session records, the raw input to analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_PRODUCTIVITY: u8 = 1;
pub const MAX_PRODUCTIVITY: u8 = 5;

/// A logged stretch of study.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Minutes actually studied. May be less than the wall-clock span.
    pub duration: u32,
    /// Self-rated, 1 to 5.
    pub productivity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewStudySession {
    #[serde(default)]
    pub task_id: Option<String>,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: u32,
    pub productivity: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewStudySession {
    /// A session whose duration is the full wall-clock span.
    pub fn new(title: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        let minutes = (end_time - start_time).num_minutes().max(0);
        Self {
            task_id: None,
            title: title.into(),
            start_time,
            end_time,
            duration: u32::try_from(minutes).unwrap_or(u32::MAX),
            productivity: 3,
            notes: None,
        }
    }

    pub fn for_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_productivity(mut self, productivity: u8) -> Self {
        self.productivity = productivity;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// # Errors
    /// Returns an error for a blank title, a zero duration, an inverted time
    /// range or a productivity score outside 1..=5.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidValue {
                field: "endTime",
                message: "must be after startTime".into(),
            });
        }
        if self.duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration",
                message: "must be at least one minute".into(),
            });
        }
        if !(MIN_PRODUCTIVITY..=MAX_PRODUCTIVITY).contains(&self.productivity) {
            return Err(ValidationError::InvalidValue {
                field: "productivity",
                message: format!(
                    "must be between {MIN_PRODUCTIVITY} and {MAX_PRODUCTIVITY}, got {}",
                    self.productivity
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn into_session(self, id: String) -> StudySession {
        StudySession {
            id,
            task_id: self.task_id,
            title: self.title,
            start_time: self.start_time,
            end_time: self.end_time,
            duration: self.duration,
            productivity: self.productivity,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionPatch {
    pub task_id: Option<Option<String>>,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<u32>,
    pub productivity: Option<u8>,
    pub notes: Option<Option<String>>,
}

impl StudySessionPatch {
    pub(crate) fn apply_to(self, session: &mut StudySession) {
        if let Some(task_id) = self.task_id {
            session.task_id = task_id;
        }
        if let Some(title) = self.title {
            session.title = title;
        }
        if let Some(start_time) = self.start_time {
            session.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            session.end_time = end_time;
        }
        if let Some(duration) = self.duration {
            session.duration = duration;
        }
        if let Some(productivity) = self.productivity {
            session.productivity = productivity;
        }
        if let Some(notes) = self.notes {
            session.notes = notes;
        }
    }
}
