use serde::{Deserialize, Serialize};

use crate::schedule::TimeBlock;
use crate::session::StudySession;
use crate::task::Task;

/// Everything the planner persists: three flat collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub time_blocks: Vec<TimeBlock>,
    #[serde(default)]
    pub study_sessions: Vec<StudySession>,
}

impl PlannerState {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.time_blocks.is_empty() && self.study_sessions.is_empty()
    }
}
