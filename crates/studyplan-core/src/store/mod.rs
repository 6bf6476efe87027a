//! The planner store: sole owner of tasks, time blocks and study sessions.
//!
//! Every mutation that changes state publishes a fresh immutable snapshot,
//! notifies subscribers and hands the state to the persistence backend.
//! Updates and deletes against unknown ids are silent no-ops and publish
//! nothing.

mod state;

pub use state::PlannerState;

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::schedule::{NewTimeBlock, TimeBlock, TimeBlockPatch};
use crate::session::{NewStudySession, StudySession, StudySessionPatch};
use crate::storage::StateBackend;
use crate::task::{NewTask, Task, TaskPatch};

/// Handle returned by [`PlannerStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Arc<PlannerState>)>;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct PlannerStore {
    state: Arc<PlannerState>,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    backend: Option<Box<dyn StateBackend>>,
}

impl Default for PlannerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerStore {
    /// An empty store with no persistence.
    pub fn new() -> Self {
        Self::with_state(PlannerState::default())
    }

    pub fn with_state(state: PlannerState) -> Self {
        Self {
            state: Arc::new(state),
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
            backend: None,
        }
    }

    /// Load initial state from `backend` and save back to it on every change.
    ///
    /// # Errors
    /// Returns an error if the backend cannot load its stored state.
    pub fn open(backend: impl StateBackend + 'static) -> Result<Self> {
        let state = backend.load()?;
        debug!(
            tasks = state.tasks.len(),
            time_blocks = state.time_blocks.len(),
            study_sessions = state.study_sessions.len(),
            "planner state loaded"
        );
        let mut store = Self::with_state(state);
        store.backend = Some(Box::new(backend));
        Ok(store)
    }

    /// The current immutable snapshot.
    pub fn snapshot(&self) -> Arc<PlannerState> {
        Arc::clone(&self.state)
    }

    /// Number of published changes since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Arc<PlannerState>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn state_mut(&mut self) -> &mut PlannerState {
        Arc::make_mut(&mut self.state)
    }

    fn publish(&mut self) {
        self.revision += 1;
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
        if let Some(backend) = &self.backend {
            if let Err(e) = backend.save(&self.state) {
                warn!(error = %e, revision = self.revision, "failed to persist planner state");
            }
        }
    }

    /// Replace the whole state, e.g. after an import.
    pub fn replace_state(&mut self, state: PlannerState) {
        self.state = Arc::new(state);
        self.publish();
    }

    // ── Tasks ───────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn add_task(&mut self, task: NewTask) -> String {
        let id = new_id();
        let task = task.into_task(id.clone(), Utc::now());
        self.state_mut().tasks.push(task);
        debug!(task_id = %id, "task added");
        self.publish();
        id
    }

    /// Returns whether a task matched.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> bool {
        let Some(index) = self.state.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        patch.apply_to(&mut self.state_mut().tasks[index]);
        debug!(task_id = %id, "task updated");
        self.publish();
        true
    }

    /// Flip the completed flag. Returns the new value, or `None` if absent.
    pub fn toggle_task(&mut self, id: &str) -> Option<bool> {
        let completed = !self.task(id)?.completed;
        self.update_task(id, TaskPatch::completed(completed));
        Some(completed)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        if !self.state.tasks.iter().any(|t| t.id == id) {
            return false;
        }
        self.state_mut().tasks.retain(|t| t.id != id);
        debug!(task_id = %id, "task deleted");
        self.publish();
        true
    }

    // ── Time blocks ─────────────────────────────────────────────────────

    pub fn time_blocks(&self) -> &[TimeBlock] {
        &self.state.time_blocks
    }

    pub fn time_block(&self, id: &str) -> Option<&TimeBlock> {
        self.state.time_blocks.iter().find(|b| b.id == id)
    }

    /// Append a block. Its end is clamped to the end of its start day.
    pub fn add_time_block(&mut self, block: NewTimeBlock) -> String {
        let id = new_id();
        let block = block.into_block(id.clone());
        self.state_mut().time_blocks.push(block);
        debug!(block_id = %id, "time block added");
        self.publish();
        id
    }

    /// Returns whether a block matched.
    pub fn update_time_block(&mut self, id: &str, patch: TimeBlockPatch) -> bool {
        let Some(index) = self.state.time_blocks.iter().position(|b| b.id == id) else {
            return false;
        };
        patch.apply_to(&mut self.state_mut().time_blocks[index]);
        debug!(block_id = %id, "time block updated");
        self.publish();
        true
    }

    pub fn delete_time_block(&mut self, id: &str) -> bool {
        if !self.state.time_blocks.iter().any(|b| b.id == id) {
            return false;
        }
        self.state_mut().time_blocks.retain(|b| b.id != id);
        debug!(block_id = %id, "time block deleted");
        self.publish();
        true
    }

    /// Resolve a block's weak task reference. `None` is a normal answer.
    pub fn task_for_block(&self, block: &TimeBlock) -> Option<&Task> {
        block.task_id.as_deref().and_then(|id| self.task(id))
    }

    // ── Study sessions ──────────────────────────────────────────────────

    pub fn study_sessions(&self) -> &[StudySession] {
        &self.state.study_sessions
    }

    pub fn add_study_session(&mut self, session: NewStudySession) -> String {
        let id = new_id();
        let session = session.into_session(id.clone());
        self.state_mut().study_sessions.push(session);
        debug!(session_id = %id, "study session added");
        self.publish();
        id
    }

    pub fn update_study_session(&mut self, id: &str, patch: StudySessionPatch) -> bool {
        let Some(index) = self.state.study_sessions.iter().position(|s| s.id == id) else {
            return false;
        };
        patch.apply_to(&mut self.state_mut().study_sessions[index]);
        debug!(session_id = %id, "study session updated");
        self.publish();
        true
    }

    pub fn delete_study_session(&mut self, id: &str) -> bool {
        if !self.state.study_sessions.iter().any(|s| s.id == id) {
            return false;
        }
        self.state_mut().study_sessions.retain(|s| s.id != id);
        debug!(session_id = %id, "study session deleted");
        self.publish();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::test_support::*;
    use crate::storage::MemoryBackend;
    use chrono::{Duration, TimeZone};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn study_block() -> NewTimeBlock {
        let d = date(2024, 1, 1);
        NewTimeBlock::new("Study", at(d, 9, 0), at(d, 10, 0))
    }

    #[test]
    fn add_then_delete_block() {
        let mut store = PlannerStore::new();
        let keep = store.add_time_block(study_block());
        let id = store.add_time_block(study_block());
        assert_ne!(keep, id);
        assert_eq!(store.time_blocks().len(), 2);

        assert!(store.delete_time_block(&id));
        assert_eq!(store.time_blocks().len(), 1);
        assert!(store.time_block(&id).is_none());
        assert!(store.time_block(&keep).is_some());
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let mut store = PlannerStore::new();
        store.add_time_block(study_block());
        let revision = store.revision();
        let before = store.snapshot();

        assert!(!store.update_time_block("missing", TimeBlockPatch::default()));
        assert!(!store.delete_time_block("missing"));
        assert!(!store.delete_task("missing"));
        assert_eq!(store.toggle_task("missing"), None);

        assert_eq!(store.revision(), revision);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut store = PlannerStore::new();
        let d = date(2024, 1, 1);
        let late = store.add_time_block(NewTimeBlock::new("Late", at(d, 18, 0), at(d, 19, 0)));
        let early = store.add_time_block(NewTimeBlock::new("Early", at(d, 8, 0), at(d, 9, 0)));
        let ids: Vec<_> = store.time_blocks().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec![late, early]);
    }

    #[test]
    fn add_clamps_to_end_of_day() {
        let mut store = PlannerStore::new();
        let d = date(2024, 1, 1);
        let id = store.add_time_block(NewTimeBlock::with_duration(
            "Night owl",
            at(d, 23, 0),
            Duration::hours(3),
        ));
        let block = store.time_block(&id).unwrap();
        assert_eq!(block.end, d.and_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn snapshots_are_immutable() {
        let mut store = PlannerStore::new();
        let before = store.snapshot();
        store.add_time_block(study_block());
        assert!(before.time_blocks.is_empty());
        assert_eq!(store.snapshot().time_blocks.len(), 1);
    }

    #[test]
    fn subscribers_see_each_change() {
        let mut store = PlannerStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |state| sink.borrow_mut().push(state.time_blocks.len()));

        let id = store.add_time_block(study_block());
        store.delete_time_block(&id);
        assert_eq!(*seen.borrow(), vec![1, 0]);

        assert!(store.unsubscribe(sub));
        store.add_time_block(study_block());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn task_lifecycle() {
        let mut store = PlannerStore::new();
        let deadline = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let id = store.add_task(NewTask::new("Essay", deadline));
        let created_at = store.task(&id).unwrap().created_at;

        assert_eq!(store.toggle_task(&id), Some(true));
        assert!(store.task(&id).unwrap().completed);

        store.update_task(
            &id,
            TaskPatch {
                title: Some("Essay v2".into()),
                ..TaskPatch::default()
            },
        );
        let task = store.task(&id).unwrap();
        assert_eq!(task.title, "Essay v2");
        assert_eq!(task.created_at, created_at);

        assert!(store.delete_task(&id));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn dangling_task_reference_resolves_to_none() {
        let mut store = PlannerStore::new();
        let deadline = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let task_id = store.add_task(NewTask::new("Essay", deadline));
        let block_id = store.add_time_block(study_block().for_task(&task_id));

        let block = store.time_block(&block_id).unwrap().clone();
        assert_eq!(store.task_for_block(&block).map(|t| t.id.as_str()), Some(task_id.as_str()));

        store.delete_task(&task_id);
        assert!(store.task_for_block(&block).is_none());
        assert_eq!(store.time_block(&block_id).unwrap().task_id.as_deref(), Some(task_id.as_str()));
    }

    #[test]
    fn changes_are_saved_to_backend() {
        let backend = MemoryBackend::default();
        let mut store = PlannerStore::open(backend.clone()).unwrap();
        let id = store.add_time_block(study_block());
        let saved = backend.saved().unwrap();
        assert_eq!(saved.time_blocks.len(), 1);
        assert_eq!(saved.time_blocks[0].id, id);

        let reopened = PlannerStore::open(backend).unwrap();
        assert_eq!(reopened.time_blocks().len(), 1);
    }

    #[test]
    fn session_lifecycle() {
        let mut store = PlannerStore::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let id = store.add_study_session(NewStudySession::new(
            "Flashcards",
            start,
            start + Duration::minutes(45),
        ));
        store.update_study_session(
            &id,
            StudySessionPatch {
                productivity: Some(5),
                ..StudySessionPatch::default()
            },
        );
        assert_eq!(store.study_sessions()[0].productivity, 5);
        assert!(store.delete_study_session(&id));
        assert!(store.study_sessions().is_empty());
    }
}
