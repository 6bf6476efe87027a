//! Filtering, ordering and deadline classification for the task list.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::{Priority, Task};

/// Window before a deadline in which a task counts as due soon.
pub const DUE_SOON_HOURS: i64 = 48;

/// Completion filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// Criteria for narrowing the task list. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub priority: Option<Priority>,
    pub label: Option<String>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        };
        if !status_ok {
            return false;
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(label) = &self.label {
            if !task.label.eq_ignore_ascii_case(label) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }

    /// Matching tasks, in the order given.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Sort key for task listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskSort {
    #[default]
    Deadline,
    Priority,
    CreatedAt,
}

impl TaskSort {
    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Deadline => a.deadline.cmp(&b.deadline),
            Self::Priority => b
                .priority
                .cmp(&a.priority)
                .then_with(|| a.deadline.cmp(&b.deadline)),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }

    /// Stable sort, so equal keys keep insertion order.
    pub fn sort(&self, tasks: &mut [&Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

/// Where a task stands relative to its deadline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Completed,
    Overdue,
    DueSoon,
    Upcoming,
}

impl DeadlineStatus {
    pub fn classify(task: &Task, now: DateTime<Utc>) -> Self {
        if task.completed {
            Self::Completed
        } else if task.deadline < now {
            Self::Overdue
        } else if task.deadline - now <= Duration::hours(DUE_SOON_HOURS) {
            Self::DueSoon
        } else {
            Self::Upcoming
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::DueSoon => "due soon",
            Self::Upcoming => "upcoming",
        }
    }
}

/// Distinct non-empty labels, sorted.
pub fn labels(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|t| t.label.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Incomplete tasks with a deadline in `[now, now + within]`, soonest first.
pub fn upcoming(tasks: &[Task], now: DateTime<Utc>, within: Duration) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.completed && t.deadline >= now && t.deadline - now <= within)
        .collect();
    TaskSort::Deadline.sort(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn task(id: &str, title: &str, deadline: DateTime<Utc>, priority: Priority, label: &str) -> Task {
        NewTask::new(title, deadline)
            .with_priority(priority)
            .with_label(label)
            .into_task(id.into(), at(1, 0))
    }

    fn sample() -> Vec<Task> {
        let mut done = task("3", "Lab report", at(4, 9), Priority::High, "Chemistry");
        done.completed = true;
        vec![
            task("1", "Read chapter 4", at(10, 9), Priority::Low, "History"),
            task("2", "Problem set", at(3, 9), Priority::Urgent, "Math"),
            done,
            task("4", "Essay outline", at(3, 9), Priority::High, "history"),
        ]
    }

    #[test]
    fn filter_by_status_and_label() {
        let tasks = sample();
        let active = TaskFilter {
            status: StatusFilter::Active,
            ..TaskFilter::default()
        };
        assert_eq!(active.apply(&tasks).len(), 3);

        let history = TaskFilter {
            label: Some("HISTORY".into()),
            ..TaskFilter::default()
        };
        let ids: Vec<_> = history.apply(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn search_matches_description() {
        let mut tasks = sample();
        tasks[0].description = Some("Focus on the Treaty of Versailles".into());
        let filter = TaskFilter {
            search: Some("versailles".into()),
            ..TaskFilter::default()
        };
        assert_eq!(filter.apply(&tasks).len(), 1);
    }

    #[test]
    fn priority_sort_puts_urgent_first_then_deadline() {
        let tasks = sample();
        let mut refs: Vec<&Task> = tasks.iter().collect();
        TaskSort::Priority.sort(&mut refs);
        let ids: Vec<_> = refs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "3", "1"]);
    }

    #[test]
    fn deadline_sort_is_stable() {
        let tasks = sample();
        let mut refs: Vec<&Task> = tasks.iter().collect();
        TaskSort::Deadline.sort(&mut refs);
        let ids: Vec<_> = refs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "3", "1"]);
    }

    #[test]
    fn classify_deadlines() {
        let tasks = sample();
        let now = at(2, 12);
        assert_eq!(DeadlineStatus::classify(&tasks[0], now), DeadlineStatus::Upcoming);
        assert_eq!(DeadlineStatus::classify(&tasks[1], now), DeadlineStatus::DueSoon);
        assert_eq!(DeadlineStatus::classify(&tasks[2], now), DeadlineStatus::Completed);
        assert_eq!(
            DeadlineStatus::classify(&tasks[1], at(5, 0)),
            DeadlineStatus::Overdue
        );
    }

    #[test]
    fn labels_are_distinct_and_sorted() {
        let tasks = sample();
        assert_eq!(labels(&tasks), vec!["Chemistry", "History", "Math", "history"]);
    }

    #[test]
    fn upcoming_skips_completed_and_past() {
        let tasks = sample();
        let soon = upcoming(&tasks, at(2, 12), Duration::days(3));
        let ids: Vec<_> = soon.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }
}
