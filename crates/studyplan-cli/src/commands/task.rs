//! Task management commands for CLI.

use chrono::{Local, Utc};
use clap::{Subcommand, ValueEnum};
use studyplan_core::task::query::DeadlineStatus;
use studyplan_core::{NewTask, Priority, StatusFilter, TaskFilter, TaskPatch, TaskSort};

use super::{not_found, open_store, parse_instant, print_json};

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    All,
    Active,
    Completed,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Active => StatusFilter::Active,
            StatusArg::Completed => StatusFilter::Completed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Deadline,
    Priority,
    Created,
}

impl From<SortArg> for TaskSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Deadline => TaskSort::Deadline,
            SortArg::Priority => TaskSort::Priority,
            SortArg::Created => TaskSort::CreatedAt,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Deadline (RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD, local time)
        #[arg(long, value_parser = parse_instant)]
        deadline: chrono::DateTime<Utc>,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// low, medium, high or urgent (default: medium)
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Subject label
        #[arg(long, default_value = "")]
        label: String,
        /// Estimated hours (default: 1)
        #[arg(long, default_value = "1")]
        estimate: f64,
    },
    /// List tasks
    List {
        #[arg(long, value_enum, default_value = "all")]
        status: StatusArg,
        /// Only this priority
        #[arg(long)]
        priority: Option<Priority>,
        /// Only this label (case-insensitive)
        #[arg(long)]
        label: Option<String>,
        /// Substring of title or description
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value = "deadline")]
        sort: SortArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        #[arg(long, value_parser = parse_instant)]
        deadline: Option<chrono::DateTime<Utc>>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        estimate: Option<f64>,
    },
    /// Flip a task's completed flag
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut store) = open_store()?;

    match action {
        TaskAction::Add {
            title,
            deadline,
            description,
            priority,
            label,
            estimate,
        } => {
            let mut new = NewTask::new(title, deadline)
                .with_priority(priority)
                .with_label(label)
                .with_estimated_time(estimate);
            if let Some(description) = description {
                new = new.with_description(description);
            }
            new.validate()?;
            let id = store.add_task(new);
            println!("Task created: {id}");
        }
        TaskAction::List {
            status,
            priority,
            label,
            search,
            sort,
            json,
        } => {
            let filter = TaskFilter {
                status: status.into(),
                priority,
                label,
                search,
            };
            let mut tasks = filter.apply(store.tasks());
            TaskSort::from(sort).sort(&mut tasks);
            if json {
                print_json(&tasks)?;
                return Ok(());
            }
            let now = Utc::now();
            for task in tasks {
                let status = DeadlineStatus::classify(task, now);
                println!(
                    "{}  [{}] {:<7} {}  due {}  {}",
                    task.id,
                    if task.completed { "x" } else { " " },
                    task.priority,
                    task.title,
                    task.deadline.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    status.as_str()
                );
            }
        }
        TaskAction::Update {
            id,
            title,
            description,
            clear_description,
            deadline,
            priority,
            label,
            estimate,
        } => {
            let patch = TaskPatch {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                deadline,
                priority,
                label,
                estimated_time: estimate,
                ..TaskPatch::default()
            };
            patch.validate()?;
            if !store.update_task(&id, patch) {
                return Err(not_found("task", &id));
            }
            println!("Task updated: {id}");
        }
        TaskAction::Toggle { id } => match store.toggle_task(&id) {
            Some(true) => println!("Task completed: {id}"),
            Some(false) => println!("Task reopened: {id}"),
            None => return Err(not_found("task", &id)),
        },
        TaskAction::Delete { id } => {
            if !store.delete_task(&id) {
                return Err(not_found("task", &id));
            }
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
