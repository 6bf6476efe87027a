//! Study session log commands for CLI.

use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use studyplan_core::NewStudySession;

use super::{not_found, open_store, parse_instant, print_json};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Log a finished study session
    Add {
        /// Session title
        title: String,
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        /// Task studied
        #[arg(long)]
        task: Option<String>,
        /// Self-rated productivity, 1-5 (default: 3)
        #[arg(long, default_value = "3")]
        productivity: u8,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List sessions, newest first
    List {
        /// Only sessions for this task
        #[arg(long)]
        task: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a session
    Delete {
        /// Session ID
        id: String,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut store) = open_store()?;

    match action {
        SessionAction::Add {
            title,
            start,
            end,
            task,
            productivity,
            notes,
        } => {
            let mut new = NewStudySession::new(title, start, end).with_productivity(productivity);
            if let Some(task) = task {
                if store.task(&task).is_none() {
                    return Err(not_found("task", &task));
                }
                new = new.for_task(task);
            }
            if let Some(notes) = notes {
                new = new.with_notes(notes);
            }
            new.validate()?;
            let id = store.add_study_session(new);
            println!("Session logged: {id}");
        }
        SessionAction::List { task, json } => {
            let mut sessions: Vec<_> = store
                .study_sessions()
                .iter()
                .filter(|s| task.as_ref().map_or(true, |t| s.task_id.as_ref() == Some(t)))
                .collect();
            sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
            if json {
                print_json(&sessions)?;
                return Ok(());
            }
            for session in sessions {
                println!(
                    "{}  {}  {:>4} min  {}/5  {}",
                    session.id,
                    session.start_time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    session.duration,
                    session.productivity,
                    session.title
                );
            }
        }
        SessionAction::Delete { id } => {
            if !store.delete_study_session(&id) {
                return Err(not_found("session", &id));
            }
            println!("Session deleted: {id}");
        }
    }
    Ok(())
}
