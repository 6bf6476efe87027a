//! Whole-state export and import.
//!
//! The file format is the persisted JSON document:
//! `{ "tasks": [...], "timeBlocks": [...], "studySessions": [...] }`.

use std::path::PathBuf;

use clap::Subcommand;
use studyplan_core::PlannerState;

use super::open_store;

#[derive(Subcommand)]
pub enum DataAction {
    /// Write all planner data as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace all planner data with a JSON export
    Import {
        /// File produced by `data export`
        file: PathBuf,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut store) = open_store()?;

    match action {
        DataAction::Export { output } => {
            let json = serde_json::to_string_pretty(&*store.snapshot())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        DataAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let state: PlannerState = serde_json::from_str(&content)?;
            let counts = (state.tasks.len(), state.time_blocks.len(), state.study_sessions.len());
            store.replace_state(state);
            println!(
                "Imported {} tasks, {} blocks, {} sessions",
                counts.0, counts.1, counts.2
            );
        }
    }
    Ok(())
}
