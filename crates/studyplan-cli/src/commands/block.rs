//! Time block commands for CLI.

use chrono::{NaiveDate, NaiveDateTime};
use clap::Subcommand;
use studyplan_core::{clamp_end, NewTimeBlock, TimeBlockPatch};

use super::{not_found, open_store, parse_date, parse_local_datetime, print_json};

#[derive(Subcommand)]
pub enum BlockAction {
    /// Schedule a new block
    Add {
        /// Block title
        title: String,
        /// Start (YYYY-MM-DDTHH:MM, local)
        #[arg(long, value_parser = parse_local_datetime)]
        start: NaiveDateTime,
        /// End (YYYY-MM-DDTHH:MM, local); clamped to the end of the start day
        #[arg(long, value_parser = parse_local_datetime)]
        end: NaiveDateTime,
        /// Task this block is for
        #[arg(long)]
        task: Option<String>,
        /// Display color
        #[arg(long)]
        color: Option<String>,
    },
    /// List blocks, optionally for one day
    List {
        #[arg(long, value_parser = parse_date)]
        day: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a block
    Update {
        /// Block ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// New start; the block keeps its length and lands on the start's day
        #[arg(long, value_parser = parse_local_datetime)]
        start: Option<NaiveDateTime>,
        /// New end
        #[arg(long, value_parser = parse_local_datetime)]
        end: Option<NaiveDateTime>,
        #[arg(long, conflicts_with = "no_task")]
        task: Option<String>,
        /// Detach the block from its task
        #[arg(long)]
        no_task: bool,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a block
    Delete {
        /// Block ID
        id: String,
    },
}

pub fn run(action: BlockAction) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut store) = open_store()?;

    match action {
        BlockAction::Add {
            title,
            start,
            end,
            task,
            color,
        } => {
            let mut new = NewTimeBlock::new(title, start, end);
            if let Some(task) = task {
                if store.task(&task).is_none() {
                    return Err(not_found("task", &task));
                }
                new = new.for_task(task);
            }
            if let Some(color) = color {
                new = new.with_color(color);
            }
            new.validate()?;
            let id = store.add_time_block(new);
            println!("Block created: {id}");
        }
        BlockAction::List { day, json } => {
            let mut blocks: Vec<_> = store
                .time_blocks()
                .iter()
                .filter(|b| day.map_or(true, |d| b.day == d))
                .collect();
            blocks.sort_by_key(|b| b.start);
            if json {
                print_json(&blocks)?;
                return Ok(());
            }
            for block in blocks {
                println!(
                    "{}  {} {}-{}  {}",
                    block.id,
                    block.day,
                    block.start.format("%H:%M"),
                    block.end.format("%H:%M"),
                    block.title
                );
            }
        }
        BlockAction::Update {
            id,
            title,
            start,
            end,
            task,
            no_task,
            color,
        } => {
            let Some(current) = store.time_block(&id) else {
                return Err(not_found("block", &id));
            };
            let mut patch = TimeBlockPatch {
                title,
                color: color.map(Some),
                task_id: if no_task { Some(None) } else { task.map(Some) },
                ..TimeBlockPatch::default()
            };
            if start.is_some() || end.is_some() {
                let new_start = start.unwrap_or(current.start);
                let new_end = end.unwrap_or_else(|| new_start + current.duration());
                patch.start = Some(new_start);
                patch.end = Some(new_end);
                patch.day = Some(new_start.date());
            }
            patch.validate()?;
            if let (Some(start), Some(end)) = (patch.start, patch.end) {
                patch.end = Some(clamp_end(start, end));
            }
            store.update_time_block(&id, patch);
            println!("Block updated: {id}");
        }
        BlockAction::Delete { id } => {
            if !store.delete_time_block(&id) {
                return Err(not_found("block", &id));
            }
            println!("Block deleted: {id}");
        }
    }
    Ok(())
}
