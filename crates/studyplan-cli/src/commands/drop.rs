use chrono::NaiveDate;
use clap::Args;
use studyplan_core::{apply_drop, DropOutcome, DropRequest, Slot};

use super::{open_store, parse_date, print_json};

#[derive(Args)]
pub struct DropArgs {
    /// Block being dragged
    pub block: String,
    /// Swap with this block
    #[arg(long, required_unless_present = "day", conflicts_with_all = ["day", "hour"])]
    pub onto: Option<String>,
    /// Target cell day
    #[arg(long, value_parser = parse_date, requires = "hour")]
    pub day: Option<NaiveDate>,
    /// Target cell hour (0-23)
    #[arg(long, requires = "day")]
    pub hour: Option<u32>,
    /// Output the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: DropArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = match (args.onto, args.day, args.hour) {
        (Some(target), _, _) => DropRequest::onto_block(args.block, target),
        (None, Some(day), Some(hour)) => DropRequest::onto_cell(args.block, Slot::new(day, hour)?),
        _ => return Err("either --onto or --day with --hour is required".into()),
    };

    let (_, mut store) = open_store()?;
    let outcome = apply_drop(&mut store, &request);
    if args.json {
        return print_json(&outcome);
    }
    match outcome {
        DropOutcome::Unchanged => println!("Nothing changed"),
        DropOutcome::Moved { id } => println!("Block moved: {id}"),
        DropOutcome::Swapped { moved, target } => println!("Blocks swapped: {moved} <-> {target}"),
        DropOutcome::PartiallySwapped { moved, missing } => {
            println!("Block moved: {moved} (swap target {missing} no longer exists)")
        }
    }
    Ok(())
}
