//! Weekly timetable view.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use studyplan_core::{CellKind, CellResolver, Slot, WeekAnchor};

use super::{open_store, parse_date, print_json};

const COLUMN_WIDTH: usize = 14;

#[derive(Subcommand)]
pub enum WeekAction {
    /// Print the hour grid for a week
    Show {
        /// Any date in the week (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Weeks to move forward (positive) or back (negative)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,
        /// Output the projection as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: WeekAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, store) = open_store()?;

    match action {
        WeekAction::Show { date, offset, json } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let anchor = WeekAnchor::new(date, config.calendar.week_starts_on)
                .shift_weeks(offset)
                .ok_or_else(|| format!("week offset {offset} is outside the supported calendar"))?;
            let projection = anchor.project(store.time_blocks());
            if json {
                print_json(&projection)?;
                return Ok(());
            }

            println!("{}", projection.range_label());
            let mut header = String::from("      ");
            for day in projection.days {
                header.push_str(&format!("{:<COLUMN_WIDTH$}", day.format("%a %m-%d").to_string()));
            }
            println!("{header}");

            let resolver = CellResolver::for_week(&projection);
            for hour in config.grid.hours() {
                let mut row = format!("{hour:02}:00 ");
                for day in projection.days {
                    let cell = resolver.resolve(Slot::new(day, hour)?);
                    let text = match cell.kind() {
                        CellKind::Empty => String::from("."),
                        CellKind::Spanned => String::from("|"),
                        CellKind::Occupied => {
                            let mut title = cell.starting[0].title.clone();
                            if cell.starting.len() > 1 {
                                title = format!("{title} +{}", cell.starting.len() - 1);
                            }
                            title.chars().take(COLUMN_WIDTH - 1).collect()
                        }
                    };
                    row.push_str(&format!("{text:<COLUMN_WIDTH$}"));
                }
                println!("{}", row.trim_end());
            }
        }
    }
    Ok(())
}
