use chrono::{Local, Utc};
use clap::Args;
use studyplan_core::stats::{estimate_progress, scheduled_hours};
use studyplan_core::{Dashboard, WeekAnchor};

use super::{open_store, print_json};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Args)]
pub struct StatsArgs {
    /// Days covered by the daily study chart
    #[arg(long, default_value = "7")]
    pub days: u32,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, store) = open_store()?;
    let snapshot = store.snapshot();
    let dashboard = Dashboard::compute(&snapshot, Utc::now(), &Local, args.days);

    if args.json {
        return print_json(&dashboard);
    }

    let tasks = &dashboard.tasks;
    println!(
        "Tasks: {} total, {} completed, {} active, {} overdue ({:.0}% done)",
        tasks.total,
        tasks.completed,
        tasks.active,
        tasks.overdue,
        tasks.completion_rate * 100.0
    );
    let sessions = &dashboard.sessions;
    print!("Sessions: {} logged, {} min", sessions.count, sessions.total_minutes);
    match sessions.average_productivity {
        Some(avg) => println!(", productivity {avg:.1}/5"),
        None => println!(),
    }

    let week = WeekAnchor::today(config.calendar.week_starts_on).project(store.time_blocks());
    println!("Scheduled this week: {:.1} h", scheduled_hours(&week));

    println!("\nBy priority:");
    for (priority, count) in &dashboard.tasks_by_priority {
        println!("  {priority:<7} {count}");
    }
    println!("\nBy subject:");
    for (label, minutes) in &dashboard.minutes_by_label {
        println!("  {label:<16} {minutes} min");
    }
    println!("\nBy weekday:");
    for (name, minutes) in WEEKDAYS.iter().zip(dashboard.minutes_by_weekday) {
        println!("  {name} {minutes} min");
    }
    println!("\nLast {} days:", args.days);
    for (day, minutes) in &dashboard.daily_minutes {
        println!("  {day} {minutes} min");
    }

    let progress = estimate_progress(&snapshot.tasks, &snapshot.study_sessions);
    if !progress.is_empty() {
        println!("\nEstimates:");
        for entry in progress {
            println!(
                "  {:<24} {:.1}/{:.1} h{}",
                entry.title,
                entry.logged_hours,
                entry.estimated_hours,
                if entry.is_over_estimate() { "  over" } else { "" }
            );
        }
    }
    Ok(())
}
