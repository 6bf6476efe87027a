use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Studyplan CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task and deadline management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Time block management
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Weekly timetable
    Week {
        #[command(subcommand)]
        action: commands::week::WeekAction,
    },
    /// Drop a block onto another block or an hour cell
    Drop(commands::drop::DropArgs),
    /// Study session log
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Analytics dashboard
    Stats(commands::stats::StatsArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export or import all planner data
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Block { action } => commands::block::run(action),
        Commands::Week { action } => commands::week::run(action),
        Commands::Drop(args) => commands::drop::run(args),
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
