pub mod block;
pub mod config;
pub mod data;
pub mod drop;
pub mod session;
pub mod stats;
pub mod task;
pub mod week;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use studyplan_core::{PlannerConfig, PlannerStore, SqliteBackend};
use tracing::debug;

/// Open the persisted store named by the current configuration.
pub fn open_store() -> Result<(PlannerConfig, PlannerStore), Box<dyn std::error::Error>> {
    let config = PlannerConfig::load_or_default();
    let path = config.database_path()?;
    debug!(path = %path.display(), key = %config.storage.key, "opening planner database");
    let backend = SqliteBackend::open(&path, config.storage.key.clone())?;
    let store = PlannerStore::open(backend)?;
    Ok((config, store))
}

/// Wall-clock time, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM`, seconds optional.
pub fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("invalid date-time '{s}', expected YYYY-MM-DDTHH:MM"))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// An instant: RFC 3339, a local wall-clock time, or a bare date
/// meaning local midnight.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = parse_local_datetime(s)
        .or_else(|_| parse_date(s).map(|d| d.and_time(chrono::NaiveTime::default())))
        .map_err(|_| format!("invalid date-time '{s}'"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("'{s}' does not exist in the local timezone"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Error for a missing entity id.
pub fn not_found(kind: &str, id: &str) -> Box<dyn std::error::Error> {
    format!("{kind} not found: {id}").into()
}
