use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use payment_advisor::advisor::{DayIndex, RosterFile, RosterStore, ROSTER_FILE};
use payment_advisor::error::AppError;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Explicit day count wins; otherwise the calendar date (default today) is converted.
pub(crate) fn resolve_day(date: Option<NaiveDate>, day: Option<i64>) -> DayIndex {
    match day {
        Some(day) => DayIndex::new(day),
        None => DayIndex::from_date(date.unwrap_or_else(|| Local::now().date_naive())),
    }
}

/// Split a roster path into the store directory and file name.
pub(crate) fn roster_store(path: &Path) -> (RosterStore, String) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ROSTER_FILE.to_string());
    (RosterStore::new(dir), file)
}

pub(crate) fn load_roster(path: &Path) -> Result<RosterFile, AppError> {
    let (store, file) = roster_store(path);
    store
        .load(&file)?
        .ok_or_else(|| AppError::MissingRoster(path.display().to_string()))
}
