//! Search query construction per sync mode.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use super::sync_constants::DELTA_WINDOW_DAYS;
use super::sync_model::SyncMode;

const JQL_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Build the search query for `mode`, anchoring the delta window at the current time.
///
/// The delta boundary is written as UTC wall-clock time.
pub fn build_query(mode: SyncMode, project_key: &str) -> String {
    build_query_in(mode, project_key, Tz::UTC)
}

/// Like [`build_query`], with the delta boundary written in `tracker_tz`.
///
/// The tracker reads absolute dates in the searching user's profile timezone.
pub fn build_query_in(mode: SyncMode, project_key: &str, tracker_tz: Tz) -> String {
    build_query_at(mode, project_key, Utc::now(), tracker_tz)
}

/// Build the search query for `mode` with an explicit "now".
///
/// `debug` shares the `full` predicate; its smaller page size is applied by the fetcher.
pub fn build_query_at(
    mode: SyncMode,
    project_key: &str,
    now: DateTime<Utc>,
    tracker_tz: Tz,
) -> String {
    let project = format!("project = {}", quote_jql_value(project_key));
    match mode {
        SyncMode::Full | SyncMode::Debug => format!("{} ORDER BY created DESC", project),
        SyncMode::Delta => {
            let since = (now - Duration::days(DELTA_WINDOW_DAYS))
                .with_timezone(&tracker_tz)
                .format(JQL_DATE_FORMAT)
                .to_string();
            format!(
                "{} AND (created >= \"{}\" OR updated >= \"{}\") ORDER BY updated DESC",
                project, since, since
            )
        }
    }
}

fn quote_jql_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
