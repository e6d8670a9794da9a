//! Timestamp conversion at the REST boundary

use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use serde::{Deserialize, Deserializer};

/// Parse a server timestamp into the viewer's local time.
///
/// Accepts RFC 3339 (`Z` or an explicit offset, optional fractional
/// seconds). Values without any zone are UTC, which is what the scheduler
/// stores.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }

    // Python's isoformat() uses a space separator in some paths
    let normalized = value.replacen(' ', "T", 1);
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Local));
    }

    let naive = normalized.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| Utc.from_utc_datetime(&dt).with_timezone(&Local))
}

pub fn deserialize_local<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

/// Format an instant for the `from`/`to` query parameters:
/// "2024-01-07T08:00:00.000Z"
pub fn format_query_time(instant: &DateTime<Local>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Local wall-clock time on `date` at `hour:00`.
///
/// Inside a DST gap the hour does not exist; take the first valid instant
/// after it instead of failing.
pub fn local_at(date: NaiveDate, hour: u32) -> DateTime<Local> {
    let naive = date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}
