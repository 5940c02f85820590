use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Whole days from `now` until `due`; negative once the date has passed.
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due - now).num_days()
}
