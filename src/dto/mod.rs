use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod health;
pub mod history;
pub mod remote;
pub mod score;
pub mod sse;
pub mod stats;
pub mod validation;

fn format_timestamp(timestamp_ms: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp_ms) * 1_000_000)
        .ok()
        .and_then(|time| time.format(&Rfc3339).ok())
        .unwrap_or_else(|| "invalid-timestamp".into())
}
