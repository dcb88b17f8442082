// Module name shadows the `serde` crate — use `::serde` for the external crate.
use ::serde::Serializer;
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
///
/// Response timestamps all go through this so clients see one format
/// regardless of the precision Postgres hands back.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
