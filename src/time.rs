// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time normalization shared by the delta-based gates.
//!
//! Origin timestamps look like `Wed Aug 27 13:08:45 +0000 2008`. A value
//! that does not parse means the upstream format changed, so parsing
//! failures surface as a fatal [`GateError::Timestamp`].

use crate::error::{GateError, Result};
use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Origin timestamp layout.
pub const ORIGIN_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse an origin timestamp into UTC.
pub fn parse_origin_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(value, ORIGIN_TIMESTAMP_FORMAT)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| GateError::Timestamp {
            field,
            value: value.to_string(),
            source,
        })
}

/// Render a UTC time in the origin layout.
pub fn format_origin_timestamp(time: DateTime<Utc>) -> String {
    time.format(ORIGIN_TIMESTAMP_FORMAT).to_string()
}

/// Round down to the whole second.
pub fn truncate_to_second(time: DateTime<Utc>) -> DateTime<Utc> {
    time.trunc_subsecs(0)
}

/// Round down to the whole hour.
pub fn truncate_to_hour(time: DateTime<Utc>) -> DateTime<Utc> {
    let into_hour = Duration::seconds(time.timestamp().rem_euclid(3600));
    truncate_to_second(time) - into_hour
}

/// Creation time of an event, at whole-second granularity.
pub fn event_time(created_at: &str) -> Result<DateTime<Utc>> {
    parse_origin_timestamp("created_at", created_at).map(truncate_to_second)
}

/// Signed time from `earlier` to `later`. Negative when `later` precedes `earlier`.
pub fn elapsed_since(earlier: DateTime<Utc>, later: DateTime<Utc>) -> Duration {
    later.signed_duration_since(earlier)
}

/// Account age at `now`, with both ends rounded down to the hour.
pub fn account_age(account_created_at: &str, now: DateTime<Utc>) -> Result<Duration> {
    let created = parse_origin_timestamp("user.created_at", account_created_at)?;
    Ok(elapsed_since(truncate_to_hour(created), truncate_to_hour(now)))
}
