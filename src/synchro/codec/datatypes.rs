//! Fixed encodings of Synchro primitive values.
//!
//! These are pure conversions from raw integers or byte arrays; reading the
//! bytes off the stream is the job of [`StreamReader`](crate::synchro::stream::StreamReader).

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::synchro::types::error::{Result, SynchroError};
use crate::synchro::types::models::Duration;

/// Raw value used by dates and durations to mean "not set".
pub const NULL_SECONDS: u32 = 0x9340_6FFF;

/// Stored dates are one hour ahead of the Unix epoch based value.
pub const DATE_OFFSET_SECONDS: i64 = 3600;

/// Stored times of day are offset by one whole day.
pub const TIME_OFFSET_SECONDS: i64 = 86_400;

const MINUTES_PER_DAY: i64 = 1440;

/// Builds a UUID from its 16 stored bytes.
///
/// The first three groups are stored little-endian and the final eight bytes
/// as-is, i.e. the stored order is `3 2 1 0 5 4 7 6 8 9 10 11 12 13 14 15`
/// relative to the canonical big-endian form.
pub fn uuid_from_bytes(bytes: [u8; 16]) -> Uuid {
    Uuid::from_bytes_le(bytes)
}

/// Converts a stored date to a timestamp, or `None` for the null sentinel.
///
/// The stored value is a signed count, so raw values from `0x80000000` up are
/// dates before 1970.
pub fn date_from_seconds(value: u32) -> Option<NaiveDateTime> {
    if value == NULL_SECONDS {
        return None;
    }
    let seconds = i64::from(value as i32) - DATE_OFFSET_SECONDS;
    DateTime::from_timestamp(seconds, 0).map(|date| date.naive_utc())
}

/// Converts a stored time of day to a wall-clock time.
///
/// The value is reduced to whole minutes past midnight. End-of-day (24:00)
/// wraps to midnight.
///
/// # Errors
/// Returns [`SynchroError::InvalidValue`] if the value lies outside one day.
pub fn time_from_value(value: u32) -> Result<NaiveTime> {
    let seconds = i64::from(value) - TIME_OFFSET_SECONDS;
    if !(0..=TIME_OFFSET_SECONDS).contains(&seconds) {
        return Err(SynchroError::InvalidValue(format!(
            "time value {:#010x} is outside a single day",
            value
        )));
    }

    let minutes = (seconds / 60) % MINUTES_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt((minutes * 60) as u32, 0).ok_or_else(|| {
        SynchroError::InvalidValue(format!("invalid minutes past midnight: {}", minutes))
    })
}

/// Converts a stored duration in seconds to hours, or `None` for the null sentinel.
pub fn duration_from_seconds(value: u32) -> Option<Duration> {
    if value == NULL_SECONDS {
        return None;
    }
    Some(Duration::from_seconds(i64::from(value)))
}

/// Interprets raw bits as an IEEE double. NaN is normalised to zero.
pub fn double_from_bits(bits: u64) -> f64 {
    let value = f64::from_bits(bits);
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
