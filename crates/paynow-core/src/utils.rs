//! Helpers for building request values: order ids and gateway timestamps.

use chrono::{NaiveDateTime, TimeDelta, Utc};
use rand::Rng;

use crate::validation::ORDER_ID_MAX_CHARS;

/// The gateway keeps all timestamps in Japan Standard Time (UTC+9, no DST).
pub const JST_OFFSET_HOURS: i64 = 9;

/// Payment request lifetime used by [`expiry_datetime`] callers by default.
pub const DEFAULT_EXPIRY_HOURS: i64 = 6;

/// Format of every timestamp the gateway sends or accepts.
pub const DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

const ORDER_ID_SUFFIX_LEN: usize = 6;
const ORDER_ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate an order id: `prefix`, the current unix time in milliseconds, then
/// six random uppercase base-36 characters, cut to the 100 character limit.
///
/// The prefix is not checked; pass ASCII letters and digits to get an id that
/// passes [`validate_order_id`](crate::validation::validate_order_id).
pub fn generate_order_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_ID_SUFFIX_LEN)
        .map(|_| ORDER_ID_CHARSET[rng.random_range(0..ORDER_ID_CHARSET.len())] as char)
        .collect();

    format!("{prefix}{}{suffix}", Utc::now().timestamp_millis())
        .chars()
        .take(ORDER_ID_MAX_CHARS)
        .collect()
}

/// Current wall-clock time in the gateway's timezone.
pub fn gateway_now() -> NaiveDateTime {
    Utc::now().naive_utc() + TimeDelta::hours(JST_OFFSET_HOURS)
}

/// Render `datetime` as `YYYYMMDDhhmmss`.
pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

/// Gateway timestamp `hours` from now, e.g. for `nsfRecoveryExpiredDatetime`.
pub fn expiry_datetime(hours: i64) -> String {
    format_datetime(&(gateway_now() + TimeDelta::hours(hours)))
}
