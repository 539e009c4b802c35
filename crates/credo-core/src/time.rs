//! Epoch timestamp helpers.
//!
//! Session records and audit events are timestamped in epoch milliseconds;
//! the persisted audit record's retention TTL is epoch seconds. These
//! helpers are the single place that conversion lives so the two units
//! never get mixed up at call sites.

use time::OffsetDateTime;

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_epoch_ms() -> i64 {
    epoch_ms(OffsetDateTime::now_utc())
}

/// Current wall-clock time in epoch seconds.
#[must_use]
pub fn now_epoch_s() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Converts an [`OffsetDateTime`] to epoch milliseconds.
#[must_use]
pub fn epoch_ms(datetime: OffsetDateTime) -> i64 {
    // unix_timestamp_nanos fits well past year 2200 in an i64 of millis.
    (datetime.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_epoch_ms_known_instant() {
        let dt = datetime!(2024-01-01 00:00:00 UTC);
        assert_eq!(epoch_ms(dt), 1_704_067_200_000);
    }

    #[test]
    fn test_now_units_are_consistent() {
        let ms = now_epoch_ms();
        let s = now_epoch_s();
        // Captured back to back, so they describe (almost) the same instant.
        assert!((ms / 1000 - s).abs() <= 1);
    }

    #[test]
    fn test_now_epoch_ms_is_monotonic_enough() {
        let a = now_epoch_ms();
        let b = now_epoch_ms();
        assert!(b >= a);
    }
}
