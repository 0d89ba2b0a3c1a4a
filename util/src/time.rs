//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Number of microseconds in a millisecond
pub const MICROS_PER_MILLI: u32 = 1_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a number of milliseconds into microseconds, saturating on overflow.
pub fn millis_to_micros(millis: u32) -> u32 {
    millis.saturating_mul(MICROS_PER_MILLI)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(1500)),
            Some(1.5)
        );
        assert_eq!(millis_to_micros(4), 4000);
        assert_eq!(millis_to_micros(u32::MAX), u32::MAX);
    }
}
