use std::time::Duration;

use time::{OffsetDateTime, UtcOffset};

#[must_use]
pub fn format_utc(datetime: OffsetDateTime) -> String {
    let dt = datetime.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.millisecond()
    )
}

#[must_use]
pub fn now_utc_rfc3339() -> String {
    format_utc(OffsetDateTime::now_utc())
}

/// Whole milliseconds, saturating at `u64::MAX`.
#[must_use]
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{duration_millis, format_utc};
    use std::time::Duration;
    use time::OffsetDateTime;

    #[test]
    fn formats_with_millis_and_zulu_suffix() {
        let datetime = OffsetDateTime::from_unix_timestamp_nanos(1_704_164_645_250_000_000)
            .expect("timestamp should be in range");
        assert_eq!(format_utc(datetime), "2024-01-02T03:04:05.250Z");
    }

    #[test]
    fn duration_millis_truncates_sub_millisecond_part() {
        assert_eq!(duration_millis(Duration::from_micros(2_999)), 2);
    }

    #[test]
    fn duration_millis_saturates_instead_of_wrapping() {
        assert_eq!(duration_millis(Duration::MAX), u64::MAX);
    }
}
