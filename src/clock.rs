//! Rendering of the current instant in a configured time zone.

use jiff::Zoned;
use jiff::tz::{Offset, TimeZone};

use crate::error::{Error, Result};

/// strftime layout for RFC 3339 timestamps at second precision.
///
/// A zero UTC offset is written as `Z` rather than `+00:00`.
pub const RFC3339: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Formats clock readings in a fixed zone with a fixed layout.
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    zone: TimeZone,
    format: &'static str,
}

impl TimeFormatter {
    pub const fn new(zone: TimeZone, format: &'static str) -> Self {
        Self { zone, format }
    }

    /// The zone readings are converted into.
    pub const fn zone(&self) -> &TimeZone {
        &self.zone
    }

    /// Render the current instant.
    pub fn now(&self) -> String {
        self.format(&Zoned::now().with_time_zone(self.zone.clone()))
    }

    /// Render `zoned` after converting it into the configured zone.
    pub fn format(&self, zoned: &Zoned) -> String {
        let zoned = zoned.with_time_zone(self.zone.clone());
        let text = zoned.strftime(self.format).to_string();

        if zoned.offset() == Offset::UTC {
            if let Some(stripped) = text.strip_suffix("+00:00") {
                return format!("{stripped}Z");
            }
        }
        text
    }
}

/// Resolve an IANA time zone identifier such as `America/New_York`.
pub fn parse_time_zone(name: &str) -> Result<TimeZone> {
    TimeZone::get(name).map_err(|source| Error::InvalidTimeZone {
        name: name.to_string(),
        source,
    })
}

/// Format a UTC offset as "+HH:MM" or "-HH:MM".
///
/// Correctly handles fractional-hour offsets (e.g., +05:45 for Asia/Kathmandu).
pub fn format_utc_offset(offset: Offset) -> String {
    let total_seconds = offset.seconds();
    let sign = if total_seconds < 0 { '-' } else { '+' };
    let abs_seconds = total_seconds.unsigned_abs();
    let hours = abs_seconds / 3600;
    let minutes = (abs_seconds % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    fn formatter(zone: &str) -> TimeFormatter {
        TimeFormatter::new(parse_time_zone(zone).unwrap(), RFC3339)
    }

    #[test]
    fn parse_time_zone_returns_ok_for_valid_iana_name() {
        assert!(parse_time_zone("America/New_York").is_ok());
    }

    #[test]
    fn parse_time_zone_returns_err_for_invalid_name() {
        let err = parse_time_zone("Not/AZone").unwrap_err();
        assert!(
            err.to_string().contains("Not/AZone"),
            "Error was: {err}"
        );
    }

    #[test]
    fn format_writes_zero_offset_as_z() {
        let instant: Timestamp = "2024-03-10T12:34:56Z".parse().unwrap();
        let text = formatter("UTC").format(&instant.to_zoned(TimeZone::UTC));
        assert_eq!(text, "2024-03-10T12:34:56Z");
    }

    #[test]
    fn format_writes_negative_offset_for_new_york() {
        let instant: Timestamp = "2024-01-15T17:00:00Z".parse().unwrap();
        let text = formatter("America/New_York").format(&instant.to_zoned(TimeZone::UTC));
        assert_eq!(text, "2024-01-15T12:00:00-05:00");
    }

    #[test]
    fn format_follows_daylight_saving_time() {
        let instant: Timestamp = "2024-07-15T16:00:00Z".parse().unwrap();
        let text = formatter("America/New_York").format(&instant.to_zoned(TimeZone::UTC));
        assert_eq!(text, "2024-07-15T12:00:00-04:00");
    }

    #[test]
    fn format_writes_fractional_offset_for_kathmandu() {
        let instant: Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        let text = formatter("Asia/Kathmandu").format(&instant.to_zoned(TimeZone::UTC));
        assert_eq!(text, "2024-01-01T05:45:00+05:45");
    }

    #[test]
    fn format_uses_z_for_zones_currently_at_utc() {
        // London is on GMT in January.
        let instant: Timestamp = "2024-01-15T08:00:00Z".parse().unwrap();
        let text = formatter("Europe/London").format(&instant.to_zoned(TimeZone::UTC));
        assert_eq!(text, "2024-01-15T08:00:00Z");
    }

    #[test]
    fn now_round_trips_through_timestamp_parsing() {
        for zone in ["UTC", "America/New_York", "Asia/Kathmandu", "Australia/Lord_Howe"] {
            let formatter = formatter(zone);
            let text = formatter.now();
            let parsed: Timestamp = text
                .parse()
                .unwrap_or_else(|e| panic!("{zone}: {text} did not parse: {e}"));

            let expected = format_utc_offset(formatter.zone().to_offset(parsed));
            let actual = if text.ends_with('Z') {
                "+00:00"
            } else {
                &text[text.len() - 6..]
            };
            assert_eq!(actual, expected, "{zone}: {text}");
        }
    }

    #[test]
    fn format_utc_offset_formats_positive_whole_hours() {
        let offset = Offset::from_seconds(5 * 3600).unwrap();
        assert_eq!(format_utc_offset(offset), "+05:00");
    }

    #[test]
    fn format_utc_offset_formats_negative_whole_hours() {
        let offset = Offset::from_seconds(-5 * 3600).unwrap();
        assert_eq!(format_utc_offset(offset), "-05:00");
    }

    #[test]
    fn format_utc_offset_formats_zero_as_positive() {
        assert_eq!(format_utc_offset(Offset::UTC), "+00:00");
    }
}
