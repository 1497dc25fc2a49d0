//! Shared utility functions for ocean navigator crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, Datelike, Timelike, Utc};
    use nav_core::map::Quantum;

    /// Render a timestamp as an ISO-8601 string truncated to the precision of
    /// `quantum`, always in UTC with a `+00:00` suffix.
    ///
    /// This does not check that the instant exists in any dataset.
    pub fn date_to_iso(date: &DateTime<Utc>, quantum: Quantum) -> String {
        let (y, mo, d) = (date.year(), date.month(), date.day());
        let (h, mi, s) = (date.hour(), date.minute(), date.second());
        match quantum {
            Quantum::Min => format!("{:04}-{:02}-{:02}T{:02}:{:02}:00+00:00", y, mo, d, h, mi),
            Quantum::Hour => format!("{:04}-{:02}-{:02}T{:02}:00:00+00:00", y, mo, d, h),
            Quantum::Day => format!("{:04}-{:02}-{:02}T00:00:00+00:00", y, mo, d),
            Quantum::Month => format!("{:04}-{:02}-01T00:00:00+00:00", y, mo),
            Quantum::Year => format!("{:04}-01-01T00:00:00+00:00", y),
            Quantum::None => format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}+00:00",
                y, mo, d, h, mi, s
            ),
        }
    }

    /// Parse an RFC 3339 timestamp ("2023-06-05T14:37:00Z") into UTC.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(s.trim())?.with_timezone(&Utc))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::TimeZone;

        fn sample() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2023, 6, 5, 14, 37, 9).unwrap()
        }

        #[test]
        fn test_day_precision_pads_day_and_month() {
            assert_eq!(date_to_iso(&sample(), Quantum::Day), "2023-06-05T00:00:00+00:00");
        }

        #[test]
        fn test_year_precision() {
            assert_eq!(date_to_iso(&sample(), Quantum::Year), "2023-01-01T00:00:00+00:00");
        }

        #[test]
        fn test_month_hour_minute_precision() {
            assert_eq!(date_to_iso(&sample(), Quantum::Month), "2023-06-01T00:00:00+00:00");
            assert_eq!(date_to_iso(&sample(), Quantum::Hour), "2023-06-05T14:00:00+00:00");
            assert_eq!(date_to_iso(&sample(), Quantum::Min), "2023-06-05T14:37:00+00:00");
        }

        #[test]
        fn test_unknown_quantum_keeps_seconds() {
            assert_eq!(date_to_iso(&sample(), Quantum::None), "2023-06-05T14:37:09+00:00");
        }

        #[test]
        fn test_parse_timestamp_converts_offsets() {
            let parsed = parse_timestamp("2023-06-05T16:37:09+02:00").unwrap();
            assert_eq!(parsed, sample());
            assert!(parse_timestamp("not a date").is_err());
        }
    }
}
