use chrono::{DateTime, Datelike, NaiveDate};

/// First year of the supported window (1 January)
pub const MIN_SUPPORTED_YEAR: i32 = 2020;
/// Last year of the supported window (31 December)
pub const MAX_SUPPORTED_YEAR: i32 = 2050;

/// A date the regime rules cannot be applied to
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum UnsupportedDateError {
    #[error("invalid date: '{input}' (expected YYYY-MM-DD)")]
    InvalidDate { input: String },
    #[error(
        "date {date} is before the supported range (year must be {} or later)",
        MIN_SUPPORTED_YEAR
    )]
    BeforeSupportedRange { date: NaiveDate },
    #[error(
        "date {date} is after the supported range (year must be {} or earlier)",
        MAX_SUPPORTED_YEAR
    )]
    AfterSupportedRange { date: NaiveDate },
}

pub fn min_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_SUPPORTED_YEAR, 1, 1).expect("valid constant date")
}

pub fn max_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MAX_SUPPORTED_YEAR, 12, 31).expect("valid constant date")
}

/// Parse and range-check an effective date.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (the date portion is used).
pub fn is_date_supported(input: &str) -> Result<NaiveDate, UnsupportedDateError> {
    let date = parse_effective_date(input)?;
    check_supported(date)
}

/// Range-check an already parsed date
pub fn check_supported(date: NaiveDate) -> Result<NaiveDate, UnsupportedDateError> {
    match date.year() {
        y if y < MIN_SUPPORTED_YEAR => Err(UnsupportedDateError::BeforeSupportedRange { date }),
        y if y > MAX_SUPPORTED_YEAR => Err(UnsupportedDateError::AfterSupportedRange { date }),
        _ => Ok(date),
    }
}

fn parse_effective_date(input: &str) -> Result<NaiveDate, UnsupportedDateError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| UnsupportedDateError::InvalidDate {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bound_is_inclusive() {
        assert_eq!(
            is_date_supported("2020-01-01"),
            Ok(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        );
    }

    #[test]
    fn upper_bound_is_inclusive() {
        assert_eq!(
            is_date_supported("2050-12-31"),
            Ok(NaiveDate::from_ymd_opt(2050, 12, 31).unwrap())
        );
    }

    #[test]
    fn day_before_range_names_2020() {
        let err = is_date_supported("2019-12-31").unwrap_err();
        assert!(matches!(err, UnsupportedDateError::BeforeSupportedRange { .. }));
        assert!(err.to_string().contains("2020"));
    }

    #[test]
    fn day_after_range_names_2050() {
        let err = is_date_supported("2051-01-01").unwrap_err();
        assert!(matches!(err, UnsupportedDateError::AfterSupportedRange { .. }));
        assert!(err.to_string().contains("2050"));
    }

    #[test]
    fn unparseable_dates_are_invalid() {
        for input in ["", "not-a-date", "2025-02-30", "2025-13-01", "15/06/2030"] {
            let err = is_date_supported(input).unwrap_err();
            assert!(matches!(err, UnsupportedDateError::InvalidDate { .. }), "{input}");
            assert!(err.to_string().contains("invalid"), "{input}");
        }
    }

    #[test]
    fn rfc3339_timestamp_uses_date_portion() {
        assert_eq!(
            is_date_supported("2030-06-15T10:30:00-03:00"),
            Ok(NaiveDate::from_ymd_opt(2030, 6, 15).unwrap())
        );
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert!(is_date_supported(" 2027-01-01 ").is_ok());
    }

    #[test]
    fn check_supported_on_parsed_dates() {
        let early = NaiveDate::from_ymd_opt(1999, 6, 1).unwrap();
        assert!(check_supported(early).is_err());
        assert_eq!(check_supported(min_supported_date()), Ok(min_supported_date()));
        assert_eq!(check_supported(max_supported_date()), Ok(max_supported_date()));
    }
}
