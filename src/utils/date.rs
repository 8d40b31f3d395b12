use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %I:%M %p";

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("`{value}` does not match date format `{format}`")]
    Format { value: String, format: String },
    #[error("`{0}` is not a platform timestamp")]
    Timestamp(String),
    #[error("unknown timezone `{0}`")]
    UnknownZone(String),
}

/// Timezone every calendar date is resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    pub fn parse(name: &str) -> Result<Self, DateError> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        name.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| DateError::UnknownZone(name.to_string()))
    }

    fn format(&self, instant: &DateTime<Utc>, format: &str) -> String {
        match self {
            Zone::Local => instant.with_timezone(&Local).format(format).to_string(),
            Zone::Named(tz) => instant.with_timezone(tz).format(format).to_string(),
        }
    }

    pub fn date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        match self {
            Zone::Local => instant.with_timezone(&Local).date_naive(),
            Zone::Named(tz) => instant.with_timezone(tz).date_naive(),
        }
    }
}

/// Zone and key format shared by the daily counter, the log builder and the reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateConfig {
    pub zone: Zone,
    pub format: String,
}

impl DateConfig {
    pub fn new(zone: Zone, format: impl ToString) -> Self {
        Self {
            zone,
            format: format.to_string(),
        }
    }
}

impl Default for DateConfig {
    fn default() -> Self {
        Self::new(Zone::Local, DISPLAY_DATE_FORMAT)
    }
}

/// Platform timestamps without an offset are UTC.
pub fn attach_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    naive.and_utc()
}

pub fn parse_platform_timestamp(raw: &str) -> Result<DateTime<Utc>, DateError> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(attach_utc)
        .ok_or_else(|| DateError::Timestamp(raw.to_string()))
}

pub fn to_display_string(instant: &DateTime<Utc>, config: &DateConfig) -> String {
    config.zone.format(instant, &config.format)
}

pub fn to_display_time(instant: &DateTime<Utc>, config: &DateConfig) -> String {
    config.zone.format(instant, DISPLAY_TIME_FORMAT)
}

pub fn date_key(date: &NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

pub fn parse_display_string(value: &str, format: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value, format).map_err(|_| DateError::Format {
        value: value.to_string(),
        format: format.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn shanghai() -> DateConfig {
        DateConfig::new(Zone::Named(chrono_tz::Asia::Shanghai), DISPLAY_DATE_FORMAT)
    }

    #[test]
    fn naive_timestamp_is_read_as_utc() {
        let parsed = parse_platform_timestamp("2015-09-01T20:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 9, 1, 20, 0, 0).unwrap());
    }

    #[test]
    fn offset_timestamp_is_normalized_to_utc() {
        let parsed = parse_platform_timestamp("2015-09-02T04:00:00+08:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 9, 1, 20, 0, 0).unwrap());
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert_eq!(
            parse_platform_timestamp("yesterday"),
            Err(DateError::Timestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn display_string_uses_configured_zone() {
        let instant = Utc.with_ymd_and_hms(2015, 9, 1, 20, 0, 0).unwrap();
        assert_eq!(to_display_string(&instant, &shanghai()), "2015-09-02");

        let utc = DateConfig::new(Zone::Named(chrono_tz::UTC), DISPLAY_DATE_FORMAT);
        assert_eq!(to_display_string(&instant, &utc), "2015-09-01");
    }

    #[test]
    fn display_time_is_twelve_hour() {
        let instant = Utc.with_ymd_and_hms(2015, 9, 1, 20, 5, 0).unwrap();
        assert_eq!(to_display_time(&instant, &shanghai()), "2015-09-02 04:05 AM");
    }

    #[test]
    fn parse_display_string_inverts_formatting() {
        let date = NaiveDate::from_ymd_opt(2015, 8, 30).unwrap();
        let key = date_key(&date, DISPLAY_DATE_FORMAT);
        assert_eq!(key, "2015-08-30");
        assert_eq!(parse_display_string(&key, DISPLAY_DATE_FORMAT), Ok(date));
    }

    #[test]
    fn parse_display_string_reports_mismatched_format() {
        let err = parse_display_string("30/08/2015", DISPLAY_DATE_FORMAT).unwrap_err();
        assert_eq!(
            err,
            DateError::Format {
                value: "30/08/2015".to_string(),
                format: DISPLAY_DATE_FORMAT.to_string(),
            }
        );
    }

    #[test]
    fn zone_parsing() {
        assert_eq!(Zone::parse("local"), Ok(Zone::Local));
        assert_eq!(
            Zone::parse("Europe/Berlin"),
            Ok(Zone::Named(chrono_tz::Europe::Berlin))
        );
        assert_eq!(
            Zone::parse("Mars/Olympus"),
            Err(DateError::UnknownZone("Mars/Olympus".to_string()))
        );
    }
}
