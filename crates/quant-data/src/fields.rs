//! Field decoding shared by the record variants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use quant_core::error::ParseError;
use quant_core::types::{FeedKind, Resolution};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Formats accepted for absolute dates in daily archives.
const DAILY_FORMATS: [&str; 3] = ["%Y%m%d %H:%M", "%Y%m%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// One source line split into comma-separated fields.
#[derive(Debug)]
pub(crate) struct Fields {
    kind: &'static str,
    record: StringRecord,
}

impl Fields {
    /// Split `line`, requiring exactly `expected` fields.
    pub(crate) fn split(kind: &'static str, line: &str, expected: usize) -> Result<Self, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(ParseError::malformed(kind, "empty line"));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(trimmed.as_bytes());

        let mut record = StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return Err(ParseError::malformed(kind, "empty line")),
            Err(e) => return Err(ParseError::malformed(kind, e.to_string())),
        }

        if record.len() != expected {
            return Err(ParseError::malformed(
                kind,
                format!("expected {} fields, found {}", expected, record.len()),
            ));
        }

        Ok(Self { kind, record })
    }

    fn text(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or_default()
    }

    /// A finite, non-negative number such as a price, size or volume.
    pub(crate) fn non_negative(&self, index: usize, field: &'static str) -> Result<f64, ParseError> {
        let raw = self.text(index);
        let value: f64 = raw.parse().map_err(|_| {
            ParseError::malformed(self.kind, format!("{} is not a number: '{}'", field, raw))
        })?;

        if !value.is_finite() || value < 0.0 {
            return Err(ParseError::OutOfRange {
                kind: self.kind,
                field,
                value,
            });
        }
        Ok(value)
    }

    /// Decode the time field according to where the line came from.
    ///
    /// * Backtest, intraday: milliseconds since midnight of `as_of`
    /// * Backtest, daily: an absolute `YYYYMMDD[ HH:MM]` date
    /// * Live: Unix epoch milliseconds
    pub(crate) fn time(
        &self,
        index: usize,
        resolution: Resolution,
        as_of: NaiveDate,
        feed: FeedKind,
    ) -> Result<DateTime<Utc>, ParseError> {
        let raw = self.text(index);
        match feed {
            FeedKind::Backtest if resolution.is_intraday() => {
                let offset = self.integer(raw)?;
                if !(0..MILLIS_PER_DAY).contains(&offset) {
                    return Err(ParseError::OutOfRange {
                        kind: self.kind,
                        field: "time",
                        value: offset as f64,
                    });
                }
                let midnight = as_of.and_time(NaiveTime::MIN).and_utc();
                Ok(midnight + TimeDelta::milliseconds(offset))
            }
            FeedKind::Backtest => self.absolute_date(raw),
            FeedKind::LiveTrading => {
                let millis = self.integer(raw)?;
                DateTime::from_timestamp_millis(millis).ok_or(ParseError::OutOfRange {
                    kind: self.kind,
                    field: "time",
                    value: millis as f64,
                })
            }
        }
    }

    fn integer(&self, raw: &str) -> Result<i64, ParseError> {
        raw.parse::<i64>().map_err(|_| {
            ParseError::malformed(self.kind, format!("time is not an integer: '{}'", raw))
        })
    }

    fn absolute_date(&self, raw: &str) -> Result<DateTime<Utc>, ParseError> {
        for format in DAILY_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(dt.and_utc());
            }
        }
        for format in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
                return Ok(d.and_time(NaiveTime::MIN).and_utc());
            }
        }

        Err(ParseError::malformed(
            self.kind,
            format!("could not parse date: '{}'", raw),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_split_counts_fields() {
        assert!(Fields::split("test", "1,2,3", 3).is_ok());
        assert!(matches!(
            Fields::split("test", "1,2", 3),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            Fields::split("test", "   ", 1),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn test_split_trims_fields() {
        let fields = Fields::split("test", " 1.5 , 2 ", 2).unwrap();
        assert_eq!(fields.non_negative(0, "a").unwrap(), 1.5);
    }

    #[test]
    fn test_non_negative() {
        let fields = Fields::split("test", "abc,-1,inf,NaN,0", 5).unwrap();

        assert!(matches!(
            fields.non_negative(0, "a"),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            fields.non_negative(1, "b"),
            Err(ParseError::OutOfRange { field: "b", .. })
        ));
        assert!(matches!(
            fields.non_negative(2, "c"),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            fields.non_negative(3, "d"),
            Err(ParseError::OutOfRange { .. })
        ));
        assert_eq!(fields.non_negative(4, "e").unwrap(), 0.0);
    }

    #[test]
    fn test_intraday_offset_from_midnight() {
        let fields = Fields::split("test", "34200000", 1).unwrap();
        let time = fields
            .time(0, Resolution::Minute, as_of(), FeedKind::Backtest)
            .unwrap();

        let expected = as_of().and_hms_opt(9, 30, 0).unwrap().and_utc();
        assert_eq!(time, expected);
    }

    #[test]
    fn test_intraday_offset_outside_day() {
        let fields = Fields::split("test", "86400000", 1).unwrap();
        assert!(matches!(
            fields.time(0, Resolution::Second, as_of(), FeedKind::Backtest),
            Err(ParseError::OutOfRange { field: "time", .. })
        ));
    }

    #[test]
    fn test_daily_absolute_dates() {
        let fields = Fields::split("test", "20240110 16:00,20240111,bad", 3).unwrap();

        let with_time = fields
            .time(0, Resolution::Daily, as_of(), FeedKind::Backtest)
            .unwrap();
        assert_eq!(
            with_time,
            NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(16, 0, 0)
                .unwrap()
                .and_utc()
        );

        let date_only = fields
            .time(1, Resolution::Daily, as_of(), FeedKind::Backtest)
            .unwrap();
        assert_eq!(date_only.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());

        assert!(fields
            .time(2, Resolution::Daily, as_of(), FeedKind::Backtest)
            .is_err());
    }

    #[test]
    fn test_live_epoch_millis() {
        let fields = Fields::split("test", "1705312800000", 1).unwrap();
        let time = fields
            .time(0, Resolution::Minute, as_of(), FeedKind::LiveTrading)
            .unwrap();
        assert_eq!(time.timestamp_millis(), 1_705_312_800_000);
    }
}
