//! Wire representations of timestamps.

use crate::error::{Error, ErrorCode, Result};
use crate::schema::Schema;
use crate::ser::ShapeSerializer;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::{self, Display};
use std::str::FromStr;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// How a timestamp is carried on the wire.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum TimestampFormat {
    /// Seconds since the Unix epoch as a number, with optional fractional
    /// milliseconds.
    #[default]
    EpochSeconds,
    /// RFC 3339 date-time string, always in UTC: `1985-04-12T23:20:50.520Z`.
    DateTime,
    /// IMF-fixdate as used by HTTP: `Tue, 29 Apr 2014 18:30:38 GMT`.
    HttpDate,
}

impl TimestampFormat {
    /// The name of the format as written in the `timestampFormat` trait.
    pub fn name(self) -> &'static str {
        match self {
            TimestampFormat::EpochSeconds => "epoch-seconds",
            TimestampFormat::DateTime => "date-time",
            TimestampFormat::HttpDate => "http-date",
        }
    }

    /// Whether the format is carried as a number rather than a string.
    pub fn is_numeric(self) -> bool {
        self == TimestampFormat::EpochSeconds
    }

    /// Writes `value` in this format through `serializer`, as a number or a
    /// string depending on the format.
    pub fn write(
        self,
        schema: &Schema,
        value: DateTime<Utc>,
        serializer: &mut dyn ShapeSerializer,
    ) -> Result<()> {
        match self {
            TimestampFormat::EpochSeconds => {
                let millis = value.timestamp_millis();
                if millis % 1000 == 0 {
                    serializer.write_long(schema, millis / 1000)
                } else {
                    serializer.write_double(schema, millis as f64 / 1000.0)
                }
            }
            TimestampFormat::DateTime | TimestampFormat::HttpDate => {
                serializer.write_string(schema, &self.format(value))
            }
        }
    }

    /// Formats `value` as text. Epoch seconds are rendered as a decimal
    /// number.
    pub fn format(self, value: DateTime<Utc>) -> String {
        match self {
            TimestampFormat::EpochSeconds => {
                let millis = value.timestamp_millis();
                if millis % 1000 == 0 {
                    let mut buffer = itoa::Buffer::new();
                    buffer.format(millis / 1000).to_owned()
                } else {
                    let mut buffer = zmij::Buffer::new();
                    buffer.format(millis as f64 / 1000.0).to_owned()
                }
            }
            TimestampFormat::DateTime => value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            TimestampFormat::HttpDate => value.format(HTTP_DATE).to_string(),
        }
    }

    /// Parses a string representation of this format.
    pub fn parse_str(self, text: &str) -> Result<DateTime<Utc>> {
        match self {
            TimestampFormat::EpochSeconds => match text.parse::<f64>() {
                Ok(seconds) => from_epoch_seconds(seconds),
                Err(_) => Err(invalid(format!("`{}` is not a number of seconds", text))),
            },
            TimestampFormat::DateTime => match DateTime::parse_from_rfc3339(text) {
                Ok(value) => Ok(value.with_timezone(&Utc)),
                Err(err) => Err(invalid(format!("`{}` is not a date-time: {}", text, err))),
            },
            TimestampFormat::HttpDate => match DateTime::parse_from_rfc2822(text) {
                Ok(value) => Ok(value.with_timezone(&Utc)),
                Err(err) => Err(invalid(format!("`{}` is not an http-date: {}", text, err))),
            },
        }
    }
}

/// Converts seconds since the epoch, with fractional milliseconds, to an
/// instant.
pub fn from_epoch_seconds(seconds: f64) -> Result<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(invalid(format!("{} is not a finite number of seconds", seconds)));
    }
    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return Err(invalid(format!("{} seconds is out of range", seconds)));
    }
    match DateTime::from_timestamp_millis(millis as i64) {
        Some(value) => Ok(value),
        None => Err(invalid(format!("{} seconds is out of range", seconds))),
    }
}

/// Instant at zero seconds since the epoch.
pub(crate) fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

#[cold]
fn invalid(msg: String) -> Error {
    Error::data(ErrorCode::InvalidTimestamp(msg.into_boxed_str()))
}

impl Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimestampFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "epoch-seconds" => Ok(TimestampFormat::EpochSeconds),
            "date-time" => Ok(TimestampFormat::DateTime),
            "http-date" => Ok(TimestampFormat::HttpDate),
            _ => Err(Error::custom(format_args!("unknown timestamp format `{}`", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn format_each() {
        let t = instant(1_398_796_238_000);
        assert_eq!(TimestampFormat::EpochSeconds.format(t), "1398796238");
        assert_eq!(TimestampFormat::DateTime.format(t), "2014-04-29T18:30:38Z");
        assert_eq!(
            TimestampFormat::HttpDate.format(t),
            "Tue, 29 Apr 2014 18:30:38 GMT"
        );
        assert_eq!(TimestampFormat::EpochSeconds.format(instant(1_500)), "1.5");
    }

    #[test]
    fn parse_each() {
        let t = instant(1_398_796_238_000);
        assert_eq!(TimestampFormat::EpochSeconds.parse_str("1398796238").unwrap(), t);
        assert_eq!(
            TimestampFormat::DateTime.parse_str("2014-04-29T18:30:38Z").unwrap(),
            t
        );
        assert_eq!(
            TimestampFormat::HttpDate
                .parse_str("Tue, 29 Apr 2014 18:30:38 GMT")
                .unwrap(),
            t
        );
        assert!(TimestampFormat::DateTime.parse_str("yesterday").is_err());
    }

    #[test]
    fn epoch_seconds_bounds() {
        assert_eq!(from_epoch_seconds(1.25).unwrap(), instant(1_250));
        assert!(from_epoch_seconds(f64::NAN).is_err());
        assert!(from_epoch_seconds(1e300).is_err());
    }

    #[test]
    fn names() {
        for format in [
            TimestampFormat::EpochSeconds,
            TimestampFormat::DateTime,
            TimestampFormat::HttpDate,
        ] {
            assert_eq!(format.name().parse::<TimestampFormat>().unwrap(), format);
        }
    }
}
