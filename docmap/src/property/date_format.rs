use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt::{Display, Formatter, Write};

use crate::common::{Temporal, TemporalKind, Value};
use crate::errors::{ErrorKind, MappingError, MappingResult};

const DATE: &str = "%Y-%m-%d";
const DATE_TIME_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const DATE_TIME_ZULU: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const DATE_TIME_LOCAL: &str = "%Y-%m-%dT%H:%M:%S%.f";
const BASIC_DATE: &str = "%Y%m%d";
const BASIC_DATE_TIME_MILLIS: &str = "%Y%m%dT%H%M%S%.3fZ";
const BASIC_DATE_TIME: &str = "%Y%m%dT%H%M%S%.fZ";
const HOUR_MINUTE_SECOND: &str = "%H:%M:%S";

/// A store date format, named the way search engine mappings name them, or a
/// custom chrono pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateFormat {
    EpochMillis,
    EpochSecond,
    BasicDate,
    BasicDateTime,
    Date,
    DateTime,
    DateOptionalTime,
    StrictDateOptionalTime,
    HourMinuteSecond,
    YearMonthDay,
    /// A chrono `strftime` pattern, e.g. `%d.%m.%Y`.
    Pattern(String),
}

impl DateFormat {
    /// Parses a single format name or pattern.
    pub fn parse(name: &str) -> MappingResult<DateFormat> {
        let name = name.trim();
        let format = match name {
            "epoch_millis" => DateFormat::EpochMillis,
            "epoch_second" => DateFormat::EpochSecond,
            "basic_date" => DateFormat::BasicDate,
            "basic_date_time" => DateFormat::BasicDateTime,
            "date" | "strict_date" => DateFormat::Date,
            "date_time" | "strict_date_time" => DateFormat::DateTime,
            "date_optional_time" => DateFormat::DateOptionalTime,
            "strict_date_optional_time" => DateFormat::StrictDateOptionalTime,
            "hour_minute_second" | "strict_hour_minute_second" => DateFormat::HourMinuteSecond,
            "year_month_day" | "strict_year_month_day" => DateFormat::YearMonthDay,
            pattern if pattern.contains('%') => DateFormat::Pattern(pattern.to_string()),
            other => {
                log::error!("Unknown date format '{}'", other);
                return Err(MappingError::new(
                    &format!("Unknown date format '{}'", other),
                    ErrorKind::InvalidOperation,
                ));
            }
        };
        Ok(format)
    }

    /// Parses a list of formats separated by `,` or `||`.
    pub fn parse_list(formats: &str) -> MappingResult<Vec<DateFormat>> {
        let parsed = formats
            .split("||")
            .flat_map(|part| part.split(','))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(DateFormat::parse)
            .collect::<MappingResult<Vec<_>>>()?;

        if parsed.is_empty() {
            log::error!("No date format in '{}'", formats);
            return Err(MappingError::new(
                &format!("No date format in '{}'", formats),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(parsed)
    }

    /// Formats a temporal for the store.
    pub fn format(&self, temporal: &Temporal) -> MappingResult<String> {
        match self {
            DateFormat::EpochMillis => Ok(to_instant(temporal).timestamp_millis().to_string()),
            DateFormat::EpochSecond => Ok(to_instant(temporal).timestamp().to_string()),
            DateFormat::DateOptionalTime | DateFormat::StrictDateOptionalTime => match temporal {
                Temporal::Date(_) => format_with(temporal, DATE),
                _ => format_with(temporal, DATE_TIME_MILLIS),
            },
            _ => format_with(temporal, self.write_pattern()),
        }
    }

    /// Parses a stored value into a temporal of the given kind.
    pub fn parse_value(&self, kind: TemporalKind, value: &Value) -> MappingResult<Temporal> {
        match (self, value) {
            (DateFormat::EpochMillis, Value::I64(millis)) => from_epoch_millis(kind, *millis),
            (DateFormat::EpochSecond, Value::I64(seconds)) => {
                from_epoch_millis(kind, seconds.saturating_mul(1000))
            }
            (_, Value::String(text)) => self.parse_text(kind, text),
            (_, other) => {
                log::trace!("{} cannot parse a {} value", self, other.store_type());
                Err(MappingError::new(
                    &format!("{} cannot parse a {} value", self, other.store_type()),
                    ErrorKind::ConversionError,
                )
                .with_value_type(other.store_type()))
            }
        }
    }

    fn parse_text(&self, kind: TemporalKind, text: &str) -> MappingResult<Temporal> {
        match self {
            DateFormat::EpochMillis => from_epoch_millis(kind, text.trim().parse::<i64>()?),
            DateFormat::EpochSecond => {
                from_epoch_millis(kind, text.trim().parse::<i64>()?.saturating_mul(1000))
            }
            DateFormat::DateOptionalTime | DateFormat::StrictDateOptionalTime => {
                if kind == TemporalKind::Instant {
                    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
                        return Ok(Temporal::Instant(instant.with_timezone(&Utc)));
                    }
                }
                parse_first(kind, text, &[DATE_TIME_ZULU, DATE_TIME_LOCAL, DATE])
            }
            DateFormat::DateTime => parse_first(kind, text, &[DATE_TIME_ZULU, DATE_TIME_LOCAL]),
            DateFormat::BasicDateTime => parse_first(kind, text, &[BASIC_DATE_TIME]),
            _ => parse_first(kind, text, &[self.write_pattern()]),
        }
    }

    fn write_pattern(&self) -> &str {
        match self {
            DateFormat::BasicDate => BASIC_DATE,
            DateFormat::BasicDateTime => BASIC_DATE_TIME_MILLIS,
            DateFormat::Date | DateFormat::YearMonthDay => DATE,
            DateFormat::HourMinuteSecond => HOUR_MINUTE_SECOND,
            DateFormat::Pattern(pattern) => pattern,
            _ => DATE_TIME_MILLIS,
        }
    }
}

impl Display for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DateFormat::EpochMillis => write!(f, "epoch_millis"),
            DateFormat::EpochSecond => write!(f, "epoch_second"),
            DateFormat::BasicDate => write!(f, "basic_date"),
            DateFormat::BasicDateTime => write!(f, "basic_date_time"),
            DateFormat::Date => write!(f, "date"),
            DateFormat::DateTime => write!(f, "date_time"),
            DateFormat::DateOptionalTime => write!(f, "date_optional_time"),
            DateFormat::StrictDateOptionalTime => write!(f, "strict_date_optional_time"),
            DateFormat::HourMinuteSecond => write!(f, "hour_minute_second"),
            DateFormat::YearMonthDay => write!(f, "year_month_day"),
            DateFormat::Pattern(pattern) => write!(f, "{}", pattern),
        }
    }
}

fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

fn to_naive(temporal: &Temporal) -> NaiveDateTime {
    match temporal {
        Temporal::Date(d) => d.and_time(NaiveTime::MIN),
        Temporal::DateTime(dt) => *dt,
        Temporal::Instant(i) => i.naive_utc(),
        Temporal::Time(t) => epoch_date().and_time(*t),
    }
}

fn to_instant(temporal: &Temporal) -> DateTime<Utc> {
    match temporal {
        Temporal::Instant(i) => *i,
        other => to_naive(other).and_utc(),
    }
}

fn format_with(temporal: &Temporal, pattern: &str) -> MappingResult<String> {
    let mut out = String::new();
    // unsupported specifiers surface as a fmt error instead of a panic
    write!(out, "{}", to_naive(temporal).format(pattern)).map_err(|e| {
        log::error!("Cannot format {} with '{}'", temporal, pattern);
        MappingError::new_with_cause(
            &format!("Cannot format {} with '{}'", temporal, pattern),
            ErrorKind::ConversionError,
            e.into(),
        )
    })?;
    Ok(out)
}

fn from_epoch_millis(kind: TemporalKind, millis: i64) -> MappingResult<Temporal> {
    let instant = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        log::trace!("Epoch millis {} out of range", millis);
        MappingError::new(
            &format!("Epoch millis {} out of range", millis),
            ErrorKind::ConversionError,
        )
    })?;
    Ok(from_instant(kind, instant))
}

fn from_instant(kind: TemporalKind, instant: DateTime<Utc>) -> Temporal {
    match kind {
        TemporalKind::Date => Temporal::Date(instant.date_naive()),
        TemporalKind::DateTime => Temporal::DateTime(instant.naive_utc()),
        TemporalKind::Instant => Temporal::Instant(instant),
        TemporalKind::Time => Temporal::Time(instant.time()),
    }
}

fn parse_first(kind: TemporalKind, text: &str, patterns: &[&str]) -> MappingResult<Temporal> {
    let mut last_error = None;
    for pattern in patterns {
        match parse_with(kind, text, pattern) {
            Ok(temporal) => return Ok(temporal),
            Err(e) => last_error = Some(e),
        }
    }

    let cause = last_error.map(MappingError::from);
    let message = format!("Cannot parse '{}' as {}", text, kind);
    Err(match cause {
        Some(cause) => MappingError::new_with_cause(&message, ErrorKind::ConversionError, cause),
        None => MappingError::new(&message, ErrorKind::ConversionError),
    })
}

fn parse_with(kind: TemporalKind, text: &str, pattern: &str) -> Result<Temporal, chrono::ParseError> {
    match kind {
        TemporalKind::Time => NaiveTime::parse_from_str(text, pattern).map(Temporal::Time),
        TemporalKind::Date => NaiveDate::parse_from_str(text, pattern).map(Temporal::Date),
        TemporalKind::DateTime => parse_date_time(text, pattern).map(Temporal::DateTime),
        TemporalKind::Instant => {
            parse_date_time(text, pattern).map(|dt| Temporal::Instant(dt.and_utc()))
        }
    }
}

/// Parses a date time, accepting date-only patterns as midnight.
fn parse_date_time(text: &str, pattern: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, pattern).or_else(|e| {
        NaiveDate::parse_from_str(text, pattern)
            .map(|d| d.and_time(NaiveTime::MIN))
            .map_err(|_| e)
    })
}
