use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike, Utc};
use std::fmt::{Display, Formatter};

use crate::common::Value;
use crate::document::Document;
use crate::errors::{ErrorKind, MappingError, MappingResult};

/// The family of date/time types the mapper knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// A calendar date without time zone, `chrono::NaiveDate`.
    Date,
    /// A date and time without time zone, `chrono::NaiveDateTime`.
    DateTime,
    /// A point on the UTC time line, `chrono::DateTime<Utc>`.
    Instant,
    /// A wall clock time, `chrono::NaiveTime`.
    Time,
}

impl Display for TemporalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TemporalKind::Date => write!(f, "NaiveDate"),
            TemporalKind::DateTime => write!(f, "NaiveDateTime"),
            TemporalKind::Instant => write!(f, "DateTime<Utc>"),
            TemporalKind::Time => write!(f, "NaiveTime"),
        }
    }
}

/// A date/time value on the domain side.
///
/// Without a property converter or a registered converter a temporal has no
/// agreed store format. The mapper then falls back to a component document
/// (`{"year": .., "month": .., "day": ..}` for a date, `{"epoch_second": ..,
/// "nano": ..}` for an instant and so on) which survives a round trip but is
/// of little use to a search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Temporal {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    Time(NaiveTime),
}

impl Temporal {
    pub fn kind(&self) -> TemporalKind {
        match self {
            Temporal::Date(_) => TemporalKind::Date,
            Temporal::DateTime(_) => TemporalKind::DateTime,
            Temporal::Instant(_) => TemporalKind::Instant,
            Temporal::Time(_) => TemporalKind::Time,
        }
    }

    /// Renders the value as an ISO-8601 string.
    pub fn to_iso_string(&self) -> String {
        match self {
            Temporal::Date(d) => d.format("%Y-%m-%d").to_string(),
            Temporal::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Temporal::Instant(i) => i.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Temporal::Time(t) => t.format("%H:%M:%S%.f").to_string(),
        }
    }

    /// Parses an ISO-8601 string into a temporal of the given kind.
    pub fn parse_iso(kind: TemporalKind, text: &str) -> MappingResult<Temporal> {
        let parsed = match kind {
            TemporalKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Temporal::Date),
            TemporalKind::DateTime => {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map(Temporal::DateTime)
            }
            TemporalKind::Instant => DateTime::parse_from_rfc3339(text)
                .map(|dt| Temporal::Instant(dt.with_timezone(&Utc))),
            TemporalKind::Time => NaiveTime::parse_from_str(text, "%H:%M:%S%.f").map(Temporal::Time),
        };

        parsed.map_err(|e| {
            log::error!("Cannot parse '{}' as {}: {}", text, kind, e);
            MappingError::new_with_cause(
                &format!("Cannot parse '{}' as {}", text, kind),
                ErrorKind::ConversionError,
                e.into(),
            )
            .with_target_type(kind)
        })
    }

    /// Splits the value into its components, the store shape used when no
    /// converter is configured.
    pub fn to_components(&self) -> Document {
        let mut doc = Document::new();
        match self {
            Temporal::Date(d) => {
                doc.insert("year", d.year());
                doc.insert("month", d.month());
                doc.insert("day", d.day());
            }
            Temporal::DateTime(dt) => {
                doc.insert("year", dt.year());
                doc.insert("month", dt.month());
                doc.insert("day", dt.day());
                doc.insert("hour", dt.hour());
                doc.insert("minute", dt.minute());
                doc.insert("second", dt.second());
                doc.insert("nano", dt.nanosecond());
            }
            Temporal::Instant(i) => {
                doc.insert("epoch_second", i.timestamp());
                doc.insert("nano", i.timestamp_subsec_nanos());
            }
            Temporal::Time(t) => {
                doc.insert("hour", t.hour());
                doc.insert("minute", t.minute());
                doc.insert("second", t.second());
                doc.insert("nano", t.nanosecond());
            }
        }
        doc
    }

    /// Rebuilds a temporal of the given kind from its component document.
    pub fn from_components(kind: TemporalKind, doc: &Document) -> MappingResult<Temporal> {
        let component = |name: &str| -> MappingResult<i64> {
            match doc.get(name) {
                Some(Value::I64(v)) => Ok(*v),
                other => {
                    log::error!("Missing component '{}' for {}, found {:?}", name, kind, other);
                    Err(MappingError::new(
                        &format!("Missing component '{}' for {}", name, kind),
                        ErrorKind::ConversionError,
                    )
                    .with_target_type(kind))
                }
            }
        };
        let invalid = || {
            log::error!("Invalid components {} for {}", doc, kind);
            MappingError::new(
                &format!("Invalid components {} for {}", doc, kind),
                ErrorKind::ConversionError,
            )
            .with_target_type(kind)
        };

        let date = |year: i64, month: i64, day: i64| {
            NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        };
        let time = |hour: i64, minute: i64, second: i64, nano: i64| {
            NaiveTime::from_hms_nano_opt(hour as u32, minute as u32, second as u32, nano as u32)
        };

        match kind {
            TemporalKind::Date => date(component("year")?, component("month")?, component("day")?)
                .map(Temporal::Date)
                .ok_or_else(invalid),
            TemporalKind::DateTime => {
                let d = date(component("year")?, component("month")?, component("day")?);
                let t = time(
                    component("hour")?,
                    component("minute")?,
                    component("second")?,
                    component("nano")?,
                );
                match (d, t) {
                    (Some(d), Some(t)) => Ok(Temporal::DateTime(d.and_time(t))),
                    _ => Err(invalid()),
                }
            }
            TemporalKind::Instant => {
                DateTime::from_timestamp(component("epoch_second")?, component("nano")? as u32)
                    .map(Temporal::Instant)
                    .ok_or_else(invalid)
            }
            TemporalKind::Time => time(
                component("hour")?,
                component("minute")?,
                component("second")?,
                component("nano")?,
            )
            .map(Temporal::Time)
            .ok_or_else(invalid),
        }
    }
}

impl Display for Temporal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso_string())
    }
}
