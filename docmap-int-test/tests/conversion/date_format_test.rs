use crate::model::{register_all, Diary, Event};
use chrono::{NaiveDate, NaiveDateTime};
use docmap::common::{Bound, Object, Range, StoreType, Temporal, TemporalKind, TypeRef, Value};
use docmap::conversion::{ConversionRegistry, FnReadingConverter, FnWritingConverter};
use docmap::doc;
use docmap::errors::{ErrorKind, MappingError};
use docmap::mapping::MappingConverter;
use docmap_int_test::test_util::{assert_error_kind, create_test_context, run_test};
use std::sync::Arc;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}

fn german_dates() -> ConversionRegistry {
    ConversionRegistry::builder()
        .add_writing_converter(Arc::new(FnWritingConverter::new(
            TypeRef::Temporal(TemporalKind::Date),
            StoreType::String,
            |value: &Object| match value {
                Object::Temporal(Temporal::Date(date)) => {
                    Ok(Value::from(date.format("%d.%m.%Y").to_string()))
                }
                _ => Err(MappingError::conversion("not a date")),
            },
        )))
        .add_reading_converter(Arc::new(FnReadingConverter::new(
            StoreType::String,
            TypeRef::Temporal(TemporalKind::Date),
            |value: &Value| {
                let text = value
                    .as_str()
                    .ok_or_else(|| MappingError::conversion("not a string"))?;
                let date = NaiveDate::parse_from_str(text, "%d.%m.%Y")?;
                Ok(Object::Temporal(Temporal::Date(date)))
            },
        )))
        .build()
        .unwrap()
}

#[test]
fn test_property_format_wins_over_registered_converter() {
    run_test(
        || {
            create_test_context(
                register_all(MappingConverter::builder()).conversions(german_dates()),
            )
        },
        |ctx| {
            let converter = ctx.converter();
            let diary = Diary {
                created: Some(date(2024, 2, 29)),
                entries_on: Some(date(2024, 3, 1)),
            };

            let document = converter.write_entity(&diary)?;
            assert_eq!(document.get("created"), Some(&Value::from("20240229")));
            assert_eq!(document.get("entries_on"), Some(&Value::from("01.03.2024")));

            let restored: Diary = converter.read_entity(&document)?;
            assert_eq!(restored, diary);
            Ok(())
        },
    )
}

#[test]
fn test_registered_converter_reads_unformatted_dates() {
    let converter = register_all(MappingConverter::builder())
        .conversions(german_dates())
        .build()
        .unwrap();
    let document = doc! {
        created: "20231224",
        entries_on: "24.12.2023",
    };

    let diary: Diary = converter.read_entity(&document).unwrap();
    assert_eq!(diary.created, Some(date(2023, 12, 24)));
    assert_eq!(diary.entries_on, Some(date(2023, 12, 24)));
}

#[test]
fn test_unparsable_date_names_property() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let err = assert_error_kind(
        converter.read_entity::<Diary>(&doc! { created: "2023-12-24" }),
        ErrorKind::ConversionError,
    );
    assert_eq!(err.context().property.as_deref(), Some("created"));
}

#[test]
fn test_unformatted_date_without_converter_uses_iso_or_components() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let diary = Diary {
        created: None,
        entries_on: Some(date(2024, 3, 1)),
    };

    let document = converter.write_entity(&diary).unwrap();
    assert_eq!(document.get("entries_on.year"), Some(&Value::I64(2024)));
    assert_eq!(document.get("entries_on.month"), Some(&Value::I64(3)));
    assert_eq!(document.get("entries_on.day"), Some(&Value::I64(1)));
    assert!(!document.contains_key("created"));
    assert_eq!(converter.read_entity::<Diary>(&document).unwrap(), diary);

    // an ISO string is still understood
    let from_string: Diary = converter
        .read_entity(&doc! { entries_on: "2024-03-01" })
        .unwrap();
    assert_eq!(from_string, diary);
}

#[test]
fn test_ranges_and_date_time_lists() {
    run_test(
        || create_test_context(register_all(MappingConverter::builder())),
        |ctx| {
            let converter = ctx.converter();
            let checkpoint = date_time(2024, 6, 1, 10, 0);
            let event = Event {
                name: "Conference".to_string(),
                period: Some(Range::right_open(date(2024, 6, 1), date(2024, 6, 8))),
                attendance: Some(Range::closed(100, 250)),
                started_at: Some(date_time(2024, 6, 1, 9, 30)),
                checkpoints: vec![checkpoint],
            };

            let document = converter.write_entity(&event)?;
            assert_eq!(document.get("period.gte"), Some(&Value::from("2024-06-01")));
            assert_eq!(document.get("period.lt"), Some(&Value::from("2024-06-08")));
            assert!(document.get("period.lte").is_none());
            assert_eq!(document.get("attendance.gte"), Some(&Value::I64(100)));
            assert_eq!(document.get("attendance.lte"), Some(&Value::I64(250)));
            assert_eq!(document.get("started_at.hour"), Some(&Value::I64(9)));
            assert_eq!(document.get("started_at.minute"), Some(&Value::I64(30)));
            assert_eq!(
                document.get("checkpoints"),
                Some(&Value::Array(vec![Value::from(
                    checkpoint.and_utc().timestamp_millis().to_string()
                )]))
            );

            let restored: Event = converter.read_entity(&document)?;
            assert_eq!(restored, event);
            Ok(())
        },
    )
}

#[test]
fn test_epoch_millis_reads_numbers() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        name: "Launch",
        checkpoints: [1717236000000_i64, "1717239600000"],
        period: { gte: "2024-06-01" },
    };

    let event: Event = converter.read_entity(&document).unwrap();
    assert_eq!(
        event.checkpoints,
        vec![date_time(2024, 6, 1, 10, 0), date_time(2024, 6, 1, 11, 0)]
    );
    assert_eq!(
        event.period,
        Some(Range::new(
            Bound::Inclusive(date(2024, 6, 1)),
            Bound::Unbounded,
        ))
    );
}
