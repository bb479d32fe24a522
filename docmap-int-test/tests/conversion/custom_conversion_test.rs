use crate::model::{register_all, Celsius, Invoice, Ledger, Sensor, Venue};
use bigdecimal::BigDecimal;
use docmap::common::{Object, StoreType, TypeRef, Value};
use docmap::conversion::{
    ConversionRegistry, FnReadingConverter, FnWritingConverter, GeoPoint,
};
use docmap::doc;
use docmap::errors::{ErrorKind, MappingError};
use docmap::mapping::MappingConverter;
use docmap_int_test::test_util::{assert_error_kind, create_test_context, run_test};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

fn sensor_converter() -> MappingConverter {
    let conversions = ConversionRegistry::builder()
        .register::<Celsius>()
        .build()
        .unwrap();
    register_all(MappingConverter::builder())
        .conversions(conversions)
        .build()
        .unwrap()
}

#[test]
fn test_registered_custom_type_round_trip() {
    let converter = sensor_converter();
    let sensor = Sensor {
        name: "greenhouse".to_string(),
        temperature: Celsius(21.5),
        history: vec![Celsius(19.0), Celsius(20.25)],
    };

    let document = converter.write_entity(&sensor).unwrap();
    assert_eq!(document.get("temperature"), Some(&Value::F64(21.5)));
    assert_eq!(
        document.get("history"),
        Some(&Value::Array(vec![Value::F64(19.0), Value::F64(20.25)]))
    );

    let restored: Sensor = converter.read_entity(&document).unwrap();
    assert_eq!(restored, sensor);
}

#[test]
fn test_float_converter_reads_integers() {
    let converter = sensor_converter();
    let document = doc! {
        name: "cellar",
        temperature: 12,
        history: 11,
    };

    let sensor: Sensor = converter.read_entity(&document).unwrap();
    assert_eq!(sensor.temperature, Celsius(12.0));
    assert_eq!(sensor.history, vec![Celsius(11.0)]);
}

#[test]
fn test_custom_type_without_converter() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let sensor = Sensor {
        name: "attic".to_string(),
        temperature: Celsius(30.0),
        history: vec![],
    };

    let err = assert_error_kind(converter.write_entity(&sensor), ErrorKind::ConversionError);
    assert_eq!(err.context().property.as_deref(), Some("temperature"));
}

#[test]
fn test_duplicate_registration_fails_build() {
    assert_error_kind(
        ConversionRegistry::builder()
            .register::<Celsius>()
            .register::<Celsius>()
            .build(),
        ErrorKind::DuplicateConverter,
    );
}

#[test]
fn test_user_converter_shadows_default() {
    run_test(
        || {
            let conversions = ConversionRegistry::builder()
                .add_writing_converter(Arc::new(FnWritingConverter::new(
                    TypeRef::custom::<GeoPoint>(),
                    StoreType::String,
                    |value: &Object| match value {
                        Object::Custom(custom) => match custom.downcast_ref::<GeoPoint>() {
                            Some(point) => Ok(Value::from(format!(
                                "{},{}",
                                point.latitude(),
                                point.longitude()
                            ))),
                            None => Err(MappingError::conversion("not a geo point")),
                        },
                        _ => Err(MappingError::conversion("not a geo point")),
                    },
                )))
                .add_reading_converter(Arc::new(FnReadingConverter::new(
                    StoreType::String,
                    TypeRef::custom::<GeoPoint>(),
                    |value: &Value| {
                        let text = value
                            .as_str()
                            .ok_or_else(|| MappingError::conversion("not a string"))?;
                        let (lat, lon) = text
                            .split_once(',')
                            .ok_or_else(|| MappingError::conversion("not a lat,lon pair"))?;
                        let point = GeoPoint::new(lat.trim().parse()?, lon.trim().parse()?)?;
                        Ok(Object::custom(point))
                    },
                )))
                .build()?;
            create_test_context(register_all(MappingConverter::builder()).conversions(conversions))
        },
        |ctx| {
            let converter = ctx.converter();
            let venue = Venue {
                name: "Jaude".to_string(),
                location: Some(GeoPoint::new(45.7806, 3.0875)?),
                route: None,
            };

            let document = converter.write_entity(&venue)?;
            assert_eq!(document.get("location"), Some(&Value::from("45.7806,3.0875")));

            let restored: Venue = converter.read_entity(&document)?;
            assert_eq!(restored, venue);
            Ok(())
        },
    )
}

#[test]
fn test_without_defaults_has_no_geo_conversion() {
    let conversions = ConversionRegistry::builder().without_defaults().build().unwrap();
    assert!(!conversions.has_custom_write_target(&TypeRef::custom::<GeoPoint>()));

    let converter = register_all(MappingConverter::builder())
        .conversions(conversions)
        .build()
        .unwrap();
    let venue = Venue {
        name: "Jaude".to_string(),
        location: Some(GeoPoint::new(45.7806, 3.0875).unwrap()),
        route: None,
    };
    assert_error_kind(converter.write_entity(&venue), ErrorKind::ConversionError);
}

#[test]
fn test_uuid_and_decimal_defaults() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let reference = Uuid::new_v4();
    let invoice = Invoice {
        id: "inv-1".to_string(),
        reference,
        total: BigDecimal::from_str("1249.5").unwrap(),
    };

    let document = converter.write_entity(&invoice).unwrap();
    assert_eq!(
        document.get("reference"),
        Some(&Value::from(reference.hyphenated().to_string()))
    );
    assert_eq!(document.get("total"), Some(&Value::F64(1249.5)));

    let restored: Invoice = converter.read_entity(&document).unwrap();
    assert_eq!(restored, invoice);
}

#[test]
fn test_decimal_reads_from_integer() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        reference: "67e55044-10b1-426f-9247-bb680e5fe0c8",
        total: 10,
    };

    let invoice: Invoice = converter.read_entity(&document).unwrap();
    assert_eq!(invoice.total, BigDecimal::from(10));
    assert_eq!(
        invoice.reference,
        Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
    );
}

#[test]
fn test_uuid_map_keys_round_trip() {
    run_test(
        || create_test_context(register_all(MappingConverter::builder())),
        |ctx| {
            let converter = ctx.converter();
            let ada = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
            let grace = Uuid::parse_str("a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8").unwrap();
            let mut owners = BTreeMap::new();
            owners.insert(ada, "Ada".to_string());
            owners.insert(grace, "Grace".to_string());
            let ledger = Ledger {
                id: "l-1".to_string(),
                revision: None,
                owners,
            };

            let document = converter.write_entity(&ledger)?;
            assert_eq!(
                document.get("owners.67e55044-10b1-426f-9247-bb680e5fe0c8"),
                Some(&Value::from("Ada"))
            );
            assert_eq!(
                document.get("owners.a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8"),
                Some(&Value::from("Grace"))
            );

            let restored: Ledger = converter.read_entity(&document)?;
            assert_eq!(restored, ledger);
            Ok(())
        },
    )
}

#[test]
fn test_uuid_map_keys_are_parsed_on_read() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        owners: { "67e55044-10b1-426f-9247-bb680e5fe0c8": "Ada" },
    };

    let ledger: Ledger = converter.read_entity(&document).unwrap();
    let ada = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    assert_eq!(ledger.owners.get(&ada).map(String::as_str), Some("Ada"));

    let owners = document.get("owners").and_then(Value::as_document).unwrap();
    let object = converter
        .read(&TypeRef::map(TypeRef::custom::<Uuid>(), TypeRef::String), owners)
        .unwrap();
    assert_eq!(
        object,
        Object::Map(vec![(Object::custom(ada), Object::String("Ada".to_string()))])
    );

    assert_error_kind(
        converter.read_entity::<Ledger>(&doc! { owners: { "not-a-uuid": "Ada" } }),
        ErrorKind::ConversionError,
    );
}

#[test]
fn test_untyped_map_with_uuid_keys() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    let map = Object::Map(vec![(Object::custom(id), Object::I64(3))]);

    let document = converter.map_object(&map).unwrap();
    assert_eq!(
        document.get("67e55044-10b1-426f-9247-bb680e5fe0c8"),
        Some(&Value::I64(3))
    );
}
