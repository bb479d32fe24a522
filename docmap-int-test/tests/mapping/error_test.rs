use crate::model::{
    default_converter, generate_person, register_all, Address, Animal, Cat, Dog, Ledger, Node,
    Person, Zoo,
};
use docmap::common::Object;
use docmap::doc;
use docmap::errors::ErrorKind;
use docmap::mapping::MappingConverter;
use docmap::metadata::EntityRegistry;
use docmap_int_test::test_util::assert_error_kind;
use std::sync::Arc;

#[test]
fn test_version_not_requested_is_rejected() {
    let converter = default_converter().unwrap();
    let mut document = converter.write_entity(&generate_person("e-1")).unwrap();
    document.set_version(-1);

    let err = assert_error_kind(
        converter.read_entity::<Person>(&document),
        ErrorKind::ValidationError,
    );
    assert_eq!(err.context().source_id.as_deref(), Some("e-1"));
}

#[test]
fn test_version_not_requested_is_rejected_for_i32_version() {
    let converter = default_converter().unwrap();
    let mut document = doc! { owners: {} };
    document.set_id("l-1");
    document.set_version(-1);

    let err = assert_error_kind(
        converter.read_entity::<Ledger>(&document),
        ErrorKind::ValidationError,
    );
    assert_eq!(err.context().property.as_deref(), Some("revision"));
    assert_eq!(err.context().source_id.as_deref(), Some("l-1"));
}

#[test]
fn test_version_out_of_i32_range_is_rejected() {
    let converter = default_converter().unwrap();
    let mut document = doc! { owners: {} };
    document.set_version(i64::from(i32::MAX) + 1);

    let err = assert_error_kind(
        converter.read_entity::<Ledger>(&document),
        ErrorKind::ConversionError,
    );
    assert_eq!(err.context().property.as_deref(), Some("revision"));
}

#[test]
fn test_unconvertible_value_names_source() {
    let converter = default_converter().unwrap();
    let mut document = doc! {
        name: "Tom",
        lives: "many",
    };
    document.set_id("c-1");

    let err = assert_error_kind(
        converter.read_entity::<Cat>(&document),
        ErrorKind::ConversionError,
    );
    assert_eq!(err.context().source_id.as_deref(), Some("c-1"));
}

#[test]
fn test_unknown_enum_variant() {
    let converter = default_converter().unwrap();
    let document = doc! {
        given_name: "Ada",
        gender: "Alien",
    };

    assert_error_kind(
        converter.read_entity::<Person>(&document),
        ErrorKind::ConversionError,
    );
}

#[test]
fn test_map_key_must_be_scalar() {
    let converter = default_converter().unwrap();
    let map = Object::Map(vec![(
        Object::List(vec![Object::I32(1)]),
        Object::String("value".to_string()),
    )]);

    assert_error_kind(converter.map_object(&map), ErrorKind::ConversionError);
}

#[test]
fn test_scalar_cannot_be_written_as_document() {
    let converter = default_converter().unwrap();
    assert_error_kind(
        converter.map_object(&Object::I32(42)),
        ErrorKind::InvalidOperation,
    );
}

#[test]
fn test_unregistered_nested_entity() {
    let converter = MappingConverter::builder()
        .register::<Zoo>()
        .register::<Animal>()
        .build()
        .unwrap();
    let zoo = Zoo {
        id: "z-1".to_string(),
        star: Some(Box::new(Dog {
            name: "Rex".to_string(),
            breed: "Beagle".to_string(),
        })),
        ..Zoo::default()
    };

    let err = assert_error_kind(converter.write_entity(&zoo), ErrorKind::ConversionError);
    assert!(err.has_kind(&ErrorKind::MetadataNotFound));
    assert_eq!(err.context().property.as_deref(), Some("star"));
}

#[test]
fn test_unregistered_root_entity_on_read() {
    let converter = MappingConverter::builder().build().unwrap();
    let err = assert_error_kind(
        converter.read_entity::<Person>(&doc! { given_name: "Ada" }),
        ErrorKind::ConversionError,
    );
    assert!(err.has_kind(&ErrorKind::MetadataNotFound));
}

#[test]
fn test_depth_limit_on_write() {
    let converter = register_all(MappingConverter::builder())
        .max_depth(5)
        .build()
        .unwrap();

    assert!(converter.write_entity(&Node::chain(5)).is_ok());
    assert_error_kind(
        converter.write_entity(&Node::chain(10)),
        ErrorKind::DepthLimitExceeded,
    );
}

#[test]
fn test_depth_limit_on_read() {
    let document = default_converter()
        .unwrap()
        .write_entity(&Node::chain(10))
        .unwrap();
    let converter = register_all(MappingConverter::builder())
        .max_depth(5)
        .build()
        .unwrap();

    assert_error_kind(
        converter.read_entity::<Node>(&document),
        ErrorKind::DepthLimitExceeded,
    );

    let restored: Node = default_converter().unwrap().read_entity(&document).unwrap();
    assert_eq!(restored, Node::chain(10));
}

#[test]
fn test_invalid_configuration_is_reported_by_build() {
    assert_error_kind(
        MappingConverter::builder().max_depth(0).build(),
        ErrorKind::InvalidOperation,
    );
    assert_error_kind(
        MappingConverter::builder().type_key(Some("meta.type")).build(),
        ErrorKind::InvalidOperation,
    );
    assert_error_kind(
        MappingConverter::builder()
            .metadata_provider(Arc::new(EntityRegistry::new()))
            .register::<Person>()
            .build(),
        ErrorKind::InvalidOperation,
    );
}

#[test]
fn test_custom_metadata_provider() {
    let registry = EntityRegistry::new();
    registry.register::<Person>().unwrap();
    registry.register::<Address>().unwrap();

    let converter = MappingConverter::builder()
        .metadata_provider(Arc::new(registry))
        .build()
        .unwrap();
    let person = generate_person("e-2");
    let document = converter.write_entity(&person).unwrap();
    let restored: Person = converter.read_entity(&document).unwrap();
    assert_eq!(restored, person);
}
