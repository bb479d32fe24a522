use crate::model::{generate_person, register_all, Address, Dog, Person, Zoo};
use docmap::common::{Object, TypeRef, Value};
use docmap::doc;
use docmap::mapping::MappingConverter;
use docmap::metadata::MappedEntity;

#[test]
fn test_root_entity_carries_alias_hint() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = converter.write_entity(&generate_person("h-1")).unwrap();

    assert_eq!(document.get("_class"), Some(&Value::from("person")));
    // the nested address is of its declared type, so no hint
    assert!(document.get("address._class").is_none());
}

#[test]
fn test_hint_without_alias_is_type_name() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = converter
        .write_entity(&Address {
            street: "Main Street".to_string(),
            city: "Springfield".to_string(),
            zip: None,
            location: None,
        })
        .unwrap();

    assert_eq!(document.get("_class"), Some(&Value::from(Address::TYPE_NAME)));
}

#[test]
fn test_custom_type_key() {
    let converter = register_all(MappingConverter::builder())
        .type_key(Some("@type"))
        .build()
        .unwrap();
    let document = converter.write_entity(&generate_person("h-2")).unwrap();

    assert!(!document.contains_key("_class"));
    assert_eq!(document.get("@type"), Some(&Value::from("person")));

    let restored: Person = converter.read_entity(&document).unwrap();
    assert_eq!(restored.id, "h-2");
}

#[test]
fn test_disabled_type_key_writes_no_hint() {
    let converter = register_all(MappingConverter::builder())
        .type_key(None)
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

    let document = converter.write_entity(&zoo).unwrap();
    assert!(!document.contains_key("_class"));
    assert!(document.get("star._class").is_none());
    assert_eq!(document.get("star.breed"), Some(&Value::from("Beagle")));
}

#[test]
fn test_disabled_hint_writing_still_reads_hints() {
    let converter = register_all(MappingConverter::builder())
        .write_type_hints(false)
        .build()
        .unwrap();

    let written = converter.write_entity(&generate_person("h-3")).unwrap();
    assert!(!written.contains_key("_class"));

    let hinted = doc! {
        "_class": "dog",
        name: "Rex",
        breed: "Beagle",
    };
    let object = converter.read(&TypeRef::Any, &hinted).unwrap();
    let dog = object.as_entity().and_then(|e| e.downcast_ref::<Dog>()).cloned();
    assert_eq!(
        dog,
        Some(Dog {
            name: "Rex".to_string(),
            breed: "Beagle".to_string()
        })
    );
}

#[test]
fn test_unknown_hint_falls_back_to_declared_type() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let mut document = doc! {
        "_class": "no.such.Type",
        given_name: "Alan",
        last_name: "Turing",
    };
    document.set_id("h-4");

    let person: Person = converter.read_entity(&document).unwrap();
    assert_eq!(person.first_name, "Alan");
}

#[test]
fn test_incompatible_hint_is_ignored() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let mut document = doc! {
        "_class": "dog",
        given_name: "Alan",
        last_name: "Turing",
    };
    document.set_id("h-5");

    let person: Person = converter.read_entity(&document).unwrap();
    assert_eq!(person.last_name, "Turing");
}

#[test]
fn test_untyped_read_without_hint_is_document() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! { name: "plain" };

    let object = converter.read(&TypeRef::Any, &document).unwrap();
    assert_eq!(object, Object::Document(document));
}
