use crate::model::{register_all, Animal, Cat, Dog, Zoo};
use docmap::common::{TypeRef, Value};
use docmap::doc;
use docmap::mapping::MappingConverter;
use docmap::metadata::{Entity, MappedEntity};
use std::collections::BTreeMap;

fn rex() -> Box<dyn Entity> {
    Box::new(Dog {
        name: "Rex".to_string(),
        breed: "Beagle".to_string(),
    })
}

fn tom() -> Box<dyn Entity> {
    Box::new(Cat {
        name: "Tom".to_string(),
        lives: 9,
    })
}

fn generic() -> Box<dyn Entity> {
    Box::new(Animal {
        name: "Unknown".to_string(),
    })
}

fn zoo() -> Zoo {
    let mut enclosures = BTreeMap::new();
    enclosures.insert("north".to_string(), vec![rex(), tom()]);
    enclosures.insert("south".to_string(), vec![generic()]);

    Zoo {
        id: "zoo-1".to_string(),
        star: Some(tom()),
        animals: vec![rex(), generic(), tom()],
        enclosures,
    }
}

#[test]
fn test_subtypes_get_hints_declared_types_do_not() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = converter.write_entity(&zoo()).unwrap();

    assert_eq!(document.get("star._class"), Some(&Value::from("cat")));
    assert_eq!(document.get("animals.0._class"), Some(&Value::from("dog")));
    assert!(document.get("animals.1._class").is_none());
    assert_eq!(document.get("animals.1.name"), Some(&Value::from("Unknown")));
    assert_eq!(document.get("enclosures.north.1._class"), Some(&Value::from("cat")));
    assert_eq!(document.get("enclosures.north.1.lives"), Some(&Value::I64(9)));
}

#[test]
fn test_polymorphic_round_trip() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let zoo = zoo();

    let document = converter.write_entity(&zoo).unwrap();
    let restored: Zoo = converter.read_entity(&document).unwrap();

    assert_eq!(restored, zoo);
    let star = restored.star.unwrap();
    assert!(star.is::<Cat>());
    assert!(restored.animals[0].is::<Dog>());
    assert!(restored.animals[1].is::<Animal>());
}

#[test]
fn test_read_through_supertype() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        "_class": "dog",
        name: "Rex",
        breed: "Beagle",
    };

    let object = converter
        .read(&TypeRef::entity(Animal::TYPE_NAME), &document)
        .unwrap();
    let entity = object.as_entity().unwrap();
    assert_eq!(entity.type_name(), Dog::TYPE_NAME);
}

#[test]
fn test_read_entity_rejects_subtype_result() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        "_class": "dog",
        name: "Rex",
        breed: "Beagle",
    };

    // the hinted Dog is assignable to Animal, but the result is no Animal
    assert!(converter.read_entity::<Animal>(&document).is_err());
}

#[test]
fn test_hint_by_type_name_is_accepted() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let mut document = doc! {
        star: {
            name: "Tom",
            lives: 7,
        },
    };
    document
        .put("star._class", Value::from(Cat::TYPE_NAME))
        .unwrap();

    let zoo: Zoo = converter.read_entity(&document).unwrap();
    let star = zoo.star.unwrap();
    assert_eq!(
        star.downcast_ref::<Cat>(),
        Some(&Cat {
            name: "Tom".to_string(),
            lives: 7
        })
    );
}

#[test]
fn test_without_hints_subtype_reads_as_declared_type() {
    let converter = register_all(MappingConverter::builder())
        .write_type_hints(false)
        .build()
        .unwrap();

    let document = converter.write_entity(&zoo()).unwrap();
    let restored: Zoo = converter.read_entity(&document).unwrap();

    let star = restored.star.unwrap();
    assert_eq!(
        star.downcast_ref::<Animal>(),
        Some(&Animal {
            name: "Tom".to_string()
        })
    );
}
