use crate::model::{register_all, Book, Library};
use chrono::NaiveDate;
use docmap::common::{Object, TypeRef, Value};
use docmap::doc;
use docmap::mapping::MappingConverter;
use docmap_int_test::test_util::{create_test_context, run_test};
use std::collections::HashMap;

fn book(title: &str, year: i32) -> Book {
    Book {
        title: title.to_string(),
        published: NaiveDate::from_ymd_opt(year, 1, 1),
    }
}

#[test]
fn test_nested_collections_of_entities() {
    run_test(
        || create_test_context(register_all(MappingConverter::builder())),
        |ctx| {
            let converter = ctx.converter();
            let mut by_genre = HashMap::new();
            by_genre.insert("fantasy".to_string(), vec![book("The Hobbit", 1937)]);
            by_genre.insert(
                "science".to_string(),
                vec![book("Cosmos", 1980), book("Origin of Species", 1859)],
            );

            let library = Library {
                shelves: vec![
                    vec![book("Dune", 1965), book("Emma", 1815)],
                    vec![],
                    vec![book("Ulysses", 1922)],
                ],
                by_genre,
            };

            let document = converter.write_entity(&library)?;
            assert_eq!(document.get("shelves.0.1.title"), Some(&Value::from("Emma")));
            assert_eq!(
                document.get("shelves.0.1.published"),
                Some(&Value::from("1815-01-01"))
            );
            assert!(document.get("shelves.0.0._class").is_none());
            assert_eq!(document.get("shelves.1"), Some(&Value::Array(vec![])));
            assert_eq!(
                document.get("by_genre.science.0.title"),
                Some(&Value::from("Cosmos"))
            );

            let restored: Library = converter.read_entity(&document)?;
            assert_eq!(restored, library);
            Ok(())
        },
    )
}

#[test]
fn test_single_value_reads_as_collection_of_one() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        shelves: [{ title: "Dune" }],
        by_genre: {
            classic: { title: "Emma" },
        },
    };

    let library: Library = converter.read_entity(&document).unwrap();
    assert_eq!(library.shelves, vec![vec![Book {
        title: "Dune".to_string(),
        published: None,
    }]]);
    assert_eq!(
        library.by_genre.get("classic"),
        Some(&vec![Book {
            title: "Emma".to_string(),
            published: None,
        }])
    );
}

#[test]
fn test_generic_map_is_written_without_hint() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let map = Object::Map(vec![
        (Object::String("name".to_string()), Object::String("Ada".to_string())),
        (Object::I32(7), Object::Bool(true)),
        (
            Object::String("book".to_string()),
            Object::entity(book("Dune", 1965)),
        ),
    ]);

    let document = converter.map_object(&map).unwrap();
    assert_eq!(document.get("name"), Some(&Value::from("Ada")));
    assert_eq!(document.get("7"), Some(&Value::Bool(true)));
    assert!(!document.contains_key("_class"));
    // an entity value inside an untyped map names its type
    assert!(document.get("book._class").is_some());
    assert_eq!(document.id(), None);
}

#[test]
fn test_document_is_copied_verbatim() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let source = doc! {
        title: "raw",
        tags: ["a", "b"],
        nested: { level: 2 },
    };

    let document = converter.map_object(&Object::Document(source.clone())).unwrap();
    assert_eq!(document, source);
}

#[test]
fn test_read_as_typed_map() {
    let converter = register_all(MappingConverter::builder()).build().unwrap();
    let document = doc! {
        "_class": "ignored",
        "1": 10,
        "2": 20,
    };

    let object = converter
        .read(&TypeRef::map(TypeRef::I32, TypeRef::I64), &document)
        .unwrap();
    assert_eq!(
        object,
        Object::Map(vec![
            (Object::I32(1), Object::I64(10)),
            (Object::I32(2), Object::I64(20)),
        ])
    );
}
