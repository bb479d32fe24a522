use crate::model::{default_converter, generate_person, Account, Gender, Person, Ticket};
use chrono::NaiveDate;
use docmap::common::Value;
use docmap::doc;
use docmap::mapping::MappingConverter;
use docmap_int_test::test_util::{create_test_context, run_test};

#[test]
fn test_person_round_trip() {
    run_test(
        || create_test_context(crate::model::register_all(MappingConverter::builder())),
        |ctx| {
            let converter = ctx.converter();
            let mut person = generate_person("p-1");
            person.version = Some(3);

            let document = converter.write_entity(&person)?;
            assert_eq!(document.id(), Some("p-1"));
            assert_eq!(document.version(), Some(3));
            assert!(!document.contains_key("id"));
            assert!(!document.contains_key("version"));
            assert_eq!(
                document.get("given_name"),
                Some(&Value::from(person.first_name.as_str()))
            );
            assert_eq!(document.get("gender"), Some(&Value::from("Female")));
            assert_eq!(document.get("birth_date"), Some(&Value::from("19900415")));
            assert_eq!(document.get("ratings.kindness"), Some(&Value::I64(4)));

            let restored: Person = converter.read_entity(&document)?;
            assert_eq!(restored, person);
            Ok(())
        },
    )
}

#[test]
fn test_skipped_property_is_neither_written_nor_read() {
    run_test(
        || create_test_context(crate::model::register_all(MappingConverter::builder())),
        |ctx| {
            let converter = ctx.converter();
            let mut person = generate_person("p-2");
            person.session = Some("secret".to_string());

            let document = converter.write_entity(&person)?;
            assert!(!document.contains_key("session"));

            let restored: Person = converter.read_entity(&document)?;
            assert_eq!(restored.session, None);
            Ok(())
        },
    )
}

#[test]
fn test_null_and_empty_values_are_omitted() {
    let converter = default_converter().unwrap();
    let person = Person {
        id: "p-3".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        ..Person::default()
    };

    let document = converter.write_entity(&person).unwrap();
    assert!(!document.contains_key("birth_date"));
    assert!(!document.contains_key("address"));
    // nicknames does not store empty collections, ratings does
    assert!(!document.contains_key("nicknames"));
    assert_eq!(document.get("ratings"), Some(&Value::Document(doc! {})));

    let restored: Person = converter.read_entity(&document).unwrap();
    assert_eq!(restored, person);
}

#[test]
fn test_store_null_writes_explicit_null() {
    let converter = default_converter().unwrap();
    let ticket = Ticket {
        code: "T-9".to_string(),
        title: "Broken build".to_string(),
        assignee: None,
    };

    let document = converter.write_entity(&ticket).unwrap();
    assert_eq!(document.get("assignee"), Some(&Value::Null));
    // the id is kept in the source as well as in the id slot
    assert_eq!(document.get("code"), Some(&Value::from("T-9")));
    assert_eq!(document.id(), Some("T-9"));

    let restored: Ticket = converter.read_entity(&document).unwrap();
    assert_eq!(restored, ticket);
}

#[test]
fn test_enum_variant_names() {
    let converter = default_converter().unwrap();
    let mut person = generate_person("p-4");
    person.gender = Gender::NonBinary;

    let document = converter.write_entity(&person).unwrap();
    assert_eq!(document.get("gender"), Some(&Value::from("non-binary")));

    let restored: Person = converter.read_entity(&document).unwrap();
    assert_eq!(restored.gender, Gender::NonBinary);
}

#[test]
fn test_read_with_alternative_date_format() {
    let converter = default_converter().unwrap();
    let mut document = doc! {
        given_name: "Grace",
        last_name: "Hopper",
        gender: "Female",
        birth_date: "1906-12-09",
    };
    document.set_id("p-5");

    let person: Person = converter.read_entity(&document).unwrap();
    assert_eq!(person.id, "p-5");
    assert_eq!(person.birth_date, NaiveDate::from_ymd_opt(1906, 12, 9));
    assert_eq!(person.address, None);
}

#[test]
fn test_constructor_arguments_come_from_source() {
    let converter = default_converter().unwrap();
    let account = Account {
        number: "ACC-1".to_string(),
        owner: "Alice".to_string(),
        balance: 120.5,
    };

    let document = converter.write_entity(&account).unwrap();
    assert_eq!(document.id(), Some("ACC-1"));
    assert_eq!(document.get("owner"), Some(&Value::from("Alice")));

    let restored: Account = converter.read_entity(&document).unwrap();
    assert_eq!(restored, account);
}

#[test]
fn test_missing_constructor_argument_uses_default() {
    let converter = default_converter().unwrap();
    let document = doc! { balance: 10.0 };

    let account: Account = converter.read_entity(&document).unwrap();
    assert_eq!(account.number, "");
    assert_eq!(account.owner, "");
    assert_eq!(account.balance, 10.0);
}

#[test]
fn test_cloned_converter_shares_configuration() {
    let converter = default_converter().unwrap();
    let clone = converter.clone();
    let person = generate_person("p-6");

    let document = converter.write_entity(&person).unwrap();
    let restored: Person = clone.read_entity(&document).unwrap();
    assert_eq!(restored, person);
}

#[test]
fn test_concurrent_conversions() {
    let converter = default_converter().unwrap();
    let handles = (0..8)
        .map(|i| {
            let converter = converter.clone();
            std::thread::spawn(move || {
                for j in 0..50 {
                    let person = generate_person(&format!("p-{}-{}", i, j));
                    let document = converter.write_entity(&person).unwrap();
                    let restored: Person = converter.read_entity(&document).unwrap();
                    assert_eq!(restored, person);
                }
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().unwrap();
    }
}
