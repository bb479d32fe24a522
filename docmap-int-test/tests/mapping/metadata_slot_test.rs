use crate::model::{default_converter, register_all, Article, Headline, Ledger};
use docmap::common::Value;
use docmap::conversion::SeqNoPrimaryTerm;
use docmap::doc;
use docmap::document::Document;
use docmap::errors::{MappingError, MappingResult};
use docmap::mapping::MappingConverter;
use std::sync::Arc;

fn article() -> Article {
    Article {
        id: "a-1".to_string(),
        version: Some(7),
        seq_no: Some(SeqNoPrimaryTerm::new(12, 1)),
        index: Some("articles-2024".to_string()),
        routing: Some("tenant-a".to_string()),
        title: "Hello".to_string(),
        boost: None,
        language: Some("en".to_string()),
    }
}

#[test]
fn test_slots_are_written_beside_fields() {
    let converter = default_converter().unwrap();
    let document = converter.write_entity(&article()).unwrap();

    assert_eq!(document.id(), Some("a-1"));
    assert_eq!(document.version(), Some(7));
    assert_eq!(document.index(), Some("articles-2024"));
    assert_eq!(document.routing(), Some("tenant-a"));
    // sequence numbers are assigned by the store and never written
    assert_eq!(document.seq_no(), None);
    assert!(!document.contains_key("seq_no"));
    assert!(!document.contains_key("index"));
    // read only properties are not written
    assert!(!document.contains_key("language"));
    assert_eq!(document.get("title"), Some(&Value::from("Hello")));
}

#[test]
fn test_slots_are_read_back() {
    let converter = default_converter().unwrap();
    let mut document = doc! {
        title: "Hello",
        routing: "tenant-b",
        meta: { lang: "de" },
    };
    document.set_id("a-2");
    document.set_version(4);
    document.set_seq_no_primary_term(12, 3);
    document.set_index("articles-2025");

    let article: Article = converter.read_entity(&document).unwrap();
    assert_eq!(article.id, "a-2");
    assert_eq!(article.version, Some(4));
    assert_eq!(article.seq_no, Some(SeqNoPrimaryTerm::new(12, 3)));
    assert_eq!(article.index.as_deref(), Some("articles-2025"));
    assert_eq!(article.routing.as_deref(), Some("tenant-b"));
    assert_eq!(article.language.as_deref(), Some("de"));
}

#[test]
fn test_i32_version_uses_slot() {
    let converter = default_converter().unwrap();
    let ledger = Ledger {
        id: "l-9".to_string(),
        revision: Some(9),
        owners: Default::default(),
    };

    let document = converter.write_entity(&ledger).unwrap();
    assert_eq!(document.version(), Some(9));
    assert!(!document.contains_key("revision"));
    assert_eq!(converter.read_entity::<Ledger>(&document).unwrap(), ledger);

    let mut document = doc! { owners: {} };
    document.set_id("l-10");
    document.set_version(12);
    let ledger: Ledger = converter.read_entity(&document).unwrap();
    assert_eq!(ledger.revision, Some(12));
}

#[test]
fn test_unassigned_sequence_number_is_ignored() {
    let converter = default_converter().unwrap();
    let mut document = doc! { title: "Draft" };
    document.set_seq_no_primary_term(-2, 0);

    let article: Article = converter.read_entity(&document).unwrap();
    assert_eq!(article.seq_no, None);
}

#[test]
fn test_script_field_wins_over_source() {
    let converter = default_converter().unwrap();
    let mut document = doc! {
        title: "Hello",
        boost: 1.0,
    };
    document.set_script_field("score_boost", vec![Value::F64(2.5)]);

    let article: Article = converter.read_entity(&document).unwrap();
    assert_eq!(article.boost, Some(2.5));

    let without_script: Article = converter.read_entity(&doc! { boost: 1.0 }).unwrap();
    assert_eq!(without_script.boost, Some(1.0));
}

#[test]
fn test_expression_with_custom_resolver() {
    let resolver = |expression: &str, source: &Document| -> MappingResult<Value> {
        match expression.strip_prefix("shout(").and_then(|e| e.strip_suffix(')')) {
            Some(field) => Ok(source
                .get(field)
                .and_then(Value::as_str)
                .map(|s| Value::from(s.to_uppercase()))
                .unwrap_or_default()),
            None => Err(MappingError::conversion(&format!(
                "Unsupported expression {}",
                expression
            ))),
        }
    };
    let converter = register_all(MappingConverter::builder())
        .expression_resolver(Arc::new(resolver))
        .build()
        .unwrap();

    let headline: Headline = converter
        .read_entity(&doc! { title: "quiet please" })
        .unwrap();
    assert_eq!(headline.shouted.as_deref(), Some("QUIET PLEASE"));
}

#[test]
fn test_default_resolver_reads_field_paths_only() {
    let converter = default_converter().unwrap();
    let headline: Headline = converter
        .read_entity(&doc! { title: "quiet please" })
        .unwrap();
    // the default resolver only knows field paths
    assert_eq!(headline.shouted, None);
    assert_eq!(headline.title, "quiet please");
}
