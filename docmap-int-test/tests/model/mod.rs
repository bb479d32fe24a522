use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use docmap::common::{Range, StoreType, Value};
use docmap::conversion::{CustomConversion, GeoJson, GeoPoint, SeqNoPrimaryTerm};
use docmap::custom_convertible;
use docmap::errors::{MappingError, MappingResult};
use docmap::mapping::{MappingConverter, MappingConverterBuilder};
use docmap::metadata::Entity;
use docmap_derive::{MappedEntity, MappedEnum};
use fake::faker::address::en::{CityName, StreetName, ZipCode};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, MappedEnum)]
pub enum Gender {
    #[default]
    Unknown,
    Female,
    Male,
    #[mapping(name = "non-binary")]
    NonBinary,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Address {
    pub street: String,
    pub city: String,
    #[mapping(field = "zip_code")]
    pub zip: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
#[mapping(alias = "person")]
pub struct Person {
    #[mapping(id)]
    pub id: String,
    #[mapping(version)]
    pub version: Option<i64>,
    #[mapping(field = "given_name")]
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    #[mapping(format = "basic_date||date")]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<Address>,
    #[mapping(store_empty = false)]
    pub nicknames: Vec<String>,
    pub ratings: BTreeMap<String, i32>,
    #[mapping(skip)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
#[mapping(store_id_in_source)]
pub struct Ticket {
    #[mapping(id)]
    pub code: String,
    pub title: String,
    #[mapping(store_null)]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
#[mapping(alias = "animal")]
pub struct Animal {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
#[mapping(alias = "dog", supertype = Animal)]
pub struct Dog {
    pub name: String,
    pub breed: String,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
#[mapping(alias = "cat", supertype = Animal)]
pub struct Cat {
    pub name: String,
    pub lives: i32,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Zoo {
    #[mapping(id)]
    pub id: String,
    #[mapping(declared = Animal)]
    pub star: Option<Box<dyn Entity>>,
    #[mapping(declared = Animal)]
    pub animals: Vec<Box<dyn Entity>>,
    #[mapping(declared = Animal)]
    pub enclosures: BTreeMap<String, Vec<Box<dyn Entity>>>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Book {
    pub title: String,
    #[mapping(format = "date")]
    pub published: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Library {
    pub shelves: Vec<Vec<Book>>,
    pub by_genre: HashMap<String, Vec<Book>>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Node {
    pub name: String,
    #[mapping(declared = Node)]
    pub child: Option<Box<dyn Entity>>,
}

impl Node {
    /// A chain of `length` nodes, the root named `n0`.
    pub fn chain(length: usize) -> Node {
        let mut node = Node {
            name: format!("n{}", length - 1),
            child: None,
        };
        for i in (0..length - 1).rev() {
            node = Node {
                name: format!("n{}", i),
                child: Some(Box::new(node)),
            };
        }
        node
    }
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Article {
    #[mapping(id)]
    pub id: String,
    #[mapping(version)]
    pub version: Option<i64>,
    #[mapping(seq_no)]
    pub seq_no: Option<SeqNoPrimaryTerm>,
    #[mapping(index_name)]
    pub index: Option<String>,
    #[mapping(routing)]
    pub routing: Option<String>,
    pub title: String,
    #[mapping(scripted = "score_boost")]
    pub boost: Option<f64>,
    #[mapping(expression = "meta.lang", read_only)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Account {
    #[mapping(id, constructor)]
    pub number: String,
    #[mapping(constructor)]
    pub owner: String,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Event {
    pub name: String,
    #[mapping(format = "date")]
    pub period: Option<Range<NaiveDate>>,
    pub attendance: Option<Range<i32>>,
    pub started_at: Option<NaiveDateTime>,
    #[mapping(format = "epoch_millis")]
    pub checkpoints: Vec<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Venue {
    pub name: String,
    pub location: Option<GeoPoint>,
    pub route: Option<GeoJson>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Invoice {
    #[mapping(id)]
    pub id: String,
    pub reference: Uuid,
    pub total: BigDecimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Celsius(pub f64);

custom_convertible!(Celsius);

impl CustomConversion for Celsius {
    const STORE_TYPE: StoreType = StoreType::Float;

    fn to_store(&self) -> MappingResult<Value> {
        Ok(Value::F64(self.0))
    }

    fn from_store(value: &Value) -> MappingResult<Self> {
        value
            .as_f64()
            .map(Celsius)
            .ok_or_else(|| MappingError::conversion(&format!("{} is not a temperature", value)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Sensor {
    pub name: String,
    pub temperature: Celsius,
    pub history: Vec<Celsius>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Diary {
    #[mapping(format = "basic_date")]
    pub created: Option<NaiveDate>,
    pub entries_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Headline {
    pub title: String,
    #[mapping(expression = "shout(title)")]
    pub shouted: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
pub struct Ledger {
    #[mapping(id)]
    pub id: String,
    #[mapping(version)]
    pub revision: Option<i32>,
    pub owners: BTreeMap<Uuid, String>,
}

/// A converter knowing every entity of this module.
pub fn register_all(builder: MappingConverterBuilder) -> MappingConverterBuilder {
    builder
        .register::<Address>()
        .register::<Person>()
        .register::<Ticket>()
        .register::<Animal>()
        .register::<Dog>()
        .register::<Cat>()
        .register::<Zoo>()
        .register::<Book>()
        .register::<Library>()
        .register::<Node>()
        .register::<Article>()
        .register::<Account>()
        .register::<Event>()
        .register::<Venue>()
        .register::<Invoice>()
        .register::<Sensor>()
        .register::<Diary>()
        .register::<Headline>()
        .register::<Ledger>()
}

pub fn default_converter() -> MappingResult<MappingConverter> {
    register_all(MappingConverter::builder()).build()
}

pub fn generate_address() -> Address {
    Address {
        street: StreetName().fake(),
        city: CityName().fake(),
        zip: Some(ZipCode().fake()),
        location: None,
    }
}

pub fn generate_person(id: &str) -> Person {
    let mut ratings = BTreeMap::new();
    ratings.insert("kindness".to_string(), 4);
    ratings.insert("punctuality".to_string(), 2);

    Person {
        id: id.to_string(),
        version: None,
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        gender: Gender::Female,
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 15),
        address: Some(generate_address()),
        nicknames: vec!["Ace".to_string()],
        ratings,
        session: None,
    }
}
