use std::fmt::{self, Display};
use std::str::FromStr;

use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use uuid::Uuid;

use crate::common::{StoreType, Value, PRIMARY_TERM, SEQ_NO};
use crate::conversion::{ConversionRegistryBuilder, CustomConversion, GeoJson, GeoPoint};
use crate::document::Document;
use crate::errors::{ErrorKind, MappingError, MappingResult};

/// The sequence number and primary term of the last write of a document,
/// used for optimistic concurrency control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeqNoPrimaryTerm {
    seq_no: i64,
    primary_term: i64,
}

impl SeqNoPrimaryTerm {
    pub fn new(seq_no: i64, primary_term: i64) -> Self {
        SeqNoPrimaryTerm {
            seq_no,
            primary_term,
        }
    }

    pub fn seq_no(&self) -> i64 {
        self.seq_no
    }

    pub fn primary_term(&self) -> i64 {
        self.primary_term
    }

    /// `true` if both values were assigned by the store.
    pub fn is_assigned(&self) -> bool {
        self.seq_no >= 0 && self.primary_term > 0
    }
}

impl Display for SeqNoPrimaryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SeqNoPrimaryTerm(seq_no={}, primary_term={})",
            self.seq_no, self.primary_term
        )
    }
}

crate::custom_convertible!(SeqNoPrimaryTerm);

impl CustomConversion for SeqNoPrimaryTerm {
    const STORE_TYPE: StoreType = StoreType::Document;

    fn to_store(&self) -> MappingResult<Value> {
        let mut doc = Document::new();
        doc.insert(SEQ_NO, self.seq_no);
        doc.insert(PRIMARY_TERM, self.primary_term);
        Ok(Value::Document(doc))
    }

    fn from_store(value: &Value) -> MappingResult<Self> {
        let doc = value.as_document();
        let seq_no = doc.and_then(|d| d.get(SEQ_NO)).and_then(Value::as_i64);
        let primary_term = doc.and_then(|d| d.get(PRIMARY_TERM)).and_then(Value::as_i64);
        match (seq_no, primary_term) {
            (Some(seq_no), Some(primary_term)) => Ok(SeqNoPrimaryTerm::new(seq_no, primary_term)),
            _ => {
                log::error!("{} is not a seq_no/primary_term document", value);
                Err(MappingError::new(
                    &format!("{} is not a seq_no/primary_term document", value),
                    ErrorKind::ConversionError,
                ))
            }
        }
    }
}

crate::custom_convertible!(Uuid);

impl CustomConversion for Uuid {
    const STORE_TYPE: StoreType = StoreType::String;

    fn to_store(&self) -> MappingResult<Value> {
        Ok(Value::String(self.hyphenated().to_string()))
    }

    fn from_store(value: &Value) -> MappingResult<Self> {
        match value.as_str() {
            Some(s) => Ok(Uuid::parse_str(s)?),
            None => {
                log::error!("Cannot read uuid from {}", value);
                Err(MappingError::new(
                    &format!("Cannot read uuid from {}", value),
                    ErrorKind::ConversionError,
                ))
            }
        }
    }
}

crate::custom_convertible!(BigDecimal);

/// Decimals are stored as `f64`. This is lossy: digits beyond the precision
/// of a double are dropped on write and do not come back on read.
impl CustomConversion for BigDecimal {
    const STORE_TYPE: StoreType = StoreType::Float;

    fn to_store(&self) -> MappingResult<Value> {
        match self.to_f64() {
            Some(v) => Ok(Value::F64(v)),
            None => {
                log::error!("Decimal {} does not fit into a double", self);
                Err(MappingError::new(
                    &format!("Decimal {} does not fit into a double", self),
                    ErrorKind::ConversionError,
                ))
            }
        }
    }

    fn from_store(value: &Value) -> MappingResult<Self> {
        let decimal = match value {
            Value::I64(v) => Some(BigDecimal::from(*v)),
            Value::F64(v) => BigDecimal::from_f64(*v),
            Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
            _ => None,
        };
        decimal.ok_or_else(|| {
            log::error!("Cannot read decimal from {}", value);
            MappingError::new(
                &format!("Cannot read decimal from {}", value),
                ErrorKind::ConversionError,
            )
        })
    }
}

/// Registers the bundled converters: geo points, GeoJSON shapes, UUIDs,
/// decimals and sequence number pairs.
pub(crate) fn register_defaults(builder: ConversionRegistryBuilder) -> ConversionRegistryBuilder {
    builder
        .register::<GeoPoint>()
        .register::<GeoJson>()
        .register::<Uuid>()
        .register::<BigDecimal>()
        .register::<SeqNoPrimaryTerm>()
}
