use crate::common::{
    Bound, Object, Range, TypeRef, Value, RANGE_GT, RANGE_GTE, RANGE_LT, RANGE_LTE,
};
use crate::conversion::{read_scalar, write_scalar};
use crate::document::Document;
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::property::{PropertyValueConverter, TemporalPropertyConverter};

#[derive(Debug, Clone)]
enum BoundCodec {
    Temporal(TemporalPropertyConverter),
    Scalar(TypeRef),
}

/// Converts a [Range] property to `{"gte": .., "lt": ..}` style documents.
///
/// Bounds of date ranges go through a temporal converter, every other bound
/// through the scalar conversions. Unbounded ends are left out.
#[derive(Debug, Clone)]
pub struct RangePropertyConverter {
    property: String,
    codec: BoundCodec,
}

impl RangePropertyConverter {
    pub fn temporal(property: &str, converter: TemporalPropertyConverter) -> Self {
        RangePropertyConverter {
            property: property.to_string(),
            codec: BoundCodec::Temporal(converter),
        }
    }

    pub fn scalar(property: &str, bound_type: TypeRef) -> Self {
        RangePropertyConverter {
            property: property.to_string(),
            codec: BoundCodec::Scalar(bound_type),
        }
    }

    fn write_bound(&self, value: &Object) -> MappingResult<Value> {
        match (&self.codec, value) {
            (BoundCodec::Temporal(converter), _) => converter.write(value),
            (BoundCodec::Scalar(_), value) => write_scalar(value),
        }
    }

    fn read_bound(&self, value: &Value) -> MappingResult<Object> {
        match &self.codec {
            BoundCodec::Temporal(converter) => converter.read(value),
            BoundCodec::Scalar(bound_type) => read_scalar(value, bound_type),
        }
    }

    fn error(&self, message: String) -> MappingError {
        log::error!("{}", message);
        MappingError::new(&message, ErrorKind::ConversionError).with_property(&self.property)
    }
}

impl PropertyValueConverter for RangePropertyConverter {
    fn write(&self, value: &Object) -> MappingResult<Value> {
        let range = match value {
            Object::Null => return Ok(Value::Null),
            Object::Range(range) => range,
            other => {
                return Err(self.error(format!(
                    "Property {} expects a range but got {}",
                    self.property,
                    other.type_name()
                )))
            }
        };

        let mut doc = Document::new();
        match range.lower() {
            Bound::Inclusive(v) => doc.insert(RANGE_GTE, self.write_bound(v)?),
            Bound::Exclusive(v) => doc.insert(RANGE_GT, self.write_bound(v)?),
            Bound::Unbounded => {}
        }
        match range.upper() {
            Bound::Inclusive(v) => doc.insert(RANGE_LTE, self.write_bound(v)?),
            Bound::Exclusive(v) => doc.insert(RANGE_LT, self.write_bound(v)?),
            Bound::Unbounded => {}
        }
        Ok(Value::Document(doc))
    }

    fn read(&self, value: &Value) -> MappingResult<Object> {
        let doc = match value {
            Value::Null => return Ok(Object::Null),
            Value::Document(doc) => doc,
            other => {
                return Err(self.error(format!(
                    "Property {} expects a range document but got {}",
                    self.property, other
                )))
            }
        };

        let bound = |inclusive: &str, exclusive: &str| -> MappingResult<Bound<Object>> {
            if let Some(v) = doc.get(inclusive).filter(|v| !v.is_null()) {
                Ok(Bound::Inclusive(self.read_bound(v)?))
            } else if let Some(v) = doc.get(exclusive).filter(|v| !v.is_null()) {
                Ok(Bound::Exclusive(self.read_bound(v)?))
            } else {
                Ok(Bound::Unbounded)
            }
        };

        let lower = bound(RANGE_GTE, RANGE_GT)?;
        let upper = bound(RANGE_LTE, RANGE_LT)?;
        Ok(Object::Range(Box::new(Range::new(lower, upper))))
    }
}
