use crate::common::{Object, Value};
use crate::errors::MappingResult;

/// A per-property transform that replaces the generic conversion of one
/// property, in both directions.
///
/// The reader and writer apply the converter to each element when the
/// property holds a list or set.
pub trait PropertyValueConverter: Send + Sync {
    fn write(&self, value: &Object) -> MappingResult<Value>;
    fn read(&self, value: &Value) -> MappingResult<Object>;
}
