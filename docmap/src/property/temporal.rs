use crate::common::{Object, Temporal, TemporalKind, Value};
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::property::{DateFormat, PropertyValueConverter};

/// Converts a temporal property with an ordered list of date formats.
///
/// Writing always uses the first format. Reading tries every format in order
/// and returns the first success; the individual failures are only traced.
#[derive(Debug, Clone)]
pub struct TemporalPropertyConverter {
    property: String,
    kind: TemporalKind,
    formats: Vec<DateFormat>,
}

impl TemporalPropertyConverter {
    pub fn new(property: &str, kind: TemporalKind, formats: Vec<DateFormat>) -> Self {
        TemporalPropertyConverter {
            property: property.to_string(),
            kind,
            formats,
        }
    }

    pub fn kind(&self) -> TemporalKind {
        self.kind
    }

    pub fn formats(&self) -> &[DateFormat] {
        &self.formats
    }

    pub(crate) fn format_temporal(&self, temporal: &Temporal) -> MappingResult<Value> {
        match self.formats.first() {
            Some(format) => Ok(Value::String(
                format
                    .format(temporal)
                    .map_err(|e| e.with_property(&self.property))?,
            )),
            None => Ok(Value::String(temporal.to_iso_string())),
        }
    }

    pub(crate) fn parse_temporal(&self, value: &Value) -> MappingResult<Temporal> {
        for format in &self.formats {
            match format.parse_value(self.kind, value) {
                Ok(temporal) => return Ok(temporal),
                Err(e) => {
                    log::trace!(
                        "Could not parse {} for property {} with format {}: {}",
                        value,
                        self.property,
                        format,
                        e
                    );
                }
            }
        }

        log::error!(
            "Unable to convert value {} to {} for property {}",
            value,
            self.kind,
            self.property
        );
        Err(MappingError::new(
            &format!(
                "Unable to convert value {} to {} for property {}",
                value, self.kind, self.property
            ),
            ErrorKind::ConversionError,
        )
        .with_property(&self.property)
        .with_target_type(self.kind)
        .with_value_type(value.store_type()))
    }
}

impl PropertyValueConverter for TemporalPropertyConverter {
    fn write(&self, value: &Object) -> MappingResult<Value> {
        match value {
            Object::Null => Ok(Value::Null),
            Object::Temporal(temporal) => self.format_temporal(temporal),
            other => {
                log::error!(
                    "Property {} expects {} but got {}",
                    self.property,
                    self.kind,
                    other.type_name()
                );
                Err(MappingError::new(
                    &format!(
                        "Property {} expects {} but got {}",
                        self.property,
                        self.kind,
                        other.type_name()
                    ),
                    ErrorKind::ConversionError,
                )
                .with_property(&self.property)
                .with_value_type(other.type_name()))
            }
        }
    }

    fn read(&self, value: &Value) -> MappingResult<Object> {
        match value {
            Value::Null => Ok(Object::Null),
            other => self.parse_temporal(other).map(Object::Temporal),
        }
    }
}
