use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::common::{TemporalKind, TypeRef};
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::property::{
    DateFormat, PropertyValueConverter, RangePropertyConverter, TemporalPropertyConverter,
};

/// Describes how one property of an entity is stored.
///
/// The property `name` is what [Entity::get_property](crate::metadata::Entity::get_property)
/// understands, the `field_name` is the key in the stored document. They
/// differ when a field is renamed and the field name may be a dotted path
/// into an embedded document.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    field_name: String,
    type_ref: TypeRef,
    writable: bool,
    readable: bool,
    id: bool,
    version: bool,
    seq_no_primary_term: bool,
    index_name: bool,
    routing: bool,
    store_null: bool,
    store_empty: bool,
    converter: Option<Arc<dyn PropertyValueConverter>>,
    expression: Option<String>,
    script_field: Option<String>,
}

impl PropertyDescriptor {
    pub fn builder(name: &str, type_ref: TypeRef) -> PropertyDescriptorBuilder {
        PropertyDescriptorBuilder::new(name, type_ref)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    pub fn is_id(&self) -> bool {
        self.id
    }

    pub fn is_version(&self) -> bool {
        self.version
    }

    pub fn is_seq_no_primary_term(&self) -> bool {
        self.seq_no_primary_term
    }

    pub fn is_index_name(&self) -> bool {
        self.index_name
    }

    pub fn is_routing(&self) -> bool {
        self.routing
    }

    pub fn store_null(&self) -> bool {
        self.store_null
    }

    pub fn store_empty(&self) -> bool {
        self.store_empty
    }

    pub fn converter(&self) -> Option<&Arc<dyn PropertyValueConverter>> {
        self.converter.as_ref()
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn script_field(&self) -> Option<&str> {
        self.script_field.as_deref()
    }

    /// Metadata slot properties are handled by the value accessor and never
    /// take part in type hints or simple type handling.
    pub fn is_metadata_slot(&self) -> bool {
        self.id || self.version || self.seq_no_primary_term || self.index_name
    }
}

impl Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("field_name", &self.field_name)
            .field("type_ref", &self.type_ref)
            .field("id", &self.id)
            .field("version", &self.version)
            .field("has_converter", &self.converter.is_some())
            .finish()
    }
}

/// Builder for [PropertyDescriptor].
///
/// Like the converter builder it records the first error and reports it from
/// [build](PropertyDescriptorBuilder::build), so the chain never has to be
/// interrupted.
pub struct PropertyDescriptorBuilder {
    descriptor: PropertyDescriptor,
    date_formats: Option<String>,
    error: Option<MappingError>,
}

impl PropertyDescriptorBuilder {
    fn new(name: &str, type_ref: TypeRef) -> Self {
        PropertyDescriptorBuilder {
            descriptor: PropertyDescriptor {
                name: name.to_string(),
                field_name: name.to_string(),
                type_ref,
                writable: true,
                readable: true,
                id: false,
                version: false,
                seq_no_primary_term: false,
                index_name: false,
                routing: false,
                store_null: false,
                store_empty: true,
                converter: None,
                expression: None,
                script_field: None,
            },
            date_formats: None,
            error: None,
        }
    }

    /// Stores the property under a different document key.
    pub fn field_name(mut self, field_name: &str) -> Self {
        if field_name.is_empty() && self.error.is_none() {
            log::error!("Empty field name for property {}", self.descriptor.name);
            self.error = Some(MappingError::new(
                &format!("Empty field name for property {}", self.descriptor.name),
                ErrorKind::InvalidOperation,
            ));
        }
        self.descriptor.field_name = field_name.to_string();
        self
    }

    pub fn id(mut self) -> Self {
        self.descriptor.id = true;
        self
    }

    pub fn version(mut self) -> Self {
        self.descriptor.version = true;
        self
    }

    pub fn seq_no_primary_term(mut self) -> Self {
        self.descriptor.seq_no_primary_term = true;
        self.descriptor.writable = false;
        self
    }

    pub fn index_name(mut self) -> Self {
        self.descriptor.index_name = true;
        self
    }

    pub fn routing(mut self) -> Self {
        self.descriptor.routing = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.descriptor.writable = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.descriptor.readable = false;
        self
    }

    pub fn store_null(mut self, store_null: bool) -> Self {
        self.descriptor.store_null = store_null;
        self
    }

    pub fn store_empty(mut self, store_empty: bool) -> Self {
        self.descriptor.store_empty = store_empty;
        self
    }

    /// Comma separated list of date formats, e.g. `"date_optional_time,epoch_millis"`.
    /// The first format is used for writing, all are tried when reading.
    pub fn date_formats(mut self, formats: &str) -> Self {
        self.date_formats = Some(formats.to_string());
        self
    }

    pub fn converter(mut self, converter: Arc<dyn PropertyValueConverter>) -> Self {
        self.descriptor.converter = Some(converter);
        self
    }

    /// An expression evaluated against the source document to obtain the
    /// property value on read.
    pub fn expression(mut self, expression: &str) -> Self {
        self.descriptor.expression = Some(expression.to_string());
        self
    }

    /// Reads the property from the named script field of the source
    /// document.
    pub fn script_field(mut self, name: &str) -> Self {
        self.descriptor.script_field = Some(name.to_string());
        self
    }

    pub fn build(mut self) -> MappingResult<PropertyDescriptor> {
        if let Some(err) = self.error {
            return Err(err);
        }

        if self.descriptor.converter.is_none() {
            self.descriptor.converter = self.default_converter()?;
        }
        Ok(self.descriptor)
    }

    fn default_converter(&self) -> MappingResult<Option<Arc<dyn PropertyValueConverter>>> {
        let name = self.descriptor.name.as_str();
        let formats = match &self.date_formats {
            Some(formats) => Some(DateFormat::parse_list(formats).map_err(|e| e.with_property(name))?),
            None => None,
        };

        let type_ref = &self.descriptor.type_ref;
        if let Some(kind) = type_ref.temporal_kind() {
            return Ok(formats.map(|formats| {
                Arc::new(TemporalPropertyConverter::new(name, kind, formats))
                    as Arc<dyn PropertyValueConverter>
            }));
        }

        let bound_type = match type_ref {
            TypeRef::Range(element) => Some(element.as_ref()),
            TypeRef::List(element) | TypeRef::Set(element) => match element.as_ref() {
                TypeRef::Range(inner) => Some(inner.as_ref()),
                _ => None,
            },
            _ => None,
        };

        Ok(bound_type.map(|bound_type| {
            let converter = match bound_type {
                TypeRef::Temporal(kind) => {
                    let formats = formats.unwrap_or_else(|| default_formats(*kind));
                    RangePropertyConverter::temporal(
                        name,
                        TemporalPropertyConverter::new(name, *kind, formats),
                    )
                }
                other => RangePropertyConverter::scalar(name, other.clone()),
            };
            Arc::new(converter) as Arc<dyn PropertyValueConverter>
        }))
    }
}

fn default_formats(kind: TemporalKind) -> Vec<DateFormat> {
    match kind {
        TemporalKind::Time => vec![DateFormat::HourMinuteSecond],
        TemporalKind::Date => vec![DateFormat::Date],
        _ => vec![DateFormat::StrictDateOptionalTime],
    }
}
