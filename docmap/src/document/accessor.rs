use std::ops::{Deref, DerefMut};

use crate::common::Value;
use crate::document::Document;
use crate::errors::MappingResult;
use crate::metadata::PropertyDescriptor;

/// Gives the mapper uniform access to a document by property.
///
/// Ordinary properties read and write the property's field name, which may be
/// a dotted path. The id property falls back to the document's id slot when
/// the source holds no such field, the version property is always taken from
/// the version slot when one is present. Writing an id or version property
/// fills the slot as well as the field.
pub struct ValueAccessor<D> {
    document: D,
}

impl<D: Deref<Target = Document>> ValueAccessor<D> {
    pub fn new(document: D) -> Self {
        ValueAccessor { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn get(&self, property: &PropertyDescriptor) -> Option<Value> {
        let field_name = property.field_name();

        if property.is_id() {
            if let Some(id) = self.document.id() {
                let from_source = self
                    .document
                    .get(field_name)
                    .filter(|v| !v.is_null())
                    .cloned();
                return Some(from_source.unwrap_or_else(|| Value::from(id)));
            }
        }

        if property.is_version() {
            if let Some(version) = self.document.version() {
                return Some(Value::I64(version));
            }
        }

        self.document.get(field_name).cloned()
    }

    /// `true` if the document holds the property, counting metadata slots.
    pub fn has_value(&self, property: &PropertyDescriptor) -> bool {
        (property.is_id() && self.document.has_id())
            || (property.is_version() && self.document.has_version())
            || self.document.contains_key(property.field_name())
    }
}

impl<D: DerefMut<Target = Document>> ValueAccessor<D> {
    pub fn set(&mut self, property: &PropertyDescriptor, value: Value) -> MappingResult<()> {
        if property.is_id() {
            match &value {
                Value::Null => {}
                Value::String(id) => self.document.set_id(id.as_str()),
                other => self.document.set_id(other.to_json()),
            }
        }

        if property.is_version() {
            if let Value::I64(version) = value {
                self.document.set_version(version);
            }
        }

        self.document.put(property.field_name(), value)
    }
}
