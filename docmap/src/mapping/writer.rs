use crate::common::{Bound, Object, Range, TypeRef, Value, RANGE_GT, RANGE_GTE, RANGE_LT, RANGE_LTE};
use crate::conversion::{key_to_string, scalar_to_key, write_scalar};
use crate::document::{Document, ValueAccessor};
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::mapping::converter::MappingContext;
use crate::mapping::warnings::Direction;
use crate::metadata::{Entity, EntityMetadata, PropertyDescriptor};
use crate::property::PropertyValueConverter;
use std::sync::Arc;

/// Writes domain objects into documents. Created for one top level call.
pub(crate) struct Writer<'a> {
    context: &'a MappingContext,
    depth: usize,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(context: &'a MappingContext) -> Self {
        Writer { context, depth: 0 }
    }

    /// Writes an entity, a generic map or a custom value converted to a
    /// document into the sink.
    pub(crate) fn write(&mut self, object: &Object, sink: &mut Document) -> MappingResult<()> {
        match object {
            // pre-structured payloads are copied as they are
            Object::Document(doc) => {
                for (key, value) in doc {
                    sink.insert(key.as_str(), value.clone());
                }
                Ok(())
            }
            Object::Map(entries) => {
                for (key, value) in entries {
                    let key = self.write_key(key)?;
                    let value = self.write_value(value, &TypeRef::Any)?;
                    sink.insert(key, value);
                }
                Ok(())
            }
            other => {
                let runtime = other.runtime_type();
                if self.context.conversions.has_custom_write_target(&runtime) {
                    return match self.context.conversions.convert_write(other)? {
                        Value::Document(doc) => {
                            sink.put_all(&doc);
                            Ok(())
                        }
                        value => {
                            log::error!("{} is written as {} and not as a document", runtime, value.store_type());
                            Err(MappingError::new(
                                &format!("{} is written as {} and not as a document", runtime, value.store_type()),
                                ErrorKind::ConversionError,
                            )
                            .with_value_type(runtime))
                        }
                    };
                }

                if let Object::Entity(entity) = other {
                    return self.write_root_entity(entity.as_ref(), sink);
                }

                log::error!("{} cannot be written as a document", runtime);
                Err(MappingError::new(
                    &format!("{} cannot be written as a document", runtime),
                    ErrorKind::InvalidOperation,
                )
                .with_value_type(runtime))
            }
        }
    }

    fn write_root_entity(&mut self, entity: &dyn Entity, sink: &mut Document) -> MappingResult<()> {
        let runtime = TypeRef::entity(entity.type_name());
        let metadata = self.metadata(&runtime)?;

        if self.hints_enabled(&metadata) && self.requires_type_hint(&runtime) {
            self.context.type_mapper.write_type(&runtime, sink);
        }

        self.descend(&runtime)?;
        let result = self.write_properties(entity, &metadata, sink);
        self.ascend();
        result?;

        self.write_metadata_slots(entity, &metadata, sink)
    }

    fn write_metadata_slots(
        &mut self,
        entity: &dyn Entity,
        metadata: &EntityMetadata,
        sink: &mut Document,
    ) -> MappingResult<()> {
        if let Some(property) = metadata.id_property() {
            if let Some(id) = self.slot_string(entity, property)? {
                sink.set_id(id);
            }
        }

        if let Some(property) = metadata.version_property() {
            match entity.get_property(property.name())? {
                Object::I64(version) => sink.set_version(version),
                Object::I32(version) => sink.set_version(version as i64),
                Object::Null => {}
                other => log::debug!(
                    "Version property {} of {} holds {}, no version is written",
                    property.name(),
                    metadata.type_name(),
                    other.type_name()
                ),
            }
        }

        if let Some(property) = metadata.routing_property() {
            if let Some(routing) = self.slot_string(entity, property)? {
                sink.set_routing(routing);
            }
        }

        if let Some(property) = metadata.index_name_property() {
            if let Some(index) = self.slot_string(entity, property)? {
                sink.set_index(index);
            }
        }
        Ok(())
    }

    fn slot_string(
        &mut self,
        entity: &dyn Entity,
        property: &PropertyDescriptor,
    ) -> MappingResult<Option<String>> {
        let value = entity.get_property(property.name())?;
        if value.is_null() {
            return Ok(None);
        }

        Ok(match self.write_value(&value, property.type_ref())? {
            Value::String(s) => Some(s),
            scalar @ (Value::Bool(_) | Value::I64(_) | Value::F64(_)) => Some(scalar.to_json()),
            _ => None,
        })
    }

    fn write_properties(
        &mut self,
        entity: &dyn Entity,
        metadata: &EntityMetadata,
        sink: &mut Document,
    ) -> MappingResult<()> {
        for property in metadata.properties() {
            if !property.is_writable()
                || property.is_index_name()
                || (property.is_id() && !metadata.store_id_in_source())
                || (property.is_version() && !metadata.store_version_in_source())
            {
                continue;
            }

            let value = entity.get_property(property.name())?;
            self.write_property_value(metadata, property, &value, sink)
                .map_err(|e| e.with_property(property.name()))?;
        }
        Ok(())
    }

    fn write_property_value(
        &mut self,
        metadata: &EntityMetadata,
        property: &PropertyDescriptor,
        value: &Object,
        sink: &mut Document,
    ) -> MappingResult<()> {
        let mut accessor = ValueAccessor::new(&mut *sink);

        if value.is_null() {
            if property.store_null() {
                accessor.set(property, Value::Null)?;
            }
            return Ok(());
        }

        if !property.store_empty() && value.is_empty() {
            return Ok(());
        }

        if let Some(converter) = property.converter() {
            let written = write_with_converter(converter.as_ref(), value)?;
            return accessor.set(property, written);
        }

        if let Some(kind) = property.type_ref().temporal_kind() {
            if !self
                .context
                .conversions
                .has_custom_write_target(&TypeRef::Temporal(kind))
            {
                self.context.warnings.warn(
                    metadata.type_name(),
                    property.name(),
                    Direction::Write,
                );
            }
        }

        self.write_property(property, value, sink)
    }

    fn write_property(
        &mut self,
        property: &PropertyDescriptor,
        value: &Object,
        sink: &mut Document,
    ) -> MappingResult<()> {
        let written = match value {
            Object::Entity(entity)
                if !self
                    .context
                    .conversions
                    .has_custom_write_target(&value.runtime_type()) =>
            {
                // a document already at the slot is merged into
                let existing = match sink.get(property.field_name()) {
                    Some(Value::Document(doc)) => doc.clone(),
                    _ => Document::new(),
                };
                let nested = self.write_nested_entity(entity.as_ref(), property.type_ref(), existing)?;
                Value::Document(nested)
            }
            other => self.write_value(other, property.type_ref())?,
        };

        ValueAccessor::new(sink).set(property, written)
    }

    /// Writes any domain value declared as `declared`.
    fn write_value(&mut self, value: &Object, declared: &TypeRef) -> MappingResult<Value> {
        let runtime = value.runtime_type();
        if self.context.conversions.has_custom_write_target(&runtime) {
            return self.context.conversions.convert_write(value);
        }

        match value {
            Object::Null => Ok(Value::Null),
            Object::List(items) | Object::Set(items) => {
                let component = declared.component_type().cloned().unwrap_or(TypeRef::Any);
                self.descend(declared)?;
                let result = items
                    .iter()
                    .map(|item| self.write_value(item, &component))
                    .collect::<MappingResult<Vec<_>>>();
                self.ascend();
                Ok(Value::Array(result?))
            }
            Object::Map(entries) => {
                let value_type = match declared {
                    TypeRef::Map(_, value_type) => value_type.as_ref().clone(),
                    _ => TypeRef::Any,
                };
                self.descend(declared)?;
                let result = self.write_map(entries, &value_type);
                self.ascend();
                result.map(Value::Document)
            }
            Object::Entity(entity) => self
                .write_nested_entity(entity.as_ref(), declared, Document::new())
                .map(Value::Document),
            Object::Temporal(temporal) => Ok(Value::Document(temporal.to_components())),
            Object::Range(range) => {
                let bound_type = match declared {
                    TypeRef::Range(bound_type) => bound_type.as_ref().clone(),
                    _ => TypeRef::Any,
                };
                self.write_range(range, &bound_type).map(Value::Document)
            }
            // reports the missing converter
            Object::Custom(_) => self.context.conversions.convert_write(value),
            scalar => write_scalar(scalar),
        }
    }

    fn write_map(&mut self, entries: &[(Object, Object)], value_type: &TypeRef) -> MappingResult<Document> {
        let mut doc = Document::new();
        for (key, value) in entries {
            let key = self.write_key(key).map_err(|e| e.with_target_type("map key"))?;
            let value = self.write_value(value, value_type)?;
            doc.insert(key, value);
        }
        Ok(doc)
    }

    /// Map keys of custom types go through their writing converter when it
    /// produces a scalar.
    fn write_key(&self, key: &Object) -> MappingResult<String> {
        let runtime = key.runtime_type();
        let conversions = &self.context.conversions;
        if conversions
            .custom_write_target(&runtime)
            .is_some_and(|target| target.is_scalar())
        {
            return scalar_to_key(conversions.convert_write(key)?)
                .map_err(|e| e.with_value_type(runtime));
        }
        key_to_string(key)
    }

    fn write_range(&mut self, range: &Range<Object>, bound_type: &TypeRef) -> MappingResult<Document> {
        let mut doc = Document::new();
        match range.lower() {
            Bound::Inclusive(v) => doc.insert(RANGE_GTE, self.write_value(v, bound_type)?),
            Bound::Exclusive(v) => doc.insert(RANGE_GT, self.write_value(v, bound_type)?),
            Bound::Unbounded => {}
        }
        match range.upper() {
            Bound::Inclusive(v) => doc.insert(RANGE_LTE, self.write_value(v, bound_type)?),
            Bound::Exclusive(v) => doc.insert(RANGE_LT, self.write_value(v, bound_type)?),
            Bound::Unbounded => {}
        }
        Ok(doc)
    }

    fn write_nested_entity(
        &mut self,
        entity: &dyn Entity,
        declared: &TypeRef,
        mut target: Document,
    ) -> MappingResult<Document> {
        let runtime = TypeRef::entity(entity.type_name());
        let metadata = self.metadata(&runtime)?;

        if self.hints_enabled(&metadata)
            && declared.entity_name() != runtime.entity_name()
            && self.requires_type_hint(&runtime)
        {
            self.context.type_mapper.write_type(&runtime, &mut target);
        }

        self.descend(&runtime)?;
        let result = self.write_properties(entity, &metadata, &mut target);
        self.ascend();
        result.map(|_| target)
    }

    fn hints_enabled(&self, metadata: &EntityMetadata) -> bool {
        self.context.config.write_type_hints() && metadata.write_type_hint()
    }

    fn requires_type_hint(&self, runtime: &TypeRef) -> bool {
        !self.context.conversions.is_simple_type(runtime)
            && !runtime.is_collection_like()
            && !runtime.is_map()
            && !self.context.conversions.has_custom_write_target(runtime)
    }

    fn metadata(&self, type_ref: &TypeRef) -> MappingResult<Arc<EntityMetadata>> {
        let name = type_ref.entity_name().unwrap_or_default();
        self.context
            .provider
            .required_metadata_for(name)
            .map_err(|e| {
                MappingError::new_with_cause(
                    &format!("Cannot write {} without entity metadata", name),
                    ErrorKind::ConversionError,
                    e,
                )
                .with_value_type(name)
            })
    }

    fn descend(&mut self, type_ref: &TypeRef) -> MappingResult<()> {
        self.depth += 1;
        if self.depth > self.context.config.max_depth() {
            log::error!(
                "Writing {} exceeds the maximum depth of {}",
                type_ref,
                self.context.config.max_depth()
            );
            return Err(MappingError::new(
                &format!(
                    "Writing {} exceeds the maximum depth of {}",
                    type_ref,
                    self.context.config.max_depth()
                ),
                ErrorKind::DepthLimitExceeded,
            )
            .with_value_type(type_ref));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Applies a property converter, element by element for lists and sets.
pub(crate) fn write_with_converter(
    converter: &dyn PropertyValueConverter,
    value: &Object,
) -> MappingResult<Value> {
    match value {
        Object::List(items) | Object::Set(items) => items
            .iter()
            .map(|item| converter.write(item))
            .collect::<MappingResult<Vec<_>>>()
            .map(Value::Array),
        other => converter.write(other),
    }
}
