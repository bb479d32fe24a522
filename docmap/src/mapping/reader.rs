use std::sync::Arc;

use crate::common::{
    Bound, Object, Range, StoreType, Temporal, TypeRef, Value, RANGE_GT, RANGE_GTE, RANGE_LT,
    RANGE_LTE, VERSION_NOT_REQUESTED,
};
use crate::conversion::{read_scalar, SeqNoPrimaryTerm};
use crate::document::{Document, ValueAccessor};
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::mapping::converter::MappingContext;
use crate::mapping::warnings::Direction;
use crate::metadata::{Entity, EntityMetadata, ParameterValueProvider, PropertyDescriptor};
use crate::property::PropertyValueConverter;

/// Reads documents into domain objects. Created for one top level call.
pub(crate) struct Reader<'a> {
    context: &'a MappingContext,
    depth: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(context: &'a MappingContext) -> Self {
        Reader { context, depth: 0 }
    }

    /// Reads the document as `target`, or as the type hinted in the document
    /// when that type is compatible with `target`.
    pub(crate) fn read(&mut self, target: &TypeRef, source: &Document) -> MappingResult<Object> {
        let resolved = self.context.type_mapper.read_type_or(source, target);
        log::trace!("Reading document as {}", resolved);

        if self
            .context
            .conversions
            .has_custom_read_target(StoreType::Document, &resolved)
        {
            return self
                .context
                .conversions
                .convert_read(&Value::Document(source.clone()), &resolved);
        }

        match &resolved {
            TypeRef::Document | TypeRef::Any => Ok(Object::Document(source.clone())),
            TypeRef::Map(key_type, value_type) => {
                self.descend(&resolved)?;
                let result = self.read_map(source, key_type, value_type);
                self.ascend();
                result
            }
            TypeRef::Entity(name) => {
                let metadata = self.metadata(name)?;
                self.read_entity(metadata, source)
            }
            TypeRef::Temporal(kind) => Temporal::from_components(*kind, source).map(Object::Temporal),
            TypeRef::Range(bound_type) => self.read_range(source, bound_type),
            other => {
                log::error!("Cannot read a document as {}", other);
                Err(MappingError::new(
                    &format!("Cannot read a document as {}", other),
                    ErrorKind::ConversionError,
                )
                .with_target_type(other)
                .with_value_type(StoreType::Document)
                .with_source_id(source.id()))
            }
        }
    }

    fn read_entity(
        &mut self,
        metadata: Arc<EntityMetadata>,
        source: &Document,
    ) -> MappingResult<Object> {
        let metadata = self.closest_metadata(metadata, source);
        let entity_type = TypeRef::entity(metadata.type_name());

        self.descend(&entity_type)?;
        let result = self.read_entity_properties(&metadata, source);
        self.ascend();

        result.map(Object::Entity).map_err(|e| match e.kind() {
            ErrorKind::ConversionError | ErrorKind::ValidationError | ErrorKind::DepthLimitExceeded => {
                e.with_source_id(source.id())
            }
            _ => {
                let message = format!(
                    "Failed to read {} from document {}",
                    metadata.type_name(),
                    source.id().unwrap_or("without id")
                );
                log::error!("{}", message);
                MappingError::new_with_cause(&message, ErrorKind::ConversionError, e)
                    .with_target_type(metadata.type_name())
                    .with_source_id(source.id())
            }
        })
    }

    /// Prefers the hinted entity type when it is a subtype of the expected
    /// one.
    fn closest_metadata(
        &self,
        metadata: Arc<EntityMetadata>,
        source: &Document,
    ) -> Arc<EntityMetadata> {
        let expected = TypeRef::entity(metadata.type_name());
        match self.context.type_mapper.read_type_or(source, &expected) {
            TypeRef::Entity(name) if name != metadata.type_name() => self
                .context
                .provider
                .metadata_for(&name)
                .unwrap_or(metadata),
            _ => metadata,
        }
    }

    fn read_entity_properties(
        &mut self,
        metadata: &EntityMetadata,
        source: &Document,
    ) -> MappingResult<Box<dyn Entity>> {
        let factory = self.context.instance_factory.clone();
        let mut instance = {
            let mut parameters = PropertyValues {
                reader: self,
                metadata,
                source,
            };
            factory.create(metadata, &mut parameters)?
        };

        if !metadata.requires_property_population() {
            return Ok(instance);
        }

        for property in metadata.properties() {
            if !property.is_readable()
                || metadata.is_constructor_argument(property.name())
                || property.is_seq_no_primary_term()
                || property.is_index_name()
            {
                continue;
            }

            let from_script = property
                .script_field()
                .is_some_and(|name| source.script_field(name).is_some());
            if from_script {
                continue;
            }

            let present = if property.is_id() || property.is_version() {
                // slot values are assigned after population
                source.contains_key(property.field_name())
            } else {
                ValueAccessor::new(source).has_value(property)
            };
            if property.expression().is_none() && !present {
                continue;
            }

            let value = self.read_property(metadata, property, source)?;
            instance.set_property(property.name(), value)?;
        }

        self.assign_metadata_slots(metadata, source, instance.as_mut())?;
        self.assign_script_fields(metadata, source, instance.as_mut())?;
        Ok(instance)
    }

    fn assign_metadata_slots(
        &mut self,
        metadata: &EntityMetadata,
        source: &Document,
        instance: &mut dyn Entity,
    ) -> MappingResult<()> {
        if let (Some(id), Some(property)) = (source.id(), metadata.id_property()) {
            if property.type_ref() == &TypeRef::String {
                instance.set_property(property.name(), Object::String(id.to_string()))?;
            }
        }

        if let (Some(version), Some(property)) = (source.version(), metadata.version_property()) {
            if version == VERSION_NOT_REQUESTED {
                log::error!(
                    "Document {} reports version {} for {}; the version was not requested",
                    source.id().unwrap_or_default(),
                    version,
                    metadata.type_name()
                );
                return Err(MappingError::new(
                    &format!(
                        "Version {} in source of {} means the version was not requested",
                        version,
                        metadata.type_name()
                    ),
                    ErrorKind::ValidationError,
                )
                .with_property(property.name())
                .with_source_id(source.id()));
            }

            let value = read_scalar(&Value::I64(version), property.type_ref())
                .map_err(|e| e.with_property(property.name()).with_source_id(source.id()))?;
            instance.set_property(property.name(), value)?;
        }

        if let (Some(seq_no), Some(primary_term), Some(property)) = (
            source.seq_no(),
            source.primary_term(),
            metadata.seq_no_primary_term_property(),
        ) {
            let value = SeqNoPrimaryTerm::new(seq_no, primary_term);
            if value.is_assigned() {
                instance.set_property(property.name(), Object::custom(value))?;
            }
        }

        if let (Some(index), Some(property)) = (source.index(), metadata.index_name_property()) {
            instance.set_property(property.name(), Object::String(index.to_string()))?;
        }
        Ok(())
    }

    fn assign_script_fields(
        &mut self,
        metadata: &EntityMetadata,
        source: &Document,
        instance: &mut dyn Entity,
    ) -> MappingResult<()> {
        for property in metadata.properties() {
            let Some(values) = property.script_field().and_then(|name| source.script_field(name))
            else {
                continue;
            };

            let target = property.type_ref();
            let value = match target.component_type() {
                Some(component) if target.is_collection_like() => {
                    let items = values
                        .iter()
                        .map(|v| self.simple_read(v, component))
                        .collect::<MappingResult<Vec<_>>>()?;
                    collection(target, items)
                }
                _ => match values.as_slice() {
                    [] => Object::Null,
                    [single] => self.simple_read(single, target)?,
                    many => self.simple_read(&Value::Array(many.to_vec()), target)?,
                },
            };
            instance
                .set_property(property.name(), value)
                .map_err(|e| e.with_property(property.name()))?;
        }
        Ok(())
    }

    /// Reads one property from the source, through its expression when it
    /// has one.
    fn read_property(
        &mut self,
        metadata: &EntityMetadata,
        property: &PropertyDescriptor,
        source: &Document,
    ) -> MappingResult<Object> {
        let value = match property.expression() {
            Some(expression) => self
                .context
                .expression_resolver
                .evaluate(expression, source)
                .map_err(|e| e.with_property(property.name()))?,
            None => ValueAccessor::new(source).get(property).unwrap_or_default(),
        };
        self.read_value(metadata, property, &value)
            .map_err(|e| e.with_property(property.name()))
    }

    fn read_value(
        &mut self,
        metadata: &EntityMetadata,
        property: &PropertyDescriptor,
        value: &Value,
    ) -> MappingResult<Object> {
        if let Some(converter) = property.converter() {
            return read_with_converter(converter.as_ref(), property.type_ref(), value);
        }

        if let Some(kind) = property.type_ref().temporal_kind() {
            if !self
                .context
                .conversions
                .has_custom_read_target(value.store_type(), &TypeRef::Temporal(kind))
            {
                self.context
                    .warnings
                    .warn(metadata.type_name(), property.name(), Direction::Read);
            }
        }

        self.read_typed(value, property.type_ref())
    }

    /// Generic conversion of a store value into the target type.
    fn read_typed(&mut self, value: &Value, target: &TypeRef) -> MappingResult<Object> {
        if value.is_null() {
            return Ok(Object::Null);
        }

        if self
            .context
            .conversions
            .has_custom_read_target(value.store_type(), target)
        {
            return self.context.conversions.convert_read(value, target);
        }

        if target.is_collection_like() {
            return match value {
                Value::Array(items) => self.read_collection(items, target),
                // a single value stands for a collection of one
                single => {
                    let component = target.component_type().cloned().unwrap_or(TypeRef::Any);
                    let item = self.read_typed(single, &component)?;
                    Ok(collection(target, vec![item]))
                }
            };
        }

        match value {
            Value::Document(doc) => self.read(target, doc),
            Value::Array(items) if matches!(target, TypeRef::Any) => {
                self.read_collection(items, &TypeRef::list(TypeRef::Any))
            }
            scalar => self.simple_read(scalar, target),
        }
    }

    fn read_collection(&mut self, items: &[Value], target: &TypeRef) -> MappingResult<Object> {
        if items.is_empty() {
            return Ok(collection(target, Vec::new()));
        }

        let component = target.component_type().cloned().unwrap_or(TypeRef::Any);
        self.descend(target)?;
        let result = items
            .iter()
            .map(|item| self.read_typed(item, &component))
            .collect::<MappingResult<Vec<_>>>();
        self.ascend();
        Ok(collection(target, result?))
    }

    fn read_map(
        &mut self,
        source: &Document,
        key_type: &TypeRef,
        value_type: &TypeRef,
    ) -> MappingResult<Object> {
        let mut entries = Vec::with_capacity(source.size());
        for (key, value) in source {
            if self.context.type_mapper.is_type_key(key) {
                continue;
            }

            let key = match key_type {
                TypeRef::Any | TypeRef::String => Object::String(key.clone()),
                key_type
                    if self
                        .context
                        .conversions
                        .has_custom_read_target(StoreType::String, key_type) =>
                {
                    self.context
                        .conversions
                        .convert_read(&Value::String(key.clone()), key_type)?
                }
                key_type => read_scalar(&Value::String(key.clone()), key_type)?,
            };
            let value = self.read_typed(value, value_type)?;
            entries.push((key, value));
        }
        Ok(Object::Map(entries))
    }

    fn read_range(&mut self, source: &Document, bound_type: &TypeRef) -> MappingResult<Object> {
        let mut bound = |inclusive: &str, exclusive: &str| -> MappingResult<Bound<Object>> {
            if let Some(v) = source.get(inclusive).filter(|v| !v.is_null()) {
                Ok(Bound::Inclusive(self.read_typed(v, bound_type)?))
            } else if let Some(v) = source.get(exclusive).filter(|v| !v.is_null()) {
                Ok(Bound::Exclusive(self.read_typed(v, bound_type)?))
            } else {
                Ok(Bound::Unbounded)
            }
        };
        let lower = bound(RANGE_GTE, RANGE_GT)?;
        let upper = bound(RANGE_LTE, RANGE_LT)?;
        Ok(Object::Range(Box::new(Range::new(lower, upper))))
    }

    /// Reads a simple value: as it is for untyped targets, then through a
    /// registered reading converter, an ISO string for temporals, the scalar
    /// conversions, and last by unwrapping a one element array.
    fn simple_read(&mut self, value: &Value, target: &TypeRef) -> MappingResult<Object> {
        match (value, target) {
            (_, TypeRef::Any) => return Ok(untyped(value)),
            (Value::Document(doc), TypeRef::Document) => return Ok(Object::Document(doc.clone())),
            (Value::String(text), TypeRef::Temporal(kind)) => {
                return Temporal::parse_iso(*kind, text).map(Object::Temporal)
            }
            _ => {}
        }

        if self
            .context
            .conversions
            .has_custom_read_target(value.store_type(), target)
        {
            return self.context.conversions.convert_read(value, target);
        }

        match read_scalar(value, target) {
            Ok(object) => Ok(object),
            Err(e) => match value {
                Value::Array(items) if items.len() == 1 => self.read_typed(&items[0], target),
                _ => Err(e),
            },
        }
    }

    fn metadata(&self, name: &str) -> MappingResult<Arc<EntityMetadata>> {
        self.context.provider.required_metadata_for(name).map_err(|e| {
            MappingError::new_with_cause(
                &format!("Cannot read {} without entity metadata", name),
                ErrorKind::ConversionError,
                e,
            )
            .with_target_type(name)
        })
    }

    fn descend(&mut self, type_ref: &TypeRef) -> MappingResult<()> {
        self.depth += 1;
        if self.depth > self.context.config.max_depth() {
            log::error!(
                "Reading {} exceeds the maximum depth of {}",
                type_ref,
                self.context.config.max_depth()
            );
            return Err(MappingError::new(
                &format!(
                    "Reading {} exceeds the maximum depth of {}",
                    type_ref,
                    self.context.config.max_depth()
                ),
                ErrorKind::DepthLimitExceeded,
            )
            .with_target_type(type_ref));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Feeds constructor parameters from the source document.
struct PropertyValues<'r, 'a> {
    reader: &'r mut Reader<'a>,
    metadata: &'r EntityMetadata,
    source: &'r Document,
}

impl ParameterValueProvider for PropertyValues<'_, '_> {
    fn value(&mut self, property: &str) -> MappingResult<Object> {
        let Some(descriptor) = self.metadata.property(property) else {
            log::error!(
                "{} has no property {} to supply",
                self.metadata.type_name(),
                property
            );
            return Err(MappingError::new(
                &format!(
                    "{} has no property {} to supply",
                    self.metadata.type_name(),
                    property
                ),
                ErrorKind::InvalidOperation,
            )
            .with_property(property));
        };

        if descriptor.expression().is_none() && !ValueAccessor::new(self.source).has_value(descriptor) {
            return Ok(Object::Null);
        }
        self.reader
            .read_property(self.metadata, descriptor, self.source)
    }
}

fn collection(target: &TypeRef, items: Vec<Object>) -> Object {
    match target {
        TypeRef::Set(_) => Object::Set(items),
        _ => Object::List(items),
    }
}

/// Reads a store value without a target type.
fn untyped(value: &Value) -> Object {
    match value {
        Value::Null => Object::Null,
        Value::Bool(v) => Object::Bool(*v),
        Value::I64(v) => Object::I64(*v),
        Value::F64(v) => Object::F64(*v),
        Value::String(v) => Object::String(v.clone()),
        Value::Bytes(v) => Object::Bytes(v.clone()),
        Value::Document(v) => Object::Document(v.clone()),
        Value::Array(items) => Object::List(items.iter().map(untyped).collect()),
    }
}

/// Applies a property converter, element by element for arrays.
pub(crate) fn read_with_converter(
    converter: &dyn PropertyValueConverter,
    target: &TypeRef,
    value: &Value,
) -> MappingResult<Object> {
    match value {
        Value::Array(items) if target.is_collection_like() => {
            let items = items
                .iter()
                .map(|item| converter.read(item))
                .collect::<MappingResult<Vec<_>>>()?;
            Ok(collection(target, items))
        }
        other => {
            let object = converter.read(other)?;
            if target.is_collection_like() && !object.is_null() {
                Ok(collection(target, vec![object]))
            } else {
                Ok(object)
            }
        }
    }
}
