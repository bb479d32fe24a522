use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::common::TypeRef;
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::metadata::{Entity, ParameterValueProvider, PropertyDescriptor};

/// Creates a new entity instance, pulling constructor arguments from the
/// given provider.
pub type EntityFactory =
    Arc<dyn Fn(&mut dyn ParameterValueProvider) -> MappingResult<Box<dyn Entity>> + Send + Sync>;

/// Compiled description of a mapped entity type.
#[derive(Clone)]
pub struct EntityMetadata {
    type_name: String,
    alias: Option<String>,
    supertypes: Vec<String>,
    properties: Vec<PropertyDescriptor>,
    constructor: Vec<String>,
    factory: EntityFactory,
    write_type_hint: bool,
    store_id_in_source: bool,
    store_version_in_source: bool,
}

impl EntityMetadata {
    pub fn builder(type_name: &str, factory: EntityFactory) -> EntityMetadataBuilder {
        EntityMetadataBuilder::new(type_name, factory)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The value written into the type hint: the alias if present, else the
    /// type name.
    pub fn hint(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.type_name)
    }

    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn id_property(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.is_id())
    }

    pub fn version_property(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.is_version())
    }

    pub fn seq_no_primary_term_property(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.is_seq_no_primary_term())
    }

    pub fn index_name_property(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.is_index_name())
    }

    pub fn routing_property(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.is_routing())
    }

    /// Names of the properties passed to the factory, in order.
    pub fn constructor_parameters(&self) -> &[String] {
        &self.constructor
    }

    pub fn is_constructor_argument(&self, property: &str) -> bool {
        self.constructor.iter().any(|p| p == property)
    }

    /// `true` when some readable property is not set through the factory.
    pub fn requires_property_population(&self) -> bool {
        self.properties
            .iter()
            .any(|p| p.is_readable() && !self.is_constructor_argument(p.name()))
    }

    pub fn factory(&self) -> &EntityFactory {
        &self.factory
    }

    pub fn write_type_hint(&self) -> bool {
        self.write_type_hint
    }

    pub fn store_id_in_source(&self) -> bool {
        self.store_id_in_source
    }

    pub fn store_version_in_source(&self) -> bool {
        self.store_version_in_source
    }
}

impl Debug for EntityMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityMetadata")
            .field("type_name", &self.type_name)
            .field("alias", &self.alias)
            .field("supertypes", &self.supertypes)
            .field("properties", &self.properties)
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// Builder for [EntityMetadata]. Validation runs in [build](EntityMetadataBuilder::build).
pub struct EntityMetadataBuilder {
    metadata: EntityMetadata,
}

impl EntityMetadataBuilder {
    fn new(type_name: &str, factory: EntityFactory) -> Self {
        EntityMetadataBuilder {
            metadata: EntityMetadata {
                type_name: type_name.to_string(),
                alias: None,
                supertypes: Vec::new(),
                properties: Vec::new(),
                constructor: Vec::new(),
                factory,
                write_type_hint: true,
                store_id_in_source: false,
                store_version_in_source: false,
            },
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.metadata.alias = Some(alias.to_string());
        self
    }

    /// Declares that this entity may stand in wherever `supertype` is
    /// expected.
    pub fn supertype(mut self, supertype: &str) -> Self {
        self.metadata.supertypes.push(supertype.to_string());
        self
    }

    pub fn property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.metadata.properties.push(descriptor);
        self
    }

    pub fn constructor(mut self, parameters: &[&str]) -> Self {
        self.metadata.constructor = parameters.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn write_type_hint(mut self, write_type_hint: bool) -> Self {
        self.metadata.write_type_hint = write_type_hint;
        self
    }

    /// Also writes the id property as a source field. Off by default, the id
    /// then lives in the id slot only.
    pub fn store_id_in_source(mut self, store: bool) -> Self {
        self.metadata.store_id_in_source = store;
        self
    }

    pub fn store_version_in_source(mut self, store: bool) -> Self {
        self.metadata.store_version_in_source = store;
        self
    }

    pub fn build(self) -> MappingResult<EntityMetadata> {
        let metadata = self.metadata;
        let type_name = metadata.type_name.clone();
        let invalid = |message: String| {
            log::error!("{}", message);
            Err(MappingError::new(&message, ErrorKind::InvalidOperation).with_target_type(&type_name))
        };

        if metadata.type_name.is_empty() {
            return invalid("Entity type name cannot be empty".to_string());
        }

        let mut names = HashSet::new();
        for property in &metadata.properties {
            if !names.insert(property.name()) {
                return invalid(format!(
                    "Duplicate property {} in entity {}",
                    property.name(),
                    metadata.type_name
                ));
            }
        }

        let marked = |predicate: fn(&PropertyDescriptor) -> bool| {
            metadata.properties.iter().filter(|p| predicate(*p)).count()
        };
        if marked(PropertyDescriptor::is_id) > 1 {
            return invalid(format!("Multiple id properties in entity {}", metadata.type_name));
        }
        if marked(PropertyDescriptor::is_version) > 1 {
            return invalid(format!(
                "Multiple version properties in entity {}",
                metadata.type_name
            ));
        }
        if let Some(version) = metadata.version_property() {
            if !matches!(version.type_ref(), TypeRef::I32 | TypeRef::I64) {
                return invalid(format!(
                    "Version property {} of entity {} must be an integer, found {}",
                    version.name(),
                    metadata.type_name,
                    version.type_ref()
                ));
            }
        }
        if marked(PropertyDescriptor::is_seq_no_primary_term) > 1 {
            return invalid(format!(
                "Multiple sequence number properties in entity {}",
                metadata.type_name
            ));
        }

        for parameter in &metadata.constructor {
            if metadata.property(parameter).is_none() {
                return invalid(format!(
                    "Constructor parameter {} is not a property of entity {}",
                    parameter, metadata.type_name
                ));
            }
        }

        Ok(metadata)
    }
}
