use std::sync::Arc;

use crate::common::{TypeRef, Value};
use crate::document::Document;
use crate::metadata::EntityMetadataProvider;

/// Reads and writes the reserved type hint field of a document.
///
/// A hint names the concrete entity type of a document, by alias when the
/// entity declares one and by its full type name otherwise. Without a type
/// key the mapper neither reads nor writes hints.
#[derive(Clone)]
pub struct TypeHintMapper {
    type_key: Option<String>,
    provider: Arc<dyn EntityMetadataProvider>,
}

impl TypeHintMapper {
    pub fn new(type_key: Option<&str>, provider: Arc<dyn EntityMetadataProvider>) -> Self {
        TypeHintMapper {
            type_key: type_key.map(str::to_string),
            provider,
        }
    }

    pub fn type_key(&self) -> Option<&str> {
        self.type_key.as_deref()
    }

    pub fn is_type_key(&self, key: &str) -> bool {
        self.type_key.as_deref() == Some(key)
    }

    /// The entity type hinted in the document, `None` if there is no hint or
    /// the hint names no known entity.
    pub fn read_type(&self, document: &Document) -> Option<TypeRef> {
        let key = self.type_key.as_deref()?;
        let hint = document.get(key).and_then(Value::as_str)?;
        match self.provider.resolve_hint(hint) {
            Some(metadata) => Some(TypeRef::entity(metadata.type_name())),
            None => {
                log::debug!("Type hint {} does not name a known entity", hint);
                None
            }
        }
    }

    /// The hinted type if it is compatible with `declared`, else `declared`.
    ///
    /// A hint is compatible if nothing specific is declared or if the hinted
    /// entity is the declared entity or one of its subtypes.
    pub fn read_type_or(&self, document: &Document, declared: &TypeRef) -> TypeRef {
        match self.read_type(document) {
            Some(hinted) if self.is_compatible(&hinted, declared) => hinted,
            Some(hinted) => {
                log::debug!(
                    "Ignoring type hint {} which is not assignable to {}",
                    hinted,
                    declared
                );
                declared.clone()
            }
            None => declared.clone(),
        }
    }

    /// Writes the hint of the entity type into the document. Does nothing for
    /// non entity types or when type hints are disabled.
    pub fn write_type(&self, type_ref: &TypeRef, document: &mut Document) {
        let (Some(key), Some(name)) = (self.type_key.as_deref(), type_ref.entity_name()) else {
            return;
        };

        let hint = match self.provider.metadata_for(name) {
            Some(metadata) => metadata.hint().to_string(),
            None => name.to_string(),
        };
        document.insert(key, hint);
    }

    fn is_compatible(&self, hinted: &TypeRef, declared: &TypeRef) -> bool {
        match (hinted.entity_name(), declared) {
            (_, TypeRef::Any) => true,
            (Some(hinted), TypeRef::Entity(declared)) => {
                hinted == declared || self.provider.is_assignable(hinted, declared)
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for TypeHintMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeHintMapper")
            .field("type_key", &self.type_key)
            .finish()
    }
}
