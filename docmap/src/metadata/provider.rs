use std::collections::HashMap;
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor};
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::metadata::{EntityMetadata, MappedEntity};

/// Source of [EntityMetadata] for the reader, writer and type mapper.
pub trait EntityMetadataProvider: Send + Sync {
    /// Metadata registered under the type name, if any.
    fn metadata_for(&self, type_name: &str) -> Option<Arc<EntityMetadata>>;

    /// Metadata registered under the type name or an alias.
    fn resolve_hint(&self, hint: &str) -> Option<Arc<EntityMetadata>>;

    /// Like [metadata_for](EntityMetadataProvider::metadata_for) but fails
    /// with [ErrorKind::MetadataNotFound] when nothing is registered.
    fn required_metadata_for(&self, type_name: &str) -> MappingResult<Arc<EntityMetadata>> {
        match self.metadata_for(type_name) {
            Some(metadata) => Ok(metadata),
            None => {
                log::error!("No entity metadata registered for {}", type_name);
                Err(MappingError::new(
                    &format!("No entity metadata registered for {}", type_name),
                    ErrorKind::MetadataNotFound,
                )
                .with_target_type(type_name))
            }
        }
    }

    /// `true` if `sub_type` is `super_type` or declares it, directly or
    /// through its own supertypes.
    fn is_assignable(&self, sub_type: &str, super_type: &str) -> bool {
        let mut pending = vec![sub_type.to_string()];
        let mut seen = Vec::new();
        while let Some(current) = pending.pop() {
            if current == super_type {
                return true;
            }
            if seen.contains(&current) {
                continue;
            }
            if let Some(metadata) = self.metadata_for(&current) {
                pending.extend(metadata.supertypes().iter().cloned());
            }
            seen.push(current);
        }
        false
    }
}

#[derive(Default)]
struct Registrations {
    by_name: HashMap<String, Arc<EntityMetadata>>,
    by_alias: HashMap<String, String>,
}

/// The bundled [EntityMetadataProvider], filled by registering entity
/// types up front.
///
/// # Examples
///
/// ```rust,ignore
/// let registry = EntityRegistry::new();
/// registry.register::<Book>()?;
/// registry.register::<Author>()?;
/// ```
#[derive(Clone, Default)]
pub struct EntityRegistry {
    inner: Atomic<Registrations>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        EntityRegistry {
            inner: atomic(Registrations::default()),
        }
    }

    /// Registers the metadata of a derived entity type.
    pub fn register<T: MappedEntity>(&self) -> MappingResult<()> {
        self.register_metadata(T::entity_metadata()?)
    }

    /// Registers hand built metadata. Re-registering a type replaces it, an
    /// alias already used by another type is rejected.
    pub fn register_metadata(&self, metadata: EntityMetadata) -> MappingResult<()> {
        let mut inner = self.inner.write();
        if let Some(alias) = metadata.alias() {
            if let Some(owner) = inner.by_alias.get(alias) {
                if owner != metadata.type_name() {
                    log::error!("Alias {} is already used by {}", alias, owner);
                    return Err(MappingError::new(
                        &format!("Alias {} is already used by {}", alias, owner),
                        ErrorKind::InvalidOperation,
                    ));
                }
            }
            inner
                .by_alias
                .insert(alias.to_string(), metadata.type_name().to_string());
        }

        log::debug!("Registered entity metadata for {}", metadata.type_name());
        inner
            .by_name
            .insert(metadata.type_name().to_string(), Arc::new(metadata));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read_with(|inner| inner.by_name.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityMetadataProvider for EntityRegistry {
    fn metadata_for(&self, type_name: &str) -> Option<Arc<EntityMetadata>> {
        self.inner
            .read_with(|inner| inner.by_name.get(type_name).cloned())
    }

    fn resolve_hint(&self, hint: &str) -> Option<Arc<EntityMetadata>> {
        self.inner.read_with(|inner| {
            inner.by_name.get(hint).cloned().or_else(|| {
                inner
                    .by_alias
                    .get(hint)
                    .and_then(|name| inner.by_name.get(name).cloned())
            })
        })
    }
}
