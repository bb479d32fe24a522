use std::sync::Arc;

use crate::common::{entity_from_object, Object, TypeRef};
use crate::conversion::ConversionRegistry;
use crate::document::Document;
use crate::errors::MappingResult;
use crate::mapping::reader::Reader;
use crate::mapping::warnings::TemporalWarnings;
use crate::mapping::writer::Writer;
use crate::mapping::{MappingConfig, MappingConverterBuilder, TypeHintMapper};
use crate::metadata::{
    EntityMetadataProvider, ExpressionResolver, InstanceFactory, MappedEntity,
};

/// Everything a reader or writer needs, shared by all conversions of one
/// converter.
pub(crate) struct MappingContext {
    pub(crate) config: MappingConfig,
    pub(crate) conversions: Arc<ConversionRegistry>,
    pub(crate) type_mapper: TypeHintMapper,
    pub(crate) provider: Arc<dyn EntityMetadataProvider>,
    pub(crate) instance_factory: Arc<dyn InstanceFactory>,
    pub(crate) expression_resolver: Arc<dyn ExpressionResolver>,
    pub(crate) warnings: TemporalWarnings,
}

/// Converts entities to documents and back.
///
/// The converter is immutable once built and cheap to clone; clones share the
/// registry, the metadata provider and the warning counters. Every call runs
/// on a fresh reader or writer, so concurrent calls do not interfere.
///
/// # Examples
///
/// ```rust,ignore
/// use docmap::mapping::MappingConverter;
///
/// let converter = MappingConverter::builder()
///     .register::<Book>()
///     .register::<Author>()
///     .build()?;
///
/// let document = converter.write_entity(&book)?;
/// let restored: Book = converter.read_entity(&document)?;
/// ```
#[derive(Clone)]
pub struct MappingConverter {
    inner: Arc<MappingContext>,
}

impl MappingConverter {
    pub fn builder() -> MappingConverterBuilder {
        MappingConverterBuilder::new()
    }

    pub(crate) fn from_context(context: MappingContext) -> Self {
        MappingConverter {
            inner: Arc::new(context),
        }
    }

    /// Writes an entity, a generic map or a document-valued custom type into
    /// `sink`.
    ///
    /// Generic maps and documents are copied without type hint or metadata.
    /// Entities get a type hint unless disabled, and their id, version,
    /// routing and index name are also put into the sink's metadata slots.
    pub fn write(&self, object: &Object, sink: &mut Document) -> MappingResult<()> {
        Writer::new(&self.inner).write(object, sink)
    }

    /// Reads the source as `target`, or as the entity type hinted in the
    /// source when it is assignable to `target`.
    pub fn read(&self, target: &TypeRef, source: &Document) -> MappingResult<Object> {
        Reader::new(&self.inner).read(target, source)
    }

    /// Writes the object into a new document.
    pub fn map_object(&self, object: &Object) -> MappingResult<Document> {
        let mut document = Document::new();
        self.write(object, &mut document)?;
        Ok(document)
    }

    pub fn write_entity<T: MappedEntity + Clone>(&self, entity: &T) -> MappingResult<Document> {
        self.map_object(&Object::entity(entity.clone()))
    }

    /// Reads the source as `T`. A hint naming a subtype of `T` is an error
    /// here since the result could not be a `T`; read through
    /// [read](MappingConverter::read) with `T`'s type to get the subtype.
    pub fn read_entity<T: MappedEntity>(&self, source: &Document) -> MappingResult<T> {
        let object = self.read(&TypeRef::entity(T::TYPE_NAME), source)?;
        entity_from_object::<T>(object)
    }

    pub fn conversions(&self) -> &ConversionRegistry {
        &self.inner.conversions
    }

    pub fn type_mapper(&self) -> &TypeHintMapper {
        &self.inner.type_mapper
    }

    pub fn metadata_provider(&self) -> &Arc<dyn EntityMetadataProvider> {
        &self.inner.provider
    }

    pub fn config(&self) -> &MappingConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for MappingConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingConverter")
            .field("config", &self.inner.config)
            .field("conversions", &self.inner.conversions)
            .field("type_mapper", &self.inner.type_mapper)
            .finish()
    }
}
