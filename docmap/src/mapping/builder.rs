use std::sync::Arc;

use crate::conversion::ConversionRegistry;
use crate::errors::{ErrorKind, MappingError, MappingResult};
use crate::mapping::converter::MappingContext;
use crate::mapping::warnings::TemporalWarnings;
use crate::mapping::{MappingConfig, MappingConverter, TypeHintMapper};
use crate::metadata::{
    DefaultInstanceFactory, EntityMetadataProvider, EntityRegistry, ExpressionResolver,
    FieldPathResolver, InstanceFactory, MappedEntity,
};

/// Builder for creating and configuring a [MappingConverter].
///
/// Configuration errors are captured and returned by
/// [build](MappingConverterBuilder::build), so the chain never has to be
/// interrupted. Only the first error is kept.
///
/// # Examples
///
/// ```rust,ignore
/// let converter = MappingConverter::builder()
///     .type_key(Some("@type"))
///     .max_depth(16)
///     .conversions(ConversionRegistry::builder().register::<Celsius>().build()?)
///     .register::<Reading>()
///     .build()?;
/// ```
pub struct MappingConverterBuilder {
    error: Option<MappingError>,
    config: MappingConfig,
    conversions: Option<ConversionRegistry>,
    registry: EntityRegistry,
    provider: Option<Arc<dyn EntityMetadataProvider>>,
    instance_factory: Arc<dyn InstanceFactory>,
    expression_resolver: Arc<dyn ExpressionResolver>,
}

impl Default for MappingConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingConverterBuilder {
    /// Creates a builder with the default configuration, the bundled
    /// conversions and an empty entity registry.
    pub fn new() -> Self {
        MappingConverterBuilder {
            error: None,
            config: MappingConfig::new(),
            conversions: None,
            registry: EntityRegistry::new(),
            provider: None,
            instance_factory: Arc::new(DefaultInstanceFactory),
            expression_resolver: Arc::new(FieldPathResolver),
        }
    }

    /// Sets the type hint key; `None` disables type hints.
    pub fn type_key(mut self, type_key: Option<&str>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_type_key(type_key) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn write_type_hints(mut self, write_type_hints: bool) -> Self {
        self.config.set_write_type_hints(write_type_hints);
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_depth(max_depth) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Replaces the bundled conversions.
    pub fn conversions(mut self, conversions: ConversionRegistry) -> Self {
        self.conversions = Some(conversions);
        self
    }

    /// Registers an entity type with the bundled entity registry.
    pub fn register<T: MappedEntity>(mut self) -> Self {
        if self.error.is_none() {
            if self.provider.is_some() {
                log::error!(
                    "Cannot register {} when a custom metadata provider is set",
                    T::TYPE_NAME
                );
                self.error = Some(MappingError::new(
                    &format!(
                        "Cannot register {} when a custom metadata provider is set",
                        T::TYPE_NAME
                    ),
                    ErrorKind::InvalidOperation,
                ));
            } else if let Err(e) = self.registry.register::<T>() {
                self.error = Some(e);
            }
        }
        self
    }

    /// Uses the given provider instead of the bundled entity registry.
    pub fn metadata_provider(mut self, provider: Arc<dyn EntityMetadataProvider>) -> Self {
        if self.error.is_none() && !self.registry.is_empty() {
            log::error!("Entities were already registered with the bundled registry");
            self.error = Some(MappingError::new(
                "Entities were already registered with the bundled registry",
                ErrorKind::InvalidOperation,
            ));
        }
        self.provider = Some(provider);
        self
    }

    pub fn instance_factory(mut self, instance_factory: Arc<dyn InstanceFactory>) -> Self {
        self.instance_factory = instance_factory;
        self
    }

    /// Sets the resolver of property expressions. Defaults to
    /// [FieldPathResolver].
    pub fn expression_resolver(mut self, resolver: Arc<dyn ExpressionResolver>) -> Self {
        self.expression_resolver = resolver;
        self
    }

    pub fn build(self) -> MappingResult<MappingConverter> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let provider: Arc<dyn EntityMetadataProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(self.registry),
        };
        let conversions = match self.conversions {
            Some(conversions) => conversions,
            None => ConversionRegistry::builder().build()?,
        };
        let type_mapper = TypeHintMapper::new(self.config.type_key(), provider.clone());

        log::debug!("Building mapping converter with {:?}", self.config);
        Ok(MappingConverter::from_context(MappingContext {
            config: self.config,
            conversions: Arc::new(conversions),
            type_mapper,
            provider,
            instance_factory: self.instance_factory,
            expression_resolver: self.expression_resolver,
            warnings: TemporalWarnings::new(),
        }))
    }
}
