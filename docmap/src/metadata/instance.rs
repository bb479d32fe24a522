use crate::common::{Object, Value};
use crate::document::Document;
use crate::errors::MappingResult;
use crate::metadata::{Entity, EntityMetadata};

/// Supplies the value of a named property while an entity is being created.
pub trait ParameterValueProvider {
    fn value(&mut self, property: &str) -> MappingResult<Object>;
}

/// Creates entity instances on behalf of the reader.
pub trait InstanceFactory: Send + Sync {
    fn create(
        &self,
        metadata: &EntityMetadata,
        parameters: &mut dyn ParameterValueProvider,
    ) -> MappingResult<Box<dyn Entity>>;
}

/// Creates instances through the factory recorded in the entity metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultInstanceFactory;

impl InstanceFactory for DefaultInstanceFactory {
    fn create(
        &self,
        metadata: &EntityMetadata,
        parameters: &mut dyn ParameterValueProvider,
    ) -> MappingResult<Box<dyn Entity>> {
        log::trace!("Creating instance of {}", metadata.type_name());
        (metadata.factory())(parameters)
    }
}

/// Evaluates a property expression against the source document.
///
/// Any `Fn(&str, &Document) -> MappingResult<Value>` closure is a resolver.
pub trait ExpressionResolver: Send + Sync {
    fn evaluate(&self, expression: &str, source: &Document) -> MappingResult<Value>;
}

impl<F> ExpressionResolver for F
where
    F: Fn(&str, &Document) -> MappingResult<Value> + Send + Sync,
{
    fn evaluate(&self, expression: &str, source: &Document) -> MappingResult<Value> {
        self(expression, source)
    }
}

/// Resolves expressions naming a field of the source document, e.g.
/// `"address.city"`. Unknown fields evaluate to null.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldPathResolver;

impl ExpressionResolver for FieldPathResolver {
    fn evaluate(&self, expression: &str, source: &Document) -> MappingResult<Value> {
        Ok(source.get(expression.trim()).cloned().unwrap_or_default())
    }
}
