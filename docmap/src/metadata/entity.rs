use std::any::Any;
use std::fmt::Debug;

use crate::common::Object;
use crate::errors::MappingResult;
use crate::metadata::EntityMetadata;

/// Object-safe plumbing every [Entity] gets for free: downcasting, cloning
/// and comparing through `dyn Entity`.
///
/// There is a blanket implementation for every `Entity + Clone + PartialEq`
/// type, so implementors only ever write the [Entity] methods.
pub trait EntityBase: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_entity(&self) -> Box<dyn Entity>;
    fn eq_entity(&self, other: &dyn Entity) -> bool;
}

impl<T> EntityBase for T
where
    T: Entity + Clone + PartialEq + Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }

    fn eq_entity(&self, other: &dyn Entity) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// A mapped domain type, accessed property by property.
///
/// The reader and writer never touch struct fields directly. They ask the
/// entity for a property by name and hand values back the same way, using
/// the names declared in the entity's [EntityMetadata].
///
/// Usually derived with `#[derive(MappedEntity)]`.
pub trait Entity: EntityBase {
    /// The registered type name, the key under which the entity's metadata
    /// is found.
    fn type_name(&self) -> &str;

    fn get_property(&self, name: &str) -> MappingResult<Object>;

    fn set_property(&mut self, name: &str, value: Object) -> MappingResult<()>;
}

/// An [Entity] that knows its own metadata.
pub trait MappedEntity: Entity + Sized {
    const TYPE_NAME: &'static str;

    fn entity_metadata() -> MappingResult<EntityMetadata>;
}

impl dyn Entity {
    pub fn is<T: Entity>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Entity>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for Box<dyn Entity> {
    fn clone(&self) -> Self {
        self.clone_entity()
    }
}

impl PartialEq for Box<dyn Entity> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_entity(other.as_ref())
    }
}

// Works around rust-lang/rust#31740: without this, `==` on two
// `Box<dyn Entity>` values tries to move out of the right-hand side.
impl PartialEq<&Self> for Box<dyn Entity> {
    fn eq(&self, other: &&Self) -> bool {
        self.eq_entity(other.as_ref())
    }
}
