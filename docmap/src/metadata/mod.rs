//! The entity model: what a mapped type looks like and where its metadata
//! comes from.
//!
//! - [`Entity`] is implemented by every mapped struct, usually through
//!   `#[derive(MappedEntity)]`.
//! - [`EntityMetadata`] and [`PropertyDescriptor`] describe how an entity is
//!   stored.
//! - [`EntityMetadataProvider`] hands metadata to the mapper, [`EntityRegistry`]
//!   is the bundled implementation.
//! - [`InstanceFactory`], [`ParameterValueProvider`] and [`ExpressionResolver`]
//!   take part in creating entities on read.

mod descriptor;
mod entity;
mod entity_metadata;
mod instance;
mod provider;

pub use descriptor::*;
pub use entity::*;
pub use entity_metadata::*;
pub use instance::*;
pub use provider::*;
