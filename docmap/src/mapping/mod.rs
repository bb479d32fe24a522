//! The recursive entity ↔ document conversion.
//!
//! [MappingConverter] is the entry point. It is assembled by
//! [MappingConverterBuilder] from a [MappingConfig], a
//! [ConversionRegistry](crate::conversion::ConversionRegistry) and an
//! [EntityMetadataProvider](crate::metadata::EntityMetadataProvider), and
//! uses a [TypeHintMapper] to record and resolve concrete entity types.

mod builder;
mod config;
mod converter;
mod reader;
mod type_mapper;
mod warnings;
mod writer;

pub use builder::*;
pub use config::*;
pub use converter::MappingConverter;
pub use type_mapper::*;
