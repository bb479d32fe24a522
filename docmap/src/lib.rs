#![allow(
    dead_code,
    unused_imports,
    clippy::approx_constant,
)]
//! # docmap - Entity to Document Mapping
//!
//! docmap converts typed domain objects into schemaless documents for a
//! document store and back again. The document keeps enough type information
//! to restore polymorphic object graphs.
//!
//! ## Key Features
//!
//! - **Type hints**: the concrete entity type is recorded under a reserved key
//!   (`_class` by default) whenever it differs from the declared type
//! - **Custom conversions**: a registry of type-wide converters, with bundled
//!   geo point, GeoJSON, UUID and decimal conversions
//! - **Property converters**: per-field date formats and range encodings
//! - **Metadata slots**: id, version, sequence number, routing and index name
//!   live beside the fields of a document
//! - **Derive macros**: `#[derive(MappedEntity)]` and `#[derive(MappedEnum)]`
//!   from the `docmap_derive` crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docmap::mapping::MappingConverter;
//! use docmap_derive::MappedEntity;
//!
//! #[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
//! struct Book {
//!     #[mapping(id)]
//!     isbn: String,
//!     title: String,
//!     #[mapping(format = "date")]
//!     published: Option<chrono::NaiveDate>,
//! }
//!
//! let converter = MappingConverter::builder().register::<Book>().build()?;
//! let document = converter.write_entity(&book)?;
//! let restored: Book = converter.read_entity(&document)?;
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Store values, domain objects, static types and utilities
//! - [`conversion`] - Conversion registry, scalar conversions and bundled converters
//! - [`document`] - The generic document and its value accessor
//! - [`errors`] - Error types and result definitions
//! - [`mapping`] - The converter facade, type hint mapper, reader and writer
//! - [`metadata`] - Entity and property metadata and the collaborators of the reader
//! - [`property`] - Per-property value converters and date formats

pub mod common;
pub mod conversion;
pub mod document;
pub mod errors;
pub mod mapping;
pub mod metadata;
pub mod property;
