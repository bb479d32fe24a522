#![recursion_limit = "128"]
//! # docmap Derive Macros
//!
//! This crate provides procedural macros for deriving docmap traits automatically.
//!
//! ## Macros
//!
//! ### `MappedEntity`
//!
//! Derives `Entity`, `MappedEntity` and `Convertible` for a struct, so it can
//! be registered with a mapping converter and nested inside other entities.
//!
//! - **Supported for**: non-generic structs with named fields
//! - **Required derives**: `Debug`, `Clone`, `Default`, `PartialEq`
//! - **Struct attribute**: `#[mapping(alias = "...", supertype = Path, ...)]`
//! - **Field attribute**: `#[mapping(field = "...", id, version, format = "...", ...)]`
//!
//! # Examples
//!
//! ```rust,ignore
//! use docmap_derive::MappedEntity;
//!
//! #[derive(Debug, Clone, Default, PartialEq, MappedEntity)]
//! #[mapping(alias = "user")]
//! pub struct User {
//!     #[mapping(id)]
//!     pub id: String,
//!     #[mapping(field = "display_name")]
//!     pub name: String,
//!     #[mapping(format = "basic_date||date")]
//!     pub born: Option<chrono::NaiveDate>,
//! }
//! ```
//!
//! ### `MappedEnum`
//!
//! Derives `Convertible` for a unit-only enum. Values are stored by variant
//! name, which `#[mapping(name = "...")]` on a variant overrides.
//!
//! ```rust,ignore
//! use docmap_derive::MappedEnum;
//!
//! #[derive(Debug, Clone, Copy, Default, PartialEq, MappedEnum)]
//! pub enum Status {
//!     #[default]
//!     Active,
//!     #[mapping(name = "INACTIVE")]
//!     Inactive,
//! }
//! ```
//!
//! ## Error Messages
//!
//! - **MappedEntity**: only structs with named fields and no generic parameters
//! - **MappedEnum**: only enums whose variants carry no data

extern crate proc_macro;
mod entity;
mod enumeration;

use crate::entity::generate_entity_for_struct;
use crate::enumeration::generate_convertible_for_enum;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives `Entity`, `MappedEntity` and `Convertible` for a struct.
///
/// # Struct Attributes
///
/// - `alias = "..."` - Type hint written instead of the type name
/// - `supertype = Path` - Declares an assignable supertype, repeatable
/// - `write_type_hint = bool` - Turns type hints off for this entity
/// - `store_id_in_source`, `store_version_in_source` - Also write the id or
///   version property as a regular field
///
/// # Field Attributes
///
/// - `field = "..."` - Name of the field in the document
/// - `id`, `version`, `seq_no`, `index_name`, `routing` - Metadata slots
/// - `read_only`, `write_only`, `skip`
/// - `store_null`, `store_empty = bool`
/// - `format = "..."` - Date formats, separated by `||`
/// - `constructor` - Passed to the factory instead of populated afterwards
/// - `expression = "..."` - Value is evaluated from the source document
/// - `scripted = "..."` - Value is taken from the named script field
/// - `declared = Type` - Declared element type of a `Box<dyn Entity>` leaf
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum or union
/// - The struct is a tuple or unit struct, or has generic parameters
/// - An attribute is unknown
#[proc_macro_derive(MappedEntity, attributes(mapping))]
pub fn derive_mapped_entity(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_entity_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => {
                let error = syn::Error::new(
                    e.span(),
                    format!(
                        "Failed to derive MappedEntity for struct '{}': {}",
                        ast.ident, e
                    ),
                );
                error.to_compile_error().into()
            }
        },
        Data::Enum(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive MappedEntity for enums. Use #[derive(MappedEnum)] for unit enums.",
            );
            error.to_compile_error().into()
        }
        Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive MappedEntity for unions. Unions are not supported.",
            );
            error.to_compile_error().into()
        }
    }
}

/// Derives `Convertible` for a unit-only enum.
///
/// Also adds an inherent `ENUM_TYPE` constant describing the variants.
///
/// # Variant Attributes
///
/// - `name = "..."` - Stored name of the variant
#[proc_macro_derive(MappedEnum, attributes(mapping))]
pub fn derive_mapped_enum(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Enum(ref data) => match generate_convertible_for_enum(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => {
                let error = syn::Error::new(
                    e.span(),
                    format!("Failed to derive MappedEnum for enum '{}': {}", ast.ident, e),
                );
                error.to_compile_error().into()
            }
        },
        _ => {
            let error = syn::Error::new_spanned(
                &ast,
                "MappedEnum can only be derived for enums.",
            );
            error.to_compile_error().into()
        }
    }
}
