//! Common types shared by every part of the mapper.
//!
//! - [`Value`] is the store-side value held by a [`Document`](crate::document::Document).
//! - [`Object`] is the domain-side value the application works with.
//! - [`TypeRef`] describes the static type of a property or a read target.
//! - [`Convertible`] moves Rust values in and out of the [`Object`] tree.
//! - [`Temporal`] and [`Range`] are the closed shapes for dates and ranges.

mod constants;
mod convertible;
mod object;
mod range;
mod temporal;
mod type_ref;
mod util;
mod value;

pub use constants::*;
pub use convertible::*;
pub use object::*;
pub use range::*;
pub use temporal::*;
pub use type_ref::*;
pub use util::*;
pub use value::*;

pub(crate) use util::{is_embedded, split_path};
pub(crate) use value::write_json_string;
