//! Type-wide conversions between domain values and store values.
//!
//! The [ConversionRegistry] holds the custom conversions which take over the
//! whole conversion of a type, and decides which types are simple. The
//! scalar functions implement the conversions between the store scalars and
//! the simple domain types.

mod defaults;
mod geo;
mod registry;
mod scalar;

pub use defaults::SeqNoPrimaryTerm;
pub(crate) use defaults::register_defaults;
pub use geo::*;
pub use registry::*;
pub use scalar::*;
