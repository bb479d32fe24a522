//! Per-property value converters.
//!
//! A property carrying a [`PropertyValueConverter`] skips the generic
//! recursive conversion. Temporal properties with declared date formats get a
//! [`TemporalPropertyConverter`], range properties a
//! [`RangePropertyConverter`], both attached when the property descriptor is
//! built.

mod converter;
mod date_format;
mod range;
mod temporal;

pub use converter::*;
pub use date_format::*;
pub use range::*;
pub use temporal::*;
