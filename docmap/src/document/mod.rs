//! The store-facing document and the accessor the mapper uses to reach both
//! its ordinary fields and its metadata slots.

mod accessor;
mod document;

pub use accessor::*;
pub use document::*;
