//! # Vessel Framework
//!
//! Cascading configuration on top of [`vessel_core`] extractor resolution.
//!
//! This layer provides:
//! - [`CascadingBuilder`] for describing, per declared element and per
//!   nested type argument, whether validation cascades and which group
//!   conversions apply
//! - the immutable [`CascadingNode`] tree consulted during validation
//! - runtime support for picking the extractor of a concrete value
//!
//! Configuration mistakes such as an index the declared type does not
//! expose are reported while the tree is built, never during validation.

pub mod cascading;
pub mod error;

pub use cascading::{CascadingBuilder, CascadingNode, Group, GroupConversions};
pub use error::{CascadingError, CascadingResult};
