//! Cascading metadata: which parts of a declared value validation recurses
//! into, and with which groups.
//!
//! A tree is built per declared element (field, parameter or return value).
//! The root stands for the element itself; each child stands for one type
//! argument of its parent's declared type, so `Map<String, List<Integer>>`
//! can cascade into the map values and, one level further, into the list
//! elements:
//!
//! ```text
//! Map<String, List<Integer>>          (root, annotated object)
//! └── [1] List<Integer>               (map value)
//!     └── [0] Integer                 (list element)
//! ```

mod builder;
mod group;
mod node;

pub use builder::CascadingBuilder;
pub use group::{Group, GroupConversions};
pub use node::CascadingNode;
