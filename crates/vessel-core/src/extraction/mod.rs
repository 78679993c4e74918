//! Value extractors: how element values are pulled out of a container.
//!
//! An extractor is a small capability, [`ValueExtractor`], that describes
//! which container type and which type parameter it handles and, given a
//! value, reports each element to a [`ValueReceiver`]. Built-in and
//! user-supplied extractors are treated uniformly once wrapped in an
//! [`ExtractorDescriptor`].
//!
//! Container values are modelled with `serde_json::Value`: lists, sets and
//! arrays are JSON arrays, maps are JSON objects and an empty optional is
//! `null`.
//!
//! ```rust,ignore
//! use vessel_core::extraction::{CollectingReceiver, ValueExtractor, builtin::ListValueExtractor};
//!
//! let mut receiver = CollectingReceiver::default();
//! ListValueExtractor.extract(&serde_json::json!(["a", "b"]), &mut receiver);
//! assert_eq!(receiver.elements().len(), 2);
//! ```

pub mod builtin;
mod descriptor;
mod extractor;

pub use builtin::BUILTIN_EXTRACTORS;
pub use descriptor::{ExtractorDescriptor, ExtractorKey};
pub use extractor::{
    CollectingReceiver, ElementLocation, ExtractedElement, ExtractorDefinition, ExtractorHandle,
    ValueExtractor, ValueReceiver,
};

/// Node names reported by the built-in extractors.
pub mod node_names {
    pub const LIST_ELEMENT: &str = "<list element>";
    pub const ITERABLE_ELEMENT: &str = "<iterable element>";
    pub const MAP_KEY: &str = "<map key>";
    pub const MAP_VALUE: &str = "<map value>";
    pub const ARRAY_ELEMENT: &str = "<array element>";
    pub const OPTIONAL_VALUE: &str = "<optional value>";
}
