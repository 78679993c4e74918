//! # Vessel Core
//!
//! Container-aware value extraction for the Vessel validation engine.
//!
//! Given a declared type such as `Map<String, List<Integer>>` and, at
//! validation time, the concrete type of a value, this crate decides which
//! extractor unwraps the container's elements so that validation can recurse
//! into them.
//!
//! ## Building Blocks
//!
//! - **Type model**: [`TypeCatalog`], [`TypeRef`], [`RawType`] and
//!   [`TypeVariable`] describe classes, their generic parameters and their
//!   hierarchy without any runtime reflection
//! - **Binding**: [`TypeVariableBinder`] maps an ancestor's type parameters
//!   onto a subtype's own parameters
//! - **Extractors**: the [`ValueExtractor`] capability, the built-in
//!   [`BUILTIN_EXTRACTORS`] table and validated [`ExtractorDescriptor`]s
//! - **Registry**: [`ExtractorRegistry`], keyed by container type and
//!   extracted parameter, with last-write-wins overrides
//! - **Resolution**: [`ExtractorResolver`] picks the unique maximally
//!   specific extractor, or reports an ambiguity
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ TypeCatalog  │────▶│ ExtractorRegistry │────▶│ ExtractorResolver│
//! └──────────────┘     └───────────────────┘     └────────┬─────────┘
//!        │                                                │
//!        └──────────────▶ TypeVariableBinder ◀────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vessel_core::prelude::*;
//!
//! let catalog = Arc::new(TypeCatalog::standard());
//! let registry = Arc::new(ExtractorRegistry::with_builtins(&catalog, [])?);
//! let resolver = ExtractorResolver::new(catalog, registry);
//!
//! let extractor = resolver.resolve_for_all_elements(&RawType::Class(known::TREE_SET))?;
//! assert_eq!(extractor.unwrap().name(), "iterable-value");
//! ```

pub mod binding;
pub mod error;
pub mod extraction;
pub mod registry;
pub mod resolver;
pub mod types;

pub use binding::{AncestorBinding, Binding, TypeBindings, TypeVariableBinder};
pub use error::{CatalogError, CatalogResult, ExtractorError, ExtractorResult, ResolutionError, ResolutionResult};
pub use extraction::{
    BUILTIN_EXTRACTORS, CollectingReceiver, ElementLocation, ExtractedElement, ExtractorDefinition,
    ExtractorDescriptor, ExtractorHandle, ExtractorKey, ValueExtractor, ValueReceiver,
};
pub use registry::ExtractorRegistry;
pub use resolver::{ExtractorResolver, Resolved, ResolverOptions, ResolverStats};
pub use types::{
    ArrayKind, ClassId, Primitive, RawType, SuperType, TypeCatalog, TypeCatalogBuilder, TypeParam, TypeRef,
    TypeVariable, known,
};

/// Commonly used items.
pub mod prelude {
    pub use crate::extraction::{ExtractorDefinition, ValueExtractor, ValueReceiver};
    pub use crate::registry::ExtractorRegistry;
    pub use crate::resolver::{ExtractorResolver, ResolverOptions};
    pub use crate::types::{RawType, SuperType, TypeCatalog, TypeParam, TypeRef, TypeVariable, known};
}
