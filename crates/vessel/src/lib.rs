//! # Vessel
//!
//! Container-aware value extraction for validation engines.
//!
//! ## Overview
//!
//! A validation engine that cascades into `Map<String, List<Address>>` has
//! to know, per declared type argument, how to pull the elements out of a
//! concrete value. Vessel answers that question once, at metadata build
//! time where possible, and caches every answer needed at validation time.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────┐     ┌──────────────────────┐
//! │ VesselRuntime│────▶│ ExtractorResolver  │────▶│ ExtractorRegistry    │
//! │  (config)    │     │ (binder + caches)  │     │ (built-ins + user)   │
//! └──────┬───────┘     └─────────▲──────────┘     └──────────────────────┘
//!        │                       │
//!        └──▶ CascadingBuilder ──┴──▶ CascadingNode (immutable tree)
//! ```
//!
//! - **core**: type catalog, type variable binding, extractors, registry and
//!   the resolution engine
//! - **framework**: cascading metadata trees and group conversions
//! - **runtime**: configuration, logging and the composition root
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vessel::prelude::*;
//!
//! let runtime = VesselRuntime::new()?;
//!
//! // Map<String, List<Integer>>, cascading into the list elements of the map values
//! let declared = TypeRef::class(known::MAP, [
//!     TypeRef::class(known::STRING, []),
//!     TypeRef::class(known::LIST, [TypeRef::class(known::INTEGER, [])]),
//! ]);
//! let mut cascading = runtime.cascading(declared);
//! cascading.child_at(1)?.child_at(0)?.mark_cascading();
//! let node = cascading.build()?;
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `vessel.toml` (default)
//! - `yaml-config`: load `vessel.yaml`
//! - `json-log`: JSON log output

pub use vessel_core as core;
pub use vessel_framework as framework;
pub use vessel_runtime as runtime;

/// Commonly used types.
///
/// ```rust,ignore
/// use vessel::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use vessel_runtime::{RuntimeError, RuntimeResult, VesselConfig, VesselRuntime};

    // Type model
    pub use vessel_core::{RawType, SuperType, TypeCatalog, TypeParam, TypeRef, TypeVariable, known};

    // Extractors and resolution
    pub use vessel_core::{
        CollectingReceiver, ExtractorDefinition, ExtractorRegistry, ExtractorResolver, ResolutionError,
        ResolverOptions, ValueExtractor, ValueReceiver,
    };

    // Cascading metadata
    pub use vessel_framework::{CascadingBuilder, CascadingError, CascadingNode, Group};
}
