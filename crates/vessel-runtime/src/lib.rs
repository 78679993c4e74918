//! Vessel Runtime - configuration and composition layer for Vessel.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `VesselConfig`)
//! - Logging configuration on top of `tracing-subscriber`
//! - The `VesselRuntime` composition root: type catalog, extractor registry
//!   (built-ins minus disabled ones, plus user extractors) and a shared
//!   caching resolver
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vessel_runtime::VesselRuntime;
//!
//! let runtime = VesselRuntime::builder()
//!     .profile("production")
//!     .extractor(Arc::new(MyTupleExtractor))
//!     .build()?;
//!
//! let mut cascading = runtime.cascading(declared);
//! cascading.child_at(1)?.mark_cascading();
//! let node = cascading.build()?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, VesselConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, VesselRuntime};

pub use tracing;
pub use tracing_subscriber;

/// Logging macros, re-exported for crates that build on the runtime.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
