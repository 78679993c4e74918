//! Configuration module for the Vessel runtime.
//!
//! This module provides layered configuration loading (files, environment,
//! programmatic overrides) and validation for logging, extractor resolution
//! and cascading defaults.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    CascadingConfig, ExtractorsConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig,
    VesselConfig,
};
pub use validation::validate_config;
