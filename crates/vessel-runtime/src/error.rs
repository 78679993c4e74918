//! Runtime error types.

use thiserror::Error;
use vessel_core::{CatalogError, ExtractorError};
use vessel_framework::CascadingError;

use crate::config::ConfigError;

/// Errors that can occur while assembling or using a runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The type catalog is inconsistent.
    #[error("Type catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A user extractor has an invalid definition.
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// A cascading tree could not be built.
    #[error("Cascading error: {0}")]
    Cascading(#[from] CascadingError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
