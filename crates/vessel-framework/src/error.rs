//! Error types for cascading metadata.

use thiserror::Error;
use vessel_core::ResolutionError;

/// Errors raised while building a cascading metadata tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CascadingError {
    /// A container element was requested at an index the type does not expose.
    #[error("type '{declared_type}' has no container element at index {index}")]
    InvalidContainerElement {
        /// The declared container type.
        declared_type: String,
        /// The requested index.
        index: usize,
    },

    /// No extractor handles the requested container element.
    #[error("no value extractor found for type '{declared_type}' and container element index {index}")]
    NoValueExtractor {
        /// The declared container type.
        declared_type: String,
        /// Index of the container element.
        index: usize,
    },

    /// Group conversions were configured on an element that does not cascade.
    #[error("group conversions are only allowed on cascading elements, but '{declared_type}' is not marked for cascading")]
    GroupConversionOnNonCascading {
        /// The declared type of the element.
        declared_type: String,
    },

    /// Two configurations convert the same source group to different targets.
    #[error("group '{from}' is converted to both '{first}' and '{second}'")]
    ConflictingGroupConversion {
        /// The source group.
        from: String,
        /// The target already configured.
        first: String,
        /// The conflicting target.
        second: String,
    },

    /// Extractor resolution failed.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Result type for cascading metadata construction.
pub type CascadingResult<T> = Result<T, CascadingError>;
