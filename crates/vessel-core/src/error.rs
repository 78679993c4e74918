//! Unified error types for the Vessel core.
//!
//! Cascading-level errors (invalid container elements, group conversion
//! problems) are defined in vessel-framework.

use thiserror::Error;

// =============================================================================
// Catalog Errors
// =============================================================================

/// Errors raised while building a [`TypeCatalog`](crate::types::TypeCatalog).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A class id does not belong to the catalog.
    #[error("unknown class id {0}")]
    UnknownClass(String),

    /// Two classes were declared with the same name.
    #[error("class '{0}' is already declared")]
    DuplicateName(String),

    /// A supertype was instantiated with the wrong number of type arguments.
    #[error("'{class}' instantiates '{supertype}' with {found} type argument(s), expected {expected}")]
    ArityMismatch {
        /// The declaring class.
        class: String,
        /// The supertype being instantiated.
        supertype: String,
        /// Number of type parameters of the supertype.
        expected: usize,
        /// Number of type arguments supplied.
        found: usize,
    },

    /// A type argument references a parameter the declaring class does not own.
    #[error("'{class}' references type parameter #{index} of '{owner}' in its supertypes")]
    ForeignTypeParameter {
        /// The declaring class.
        class: String,
        /// Owner of the referenced parameter.
        owner: String,
        /// Index of the referenced parameter.
        index: u16,
    },

    /// A class already has a superclass.
    #[error("'{0}' already declares a superclass")]
    SuperclassAlreadySet(String),

    /// The hierarchy contains a cycle.
    #[error("cyclic type hierarchy involving '{0}'")]
    CyclicHierarchy(String),
}

// =============================================================================
// Extractor Errors
// =============================================================================

/// Errors raised when an extractor definition is invalid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractorError {
    /// The container type is not known to the catalog.
    #[error("extractor '{extractor}' targets an unknown container type")]
    UnknownContainer {
        /// The extractor name.
        extractor: String,
    },

    /// The extracted type parameter is not declared by the container type.
    #[error("extractor '{extractor}' extracts a type parameter not declared by '{container}'")]
    ForeignTypeParameter {
        /// The extractor name.
        extractor: String,
        /// The container type name.
        container: String,
    },

    /// Array element extraction on a non-array type, or with the wrong kind.
    #[error("extractor '{extractor}' extracts array elements from '{container}'")]
    InvalidArrayElement {
        /// The extractor name.
        extractor: String,
        /// The container type name.
        container: String,
    },

    /// Whole-object extraction declared on an array type.
    #[error("extractor '{extractor}' cannot extract the annotated object of array '{container}'")]
    AnnotatedObjectOnArray {
        /// The extractor name.
        extractor: String,
        /// The container type name.
        container: String,
    },

    /// A static extracted type was given for a type-parameter extraction.
    #[error("extractor '{extractor}' may only declare an extracted type when extracting the annotated object")]
    ExtractedTypeOnTypeParameter {
        /// The extractor name.
        extractor: String,
    },
}

// =============================================================================
// Resolution Errors
// =============================================================================

/// Errors raised while resolving the extractor for a type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// Several maximally specific extractors apply.
    #[error(
        "unable to get the most specific value extractor for type '{target}' as several maximally specific value extractors are declared: {}",
        extractors.join(", ")
    )]
    Ambiguous {
        /// The type being resolved.
        target: String,
        /// Names of the colliding extractors, sorted.
        extractors: Vec<String>,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for catalog construction.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for extractor definition validation.
pub type ExtractorResult<T> = Result<T, ExtractorError>;

/// Result type for extractor resolution.
pub type ResolutionResult<T> = Result<T, ResolutionError>;
