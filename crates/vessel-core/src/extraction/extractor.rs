//! The extractor capability and the receiver it reports to.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use crate::types::{RawType, TypeVariable};

// =============================================================================
// Definition
// =============================================================================

/// What an extractor handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorDefinition {
    /// The erased container type.
    pub container: RawType,
    /// The extracted type parameter or pseudo-parameter.
    pub extracted: TypeVariable,
    /// Constraints on the container apply to the extracted value by default.
    pub unwrap_by_default: bool,
    /// Type of the extracted value, when it does not depend on generics.
    pub extracted_type: Option<RawType>,
}

impl ExtractorDefinition {
    /// Creates a definition that does not unwrap by default.
    pub fn new(container: impl Into<RawType>, extracted: impl Into<TypeVariable>) -> Self {
        Self {
            container: container.into(),
            extracted: extracted.into(),
            unwrap_by_default: false,
            extracted_type: None,
        }
    }

    /// Sets the unwrap-by-default flag.
    pub fn unwrap_by_default(mut self, unwrap: bool) -> Self {
        self.unwrap_by_default = unwrap;
        self
    }

    /// Sets the static extracted type.
    pub fn extracted_type(mut self, ty: impl Into<RawType>) -> Self {
        self.extracted_type = Some(ty.into());
        self
    }
}

// =============================================================================
// Capability
// =============================================================================

/// Pulls element values out of a container value.
pub trait ValueExtractor: Send + Sync {
    /// Name identifying this extractor in logs, errors and configuration.
    fn name(&self) -> &str;

    /// Describes the container type and extracted parameter.
    fn definition(&self) -> ExtractorDefinition;

    /// Reports every element of `value` to `receiver`.
    ///
    /// Values of an unexpected shape are ignored.
    fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver);
}

/// Receives the elements reported by a [`ValueExtractor`].
pub trait ValueReceiver {
    /// A single wrapped value, such as the content of an optional.
    fn value(&mut self, node_name: &str, object: &Value);

    /// An element of an unordered iterable.
    fn iterable_value(&mut self, node_name: &str, object: &Value);

    /// An element at a position.
    fn indexed_value(&mut self, node_name: &str, index: usize, object: &Value);

    /// An element under a key.
    fn keyed_value(&mut self, node_name: &str, key: &str, object: &Value);
}

/// A shared handle to an extractor.
///
/// Built-ins live in a static table and are borrowed; user extractors are
/// reference counted.
#[derive(Clone)]
pub enum ExtractorHandle {
    Builtin(&'static dyn ValueExtractor),
    Custom(Arc<dyn ValueExtractor>),
}

impl Deref for ExtractorHandle {
    type Target = dyn ValueExtractor;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Builtin(extractor) => *extractor,
            Self::Custom(extractor) => extractor.as_ref(),
        }
    }
}

impl fmt::Debug for ExtractorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(extractor) => f.debug_tuple("Builtin").field(&extractor.name()).finish(),
            Self::Custom(extractor) => f.debug_tuple("Custom").field(&extractor.name()).finish(),
        }
    }
}

impl From<&'static dyn ValueExtractor> for ExtractorHandle {
    fn from(extractor: &'static dyn ValueExtractor) -> Self {
        Self::Builtin(extractor)
    }
}

impl From<Arc<dyn ValueExtractor>> for ExtractorHandle {
    fn from(extractor: Arc<dyn ValueExtractor>) -> Self {
        Self::Custom(extractor)
    }
}

// =============================================================================
// Collecting receiver
// =============================================================================

/// Where an extracted element sits inside its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementLocation {
    /// The single wrapped value.
    Value,
    /// An element of an unordered iterable.
    Iterable,
    /// An element at a position.
    Index(usize),
    /// An element under a key.
    Key(String),
}

/// One element reported by an extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedElement {
    pub node_name: String,
    pub location: ElementLocation,
    pub value: Value,
}

/// A [`ValueReceiver`] that keeps every element in order.
#[derive(Debug, Clone, Default)]
pub struct CollectingReceiver {
    elements: Vec<ExtractedElement>,
}

impl CollectingReceiver {
    /// Returns the collected elements.
    pub fn elements(&self) -> &[ExtractedElement] {
        &self.elements
    }

    /// Consumes the receiver and returns the collected elements.
    pub fn into_elements(self) -> Vec<ExtractedElement> {
        self.elements
    }

    fn push(&mut self, node_name: &str, location: ElementLocation, value: &Value) {
        self.elements.push(ExtractedElement {
            node_name: node_name.to_string(),
            location,
            value: value.clone(),
        });
    }
}

impl ValueReceiver for CollectingReceiver {
    fn value(&mut self, node_name: &str, object: &Value) {
        self.push(node_name, ElementLocation::Value, object);
    }

    fn iterable_value(&mut self, node_name: &str, object: &Value) {
        self.push(node_name, ElementLocation::Iterable, object);
    }

    fn indexed_value(&mut self, node_name: &str, index: usize, object: &Value) {
        self.push(node_name, ElementLocation::Index(index), object);
    }

    fn keyed_value(&mut self, node_name: &str, key: &str, object: &Value) {
        self.push(node_name, ElementLocation::Key(key.to_string()), object);
    }
}
