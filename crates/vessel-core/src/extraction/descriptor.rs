//! Validated, immutable description of one registered extractor.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

use super::{ExtractorHandle, ValueExtractor, ValueReceiver};
use crate::error::{ExtractorError, ExtractorResult};
use crate::types::{RawType, TypeCatalog, TypeVariable};

/// Registry key of an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtractorKey {
    pub container: RawType,
    pub extracted: TypeVariable,
}

impl ExtractorKey {
    pub fn new(container: impl Into<RawType>, extracted: impl Into<TypeVariable>) -> Self {
        Self {
            container: container.into(),
            extracted: extracted.into(),
        }
    }
}

/// An extractor together with its validated definition.
///
/// Equality and hashing only consider the [`ExtractorKey`].
#[derive(Clone)]
pub struct ExtractorDescriptor {
    key: ExtractorKey,
    unwrap_by_default: bool,
    extracted_type: Option<RawType>,
    extractor: ExtractorHandle,
}

impl ExtractorDescriptor {
    /// Validates the extractor's definition against `catalog`.
    pub fn new(extractor: impl Into<ExtractorHandle>, catalog: &TypeCatalog) -> ExtractorResult<Self> {
        let extractor = extractor.into();
        let definition = extractor.definition();
        let name = extractor.name().to_string();

        if !is_known(&definition.container, catalog) {
            return Err(ExtractorError::UnknownContainer { extractor: name });
        }
        let container_name = || catalog.describe_raw(&definition.container);

        match definition.extracted {
            TypeVariable::Declared(param) => {
                let owns = definition.container.as_class() == Some(param.owner)
                    && (param.index as usize) < catalog.arity(param.owner);
                if !owns {
                    return Err(ExtractorError::ForeignTypeParameter {
                        extractor: name,
                        container: container_name(),
                    });
                }
            }
            TypeVariable::ArrayElement(kind) => {
                if definition.container.array_kind() != Some(kind) {
                    return Err(ExtractorError::InvalidArrayElement {
                        extractor: name,
                        container: container_name(),
                    });
                }
            }
            TypeVariable::AnnotatedObject => {
                if definition.container.is_array() {
                    return Err(ExtractorError::AnnotatedObjectOnArray {
                        extractor: name,
                        container: container_name(),
                    });
                }
            }
        }

        if definition.extracted_type.is_some() && definition.extracted != TypeVariable::AnnotatedObject {
            return Err(ExtractorError::ExtractedTypeOnTypeParameter { extractor: name });
        }

        Ok(Self {
            key: ExtractorKey {
                container: definition.container,
                extracted: definition.extracted,
            },
            unwrap_by_default: definition.unwrap_by_default,
            extracted_type: definition.extracted_type,
            extractor,
        })
    }

    pub fn key(&self) -> &ExtractorKey {
        &self.key
    }

    /// The erased container type.
    pub fn container(&self) -> &RawType {
        &self.key.container
    }

    /// The extracted type parameter or pseudo-parameter.
    pub fn extracted(&self) -> &TypeVariable {
        &self.key.extracted
    }

    pub fn unwrap_by_default(&self) -> bool {
        self.unwrap_by_default
    }

    pub fn extracted_type(&self) -> Option<&RawType> {
        self.extracted_type.as_ref()
    }

    pub fn name(&self) -> &str {
        self.extractor.name()
    }

    /// Returns `true` for extractors from the built-in table.
    pub fn is_builtin(&self) -> bool {
        matches!(self.extractor, ExtractorHandle::Builtin(_))
    }

    pub fn extractor(&self) -> &dyn ValueExtractor {
        &*self.extractor
    }

    /// Runs the extractor on `value`.
    pub fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
        self.extractor.extract(value, receiver);
    }
}

fn is_known(ty: &RawType, catalog: &TypeCatalog) -> bool {
    match ty {
        RawType::Class(id) => catalog.contains(*id),
        RawType::Primitive(_) => false,
        RawType::Array(component) => match component.as_ref() {
            RawType::Primitive(_) => true,
            other => is_known(other, catalog),
        },
    }
}

impl PartialEq for ExtractorDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ExtractorDescriptor {}

impl Hash for ExtractorDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for ExtractorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorDescriptor")
            .field("name", &self.name())
            .field("key", &self.key)
            .field("unwrap_by_default", &self.unwrap_by_default)
            .field("extracted_type", &self.extracted_type)
            .finish()
    }
}
