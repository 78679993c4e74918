//! Structured type model for container resolution.
//!
//! Resolution never inspects live values to learn their generic shape.
//! Instead, every type is described by a small closed data model:
//!
//! - [`ClassId`] - a class or interface declared in a [`TypeCatalog`]
//! - [`TypeParam`] - the identity of one generic parameter declaration
//! - [`RawType`] - an erased runtime type (what a value *is*)
//! - [`TypeRef`] - a generic declared type (what a field or parameter *says*)
//! - [`TypeVariable`] - what an extractor extracts, including the two
//!   pseudo-parameters for "the whole object" and "array component"
//!
//! ```rust,ignore
//! use vessel_core::types::{TypeRef, known};
//!
//! // Map<String, List<Integer>>
//! let declared = TypeRef::class(
//!     known::MAP,
//!     [
//!         TypeRef::class(known::STRING, []),
//!         TypeRef::class(known::LIST, [TypeRef::class(known::INTEGER, [])]),
//!     ],
//! );
//! ```

pub mod catalog;

pub use catalog::{SuperType, TypeCatalog, TypeCatalogBuilder};

use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a class or interface registered in a [`TypeCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Returns the raw index of this class inside its catalog.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The identity of a generic parameter declaration.
///
/// Equality is declaration identity: `List<E>`'s `E` and `Set<E>`'s `E`
/// share a name but are different parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParam {
    /// The class declaring the parameter.
    pub owner: ClassId,
    /// Position of the parameter in the owner's parameter list.
    pub index: u16,
}

impl TypeParam {
    /// Creates the `index`-th parameter of `owner`.
    pub const fn new(owner: ClassId, index: u16) -> Self {
        Self { owner, index }
    }
}

// =============================================================================
// Primitive and erased types
// =============================================================================

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

impl Primitive {
    /// Returns the keyword used for this primitive in type names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
        }
    }
}

/// An erased runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RawType {
    /// A class or interface.
    Class(ClassId),
    /// A primitive value.
    Primitive(Primitive),
    /// An array with the given component type.
    Array(Box<RawType>),
}

impl RawType {
    /// Shorthand for an array of `component`.
    pub fn array_of(component: RawType) -> Self {
        Self::Array(Box::new(component))
    }

    /// Returns the class id if this is a class type.
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Self::Class(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the component type if this is an array.
    pub fn component(&self) -> Option<&RawType> {
        match self {
            Self::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Returns `true` for array types.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the element kind for array types.
    pub fn array_kind(&self) -> Option<ArrayKind> {
        self.component().map(|component| match component {
            RawType::Primitive(p) => ArrayKind::Primitive(*p),
            _ => ArrayKind::Reference,
        })
    }
}

impl From<ClassId> for RawType {
    fn from(id: ClassId) -> Self {
        Self::Class(id)
    }
}

// =============================================================================
// Declared (generic) types
// =============================================================================

/// A declared, possibly generic, type.
///
/// A `Class` with empty `args` is a raw usage: no generic information is
/// available for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A class with its actual type arguments.
    Class { class: ClassId, args: Vec<TypeRef> },
    /// A reference to a type parameter.
    Param(TypeParam),
    /// An unbounded wildcard (`?`).
    Wildcard,
    /// A primitive type.
    Primitive(Primitive),
    /// An array of the component type.
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a class type with the given arguments.
    pub fn class(class: ClassId, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::Class {
            class,
            args: args.into_iter().collect(),
        }
    }

    /// Creates a raw class type.
    pub fn raw(class: ClassId) -> Self {
        Self::Class {
            class,
            args: Vec::new(),
        }
    }

    /// Creates a reference to the `index`-th parameter of `owner`.
    pub fn param(owner: ClassId, index: u16) -> Self {
        Self::Param(TypeParam::new(owner, index))
    }

    /// Creates an array of `component`.
    pub fn array_of(component: TypeRef) -> Self {
        Self::Array(Box::new(component))
    }

    /// Erases this type to its runtime representation.
    ///
    /// Type parameters and wildcards erase to `Object`.
    pub fn erased(&self) -> RawType {
        match self {
            Self::Class { class, .. } => RawType::Class(*class),
            Self::Param(_) | Self::Wildcard => RawType::Class(known::OBJECT),
            Self::Primitive(p) => RawType::Primitive(*p),
            Self::Array(component) => RawType::Array(Box::new(component.erased())),
        }
    }

    /// Returns the actual type arguments of a class type.
    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            Self::Class { args, .. } => args,
            _ => &[],
        }
    }
}

impl From<ClassId> for TypeRef {
    fn from(id: ClassId) -> Self {
        Self::raw(id)
    }
}

// =============================================================================
// Extracted type variables
// =============================================================================

/// Element kind of an array, used to tell `int[]` elements from `Object[]`
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayKind {
    Primitive(Primitive),
    Reference,
}

/// What a value extractor extracts, or which element a cascading node
/// describes.
///
/// `AnnotatedObject` and `ArrayElement` are pseudo-parameters: arrays have no
/// declared type parameter, and single-value wrappers such as `OptionalInt`
/// unwrap the whole object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeVariable {
    /// A real type parameter of the container type.
    Declared(TypeParam),
    /// The container type itself.
    AnnotatedObject,
    /// The component of an array.
    ArrayElement(ArrayKind),
}

impl TypeVariable {
    /// Internal variables are compared as-is and never bound through a
    /// class hierarchy.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::Declared(_))
    }

    /// Returns the declared parameter, if any.
    pub fn as_declared(&self) -> Option<TypeParam> {
        match self {
            Self::Declared(param) => Some(*param),
            _ => None,
        }
    }
}

impl From<TypeParam> for TypeVariable {
    fn from(param: TypeParam) -> Self {
        Self::Declared(param)
    }
}

// =============================================================================
// Well-known types
// =============================================================================

/// Class ids of the types every [`TypeCatalog`] starts with.
///
/// The ids are fixed so that the built-in extractor table can be a plain
/// `static`.
pub mod known {
    use super::{ClassId, TypeParam};

    pub const OBJECT: ClassId = ClassId(0);
    pub const ITERABLE: ClassId = ClassId(1);
    pub const COLLECTION: ClassId = ClassId(2);
    pub const LIST: ClassId = ClassId(3);
    pub const SET: ClassId = ClassId(4);
    pub const SORTED_SET: ClassId = ClassId(5);
    pub const MAP: ClassId = ClassId(6);
    pub const SORTED_MAP: ClassId = ClassId(7);
    pub const OPTIONAL: ClassId = ClassId(8);
    pub const OPTIONAL_INT: ClassId = ClassId(9);
    pub const OPTIONAL_LONG: ClassId = ClassId(10);
    pub const OPTIONAL_DOUBLE: ClassId = ClassId(11);
    pub const ARRAY_LIST: ClassId = ClassId(12);
    pub const HASH_SET: ClassId = ClassId(13);
    pub const TREE_SET: ClassId = ClassId(14);
    pub const HASH_MAP: ClassId = ClassId(15);
    pub const TREE_MAP: ClassId = ClassId(16);
    pub const STRING: ClassId = ClassId(17);
    pub const INTEGER: ClassId = ClassId(18);
    pub const LONG: ClassId = ClassId(19);
    pub const DOUBLE: ClassId = ClassId(20);
    pub const BOOLEAN: ClassId = ClassId(21);

    /// Number of well-known classes; user classes start at this id.
    pub(crate) const COUNT: u32 = 22;

    /// `Iterable<T>`'s `T`.
    pub const ITERABLE_T: TypeParam = TypeParam::new(ITERABLE, 0);
    /// `Collection<E>`'s `E`.
    pub const COLLECTION_E: TypeParam = TypeParam::new(COLLECTION, 0);
    /// `List<E>`'s `E`.
    pub const LIST_E: TypeParam = TypeParam::new(LIST, 0);
    /// `Set<E>`'s `E`.
    pub const SET_E: TypeParam = TypeParam::new(SET, 0);
    /// `Map<K, V>`'s `K`.
    pub const MAP_K: TypeParam = TypeParam::new(MAP, 0);
    /// `Map<K, V>`'s `V`.
    pub const MAP_V: TypeParam = TypeParam::new(MAP, 1);
    /// `Optional<T>`'s `T`.
    pub const OPTIONAL_T: TypeParam = TypeParam::new(OPTIONAL, 0);
}
