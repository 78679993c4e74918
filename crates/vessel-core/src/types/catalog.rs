//! The class hierarchy every resolution runs against.
//!
//! A [`TypeCatalog`] is built once, validated, and then shared read-only.
//! It starts with the well-known types from [`known`](super::known); user
//! containers are declared on top of them:
//!
//! ```rust,ignore
//! use vessel_core::types::{SuperType, TypeCatalog, TypeRef, known};
//!
//! let mut builder = TypeCatalog::builder();
//! // interface SortedList<E> extends List<E>
//! let sorted_list = builder.declare("SortedList", ["E"])?;
//! builder.add_interface(sorted_list, SuperType::new(known::LIST, [TypeRef::param(sorted_list, 0)]))?;
//! let catalog = builder.build()?;
//!
//! assert!(catalog.is_subclass(sorted_list, known::COLLECTION));
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{ClassId, RawType, TypeParam, TypeRef, known};
use crate::error::{CatalogError, CatalogResult};

/// An instantiated supertype: `List<E>` in `SortedList<E> extends List<E>`.
///
/// Empty `args` declares a raw supertype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuperType {
    /// The supertype class.
    pub class: ClassId,
    /// The actual type arguments.
    pub args: Vec<TypeRef>,
}

impl SuperType {
    /// Creates a parameterized supertype.
    pub fn new(class: ClassId, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            class,
            args: args.into_iter().collect(),
        }
    }

    /// Creates a raw supertype.
    pub fn raw(class: ClassId) -> Self {
        Self {
            class,
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct ClassDef {
    name: String,
    params: Vec<String>,
    superclass: Option<SuperType>,
    interfaces: Vec<SuperType>,
}

// =============================================================================
// TypeCatalog
// =============================================================================

/// An immutable, validated class hierarchy.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
    /// Reflexive, transitive supertypes of every class (always including `Object`).
    ancestors: Vec<HashSet<ClassId>>,
}

impl TypeCatalog {
    /// Creates a builder pre-populated with the well-known types.
    pub fn builder() -> TypeCatalogBuilder {
        TypeCatalogBuilder::new()
    }

    /// Returns a catalog containing only the well-known types.
    pub fn standard() -> Self {
        TypeCatalogBuilder::new().freeze()
    }

    /// Returns the number of classes in the catalog.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the catalog has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns `true` if `id` belongs to this catalog.
    pub fn contains(&self, id: ClassId) -> bool {
        id.index() < self.classes.len()
    }

    /// Looks up a class by name.
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Returns the simple name of a class.
    pub fn name(&self, id: ClassId) -> &str {
        self.classes
            .get(id.index())
            .map(|c| c.name.as_str())
            .unwrap_or("<unknown>")
    }

    /// Returns the declared type parameter names of a class.
    pub fn type_parameters(&self, id: ClassId) -> &[String] {
        self.classes
            .get(id.index())
            .map(|c| c.params.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the number of type parameters of a class.
    pub fn arity(&self, id: ClassId) -> usize {
        self.type_parameters(id).len()
    }

    /// Looks up a type parameter of `id` by name.
    pub fn param(&self, id: ClassId, name: &str) -> Option<TypeParam> {
        self.type_parameters(id)
            .iter()
            .position(|p| p == name)
            .map(|index| TypeParam::new(id, index as u16))
    }

    /// Returns the superclass of `id`, if declared explicitly.
    pub fn superclass(&self, id: ClassId) -> Option<&SuperType> {
        self.classes
            .get(id.index())
            .and_then(|c| c.superclass.as_ref())
    }

    /// Returns the directly implemented interfaces of `id`.
    pub fn interfaces(&self, id: ClassId) -> &[SuperType] {
        self.classes
            .get(id.index())
            .map(|c| c.interfaces.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the direct supertypes of `id`: superclass first, then interfaces.
    pub fn supertypes(&self, id: ClassId) -> impl Iterator<Item = &SuperType> {
        self.superclass(id)
            .into_iter()
            .chain(self.interfaces(id).iter())
    }

    /// Returns `true` if `sub` is `sup` or one of its subtypes.
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        self.ancestors
            .get(sub.index())
            .is_some_and(|ancestors| ancestors.contains(&sup))
    }

    /// Returns `true` if a value of type `from` can be assigned to `to`.
    ///
    /// Every reference type is assignable to `Object`, reference arrays are
    /// covariant, and primitive arrays are only assignable to themselves.
    pub fn is_assignable(&self, to: &RawType, from: &RawType) -> bool {
        match (to, from) {
            (RawType::Class(t), RawType::Array(_)) => *t == known::OBJECT,
            (RawType::Class(t), RawType::Class(f)) => self.is_subclass(*f, *t),
            (RawType::Primitive(t), RawType::Primitive(f)) => t == f,
            (RawType::Array(t), RawType::Array(f)) => match (t.as_ref(), f.as_ref()) {
                (RawType::Primitive(a), RawType::Primitive(b)) => a == b,
                (RawType::Primitive(_), _) | (_, RawType::Primitive(_)) => false,
                (t, f) => self.is_assignable(t, f),
            },
            _ => false,
        }
    }

    /// Renders a declared type, e.g. `Map<String, List<Integer>>`.
    pub fn describe(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Class { class, args } if args.is_empty() => self.name(*class).to_string(),
            TypeRef::Class { class, args } => {
                let args: Vec<String> = args.iter().map(|a| self.describe(a)).collect();
                format!("{}<{}>", self.name(*class), args.join(", "))
            }
            TypeRef::Param(param) => self
                .type_parameters(param.owner)
                .get(param.index as usize)
                .cloned()
                .unwrap_or_else(|| format!("{}#{}", self.name(param.owner), param.index)),
            TypeRef::Wildcard => "?".to_string(),
            TypeRef::Primitive(p) => p.as_str().to_string(),
            TypeRef::Array(component) => format!("{}[]", self.describe(component)),
        }
    }

    /// Renders an erased type, e.g. `int[]`.
    pub fn describe_raw(&self, ty: &RawType) -> String {
        match ty {
            RawType::Class(id) => self.name(*id).to_string(),
            RawType::Primitive(p) => p.as_str().to_string(),
            RawType::Array(component) => format!("{}[]", self.describe_raw(component)),
        }
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// TypeCatalogBuilder
// =============================================================================

/// Builder for a [`TypeCatalog`].
#[derive(Debug, Clone)]
pub struct TypeCatalogBuilder {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
}

impl Default for TypeCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCatalogBuilder {
    /// Creates a builder containing the well-known types.
    pub fn new() -> Self {
        let mut builder = Self {
            classes: Vec::with_capacity(known::COUNT as usize),
            by_name: HashMap::new(),
        };
        builder.register_well_known();
        builder
    }

    /// Declares a new class with the given type parameter names.
    pub fn declare<I, S>(&mut self, name: impl Into<String>, params: I) -> CatalogResult<ClassId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(CatalogError::DuplicateName(name));
        }
        Ok(self.push(&name, params, None, Vec::new()))
    }

    /// Sets the superclass of `id`.
    pub fn set_superclass(&mut self, id: ClassId, superclass: SuperType) -> CatalogResult<&mut Self> {
        self.check_known(superclass.class)?;
        let class = self.class_mut(id)?;
        if class.superclass.is_some() {
            return Err(CatalogError::SuperclassAlreadySet(class.name.clone()));
        }
        class.superclass = Some(superclass);
        Ok(self)
    }

    /// Adds an implemented interface to `id`.
    pub fn add_interface(&mut self, id: ClassId, interface: SuperType) -> CatalogResult<&mut Self> {
        self.check_known(interface.class)?;
        self.class_mut(id)?.interfaces.push(interface);
        Ok(self)
    }

    /// Validates the hierarchy and freezes it.
    pub fn build(self) -> CatalogResult<TypeCatalog> {
        self.validate()?;
        let catalog = self.freeze();
        debug!(classes = catalog.len(), "Type catalog built");
        Ok(catalog)
    }

    fn validate(&self) -> CatalogResult<()> {
        for (index, class) in self.classes.iter().enumerate() {
            let id = ClassId(index as u32);
            for supertype in class.superclass.iter().chain(class.interfaces.iter()) {
                let target = &self.classes[supertype.class.index()];
                if !supertype.args.is_empty() && supertype.args.len() != target.params.len() {
                    return Err(CatalogError::ArityMismatch {
                        class: class.name.clone(),
                        supertype: target.name.clone(),
                        expected: target.params.len(),
                        found: supertype.args.len(),
                    });
                }
                for arg in &supertype.args {
                    self.check_argument(id, arg)?;
                }
            }
        }
        self.check_acyclic()
    }

    /// Type arguments of a supertype may only mention the declaring class's
    /// own parameters.
    fn check_argument(&self, id: ClassId, arg: &TypeRef) -> CatalogResult<()> {
        match arg {
            TypeRef::Param(param) => {
                let class = &self.classes[id.index()];
                if param.owner != id || param.index as usize >= class.params.len() {
                    return Err(CatalogError::ForeignTypeParameter {
                        class: class.name.clone(),
                        owner: self.name_of(param.owner),
                        index: param.index,
                    });
                }
                Ok(())
            }
            TypeRef::Class { class, args } => {
                self.check_known(*class)?;
                args.iter().try_for_each(|a| self.check_argument(id, a))
            }
            TypeRef::Array(component) => self.check_argument(id, component),
            TypeRef::Wildcard | TypeRef::Primitive(_) => Ok(()),
        }
    }

    fn check_acyclic(&self) -> CatalogResult<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        fn visit(builder: &TypeCatalogBuilder, id: usize, marks: &mut [Mark]) -> CatalogResult<()> {
            match marks[id] {
                Mark::Done => return Ok(()),
                Mark::InProgress => {
                    return Err(CatalogError::CyclicHierarchy(builder.classes[id].name.clone()));
                }
                Mark::Unvisited => {}
            }
            marks[id] = Mark::InProgress;
            let class = &builder.classes[id];
            for supertype in class.superclass.iter().chain(class.interfaces.iter()) {
                visit(builder, supertype.class.index(), marks)?;
            }
            marks[id] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.classes.len()];
        (0..self.classes.len()).try_for_each(|id| visit(self, id, &mut marks))
    }

    /// Computes ancestor sets. The hierarchy must be acyclic.
    fn freeze(self) -> TypeCatalog {
        fn collect(classes: &[ClassDef], id: ClassId, memo: &mut Vec<Option<HashSet<ClassId>>>) -> HashSet<ClassId> {
            if let Some(done) = &memo[id.index()] {
                return done.clone();
            }
            let mut ancestors = HashSet::from([id, known::OBJECT]);
            let class = &classes[id.index()];
            for supertype in class.superclass.iter().chain(class.interfaces.iter()) {
                ancestors.extend(collect(classes, supertype.class, memo));
            }
            memo[id.index()] = Some(ancestors.clone());
            ancestors
        }

        let mut memo = vec![None; self.classes.len()];
        let ancestors = (0..self.classes.len())
            .map(|index| collect(&self.classes, ClassId(index as u32), &mut memo))
            .collect();

        TypeCatalog {
            classes: self.classes,
            by_name: self.by_name,
            ancestors,
        }
    }

    fn push<I, S>(&mut self, name: &str, params: I, superclass: Option<SuperType>, interfaces: Vec<SuperType>) -> ClassId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassDef {
            name: name.to_string(),
            params: params.into_iter().map(Into::into).collect(),
            superclass,
            interfaces,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    fn class_mut(&mut self, id: ClassId) -> CatalogResult<&mut ClassDef> {
        self.classes
            .get_mut(id.index())
            .ok_or_else(|| CatalogError::UnknownClass(id.to_string()))
    }

    fn check_known(&self, id: ClassId) -> CatalogResult<()> {
        if id.index() < self.classes.len() {
            Ok(())
        } else {
            Err(CatalogError::UnknownClass(id.to_string()))
        }
    }

    fn name_of(&self, id: ClassId) -> String {
        self.classes
            .get(id.index())
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Registers the well-known types in the order of their fixed ids.
    fn register_well_known(&mut self) {
        const NONE: [&str; 0] = [];
        let e = |owner| TypeRef::param(owner, 0);
        let kv = |owner| [TypeRef::param(owner, 0), TypeRef::param(owner, 1)];

        self.push("Object", NONE, None, vec![]);
        self.push("Iterable", ["T"], None, vec![]);
        self.push("Collection", ["E"], None, vec![SuperType::new(known::ITERABLE, [e(known::COLLECTION)])]);
        self.push("List", ["E"], None, vec![SuperType::new(known::COLLECTION, [e(known::LIST)])]);
        self.push("Set", ["E"], None, vec![SuperType::new(known::COLLECTION, [e(known::SET)])]);
        self.push("SortedSet", ["E"], None, vec![SuperType::new(known::SET, [e(known::SORTED_SET)])]);
        self.push("Map", ["K", "V"], None, vec![]);
        self.push("SortedMap", ["K", "V"], None, vec![SuperType::new(known::MAP, kv(known::SORTED_MAP))]);
        self.push("Optional", ["T"], None, vec![]);
        self.push("OptionalInt", NONE, None, vec![]);
        self.push("OptionalLong", NONE, None, vec![]);
        self.push("OptionalDouble", NONE, None, vec![]);
        self.push("ArrayList", ["E"], None, vec![SuperType::new(known::LIST, [e(known::ARRAY_LIST)])]);
        self.push("HashSet", ["E"], None, vec![SuperType::new(known::SET, [e(known::HASH_SET)])]);
        self.push("TreeSet", ["E"], None, vec![SuperType::new(known::SORTED_SET, [e(known::TREE_SET)])]);
        self.push("HashMap", ["K", "V"], None, vec![SuperType::new(known::MAP, kv(known::HASH_MAP))]);
        self.push("TreeMap", ["K", "V"], None, vec![SuperType::new(known::SORTED_MAP, kv(known::TREE_MAP))]);
        self.push("String", NONE, None, vec![]);
        self.push("Integer", NONE, None, vec![]);
        self.push("Long", NONE, None, vec![]);
        self.push("Double", NONE, None, vec![]);
        self.push("Boolean", NONE, None, vec![]);

        debug_assert_eq!(self.classes.len(), known::COUNT as usize);
    }
}
