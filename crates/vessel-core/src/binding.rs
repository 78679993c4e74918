//! Type parameter binding across a class hierarchy.
//!
//! For a class `C`, [`TypeVariableBinder::bindings`] computes how every
//! type parameter of every ancestor of `C` is instantiated in terms of `C`'s
//! own parameters. Given
//!
//! ```text
//! interface Base<T>
//! class Sub<X> implements Base<X>
//! ```
//!
//! the bindings of `Sub` map `Base.T` to `Sub.X`, which is what lets an
//! extractor registered for `Base.T` handle `Sub.X`.
//!
//! Two situations leave a parameter unbound:
//!
//! - the ancestor is only reached through a raw supertype (`implements Base`)
//! - the ancestor is reached on several paths with different arguments
//!   (a diamond such as `implements Base<X>, Other<X>` where `Other<Y>
//!   extends Base<List<Y>>`)
//!
//! In both cases [`TypeBindings::binds`] answers `false`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::types::{ClassId, TypeCatalog, TypeParam, TypeRef, known};

/// How one ancestor parameter is instantiated, in the frame of the bound class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Instantiated with this type.
    Type(TypeRef),
    /// Instantiated differently along different inheritance paths.
    Conflicted,
}

/// Bindings of one ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestorBinding {
    /// The ancestor is only reachable through raw usage.
    Raw,
    /// Per-parameter instantiation.
    Generic(HashMap<TypeParam, Binding>),
}

/// All ancestor bindings of one class.
#[derive(Debug, Clone)]
pub struct TypeBindings {
    class: ClassId,
    ancestors: HashMap<ClassId, AncestorBinding>,
}

impl TypeBindings {
    /// The class these bindings were computed for.
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Returns `true` if `ancestor` is the class itself or one of its supertypes.
    pub fn contains(&self, ancestor: ClassId) -> bool {
        self.ancestors.contains_key(&ancestor)
    }

    /// Iterates over all ancestors, including the class itself and `Object`.
    pub fn ancestors(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.ancestors.keys().copied()
    }

    /// Returns the raw binding entry for `ancestor`.
    pub fn get(&self, ancestor: ClassId) -> Option<&AncestorBinding> {
        self.ancestors.get(&ancestor)
    }

    /// Returns `true` if `ancestor_param` is instantiated exactly with
    /// `sub_param` of the bound class.
    pub fn binds(&self, ancestor: ClassId, sub_param: TypeParam, ancestor_param: TypeParam) -> bool {
        self.ancestor_to_sub(ancestor, ancestor_param) == Some(sub_param)
    }

    /// Returns the parameter of the bound class that instantiates
    /// `ancestor_param`, if it is instantiated with a bare parameter.
    pub fn ancestor_to_sub(&self, ancestor: ClassId, ancestor_param: TypeParam) -> Option<TypeParam> {
        match self.argument(ancestor, ancestor_param)? {
            TypeRef::Param(param) => Some(*param),
            _ => None,
        }
    }

    /// Returns the type instantiating `ancestor_param`, in the frame of the
    /// bound class.
    pub fn argument(&self, ancestor: ClassId, ancestor_param: TypeParam) -> Option<&TypeRef> {
        match self.ancestors.get(&ancestor)? {
            AncestorBinding::Generic(params) => match params.get(&ancestor_param)? {
                Binding::Type(ty) => Some(ty),
                Binding::Conflicted => None,
            },
            AncestorBinding::Raw => None,
        }
    }

    /// Returns `true` if `ancestor` is only reachable through raw usage.
    pub fn is_raw(&self, ancestor: ClassId) -> bool {
        matches!(self.ancestors.get(&ancestor), Some(AncestorBinding::Raw))
    }

    /// Returns `true` if `ancestor_param` is instantiated inconsistently.
    pub fn is_conflicted(&self, ancestor: ClassId, ancestor_param: TypeParam) -> bool {
        matches!(
            self.ancestors.get(&ancestor),
            Some(AncestorBinding::Generic(params)) if params.get(&ancestor_param) == Some(&Binding::Conflicted)
        )
    }
}

/// Computes and memoises [`TypeBindings`] per class.
#[derive(Debug)]
pub struct TypeVariableBinder {
    catalog: Arc<TypeCatalog>,
    cache: RwLock<HashMap<ClassId, Arc<TypeBindings>>>,
}

impl TypeVariableBinder {
    /// Creates a binder over `catalog`.
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the catalog this binder walks.
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    /// Returns the bindings of `class`, computing them on first use.
    pub fn bindings(&self, class: ClassId) -> Arc<TypeBindings> {
        if let Some(bindings) = self.cache.read().get(&class) {
            return Arc::clone(bindings);
        }

        let computed = Arc::new(self.compute(class));
        trace!(
            class = %self.catalog.name(class),
            ancestors = computed.ancestors.len(),
            "Computed type variable bindings"
        );

        let mut cache = self.cache.write();
        Arc::clone(cache.entry(class).or_insert(computed))
    }

    /// Number of classes with memoised bindings.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    fn compute(&self, class: ClassId) -> TypeBindings {
        let identity: HashMap<TypeParam, Binding> = (0..self.catalog.arity(class))
            .map(|index| {
                let param = TypeParam::new(class, index as u16);
                (param, Binding::Type(TypeRef::Param(param)))
            })
            .collect();

        let mut ancestors = HashMap::new();
        self.visit(class, AncestorBinding::Generic(identity), &mut ancestors);
        ancestors
            .entry(known::OBJECT)
            .or_insert_with(|| AncestorBinding::Generic(HashMap::new()));

        TypeBindings { class, ancestors }
    }

    /// Records `binding` for `current`, then walks the superclass followed by
    /// each interface.
    fn visit(&self, current: ClassId, binding: AncestorBinding, out: &mut HashMap<ClassId, AncestorBinding>) {
        for supertype in self.catalog.supertypes(current) {
            let next = match &binding {
                AncestorBinding::Raw => AncestorBinding::Raw,
                AncestorBinding::Generic(_) if supertype.args.is_empty() => {
                    if self.catalog.arity(supertype.class) == 0 {
                        AncestorBinding::Generic(HashMap::new())
                    } else {
                        AncestorBinding::Raw
                    }
                }
                AncestorBinding::Generic(chain) => AncestorBinding::Generic(
                    supertype
                        .args
                        .iter()
                        .enumerate()
                        .map(|(index, arg)| {
                            (
                                TypeParam::new(supertype.class, index as u16),
                                substitute(arg, chain),
                            )
                        })
                        .collect(),
                ),
            };
            self.visit(supertype.class, next, out);
        }

        match out.remove(&current) {
            Some(existing) => {
                out.insert(current, merge(existing, binding));
            }
            None => {
                out.insert(current, binding);
            }
        }
    }
}

/// Rewrites `ty` from the frame of an intermediate class into the frame of
/// the bound class.
fn substitute(ty: &TypeRef, chain: &HashMap<TypeParam, Binding>) -> Binding {
    match ty {
        TypeRef::Param(param) => chain.get(param).cloned().unwrap_or(Binding::Conflicted),
        TypeRef::Class { class, args } => {
            let mut substituted = Vec::with_capacity(args.len());
            for arg in args {
                match substitute(arg, chain) {
                    Binding::Type(ty) => substituted.push(ty),
                    Binding::Conflicted => return Binding::Conflicted,
                }
            }
            Binding::Type(TypeRef::Class {
                class: *class,
                args: substituted,
            })
        }
        TypeRef::Array(component) => match substitute(component, chain) {
            Binding::Type(ty) => Binding::Type(TypeRef::array_of(ty)),
            Binding::Conflicted => Binding::Conflicted,
        },
        TypeRef::Wildcard | TypeRef::Primitive(_) => Binding::Type(ty.clone()),
    }
}

/// Combines two paths reaching the same ancestor.
fn merge(existing: AncestorBinding, incoming: AncestorBinding) -> AncestorBinding {
    match (existing, incoming) {
        (AncestorBinding::Raw, AncestorBinding::Raw) => AncestorBinding::Raw,
        (AncestorBinding::Generic(mut left), AncestorBinding::Generic(right)) => {
            for (param, binding) in right {
                match left.get(&param) {
                    Some(current) if *current != binding => {
                        left.insert(param, Binding::Conflicted);
                    }
                    Some(_) => {}
                    None => {
                        left.insert(param, binding);
                    }
                }
            }
            AncestorBinding::Generic(left)
        }
        (AncestorBinding::Generic(params), AncestorBinding::Raw)
        | (AncestorBinding::Raw, AncestorBinding::Generic(params)) => AncestorBinding::Generic(
            params
                .into_keys()
                .map(|param| (param, Binding::Conflicted))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SuperType;

    fn binder(catalog: TypeCatalog) -> TypeVariableBinder {
        TypeVariableBinder::new(Arc::new(catalog))
    }

    #[test]
    fn test_identity_binding() {
        let binder = binder(TypeCatalog::standard());
        let bindings = binder.bindings(known::LIST);
        assert!(bindings.binds(known::LIST, known::LIST_E, known::LIST_E));
        assert!(bindings.contains(known::OBJECT));
    }

    #[test]
    fn test_transitive_binding() {
        let binder = binder(TypeCatalog::standard());
        let bindings = binder.bindings(known::TREE_SET);
        let tree_set_e = TypeParam::new(known::TREE_SET, 0);

        assert!(bindings.binds(known::ITERABLE, tree_set_e, known::ITERABLE_T));
        assert!(bindings.binds(known::COLLECTION, tree_set_e, known::COLLECTION_E));
        assert_eq!(bindings.ancestor_to_sub(known::SET, known::SET_E), Some(tree_set_e));
        assert!(!bindings.contains(known::LIST));
    }

    #[test]
    fn test_map_parameters_stay_apart() {
        let binder = binder(TypeCatalog::standard());
        let bindings = binder.bindings(known::TREE_MAP);
        let k = TypeParam::new(known::TREE_MAP, 0);
        let v = TypeParam::new(known::TREE_MAP, 1);

        assert!(bindings.binds(known::MAP, k, known::MAP_K));
        assert!(bindings.binds(known::MAP, v, known::MAP_V));
        assert!(!bindings.binds(known::MAP, k, known::MAP_V));
    }

    #[test]
    fn test_swapped_parameters() {
        let mut builder = TypeCatalog::builder();
        let flipped = builder.declare("Flipped", ["A", "B"]).unwrap();
        builder
            .add_interface(
                flipped,
                SuperType::new(known::MAP, [TypeRef::param(flipped, 1), TypeRef::param(flipped, 0)]),
            )
            .unwrap();
        let binder = binder(builder.build().unwrap());
        let bindings = binder.bindings(flipped);

        assert!(bindings.binds(known::MAP, TypeParam::new(flipped, 1), known::MAP_K));
        assert!(bindings.binds(known::MAP, TypeParam::new(flipped, 0), known::MAP_V));
    }

    #[test]
    fn test_concrete_argument() {
        let mut builder = TypeCatalog::builder();
        let strings = builder.declare("StringList", Vec::<String>::new()).unwrap();
        builder
            .add_interface(strings, SuperType::new(known::LIST, [TypeRef::raw(known::STRING)]))
            .unwrap();
        let binder = binder(builder.build().unwrap());
        let bindings = binder.bindings(strings);

        assert_eq!(
            bindings.argument(known::LIST, known::LIST_E),
            Some(&TypeRef::raw(known::STRING))
        );
        assert_eq!(bindings.ancestor_to_sub(known::LIST, known::LIST_E), None);
    }

    #[test]
    fn test_raw_supertype() {
        let mut builder = TypeCatalog::builder();
        let legacy = builder.declare("LegacyList", ["T"]).unwrap();
        builder.add_interface(legacy, SuperType::raw(known::LIST)).unwrap();
        let binder = binder(builder.build().unwrap());
        let bindings = binder.bindings(legacy);

        assert!(bindings.is_raw(known::LIST));
        assert!(bindings.is_raw(known::ITERABLE));
        assert!(!bindings.binds(known::LIST, TypeParam::new(legacy, 0), known::LIST_E));
    }

    #[test]
    fn test_diamond_conflict() {
        // Wrapped<Y> extends Iterable<List<Y>>
        // Odd<X> extends List<X>, Wrapped<X>
        let mut builder = TypeCatalog::builder();
        let wrapped = builder.declare("Wrapped", ["Y"]).unwrap();
        builder
            .add_interface(
                wrapped,
                SuperType::new(
                    known::ITERABLE,
                    [TypeRef::class(known::LIST, [TypeRef::param(wrapped, 0)])],
                ),
            )
            .unwrap();
        let odd = builder.declare("Odd", ["X"]).unwrap();
        builder
            .add_interface(odd, SuperType::new(known::LIST, [TypeRef::param(odd, 0)]))
            .unwrap();
        builder
            .add_interface(odd, SuperType::new(wrapped, [TypeRef::param(odd, 0)]))
            .unwrap();
        let binder = binder(builder.build().unwrap());
        let bindings = binder.bindings(odd);
        let x = TypeParam::new(odd, 0);

        assert!(bindings.binds(known::COLLECTION, x, known::COLLECTION_E));
        assert!(bindings.is_conflicted(known::ITERABLE, known::ITERABLE_T));
        assert!(!bindings.binds(known::ITERABLE, x, known::ITERABLE_T));
    }

    #[test]
    fn test_consistent_diamond() {
        // Both() extends List<X>, Set<X>: Collection.E is reached twice with X.
        let mut builder = TypeCatalog::builder();
        let both = builder.declare("Both", ["X"]).unwrap();
        builder
            .add_interface(both, SuperType::new(known::LIST, [TypeRef::param(both, 0)]))
            .unwrap();
        builder
            .add_interface(both, SuperType::new(known::SET, [TypeRef::param(both, 0)]))
            .unwrap();
        let binder = binder(builder.build().unwrap());
        let bindings = binder.bindings(both);

        assert!(bindings.binds(known::COLLECTION, TypeParam::new(both, 0), known::COLLECTION_E));
        assert!(!bindings.is_conflicted(known::COLLECTION, known::COLLECTION_E));
    }

    #[test]
    fn test_memoised() {
        let binder = binder(TypeCatalog::standard());
        let first = binder.bindings(known::ARRAY_LIST);
        let second = binder.bindings(known::ARRAY_LIST);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(binder.cached(), 1);
    }
}
