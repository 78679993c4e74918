//! Extractor resolution: choosing the most specific applicable extractor.
//!
//! All lookups share the same specificity pass. Candidates are reduced to
//! the set of *maximally specific* ones, where a candidate is dropped when
//! another candidate's container type is a strict subtype of its own. One
//! survivor is the answer. None means the type is not a container for the
//! request. Several survivors are an ambiguity and fail loudly.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vessel_core::prelude::*;
//!
//! let catalog = Arc::new(TypeCatalog::standard());
//! let registry = Arc::new(ExtractorRegistry::with_builtins(&catalog, [])?);
//! let resolver = ExtractorResolver::new(catalog, registry);
//!
//! let list = TypeRef::class(known::LIST, [TypeRef::raw(known::STRING)]);
//! let extractor = resolver.resolve_for_declared_parameter(&list, &known::LIST_E.into())?;
//! assert_eq!(extractor.unwrap().name(), "list-value");
//! ```
//!
//! Results are memoised in concurrent maps. Two threads racing on the same
//! key may both compute the answer, and the first insert wins.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::binding::TypeVariableBinder;
use crate::error::{ResolutionError, ResolutionResult};
use crate::extraction::{ExtractorDescriptor, ExtractorKey};
use crate::registry::ExtractorRegistry;
use crate::types::{RawType, TypeCatalog, TypeRef, TypeVariable, known};

/// Shorthand for a resolution outcome.
pub type Resolved = Option<Arc<ExtractorDescriptor>>;

// =============================================================================
// Options & Stats
// =============================================================================

/// Tuning switches for [`ExtractorResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Memoise resolution results.
    pub cache: bool,
    /// Resolve every `Map` to the map-value extractor when unwrapping all
    /// elements.
    pub legacy_map_values: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            cache: true,
            legacy_map_values: true,
        }
    }
}

/// Cache statistics of a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverStats {
    pub hits: u64,
    pub misses: u64,
    pub cached_types: usize,
    pub cached_parameters: usize,
}

impl fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {} cached types, {} cached parameters",
            self.hits, self.misses, self.cached_types, self.cached_parameters
        )
    }
}

// =============================================================================
// Cache
// =============================================================================

#[derive(Debug, Clone)]
enum CacheEntry {
    Resolved(Arc<ExtractorDescriptor>),
    NonContainer,
}

impl CacheEntry {
    fn from_resolved(resolved: &Resolved) -> Self {
        match resolved {
            Some(descriptor) => Self::Resolved(Arc::clone(descriptor)),
            None => Self::NonContainer,
        }
    }

    fn into_resolved(self) -> Resolved {
        match self {
            Self::Resolved(descriptor) => Some(descriptor),
            Self::NonContainer => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ParameterKey {
    declared: RawType,
    param: TypeVariable,
    runtime: RawType,
}

// =============================================================================
// ExtractorResolver
// =============================================================================

/// Resolves the extractor responsible for a container type.
///
/// Safe to share between threads; the caches fill lazily.
pub struct ExtractorResolver {
    catalog: Arc<TypeCatalog>,
    registry: Arc<ExtractorRegistry>,
    binder: TypeVariableBinder,
    options: ResolverOptions,
    by_runtime: DashMap<RawType, CacheEntry>,
    by_parameter: DashMap<ParameterKey, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ExtractorResolver {
    /// Creates a resolver with default options.
    pub fn new(catalog: Arc<TypeCatalog>, registry: Arc<ExtractorRegistry>) -> Self {
        Self::with_options(catalog, registry, ResolverOptions::default())
    }

    /// Creates a resolver with explicit options.
    pub fn with_options(catalog: Arc<TypeCatalog>, registry: Arc<ExtractorRegistry>, options: ResolverOptions) -> Self {
        Self {
            binder: TypeVariableBinder::new(Arc::clone(&catalog)),
            catalog,
            registry,
            options,
            by_runtime: DashMap::new(),
            by_parameter: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<ExtractorRegistry> {
        &self.registry
    }

    pub fn binder(&self) -> &TypeVariableBinder {
        &self.binder
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            cached_types: self.by_runtime.len(),
            cached_parameters: self.by_parameter.len(),
        }
    }

    /// Drops every cached result.
    pub fn clear_cache(&self) {
        self.by_runtime.clear();
        self.by_parameter.clear();
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Resolves the extractor unwrapping every element of `runtime`,
    /// regardless of the extracted parameter.
    pub fn resolve_for_all_elements(&self, runtime: &RawType) -> ResolutionResult<Resolved> {
        if let Some(cached) = self.lookup(&self.by_runtime, runtime) {
            return Ok(cached);
        }
        trace!(runtime = %self.catalog.describe_raw(runtime), "Resolving extractor for all elements");

        let resolved = if self.options.legacy_map_values
            && self.catalog.is_assignable(&RawType::Class(known::MAP), runtime)
            && let Some(map_values) = self.registry.get(&ExtractorKey::new(known::MAP, known::MAP_V))
        {
            Some(Arc::clone(map_values))
        } else {
            let maximal = self.maximally_specific(runtime);
            self.unique(|| self.catalog.describe_raw(runtime), maximal)?
        };

        self.store(&self.by_runtime, runtime.clone(), &resolved);
        Ok(resolved)
    }

    /// Resolves the extractor for `param` of the declared type.
    pub fn resolve_for_declared_parameter(&self, declared: &TypeRef, param: &TypeVariable) -> ResolutionResult<Resolved> {
        let erased = declared.erased();
        self.resolve_parameter(&erased, param, &erased, || self.catalog.describe(declared))
    }

    /// Resolves the extractor for `param` of the declared type, for a value
    /// whose concrete type is `runtime`.
    pub fn resolve_for_runtime_parameter(
        &self,
        declared: &TypeRef,
        param: &TypeVariable,
        runtime: &RawType,
    ) -> ResolutionResult<Resolved> {
        self.resolve_parameter(&declared.erased(), param, runtime, || self.catalog.describe_raw(runtime))
    }

    /// Returns the maximally specific extractors whose container type
    /// accepts `runtime`, without requiring a unique answer.
    pub fn maximally_specific(&self, runtime: &RawType) -> Vec<Arc<ExtractorDescriptor>> {
        let compliant = self
            .registry
            .all()
            .iter()
            .filter(|d| self.catalog.is_assignable(d.container(), runtime));
        self.most_specific(compliant)
    }

    /// Returns every extractor that may handle `param` of a value declared
    /// as `declared`: the maximally specific ones for the declared type
    /// itself, plus those registered for subtypes of it which a runtime
    /// value could turn out to be.
    pub fn candidates_for_cascading(&self, declared: &TypeRef, param: &TypeVariable) -> Vec<Arc<ExtractorDescriptor>> {
        let erased = declared.erased();
        let mut candidates = self.compliant(&erased, param, &erased);

        for descriptor in self.registry.all() {
            if self.catalog.is_assignable(&erased, descriptor.container())
                && self.is_parameter_compatible(&erased, param, descriptor)
                && !candidates.contains(descriptor)
            {
                candidates.push(Arc::clone(descriptor));
            }
        }
        candidates
    }

    fn resolve_parameter<F>(
        &self,
        declared: &RawType,
        param: &TypeVariable,
        runtime: &RawType,
        describe: F,
    ) -> ResolutionResult<Resolved>
    where
        F: FnOnce() -> String,
    {
        let key = ParameterKey {
            declared: declared.clone(),
            param: *param,
            runtime: runtime.clone(),
        };
        if let Some(cached) = self.lookup(&self.by_parameter, &key) {
            return Ok(cached);
        }
        trace!(
            declared = %self.catalog.describe_raw(declared),
            runtime = %self.catalog.describe_raw(runtime),
            param = ?param,
            "Resolving extractor for type parameter"
        );

        let resolved = self.unique(describe, self.compliant(declared, param, runtime))?;
        self.store(&self.by_parameter, key, &resolved);
        Ok(resolved)
    }

    /// Maximally specific extractors accepting `runtime` and compatible
    /// with `param` of `declared`.
    fn compliant(&self, declared: &RawType, param: &TypeVariable, runtime: &RawType) -> Vec<Arc<ExtractorDescriptor>> {
        let compliant = self.registry.all().iter().filter(|d| {
            self.catalog.is_assignable(d.container(), runtime) && self.is_parameter_compatible(declared, param, d)
        });
        self.most_specific(compliant)
    }

    /// Checks that the extractor's parameter and `param` denote the same
    /// declaration once bound through whichever of the two container types
    /// is the subtype.
    fn is_parameter_compatible(&self, declared: &RawType, param: &TypeVariable, descriptor: &ExtractorDescriptor) -> bool {
        let extracted = descriptor.extracted();
        if param.is_internal() || extracted.is_internal() {
            return param == extracted;
        }
        let (TypeVariable::Declared(requested), TypeVariable::Declared(extracted)) = (param, extracted) else {
            return false;
        };
        let (Some(declared_class), Some(container_class)) = (declared.as_class(), descriptor.container().as_class())
        else {
            return false;
        };

        if self.catalog.is_subclass(declared_class, container_class) {
            self.binder
                .bindings(declared_class)
                .binds(container_class, *requested, *extracted)
        } else {
            self.binder
                .bindings(container_class)
                .binds(declared_class, *extracted, *requested)
        }
    }

    /// Reduces `candidates` to the maximally specific ones, keeping
    /// candidate order.
    fn most_specific<'a, I>(&self, candidates: I) -> Vec<Arc<ExtractorDescriptor>>
    where
        I: IntoIterator<Item = &'a Arc<ExtractorDescriptor>>,
    {
        let mut maximal: Vec<Arc<ExtractorDescriptor>> = Vec::new();

        for candidate in candidates {
            let mut is_new_root = true;
            maximal.retain(|member| {
                if member.container() == candidate.container() {
                    debug!(
                        container = %self.catalog.describe_raw(candidate.container()),
                        first = %member.name(),
                        second = %candidate.name(),
                        "Extractors share a container type"
                    );
                    return true;
                }
                if self.catalog.is_assignable(member.container(), candidate.container()) {
                    return false;
                }
                if self.catalog.is_assignable(candidate.container(), member.container()) {
                    is_new_root = false;
                }
                true
            });
            if is_new_root {
                maximal.push(Arc::clone(candidate));
            }
        }
        maximal
    }

    fn unique<F>(&self, describe: F, mut maximal: Vec<Arc<ExtractorDescriptor>>) -> ResolutionResult<Resolved>
    where
        F: FnOnce() -> String,
    {
        match maximal.len() {
            0 => Ok(None),
            1 => Ok(maximal.pop()),
            _ => {
                let mut extractors: Vec<String> = maximal.iter().map(|d| d.name().to_string()).collect();
                extractors.sort();
                let target = describe();
                warn!(target_type = %target, extractors = ?extractors, "Ambiguous value extractor resolution");
                Err(ResolutionError::Ambiguous { target, extractors })
            }
        }
    }

    fn lookup<K: Eq + Hash>(&self, cache: &DashMap<K, CacheEntry>, key: &K) -> Option<Resolved> {
        if !self.options.cache {
            return None;
        }
        match cache.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone().into_resolved())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn store<K: Eq + Hash>(&self, cache: &DashMap<K, CacheEntry>, key: K, resolved: &Resolved) {
        if self.options.cache {
            cache.entry(key).or_insert_with(|| CacheEntry::from_resolved(resolved));
        }
    }
}

impl fmt::Debug for ExtractorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorResolver")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::extraction::{ExtractorDefinition, ValueExtractor, ValueReceiver};
    use crate::types::{ArrayKind, ClassId, Primitive, SuperType, TypeParam};

    struct Named(&'static str, ExtractorDefinition);

    impl ValueExtractor for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn definition(&self) -> ExtractorDefinition {
            self.1.clone()
        }

        fn extract(&self, _value: &Value, _receiver: &mut dyn ValueReceiver) {}
    }

    fn named(name: &'static str, definition: ExtractorDefinition) -> Arc<dyn ValueExtractor> {
        Arc::new(Named(name, definition))
    }

    fn resolver(catalog: TypeCatalog, user: Vec<Arc<dyn ValueExtractor>>) -> ExtractorResolver {
        let registry = ExtractorRegistry::with_builtins(&catalog, user).unwrap();
        ExtractorResolver::new(Arc::new(catalog), Arc::new(registry))
    }

    fn only(catalog: TypeCatalog, user: Vec<Arc<dyn ValueExtractor>>) -> ExtractorResolver {
        let registry = ExtractorRegistry::build(&catalog, &[], user).unwrap();
        ExtractorResolver::new(Arc::new(catalog), Arc::new(registry))
    }

    fn name(resolved: Resolved) -> Option<String> {
        resolved.map(|d| d.name().to_string())
    }

    #[test]
    fn test_builtin_resolution() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        let list = TypeRef::class(known::LIST, [TypeRef::raw(known::STRING)]);
        let resolved = resolver.resolve_for_declared_parameter(&list, &known::LIST_E.into()).unwrap();
        assert_eq!(name(resolved).as_deref(), Some("list-value"));

        let map = TypeRef::class(known::HASH_MAP, [TypeRef::raw(known::STRING), TypeRef::raw(known::INTEGER)]);
        let key = TypeParam::new(known::HASH_MAP, 0).into();
        let resolved = resolver.resolve_for_declared_parameter(&map, &key).unwrap();
        assert_eq!(name(resolved).as_deref(), Some("map-key"));
    }

    #[test]
    fn test_specificity() {
        let resolver = only(
            TypeCatalog::standard(),
            vec![
                named("collection", ExtractorDefinition::new(known::COLLECTION, known::COLLECTION_E)),
                named("list", ExtractorDefinition::new(known::LIST, known::LIST_E)),
            ],
        );

        let runtime = RawType::Class(known::ARRAY_LIST);
        assert_eq!(name(resolver.resolve_for_all_elements(&runtime).unwrap()).as_deref(), Some("list"));

        let declared = TypeRef::class(known::LIST, [TypeRef::raw(known::STRING)]);
        let resolved = resolver.resolve_for_declared_parameter(&declared, &known::LIST_E.into()).unwrap();
        assert_eq!(name(resolved).as_deref(), Some("list"));

        let maximal = resolver.maximally_specific(&runtime);
        assert_eq!(maximal.len(), 1);
    }

    #[test]
    fn test_specificity_is_order_independent() {
        let resolver = only(
            TypeCatalog::standard(),
            vec![
                named("list", ExtractorDefinition::new(known::LIST, known::LIST_E)),
                named("iterable", ExtractorDefinition::new(known::ITERABLE, known::ITERABLE_T)),
                named("collection", ExtractorDefinition::new(known::COLLECTION, known::COLLECTION_E)),
            ],
        );
        let runtime = RawType::Class(known::ARRAY_LIST);
        assert_eq!(name(resolver.resolve_for_all_elements(&runtime).unwrap()).as_deref(), Some("list"));
    }

    #[test]
    fn test_ambiguity() {
        // Both implements List<E> and Optional-like Box<E>
        let mut builder = TypeCatalog::builder();
        let boxed = builder.declare("Box", ["T"]).unwrap();
        let both = builder.declare("Both", ["E"]).unwrap();
        builder
            .add_interface(both, SuperType::new(known::LIST, [TypeRef::param(both, 0)]))
            .unwrap();
        builder
            .add_interface(both, SuperType::new(boxed, [TypeRef::param(both, 0)]))
            .unwrap();
        let catalog = builder.build().unwrap();

        let resolver = resolver(
            catalog,
            vec![named("box-value", ExtractorDefinition::new(boxed, TypeParam::new(boxed, 0)))],
        );

        let error = resolver.resolve_for_all_elements(&RawType::Class(both)).unwrap_err();
        assert_eq!(
            error,
            ResolutionError::Ambiguous {
                target: "Both".into(),
                extractors: vec!["box-value".into(), "list-value".into()],
            }
        );

        let declared = TypeRef::class(both, [TypeRef::raw(known::STRING)]);
        let param = TypeParam::new(both, 0).into();
        assert!(resolver.resolve_for_declared_parameter(&declared, &param).is_err());
        assert!(error.to_string().contains("several maximally specific"));
    }

    #[test]
    fn test_ambiguity_is_not_cached_as_success() {
        let mut builder = TypeCatalog::builder();
        let a = builder.declare("A", Vec::<String>::new()).unwrap();
        let b = builder.declare("B", Vec::<String>::new()).unwrap();
        let ab = builder.declare("AB", Vec::<String>::new()).unwrap();
        builder.add_interface(ab, SuperType::raw(a)).unwrap();
        builder.add_interface(ab, SuperType::raw(b)).unwrap();
        let resolver = only(
            builder.build().unwrap(),
            vec![
                named("a", ExtractorDefinition::new(a, TypeVariable::AnnotatedObject)),
                named("b", ExtractorDefinition::new(b, TypeVariable::AnnotatedObject)),
            ],
        );

        let runtime = RawType::Class(ab);
        let first = resolver.resolve_for_all_elements(&runtime);
        let second = resolver.resolve_for_all_elements(&runtime);
        assert!(first.is_err());
        assert_eq!(first, second);
    }

    #[test]
    fn test_override_wins() {
        let resolver = resolver(
            TypeCatalog::standard(),
            vec![named("my-list", ExtractorDefinition::new(known::LIST, known::LIST_E))],
        );
        let declared = TypeRef::class(known::ARRAY_LIST, [TypeRef::raw(known::STRING)]);
        let param = TypeParam::new(known::ARRAY_LIST, 0).into();
        let resolved = resolver.resolve_for_declared_parameter(&declared, &param).unwrap();
        assert_eq!(name(resolved).as_deref(), Some("my-list"));
    }

    #[test]
    fn test_binding_through_subtype() {
        // Base<T>, Sub<X> implements Base<X>
        let mut builder = TypeCatalog::builder();
        let base = builder.declare("Base", ["T"]).unwrap();
        let sub = builder.declare("Sub", ["X"]).unwrap();
        builder
            .add_interface(sub, SuperType::new(base, [TypeRef::param(sub, 0)]))
            .unwrap();
        let resolver = resolver(
            builder.build().unwrap(),
            vec![named("base-value", ExtractorDefinition::new(base, TypeParam::new(base, 0)))],
        );

        let declared = TypeRef::class(sub, [TypeRef::raw(known::STRING)]);
        let resolved = resolver
            .resolve_for_declared_parameter(&declared, &TypeParam::new(sub, 0).into())
            .unwrap();
        assert_eq!(name(resolved).as_deref(), Some("base-value"));
    }

    #[test]
    fn test_raw_usage_does_not_bind() {
        // Legacy<T> implements raw Base
        let mut builder = TypeCatalog::builder();
        let base = builder.declare("Base", ["T"]).unwrap();
        let legacy = builder.declare("Legacy", ["T"]).unwrap();
        builder.add_interface(legacy, SuperType::raw(base)).unwrap();
        let resolver = resolver(
            builder.build().unwrap(),
            vec![named("base-value", ExtractorDefinition::new(base, TypeParam::new(base, 0)))],
        );

        let declared = TypeRef::class(legacy, [TypeRef::raw(known::STRING)]);
        let resolved = resolver
            .resolve_for_declared_parameter(&declared, &TypeParam::new(legacy, 0).into())
            .unwrap();
        assert!(resolved.is_none());

        // All-element resolution ignores parameters, so the raw container still resolves.
        let all = resolver.resolve_for_all_elements(&RawType::Class(legacy)).unwrap();
        assert_eq!(name(all).as_deref(), Some("base-value"));
    }

    #[test]
    fn test_same_name_different_declaration() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        let declared = TypeRef::class(known::LIST, [TypeRef::raw(known::STRING)]);
        // Set's E is not List's E.
        assert!(
            resolver
                .resolve_for_declared_parameter(&declared, &known::SET_E.into())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_runtime_parameter() {
        let resolver = only(
            TypeCatalog::standard(),
            vec![
                named("iterable", ExtractorDefinition::new(known::ITERABLE, known::ITERABLE_T)),
                named("list", ExtractorDefinition::new(known::LIST, known::LIST_E)),
                named("set", ExtractorDefinition::new(known::SET, known::SET_E)),
            ],
        );
        let declared = TypeRef::class(known::COLLECTION, [TypeRef::raw(known::STRING)]);
        let param: TypeVariable = known::COLLECTION_E.into();

        let declared_only = resolver.resolve_for_declared_parameter(&declared, &param).unwrap();
        assert_eq!(name(declared_only).as_deref(), Some("iterable"));

        let tree_set = resolver
            .resolve_for_runtime_parameter(&declared, &param, &RawType::Class(known::TREE_SET))
            .unwrap();
        assert_eq!(name(tree_set).as_deref(), Some("set"));

        let array_list = resolver
            .resolve_for_runtime_parameter(&declared, &param, &RawType::Class(known::ARRAY_LIST))
            .unwrap();
        assert_eq!(name(array_list).as_deref(), Some("list"));
    }

    #[test]
    fn test_candidates_for_cascading() {
        let resolver = only(
            TypeCatalog::standard(),
            vec![
                named("iterable", ExtractorDefinition::new(known::ITERABLE, known::ITERABLE_T)),
                named("list", ExtractorDefinition::new(known::LIST, known::LIST_E)),
                named("map-value", ExtractorDefinition::new(known::MAP, known::MAP_V)),
            ],
        );
        let declared = TypeRef::class(known::COLLECTION, [TypeRef::raw(known::STRING)]);
        let names: Vec<String> = resolver
            .candidates_for_cascading(&declared, &known::COLLECTION_E.into())
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["iterable", "list"]);
    }

    #[test]
    fn test_arrays() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);

        let ints = RawType::array_of(RawType::Primitive(Primitive::Int));
        assert_eq!(name(resolver.resolve_for_all_elements(&ints).unwrap()).as_deref(), Some("int-array"));

        let strings = TypeRef::array_of(TypeRef::raw(known::STRING));
        let resolved = resolver
            .resolve_for_declared_parameter(&strings, &TypeVariable::ArrayElement(ArrayKind::Reference))
            .unwrap();
        assert_eq!(name(resolved).as_deref(), Some("object-array"));

        let nested = RawType::array_of(ints);
        assert_eq!(name(resolver.resolve_for_all_elements(&nested).unwrap()).as_deref(), Some("object-array"));
    }

    #[test]
    fn test_legacy_map_values() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        let resolved = resolver.resolve_for_all_elements(&RawType::Class(known::TREE_MAP)).unwrap();
        assert_eq!(name(resolved).as_deref(), Some("map-value"));

        let catalog = Arc::new(TypeCatalog::standard());
        let registry = Arc::new(ExtractorRegistry::with_builtins(&catalog, []).unwrap());
        let strict = ExtractorResolver::with_options(
            catalog,
            registry,
            ResolverOptions {
                legacy_map_values: false,
                ..ResolverOptions::default()
            },
        );
        assert!(strict.resolve_for_all_elements(&RawType::Class(known::TREE_MAP)).is_err());
    }

    #[test]
    fn test_primitive_optional() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        let resolved = resolver
            .resolve_for_declared_parameter(&TypeRef::raw(known::OPTIONAL_INT), &TypeVariable::AnnotatedObject)
            .unwrap()
            .unwrap();
        assert!(resolved.unwrap_by_default());
        assert_eq!(resolved.extracted_type(), Some(&RawType::Class(known::INTEGER)));
    }

    #[test]
    fn test_non_container() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        let string = RawType::Class(known::STRING);
        assert!(resolver.resolve_for_all_elements(&string).unwrap().is_none());
        assert!(resolver.resolve_for_all_elements(&string).unwrap().is_none());

        let stats = resolver.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.cached_types, 1);
        assert!(stats.to_string().starts_with("1 hits"));
    }

    #[test]
    fn test_determinism_across_cache_state() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        let declared = TypeRef::class(known::SORTED_MAP, [TypeRef::raw(known::STRING), TypeRef::raw(known::STRING)]);
        let param = TypeParam::new(known::SORTED_MAP, 1).into();

        let first = resolver.resolve_for_declared_parameter(&declared, &param).unwrap();
        resolver.clear_cache();
        let second = resolver.resolve_for_declared_parameter(&declared, &param).unwrap();
        let third = resolver.resolve_for_declared_parameter(&declared, &param).unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(name(first).as_deref(), Some("map-value"));
    }

    #[test]
    fn test_concurrent_resolution() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        let declared = TypeRef::class(known::TREE_SET, [TypeRef::raw(known::STRING)]);
        let param: TypeVariable = TypeParam::new(known::TREE_SET, 0).into();

        let results: Vec<Resolved> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| resolver.resolve_for_declared_parameter(&declared, &param).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = results[0].clone().unwrap();
        assert_eq!(first.name(), "iterable-value");
        assert!(results.iter().all(|r| r.as_ref().is_some_and(|d| Arc::ptr_eq(d, &first))));
        assert_eq!(resolver.stats().cached_parameters, 1);
    }

    #[test]
    fn test_cache_disabled() {
        let catalog = Arc::new(TypeCatalog::standard());
        let registry = Arc::new(ExtractorRegistry::with_builtins(&catalog, []).unwrap());
        let resolver = ExtractorResolver::with_options(
            catalog,
            registry,
            ResolverOptions {
                cache: false,
                ..ResolverOptions::default()
            },
        );
        resolver.resolve_for_all_elements(&RawType::Class(known::LIST)).unwrap();
        assert_eq!(resolver.stats(), ResolverStats::default());
    }

    #[test]
    fn test_unknown_class_is_not_a_container() {
        let resolver = resolver(TypeCatalog::standard(), vec![]);
        assert!(resolver.resolve_for_all_elements(&RawType::Class(ClassId(500))).unwrap().is_none());
    }
}
