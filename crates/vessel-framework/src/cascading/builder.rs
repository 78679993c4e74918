//! Builder for [`CascadingNode`] trees.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tracing::debug;
use vessel_core::{ClassId, ExtractorDescriptor, ExtractorResolver, RawType, TypeParam, TypeRef, TypeVariable, known};

use super::group::{Group, GroupConversions, check_conversions};
use super::node::CascadingNode;
use crate::error::{CascadingError, CascadingResult};

/// Containers whose elements a cascading root implicitly cascades into:
/// reference type and the index of the cascaded parameter.
const LEGACY_CONTAINERS: [(ClassId, usize); 4] = [
    (known::MAP, 1),
    (known::LIST, 0),
    (known::ITERABLE, 0),
    (known::OPTIONAL, 0),
];

/// Collects the cascading configuration of one declared element.
///
/// Every nested element is checked against the resolver as soon as it is
/// requested, so a misconfigured index fails here rather than during
/// validation.
///
/// ```rust,ignore
/// // Map<String, List<Integer>>, cascading into the map values and the list elements
/// let mut builder = CascadingBuilder::new(&resolver, declared);
/// builder.child_at(1)?.mark_cascading().child_at(0)?.mark_cascading();
/// let node = builder.build()?;
///
/// assert!(node.child_at(1).unwrap().child_at(0).unwrap().is_marked_cascading());
/// ```
#[derive(Debug)]
pub struct CascadingBuilder<'r> {
    resolver: &'r ExtractorResolver,
    declared: TypeRef,
    enclosing: Option<TypeRef>,
    variable: TypeVariable,
    index: Option<usize>,
    cascading: bool,
    group_conversions: GroupConversions,
    children: BTreeMap<TypeVariable, CascadingBuilder<'r>>,
    extractor: Option<Arc<ExtractorDescriptor>>,
    legacy_container_cascading: bool,
}

impl<'r> CascadingBuilder<'r> {
    /// Creates a builder for an element declared as `declared`.
    pub fn new(resolver: &'r ExtractorResolver, declared: TypeRef) -> Self {
        Self {
            resolver,
            declared,
            enclosing: None,
            variable: TypeVariable::AnnotatedObject,
            index: None,
            cascading: false,
            group_conversions: GroupConversions::new(),
            children: BTreeMap::new(),
            extractor: None,
            legacy_container_cascading: true,
        }
    }

    fn element(
        resolver: &'r ExtractorResolver,
        declared: TypeRef,
        enclosing: TypeRef,
        variable: TypeVariable,
        index: usize,
    ) -> Self {
        Self {
            enclosing: Some(enclosing),
            variable,
            index: Some(index),
            ..Self::new(resolver, declared)
        }
    }

    pub fn declared_type(&self) -> &TypeRef {
        &self.declared
    }

    /// Marks the element for cascaded validation.
    pub fn mark_cascading(&mut self) -> &mut Self {
        self.cascading = true;
        self
    }

    /// Converts `from` to `to` when cascading, replacing any earlier target
    /// for `from`.
    pub fn add_group_conversion(&mut self, from: impl Into<Group>, to: impl Into<Group>) -> &mut Self {
        self.group_conversions.insert(from.into(), to.into());
        self
    }

    /// Enables or disables implicit cascading into the elements of
    /// well-known containers. Only meaningful on the root.
    pub fn legacy_container_cascading(&mut self, enabled: bool) -> &mut Self {
        self.legacy_container_cascading = enabled;
        self
    }

    /// Returns the builder of the container element at `index`, creating it
    /// on first access.
    pub fn child_at(&mut self, index: usize) -> CascadingResult<&mut CascadingBuilder<'r>> {
        let (variable, child_type) = self.element_at(index)?;
        let resolver = self.resolver;
        let declared = &self.declared;

        match self.children.entry(variable) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let extractor = resolver
                    .resolve_for_declared_parameter(declared, &variable)?
                    .ok_or_else(|| CascadingError::NoValueExtractor {
                        declared_type: resolver.catalog().describe(declared),
                        index,
                    })?;

                let mut child = Self::element(resolver, child_type, declared.clone(), variable, index);
                child.extractor = Some(extractor);
                Ok(entry.insert(child))
            }
        }
    }

    /// Merges another configuration of the same element into this one.
    ///
    /// Cascading flags are OR-combined and nested elements are merged
    /// recursively. A source group converted to two different targets is an
    /// error, reported before anything is changed.
    pub fn merge(&mut self, other: CascadingBuilder<'r>) -> CascadingResult<&mut Self> {
        self.check_merge(&other)?;
        self.merge_checked(other);
        Ok(self)
    }

    fn check_merge(&self, other: &CascadingBuilder<'r>) -> CascadingResult<()> {
        check_conversions(&self.group_conversions, &other.group_conversions)?;
        for (variable, child) in &other.children {
            if let Some(existing) = self.children.get(variable) {
                existing.check_merge(child)?;
            }
        }
        Ok(())
    }

    fn merge_checked(&mut self, other: CascadingBuilder<'r>) {
        self.cascading |= other.cascading;
        self.group_conversions.extend(other.group_conversions);

        for (variable, child) in other.children {
            match self.children.entry(variable) {
                Entry::Occupied(mut entry) => entry.get_mut().merge_checked(child),
                Entry::Vacant(entry) => {
                    entry.insert(child);
                }
            }
        }
    }

    /// Validates the configuration and freezes it.
    pub fn build(mut self) -> CascadingResult<CascadingNode> {
        if self.enclosing.is_none() && self.cascading && self.legacy_container_cascading {
            self.add_legacy_container_element()?;
        }
        self.finish()
    }

    fn finish(self) -> CascadingResult<CascadingNode> {
        if !self.cascading && !self.group_conversions.is_empty() {
            return Err(CascadingError::GroupConversionOnNonCascading {
                declared_type: self.describe(),
            });
        }

        let resolver = self.resolver;
        let mut declared_container_class = self.container_class();

        let mut children = BTreeMap::new();
        let mut has_container_elements_marked_for_cascading = false;
        let mut has_group_conversions = !self.group_conversions.is_empty();
        for (variable, child) in self.children {
            let child = child.finish()?;
            has_container_elements_marked_for_cascading |= child.is_marked_for_cascading_on_object_or_container_elements();
            has_group_conversions |= child.has_group_conversions_on_object_or_container_elements();
            children.insert(variable, child);
        }
        // A plain root cascading implicitly into a well-known supertype is
        // a container of that supertype.
        if declared_container_class.is_none() {
            declared_container_class = children.values().find_map(|child| child.enclosing_type.clone());
        }
        debug_assert!(children.is_empty() || declared_container_class.is_some());

        let mut candidates = Vec::new();
        if let Some(enclosing) = &self.enclosing
            && (self.cascading || has_container_elements_marked_for_cascading)
        {
            candidates = resolver.candidates_for_cascading(enclosing, &self.variable);
            if candidates.is_empty() {
                return Err(CascadingError::NoValueExtractor {
                    declared_type: resolver.catalog().describe(enclosing),
                    index: self.index.unwrap_or_default(),
                });
            }
        }

        Ok(CascadingNode {
            declared_type: self.declared,
            declared_container_class,
            enclosing_type: self.enclosing,
            variable: self.variable,
            index: self.index,
            cascading: self.cascading,
            group_conversions: self.group_conversions,
            children,
            extractor: self.extractor,
            candidates,
            has_container_elements_marked_for_cascading,
            has_group_conversions_on_object_or_container_elements: has_group_conversions,
        })
    }

    /// The type variable and declared type of the element at `index`.
    fn element_at(&self, index: usize) -> CascadingResult<(TypeVariable, TypeRef)> {
        let catalog = self.resolver.catalog();
        let element = match &self.declared {
            TypeRef::Class { class, args } if index < catalog.arity(*class) => Some((
                TypeVariable::Declared(TypeParam::new(*class, index as u16)),
                args.get(index).cloned().unwrap_or(TypeRef::Wildcard),
            )),
            TypeRef::Array(component) if index == 0 => self
                .declared
                .erased()
                .array_kind()
                .map(|kind| (TypeVariable::ArrayElement(kind), component.as_ref().clone())),
            _ => None,
        };

        element.ok_or_else(|| CascadingError::InvalidContainerElement {
            declared_type: self.describe(),
            index,
        })
    }

    /// Adds the implicit element cascading of a well-known container root.
    fn add_legacy_container_element(&mut self) -> CascadingResult<()> {
        let resolver = self.resolver;
        let catalog = resolver.catalog();
        let erased = self.declared.erased();

        let (enclosing, variable, child_type, index) = if let Some(kind) = erased.array_kind() {
            let component = match &self.declared {
                TypeRef::Array(component) => component.as_ref().clone(),
                _ => TypeRef::Wildcard,
            };
            (self.declared.clone(), TypeVariable::ArrayElement(kind), component, 0)
        } else {
            let Some(&(reference, reference_index)) = LEGACY_CONTAINERS
                .iter()
                .find(|(reference, _)| catalog.is_assignable(&RawType::Class(*reference), &erased))
            else {
                return Ok(());
            };
            let reference_param = TypeParam::new(reference, reference_index as u16);

            let own = erased.as_class().and_then(|class| {
                resolver
                    .binder()
                    .bindings(class)
                    .ancestor_to_sub(reference, reference_param)
                    .filter(|param| param.owner == class)
            });
            match own {
                Some(param) => (
                    self.declared.clone(),
                    TypeVariable::Declared(param),
                    self.declared
                        .type_arguments()
                        .get(param.index as usize)
                        .cloned()
                        .unwrap_or(TypeRef::Wildcard),
                    param.index as usize,
                ),
                None => (
                    TypeRef::raw(reference),
                    TypeVariable::Declared(reference_param),
                    TypeRef::Wildcard,
                    reference_index,
                ),
            }
        };

        debug!(
            declared = %catalog.describe(&self.declared),
            index,
            "Cascading implicitly into container elements"
        );

        let root_conversions = self.group_conversions.clone();
        match self.children.get_mut(&variable) {
            Some(existing) => {
                existing.cascading = true;
                if existing.group_conversions.is_empty() {
                    existing.group_conversions = root_conversions;
                }
            }
            None => {
                let mut child = Self::element(resolver, child_type, enclosing.clone(), variable, index);
                child.cascading = true;
                child.group_conversions = root_conversions;
                child.extractor = resolver.resolve_for_declared_parameter(&enclosing, &variable)?;
                self.children.insert(variable, child);
            }
        }
        Ok(())
    }

    fn container_class(&self) -> Option<TypeRef> {
        match &self.declared {
            TypeRef::Class { class, .. } if self.resolver.catalog().arity(*class) > 0 => Some(self.declared.clone()),
            TypeRef::Array(_) => Some(self.declared.clone()),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.resolver.catalog().describe(&self.declared)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use vessel_core::{
        CollectingReceiver, ExtractorDefinition, ExtractorRegistry, Primitive, ResolutionError, SuperType,
        TypeCatalog, ValueExtractor, ValueReceiver,
    };

    use super::*;

    fn resolver_for(catalog: TypeCatalog) -> ExtractorResolver {
        let registry = ExtractorRegistry::with_builtins(&catalog, []).unwrap();
        ExtractorResolver::new(Arc::new(catalog), Arc::new(registry))
    }

    fn resolver() -> ExtractorResolver {
        resolver_for(TypeCatalog::standard())
    }

    fn map_of_lists() -> TypeRef {
        TypeRef::class(
            known::MAP,
            [
                TypeRef::raw(known::STRING),
                TypeRef::class(known::LIST, [TypeRef::raw(known::INTEGER)]),
            ],
        )
    }

    #[test]
    fn test_nested_round_trip() {
        let resolver = resolver();
        let mut builder = CascadingBuilder::new(&resolver, map_of_lists());
        builder.child_at(1).unwrap().mark_cascading().child_at(0).unwrap().mark_cascading();
        let node = builder.build().unwrap();

        assert!(!node.is_marked_cascading());
        assert!(node.is_container());
        assert!(node.has_container_elements_marked_for_cascading());

        let values = node.child_at(1).unwrap();
        assert!(values.is_marked_cascading());
        assert_eq!(values.type_variable(), &TypeVariable::Declared(known::MAP_V));
        assert_eq!(values.extractor().unwrap().name(), "map-value");
        assert_eq!(values.declared_container_class(), Some(values.declared_type()));

        let elements = values.child_at(0).unwrap();
        assert!(elements.is_marked_cascading());
        assert_eq!(elements.declared_type(), &TypeRef::raw(known::INTEGER));
        assert!(elements.declared_container_class().is_none());
        assert!(node.child_at(0).is_none());
    }

    #[test]
    fn test_unmarked_levels_read_back_false() {
        let resolver = resolver();
        let mut builder = CascadingBuilder::new(&resolver, map_of_lists());
        builder.child_at(1).unwrap().child_at(0).unwrap().mark_cascading();
        let node = builder.build().unwrap();

        assert!(!node.child_at(1).unwrap().is_marked_cascading());
        assert!(node.child_at(1).unwrap().child_at(0).unwrap().is_marked_cascading());
        assert!(node.child_at(1).unwrap().has_container_elements_marked_for_cascading());
    }

    #[test]
    fn test_invalid_index() {
        let resolver = resolver();
        let declared = TypeRef::class(known::OPTIONAL, [TypeRef::raw(known::STRING)]);
        let mut builder = CascadingBuilder::new(&resolver, declared);

        let error = builder.child_at(2).unwrap_err();
        assert_eq!(
            error,
            CascadingError::InvalidContainerElement {
                declared_type: "Optional<String>".into(),
                index: 2,
            }
        );
        let message = error.to_string();
        assert!(message.contains("Optional") && message.contains('2'));

        assert!(builder.child_at(0).is_ok());
    }

    #[test]
    fn test_invalid_index_on_plain_type() {
        let resolver = resolver();
        let mut builder = CascadingBuilder::new(&resolver, TypeRef::raw(known::STRING));
        assert!(matches!(
            builder.child_at(0),
            Err(CascadingError::InvalidContainerElement { index: 0, .. })
        ));
    }

    #[test]
    fn test_no_extractor_for_element() {
        let mut catalog = TypeCatalog::builder();
        let pair = catalog.declare("Pair", ["L", "R"]).unwrap();
        let resolver = resolver_for(catalog.build().unwrap());

        let declared = TypeRef::class(pair, [TypeRef::raw(known::STRING), TypeRef::raw(known::STRING)]);
        let mut builder = CascadingBuilder::new(&resolver, declared);
        assert!(matches!(
            builder.child_at(1),
            Err(CascadingError::NoValueExtractor { index: 1, .. })
        ));
    }

    #[test]
    fn test_array_elements() {
        let resolver = resolver();
        let declared = TypeRef::array_of(TypeRef::Primitive(Primitive::Int));
        let mut builder = CascadingBuilder::new(&resolver, declared);
        builder.child_at(0).unwrap().mark_cascading();
        let node = builder.build().unwrap();

        let elements = node.child_at(0).unwrap();
        assert_eq!(elements.extractor().unwrap().name(), "int-array");
        assert_eq!(elements.declared_type(), &TypeRef::Primitive(Primitive::Int));
        assert!(builder_rejects_index(&resolver, TypeRef::array_of(TypeRef::raw(known::STRING)), 1));
    }

    fn builder_rejects_index(resolver: &ExtractorResolver, declared: TypeRef, index: usize) -> bool {
        CascadingBuilder::new(resolver, declared).child_at(index).is_err()
    }

    #[test]
    fn test_group_conversion_requires_cascading() {
        let resolver = resolver();
        let mut builder = CascadingBuilder::new(&resolver, TypeRef::raw(known::STRING));
        builder.add_group_conversion("Default", "Basic");
        assert!(matches!(
            builder.build(),
            Err(CascadingError::GroupConversionOnNonCascading { .. })
        ));
    }

    #[test]
    fn test_group_conversion() {
        let resolver = resolver();
        let mut builder = CascadingBuilder::new(&resolver, map_of_lists());
        builder
            .child_at(1)
            .unwrap()
            .mark_cascading()
            .add_group_conversion(Group::default_group(), "Basic")
            .add_group_conversion(Group::default_group(), "Extended");
        let node = builder.build().unwrap();

        assert!(node.has_group_conversions_on_object_or_container_elements());
        let values = node.child_at(1).unwrap();
        assert_eq!(values.convert_group(&Group::default_group()).name(), "Extended");
        assert_eq!(values.convert_group(&Group::new("Other")).name(), "Other");
    }

    #[test]
    fn test_merge() {
        let resolver = resolver();
        let mut first = CascadingBuilder::new(&resolver, map_of_lists());
        first.child_at(1).unwrap().mark_cascading();

        let mut second = CascadingBuilder::new(&resolver, map_of_lists());
        second.mark_cascading().add_group_conversion("Default", "Basic");
        second.legacy_container_cascading(false);
        second.child_at(0).unwrap().mark_cascading();

        first.legacy_container_cascading(false);
        first.merge(second).unwrap();
        let node = first.build().unwrap();

        assert!(node.is_marked_cascading());
        assert!(node.child_at(0).unwrap().is_marked_cascading());
        assert!(node.child_at(1).unwrap().is_marked_cascading());
        assert_eq!(node.group_conversions().len(), 1);
    }

    #[test]
    fn test_merge_conflicting_conversions() {
        let resolver = resolver();
        let mut first = CascadingBuilder::new(&resolver, TypeRef::raw(known::STRING));
        first.mark_cascading().add_group_conversion("Default", "Basic");
        let mut second = CascadingBuilder::new(&resolver, TypeRef::raw(known::STRING));
        second.mark_cascading().add_group_conversion("Default", "Other");

        assert!(matches!(
            first.merge(second),
            Err(CascadingError::ConflictingGroupConversion { .. })
        ));
    }

    #[test]
    fn test_failed_merge_leaves_builder_untouched() {
        let resolver = resolver();
        let mut first = CascadingBuilder::new(&resolver, map_of_lists());
        first.legacy_container_cascading(false);
        first
            .child_at(1)
            .unwrap()
            .mark_cascading()
            .add_group_conversion("Default", "Basic");

        let mut second = CascadingBuilder::new(&resolver, map_of_lists());
        second.mark_cascading().add_group_conversion("Full", "Extended");
        second.child_at(0).unwrap().mark_cascading();
        second
            .child_at(1)
            .unwrap()
            .mark_cascading()
            .add_group_conversion("Default", "Other");

        assert!(matches!(
            first.merge(second),
            Err(CascadingError::ConflictingGroupConversion { .. })
        ));

        let node = first.build().unwrap();
        assert!(!node.is_marked_cascading());
        assert!(node.group_conversions().is_empty());
        assert!(node.child_at(0).is_none());
        let values = node.child_at(1).unwrap();
        assert_eq!(values.convert_group(&Group::default_group()).name(), "Basic");
    }

    #[test]
    fn test_legacy_map_cascading() {
        let resolver = resolver();
        let declared = TypeRef::class(
            known::HASH_MAP,
            [TypeRef::raw(known::STRING), TypeRef::raw(known::INTEGER)],
        );
        let mut builder = CascadingBuilder::new(&resolver, declared.clone());
        builder.mark_cascading().add_group_conversion("Default", "Basic");
        let node = builder.build().unwrap();

        let values = node.child_at(1).unwrap();
        assert!(values.is_marked_cascading());
        assert_eq!(
            values.type_variable(),
            &TypeVariable::Declared(TypeParam::new(known::HASH_MAP, 1))
        );
        assert_eq!(values.declared_type(), &TypeRef::raw(known::INTEGER));
        assert_eq!(values.enclosing_type(), Some(&declared));
        assert_eq!(values.convert_group(&Group::default_group()).name(), "Basic");
        assert_eq!(values.extractor().unwrap().name(), "map-value");
    }

    #[test]
    fn test_legacy_cascading_falls_back_to_reference_type() {
        let mut catalog = TypeCatalog::builder();
        let names = catalog.declare("NameList", Vec::<String>::new()).unwrap();
        catalog
            .add_interface(names, SuperType::new(known::LIST, [TypeRef::raw(known::STRING)]))
            .unwrap();
        let resolver = resolver_for(catalog.build().unwrap());

        let mut builder = CascadingBuilder::new(&resolver, TypeRef::raw(names));
        builder.mark_cascading();
        let node = builder.build().unwrap();

        let elements = node.child(&TypeVariable::Declared(known::LIST_E)).unwrap();
        assert!(elements.is_marked_cascading());
        assert_eq!(elements.enclosing_type(), Some(&TypeRef::raw(known::LIST)));
        assert!(!elements.extractor_candidates().is_empty());
        assert_eq!(node.declared_container_class(), Some(&TypeRef::raw(known::LIST)));
    }

    #[test]
    fn test_legacy_cascading_reports_ambiguity() {
        struct BoxValue(TypeParam);

        impl ValueExtractor for BoxValue {
            fn name(&self) -> &str {
                "box-value"
            }

            fn definition(&self) -> ExtractorDefinition {
                ExtractorDefinition::new(self.0.owner, self.0)
            }

            fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
                receiver.value("<box value>", value);
            }
        }

        let mut catalog = TypeCatalog::builder();
        let boxed = catalog.declare("Box", ["E"]).unwrap();
        let both = catalog.declare("Both", ["E"]).unwrap();
        catalog
            .add_interface(both, SuperType::new(known::LIST, [TypeRef::param(both, 0)]))
            .unwrap()
            .add_interface(both, SuperType::new(boxed, [TypeRef::param(both, 0)]))
            .unwrap();
        let catalog = catalog.build().unwrap();
        let box_value = Arc::new(BoxValue(TypeParam::new(boxed, 0))) as Arc<dyn ValueExtractor>;
        let registry = ExtractorRegistry::with_builtins(&catalog, [box_value]).unwrap();
        let resolver = ExtractorResolver::new(Arc::new(catalog), Arc::new(registry));
        let declared = TypeRef::class(both, [TypeRef::raw(known::STRING)]);

        let mut explicit = CascadingBuilder::new(&resolver, declared.clone());
        assert!(matches!(
            explicit.child_at(0),
            Err(CascadingError::Resolution(ResolutionError::Ambiguous { .. }))
        ));

        let mut implicit = CascadingBuilder::new(&resolver, declared);
        implicit.mark_cascading();
        match implicit.build() {
            Err(CascadingError::Resolution(ResolutionError::Ambiguous { extractors, .. })) => {
                assert_eq!(extractors, ["box-value", "list-value"]);
            }
            other => panic!("expected an ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_legacy_cascading_keeps_explicit_element() {
        let resolver = resolver();
        let declared = TypeRef::class(known::LIST, [TypeRef::raw(known::STRING)]);
        let mut builder = CascadingBuilder::new(&resolver, declared);
        builder.mark_cascading().add_group_conversion("Default", "Basic");
        builder.child_at(0).unwrap().add_group_conversion("Default", "Element");
        let node = builder.build().unwrap();

        let elements = node.child_at(0).unwrap();
        assert!(elements.is_marked_cascading());
        assert_eq!(elements.convert_group(&Group::default_group()).name(), "Element");
        assert_eq!(node.children().count(), 1);
    }

    #[test]
    fn test_legacy_cascading_disabled() {
        let resolver = resolver();
        let declared = TypeRef::class(known::LIST, [TypeRef::raw(known::STRING)]);
        let mut builder = CascadingBuilder::new(&resolver, declared);
        builder.mark_cascading().legacy_container_cascading(false);
        let node = builder.build().unwrap();
        assert!(!node.is_container());
    }

    #[test]
    fn test_candidates_for_polymorphic_element() {
        struct SetValues;

        impl ValueExtractor for SetValues {
            fn name(&self) -> &str {
                "set-value"
            }

            fn definition(&self) -> ExtractorDefinition {
                ExtractorDefinition::new(known::SET, known::SET_E)
            }

            fn extract(&self, value: &Value, receiver: &mut dyn ValueReceiver) {
                if let Value::Array(elements) = value {
                    for element in elements {
                        receiver.iterable_value("<set element>", element);
                    }
                }
            }
        }

        let catalog = TypeCatalog::standard();
        let registry = ExtractorRegistry::with_builtins(&catalog, [Arc::new(SetValues) as Arc<dyn ValueExtractor>])
            .unwrap();
        let resolver = ExtractorResolver::new(Arc::new(catalog), Arc::new(registry));

        let declared = TypeRef::class(known::COLLECTION, [TypeRef::raw(known::STRING)]);
        let mut builder = CascadingBuilder::new(&resolver, declared);
        builder.child_at(0).unwrap().mark_cascading();
        let node = builder.build().unwrap();

        let elements = node.child_at(0).unwrap();
        assert_eq!(elements.extractor().unwrap().name(), "iterable-value");
        let mut names: Vec<&str> = elements.extractor_candidates().iter().map(|d| d.name()).collect();
        names.sort();
        assert_eq!(names, ["iterable-value", "list-value", "set-value"]);

        let runtime = elements
            .runtime_extractor(&resolver, &RawType::Class(known::TREE_SET))
            .unwrap()
            .unwrap();
        assert_eq!(runtime.name(), "set-value");

        let mut receiver = CollectingReceiver::default();
        let found = elements
            .extract_elements(&resolver, &RawType::Class(known::HASH_SET), &json!(["a", "b"]), &mut receiver)
            .unwrap();
        assert!(found);
        assert_eq!(receiver.elements().len(), 2);
        assert_eq!(receiver.elements()[0].node_name, "<set element>");
    }

    #[test]
    fn test_runtime_container_support() {
        let resolver = resolver();
        let mut builder = CascadingBuilder::new(&resolver, TypeRef::raw(known::OBJECT));
        builder.mark_cascading();
        let node = builder.build().unwrap();

        assert!(!node.is_container());
        let extractor = node
            .runtime_container_extractor(&resolver, &RawType::Class(known::ARRAY_LIST))
            .unwrap()
            .unwrap();
        assert_eq!(extractor.name(), "list-value");

        let mut receiver = CollectingReceiver::default();
        let found = node
            .extract_elements(&resolver, &RawType::Class(known::STRING), &json!("plain"), &mut receiver)
            .unwrap();
        assert!(!found);
    }
}
