//! The immutable cascading metadata tree.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;
use vessel_core::{
    ExtractorDescriptor, ExtractorResolver, RawType, ResolutionResult, Resolved, TypeRef, TypeVariable,
    ValueReceiver,
};

use super::group::{Group, GroupConversions};

/// Cascading configuration of one element: a field, a parameter, a return
/// value or one container element nested inside them.
///
/// Built by [`CascadingBuilder`](super::CascadingBuilder) and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct CascadingNode {
    pub(crate) declared_type: TypeRef,
    pub(crate) declared_container_class: Option<TypeRef>,
    pub(crate) enclosing_type: Option<TypeRef>,
    pub(crate) variable: TypeVariable,
    pub(crate) index: Option<usize>,
    pub(crate) cascading: bool,
    pub(crate) group_conversions: GroupConversions,
    pub(crate) children: BTreeMap<TypeVariable, CascadingNode>,
    pub(crate) extractor: Option<Arc<ExtractorDescriptor>>,
    pub(crate) candidates: Vec<Arc<ExtractorDescriptor>>,
    pub(crate) has_container_elements_marked_for_cascading: bool,
    pub(crate) has_group_conversions_on_object_or_container_elements: bool,
}

impl CascadingNode {
    /// Whether validation cascades into this element's value.
    pub fn is_marked_cascading(&self) -> bool {
        self.cascading
    }

    pub fn group_conversions(&self) -> &GroupConversions {
        &self.group_conversions
    }

    /// Returns the group to validate the element with when `group` is
    /// requested on the enclosing value.
    pub fn convert_group<'a>(&'a self, group: &'a Group) -> &'a Group {
        self.group_conversions.get(group).unwrap_or(group)
    }

    /// The declared type of this element.
    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    /// The declared type, when it is a generic or array container.
    pub fn declared_container_class(&self) -> Option<&TypeRef> {
        self.declared_container_class.as_ref()
    }

    /// The container this element belongs to; `None` for the root.
    pub fn enclosing_type(&self) -> Option<&TypeRef> {
        self.enclosing_type.as_ref()
    }

    /// The type parameter this element stands for inside its enclosing
    /// container, or [`TypeVariable::AnnotatedObject`] for the root.
    pub fn type_variable(&self) -> &TypeVariable {
        &self.variable
    }

    /// Index of this element inside its enclosing container.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns the nested element at `index`, if configured.
    pub fn child_at(&self, index: usize) -> Option<&CascadingNode> {
        self.children.values().find(|child| child.index == Some(index))
    }

    /// Returns the nested element standing for `variable`, if configured.
    pub fn child(&self, variable: &TypeVariable) -> Option<&CascadingNode> {
        self.children.get(variable)
    }

    pub fn children(&self) -> impl Iterator<Item = &CascadingNode> {
        self.children.values()
    }

    /// A node with configured container elements.
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    /// The extractor resolved for this element against its declared
    /// enclosing type.
    pub fn extractor(&self) -> Option<&Arc<ExtractorDescriptor>> {
        self.extractor.as_ref()
    }

    /// Extractors that may handle this element once the runtime type of
    /// the enclosing value is known.
    pub fn extractor_candidates(&self) -> &[Arc<ExtractorDescriptor>] {
        &self.candidates
    }

    pub fn has_container_elements_marked_for_cascading(&self) -> bool {
        self.has_container_elements_marked_for_cascading
    }

    pub fn is_marked_for_cascading_on_object_or_container_elements(&self) -> bool {
        self.cascading || self.has_container_elements_marked_for_cascading
    }

    pub fn has_group_conversions_on_object_or_container_elements(&self) -> bool {
        self.has_group_conversions_on_object_or_container_elements
    }

    /// Resolves the extractor for this element when the enclosing value is
    /// a `runtime` instance.
    pub fn runtime_extractor(&self, resolver: &ExtractorResolver, runtime: &RawType) -> ResolutionResult<Resolved> {
        match &self.enclosing_type {
            Some(enclosing) => resolver.resolve_for_runtime_parameter(enclosing, &self.variable, runtime),
            None => Ok(None),
        }
    }

    /// For a cascading element declared as a plain type, resolves the
    /// extractor unwrapping all elements of a `runtime` value that turns out
    /// to be a container.
    pub fn runtime_container_extractor(&self, resolver: &ExtractorResolver, runtime: &RawType) -> ResolutionResult<Resolved> {
        if !self.cascading || self.is_container() {
            return Ok(None);
        }
        resolver.resolve_for_all_elements(runtime)
    }

    /// Extracts this element's values from `value`, whose concrete type is
    /// `runtime`.
    ///
    /// For a nested element `value` is the enclosing container; for the root
    /// it is the element itself. Returns `false` when no extractor applies.
    pub fn extract_elements(
        &self,
        resolver: &ExtractorResolver,
        runtime: &RawType,
        value: &Value,
        receiver: &mut dyn ValueReceiver,
    ) -> ResolutionResult<bool> {
        let extractor = match self.enclosing_type {
            Some(_) => self.runtime_extractor(resolver, runtime)?,
            None => self.runtime_container_extractor(resolver, runtime)?,
        };
        let Some(extractor) = extractor else {
            return Ok(false);
        };

        trace!(extractor = %extractor.name(), "Extracting container elements");
        extractor.extract(value, receiver);
        Ok(true)
    }
}
