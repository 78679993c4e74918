//! The immutable table of extractors a resolver scans.
//!
//! Built-ins are inserted first, then user extractors in the order they were
//! given. An extractor whose [`ExtractorKey`] is already present replaces
//! the earlier one in place, so iteration order stays stable across
//! overrides.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::ExtractorResult;
use crate::extraction::{BUILTIN_EXTRACTORS, ExtractorDescriptor, ExtractorKey, ValueExtractor};
use crate::types::TypeCatalog;

/// An immutable table of extractor descriptors keyed by container type and
/// extracted parameter.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    descriptors: Vec<Arc<ExtractorDescriptor>>,
    index: HashMap<ExtractorKey, usize>,
}

impl ExtractorRegistry {
    /// Builds a registry from `builtins` followed by `user` extractors.
    pub fn build<I>(catalog: &TypeCatalog, builtins: &[&'static dyn ValueExtractor], user: I) -> ExtractorResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn ValueExtractor>>,
    {
        let mut registry = Self::default();
        for builtin in builtins {
            registry.insert(ExtractorDescriptor::new(*builtin, catalog)?);
        }
        for extractor in user {
            registry.insert(ExtractorDescriptor::new(extractor, catalog)?);
        }

        debug!(extractors = registry.len(), "Extractor registry built");
        Ok(registry)
    }

    /// Builds a registry from [`BUILTIN_EXTRACTORS`] followed by `user`.
    pub fn with_builtins<I>(catalog: &TypeCatalog, user: I) -> ExtractorResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn ValueExtractor>>,
    {
        Self::build(catalog, BUILTIN_EXTRACTORS, user)
    }

    /// Derives a new registry with `user` extractors layered over this one.
    pub fn with_overrides<I>(&self, catalog: &TypeCatalog, user: I) -> ExtractorResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn ValueExtractor>>,
    {
        let mut registry = self.clone();
        for extractor in user {
            registry.insert(ExtractorDescriptor::new(extractor, catalog)?);
        }
        Ok(registry)
    }

    /// Returns a copy without the extractors named in `names`.
    pub fn without<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut registry = Self::default();
        for descriptor in &self.descriptors {
            if names.iter().any(|name| name.as_ref() == descriptor.name()) {
                debug!(extractor = %descriptor.name(), "Extractor disabled");
                continue;
            }
            registry.insert_shared(Arc::clone(descriptor));
        }
        registry
    }

    /// All descriptors in registration order.
    pub fn all(&self) -> &[Arc<ExtractorDescriptor>] {
        &self.descriptors
    }

    /// Looks up a descriptor by key.
    pub fn get(&self, key: &ExtractorKey) -> Option<&Arc<ExtractorDescriptor>> {
        self.index.get(key).map(|&position| &self.descriptors[position])
    }

    /// Looks up a descriptor by extractor name.
    pub fn by_name(&self, name: &str) -> Option<&Arc<ExtractorDescriptor>> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Names of all registered extractors in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name()).collect()
    }

    fn insert(&mut self, descriptor: ExtractorDescriptor) {
        self.insert_shared(Arc::new(descriptor));
    }

    fn insert_shared(&mut self, descriptor: Arc<ExtractorDescriptor>) {
        match self.index.get(descriptor.key()) {
            Some(&position) => {
                debug!(
                    replaced = %self.descriptors[position].name(),
                    extractor = %descriptor.name(),
                    "Extractor overrides an earlier registration"
                );
                self.descriptors[position] = descriptor;
            }
            None => {
                self.index.insert(descriptor.key().clone(), self.descriptors.len());
                self.descriptors.push(descriptor);
            }
        }
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.names())
            .finish()
    }
}
