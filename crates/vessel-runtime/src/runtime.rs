//! The composition root tying catalog, registry and resolver together.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vessel_runtime::VesselRuntime;
//!
//! // Loads vessel.toml from the current directory, if present
//! let runtime = VesselRuntime::new()?;
//!
//! // Custom catalog, user extractors and an explicit configuration file
//! let runtime = VesselRuntime::builder()
//!     .config_file("config/vessel.toml")
//!     .catalog(catalog)
//!     .extractor(Arc::new(MyTupleExtractor))
//!     .build()?;
//!
//! let mut cascading = runtime.cascading(declared);
//! cascading.mark_cascading();
//! let node = cascading.build()?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use vessel_core::{ExtractorRegistry, ExtractorResolver, ResolverStats, TypeCatalog, TypeRef, ValueExtractor};
use vessel_framework::CascadingBuilder;

use crate::config::{ConfigLoader, VesselConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// A configured extractor resolution environment.
///
/// Owns the type catalog, the extractor registry derived from the built-in
/// table minus the disabled extractors plus user extractors, and a shared
/// caching resolver.
#[derive(Debug)]
pub struct VesselRuntime {
    config: VesselConfig,
    catalog: Arc<TypeCatalog>,
    resolver: Arc<ExtractorResolver>,
}

impl VesselRuntime {
    /// Creates a runtime from configuration found in the current directory,
    /// over the standard catalog.
    pub fn new() -> RuntimeResult<Self> {
        Self::builder().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from pre-loaded configuration over the standard
    /// catalog, initializing logging from it.
    pub fn from_config(config: &VesselConfig) -> RuntimeResult<Self> {
        logging::init_from_config(&config.logging);
        Self::assemble(config.clone(), Arc::new(TypeCatalog::standard()), Vec::new())
    }

    fn assemble(
        config: VesselConfig,
        catalog: Arc<TypeCatalog>,
        extractors: Vec<Arc<dyn ValueExtractor>>,
    ) -> RuntimeResult<Self> {
        validate_config(&config)?;

        let user_extractors = extractors.len();
        let registry = ExtractorRegistry::with_builtins(&catalog, [])?
            .without(&config.extractors.disabled)
            .with_overrides(&catalog, extractors)?;
        let resolver = ExtractorResolver::with_options(Arc::clone(&catalog), Arc::new(registry), config.resolution);

        info!(
            classes = catalog.len(),
            extractors = resolver.registry().len(),
            user_extractors,
            disabled = config.extractors.disabled.len(),
            cache = config.resolution.cache,
            "Vessel runtime ready"
        );

        Ok(Self {
            config,
            catalog,
            resolver: Arc::new(resolver),
        })
    }

    pub fn config(&self) -> &VesselConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<ExtractorRegistry> {
        self.resolver.registry()
    }

    pub fn resolver(&self) -> &Arc<ExtractorResolver> {
        &self.resolver
    }

    /// Starts a cascading configuration for an element declared as
    /// `declared`, with the configured legacy container behaviour.
    pub fn cascading(&self, declared: TypeRef) -> CascadingBuilder<'_> {
        let mut builder = CascadingBuilder::new(&self.resolver, declared);
        builder.legacy_container_cascading(self.config.cascading.legacy_container_cascading);
        builder
    }

    /// Derives a runtime whose registry layers `extractors` over this one's.
    ///
    /// The derived runtime gets its own resolver, so its caches start empty
    /// and never leak results into this runtime.
    pub fn with_extractors<I>(&self, extractors: I) -> RuntimeResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn ValueExtractor>>,
    {
        let registry = self.registry().with_overrides(&self.catalog, extractors)?;
        let resolver = ExtractorResolver::with_options(
            Arc::clone(&self.catalog),
            Arc::new(registry),
            self.config.resolution,
        );

        Ok(Self {
            config: self.config.clone(),
            catalog: Arc::clone(&self.catalog),
            resolver: Arc::new(resolver),
        })
    }

    pub fn stats(&self) -> ResolverStats {
        self.resolver.stats()
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for a [`VesselRuntime`] with custom configuration, catalog and
/// extractors.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    catalog: Option<Arc<TypeCatalog>>,
    extractors: Vec<Arc<dyn ValueExtractor>>,
    init_logging: bool,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            catalog: None,
            extractors: Vec::new(),
            init_logging: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g. "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: VesselConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Uses `catalog` instead of [`TypeCatalog::standard`].
    pub fn catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Registers a user extractor. Later registrations win over earlier ones
    /// and over built-ins with the same container and extracted parameter.
    pub fn extractor(mut self, extractor: Arc<dyn ValueExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn extractors<I>(mut self, extractors: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ValueExtractor>>,
    {
        self.extractors.extend(extractors);
        self
    }

    /// Leaves the global tracing subscriber alone.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    pub fn build(self) -> RuntimeResult<VesselRuntime> {
        let config = self.config_loader.load()?;
        if self.init_logging {
            logging::init_from_config(&config.logging);
        }

        let catalog = self.catalog.unwrap_or_else(|| Arc::new(TypeCatalog::standard()));
        VesselRuntime::assemble(config, catalog, self.extractors)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
