//! The data context: one entry point wiring registry, resolver, engine and
//! result store into a validation run.

use crate::{
    BatchParameters, BatchResolver, ContextConfig, FilesystemResultStore, InMemoryResultStore,
    Registry, ResultStore, StoredResult,
};
use quality_core::{
    Asset, Batch, BatchDefinition, Datasource, ExpectationSuite, FileFormat, QualityError,
    ResourceKey, Result, RunIdentifier, ValidationResult, ValidationResultIdentifier,
};
use quality_io::{DataFusionReader, TableReader};
use quality_validator::{EvaluationOptions, Validator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Provisioning and validation facade.
///
/// Every provisioning call is idempotent: asking twice for the same datasource,
/// asset, batch definition or suite returns the same shared instance, and
/// asking for a name that is taken by something incompatible fails with
/// `ResourceConflict`.
///
/// # Example
///
/// ```rust
/// use quality_context::{BatchParameters, DataContext};
/// use quality_core::{ExpectationConfig, RunIdentifier, Table};
///
/// let context = DataContext::ephemeral().unwrap();
///
/// let datasource = context.datasource("my_pandas_datasource").unwrap();
/// let asset = context.dataframe_asset(&datasource, "my_dataframe_asset").unwrap();
/// let definition = context.whole_dataframe_definition(&asset, "my_batch_def").unwrap();
///
/// let suite = context
///     .seed_suite("my_hello_world_suite", |suite| {
///         suite.add(ExpectationConfig::not_null("name"));
///         suite.add(ExpectationConfig::between("age", 20.0, 40.0));
///     })
///     .unwrap();
///
/// let table = Table::builder()
///     .column("name", [Some("Alice"), None, Some("Charlie")])
///     .column("age", [25, 30, 150])
///     .build()
///     .unwrap();
///
/// let stored = context
///     .run(
///         &definition,
///         BatchParameters::dataframe(table),
///         &suite,
///         RunIdentifier::now("my_run"),
///     )
///     .unwrap();
///
/// assert!(!stored.result.success);
/// assert_eq!(context.results().unwrap(), vec![stored.identifier]);
/// ```
pub struct DataContext {
    config: ContextConfig,
    registry: Registry,
    resolver: BatchResolver,
    validator: Validator,
    store: Arc<dyn ResultStore>,
}

impl std::fmt::Debug for DataContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContext")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl DataContext {
    /// Creates a context persisting results under `config.store_dir`.
    pub fn new(config: ContextConfig) -> Result<Self> {
        let store = Arc::new(FilesystemResultStore::new(&config.store_dir));
        let reader = DataFusionReader::new()
            .map_err(|e| QualityError::Configuration(e.to_string()))?;
        Self::with_parts(config, Arc::new(reader), store)
    }

    /// Creates a context with default settings that keeps results in memory.
    pub fn ephemeral() -> Result<Self> {
        let reader = DataFusionReader::new()
            .map_err(|e| QualityError::Configuration(e.to_string()))?;
        Self::with_parts(
            ContextConfig::default(),
            Arc::new(reader),
            Arc::new(InMemoryResultStore::new()),
        )
    }

    /// Creates a context from explicit parts.
    pub fn with_parts(
        config: ContextConfig,
        reader: Arc<dyn TableReader>,
        store: Arc<dyn ResultStore>,
    ) -> Result<Self> {
        config.validate()?;
        let validator = Validator::with_options(EvaluationOptions {
            partial_unexpected_count: config.partial_unexpected_count,
        });

        Ok(Self {
            config,
            registry: Registry::new(),
            resolver: BatchResolver::new(reader),
            validator,
            store,
        })
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// The resource registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The result store.
    pub fn store(&self) -> &dyn ResultStore {
        self.store.as_ref()
    }

    /// Gets or creates a datasource.
    pub fn datasource(&self, name: &str) -> Result<Arc<Datasource>> {
        self.registry.ensure(Datasource::new(name))
    }

    /// Gets or creates an asset fed by in-memory tables.
    pub fn dataframe_asset(&self, datasource: &Datasource, name: &str) -> Result<Arc<Asset>> {
        self.registry.ensure(Asset::dataframe(datasource, name))
    }

    /// Gets or creates a file-backed asset.
    pub fn file_asset(
        &self,
        datasource: &Datasource,
        name: &str,
        format: FileFormat,
    ) -> Result<Arc<Asset>> {
        self.registry.ensure(Asset::file(datasource, name, format))
    }

    /// Gets or creates a CSV asset.
    pub fn csv_asset(&self, datasource: &Datasource, name: &str) -> Result<Arc<Asset>> {
        self.file_asset(datasource, name, FileFormat::Csv)
    }

    /// Gets or creates a Parquet asset.
    pub fn parquet_asset(&self, datasource: &Datasource, name: &str) -> Result<Arc<Asset>> {
        self.file_asset(datasource, name, FileFormat::Parquet)
    }

    /// Gets or creates a whole-dataframe batch definition.
    pub fn whole_dataframe_definition(
        &self,
        asset: &Asset,
        name: &str,
    ) -> Result<Arc<BatchDefinition>> {
        self.registry
            .ensure(BatchDefinition::whole_dataframe(asset, name)?)
    }

    /// Gets or creates a path batch definition.
    ///
    /// The path is part of the definition: requesting the same name with a
    /// different path is a `ResourceConflict`.
    pub fn path_definition(
        &self,
        asset: &Asset,
        name: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Arc<BatchDefinition>> {
        self.registry.ensure(BatchDefinition::path(asset, name, path)?)
    }

    /// Gets a suite, creating an empty one on first use.
    pub fn suite(&self, name: &str) -> Result<Arc<ExpectationSuite>> {
        self.registry
            .get_or_create(ResourceKey::suite(name), || Ok(ExpectationSuite::new(name)))
    }

    /// Stores `suite`, replacing any registered version of the same name.
    pub fn add_or_update_suite(&self, suite: ExpectationSuite) -> Result<Arc<ExpectationSuite>> {
        let (current, _) = self.registry.replace(suite)?;
        Ok(current)
    }

    /// Populates a suite with `seed` only if it has no expectations yet, then
    /// stores it.
    ///
    /// Running this on every invocation adds the seed expectations exactly once.
    pub fn seed_suite<F>(&self, name: &str, seed: F) -> Result<Arc<ExpectationSuite>>
    where
        F: FnOnce(&mut ExpectationSuite),
    {
        let current = self.suite(name)?;
        if !current.is_empty() {
            info!(
                "Suite '{}' already has {} expectations, keeping them",
                name,
                current.len()
            );
            return Ok(current);
        }

        let mut seeded = (*current).clone();
        seed(&mut seeded);
        info!("Seeded suite '{}' with {} expectations", name, seeded.len());
        self.add_or_update_suite(seeded)
    }

    /// Resolves a fresh batch.
    pub fn get_batch(
        &self,
        definition: &BatchDefinition,
        parameters: BatchParameters,
    ) -> Result<Batch> {
        self.resolver.resolve(definition, parameters)
    }

    /// Validates a batch without storing the result.
    pub fn validate(&self, batch: &Batch, suite: &ExpectationSuite) -> ValidationResult {
        self.validator.validate(batch, suite)
    }

    /// Resolves, validates and stores one run.
    ///
    /// Resolution and store errors abort the run; nothing is stored unless a
    /// complete result was produced.
    pub fn run(
        &self,
        definition: &BatchDefinition,
        parameters: BatchParameters,
        suite: &ExpectationSuite,
        run_id: RunIdentifier,
    ) -> Result<StoredResult> {
        let batch = self.get_batch(definition, parameters)?;
        let result = self.validate(&batch, suite);
        let identifier = ValidationResultIdentifier::new(&suite.name, run_id, batch.label());

        self.store.put(&identifier, &result)?;
        if !result.success {
            warn!("Run {} stored with failures", identifier);
        }

        Ok(StoredResult { identifier, result })
    }

    /// Identifiers of every stored result, sorted.
    pub fn results(&self) -> Result<Vec<ValidationResultIdentifier>> {
        self.store.list()
    }

    /// Loads one stored result.
    pub fn get_result(
        &self,
        identifier: &ValidationResultIdentifier,
    ) -> Result<Option<ValidationResult>> {
        self.store.get(identifier)
    }
}
