//! Provider abstractions for storage, auth, generation, retrieval and templates
//!
//! Each capability is a trait with one shipped in-memory implementation.
//! [`ProviderRegistry`] picks implementations by name from the configuration.

pub mod auth;
pub mod data_source;
pub mod database;
pub mod demo_generator;
pub mod generation;
pub mod memory_db;
pub mod memory_source;
pub mod simple_auth;
pub mod template;

pub use auth::AuthProvider;
pub use data_source::{DataSourceProvider, SourceFilters};
pub use database::{DatabaseProvider, QaPairChanges};
pub use demo_generator::DemoGenerator;
pub use generation::GenerationProvider;
pub use memory_db::MemoryDatabase;
pub use memory_source::MemoryDataSource;
pub use simple_auth::SimpleAuthProvider;
pub use template::{InMemoryTemplates, TemplateProvider};

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::store::MemoryStore;

/// The provider set selected by configuration
#[derive(Clone)]
pub struct ProviderRegistry {
    pub database: Arc<dyn DatabaseProvider>,
    pub auth: Arc<dyn AuthProvider>,
    pub generator: Arc<dyn GenerationProvider>,
    /// Enabled data sources, in configured order
    pub data_sources: Vec<Arc<dyn DataSourceProvider>>,
    pub templates: Arc<dyn TemplateProvider>,
}

impl ProviderRegistry {
    /// Build providers over a freshly seeded store
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::seeded()?);
        Self::with_store(config, store)
    }

    /// Build providers over an existing store
    pub fn with_store(config: &AppConfig, store: Arc<MemoryStore>) -> Result<Self> {
        let providers = &config.providers;

        let database: Arc<dyn DatabaseProvider> = match providers.database.as_str() {
            "memory" => Arc::new(MemoryDatabase::new(store)),
            other => {
                return Err(Error::Config(format!(
                    "Unsupported DATABASE_PROVIDER: {}",
                    other
                )))
            }
        };

        let auth: Arc<dyn AuthProvider> = match providers.auth.as_str() {
            "simple" => Arc::new(SimpleAuthProvider::new(config.auth.clone())),
            other => {
                return Err(Error::Config(format!(
                    "Unsupported AUTH_PROVIDER: {}",
                    other
                )))
            }
        };

        let generator: Arc<dyn GenerationProvider> = match providers.generation.as_str() {
            "demo" => Arc::new(DemoGenerator::new()),
            other => {
                return Err(Error::Config(format!(
                    "Unsupported GENERATION_PROVIDER: {}",
                    other
                )))
            }
        };

        let mut data_sources: Vec<Arc<dyn DataSourceProvider>> = Vec::new();
        for id in &providers.data_sources {
            match id.as_str() {
                "memory" => data_sources.push(Arc::new(MemoryDataSource::new())),
                other => tracing::warn!("Skipping unknown data source provider: {}", other),
            }
        }

        tracing::info!(
            "Providers: database={}, auth={}, generation={}, data_sources={}",
            database.name(),
            auth.name(),
            generator.name(),
            data_sources.len()
        );

        Ok(Self {
            database,
            auth,
            generator,
            data_sources,
            templates: Arc::new(InMemoryTemplates::default()),
        })
    }

    /// IDs of the enabled data sources
    pub fn data_source_ids(&self) -> Vec<String> {
        self.data_sources
            .iter()
            .map(|source| source.id().to_string())
            .collect()
    }
}
