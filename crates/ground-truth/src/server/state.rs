//! Application state for the ground truth server

use std::sync::Arc;

use crate::collections::CollectionService;
use crate::config::AppConfig;
use crate::error::Result;
use crate::generation::GenerationManager;
use crate::providers::{AuthProvider, DatabaseProvider, ProviderRegistry};
use crate::retrieval::RetrievalService;
use crate::store::MemoryStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Providers selected by configuration
    providers: ProviderRegistry,
    /// Collections and QA pairs
    collections: CollectionService,
    /// Search, data sources and templates
    retrieval: RetrievalService,
    /// Answer generation
    generation: GenerationManager,
}

impl AppState {
    /// Create application state over freshly seeded demo data
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::seeded()?);
        Self::with_store(config, store)
    }

    /// Create application state over an existing store
    pub fn with_store(config: AppConfig, store: Arc<MemoryStore>) -> Result<Self> {
        tracing::info!("Initializing application state...");
        let providers = ProviderRegistry::with_store(&config, store)?;

        let collections = CollectionService::new(Arc::clone(&providers.database));
        let retrieval = RetrievalService::new(
            providers.data_sources.clone(),
            Arc::clone(&providers.templates),
        );
        let generation = GenerationManager::new(
            Arc::clone(&providers.generator),
            Arc::clone(&providers.templates),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                providers,
                collections,
                retrieval,
                generation,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the provider registry
    pub fn providers(&self) -> &ProviderRegistry {
        &self.inner.providers
    }

    /// Get the database provider
    pub fn database(&self) -> &Arc<dyn DatabaseProvider> {
        &self.inner.providers.database
    }

    /// Get the auth provider
    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.inner.providers.auth
    }

    pub fn collections(&self) -> &CollectionService {
        &self.inner.collections
    }

    pub fn retrieval(&self) -> &RetrievalService {
        &self.inner.retrieval
    }

    pub fn generation(&self) -> &GenerationManager {
        &self.inner.generation
    }
}
