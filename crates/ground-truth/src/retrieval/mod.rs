//! Document retrieval across the enabled data sources

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{DataSourceProvider, SourceFilters, TemplateProvider};
use crate::types::{
    DataSourceInfo, Document, Page, PageParams, SearchRequest, SearchResponse, Template,
};

/// Largest page size accepted by [`RetrievalService::list_data_sources`]
pub const MAX_PAGE_LIMIT: usize = 100;

/// Search, data source listing and prompt templates
#[derive(Clone)]
pub struct RetrievalService {
    sources: Vec<Arc<dyn DataSourceProvider>>,
    templates: Arc<dyn TemplateProvider>,
}

impl RetrievalService {
    pub fn new(
        sources: Vec<Arc<dyn DataSourceProvider>>,
        templates: Arc<dyn TemplateProvider>,
    ) -> Self {
        Self { sources, templates }
    }

    fn source(&self, id: &str) -> Result<&Arc<dyn DataSourceProvider>> {
        self.sources
            .iter()
            .find(|source| source.id() == id)
            .ok_or_else(|| Error::UnknownProvider(id.to_string()))
    }

    /// Search the requested sources, or every enabled source when none are named
    ///
    /// Unknown source ids are skipped. Results from all sources are ranked
    /// together by relevance and cut to `max_results`.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let selected: Vec<&Arc<dyn DataSourceProvider>> = if request.sources.is_empty() {
            self.sources.iter().collect()
        } else {
            request
                .sources
                .iter()
                .filter_map(|id| match self.source(id) {
                    Ok(source) => Some(source),
                    Err(_) => {
                        tracing::warn!("Skipping unknown data source: {}", id);
                        None
                    }
                })
                .collect()
        };

        let filters = SourceFilters::new();
        let mut documents = Vec::new();
        for source in selected {
            let found = source
                .retrieve_documents(&request.query, &filters, request.max_results)
                .await?;
            documents.extend(found);
        }

        documents.sort_by(|a, b| {
            let a = a.relevance_score.unwrap_or_default();
            let b = b.relevance_score.unwrap_or_default();
            b.total_cmp(&a)
        });
        documents.truncate(request.max_results);

        tracing::info!(
            "Search '{}' returned {} documents",
            request.query,
            documents.len()
        );
        Ok(SearchResponse::single_page(documents))
    }

    /// Search a single named source
    pub async fn search_source(
        &self,
        query: &str,
        provider: &str,
        limit: usize,
    ) -> Result<Vec<Document>> {
        self.source(provider)?
            .retrieve_documents(query, &SourceFilters::new(), limit)
            .await
    }

    /// Fetch one document from a named source
    pub async fn get_document(&self, provider: &str, id: &str) -> Result<Document> {
        self.source(provider)?.get_document(id).await
    }

    /// Page through the enabled data sources
    pub fn list_data_sources(&self, params: PageParams) -> Result<Page<DataSourceInfo>> {
        if params.page < 1 {
            return Err(Error::Unprocessable(
                "page must be greater than or equal to 1".to_string(),
            ));
        }
        if params.limit < 1 || params.limit > MAX_PAGE_LIMIT {
            return Err(Error::Unprocessable(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        let infos: Vec<DataSourceInfo> = self.sources.iter().map(|source| source.info()).collect();
        Ok(Page::slice(&infos, params))
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        self.templates.list_templates().await
    }

    pub async fn get_template(&self, id: &str) -> Result<Template> {
        self.templates.get_template(id).await
    }
}
