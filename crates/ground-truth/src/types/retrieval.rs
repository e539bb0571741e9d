//! Retrieval request and response types

use serde::{Deserialize, Serialize};

use super::Document;

/// Body of `POST /retrieval/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,

    /// Data source ids to search; empty means every enabled source
    #[serde(default)]
    pub sources: Vec<String>,

    /// Maximum number of documents returned (default: 10)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    10
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sources: Vec::new(),
            max_results: default_max_results(),
        }
    }
}

/// Search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: Vec<Document>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    pub page: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

impl SearchResponse {
    /// Single-page response over the given documents
    pub fn single_page(documents: Vec<Document>) -> Self {
        let total_count = documents.len();
        Self {
            documents,
            total_count,
            page: 1,
            total_pages: usize::from(total_count > 0),
        }
    }
}

/// A data source as listed by `GET /retrieval/data_sources`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// `?page=&limit=` query parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Pagination block of a paged response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

/// One page of items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Clone> Page<T> {
    /// Slice `items` according to already validated parameters
    pub fn slice(items: &[T], params: PageParams) -> Self {
        let total_count = items.len();
        let start = (params.page - 1).saturating_mul(params.limit);
        let data = items
            .iter()
            .skip(start)
            .take(params.limit)
            .cloned()
            .collect();

        Self {
            data,
            pagination: Pagination {
                page: params.page,
                limit: params.limit,
                total_count,
                total_pages: total_count.div_ceil(params.limit),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slice() {
        let items: Vec<u32> = (1..=7).collect();

        let page = Page::slice(&items, PageParams { page: 2, limit: 3 });
        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.pagination.total_count, 7);
        assert_eq!(page.pagination.total_pages, 3);

        let past_end = Page::slice(&items, PageParams { page: 5, limit: 3 });
        assert!(past_end.data.is_empty());
    }

    #[test]
    fn test_single_page_empty() {
        let response = SearchResponse::single_page(vec![]);
        assert_eq!(response.total_pages, 0);
        assert_eq!(response.page, 1);
    }
}
