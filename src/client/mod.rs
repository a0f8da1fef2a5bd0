//! Content access - the read-only collaborator every view is built from
//!
//! [`ContentSource`] is the seam between rendering and the headless content
//! API. [`PrismicClient`] talks to a Prismic repository over HTTP and
//! [`MemorySource`] serves fixed pages from memory.

mod error;
pub mod memory;
pub mod predicate;
pub mod prismic;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::Document;

pub use error::ContentError;
pub use memory::MemorySource;
pub use predicate::Predicate;
pub use prismic::PrismicClient;

/// Opaque pointer to the next page of a query, as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of query results
#[derive(Debug, Clone, Default)]
pub struct ApiPage {
    pub results: Vec<Document>,
    /// `None` once there is nothing left to fetch
    pub next_page: Option<PageCursor>,
}

/// Query for documents of one custom type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeQuery {
    pub document_type: String,
    /// Restrict returned fields (`post.title`, ...); empty fetches everything
    pub fetch: Vec<String>,
    /// `None` leaves the API default
    pub page_size: Option<usize>,
}

impl TypeQuery {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            fetch: Vec::new(),
            page_size: None,
        }
    }

    /// Fetch only `{type}.{field}` for each field
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fetch = fields
            .iter()
            .map(|f| format!("{}.{}", self.document_type, f))
            .collect();
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Read-only access to published documents
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First page of documents of the query's type
    async fn query_by_type(&self, query: &TypeQuery) -> Result<ApiPage, ContentError>;

    /// Follow a cursor returned by a previous page
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiPage, ContentError>;

    /// Single document by its uid
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document, ContentError>;
}
