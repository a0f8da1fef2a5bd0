//! Prismic REST API v2 client

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::predicate::{encode_query, Predicate};
use super::{ApiPage, ContentError, ContentSource, PageCursor, TypeQuery};
use crate::config::PrismicConfig;
use crate::content::Document;

/// API root payload, only the refs matter here
#[derive(Debug, Deserialize)]
struct ApiInfo {
    refs: Vec<RefInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefInfo {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(default)]
    is_master_ref: bool,
}

/// `documents/search` payload
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    results: Vec<Document>,
    next_page: Option<String>,
}

impl From<SearchResponse> for ApiPage {
    fn from(response: SearchResponse) -> Self {
        ApiPage {
            results: response.results,
            next_page: response.next_page.map(PageCursor::new),
        }
    }
}

/// HTTP client for one Prismic repository
pub struct PrismicClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl PrismicClient {
    pub fn new(endpoint: &str, access_token: Option<String>) -> Result<Self, ContentError> {
        let mut endpoint = Url::parse(endpoint)?;
        // `join` replaces the last segment unless the path ends with a slash
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let http = Client::builder().user_agent(Self::user_agent()).build()?;

        Ok(Self {
            http,
            endpoint,
            access_token,
        })
    }

    pub fn from_config(config: &PrismicConfig) -> Result<Self, ContentError> {
        Self::new(&config.endpoint, config.access_token.clone())
    }

    pub fn user_agent() -> &'static str {
        concat!("spacetraveling-rs/", env!("CARGO_PKG_VERSION"))
    }

    /// Current master ref of the repository
    ///
    /// Every publish moves the master ref, so it is resolved again for each query.
    async fn master_ref(&self) -> Result<String, ContentError> {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
        let info: ApiInfo = self.get_json(url).await?;
        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(ContentError::MissingMasterRef)
    }

    async fn search_url(
        &self,
        predicates: &[Predicate],
        fetch: &[String],
        page_size: Option<usize>,
    ) -> Result<Url, ContentError> {
        let reference = self.master_ref().await?;
        let mut url = self.endpoint.join("documents/search")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", &reference);
            query.append_pair("q", &encode_query(predicates));
            if !fetch.is_empty() {
                query.append_pair("fetch", &fetch.join(","));
            }
            if let Some(size) = page_size {
                query.append_pair("pageSize", &size.to_string());
            }
            if let Some(token) = &self.access_token {
                query.append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    async fn search(&self, url: Url) -> Result<ApiPage, ContentError> {
        let response: SearchResponse = self.get_json(url).await?;
        tracing::debug!(
            "Fetched page {}/{} with {} documents",
            response.page,
            response.total_pages,
            response.results.len()
        );
        Ok(response.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ContentError> {
        // The query string may carry the access token
        let path = url.path().to_string();
        tracing::debug!("GET {}", path);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Status {
                status: status.as_u16(),
                path,
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query_by_type(&self, query: &TypeQuery) -> Result<ApiPage, ContentError> {
        let url = self
            .search_url(
                &[Predicate::document_type(&query.document_type)],
                &query.fetch,
                query.page_size,
            )
            .await?;
        self.search(url).await
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiPage, ContentError> {
        let url = Url::parse(cursor.as_str())
            .map_err(|_| ContentError::InvalidCursor(cursor.to_string()))?;
        self.search(url).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document, ContentError> {
        let url = self
            .search_url(&[Predicate::uid(doc_type, uid)], &[], Some(1))
            .await?;
        let page = self.search(url).await?;
        page.results
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
