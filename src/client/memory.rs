//! In-memory content source
//!
//! Serves a fixed sequence of pages. Cursors take the form
//! `memory://page/{index}` and every followed cursor is recorded, which makes
//! the source convenient for exercising pagination without a network.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{ApiPage, ContentError, ContentSource, PageCursor, TypeQuery};
use crate::content::Document;

const CURSOR_PREFIX: &str = "memory://page/";

pub struct MemorySource {
    pages: Vec<Vec<Document>>,
    fetched: Mutex<Vec<PageCursor>>,
}

impl MemorySource {
    /// Source whose query results are split into the given pages
    pub fn new(pages: Vec<Vec<Document>>) -> Self {
        Self {
            pages,
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Source holding every document on a single page
    pub fn single_page(documents: Vec<Document>) -> Self {
        Self::new(vec![documents])
    }

    pub fn cursor_for(index: usize) -> PageCursor {
        PageCursor::new(format!("{}{}", CURSOR_PREFIX, index))
    }

    /// Cursors followed so far, in order
    pub fn fetch_log(&self) -> Vec<PageCursor> {
        self.fetched
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn page(&self, index: usize) -> ApiPage {
        let results = self.pages.get(index).cloned().unwrap_or_default();
        let next_page = if index + 1 < self.pages.len() {
            Some(Self::cursor_for(index + 1))
        } else {
            None
        };
        ApiPage { results, next_page }
    }

    fn parse_cursor(cursor: &PageCursor) -> Option<usize> {
        cursor
            .as_str()
            .strip_prefix(CURSOR_PREFIX)
            .and_then(|index| index.parse().ok())
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn query_by_type(&self, query: &TypeQuery) -> Result<ApiPage, ContentError> {
        let mut page = self.page(0);
        page.results
            .retain(|doc| doc.doc_type == query.document_type);
        Ok(page)
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiPage, ContentError> {
        let index = Self::parse_cursor(cursor)
            .filter(|index| *index < self.pages.len())
            .ok_or_else(|| ContentError::InvalidCursor(cursor.to_string()))?;

        if let Ok(mut log) = self.fetched.lock() {
            log.push(cursor.clone());
        }
        Ok(self.page(index))
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document, ContentError> {
        self.pages
            .iter()
            .flatten()
            .find(|doc| doc.doc_type == doc_type && doc.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
