//! Listing accumulator - the post list behind "load more"
//!
//! A [`Listing`] starts from the first page of a query and grows one page per
//! [`Listing::load_more`] call until the content API stops returning a cursor.
//! It keeps documents in fetch order and never deduplicates them.

use crate::client::{ApiPage, ContentError, ContentSource, PageCursor, TypeQuery};
use crate::content::{Document, PostSummary};

#[derive(Debug, Clone, Default)]
pub struct Listing {
    posts: Vec<PostSummary>,
    next_page: Option<PageCursor>,
}

impl Listing {
    pub fn new(posts: Vec<PostSummary>, next_page: Option<PageCursor>) -> Self {
        Self { posts, next_page }
    }

    /// Build from an already fetched first page
    pub fn from_page(page: ApiPage) -> Result<Self, ContentError> {
        Ok(Self {
            posts: summaries(&page.results)?,
            next_page: page.next_page,
        })
    }

    /// Fetch the first page of `query`
    pub async fn first_page(
        source: &dyn ContentSource,
        query: &TypeQuery,
    ) -> Result<Self, ContentError> {
        let page = source.query_by_type(query).await?;
        Self::from_page(page)
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&PageCursor> {
        self.next_page.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fetch the page at the current cursor and append it
    ///
    /// Returns the number of posts appended; without a cursor nothing is
    /// fetched and 0 is returned. On error the listing is left untouched.
    pub async fn load_more(&mut self, source: &dyn ContentSource) -> Result<usize, ContentError> {
        let Some(cursor) = &self.next_page else {
            return Ok(0);
        };

        let page = source.fetch_page(cursor).await?;
        let mut fetched = summaries(&page.results)?;
        let count = fetched.len();

        self.posts.append(&mut fetched);
        self.next_page = page.next_page;
        tracing::debug!(
            "Loaded {} more posts ({} total, more: {})",
            count,
            self.posts.len(),
            self.has_more()
        );

        Ok(count)
    }

    /// Keep loading until the cursor runs out
    pub async fn load_all(&mut self, source: &dyn ContentSource) -> Result<usize, ContentError> {
        let mut total = 0;
        while self.has_more() {
            total += self.load_more(source).await?;
        }
        Ok(total)
    }
}

/// Validate every document before any of them is used
fn summaries(documents: &[Document]) -> Result<Vec<PostSummary>, ContentError> {
    documents.iter().map(Document::to_summary).collect()
}
