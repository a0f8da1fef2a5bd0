//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::richtext::{self, Block};
use crate::config::ReadingTimeConfig;
use crate::helpers::reading_time;

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Unique, URL-safe identifier
    pub uid: String,

    /// First publication date, `None` for documents never published
    pub first_publication_date: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A full post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// Banner image
    pub banner: Option<Banner>,

    /// Ordered content sections
    pub content: Vec<ContentSection>,
}

impl PostDetail {
    /// The listing view of this post
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            uid: self.uid.clone(),
            first_publication_date: self.first_publication_date,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
        }
    }

    /// Estimated reading time in minutes
    pub fn reading_time(&self, config: &ReadingTimeConfig) -> usize {
        reading_time::estimate(&self.content, config.words_per_minute, config.policy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
    pub alt: Option<String>,
}

/// A heading followed by rich-text body blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub heading: String,
    pub body: Vec<Block>,
}

impl ContentSection {
    pub fn body_html(&self) -> String {
        richtext::as_html(&self.body)
    }

    pub fn body_text(&self) -> String {
        richtext::as_text(&self.body)
    }
}
