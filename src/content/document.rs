//! Raw API documents and their validation into post models

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::richtext::{self, Block, ImageBlock};
use super::{Banner, ContentSection, PostDetail, PostSummary};
use crate::client::ContentError;

/// Publication timestamps look like `2021-03-15T19:25:28+0000`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// A document exactly as returned by the content API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type")]
    pub doc_type: String,

    #[serde(default)]
    pub first_publication_date: Option<String>,

    #[serde(default)]
    pub last_publication_date: Option<String>,

    /// Custom type fields, validated on conversion
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A text field, either key text or rich text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum TextField {
    Plain(String),
    Rich(Vec<Block>),
}

impl TextField {
    fn into_text(self) -> String {
        match self {
            TextField::Plain(text) => text,
            TextField::Rich(blocks) => richtext::as_text(&blocks),
        }
    }
}

/// The listing fields only; the body is never parsed for a summary
#[derive(Debug, Deserialize)]
struct SummaryFields {
    #[serde(default)]
    title: Option<TextField>,
    #[serde(default)]
    subtitle: Option<TextField>,
    #[serde(default)]
    author: Option<TextField>,
}

#[derive(Debug, Deserialize)]
struct PostFields {
    #[serde(default)]
    title: Option<TextField>,
    #[serde(default)]
    subtitle: Option<TextField>,
    #[serde(default)]
    author: Option<TextField>,
    /// An empty image field arrives as `{}`
    #[serde(default)]
    banner: Option<ImageBlock>,
    #[serde(default)]
    content: Option<Vec<SectionFields>>,
}

#[derive(Debug, Deserialize)]
struct SectionFields {
    #[serde(default)]
    heading: Option<TextField>,
    #[serde(default)]
    body: Option<Vec<Block>>,
}

impl Document {
    /// Validate into a listing summary
    pub fn to_summary(&self) -> Result<PostSummary, ContentError> {
        let (uid, first_publication_date, fields) = self.validate::<SummaryFields>()?;
        let title = self.required_title(fields.title)?;

        Ok(PostSummary {
            uid,
            first_publication_date,
            title,
            subtitle: text_or_empty(fields.subtitle),
            author: text_or_empty(fields.author),
        })
    }

    /// Validate into a full post
    pub fn to_detail(&self) -> Result<PostDetail, ContentError> {
        let (uid, first_publication_date, fields) = self.validate::<PostFields>()?;
        let title = self.required_title(fields.title)?;

        let banner = fields
            .banner
            .filter(|image| !image.url.is_empty())
            .map(|image| Banner {
                url: image.url,
                alt: image.alt,
            });

        let content = fields
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|section| ContentSection {
                heading: text_or_empty(section.heading),
                body: section.body.unwrap_or_default(),
            })
            .collect();

        Ok(PostDetail {
            uid,
            first_publication_date,
            title,
            subtitle: text_or_empty(fields.subtitle),
            author: text_or_empty(fields.author),
            banner,
            content,
        })
    }

    fn validate<F: DeserializeOwned>(
        &self,
    ) -> Result<(String, Option<DateTime<Utc>>, F), ContentError> {
        let uid = match self.uid.as_deref().map(str::trim) {
            Some(uid) if is_valid_uid(uid) => uid.to_string(),
            Some(uid) => {
                return Err(ContentError::invalid_document(
                    &self.id,
                    format!("invalid uid {:?}", uid),
                ))
            }
            None => return Err(ContentError::invalid_document(&self.id, "missing uid")),
        };

        let first_publication_date = self
            .first_publication_date
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .map_err(|e| ContentError::invalid_document(&self.id, e))?;

        let fields: F = serde_json::from_value(self.data.clone())
            .map_err(|e| ContentError::invalid_document(&self.id, e))?;

        Ok((uid, first_publication_date, fields))
    }

    fn required_title(&self, title: Option<TextField>) -> Result<String, ContentError> {
        title
            .map(TextField::into_text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ContentError::invalid_document(&self.id, "missing title"))
    }
}

fn text_or_empty(field: Option<TextField>) -> String {
    field.map(TextField::into_text).unwrap_or_default()
}

/// A uid must be usable as a single path segment
fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty() && uid != "." && uid != ".." && !uid.contains('/') && !uid.contains('\\')
}

/// Parse an API timestamp, accepting RFC 3339 as well
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp {:?}: {}", value, e))
}
