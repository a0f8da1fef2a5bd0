//! Content module - documents from the content API and the post models built from them

mod document;
mod post;
pub mod richtext;

pub use document::{parse_timestamp, Document};
pub use post::{Banner, ContentSection, PostDetail, PostSummary};
pub use richtext::Block;
