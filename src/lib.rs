//! spacetraveling-rs: a small blog rendered from a headless content API
//!
//! Posts live in a Prismic repository. The generator renders a paginated
//! listing and one page per post into static HTML; the server serves the same
//! pages and re-renders them once they are older than the revalidation window.

pub mod client;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod listing;
pub mod server;
pub mod templates;

#[cfg(test)]
mod test_helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};

use client::{ContentSource, PrismicClient, TypeQuery};

/// Fields the listing needs from each post
pub const LISTING_FIELDS: &[&str] = &["title", "subtitle", "author"];

/// The blog application
#[derive(Debug, Clone)]
pub struct Spacetraveling {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Spacetraveling {
    /// Create a new instance from a directory
    ///
    /// Reads `_config.yml` when present, then applies `PRISMIC_*` environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// HTTP client for the configured Prismic repository
    pub fn content_source(&self) -> Result<PrismicClient> {
        Ok(PrismicClient::from_config(&self.config.prismic)?)
    }

    /// Query behind the listing: first page of posts, listing fields only
    pub fn listing_query(&self) -> TypeQuery {
        TypeQuery::new(&self.config.prismic.document_type)
            .fields(LISTING_FIELDS)
            .page_size(self.config.prismic.page_size)
    }

    /// Query enumerating the posts pre-rendered at build time
    pub fn paths_query(&self) -> TypeQuery {
        TypeQuery::new(&self.config.prismic.document_type)
    }

    /// Generate the static site
    pub async fn generate(&self, source: &dyn ContentSource) -> Result<()> {
        commands::generate::run(self, source).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
