//! Generator module - renders the listing and post pages using built-in Tera templates

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

use tera::Context;

use crate::client::ContentSource;
use crate::content::{PostDetail, PostSummary};
use crate::helpers::{date_xml, post_path, publication_date, route_file, INDEX_ROUTE};
use crate::i18n::I18n;
use crate::listing::Listing;
use crate::templates::{
    LabelsData, ListingData, PostCardData, PostPageData, ScriptConfigData, SectionData, SiteData,
    TemplateRenderer, STYLESHEET,
};
use crate::Spacetraveling;

/// A rendered page and the route it is served at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub route: String,
    pub html: String,
}

/// Static site generator using Tera templates
pub struct Generator {
    site: Spacetraveling,
    renderer: TemplateRenderer,
    i18n: I18n,
    timezone: chrono_tz::Tz,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Spacetraveling) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let i18n = I18n::new(&site.config.language)?;
        let timezone = site.config.tz();

        Ok(Self {
            site: site.clone(),
            renderer,
            i18n,
            timezone,
        })
    }

    pub fn site(&self) -> &Spacetraveling {
        &self.site
    }

    /// Render every page and write the site to the public directory
    ///
    /// Returns the number of HTML pages written.
    pub async fn generate(&self, source: &dyn ContentSource) -> Result<usize> {
        let pages = self.build(source).await?;

        fs::create_dir_all(&self.site.public_dir)?;
        for page in &pages {
            self.write_page(page)?;
        }

        let css_path = self.site.public_dir.join("css/style.css");
        if let Some(parent) = css_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&css_path, STYLESHEET)?;

        Ok(pages.len())
    }

    /// Render the listing and every pre-built post
    pub async fn build(&self, source: &dyn ContentSource) -> Result<Vec<RenderedPage>> {
        let mut pages = vec![self.build_index(source).await?];

        let uids = self.static_paths(source).await?;
        tracing::info!("Pre-rendering {} posts", uids.len());
        for uid in uids {
            pages.push(self.build_post(source, &uid).await?);
        }

        Ok(pages)
    }

    /// Fetch the first listing page and render the index
    pub async fn build_index(&self, source: &dyn ContentSource) -> Result<RenderedPage> {
        let listing = Listing::first_page(source, &self.site.listing_query()).await?;
        Ok(RenderedPage {
            route: INDEX_ROUTE.to_string(),
            html: self.render_index(&listing)?,
        })
    }

    /// Uids of the posts rendered at build time; the rest render on first request
    pub async fn static_paths(&self, source: &dyn ContentSource) -> Result<Vec<String>> {
        let page = source.query_by_type(&self.site.paths_query()).await?;
        let uids = page
            .results
            .iter()
            .map(|doc| doc.to_summary().map(|summary| summary.uid))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(uids)
    }

    /// Fetch one post and render it
    pub async fn build_post(&self, source: &dyn ContentSource, uid: &str) -> Result<RenderedPage> {
        let document = source
            .get_by_uid(&self.site.config.prismic.document_type, uid)
            .await?;
        let post = document.to_detail()?;
        Ok(RenderedPage {
            route: post_path(&post.uid),
            html: self.render_post(&post)?,
        })
    }

    /// Write a rendered page below the public directory
    pub fn write_page(&self, page: &RenderedPage) -> Result<PathBuf> {
        let output_path = self.site.public_dir.join(route_file(&page.route));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, &page.html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(output_path)
    }

    /// Render the listing page
    pub fn render_index(&self, listing: &Listing) -> Result<String> {
        let listing_data = ListingData {
            posts: listing.posts().iter().map(|p| self.post_card(p)).collect(),
            next_page: listing.next_page().map(|c| c.to_string()),
        };
        let script_config = ScriptConfigData {
            timezone: self.timezone.name().to_string(),
            months: self.i18n.months(),
            post_prefix: "/post/".to_string(),
        };

        let mut context = self.create_base_context();
        context.insert("listing", &listing_data);
        context.insert("script_config", &script_config);

        self.renderer.render("index.html", &context)
    }

    /// Render a post page
    ///
    /// Output depends only on `post` and the configuration.
    pub fn render_post(&self, post: &PostDetail) -> Result<String> {
        let (date, datetime) = self.dates(post.first_publication_date);
        let reading_time = post.reading_time(&self.site.config.reading_time);

        let page = PostPageData {
            title: post.title.clone(),
            author: post.author.clone(),
            date,
            datetime,
            reading_time: self.i18n.get_count("post.reading_time", reading_time),
            banner_url: post.banner.as_ref().map(|b| b.url.clone()),
            banner_alt: post
                .banner
                .as_ref()
                .and_then(|b| b.alt.clone())
                .unwrap_or_else(|| self.i18n.get_with("post.banner_alt", &post.title)),
            sections: post
                .content
                .iter()
                .map(|section| SectionData {
                    heading: section.heading.clone(),
                    html: section.body_html(),
                })
                .collect(),
        };

        let mut context = self.create_base_context();
        context.insert("post", &page);

        self.renderer.render("post.html", &context)
    }

    /// Render the placeholder shown while a post cannot be resolved
    pub fn render_loading(&self) -> Result<String> {
        self.renderer
            .render("loading.html", &self.create_base_context())
    }

    fn create_base_context(&self) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                language: config.language.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        );
        context.insert(
            "labels",
            &LabelsData {
                home_title: self.i18n.get("home.title"),
                load_more: self.i18n.get("home.load_more"),
                loading: self.i18n.get("post.loading"),
            },
        );
        context
    }

    fn post_card(&self, post: &PostSummary) -> PostCardData {
        let (date, datetime) = self.dates(post.first_publication_date);
        PostCardData {
            path: post_path(&post.uid),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date,
            datetime,
        }
    }

    /// Display date and machine-readable date
    fn dates(&self, date: Option<DateTime<Utc>>) -> (Option<String>, Option<String>) {
        match date {
            Some(date) => (
                Some(publication_date(&date, &self.timezone, &self.i18n.months())),
                Some(date_xml(&date.with_timezone(&self.timezone))),
            ),
            None => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemorySource;
    use crate::config::SiteConfig;
    use crate::test_helpers::{post_document, summary_document};

    fn site(dir: &std::path::Path) -> Spacetraveling {
        Spacetraveling::with_config(dir, SiteConfig::default())
    }

    fn source() -> MemorySource {
        MemorySource::new(vec![
            vec![
                post_document("como-utilizar-hooks", "Como utilizar Hooks", &[("Intro", "Hooks")]),
                post_document("criando-um-app", "Criando um app CRA do zero", &[("CRA", "App")]),
            ],
            vec![post_document("mais-um", "Mais um", &[("Fim", "Tchau")])],
        ])
    }

    #[tokio::test]
    async fn test_generate_writes_site() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();

        let count = generator.generate(&source()).await.unwrap();
        assert_eq!(count, 3);

        let public = dir.path().join("public");
        let index = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(index.contains("Como utilizar Hooks"));
        assert!(index.contains(r#"href="/post/criando-um-app""#));
        assert!(index.contains("Carregar mais posts"));
        assert!(index.contains("memory:&#x2F;&#x2F;page&#x2F;1"));
        assert!(!index.contains("Mais um"));

        assert!(public.join("post/como-utilizar-hooks/index.html").exists());
        assert!(public.join("post/criando-um-app/index.html").exists());
        // Beyond the first page: rendered on demand
        assert!(!public.join("post/mais-um/index.html").exists());
        assert!(public.join("css/style.css").exists());
    }

    #[tokio::test]
    async fn test_index_without_more_pages_has_no_button() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();
        let source = MemorySource::single_page(vec![summary_document("only", "Only")]);

        let page = generator.build_index(&source).await.unwrap();
        assert_eq!(page.route, "/");
        assert!(page.html.contains("Only"));
        assert!(page.html.contains("15 mar 2021"));
        assert!(!page.html.contains("Carregar mais posts"));
    }

    #[tokio::test]
    async fn test_build_fails_on_unknown_post() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();
        let err = generator.build_post(&source(), "nope").await.unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_build_fails_on_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();
        let broken = serde_json::from_value(serde_json::json!({
            "id": "broken", "type": "post", "data": {"title": "No uid"}
        }))
        .unwrap();
        let source = MemorySource::single_page(vec![broken]);
        assert!(generator.generate(&source).await.is_err());
        assert!(!dir.path().join("public/index.html").exists());
    }

    #[tokio::test]
    async fn test_render_post() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();
        let intro = "word ".repeat(149);
        let more = "palavra ".repeat(200);
        let post = post_document(
            "como-utilizar-hooks",
            "Como utilizar Hooks",
            &[("Intro", intro.as_str()), ("Mais", more.as_str())],
        )
        .to_detail()
        .unwrap();

        let html = generator.render_post(&post).unwrap();
        assert!(html.contains("<title>Como utilizar Hooks | spacetraveling</title>"));
        assert!(html.contains("<h2>Intro</h2>"));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains("Joseph Oliveira"));
        // 150 + 201 words
        assert!(html.contains("3 min"));
        assert!(html.contains(r#"alt="banner Como utilizar Hooks""#));
    }

    #[tokio::test]
    async fn test_render_post_is_pure() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();
        let post = post_document("x", "X", &[("A", "b")]).to_detail().unwrap();
        assert_eq!(
            generator.render_post(&post).unwrap(),
            generator.render_post(&post).unwrap()
        );
    }

    #[test]
    fn test_render_post_without_date() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();
        let mut post = post_document("x", "X", &[("A", "b")]).to_detail().unwrap();
        post.first_publication_date = None;
        let html = generator.render_post(&post).unwrap();
        assert!(!html.contains("<time"));
        assert!(html.contains("1 min"));
    }

    #[test]
    fn test_render_loading() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&site(dir.path())).unwrap();
        assert!(generator.render_loading().unwrap().contains("Carregando..."));
    }
}
