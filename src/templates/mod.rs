//! Built-in theme templates using the Tera template engine
//!
//! Templates and the stylesheet are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Stylesheet served at `/css/style.css`
pub const STYLESHEET: &str = include_str!("theme/style.css");

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Titles, authors and headings come from the content API and must be escaped;
        // rendered rich text is marked `safe` in the templates
        tera.autoescape_on(vec![".html"]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("loading.html", include_str!("theme/loading.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelsData {
    pub home_title: String,
    pub load_more: String,
    pub loading: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCardData {
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: Option<String>,
    pub datetime: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub posts: Vec<PostCardData>,
    pub next_page: Option<String>,
}

/// Settings the "load more" script needs to render fetched documents
#[derive(Debug, Clone, Serialize)]
pub struct ScriptConfigData {
    pub timezone: String,
    pub months: Vec<String>,
    pub post_prefix: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub title: String,
    pub author: String,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub reading_time: String,
    pub banner_url: Option<String>,
    pub banner_alt: String,
    pub sections: Vec<SectionData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt-BR".to_string(),
            version: "0.0.0".to_string(),
        }
    }

    fn labels() -> LabelsData {
        LabelsData {
            home_title: "Home".to_string(),
            load_more: "Carregar mais posts".to_string(),
            loading: "Carregando...".to_string(),
        }
    }

    #[test]
    fn test_loading_template() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("labels", &labels());
        let html = renderer.render("loading.html", &context).unwrap();
        assert!(html.contains("Carregando..."));
        assert!(html.contains("<title>spacetraveling</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/css/style.css">"#));
    }

    #[test]
    fn test_index_escapes_titles_and_hides_button_without_cursor() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("labels", &labels());
        context.insert(
            "listing",
            &ListingData {
                posts: vec![PostCardData {
                    path: "/post/x".to_string(),
                    title: "<b>Bold</b>".to_string(),
                    subtitle: String::new(),
                    author: "Ana".to_string(),
                    date: None,
                    datetime: None,
                }],
                next_page: None,
            },
        );
        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains("&lt;b&gt;Bold&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<time"));
        assert!(!html.contains("load-more"));
    }
}
