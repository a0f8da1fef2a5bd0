//! Blog server with stale-while-revalidate pages
//!
//! Pages are rendered up front the same way `generate` renders them, kept in a
//! [`PageStore`], and re-rendered in the background once they are older than
//! the configured revalidation window. Posts that were not pre-rendered are
//! rendered on their first request.

mod store;

pub use store::{Lookup, PageStore};

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::client::{ContentError, ContentSource};
use crate::generator::{Generator, RenderedPage};
use crate::helpers::{post_path, INDEX_ROUTE};
use crate::templates::STYLESHEET;
use crate::Spacetraveling;

/// Server state
pub struct ServerState {
    generator: Generator,
    source: Arc<dyn ContentSource>,
    pages: PageStore,
}

impl ServerState {
    /// Render the listing and the pre-built posts into a fresh store
    pub async fn prepare(site: &Spacetraveling, source: Arc<dyn ContentSource>) -> Result<Arc<Self>> {
        let generator = Generator::new(site)?;
        let pages = PageStore::new(site.config.revalidate_after());

        for page in generator.build(source.as_ref()).await? {
            pages.insert(page.route, page.html).await;
        }
        tracing::info!("Pre-rendered {} pages", pages.len().await);

        Ok(Arc::new(Self {
            generator,
            source,
            pages,
        }))
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }
}

/// A page the server knows how to render
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Index,
    Post(String),
}

impl Target {
    fn route(&self) -> String {
        match self {
            Target::Index => INDEX_ROUTE.to_string(),
            Target::Post(uid) => post_path(uid),
        }
    }
}

/// Routes served by the blog
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/post/:uid", get(post_handler))
        .route("/css/style.css", get(stylesheet_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server
pub async fn start(
    site: &Spacetraveling,
    source: Arc<dyn ContentSource>,
    ip: &str,
    port: u16,
    open: bool,
) -> Result<()> {
    let state = ServerState::prepare(site, source).await?;
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!(
        "Pages revalidate after {}s. Press Ctrl+C to stop.",
        site.config.revalidate
    );

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    serve(&state, Target::Index).await
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(uid): Path<String>,
) -> Response {
    serve(&state, Target::Post(uid)).await
}

async fn stylesheet_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLESHEET,
    )
}

async fn serve(state: &Arc<ServerState>, target: Target) -> Response {
    let route = target.route();
    match state.pages.lookup(&route).await {
        Lookup::Fresh(html) => Html(html).into_response(),
        Lookup::Stale(html) => {
            spawn_revalidation(Arc::clone(state), target, route).await;
            Html(html).into_response()
        }
        Lookup::Missing => render_missing(state, target, route).await,
    }
}

async fn render(state: &ServerState, target: &Target) -> Result<RenderedPage> {
    let source = state.source.as_ref();
    match target {
        Target::Index => state.generator.build_index(source).await,
        Target::Post(uid) => state.generator.build_post(source, uid).await,
    }
}

/// Render a page nobody asked for yet, or the placeholder if that fails
async fn render_missing(state: &ServerState, target: Target, route: String) -> Response {
    match render(state, &target).await {
        Ok(page) => {
            tracing::info!("Rendered {} on first request", route);
            let html = Bytes::from(page.html);
            state.pages.insert(route, html.clone()).await;
            Html(html).into_response()
        }
        Err(e) => {
            let not_found = e
                .downcast_ref::<ContentError>()
                .is_some_and(ContentError::is_not_found);
            if not_found {
                tracing::debug!("No page for {}: {}", route, e);
            } else {
                tracing::warn!("Failed to render {}: {:#}", route, e);
            }
            placeholder(state)
        }
    }
}

/// Re-render a stale page in the background, once per route at a time
async fn spawn_revalidation(state: Arc<ServerState>, target: Target, route: String) {
    if !state.pages.begin_revalidation(&route).await {
        return;
    }

    tokio::spawn(async move {
        tracing::debug!("Revalidating {}", route);
        match render(&state, &target).await {
            Ok(page) => state.pages.insert(page.route, page.html).await,
            Err(e) => tracing::warn!("Revalidation of {} failed, keeping stale page: {:#}", route, e),
        }
        state.pages.end_revalidation(&route).await;
    });
}

fn placeholder(state: &ServerState) -> Response {
    match state.generator.render_loading() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render placeholder: {:#}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
