//! Rendered pages kept by the server, with their age

use axum::body::Bytes;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

struct StoredPage {
    html: Bytes,
    rendered_at: Instant,
}

/// Result of looking a route up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Rendered within the revalidation window
    Fresh(Bytes),
    /// Older than the window; still served while it is re-rendered
    Stale(Bytes),
    /// Never rendered
    Missing,
}

pub struct PageStore {
    pages: RwLock<HashMap<String, StoredPage>>,
    /// Routes being re-rendered right now
    in_flight: Mutex<HashSet<String>>,
    revalidate_after: Duration,
}

impl PageStore {
    pub fn new(revalidate_after: Duration) -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            revalidate_after,
        }
    }

    pub async fn lookup(&self, route: &str) -> Lookup {
        let pages = self.pages.read().await;
        match pages.get(route) {
            Some(page) if page.rendered_at.elapsed() < self.revalidate_after => {
                Lookup::Fresh(page.html.clone())
            }
            Some(page) => Lookup::Stale(page.html.clone()),
            None => Lookup::Missing,
        }
    }

    /// Store a freshly rendered page, replacing any previous version
    pub async fn insert(&self, route: impl Into<String>, html: impl Into<Bytes>) {
        self.pages.write().await.insert(
            route.into(),
            StoredPage {
                html: html.into(),
                rendered_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    /// Claim the re-render of `route`; `false` when another task already holds it
    pub async fn begin_revalidation(&self, route: &str) -> bool {
        self.in_flight.lock().await.insert(route.to_string())
    }

    pub async fn end_revalidation(&self, route: &str) {
        self.in_flight.lock().await.remove(route);
    }
}
