//! List posts

use anyhow::Result;

use crate::client::ContentSource;
use crate::content::PostSummary;
use crate::listing::Listing;
use crate::Spacetraveling;

/// Print the first page of posts, or every page with `all`
pub async fn run(site: &Spacetraveling, source: &dyn ContentSource, all: bool) -> Result<()> {
    let mut listing = Listing::first_page(source, &site.listing_query()).await?;
    if all {
        listing.load_all(source).await?;
    }

    print!("{}", format_listing(&listing));
    Ok(())
}

fn format_listing(listing: &Listing) -> String {
    let mut out = format!("Posts ({}):\n", listing.posts().len());
    for post in listing.posts() {
        out.push_str(&format_post(post));
        out.push('\n');
    }
    if listing.has_more() {
        out.push_str("  ... more available (use --all)\n");
    }
    out
}

fn format_post(post: &PostSummary) -> String {
    let date = post
        .first_publication_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unpublished".to_string());
    format!("  {} - {} [{}]", date, post.title, post.uid)
}
