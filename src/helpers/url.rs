//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in a single path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Route of the listing page
pub const INDEX_ROUTE: &str = "/";

/// Route of a post page
///
/// # Examples
/// ```ignore
/// post_path("como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_path(uid: &str) -> String {
    format!("/post/{}", utf8_percent_encode(uid, PATH_SEGMENT))
}

/// Output file, relative to the public directory, for a route
///
/// # Examples
/// ```ignore
/// route_file("/") // -> "index.html"
/// route_file("/post/hooks") // -> "post/hooks/index.html"
/// ```
pub fn route_file(route: &str) -> String {
    let route = route.trim_matches('/');
    if route.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", route)
    }
}
