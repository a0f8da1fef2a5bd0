//! Helper functions shared by the views
//!
//! Date formatting, HTML escaping, routes and the reading time estimate.

mod date;
mod html;
pub mod reading_time;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
