//! Configuration module

mod site;

pub use site::PrismicConfig;
pub use site::ReadingTimeConfig;
pub use site::ReadingTimePolicy;
pub use site::SiteConfig;
pub use site::{ACCESS_TOKEN_ENV, ENDPOINT_ENV};
