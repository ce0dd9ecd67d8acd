//! GradeFlow API adapters.

pub mod client;
pub mod dto;
pub mod image_transport;
pub mod path_resolver;

pub use client::GradeFlowApiClient;
pub use image_transport::ReqwestImageTransport;
pub use path_resolver::ApiPathResolver;

use reqwest::Url;

const USER_AGENT: &str = concat!("gradeflow-avatar/", env!("CARGO_PKG_VERSION"));

/// Parses an `http(s)` base URL, adding the trailing slash that makes
/// relative paths join below it instead of replacing its last segment.
pub(crate) fn normalize_base_url(base_url: &str) -> Option<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}
