//! Resolves avatar references against the API server.

use reqwest::Url;

use super::normalize_base_url;
use crate::domain::entities::ImageReference;
use crate::domain::ports::PathResolver;

/// Joins server-relative references onto the API base URL.
///
/// Absolute `http(s)` references pass through; anything else that does not
/// join into an `http(s)` URL is unresolvable.
#[derive(Debug, Clone)]
pub struct ApiPathResolver {
    base: Option<Url>,
}

impl ApiPathResolver {
    /// Creates a resolver for `base_url`, normalized the same way the API
    /// client normalizes it. An unusable base resolves only absolute
    /// references.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: normalize_base_url(base_url),
        }
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

impl PathResolver for ApiPathResolver {
    fn resolve(&self, reference: &ImageReference) -> Option<String> {
        let raw = reference.as_str();

        if let Ok(absolute) = Url::parse(raw) {
            return is_http(&absolute).then(|| absolute.to_string());
        }

        let base = self.base.as_ref()?;
        base.join(raw)
            .ok()
            .filter(is_http)
            .map(|url| url.to_string())
    }
}
