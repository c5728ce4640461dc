//! Upstream instance addressing

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum InstanceUrlError {
    #[error(transparent)]
    Parse(#[from] url::ParseError),
    #[error("unsupported scheme '{0}', expected http or https")]
    Scheme(String),
}

/// Base URL of a SearXNG instance.
///
/// The stored URL always ends with `/` so relative endpoints such as
/// `search` resolve beneath it, including for instances mounted under a
/// sub-path like `https://example.org/searx`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamInstance {
    base: Url,
}

impl UpstreamInstance {
    /// Parse and normalize a base URL
    pub fn parse(raw: &str) -> Result<Self, InstanceUrlError> {
        let mut base = Url::parse(raw.trim())?;

        match base.scheme() {
            "http" | "https" => {}
            other => return Err(InstanceUrlError::Scheme(other.to_string())),
        }

        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    /// Resolve an endpoint path relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path.trim_start_matches('/'))
    }

    /// Base URL without the trailing slash, for display and logs
    pub fn as_str(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }
}

impl fmt::Display for UpstreamInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UpstreamInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
