//! Per-instance failure types

use thiserror::Error;

/// A single upstream instance failed to answer a request.
///
/// Every variant is treated the same by the dispatcher: the instance is
/// skipped and the next candidate is tried.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{instance}: request timed out")]
    Timeout { instance: String },

    #[error("{instance}: HTTP {status}")]
    Status { instance: String, status: u16 },

    #[error("{instance}: {source}")]
    Transport {
        instance: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{instance}: invalid response: {source}")]
    Decode {
        instance: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{instance}: invalid endpoint: {source}")]
    Endpoint {
        instance: String,
        #[source]
        source: url::ParseError,
    },
}

impl UpstreamError {
    /// Build from a reqwest error, separating timeouts from other transport failures
    pub fn from_reqwest(instance: impl Into<String>, source: reqwest::Error) -> Self {
        let instance = instance.into();
        if source.is_timeout() {
            Self::Timeout { instance }
        } else if source.is_decode() {
            Self::Decode { instance, source }
        } else {
            Self::Transport { instance, source }
        }
    }

    /// Instance that produced the failure
    pub fn instance(&self) -> &str {
        match self {
            Self::Timeout { instance }
            | Self::Status { instance, .. }
            | Self::Transport { instance, .. }
            | Self::Decode { instance, .. }
            | Self::Endpoint { instance, .. } => instance,
        }
    }
}
