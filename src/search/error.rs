//! Search failure types

use crate::upstream::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Every attempted instance failed; one entry per attempt, in attempt order
    #[error("all {} attempted upstream instances failed", .failures.len())]
    AllInstancesFailed { failures: Vec<UpstreamError> },
}

impl SearchError {
    /// Human-readable reason for each failed attempt
    pub fn failure_messages(&self) -> Vec<String> {
        match self {
            Self::AllInstancesFailed { failures } => {
                failures.iter().map(ToString::to_string).collect()
            }
        }
    }
}
