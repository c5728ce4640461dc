//! Raw SearXNG JSON API types

use serde::{Deserialize, Serialize};

/// Body of a SearXNG `/search?format=json` response.
///
/// Every field is optional so partially populated or older instances still
/// decode; defaults are applied when the response is formatted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub number_of_results: Option<f64>,
    #[serde(default)]
    pub results: Vec<RawResult>,
    #[serde(default)]
    pub search_duration: Option<f64>,
    #[serde(default)]
    pub engines: Option<Vec<serde_json::Value>>,
}

impl RawResponse {
    /// Engine names listed at the top level, if the instance reports them
    pub fn engine_names(&self) -> Option<Vec<String>> {
        self.engines.as_ref().map(|engines| {
            engines
                .iter()
                .filter_map(|e| e.as_str().map(String::from))
                .collect()
        })
    }

    /// Total result count reported by the instance
    pub fn total(&self) -> u64 {
        self.number_of_results
            .filter(|n| n.is_finite() && *n > 0.0)
            .map(|n| n as u64)
            .unwrap_or(0)
    }
}

/// A single entry of the upstream `results` array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, rename = "publishedDate")]
    pub published_date: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail_src: Option<String>,
}

/// Outcome of probing an instance's health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Unreachable,
    Unhealthy,
    Healthy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_searxng_body() {
        let body = json!({
            "query": "rust",
            "number_of_results": 1234,
            "results": [{
                "title": "Rust",
                "url": "https://www.rust-lang.org/",
                "content": "A language empowering everyone",
                "engine": "duckduckgo",
                "score": 2.5,
                "publishedDate": null,
                "category": "general"
            }],
            "answers": [],
            "unresponsive_engines": [["google", "timeout"]]
        });

        let raw: RawResponse = serde_json::from_value(body).unwrap();
        assert_eq!(raw.total(), 1234);
        assert_eq!(raw.results.len(), 1);
        assert_eq!(raw.results[0].engine.as_deref(), Some("duckduckgo"));
        assert!(raw.results[0].published_date.is_none());
        assert!(raw.engine_names().is_none());
    }

    #[test]
    fn test_engine_names_skip_non_strings() {
        let raw: RawResponse =
            serde_json::from_value(json!({"engines": ["bing", ["x"], "brave"]})).unwrap();
        assert_eq!(raw.engine_names().unwrap(), vec!["bing", "brave"]);
    }

    #[test]
    fn test_status_ordering() {
        assert!(InstanceStatus::Healthy > InstanceStatus::Unhealthy);
        assert!(InstanceStatus::Unhealthy > InstanceStatus::Unreachable);
    }
}
