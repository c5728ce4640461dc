//! Normalization of upstream results

use super::models::{Category, SearchQuery, SearchResponse, SearchResult};
use crate::upstream::{RawResponse, RawResult};
use std::collections::HashSet;
use std::time::Duration;

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_ENGINE: &str = "unknown";

/// Map one raw result into the canonical shape
pub fn format_result(raw: &RawResult, category: Category) -> SearchResult {
    let thumbnail = if category.has_thumbnails() {
        raw.thumbnail.clone().or_else(|| raw.thumbnail_src.clone())
    } else {
        None
    };

    SearchResult {
        title: raw
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        url: raw.url.clone().unwrap_or_default(),
        content: raw.content.clone().or_else(|| raw.abstract_text.clone()),
        engine: raw
            .engine
            .clone()
            .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        score: raw.score,
        published_date: raw.published_date.clone(),
        thumbnail,
    }
}

/// Map every raw result, keeping upstream order
pub fn format_results(raw: &[RawResult], category: Category) -> Vec<SearchResult> {
    raw.iter().map(|r| format_result(r, category)).collect()
}

/// Distinct engine names in first-seen order
fn contributing_engines(results: &[SearchResult]) -> Vec<String> {
    let mut seen = HashSet::new();
    results
        .iter()
        .filter(|r| seen.insert(r.engine.as_str()))
        .map(|r| r.engine.clone())
        .collect()
}

/// Build the response for a query from an upstream answer.
///
/// Results are truncated to the query limit after formatting. `elapsed` is
/// used as the search time when the instance does not report one.
pub fn build_response(query: &SearchQuery, raw: &RawResponse, elapsed: Duration) -> SearchResponse {
    let mut results = format_results(&raw.results, query.category);
    let engines = raw
        .engine_names()
        .unwrap_or_else(|| contributing_engines(&results));
    results.truncate(query.limit as usize);

    SearchResponse {
        query: query.query.clone(),
        results,
        total: raw.total(),
        time: raw.search_duration.unwrap_or_else(|| elapsed.as_secs_f64()),
        cached: false,
        engines,
    }
}
