//! Search query and response models

use crate::cache::cache_key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Search vertical, mapped onto SearXNG's `categories` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    News,
    Images,
    Videos,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::News,
        Category::Images,
        Category::Videos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::News => "news",
            Self::Images => "images",
            Self::Videos => "videos",
        }
    }

    /// Whether results in this category carry thumbnails
    pub fn has_thumbnails(&self) -> bool {
        matches!(self, Self::Images)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search query string
    pub query: String,
    /// Search vertical
    pub category: Category,
    /// Maximum number of results returned
    pub limit: u32,
    /// Safe search level (0, 1, 2)
    pub safesearch: u8,
    /// Language code
    pub language: String,
}

impl SearchQuery {
    /// Create a query with default limit, safe search and language
    pub fn new(query: impl Into<String>, category: Category) -> Self {
        Self {
            query: query.into(),
            category,
            limit: 10,
            safesearch: 1,
            language: "en".to_string(),
        }
    }

    /// Set result limit
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set safe search
    pub fn with_safesearch(mut self, level: u8) -> Self {
        self.safesearch = level.min(2);
        self
    }

    /// Set language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Cache key identifying this query's response
    pub fn cache_key(&self) -> String {
        cache_key(
            &self.query,
            self.category,
            [
                ("limit", self.limit.to_string()),
                ("safesearch", self.safesearch.to_string()),
                ("language", self.language.clone()),
            ],
        )
    }
}

/// A single normalized search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Content snippet
    #[serde(default)]
    pub content: Option<String>,
    /// Engine that returned this result
    pub engine: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, rename = "publishedDate")]
    pub published_date: Option<String>,
    /// Only ever set for image results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Response body shared by every search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    /// Results in upstream order
    pub results: Vec<SearchResult>,
    /// Total result count reported upstream
    pub total: u64,
    /// Search time in seconds
    pub time: f64,
    #[serde(default)]
    pub cached: bool,
    pub engines: Vec<String>,
}
