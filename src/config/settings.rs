//! Settings structures for SearXNG-API configuration

use crate::upstream::UpstreamInstance;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub cache: CacheSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with process environment variables
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    /// Merge overrides from an arbitrary variable source
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SEARXNG_URL") {
            self.upstream.instances = vec![val.trim().to_string()];
        }
        if let Some(val) = lookup("SEARXNG_INSTANCES") {
            let instances: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !instances.is_empty() {
                self.upstream.instances = instances;
            }
        }
        if let Some(val) = lookup("REDIS_URL") {
            let val = val.trim();
            self.cache.redis_url = (!val.is_empty()).then(|| val.to_string());
        }
        if let Some(val) = lookup("CACHE_ENABLED") {
            parse_into("CACHE_ENABLED", &val, &mut self.cache.enabled);
        }
        if let Some(val) = lookup("CACHE_TTL") {
            parse_into("CACHE_TTL", &val, &mut self.cache.ttl);
        }
        if let Some(val) = lookup("MAX_RESULTS") {
            parse_into("MAX_RESULTS", &val, &mut self.search.max_results);
        }
        if let Some(val) = lookup("MAX_ATTEMPTS") {
            parse_into("MAX_ATTEMPTS", &val, &mut self.upstream.max_attempts);
        }
        if let Some(val) = lookup("SHUFFLE_INSTANCES") {
            parse_into("SHUFFLE_INSTANCES", &val, &mut self.upstream.shuffle);
        }
        if let Some(val) = lookup("SEARCH_TIMEOUT") {
            parse_into("SEARCH_TIMEOUT", &val, &mut self.upstream.search_timeout);
        }
        if let Some(val) = lookup("HEALTH_TIMEOUT") {
            parse_into("HEALTH_TIMEOUT", &val, &mut self.upstream.health_timeout);
        }
        if let Some(val) = lookup("PORT") {
            parse_into("PORT", &val, &mut self.server.port);
        }
        if let Some(val) = lookup("BIND_ADDRESS") {
            self.server.bind_address = val;
        }
    }

    /// Check the settings describe a usable service
    pub fn validate(&self) -> Result<()> {
        if self.upstream.instances.is_empty() {
            bail!("At least one upstream SearXNG instance must be configured");
        }
        self.upstream.parsed_instances()?;
        if self.upstream.max_attempts == 0 {
            bail!("upstream.max_attempts must be at least 1");
        }
        if self.search.max_results == 0 {
            bail!("search.max_results must be at least 1");
        }
        if self.search.default_safesearch > 2 {
            bail!("search.default_safesearch must be 0, 1 or 2");
        }
        check_timeout("upstream.search_timeout", self.upstream.search_timeout)?;
        check_timeout("upstream.health_timeout", self.upstream.health_timeout)?;
        check_timeout("cache.connect_timeout", self.cache.connect_timeout)?;
        Ok(())
    }
}

fn positive_seconds(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|timeout| !timeout.is_zero())
}

fn seconds_or(secs: f64, fallback: u64) -> Duration {
    positive_seconds(secs).unwrap_or(Duration::from_secs(fallback))
}

fn check_timeout(name: &str, secs: f64) -> Result<()> {
    if positive_seconds(secs).is_none() {
        bail!("{} must be a positive number of seconds, got {}", name, secs);
    }
    Ok(())
}

fn parse_into<T: std::str::FromStr>(name: &str, raw: &str, target: &mut T) {
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => warn!("Ignoring invalid value for {}: {:?}", name, raw),
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Upstream SearXNG pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Base URLs of the SearXNG instances
    pub instances: Vec<String>,
    /// Maximum instances tried per request
    pub max_attempts: usize,
    /// Randomize the try order per request; when false the pool order is a
    /// fixed primary/backup sequence
    pub shuffle: bool,
    /// Search request timeout in seconds
    pub search_timeout: f64,
    /// Health probe timeout in seconds
    pub health_timeout: f64,
}

impl UpstreamSettings {
    /// Parse every configured instance URL
    pub fn parsed_instances(&self) -> Result<Vec<UpstreamInstance>> {
        self.instances
            .iter()
            .map(|raw| {
                UpstreamInstance::parse(raw)
                    .with_context(|| format!("Invalid upstream instance URL: {}", raw))
            })
            .collect()
    }

    pub fn search_timeout(&self) -> Duration {
        seconds_or(self.search_timeout, 30)
    }

    pub fn health_timeout(&self) -> Duration {
        seconds_or(self.health_timeout, 5)
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            instances: vec!["http://localhost:8080".to_string()],
            max_attempts: 5,
            shuffle: true,
            search_timeout: 30.0,
            health_timeout: 5.0,
        }
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Disable to skip caching entirely
    pub enabled: bool,
    /// Redis/Valkey connection string; in-process map when unset
    pub redis_url: Option<String>,
    /// Entry time-to-live in seconds
    pub ttl: u64,
    /// Redis connect timeout in seconds
    pub connect_timeout: f64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    pub fn connect_timeout(&self) -> Duration {
        seconds_or(self.connect_timeout, 5)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: None,
            ttl: 3600,
            connect_timeout: 5.0,
        }
    }
}

/// Search request defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Upper bound accepted for `limit`
    pub max_results: u32,
    /// Default `limit` for all categories except images
    pub default_limit: u32,
    /// Default `limit` for the images category
    pub default_images_limit: u32,
    /// Safe search level: 0 = off, 1 = moderate, 2 = strict
    pub default_safesearch: u8,
    /// Default language code
    pub default_language: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 100,
            default_limit: 10,
            default_images_limit: 20,
            default_safesearch: 1,
            default_language: "en".to_string(),
        }
    }
}
