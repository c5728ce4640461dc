//! Metrics collection module
//!
//! Tracks upstream instance attempts, error rates and response times.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Response times kept per instance
const RESPONSE_TIME_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct InstanceCounters {
    successes: u64,
    failures: u64,
    response_times: Vec<u64>,
}

/// Per-instance statistics shared by all requests
#[derive(Debug, Default)]
pub struct Metrics {
    /// Searches answered from upstream
    total_searches: AtomicU64,
    /// Searches answered from cache
    cache_hits: AtomicU64,
    instances: RwLock<BTreeMap<String, InstanceCounters>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    // Counters stay usable after a poisoning panic.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, InstanceCounters>> {
        self.instances.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, InstanceCounters>> {
        self.instances.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Increment upstream search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment cache hit count
    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful attempt and its response time
    pub fn record_success(&self, instance: &str, time_ms: u64) {
        let mut instances = self.write();
        let entry = instances.entry(instance.to_string()).or_default();
        entry.successes += 1;

        if entry.response_times.len() >= RESPONSE_TIME_WINDOW {
            entry.response_times.remove(0);
        }
        entry.response_times.push(time_ms);
    }

    /// Record a failed attempt
    pub fn record_failure(&self, instance: &str) {
        let mut instances = self.write();
        instances.entry(instance.to_string()).or_default().failures += 1;
    }

    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn get_cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Get average response time for an instance
    pub fn get_avg_response_time(&self, instance: &str) -> Option<u64> {
        self.read().get(instance).and_then(avg_response_time)
    }

    /// Get reliability percentage for an instance
    pub fn get_reliability(&self, instance: &str) -> f64 {
        self.read().get(instance).map(reliability).unwrap_or(100.0)
    }

    /// Snapshot of every instance seen so far
    pub fn snapshot(&self) -> StatsSnapshot {
        let instances = self
            .read()
            .iter()
            .map(|(name, counters)| {
                (
                    name.clone(),
                    InstanceStats {
                        attempts: counters.successes + counters.failures,
                        successes: counters.successes,
                        failures: counters.failures,
                        avg_response_time_ms: avg_response_time(counters),
                        reliability: reliability(counters),
                    },
                )
            })
            .collect();

        StatsSnapshot {
            total_searches: self.get_total_searches(),
            cache_hits: self.get_cache_hits(),
            instances,
        }
    }
}

fn avg_response_time(counters: &InstanceCounters) -> Option<u64> {
    let times = &counters.response_times;
    if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<u64>() / times.len() as u64)
    }
}

fn reliability(counters: &InstanceCounters) -> f64 {
    let total = counters.successes + counters.failures;
    if total == 0 {
        100.0
    } else {
        (counters.successes as f64 / total as f64) * 100.0
    }
}

/// Statistics for a single instance
#[derive(Debug, Clone, Serialize)]
pub struct InstanceStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub avg_response_time_ms: Option<u64>,
    pub reliability: f64,
}

/// Body of the `/stats` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total_searches: u64,
    pub cache_hits: u64,
    pub instances: BTreeMap<String, InstanceStats>,
}
