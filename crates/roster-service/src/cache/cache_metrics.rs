//! Cache metrics emitted through the `metrics` facade.

use metrics::{counter, describe_counter};

/// Metric names for the read-through cache.
pub mod names {
    /// Lookups answered from the store.
    pub const CACHE_HITS_TOTAL: &str = "roster_cache_hits_total";
    /// Lookups that had to compute.
    pub const CACHE_MISSES_TOTAL: &str = "roster_cache_misses_total";
    /// Store operations that failed and were degraded around.
    pub const CACHE_DEGRADED_TOTAL: &str = "roster_cache_degraded_total";
    /// Explicit invalidations.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "roster_cache_invalidations_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(
        names::CACHE_DEGRADED_TOTAL,
        "Total number of cache store failures served without the cache"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of explicit cache invalidations"
    );
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    pub fn miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record a failed store operation (`get`, `set` or `delete`).
    pub fn degraded(operation: &'static str) {
        counter!(names::CACHE_DEGRADED_TOTAL, "operation" => operation).increment(1);
    }

    pub fn invalidated(removed: bool) {
        counter!(
            names::CACHE_INVALIDATIONS_TOTAL,
            "removed" => if removed { "true" } else { "false" }
        )
        .increment(1);
    }
}
