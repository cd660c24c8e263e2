//! Metric names. The crate records through the `metrics` facade; the host
//! process installs whatever recorder or exporter it runs.

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: reserve attempts. Labels: status (ok or an error code).
pub const RESERVES_TOTAL: &str = "alcove_reserves_total";

/// Histogram: reserve latency in seconds, pre-flight included.
pub const RESERVE_DURATION_SECONDS: &str = "alcove_reserve_duration_seconds";

/// Counter: cancel attempts. Labels: status.
pub const CANCELS_TOTAL: &str = "alcove_cancels_total";

/// Counter: reserves rejected on window overlap.
pub const CONFLICTS_TOTAL: &str = "alcove_conflicts_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Counter: id allocator redraws after a collision.
pub const ID_RETRIES_TOTAL: &str = "alcove_id_retries_total";

/// Gauge: live date partitions in the booking store.
pub const PARTITIONS_ACTIVE: &str = "alcove_partitions_active";

/// Counter: partitions dropped by the sweeper.
pub const PARTITIONS_SWEPT_TOTAL: &str = "alcove_partitions_swept_total";

/// Counter: space lookups answered from the read-through cache.
pub const DIRECTORY_CACHE_HITS_TOTAL: &str = "alcove_directory_cache_hits_total";

/// Counter: space lookups that went to the directory.
pub const DIRECTORY_CACHE_MISSES_TOTAL: &str = "alcove_directory_cache_misses_total";
