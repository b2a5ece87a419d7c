//! Telemetry metric name constants.
//!
//! Centralised metric names for skald operations. Hosts install their own
//! `metrics` recorder; without a recorder installed, all metric calls are
//! no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `skald_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai", "ollama")
//! - `status` — outcome: "ok" or "error"

/// Total requests dispatched to a provider.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "skald_requests_total";

/// Total response-cache hits.
pub const CACHE_HITS_TOTAL: &str = "skald_cache_hits_total";

/// Total response-cache misses.
pub const CACHE_MISSES_TOTAL: &str = "skald_cache_misses_total";

/// Total responses dropped because a newer request superseded them.
pub const STALE_DROPS_TOTAL: &str = "skald_stale_drops_total";

/// Total trigger-pattern events emitted by the suggestion engine.
pub const TRIGGERS_TOTAL: &str = "skald_triggers_total";
