// Telemetry collaborators: in-process metrics for /metrics and /stats, host
// resource sampling, and per-run experiment tracking. None is called from the
// match engine.

pub mod metrics;
pub mod system;
pub mod tracking;

pub use metrics::{MetricsCollector, StatsSnapshot};
pub use system::{spawn_system_sampler, SYSTEM_SAMPLE_INTERVAL};
pub use tracking::{spawn_log_run, ExperimentTracker, LogTracker, PgTracker, RunMetrics};
