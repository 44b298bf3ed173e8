use std::sync::Arc;

use crate::analysis::MatchEngine;
use crate::config::Config;
use crate::enhancement::NarrativeEnhancer;
use crate::telemetry::{ExperimentTracker, MetricsCollector};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchEngine>,
    /// `None` when no LLM API key is configured.
    pub enhancer: Option<Arc<dyn NarrativeEnhancer>>,
    pub metrics: Arc<MetricsCollector>,
    /// LogTracker by default, PgTracker when DATABASE_URL is set.
    pub tracker: Arc<dyn ExperimentTracker>,
    pub config: Config,
}
