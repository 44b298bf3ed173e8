mod analysis;
mod catalog;
mod config;
mod db;
mod enhancement;
mod errors;
mod llm_client;
mod routes;
mod state;
mod telemetry;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{MatchEngine, RuleTagger};
use crate::catalog::SkillCatalog;
use crate::config::{Config, TaggerKind};
use crate::db::create_tracking_pool;
use crate::enhancement::{LlmNarrativeEnhancer, NarrativeEnhancer};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::telemetry::{
    spawn_system_sampler, ExperimentTracker, LogTracker, MetricsCollector, PgTracker,
    SYSTEM_SAMPLE_INTERVAL,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Skill catalog (falls back to the built-in taxonomy)
    let catalog = Arc::new(SkillCatalog::load(&config.skills_catalog_path));
    info!(
        "Skill catalog loaded: {} categories, {} terms",
        catalog.categories().len(),
        catalog.len()
    );

    let mut engine = MatchEngine::new(catalog);
    if config.pos_tagger == TaggerKind::Rule {
        engine = engine.with_tagger(Arc::new(RuleTagger));
    }
    info!(
        "Match engine ready (tagger: {})",
        engine.tagger_name().unwrap_or("none")
    );

    let enhancer: Option<Arc<dyn NarrativeEnhancer>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("AI enhancement enabled (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmNarrativeEnhancer::new(llm)))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; AI enhancement disabled");
            None
        }
    };

    let tracker = build_tracker(&config).await;
    info!("Experiment tracker: {}", tracker.name());

    let metrics = Arc::new(MetricsCollector::new());
    spawn_system_sampler(metrics.clone(), SYSTEM_SAMPLE_INTERVAL);

    let state = AppState {
        engine: Arc::new(engine),
        enhancer,
        metrics,
        tracker,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            ))),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL tracker when DATABASE_URL is set and reachable, structured logs otherwise.
async fn build_tracker(config: &Config) -> Arc<dyn ExperimentTracker> {
    let Some(url) = &config.database_url else {
        return Arc::new(LogTracker);
    };

    let pool = match create_tracking_pool(url).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!("Experiment tracking database unavailable, logging runs instead: {e:#}");
            return Arc::new(LogTracker);
        }
    };

    match PgTracker::new(pool).await {
        Ok(tracker) => Arc::new(tracker),
        Err(e) => {
            warn!("Failed to prepare tracking table, logging runs instead: {e}");
            Arc::new(LogTracker)
        }
    }
}
