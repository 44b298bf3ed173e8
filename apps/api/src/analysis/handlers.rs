//! Axum route handlers for the Analysis API.

use std::fmt::Display;
use std::time::Instant;

use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analysis::engine::MatchResult;
use crate::analysis::report::{render_summary, skill_breakdown, SkillStatusRow};
use crate::catalog::SkillCategory;
use crate::enhancement::{EnhancementOutcome, UNAVAILABLE_MESSAGE};
use crate::errors::AppError;
use crate::state::AppState;
use crate::telemetry::{spawn_log_run, MetricsCollector, RunMetrics};

const MISSING_INPUT_MESSAGE: &str = "Please provide both CV text and job description.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub cv_text: String,
    pub job_text: String,
    #[serde(default)]
    pub use_ai_enhancement: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub result: MatchResult,
    pub summary: String,
    pub skill_breakdown: Vec<SkillStatusRow>,
    pub processing_time_secs: f64,
    pub ai_enhanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhancement: Option<EnhancementOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub cv_text: String,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub tips: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse<'a> {
    pub categories: &'a [SkillCategory],
    /// Flattened matching order used by extraction.
    pub terms: Vec<&'a str>,
    pub total_terms: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Scores a CV against a job description and optionally layers AI insights on top.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = run_analysis(
        &state,
        request.cv_text,
        request.job_text,
        request.use_ai_enhancement,
        Instant::now(),
    )
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/analyze/upload
///
/// Multipart form: `cv` (PDF file), `job_text`, optional `use_ai_enhancement`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let started = Instant::now();
    let mut cv_pdf = None;
    let mut job_text = String::new();
    let mut use_ai_enhancement = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read cv upload: {e}")))?;
                cv_pdf = Some(bytes.to_vec());
            }
            "job_text" => {
                job_text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read job_text: {e}")))?;
            }
            "use_ai_enhancement" => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read use_ai_enhancement: {e}"))
                })?;
                use_ai_enhancement = parse_flag(&value);
            }
            _ => {}
        }
    }

    let cv_pdf = cv_pdf.ok_or_else(|| AppError::Validation("Missing 'cv' PDF file".to_string()))?;
    let cv_text = extract_pdf_text(cv_pdf, &state.metrics).await?;

    let report = run_analysis(&state, cv_text, job_text, use_ai_enhancement, started).await?;
    Ok(Json(report))
}

/// POST /api/v1/analyze/cover-letter-tips
pub async fn handle_cover_letter_tips(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    validate_inputs(&request.cv_text, &request.job_text)?;

    let tips = match &state.enhancer {
        Some(enhancer) => enhancer
            .cover_letter_tips(&request.cv_text, &request.job_text)
            .await
            .map_err(|e| AppError::Llm(format!("Cover letter tips generation failed: {e}")))?,
        None => UNAVAILABLE_MESSAGE.to_string(),
    };

    Ok(Json(CoverLetterResponse { tips }))
}

/// GET /api/v1/catalog
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<serde_json::Value> {
    let catalog = state.engine.catalog();
    Json(serde_json::json!(CatalogResponse {
        categories: catalog.categories(),
        terms: catalog.all_terms(),
        total_terms: catalog.len(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

async fn run_analysis(
    state: &AppState,
    cv_text: String,
    job_text: String,
    use_ai_enhancement: bool,
    started: Instant,
) -> Result<AnalysisReport, AppError> {
    validate_inputs(&cv_text, &job_text)?;

    let engine = state.engine.clone();
    let (result, cv_text, job_text) = tokio::task::spawn_blocking(move || {
        let result = engine.analyze_match(&cv_text, &job_text);
        (result, cv_text, job_text)
    })
    .await
    .map_err(|e| {
        error!("Analysis failed: {e}");
        state.metrics.record_error("analysis_failed");
        AppError::Internal(anyhow!("analysis task failed: {e}"))
    })?;

    let enhancement = if use_ai_enhancement {
        Some(match &state.enhancer {
            Some(enhancer) => enhancer.enhance(&cv_text, &job_text, &result).await,
            None => EnhancementOutcome::unavailable(),
        })
    } else {
        None
    };

    let processing_time_secs = started.elapsed().as_secs_f64();
    state.metrics.record_analysis(
        result.match_percentage,
        processing_time_secs,
        cv_text.len(),
        job_text.len(),
        use_ai_enhancement,
    );
    spawn_log_run(
        state.tracker.clone(),
        RunMetrics::from_result(&state.config.experiment_name, &result),
    );

    info!(
        match_percentage = result.match_percentage,
        matched = result.matched_skills.len(),
        missing = result.missing_skills.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        summary: render_summary(&result, processing_time_secs, use_ai_enhancement),
        skill_breakdown: skill_breakdown(&result),
        result,
        processing_time_secs,
        ai_enhanced: use_ai_enhancement,
        enhancement,
    })
}

fn validate_inputs(cv_text: &str, job_text: &str) -> Result<(), AppError> {
    if cv_text.trim().is_empty() || job_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }
    Ok(())
}

async fn extract_pdf_text(bytes: Vec<u8>, metrics: &MetricsCollector) -> Result<String, AppError> {
    run_pdf_extraction(move || pdf_extract::extract_text_from_mem(&bytes), metrics).await
}

/// Runs a PDF text extractor off the runtime. Both a parse error and a panic
/// inside the extractor mean the upload is unreadable: 422, counted as an error.
async fn run_pdf_extraction<F, E>(extract: F, metrics: &MetricsCollector) -> Result<String, AppError>
where
    F: FnOnce() -> Result<String, E> + Send + 'static,
    E: Display + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(extract)
        .await
        .map_err(|e| format!("extractor aborted ({e})"))
        .and_then(|res| res.map_err(|e| e.to_string()));

    outcome.map_err(|reason| {
        error!("PDF extraction failed: {reason}");
        metrics.record_error("pdf_extraction_failed");
        AppError::UnprocessableEntity(format!("Could not read CV PDF: {reason}"))
    })
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
