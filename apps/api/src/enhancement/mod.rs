//! Narrative enhancement: optional, additive prose layered on a finished
//! `MatchResult`. Never changes scores or skill lists, and never fails the
//! analysis: every failure becomes `EnhancementOutcome::Failed`.

pub mod insights;
pub mod prompts;

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analysis::engine::MatchResult;
use crate::llm_client::{CallOptions, LlmClient, LlmError, MODEL};

use self::insights::{parse_insights, AiInsights};
use self::prompts::{
    ANALYSIS_EXCERPT_CHARS, ANALYSIS_PROMPT_TEMPLATE, ANALYST_SYSTEM,
    COVER_LETTER_EXCERPT_CHARS, COVER_LETTER_PROMPT_TEMPLATE,
};

pub const UNAVAILABLE_MESSAGE: &str = "AI enhancement not available";

const ANALYSIS_OPTIONS: CallOptions = CallOptions {
    max_tokens: 1000,
    temperature: 0.3,
};

const COVER_LETTER_OPTIONS: CallOptions = CallOptions {
    max_tokens: 500,
    temperature: 0.4,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnhancementOutcome {
    Insights {
        insights: AiInsights,
        processing_time_secs: f64,
        model: String,
    },
    Unavailable {
        message: String,
    },
    Failed {
        error: String,
    },
}

impl EnhancementOutcome {
    pub fn unavailable() -> Self {
        EnhancementOutcome::Unavailable {
            message: UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

#[async_trait]
pub trait NarrativeEnhancer: Send + Sync {
    async fn enhance(&self, cv_text: &str, job_text: &str, result: &MatchResult)
        -> EnhancementOutcome;

    async fn cover_letter_tips(&self, cv_text: &str, job_text: &str) -> Result<String, LlmError>;
}

/// Enhancer backed by the hosted LLM.
pub struct LlmNarrativeEnhancer {
    llm: LlmClient,
}

impl LlmNarrativeEnhancer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl NarrativeEnhancer for LlmNarrativeEnhancer {
    async fn enhance(
        &self,
        cv_text: &str,
        job_text: &str,
        result: &MatchResult,
    ) -> EnhancementOutcome {
        let prompt = build_analysis_prompt(cv_text, job_text, result);
        let started = Instant::now();

        match self.llm.call_text(&prompt, ANALYST_SYSTEM, ANALYSIS_OPTIONS).await {
            Ok(reply) => {
                let processing_time_secs = started.elapsed().as_secs_f64();
                info!(processing_time_secs, "AI enhancement completed");
                EnhancementOutcome::Insights {
                    insights: parse_insights(&reply),
                    processing_time_secs,
                    model: MODEL.to_string(),
                }
            }
            Err(e) => {
                error!("AI enhancement failed: {e}");
                EnhancementOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn cover_letter_tips(&self, cv_text: &str, job_text: &str) -> Result<String, LlmError> {
        let prompt = COVER_LETTER_PROMPT_TEMPLATE
            .replace("{cv_excerpt}", &excerpt(cv_text, COVER_LETTER_EXCERPT_CHARS))
            .replace("{job_excerpt}", &excerpt(job_text, COVER_LETTER_EXCERPT_CHARS));
        self.llm
            .call_text(&prompt, ANALYST_SYSTEM, COVER_LETTER_OPTIONS)
            .await
    }
}

pub fn build_analysis_prompt(cv_text: &str, job_text: &str, result: &MatchResult) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{match_percentage}", &format!("{:.1}", result.match_percentage))
        .replace("{matched_skills}", &result.matched_skills.join(", "))
        .replace("{missing_skills}", &result.missing_skills.join(", "))
        .replace("{cv_excerpt}", &excerpt(cv_text, ANALYSIS_EXCERPT_CHARS))
        .replace("{job_excerpt}", &excerpt(job_text, ANALYSIS_EXCERPT_CHARS))
}

/// First `max_chars` characters (not bytes).
fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
