//! Match Engine: blends dictionary skill coverage with TF-IDF similarity.
//!
//! `final = coverage% * 0.7 + similarity * 100 * 0.3`, rounded to 2 dp.
//! The engine is pure: telemetry and tracking are the caller's concern.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::extraction::extract_skills;
use crate::analysis::recommendations::generate_recommendations;
use crate::analysis::similarity::similarity;
use crate::analysis::tagger::PosTagger;
use crate::catalog::SkillCatalog;

/// Weight of exact dictionary coverage in the blended score.
pub const COVERAGE_WEIGHT: f64 = 0.7;
/// Weight of statistical similarity (scaled to 0–100) in the blended score.
pub const SIMILARITY_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0 – 100, 2 dp
    pub match_percentage: f64,
    pub cv_skills: Vec<String>,
    pub job_skills: Vec<String>,
    /// cv ∩ job, in job order
    pub matched_skills: Vec<String>,
    /// job − cv, in job order
    pub missing_skills: Vec<String>,
    /// 0 – 1, 4 dp
    pub similarity_score: f64,
    pub recommendations: Vec<String>,
}

/// Stateless per call; the catalog and tagger are shared read-only.
#[derive(Clone)]
pub struct MatchEngine {
    catalog: Arc<SkillCatalog>,
    tagger: Option<Arc<dyn PosTagger>>,
}

impl MatchEngine {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self {
            catalog,
            tagger: None,
        }
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn PosTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn tagger_name(&self) -> Option<&str> {
        self.tagger.as_deref().map(|t| t.name())
    }

    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        extract_skills(text, &self.catalog, self.tagger.as_deref())
    }

    pub fn analyze_match(&self, cv_text: &str, job_text: &str) -> MatchResult {
        let cv_skills = self.extract_skills(cv_text);
        let job_skills = self.extract_skills(job_text);

        let cv_set: HashSet<&str> = cv_skills.iter().map(String::as_str).collect();
        let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = job_skills
            .iter()
            .cloned()
            .partition(|skill| cv_set.contains(skill.as_str()));

        let coverage = if job_skills.is_empty() {
            0.0
        } else {
            matched_skills.len() as f64 / job_skills.len() as f64 * 100.0
        };

        let similarity_score = similarity(cv_text, job_text);
        let final_score = coverage * COVERAGE_WEIGHT + similarity_score * 100.0 * SIMILARITY_WEIGHT;

        debug!(
            cv_skills = cv_skills.len(),
            job_skills = job_skills.len(),
            matched = matched_skills.len(),
            coverage,
            similarity_score,
            "match analyzed"
        );

        let recommendations = generate_recommendations(&missing_skills);

        MatchResult {
            match_percentage: round_to(final_score, 2).clamp(0.0, 100.0),
            cv_skills,
            job_skills,
            matched_skills,
            missing_skills,
            similarity_score: round_to(similarity_score, 4),
            recommendations,
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::recommendations::ALIGNED_MESSAGE;
    use crate::analysis::tagger::RuleTagger;

    const SCENARIO_CV: &str =
        "Software Engineer with Python, JavaScript, React, Docker, AWS, machine learning, agile";
    const SCENARIO_JOB: &str = "Senior Software Engineer requiring Python, React, AWS, Docker, \
        Kubernetes, machine learning, agile methodologies, 3+ years experience";

    fn engine() -> MatchEngine {
        MatchEngine::new(Arc::new(SkillCatalog::default_catalog()))
    }

    fn assert_partition(result: &MatchResult) {
        let job: HashSet<&String> = result.job_skills.iter().collect();
        let matched: HashSet<&String> = result.matched_skills.iter().collect();
        let missing: HashSet<&String> = result.missing_skills.iter().collect();
        assert!(matched.is_disjoint(&missing));
        assert_eq!(matched.union(&missing).copied().collect::<HashSet<_>>(), job);
    }

    #[test]
    fn test_empty_inputs() {
        let result = engine().analyze_match("", "");
        assert_eq!(result.match_percentage, 0.0);
        assert!(result.cv_skills.is_empty());
        assert!(result.job_skills.is_empty());
        assert_eq!(result.similarity_score, 0.0);
        assert_eq!(result.recommendations, vec![ALIGNED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_scenario_software_engineer() {
        let result = engine().analyze_match(SCENARIO_CV, SCENARIO_JOB);

        for skill in ["python", "react", "aws", "docker", "machine learning", "agile"] {
            assert!(
                result.matched_skills.contains(&skill.to_string()),
                "{skill} missing from {:?}",
                result.matched_skills
            );
        }
        assert!(result.missing_skills.contains(&"kubernetes".to_string()));
        assert!(result.match_percentage > 50.0, "Score was {}", result.match_percentage);
        assert_eq!(result.recommendations.len(), 3);
        assert_eq!(
            result.recommendations[0],
            "Consider highlighting experience with: kubernetes"
        );
        assert_partition(&result);
    }

    #[test]
    fn test_score_follows_blend_formula() {
        let result = engine().analyze_match(SCENARIO_CV, SCENARIO_JOB);
        let coverage =
            result.matched_skills.len() as f64 / result.job_skills.len() as f64 * 100.0;
        let expected = coverage * 0.7 + result.similarity_score * 100.0 * 0.3;
        // similarity_score is itself rounded to 4 dp.
        assert!((result.match_percentage - expected).abs() < 0.01);
    }

    #[test]
    fn test_identical_documents() {
        let result = engine().analyze_match(SCENARIO_JOB, SCENARIO_JOB);
        assert!((result.similarity_score - 1.0).abs() < 1e-9);
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.match_percentage, 100.0);
        assert_eq!(result.recommendations, vec![ALIGNED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        let result = engine().analyze_match(
            "Pastry chef baking croissants and sourdough",
            "Kubernetes operator needed for cluster upgrades",
        );
        assert_eq!(result.similarity_score, 0.0);
        assert!(result.matched_skills.is_empty());
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_missing_order_follows_catalog_and_caps_at_five() {
        let job = "scrum, agile, jenkins, git, redis, mongodb, python, kanban";
        let result = engine().analyze_match("nothing here", job);
        assert_eq!(
            result.missing_skills,
            vec!["python", "mongodb", "redis", "git", "jenkins", "agile", "scrum", "kanban"]
        );
        assert_eq!(result.recommendations.len(), 4);
        assert_eq!(
            result.recommendations[0],
            "Consider highlighting experience with: python, mongodb, redis, git, jenkins"
        );
        assert_eq!(
            result.recommendations[3],
            "Focus on the most important skills: python, mongodb, redis"
        );
    }

    #[test]
    fn test_job_without_catalog_terms_has_zero_coverage() {
        let result = engine().analyze_match("python developer", "barista wanted");
        assert!(result.job_skills.is_empty());
        assert!(result.match_percentage <= 30.0);
    }

    #[test]
    fn test_bounds_hold_with_tagger() {
        let engine = engine().with_tagger(Arc::new(RuleTagger));
        assert_eq!(engine.tagger_name(), Some("rule"));
        let result = engine.analyze_match(SCENARIO_CV, SCENARIO_JOB);
        assert!((0.0..=100.0).contains(&result.match_percentage));
        assert!((0.0..=1.0).contains(&result.similarity_score));
        assert!(result.cv_skills.contains(&"Python".to_string()));
        assert_partition(&result);
    }

    #[test]
    fn test_custom_catalog_injection() {
        let catalog = SkillCatalog::from_categories(vec![("tech", vec!["rust", "tokio"])]);
        let engine = MatchEngine::new(Arc::new(catalog));
        let result = engine.analyze_match("Rust services", "Rust and Tokio");
        assert_eq!(result.job_skills, vec!["rust", "tokio"]);
        assert_eq!(result.matched_skills, vec!["rust"]);
        assert_eq!(result.missing_skills, vec!["tokio"]);
    }
}
