//! Human-readable rendering of a `MatchResult`: a Markdown summary and a
//! per-skill matched/missing breakdown.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::analysis::engine::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    Matched,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillStatusRow {
    pub skill: String,
    pub status: SkillStatus,
}

/// One row per job skill, in job-skill order.
pub fn skill_breakdown(result: &MatchResult) -> Vec<SkillStatusRow> {
    result
        .job_skills
        .iter()
        .map(|skill| SkillStatusRow {
            skill: skill.clone(),
            status: if result.matched_skills.contains(skill) {
                SkillStatus::Matched
            } else {
                SkillStatus::Missing
            },
        })
        .collect()
}

pub fn render_summary(result: &MatchResult, processing_secs: f64, ai_enhanced: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## Match Analysis Results\n");
    let _ = writeln!(
        out,
        "**Overall Match Score: {:.1}%**\n",
        result.match_percentage
    );

    let _ = writeln!(out, "### Matched Skills ({})", result.matched_skills.len());
    let _ = writeln!(out, "{}\n", join_or(&result.matched_skills, "None found"));

    let _ = writeln!(out, "### Missing Skills ({})", result.missing_skills.len());
    let _ = writeln!(out, "{}\n", join_or(&result.missing_skills, "None"));

    let _ = writeln!(out, "### Recommendations");
    for rec in &result.recommendations {
        let _ = writeln!(out, "- {rec}");
    }

    let _ = writeln!(out, "\n### Technical Details");
    let _ = writeln!(out, "- **Similarity Score:** {:.4}", result.similarity_score);
    let _ = writeln!(out, "- **CV Skills Found:** {}", result.cv_skills.len());
    let _ = writeln!(out, "- **Job Skills Required:** {}", result.job_skills.len());
    let _ = writeln!(out, "- **Processing Time:** {processing_secs:.2}s");
    let _ = writeln!(
        out,
        "- **AI Enhanced:** {}",
        if ai_enhanced { "Yes" } else { "No" }
    );

    out
}

fn join_or(skills: &[String], empty: &str) -> String {
    if skills.is_empty() {
        empty.to_string()
    } else {
        skills.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> MatchResult {
        MatchResult {
            match_percentage: 72.456,
            cv_skills: vec!["python".into(), "react".into()],
            job_skills: vec!["python".into(), "kubernetes".into()],
            matched_skills: vec!["python".into()],
            missing_skills: vec!["kubernetes".into()],
            similarity_score: 0.41234,
            recommendations: vec!["Consider highlighting experience with: kubernetes".into()],
        }
    }

    #[test]
    fn test_breakdown_marks_each_job_skill() {
        let rows = skill_breakdown(&result());
        assert_eq!(
            rows,
            vec![
                SkillStatusRow {
                    skill: "python".into(),
                    status: SkillStatus::Matched
                },
                SkillStatusRow {
                    skill: "kubernetes".into(),
                    status: SkillStatus::Missing
                },
            ]
        );
    }

    #[test]
    fn test_summary_contains_scores_and_lists() {
        let summary = render_summary(&result(), 0.1234, false);
        assert!(summary.contains("**Overall Match Score: 72.5%**"));
        assert!(summary.contains("### Matched Skills (1)\npython"));
        assert!(summary.contains("### Missing Skills (1)\nkubernetes"));
        assert!(summary.contains("- Consider highlighting experience with: kubernetes"));
        assert!(summary.contains("**Similarity Score:** 0.4123"));
        assert!(summary.contains("**Processing Time:** 0.12s"));
        assert!(summary.contains("**AI Enhanced:** No"));
    }

    #[test]
    fn test_summary_empty_lists_use_placeholders() {
        let mut r = result();
        r.matched_skills.clear();
        r.missing_skills.clear();
        let summary = render_summary(&r, 0.0, true);
        assert!(summary.contains("### Matched Skills (0)\nNone found"));
        assert!(summary.contains("### Missing Skills (0)\nNone\n"));
        assert!(summary.contains("**AI Enhanced:** Yes"));
    }
}
