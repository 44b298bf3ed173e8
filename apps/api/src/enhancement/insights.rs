//! Parses a free-form model reply into structured insight sections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiInsights {
    pub detailed_assessment: String,
    pub critical_gaps: Vec<String>,
    pub key_strengths: Vec<String>,
    pub specific_recommendations: Vec<String>,
    pub interview_tips: Vec<String>,
    pub raw_response: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Assessment,
    Gaps,
    Strengths,
    Recommendations,
    Interview,
}

const ITEM_PREFIXES: &[&str] = &["-", "•", "1.", "2.", "3."];

/// Heading lines switch the current section; assessment prose is joined with
/// spaces, other sections collect bullet/numbered lines with markers stripped.
pub fn parse_insights(response: &str) -> AiInsights {
    let mut insights = AiInsights {
        raw_response: response.to_string(),
        ..AiInsights::default()
    };
    let mut current: Option<Section> = None;

    for line in response.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(section) = heading(line) {
            current = Some(section);
            continue;
        }

        match current {
            Some(Section::Assessment) => {
                insights.detailed_assessment.push_str(line);
                insights.detailed_assessment.push(' ');
            }
            Some(section) if ITEM_PREFIXES.iter().any(|p| line.starts_with(p)) => {
                let item = line.trim_start_matches(|c: char| "-•123456789. ".contains(c));
                if !item.is_empty() {
                    list_mut(&mut insights, section).push(item.to_string());
                }
            }
            _ => {}
        }
    }

    insights.detailed_assessment = insights.detailed_assessment.trim().to_string();
    insights
}

fn heading(line: &str) -> Option<Section> {
    let upper = line.to_uppercase();
    if upper.contains("DETAILED ASSESSMENT") {
        Some(Section::Assessment)
    } else if upper.contains("GAPS") {
        Some(Section::Gaps)
    } else if upper.contains("STRENGTHS") {
        Some(Section::Strengths)
    } else if upper.contains("RECOMMENDATIONS") {
        Some(Section::Recommendations)
    } else if upper.contains("INTERVIEW") {
        Some(Section::Interview)
    } else {
        None
    }
}

fn list_mut(insights: &mut AiInsights, section: Section) -> &mut Vec<String> {
    match section {
        Section::Gaps => &mut insights.critical_gaps,
        Section::Strengths => &mut insights.key_strengths,
        Section::Recommendations => &mut insights.specific_recommendations,
        // Assessment is prose and never reaches here; keep it with interview tips.
        Section::Interview | Section::Assessment => &mut insights.interview_tips,
    }
}
