//! Deterministic recommendation text derived from the missing-skill list.

pub const ALIGNED_MESSAGE: &str = "Your CV shows excellent alignment with the job requirements!";
pub const PROJECTS_MESSAGE: &str = "Add relevant projects or certifications for missing skills";
pub const KEYWORDS_MESSAGE: &str = "Tailor your CV to include keywords from the job description";

const HIGHLIGHT_LIMIT: usize = 5;
const FOCUS_LIMIT: usize = 3;

/// `missing` is expected in catalog declaration order; "first N" follows it.
pub fn generate_recommendations(missing: &[String]) -> Vec<String> {
    if missing.is_empty() {
        return vec![ALIGNED_MESSAGE.to_string()];
    }

    let mut recommendations = vec![
        format!(
            "Consider highlighting experience with: {}",
            join_first(missing, HIGHLIGHT_LIMIT)
        ),
        PROJECTS_MESSAGE.to_string(),
        KEYWORDS_MESSAGE.to_string(),
    ];

    if missing.len() > HIGHLIGHT_LIMIT {
        recommendations.push(format!(
            "Focus on the most important skills: {}",
            join_first(missing, FOCUS_LIMIT)
        ));
    }

    recommendations
}

fn join_first(skills: &[String], n: usize) -> String {
    skills
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
