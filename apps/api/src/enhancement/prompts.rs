// Prompt constants for narrative enhancement.

pub const ANALYST_SYSTEM: &str = "You are an expert HR analyst and career advisor. \
    Give clear, specific, actionable insights that help both the candidate and the hiring manager. \
    Use the exact section headings requested and list items as '-' bullets.";

/// Replace: {match_percentage}, {matched_skills}, {missing_skills}, {cv_excerpt}, {job_excerpt}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following CV and job description match.

BASIC ANALYSIS RESULTS:
- Match Score: {match_percentage}%
- Matched Skills: {matched_skills}
- Missing Skills: {missing_skills}

CV TEXT (first 500 chars):
{cv_excerpt}...

JOB DESCRIPTION (first 500 chars):
{job_excerpt}...

Please provide:
1. DETAILED ASSESSMENT: Analyze the candidate's fit beyond just keyword matching
2. SKILL GAPS: Identify the most critical missing skills and why they matter
3. STRENGTHS: Highlight the candidate's strongest points for this role
4. RECOMMENDATIONS: Specific, actionable advice to improve the match
5. INTERVIEW TIPS: What the candidate should emphasize if they get an interview"#;

/// Replace: {cv_excerpt}, {job_excerpt}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Based on this CV and job description, provide 3-5 specific tips for writing a compelling cover letter:

CV: {cv_excerpt}...
Job: {job_excerpt}...

Focus on:
- Key achievements to highlight
- How to address potential gaps
- Specific language to use
- Company/role-specific angles"#;

pub const ANALYSIS_EXCERPT_CHARS: usize = 500;
pub const COVER_LETTER_EXCERPT_CHARS: usize = 300;
