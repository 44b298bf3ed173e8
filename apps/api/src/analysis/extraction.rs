//! Skill extraction: dictionary pass over the catalog plus an optional
//! noun-enrichment pass driven by a part-of-speech tagger.
//!
//! Dictionary matching is a raw case-insensitive substring test, not a
//! word-boundary match: a short term inside a longer word (`java` in
//! `javascript`) still counts.

use std::collections::HashSet;

use tracing::debug;

use crate::analysis::tagger::PosTagger;
use crate::catalog::SkillCatalog;

/// Nouns that contain catalog terms often enough to be noise.
const ENRICHMENT_STOP_LIST: &[&str] = &["experience", "work", "company"];

/// Tokens must be longer than this (in chars) to be considered for enrichment.
const MIN_ENRICHMENT_TOKEN_CHARS: usize = 2;

/// Extracts the skill set of `text`.
///
/// Order: catalog hits in catalog declaration order, then enrichment tokens in
/// order of first appearance. Duplicates (exact string equality) removed.
pub fn extract_skills(
    text: &str,
    catalog: &SkillCatalog,
    tagger: Option<&dyn PosTagger>,
) -> Vec<String> {
    let mut found = SkillAccumulator::default();

    if text.is_empty() {
        return found.into_vec();
    }

    let text_lower = text.to_lowercase();
    for (term, term_lower) in catalog.terms_with_lowercase() {
        if text_lower.contains(term_lower) {
            found.push(term);
        }
    }

    match tagger {
        Some(tagger) if tagger.is_available() => enrich_from_nouns(text, catalog, tagger, &mut found),
        Some(tagger) => debug!(tagger = tagger.name(), "Tagger unavailable, skipping enrichment"),
        None => {}
    }

    found.into_vec()
}

fn enrich_from_nouns(
    text: &str,
    catalog: &SkillCatalog,
    tagger: &dyn PosTagger,
    found: &mut SkillAccumulator,
) {
    for token in tagger.tag(text) {
        if !token.pos.is_noun() || token.text.chars().count() <= MIN_ENRICHMENT_TOKEN_CHARS {
            continue;
        }

        let token_lower = token.text.to_lowercase();
        if ENRICHMENT_STOP_LIST.contains(&token_lower.as_str()) {
            continue;
        }

        if catalog
            .terms_with_lowercase()
            .any(|(_, term_lower)| token_lower.contains(term_lower))
        {
            found.push(&token.text);
        }
    }
}

/// Insertion-ordered set of skill strings.
#[derive(Default)]
struct SkillAccumulator {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl SkillAccumulator {
    fn push(&mut self, skill: &str) {
        if self.seen.insert(skill.to_string()) {
            self.ordered.push(skill.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
