//! Part-of-speech tagging collaborator for the extraction enrichment pass.
//!
//! Extraction queries `is_available()` before tagging; a tagger that is absent
//! or unavailable simply skips enrichment.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Other,
}

impl PartOfSpeech {
    pub fn is_noun(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }
}

/// A token with its original casing and tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            text: text.into(),
            pos,
        }
    }
}

pub trait PosTagger: Send + Sync {
    /// Whether the tagger can currently serve requests (model loaded, etc.).
    fn is_available(&self) -> bool;

    fn tag(&self, text: &str) -> Vec<TaggedToken>;

    fn name(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleTagger: shallow, dictionary-free heuristics
// ────────────────────────────────────────────────────────────────────────────

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "so", "with", "without", "in", "on", "at",
    "of", "for", "to", "from", "by", "as", "into", "over", "under", "about", "across",
    "is", "are", "was", "were", "be", "been", "being", "has", "have", "had", "do", "does",
    "did", "i", "me", "we", "us", "you", "he", "she", "they", "them", "it", "its", "my",
    "our", "your", "his", "her", "their", "this", "that", "these", "those", "who", "which",
    "will", "would", "can", "could", "must", "should", "may", "might", "shall", "not",
    "also", "plus", "very", "more", "most", "such", "all", "any", "some", "each", "every",
];

/// Characters that mark a token as a product/technology name (`C#`, `Node.js`, `CI/CD`).
const NAME_MARKERS: &[char] = &['.', '#', '+', '/'];

/// Rule-based tagger: closed-class words are `Other`, `-ing`/`-ed` forms are
/// `Verb`, mid-sentence capitalized or symbol/digit-bearing tokens are
/// `ProperNoun`, remaining alphabetic tokens are `Noun`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTagger;

impl RuleTagger {
    fn classify(token: &str, sentence_start: bool) -> PartOfSpeech {
        let lower = token.to_lowercase();
        if FUNCTION_WORDS.contains(&lower.as_str()) {
            return PartOfSpeech::Other;
        }

        let has_marker = token.contains(NAME_MARKERS) || token.chars().any(|c| c.is_ascii_digit());
        let capitalized = token.chars().next().is_some_and(char::is_uppercase);
        if has_marker || (capitalized && !sentence_start) {
            return PartOfSpeech::ProperNoun;
        }

        if !token.chars().all(|c| c.is_alphabetic() || c == '-') {
            return PartOfSpeech::Other;
        }
        if lower.len() > 4 && (lower.ends_with("ing") || lower.ends_with("ed")) {
            return PartOfSpeech::Verb;
        }
        if lower.len() > 4 && lower.ends_with("ly") {
            return PartOfSpeech::Other;
        }
        PartOfSpeech::Noun
    }
}

impl PosTagger for RuleTagger {
    fn is_available(&self) -> bool {
        true
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens = Vec::new();
        let mut sentence_start = true;

        for raw in text.split_whitespace() {
            let token = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '#' && c != '+');
            if !token.is_empty() {
                tokens.push(TaggedToken::new(token, Self::classify(token, sentence_start)));
            }
            sentence_start = raw.ends_with(['.', '!', '?', ':']);
        }

        tokens
    }

    fn name(&self) -> &str {
        "rule"
    }
}
