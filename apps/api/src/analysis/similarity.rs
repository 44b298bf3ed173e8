//! Statistical text similarity: TF-IDF cosine over a two-document corpus.
//!
//! The pair itself is the whole corpus, so IDF only distinguishes terms shared
//! by both documents from terms unique to one. Unigrams and bigrams, English
//! stop words removed before n-gram construction, vocabulary capped at the
//! `MAX_FEATURES` most frequent terms. Smoothed IDF, L2-normalized vectors.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::analysis::stop_words::is_stop_word;

pub const MAX_FEATURES: usize = 1000;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("empty vocabulary; documents contain no tokens outside the stop-word list")]
    EmptyVocabulary,

    #[error("non-finite similarity value {0}")]
    NonFinite(f64),
}

/// Cosine similarity in [0, 1]. Degenerate input and internal failures map to 0.0.
pub fn similarity(text_a: &str, text_b: &str) -> f64 {
    match tfidf_cosine(text_a, text_b) {
        Ok(score) => score,
        Err(e) => {
            warn!("Error calculating similarity: {e}");
            0.0
        }
    }
}

pub fn tfidf_cosine(text_a: &str, text_b: &str) -> Result<f64, SimilarityError> {
    let counts = [term_counts(text_a), term_counts(text_b)];
    let vocabulary = build_vocabulary(&counts);
    if vocabulary.is_empty() {
        return Err(SimilarityError::EmptyVocabulary);
    }

    let n_docs = counts.len() as f64;
    let idf: Vec<f64> = vocabulary
        .iter()
        .map(|term| {
            let df = counts.iter().filter(|c| c.contains_key(term.as_str())).count() as f64;
            ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    let vec_a = normalized_vector(&counts[0], &vocabulary, &idf);
    let vec_b = normalized_vector(&counts[1], &vocabulary, &idf);

    let (Some(vec_a), Some(vec_b)) = (vec_a, vec_b) else {
        return Ok(0.0);
    };

    let dot: f64 = vec_a.iter().zip(&vec_b).map(|(a, b)| a * b).sum();
    if !dot.is_finite() {
        return Err(SimilarityError::NonFinite(dot));
    }
    Ok(dot.clamp(0.0, 1.0))
}

/// Unigram and bigram counts after lower-casing and stop-word removal.
fn term_counts(text: &str) -> HashMap<String, usize> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .collect();

    let mut counts = HashMap::new();
    for token in &tokens {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Top `MAX_FEATURES` terms by corpus frequency; ties broken alphabetically.
/// Returned in alphabetical order.
fn build_vocabulary(counts: &[HashMap<String, usize>]) -> Vec<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for doc in counts {
        for (term, count) in doc {
            *totals.entry(term.as_str()).or_insert(0) += count;
        }
    }

    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(MAX_FEATURES);

    let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
    vocabulary.sort();
    vocabulary
}

/// TF-IDF vector over `vocabulary`, L2-normalized. `None` for an all-zero vector.
fn normalized_vector(
    counts: &HashMap<String, usize>,
    vocabulary: &[String],
    idf: &[f64],
) -> Option<Vec<f64>> {
    let weights: Vec<f64> = vocabulary
        .iter()
        .zip(idf)
        .map(|(term, idf)| counts.get(term).copied().unwrap_or(0) as f64 * idf)
        .collect();

    let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
    if norm == 0.0 {
        return None;
    }
    Some(weights.into_iter().map(|w| w / norm).collect())
}
