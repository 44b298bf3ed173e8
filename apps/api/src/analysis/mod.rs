// Analysis Engine: skill extraction, TF-IDF similarity, blended scoring,
// recommendations, and presentation of the result.
// Extraction and scoring are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod engine;
pub mod extraction;
pub mod handlers;
pub mod recommendations;
pub mod report;
pub mod similarity;
pub mod stop_words;
pub mod tagger;

pub use engine::MatchEngine;
pub use tagger::RuleTagger;
