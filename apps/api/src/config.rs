use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which part-of-speech tagger feeds the extraction enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggerKind {
    None,
    Rule,
}

impl FromStr for TaggerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(TaggerKind::None),
            "rule" => Ok(TaggerKind::Rule),
            other => bail!("POS_TAGGER must be one of 'none', 'rule' (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub skills_catalog_path: PathBuf,
    pub pos_tagger: TaggerKind,
    /// Enables narrative enhancement when set.
    pub anthropic_api_key: Option<String>,
    /// Enables the PostgreSQL experiment tracker when set.
    pub database_url: Option<String>,
    pub experiment_name: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            skills_catalog_path: PathBuf::from("data/skills_catalog.json"),
            pos_tagger: TaggerKind::None,
            anthropic_api_key: None,
            database_url: None,
            experiment_name: "cv-job-analyzer".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: match non_empty("PORT") {
                Some(v) => v.parse().context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: non_empty("RUST_LOG").unwrap_or(defaults.rust_log),
            skills_catalog_path: non_empty("SKILLS_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.skills_catalog_path),
            pos_tagger: match non_empty("POS_TAGGER") {
                Some(v) => v.parse()?,
                None => defaults.pos_tagger,
            },
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            database_url: non_empty("DATABASE_URL"),
            experiment_name: non_empty("EXPERIMENT_NAME").unwrap_or(defaults.experiment_name),
            request_timeout_secs: match non_empty("REQUEST_TIMEOUT_SECS") {
                Some(v) => v
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
                None => defaults.request_timeout_secs,
            },
        })
    }
}
