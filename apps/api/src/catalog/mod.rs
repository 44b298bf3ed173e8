//! Skill Catalog: the reference vocabulary used for dictionary-based extraction.
//!
//! Loaded once at start-up and shared read-only as `Arc<SkillCatalog>`.
//! A missing or malformed catalog file never fails the caller: it degrades to
//! the built-in taxonomy in `defaults.rs` with a warning.

mod defaults;

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use self::defaults::DEFAULT_CATEGORIES;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog root must be an object of category -> [terms]")]
    NotAnObject,

    #[error("category '{0}' must be an array of strings")]
    InvalidCategory(String),
}

/// One named group of skill terms, in declaration order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillCategory {
    pub name: String,
    pub terms: Vec<String>,
}

/// Immutable skill taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct SkillCatalog {
    categories: Vec<SkillCategory>,
    /// Flattened (term, lower-cased term) pairs; category order then in-category order.
    #[serde(skip)]
    flattened: Vec<(String, String)>,
}

impl SkillCatalog {
    /// Loads the catalog from a JSON file, falling back to the built-in default.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    "Skills catalog not readable ({e}). Using default skills."
                );
                return Self::default_catalog();
            }
        };

        match Self::from_json(&raw) {
            Ok(catalog) if !catalog.is_empty() => {
                info!(
                    path = %path.display(),
                    categories = catalog.categories.len(),
                    terms = catalog.len(),
                    "Skills catalog loaded"
                );
                catalog
            }
            Ok(_) => {
                warn!(path = %path.display(), "Skills catalog is empty. Using default skills.");
                Self::default_catalog()
            }
            Err(e) => {
                warn!(path = %path.display(), "Skills catalog malformed ({e}). Using default skills.");
                Self::default_catalog()
            }
        }
    }

    /// Parses `{"category": ["term", ...], ...}`, keeping the file's key order.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(raw)?;
        let object = value.as_object().ok_or(CatalogError::NotAnObject)?;

        let mut categories = Vec::with_capacity(object.len());
        for (name, terms) in object {
            let terms = terms
                .as_array()
                .ok_or_else(|| CatalogError::InvalidCategory(name.clone()))?
                .iter()
                .map(|t| {
                    t.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| CatalogError::InvalidCategory(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            categories.push((name.clone(), terms));
        }

        Ok(Self::from_categories(categories))
    }

    /// Builds a catalog from named term lists. Blank terms and in-category
    /// duplicates are dropped.
    pub fn from_categories<N, T, I>(categories: impl IntoIterator<Item = (N, I)>) -> Self
    where
        N: Into<String>,
        T: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        let categories: Vec<SkillCategory> = categories
            .into_iter()
            .map(|(name, terms)| {
                let name = name.into();
                let mut seen = HashSet::new();
                let mut kept = Vec::new();
                for term in terms {
                    let term = term.as_ref().trim();
                    if term.is_empty() {
                        warn!(category = %name, "Dropping empty skill term");
                        continue;
                    }
                    if seen.insert(term.to_string()) {
                        kept.push(term.to_string());
                    }
                }
                SkillCategory { name, terms: kept }
            })
            .collect();

        let flattened = {
            let mut seen = HashSet::new();
            categories
                .iter()
                .flat_map(|c| c.terms.iter())
                .filter(|t| seen.insert(t.as_str()))
                .map(|t| (t.clone(), t.to_lowercase()))
                .collect()
        };

        Self {
            categories,
            flattened,
        }
    }

    /// The built-in taxonomy: technical skills, soft skills, domains, methodologies.
    pub fn default_catalog() -> Self {
        Self::from_categories(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(name, terms)| (*name, terms.iter().copied())),
        )
    }

    /// Every term, category order then in-category order. Cross-category
    /// duplicates appear once, at their first position.
    pub fn all_terms(&self) -> Vec<&str> {
        self.flattened.iter().map(|(t, _)| t.as_str()).collect()
    }

    /// `(term, lower-cased term)` pairs in `all_terms` order.
    pub(crate) fn terms_with_lowercase(&self) -> impl Iterator<Item = (&str, &str)> {
        self.flattened.iter().map(|(t, l)| (t.as_str(), l.as_str()))
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.flattened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flattened.is_empty()
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}
