//! Curated vocabularies: skill terms, degree ranks, education keywords and stop words.
//!
//! Loaded from a TOML table so the lists can be extended without touching scoring code.
//! The built-in table ships inside the binary; `VOCABULARY_PATH` replaces it at startup.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

const BUILTIN_VOCABULARY: &str = include_str!("../config/vocabulary.toml");

/// One degree level and the terms that identify it.
#[derive(Debug, Clone, Deserialize)]
pub struct DegreeLevel {
    pub rank: u8,
    pub terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawVocabulary {
    resume_skills: Vec<String>,
    job_skills: Vec<String>,
    education_keywords: Vec<String>,
    job_keyword_stop_words: Vec<String>,
    stop_words: Vec<String>,
    degrees: Vec<DegreeLevel>,
}

/// Immutable lookup tables shared by every request.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,
    pub education_keywords: Vec<String>,
    pub job_keyword_stop_words: HashSet<String>,
    pub stop_words: HashSet<String>,
    /// Highest rank first.
    pub degrees: Vec<DegreeLevel>,
}

impl Vocabulary {
    pub fn from_toml(source: &str) -> Result<Self> {
        let raw: RawVocabulary = toml::from_str(source).context("invalid vocabulary table")?;

        let mut degrees: Vec<DegreeLevel> = raw
            .degrees
            .into_iter()
            .map(|level| DegreeLevel {
                rank: level.rank,
                terms: normalize_terms(level.terms),
            })
            .collect();
        degrees.sort_by(|a, b| b.rank.cmp(&a.rank));

        Ok(Self {
            resume_skills: normalize_terms(raw.resume_skills),
            job_skills: normalize_terms(raw.job_skills),
            education_keywords: normalize_terms(raw.education_keywords),
            job_keyword_stop_words: raw.job_keyword_stop_words.into_iter().collect(),
            stop_words: raw
                .stop_words
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            degrees,
        })
    }

    /// Reads a vocabulary table from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read vocabulary file {}", path.display()))?;
        let vocabulary = Self::from_toml(&source)?;
        info!(
            "Loaded vocabulary from {} ({} job skills)",
            path.display(),
            vocabulary.job_skills.len()
        );
        Ok(vocabulary)
    }

    /// Uses `path` when given, otherwise the built-in table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::from_toml(BUILTIN_VOCABULARY),
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_toml(BUILTIN_VOCABULARY).expect("built-in vocabulary table is valid")
    }
}

/// Lower-cases, trims and de-duplicates terms, keeping first-seen order.
fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
