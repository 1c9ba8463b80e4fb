//! TF-IDF vector space over a small corpus, plus cosine similarity.
//!
//! Tokens are runs of two or more word characters, lower-cased. Stop words are
//! dropped before n-grams are built. Features are ordered alphabetically; IDF is
//! smoothed (`ln((1+n)/(1+df)) + 1`) and every document row is L2-normalised.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TextModelError {
    #[error("empty vocabulary; documents contain only stop words or no tokens")]
    EmptyVocabulary,

    #[error("no terms remain after document-frequency pruning")]
    AllTermsPruned,

    #[error("cannot fit on an empty corpus")]
    EmptyCorpus,

    #[error("degenerate topic model: {0}")]
    Degenerate(String),
}

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid regex"))
}

/// Lower-cased tokens of at least two word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_pattern()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Vectorizer settings.
#[derive(Debug, Clone)]
pub struct TfidfConfig {
    pub max_features: Option<usize>,
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum proportion of documents a term may appear in.
    pub max_df: f64,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: None,
            ngram_range: (1, 1),
            min_df: 1,
            max_df: 1.0,
        }
    }
}

/// Fitted TF-IDF model: feature names and one L2-normalised row per document.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub features: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfMatrix {
    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

pub struct TfidfVectorizer<'a> {
    config: TfidfConfig,
    stop_words: &'a HashSet<String>,
}

impl<'a> TfidfVectorizer<'a> {
    pub fn new(config: TfidfConfig, stop_words: &'a HashSet<String>) -> Self {
        Self { config, stop_words }
    }

    fn analyze(&self, document: &str) -> Vec<String> {
        let tokens: Vec<String> = tokenize(document)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let (min_n, max_n) = self.config.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    pub fn fit_transform(&self, documents: &[&str]) -> Result<TfidfMatrix, TextModelError> {
        if documents.is_empty() {
            return Err(TextModelError::EmptyCorpus);
        }

        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for term in self.analyze(doc) {
                    *tf.entry(term).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        // term -> (document frequency, corpus frequency), alphabetical
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for tf in &counts {
            for (term, &count) in tf {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += count;
            }
        }
        if stats.is_empty() {
            return Err(TextModelError::EmptyVocabulary);
        }

        let n_docs = documents.len();
        let max_doc_count = self.config.max_df * n_docs as f64;
        let mut kept: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .filter(|(_, (df, _))| *df >= self.config.min_df && (*df as f64) <= max_doc_count)
            .map(|(term, (df, cf))| (term, df, cf))
            .collect();
        if kept.is_empty() {
            return Err(TextModelError::AllTermsPruned);
        }

        if let Some(limit) = self.config.max_features {
            if kept.len() > limit {
                // stable sort keeps alphabetical order among equal counts
                kept.sort_by(|a, b| b.2.cmp(&a.2));
                kept.truncate(limit);
                kept.sort_by(|a, b| a.0.cmp(b.0));
            }
        }

        let features: Vec<String> = kept.iter().map(|(t, _, _)| t.to_string()).collect();
        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, df, _)| ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: Vec<f64> = features
                    .iter()
                    .zip(&idf)
                    .map(|(term, w)| tf.get(term).copied().unwrap_or(0) as f64 * w)
                    .collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        Ok(TfidfMatrix { features, rows })
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|v| *v /= norm);
    }
}

/// Cosine of the angle between two vectors; 0 when either is all zeros.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
