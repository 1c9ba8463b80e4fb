//! Keyword ranking for résumés (per-sentence TF-IDF) and job descriptions (frequency).

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::analysis::text::{TfidfConfig, TfidfVectorizer};

const MIN_SENTENCE_CHARS: usize = 10;
const KEYWORD_FEATURES: usize = 20;
const KEYWORD_MAX_DF: f64 = 0.8;
const TOP_KEYWORDS: usize = 10;
pub const JOB_KEYWORD_LIMIT: usize = 20;

const SENTENCE_BREAKS: &[char] = &['.', '!', '?', '。', '！', '？', '\n'];

/// Sentences longer than ten characters, trimmed.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_BREAKS)
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// Top ten terms by mean per-sentence TF-IDF score.
///
/// Fewer than two usable sentences, or a vocabulary that prunes to nothing,
/// yields an empty list. Equal scores keep feature (alphabetical) order.
pub fn extract_keywords(text: &str, stop_words: &HashSet<String>) -> Vec<String> {
    let sentences = split_sentences(text);
    if sentences.len() < 2 {
        return Vec::new();
    }

    let config = TfidfConfig {
        max_features: Some(KEYWORD_FEATURES),
        ngram_range: (1, 2),
        min_df: 1,
        max_df: KEYWORD_MAX_DF,
    };
    let matrix = match TfidfVectorizer::new(config, stop_words).fit_transform(&sentences) {
        Ok(m) => m,
        Err(e) => {
            debug!("Keyword extraction skipped: {e}");
            return Vec::new();
        }
    };

    let n = matrix.rows.len() as f64;
    let mut ranked: Vec<(usize, f64)> = (0..matrix.n_features())
        .map(|j| (j, matrix.rows.iter().map(|row| row[j]).sum::<f64>() / n))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(TOP_KEYWORDS)
        .map(|(j, _)| matrix.features[j].clone())
        .collect()
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b\w+\b").expect("valid regex"))
}

/// Most frequent words of a job description (longer than one character, not a
/// stop word), ties broken by first occurrence.
pub fn job_keywords(job_description: &str, stop_words: &HashSet<String>) -> Vec<String> {
    let lower = job_description.to_lowercase();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in word_pattern().find_iter(&lower).map(|m| m.as_str()) {
        if word.chars().count() <= 1 || stop_words.contains(word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // stable sort keeps first-occurrence order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(JOB_KEYWORD_LIMIT)
        .map(str::to_string)
        .collect()
}

/// Fraction of `keywords` found as substrings of the lower-cased `text`.
pub fn text_relevance(text: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let lower = text.to_lowercase();
    let matched = keywords.iter().filter(|k| lower.contains(k.as_str())).count();
    matched as f64 / keywords.len() as f64
}
