//! Document-level similarity signals: lexical TF-IDF cosine and topic-distribution cosine.
//!
//! Both return 0.0 on any model failure; a degenerate corpus never aborts a match.

use std::collections::HashSet;

use tracing::warn;

use crate::analysis::text::{cosine_similarity, TextModelError, TfidfConfig, TfidfVectorizer};
use crate::analysis::topics::{self, LdaConfig};

const LEXICAL_MAX_FEATURES: usize = 1000;
const TOPIC_MAX_FEATURES: usize = 100;

/// Cosine similarity of résumé and job description in a uni/bi-gram TF-IDF space.
pub fn lexical_similarity(resume_text: &str, job_description: &str, stop_words: &HashSet<String>) -> f64 {
    match try_lexical_similarity(resume_text, job_description, stop_words) {
        Ok(score) => score.clamp(0.0, 1.0),
        Err(e) => {
            warn!("TF-IDF similarity failed: {e}");
            0.0
        }
    }
}

fn try_lexical_similarity(
    resume_text: &str,
    job_description: &str,
    stop_words: &HashSet<String>,
) -> Result<f64, TextModelError> {
    let config = TfidfConfig {
        max_features: Some(LEXICAL_MAX_FEATURES),
        ngram_range: (1, 2),
        min_df: 1,
        max_df: 1.0,
    };
    let matrix = TfidfVectorizer::new(config, stop_words).fit_transform(&[resume_text, job_description])?;
    Ok(cosine_similarity(&matrix.rows[0], &matrix.rows[1]))
}

/// Cosine similarity of the two documents' topic distributions under a 5-topic LDA.
///
/// Two documents cannot pin down five topics, so the value is noisy; it is kept
/// as a low-weight signal.
pub fn topic_similarity(resume_text: &str, job_description: &str, stop_words: &HashSet<String>) -> f64 {
    match try_topic_similarity(resume_text, job_description, stop_words) {
        Ok(score) => score.clamp(0.0, 1.0),
        Err(e) => {
            warn!("Topic similarity failed: {e}");
            0.0
        }
    }
}

fn try_topic_similarity(
    resume_text: &str,
    job_description: &str,
    stop_words: &HashSet<String>,
) -> Result<f64, TextModelError> {
    let config = TfidfConfig {
        max_features: Some(TOPIC_MAX_FEATURES),
        ..Default::default()
    };
    let matrix = TfidfVectorizer::new(config, stop_words).fit_transform(&[resume_text, job_description])?;
    let distributions = topics::fit_transform(&matrix.rows, &LdaConfig::default())?;
    Ok(cosine_similarity(&distributions[0], &distributions[1]))
}
