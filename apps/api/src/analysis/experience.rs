//! Experience match: relevance of each work entry to the job's most frequent keywords.
//!
//! Each entry counts as roughly one year; three entries earn the full experience factor.

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::{job_keywords, text_relevance};
use crate::resume::{ResumeRecord, WorkExperience};
use crate::vocabulary::Vocabulary;

/// An entry is relevant above this fraction of matched job keywords.
const RELEVANCE_THRESHOLD: f64 = 0.3;
const FULL_CREDIT_YEARS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantExperience {
    pub experience: WorkExperience,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    pub match_score: f64,
    pub relevant_experience: Vec<RelevantExperience>,
    pub total_years: usize,
    pub relevant_positions: usize,
}

pub fn calculate_experience_match(
    record: &ResumeRecord,
    job_description: &str,
    vocabulary: &Vocabulary,
) -> ExperienceMatch {
    if record.work_experience.is_empty() {
        return ExperienceMatch::default();
    }

    let total_years = record.work_experience.len();
    let keywords = job_keywords(job_description, &vocabulary.job_keyword_stop_words);

    let relevant_experience: Vec<RelevantExperience> = record
        .work_experience
        .iter()
        .filter_map(|entry| {
            let relevance_score = text_relevance(&entry.summary_text(), &keywords);
            (relevance_score > RELEVANCE_THRESHOLD).then(|| RelevantExperience {
                experience: entry.clone(),
                relevance_score,
            })
        })
        .collect();

    let match_score = if relevant_experience.is_empty() {
        0.0
    } else {
        let mean = relevant_experience
            .iter()
            .map(|e| e.relevance_score)
            .sum::<f64>()
            / relevant_experience.len() as f64;
        mean * (total_years as f64 / FULL_CREDIT_YEARS).min(1.0)
    };

    ExperienceMatch {
        match_score,
        relevant_positions: relevant_experience.len(),
        relevant_experience,
        total_years,
    }
}
