//! Education match: degree requirement satisfaction plus major relevance.

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::text_relevance;
use crate::resume::ResumeRecord;
use crate::vocabulary::Vocabulary;

const DEGREE_WEIGHT: f64 = 0.6;
const MAJOR_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationMatch {
    pub match_score: f64,
    pub degree_match: bool,
    /// Lower-cased degree string of the highest-ranked entry; empty when none ranked.
    pub highest_degree: String,
    pub major_relevance: f64,
}

/// Rank of the first degree level (highest first) mentioned in the description.
pub fn required_rank(job_description: &str, vocabulary: &Vocabulary) -> Option<u8> {
    let lower = job_description.to_lowercase();
    vocabulary
        .degrees
        .iter()
        .find(|level| level.terms.iter().any(|t| lower.contains(t.as_str())))
        .map(|level| level.rank)
}

pub fn calculate_education_match(
    record: &ResumeRecord,
    job_description: &str,
    vocabulary: &Vocabulary,
) -> EducationMatch {
    if record.education.is_empty() {
        return EducationMatch::default();
    }

    let mut highest_rank = 0u8;
    let mut highest_degree = String::new();
    let mut major_relevance = 0.0_f64;

    for entry in &record.education {
        let degree = entry.degree.as_deref().unwrap_or("").to_lowercase();
        let rank = vocabulary
            .degrees
            .iter()
            .filter(|level| level.terms.iter().any(|t| degree.contains(t.as_str())))
            .map(|level| level.rank)
            .max()
            .unwrap_or(0);
        if rank > highest_rank {
            highest_rank = rank;
            highest_degree = degree;
        }

        let relevance = text_relevance(&entry.major_text(), &vocabulary.education_keywords);
        major_relevance = major_relevance.max(relevance);
    }

    let degree_match = match required_rank(job_description, vocabulary) {
        None => true,
        Some(required) => highest_rank >= required,
    };
    let match_score =
        DEGREE_WEIGHT * if degree_match { 1.0 } else { 0.0 } + MAJOR_WEIGHT * major_relevance;

    EducationMatch {
        match_score,
        degree_match,
        highest_degree,
        major_relevance,
    }
}
