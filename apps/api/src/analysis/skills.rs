//! Skill match: job skills found in the description vs. the résumé's skills and keywords.

use serde::{Deserialize, Serialize};

use crate::resume::ResumeRecord;
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub match_rate: f64,
    /// Job skills covered by the résumé, in vocabulary scan order.
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub total_job_skills: usize,
    pub total_resume_skills: usize,
}

/// Vocabulary skills that occur in the lower-cased job description.
pub fn job_skills(job_description: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let lower = job_description.to_lowercase();
    vocabulary
        .job_skills
        .iter()
        .filter(|skill| lower.contains(skill.as_str()))
        .cloned()
        .collect()
}

/// Structured skills followed by keywords, lower-cased and trimmed.
fn resume_skills(record: &ResumeRecord) -> Vec<String> {
    record
        .skills
        .iter()
        .chain(&record.keywords)
        .map(|s| s.trim().to_lowercase())
        .collect()
}

/// A job skill matches when it contains, or is contained in, any résumé skill.
/// Blank résumé entries are skipped; they would otherwise match everything.
pub fn calculate_skill_match(record: &ResumeRecord, job_description: &str, vocabulary: &Vocabulary) -> SkillMatch {
    let required = job_skills(job_description, vocabulary);
    let candidate = resume_skills(record);

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) =
        required.iter().cloned().partition(|job_skill| {
            candidate
                .iter()
                .filter(|s| !s.is_empty())
                .any(|s| s.contains(job_skill.as_str()) || job_skill.contains(s.as_str()))
        });

    let match_rate = if required.is_empty() {
        0.0
    } else {
        matched_skills.len() as f64 / required.len() as f64
    };

    SkillMatch {
        match_rate,
        matched_skills,
        missing_skills,
        total_job_skills: required.len(),
        total_resume_skills: candidate.len(),
    }
}
