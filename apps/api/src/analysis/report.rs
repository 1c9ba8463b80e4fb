//! Match report, its Markdown rendering and the improvement suggestions.

use serde::{Deserialize, Serialize};

use crate::analysis::assessment::AiAssessment;
use crate::analysis::education::EducationMatch;
use crate::analysis::experience::ExperienceMatch;
use crate::analysis::skills::SkillMatch;

/// Experience scores below this earn an advice line.
const EXPERIENCE_ADVICE_BELOW: f64 = 0.6;

pub const GENERIC_RECOMMENDATION: &str =
    "Overall match is good; keep maintaining and deepening your current skills";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub overall_match_score: f64,
    pub tfidf_similarity: f64,
    pub skill_match: SkillMatch,
    pub experience_match: ExperienceMatch,
    pub education_match: EducationMatch,
    pub topic_similarity: f64,
    pub ai_assessment: AiAssessment,
    pub detailed_analysis: String,
    pub recommendations: Vec<String>,
}

/// What the matcher returns: a full report, or an error object scored 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchOutcome {
    Report(MatchReport),
    Failed { error: String, overall_match_score: f64 },
}

impl MatchOutcome {
    pub fn failed(error: impl std::fmt::Display) -> Self {
        MatchOutcome::Failed {
            error: format!("Match calculation failed: {error}"),
            overall_match_score: 0.0,
        }
    }

    pub fn overall_match_score(&self) -> f64 {
        match self {
            MatchOutcome::Report(report) => report.overall_match_score,
            MatchOutcome::Failed { overall_match_score, .. } => *overall_match_score,
        }
    }

    #[cfg(test)]
    pub fn report(&self) -> Option<&MatchReport> {
        match self {
            MatchOutcome::Report(report) => Some(report),
            MatchOutcome::Failed { .. } => None,
        }
    }
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn first_joined(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

/// Inputs to the rendered analysis, borrowed from the finished scorers.
pub struct AnalysisInputs<'a> {
    pub job_title: &'a str,
    pub tfidf_similarity: f64,
    pub topic_similarity: f64,
    pub skill_match: &'a SkillMatch,
    pub experience_match: &'a ExperienceMatch,
    pub education_match: &'a EducationMatch,
    pub ai_assessment: &'a AiAssessment,
}

pub fn render_detailed_analysis(inputs: &AnalysisInputs<'_>) -> String {
    let AnalysisInputs {
        job_title,
        tfidf_similarity,
        topic_similarity,
        skill_match,
        experience_match,
        education_match,
        ai_assessment,
    } = inputs;

    format!(
        "## Résumé Match Analysis\n\
         \n\
         **Position**: {job_title}\n\
         \n\
         ### 1. Text similarity\n\
         - TF-IDF similarity: {tfidf}\n\
         - Topic similarity: {topic}\n\
         \n\
         ### 2. Skills\n\
         - Skill match rate: {skill_rate}\n\
         - Matched skills: {matched}\n\
         - Missing skills: {missing}\n\
         \n\
         ### 3. Work experience\n\
         - Experience match: {experience}\n\
         - Relevant positions: {positions}\n\
         \n\
         ### 4. Education\n\
         - Education match: {education}\n\
         - Degree requirement met: {degree}\n\
         \n\
         ### 5. AI assessment\n\
         - Overall score: {ai}\n\
         - Strengths: {strengths}\n\
         - Areas to improve: {weaknesses}\n",
        tfidf = pct(*tfidf_similarity),
        topic = pct(*topic_similarity),
        skill_rate = pct(skill_match.match_rate),
        matched = first_joined(&skill_match.matched_skills, 5),
        missing = first_joined(&skill_match.missing_skills, 3),
        experience = pct(experience_match.match_score),
        positions = experience_match.relevant_positions,
        education = pct(education_match.match_score),
        degree = if education_match.degree_match { "yes" } else { "no" },
        ai = pct(ai_assessment.overall_score),
        strengths = first_joined(&ai_assessment.strengths, 3),
        weaknesses = first_joined(&ai_assessment.weaknesses, 3),
    )
}

/// Ordered advice: missing skills, thin experience, oracle weaknesses. The
/// generic message appears only when none of those apply.
pub fn build_recommendations(
    skill_match: &SkillMatch,
    experience_match: &ExperienceMatch,
    ai_assessment: &AiAssessment,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !skill_match.missing_skills.is_empty() {
        recommendations.push(format!(
            "Consider learning these skills: {}",
            first_joined(&skill_match.missing_skills, 3)
        ));
    }
    if experience_match.match_score < EXPERIENCE_ADVICE_BELOW {
        recommendations.push("Build more hands-on experience relevant to this role".to_string());
    }
    if !ai_assessment.weaknesses.is_empty() {
        recommendations.push(format!(
            "Work on: {}",
            first_joined(&ai_assessment.weaknesses, 2)
        ));
    }
    if recommendations.is_empty() {
        recommendations.push(GENERIC_RECOMMENDATION.to_string());
    }
    recommendations
}
