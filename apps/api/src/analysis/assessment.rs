//! Oracle-based comprehensive assessment.
//!
//! One call, bounded by a timeout. Any failure (transport, status, timeout, or a
//! reply with no usable JSON) yields `AiAssessment::neutral()`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::analysis::prompts::ASSESSMENT_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::reply::{parse_reply, ReplyParse};
use crate::llm_client::{AssessmentOracle, LlmError};

const NEUTRAL_SCORE: f64 = 0.5;
pub const UNAVAILABLE_SUMMARY: &str = "AI assessment is currently unavailable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAssessment {
    #[serde(deserialize_with = "unit_score")]
    pub technical_skills: f64,
    #[serde(deserialize_with = "unit_score")]
    pub work_experience: f64,
    #[serde(deserialize_with = "unit_score")]
    pub project_experience: f64,
    #[serde(deserialize_with = "unit_score")]
    pub learning_potential: f64,
    #[serde(deserialize_with = "unit_score")]
    pub overall_score: f64,
    #[serde(deserialize_with = "text_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    pub weaknesses: Vec<String>,
    #[serde(deserialize_with = "text")]
    pub summary: String,
}

impl AiAssessment {
    /// Stand-in used whenever the oracle cannot produce an assessment.
    pub fn neutral() -> Self {
        Self {
            technical_skills: NEUTRAL_SCORE,
            work_experience: NEUTRAL_SCORE,
            project_experience: NEUTRAL_SCORE,
            learning_potential: NEUTRAL_SCORE,
            overall_score: NEUTRAL_SCORE,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            summary: UNAVAILABLE_SUMMARY.to_string(),
        }
    }
}

impl Default for AiAssessment {
    /// Field defaults for partial replies: neutral scores, empty text.
    fn default() -> Self {
        Self {
            summary: String::new(),
            ..Self::neutral()
        }
    }
}

/// Numbers (or numeric strings) clamped into [0, 1]; anything else is neutral.
fn unit_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL_SCORE))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        serde_json::Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

pub fn render_prompt(job_title: &str, job_description: &str, resume_text: &str) -> String {
    fill_template(
        ASSESSMENT_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("job_title", job_title),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    )
}

/// Asks the oracle to assess the candidate. Never fails.
pub async fn assess(
    oracle: &dyn AssessmentOracle,
    job_title: &str,
    job_description: &str,
    resume_text: &str,
    timeout: Duration,
) -> AiAssessment {
    let prompt = render_prompt(job_title, job_description, resume_text);

    let reply = match tokio::time::timeout(timeout, oracle.complete(&prompt)).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            warn!("AI assessment failed: {e}");
            return AiAssessment::neutral();
        }
        Err(_) => {
            warn!("AI assessment failed: {}", LlmError::Timeout(timeout));
            return AiAssessment::neutral();
        }
    };

    let parsed = parse_reply::<AiAssessment>(&reply);
    match &parsed {
        ReplyParse::Strict(_) => {}
        ReplyParse::Lenient(_) => debug!("AI assessment recovered from surrounding prose"),
        ReplyParse::Default => warn!("AI assessment reply contained no JSON object"),
    }
    parsed.or_else(AiAssessment::neutral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{FailingOracle, FixedOracle, HangingOracle};

    const TIMEOUT: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_valid_reply_is_parsed() {
        let oracle = FixedOracle(
            r#"{"technical_skills": 0.9, "work_experience": 0.8, "project_experience": 0.7,
                "learning_potential": 0.6, "overall_score": 0.85,
                "strengths": ["Rust"], "weaknesses": ["Go"], "summary": "Strong"}"#
                .to_string(),
        );
        let result = assess(&oracle, "Engineer", "Rust", "resume", TIMEOUT).await;
        assert_eq!(result.overall_score, 0.85);
        assert_eq!(result.strengths, vec!["Rust"]);
        assert_eq!(result.summary, "Strong");
    }

    #[tokio::test]
    async fn test_reply_wrapped_in_prose_is_recovered() {
        let oracle = FixedOracle("Here you go:\n{\"overall_score\": 0.4}\nThanks".to_string());
        let result = assess(&oracle, "t", "d", "r", TIMEOUT).await;
        assert_eq!(result.overall_score, 0.4);
        assert_eq!(result.technical_skills, NEUTRAL_SCORE);
        assert!(result.summary.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_scores_are_clamped() {
        let oracle = FixedOracle(r#"{"overall_score": 7.5, "technical_skills": -1, "work_experience": "0.3"}"#.to_string());
        let result = assess(&oracle, "t", "d", "r", TIMEOUT).await;
        assert_eq!(result.overall_score, 1.0);
        assert_eq!(result.technical_skills, 0.0);
        assert_eq!(result.work_experience, 0.3);
    }

    #[tokio::test]
    async fn test_oracle_error_yields_neutral() {
        let result = assess(&FailingOracle, "t", "d", "r", TIMEOUT).await;
        assert_eq!(result, AiAssessment::neutral());
    }

    #[tokio::test]
    async fn test_non_json_reply_yields_neutral() {
        let oracle = FixedOracle("I cannot assess this candidate.".to_string());
        let result = assess(&oracle, "t", "d", "r", TIMEOUT).await;
        assert_eq!(result, AiAssessment::neutral());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_oracle_times_out_to_neutral() {
        let result = assess(&HangingOracle, "t", "d", "r", Duration::from_secs(5)).await;
        assert_eq!(result, AiAssessment::neutral());
    }

    #[test]
    fn test_prompt_embeds_every_input() {
        let prompt = render_prompt("Data Engineer", "Spark pipelines", "Built ETL jobs");
        assert!(prompt.contains("Data Engineer"));
        assert!(prompt.contains("Spark pipelines"));
        assert!(prompt.contains("Built ETL jobs"));
        assert!(prompt.contains(JSON_ONLY_INSTRUCTION));
        assert!(!prompt.contains("{json_only}"));
    }

    #[test]
    fn test_placeholder_text_in_job_fields_is_sent_verbatim() {
        let prompt = render_prompt("Lead {job_description}", "Describe {resume_text} here", "CV BODY");
        assert_eq!(prompt.matches("CV BODY").count(), 1);
        assert!(prompt.contains("Describe {resume_text} here"));
        assert!(prompt.contains("Lead {job_description}"));
    }
}
