//! Structured-info extractor: résumé text → `ResumeRecord`.
//!
//! Asks the oracle for the structure first; an unusable reply or a failed call
//! falls back to regex heuristics so a record is always produced.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::analysis::keywords::extract_keywords;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::reply::{parse_reply, ReplyParse};
use crate::llm_client::{AssessmentOracle, LlmError};
use crate::resume::prompts::RESUME_EXTRACTION_PROMPT_TEMPLATE;
use crate::resume::{PersonalInfo, ResumeRecord};
use crate::vocabulary::Vocabulary;

/// Lines inspected when guessing the candidate's name.
const NAME_SEARCH_LINES: usize = 5;
const MAX_NAME_CHARS: usize = 20;

/// Builds a complete `ResumeRecord` from extracted text.
pub async fn build_record(
    text: &str,
    source_url: Option<&str>,
    oracle: &dyn AssessmentOracle,
    timeout: Duration,
    vocabulary: &Vocabulary,
) -> ResumeRecord {
    let mut record = structure_with_oracle(text, oracle, timeout)
        .await
        .unwrap_or_else(|| basic_structure(text, vocabulary));

    record.raw_text = text.to_string();
    record.keywords = extract_keywords(text, &vocabulary.stop_words);
    record.text_length = text.chars().count();
    record.source_url = source_url.map(str::to_string);
    record
}

async fn structure_with_oracle(
    text: &str,
    oracle: &dyn AssessmentOracle,
    timeout: Duration,
) -> Option<ResumeRecord> {
    let prompt = fill_template(
        RESUME_EXTRACTION_PROMPT_TEMPLATE,
        &[("json_only", JSON_ONLY_INSTRUCTION), ("resume_text", text)],
    );

    let reply = match tokio::time::timeout(timeout, oracle.complete(&prompt)).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            warn!("Résumé structuring call failed, using heuristics: {e}");
            return None;
        }
        Err(_) => {
            warn!(
                "Résumé structuring call failed, using heuristics: {}",
                LlmError::Timeout(timeout)
            );
            return None;
        }
    };

    match parse_reply::<ResumeRecord>(&reply) {
        ReplyParse::Strict(record) => Some(record),
        ReplyParse::Lenient(record) => {
            debug!("Résumé structure recovered from surrounding prose");
            Some(record)
        }
        ReplyParse::Default => {
            warn!("Résumé structuring reply was not JSON, using heuristics");
            None
        }
    }
}

/// Heuristic record: first short line as name, first email, vocabulary skills.
pub fn basic_structure(text: &str, vocabulary: &Vocabulary) -> ResumeRecord {
    ResumeRecord {
        personal_info: PersonalInfo {
            name: guess_name(text),
            contact: None,
            email: find_email(text),
        },
        skills: find_basic_skills(text, vocabulary),
        ..Default::default()
    }
}

fn guess_name(text: &str) -> Option<String> {
    text.split('\n')
        .take(NAME_SEARCH_LINES)
        .map(str::trim)
        .find(|line| {
            let len = line.chars().count();
            len > 0 && len < MAX_NAME_CHARS && !line.contains('@')
        })
        .map(str::to_string)
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
    })
}

fn find_email(text: &str) -> Option<String> {
    email_pattern().find(text).map(|m| m.as_str().to_string())
}

fn find_basic_skills(text: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let lower = text.to_lowercase();
    vocabulary
        .resume_skills
        .iter()
        .filter(|skill| lower.contains(skill.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{FailingOracle, FixedOracle, HangingOracle};

    const RESUME: &str = "王小明\nwang.xm@example.com\n\
        Backend engineer with five years of Python and Docker experience.\n\
        Built distributed systems on Kubernetes at scale for millions of users.\n\
        Led the migration of legacy services to microservices architecture.";

    const TIMEOUT: Duration = Duration::from_secs(60);

    #[test]
    fn test_guess_name_skips_blank_and_email_lines() {
        assert_eq!(guess_name("\n a@b.com\n  Jane Doe \n"), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_guess_name_rejects_long_lines() {
        let text = "This first line is definitely far too long to be a name";
        assert_eq!(guess_name(text), None);
    }

    #[test]
    fn test_guess_name_only_checks_first_five_lines() {
        let long = "x".repeat(30);
        let text = format!("{long}\n{long}\n{long}\n{long}\n{long}\nShort");
        assert_eq!(guess_name(&text), None);
    }

    #[test]
    fn test_find_email() {
        assert_eq!(
            find_email("contact: wang.xm@example.com or call"),
            Some("wang.xm@example.com".to_string())
        );
        assert_eq!(find_email("no address here"), None);
    }

    #[test]
    fn test_basic_structure_uses_vocabulary() {
        let record = basic_structure(RESUME, &Vocabulary::default());
        assert_eq!(record.personal_info.name.as_deref(), Some("王小明"));
        assert_eq!(record.personal_info.email.as_deref(), Some("wang.xm@example.com"));
        assert!(record.skills.contains(&"python".to_string()));
        assert!(record.skills.contains(&"docker".to_string()));
        assert!(record.skills.contains(&"kubernetes".to_string()));
        assert!(record.education.is_empty());
    }

    #[tokio::test]
    async fn test_oracle_reply_is_used_when_valid() {
        let oracle = FixedOracle(
            r#"Sure! {"personal_info": {"name": "Wang"}, "skills": ["Rust"], "education": []}"#
                .to_string(),
        );
        let record = build_record(RESUME, None, &oracle, TIMEOUT, &Vocabulary::default()).await;
        assert_eq!(record.personal_info.name.as_deref(), Some("Wang"));
        assert_eq!(record.skills, vec!["Rust"]);
        assert_eq!(record.raw_text, RESUME);
        assert_eq!(record.text_length, RESUME.chars().count());
    }

    #[tokio::test]
    async fn test_oracle_failure_falls_back_to_heuristics() {
        let record = build_record(
            RESUME,
            Some("https://example.com/cv"),
            &FailingOracle,
            TIMEOUT,
            &Vocabulary::default(),
        )
        .await;
        assert_eq!(record.personal_info.name.as_deref(), Some("王小明"));
        assert!(record.skills.contains(&"python".to_string()));
        assert_eq!(record.source_url.as_deref(), Some("https://example.com/cv"));
    }

    #[tokio::test]
    async fn test_unparsable_reply_falls_back_to_heuristics() {
        let oracle = FixedOracle("generation failed".to_string());
        let record = build_record(RESUME, None, &oracle, TIMEOUT, &Vocabulary::default()).await;
        assert!(record.skills.contains(&"docker".to_string()));
    }

    #[tokio::test]
    async fn test_keywords_are_filled() {
        let record = build_record(RESUME, None, &FailingOracle, TIMEOUT, &Vocabulary::default()).await;
        assert!(!record.keywords.is_empty());
        assert!(record.keywords.len() <= 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_oracle_times_out_to_heuristics() {
        let record = build_record(RESUME, None, &HangingOracle, Duration::from_secs(5), &Vocabulary::default()).await;
        assert_eq!(record.personal_info.name.as_deref(), Some("王小明"));
        assert!(record.skills.contains(&"python".to_string()));
        assert_eq!(record.raw_text, RESUME);
    }
}
