//! Job matcher: runs the six scorers over one résumé and one job, then aggregates.
//!
//! Scorers recover their own failures (0.0 or a neutral assessment). Anything
//! that still goes wrong downgrades the whole result to `MatchOutcome::Failed`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::assessment::assess;
use crate::analysis::education::calculate_education_match;
use crate::analysis::experience::calculate_experience_match;
use crate::analysis::report::{
    build_recommendations, render_detailed_analysis, AnalysisInputs, MatchOutcome, MatchReport,
};
use crate::analysis::similarity::{lexical_similarity, topic_similarity};
use crate::analysis::skills::calculate_skill_match;
use crate::analysis::weights::{compute_combined_score, ComponentScores, ScoringWeights};
use crate::llm_client::AssessmentOracle;
use crate::resume::ResumeRecord;
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobQuery {
    pub job_title: String,
    pub job_description: String,
}

pub struct JobMatcher {
    oracle: Arc<dyn AssessmentOracle>,
    vocabulary: Arc<Vocabulary>,
    weights: ScoringWeights,
    oracle_timeout: Duration,
}

impl JobMatcher {
    pub fn new(
        oracle: Arc<dyn AssessmentOracle>,
        vocabulary: Arc<Vocabulary>,
        weights: ScoringWeights,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            vocabulary,
            weights,
            oracle_timeout,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn oracle(&self) -> &dyn AssessmentOracle {
        self.oracle.as_ref()
    }

    pub fn oracle_timeout(&self) -> Duration {
        self.oracle_timeout
    }

    /// Always returns a well-formed outcome.
    #[tracing::instrument(skip_all, fields(job_title = %job.job_title))]
    pub async fn calculate_match(&self, record: &ResumeRecord, job: &JobQuery) -> MatchOutcome {
        match self.try_calculate(record, job).await {
            Ok(report) => {
                info!(score = report.overall_match_score, "Match calculated");
                MatchOutcome::Report(report)
            }
            Err(e) => {
                warn!("Match calculation failed: {e:#}");
                MatchOutcome::failed(e)
            }
        }
    }

    async fn try_calculate(&self, record: &ResumeRecord, job: &JobQuery) -> Result<MatchReport> {
        let vocab = self.vocabulary.as_ref();
        let resume_text = record.composite_text();
        let jd = job.job_description.as_str();

        let tfidf_similarity = lexical_similarity(&resume_text, jd, &vocab.stop_words);
        let skill_match = calculate_skill_match(record, jd, vocab);
        let experience_match = calculate_experience_match(record, jd, vocab);
        let education_match = calculate_education_match(record, jd, vocab);
        let topic_similarity = topic_similarity(&resume_text, jd, &vocab.stop_words);

        let ai_assessment = assess(
            self.oracle.as_ref(),
            &job.job_title,
            jd,
            &resume_text,
            self.oracle_timeout,
        )
        .await;

        let scores = ComponentScores {
            tfidf: tfidf_similarity,
            skill: skill_match.match_rate,
            experience: experience_match.match_score,
            education: education_match.match_score,
            topic: topic_similarity,
            ai: ai_assessment.overall_score,
        };
        if !scores.all_finite() {
            bail!("non-finite component score: {scores:?}");
        }
        let overall_match_score = compute_combined_score(&scores, &self.weights);
        if !overall_match_score.is_finite() {
            bail!("weights produced a non-finite score: {:?}", self.weights);
        }

        let detailed_analysis = render_detailed_analysis(&AnalysisInputs {
            job_title: &job.job_title,
            tfidf_similarity,
            topic_similarity,
            skill_match: &skill_match,
            experience_match: &experience_match,
            education_match: &education_match,
            ai_assessment: &ai_assessment,
        });
        let recommendations = build_recommendations(&skill_match, &experience_match, &ai_assessment);

        Ok(MatchReport {
            overall_match_score,
            tfidf_similarity,
            skill_match,
            experience_match,
            education_match,
            topic_similarity,
            ai_assessment,
            detailed_analysis,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::assessment::AiAssessment;
    use crate::analysis::report::GENERIC_RECOMMENDATION;
    use crate::llm_client::testing::{FailingOracle, FixedOracle};
    use crate::resume::{Education, WorkExperience};
    use proptest::prelude::*;

    const ORACLE_REPLY: &str = r#"{"technical_skills": 0.8, "work_experience": 0.7,
        "project_experience": 0.6, "learning_potential": 0.8, "overall_score": 0.75,
        "strengths": ["Python"], "weaknesses": ["Cloud"], "summary": "Good fit"}"#;

    fn matcher(oracle: Arc<dyn AssessmentOracle>) -> JobMatcher {
        JobMatcher::new(
            oracle,
            Arc::new(Vocabulary::default()),
            ScoringWeights::default(),
            Duration::from_secs(60),
        )
    }

    fn job(description: &str) -> JobQuery {
        JobQuery {
            job_title: "Backend Engineer".to_string(),
            job_description: description.to_string(),
        }
    }

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            raw_text: "Backend engineer. Built Python services and React dashboards.".to_string(),
            skills: vec!["python".to_string(), "react".to_string()],
            work_experience: vec![WorkExperience {
                position: Some("Backend engineer".to_string()),
                description: Some("Python services, docker deployments".to_string()),
                ..Default::default()
            }],
            education: vec![Education {
                degree: Some("硕士".to_string()),
                major: Some("计算机".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn report(outcome: MatchOutcome) -> MatchReport {
        match outcome {
            MatchOutcome::Report(r) => r,
            MatchOutcome::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    #[tokio::test]
    async fn test_full_pipeline_scenario() {
        let m = matcher(Arc::new(FixedOracle(ORACLE_REPLY.to_string())));
        let r = report(
            m.calculate_match(&sample_record(), &job("We need python, docker, react. 本科及以上"))
                .await,
        );
        assert_eq!(r.skill_match.matched_skills, vec!["python", "react"]);
        assert_eq!(r.skill_match.missing_skills, vec!["docker"]);
        assert!(r.education_match.degree_match);
        assert_eq!(r.ai_assessment.overall_score, 0.75);
        assert!((0.0..=1.0).contains(&r.overall_match_score));
        assert!(r.recommendations[0].contains("docker"));
    }

    #[tokio::test]
    async fn test_pipeline_is_idempotent() {
        let m = matcher(Arc::new(FixedOracle(ORACLE_REPLY.to_string())));
        let record = sample_record();
        let query = job("python docker react backend");
        let first = m.calculate_match(&record, &query).await;
        let second = m.calculate_match(&record, &query).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_oracle_failure_uses_neutral_assessment() {
        let m = matcher(Arc::new(FailingOracle));
        let r = report(m.calculate_match(&sample_record(), &job("python")).await);
        assert_eq!(r.ai_assessment, AiAssessment::neutral());
    }

    #[tokio::test]
    async fn test_empty_job_description() {
        let m = matcher(Arc::new(FailingOracle));
        let r = report(m.calculate_match(&sample_record(), &job("")).await);
        assert_eq!(r.skill_match.match_rate, 0.0);
        assert_eq!(r.tfidf_similarity, 0.0);
        // experience is below 0.6 with an empty description, so the generic line is absent
        assert!(!r.recommendations.iter().any(|s| s == GENERIC_RECOMMENDATION));
    }

    #[tokio::test]
    async fn test_empty_record_still_reports() {
        let m = matcher(Arc::new(FailingOracle));
        let outcome = m.calculate_match(&ResumeRecord::default(), &job("python")).await;
        assert!(outcome.report().is_some());
        assert!((0.0..=1.0).contains(&outcome.overall_match_score()));
    }

    #[tokio::test]
    async fn test_non_finite_weights_downgrade_to_failed() {
        let weights = ScoringWeights {
            skill: f64::NAN,
            ..Default::default()
        };
        let m = JobMatcher::new(
            Arc::new(FailingOracle),
            Arc::new(Vocabulary::default()),
            weights,
            Duration::from_secs(60),
        );
        let outcome = m.calculate_match(&sample_record(), &job("python")).await;
        match outcome {
            MatchOutcome::Failed { error, overall_match_score } => {
                assert_eq!(overall_match_score, 0.0);
                assert!(error.starts_with("Match calculation failed"));
            }
            MatchOutcome::Report(_) => panic!("expected a failed outcome"),
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_every_score_in_unit_range(
            raw_text in "[a-zA-Z .\n]{0,120}",
            skills in proptest::collection::vec("[a-z.]{0,10}", 0..5),
            positions in proptest::collection::vec("[a-z ]{0,30}", 0..4),
            description in "[a-zA-Z ,.]{0,120}",
        ) {
            let record = ResumeRecord {
                raw_text,
                skills,
                work_experience: positions
                    .into_iter()
                    .map(|p| WorkExperience { position: Some(p), ..Default::default() })
                    .collect(),
                ..Default::default()
            };
            let m = matcher(Arc::new(FixedOracle(ORACLE_REPLY.to_string())));
            let outcome = runtime().block_on(m.calculate_match(&record, &job(&description)));
            let r = outcome.report().cloned().expect("bounded scorers always produce a report");

            for score in [
                r.overall_match_score,
                r.tfidf_similarity,
                r.topic_similarity,
                r.skill_match.match_rate,
                r.experience_match.match_score,
                r.education_match.match_score,
                r.education_match.major_relevance,
                r.ai_assessment.overall_score,
            ] {
                prop_assert!((0.0..=1.0).contains(&score), "score out of range: {}", score);
            }
            if r.skill_match.total_job_skills > 0 {
                let expected = r.skill_match.matched_skills.len() as f64
                    / r.skill_match.total_job_skills as f64;
                prop_assert!((r.skill_match.match_rate - expected).abs() < 1e-12);
            } else {
                prop_assert_eq!(r.skill_match.match_rate, 0.0);
            }
        }
    }
}
