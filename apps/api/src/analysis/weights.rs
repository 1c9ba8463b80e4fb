use serde::{Deserialize, Serialize};

/// Weight of each signal in the overall match score. The defaults sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub tfidf: f64,
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
    pub topic: f64,
    pub ai: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tfidf: 0.15,
            skill: 0.30,
            experience: 0.25,
            education: 0.10,
            topic: 0.10,
            ai: 0.10,
        }
    }
}

/// The per-signal values fed into the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub tfidf: f64,
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
    pub topic: f64,
    pub ai: f64,
}

impl ComponentScores {
    pub fn all_finite(&self) -> bool {
        [self.tfidf, self.skill, self.experience, self.education, self.topic, self.ai]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Weighted sum of the six signals, clamped to [0, 1].
pub fn compute_combined_score(scores: &ComponentScores, weights: &ScoringWeights) -> f64 {
    (weights.tfidf * scores.tfidf
        + weights.skill * scores.skill
        + weights.experience * scores.experience
        + weights.education * scores.education
        + weights.topic * scores.topic
        + weights.ai * scores.ai)
        .clamp(0.0, 1.0)
}
