//! Latent Dirichlet allocation fitted by batch variational Bayes.
//!
//! Dense matrices throughout: the corpus is two documents and at most a hundred
//! features. Results are reproducible for a given seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::text::TextModelError;

const EPS: f64 = f64::EPSILON;

#[derive(Debug, Clone)]
pub struct LdaConfig {
    pub n_topics: usize,
    pub max_iter: usize,
    pub max_doc_update_iter: usize,
    pub mean_change_tol: f64,
    pub seed: u64,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            n_topics: 5,
            max_iter: 10,
            max_doc_update_iter: 100,
            mean_change_tol: 1e-3,
            seed: 42,
        }
    }
}

/// Fits the model on `matrix` (documents × features, non-negative weights) and
/// returns each document's normalised topic distribution.
pub fn fit_transform(matrix: &[Vec<f64>], config: &LdaConfig) -> Result<Vec<Vec<f64>>, TextModelError> {
    let n_features = matrix.first().map(Vec::len).unwrap_or(0);
    if matrix.is_empty() || n_features == 0 {
        return Err(TextModelError::EmptyCorpus);
    }
    if config.n_topics == 0 {
        return Err(TextModelError::Degenerate("zero topics requested".to_string()));
    }
    if matrix.iter().flatten().any(|v| *v < 0.0 || !v.is_finite()) {
        return Err(TextModelError::Degenerate("negative or non-finite weight".to_string()));
    }

    let k = config.n_topics;
    let doc_topic_prior = 1.0 / k as f64;
    let topic_word_prior = 1.0 / k as f64;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut lambda: Vec<Vec<f64>> = (0..k)
        .map(|_| (0..n_features).map(|_| rng.gen_range(0.8..1.2)).collect())
        .collect();

    for _ in 0..config.max_iter {
        let exp_topic_word = exp_dirichlet_expectation(&lambda);
        let (_, suff_stats) = e_step(matrix, &exp_topic_word, doc_topic_prior, config, true);
        for (topic, stats) in lambda.iter_mut().zip(suff_stats) {
            for (value, stat) in topic.iter_mut().zip(stats) {
                *value = topic_word_prior + stat;
            }
        }
    }

    let exp_topic_word = exp_dirichlet_expectation(&lambda);
    let (gamma, _) = e_step(matrix, &exp_topic_word, doc_topic_prior, config, false);

    gamma
        .into_iter()
        .map(|row| {
            let total: f64 = row.iter().sum();
            if total <= 0.0 || !total.is_finite() {
                return Err(TextModelError::Degenerate("empty topic distribution".to_string()));
            }
            Ok(row.into_iter().map(|v| v / total).collect())
        })
        .collect()
}

/// Variational E-step: per-document topic weights and, when requested, the
/// sufficient statistics for the topic-word update.
fn e_step(
    matrix: &[Vec<f64>],
    exp_topic_word: &[Vec<f64>],
    alpha: f64,
    config: &LdaConfig,
    collect_stats: bool,
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let k = exp_topic_word.len();
    let n_features = exp_topic_word[0].len();
    let mut suff_stats = vec![vec![0.0; n_features]; k];
    let mut gammas = Vec::with_capacity(matrix.len());

    for doc in matrix {
        let ids: Vec<usize> = (0..n_features).filter(|&j| doc[j] > 0.0).collect();
        let mut gamma = vec![1.0; k];
        let mut exp_doc_topic = exp_dirichlet_row(&gamma);
        let mut norm_phi = phi_norm(&ids, &exp_doc_topic, exp_topic_word);

        for _ in 0..config.max_doc_update_iter {
            let last = gamma.clone();
            for t in 0..k {
                let weighted: f64 = ids
                    .iter()
                    .zip(&norm_phi)
                    .map(|(&j, norm)| doc[j] / norm * exp_topic_word[t][j])
                    .sum();
                gamma[t] = exp_doc_topic[t] * weighted + alpha;
            }
            exp_doc_topic = exp_dirichlet_row(&gamma);
            norm_phi = phi_norm(&ids, &exp_doc_topic, exp_topic_word);

            let mean_change =
                gamma.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum::<f64>() / k as f64;
            if mean_change < config.mean_change_tol {
                break;
            }
        }

        if collect_stats {
            for t in 0..k {
                for (&j, norm) in ids.iter().zip(&norm_phi) {
                    suff_stats[t][j] += exp_doc_topic[t] * doc[j] / norm;
                }
            }
        }
        gammas.push(gamma);
    }

    if collect_stats {
        for (stats, exp_row) in suff_stats.iter_mut().zip(exp_topic_word) {
            for (stat, e) in stats.iter_mut().zip(exp_row) {
                *stat *= e;
            }
        }
    }
    (gammas, suff_stats)
}

fn phi_norm(ids: &[usize], exp_doc_topic: &[f64], exp_topic_word: &[Vec<f64>]) -> Vec<f64> {
    ids.iter()
        .map(|&j| {
            exp_doc_topic
                .iter()
                .zip(exp_topic_word)
                .map(|(d, row)| d * row[j])
                .sum::<f64>()
                + EPS
        })
        .collect()
}

fn exp_dirichlet_row(row: &[f64]) -> Vec<f64> {
    let total = digamma(row.iter().sum());
    row.iter().map(|v| (digamma(*v) - total).exp()).collect()
}

fn exp_dirichlet_expectation(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    matrix.iter().map(|row| exp_dirichlet_row(row)).collect()
}

/// Digamma via upward recurrence and the asymptotic series.
pub fn digamma(mut x: f64) -> f64 {
    let mut result = 0.0;
    while x < 10.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln() - 0.5 * inv
        - inv2 * (1.0 / 12.0 - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0)))
}
