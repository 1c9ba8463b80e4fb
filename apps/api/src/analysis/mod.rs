//! Résumé-to-job matching: text models, the six scorers, aggregation and the service.
//!
//! Scorers are pure functions of (record, job description, vocabulary). The oracle
//! assessment is the only step that awaits.

pub mod assessment;
pub mod education;
pub mod experience;
pub mod handlers;
pub mod keywords;
pub mod matcher;
pub mod prompts;
pub mod report;
pub mod service;
pub mod similarity;
pub mod skills;
pub mod text;
pub mod topics;
pub mod weights;
