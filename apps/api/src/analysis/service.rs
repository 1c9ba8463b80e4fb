//! Résumé analysis service: extraction, structuring and matching behind one handle.
//!
//! Shared by every request as `Arc<ResumeAnalyzer>`; holds no mutable state.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::matcher::{JobMatcher, JobQuery};
use crate::analysis::report::MatchOutcome;
use crate::extraction::{DocumentKind, ExtractionError, PageFetcher, TextExtractor};
use crate::resume::extractor::build_record;
use crate::resume::ResumeRecord;

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Result of analysing one file, successful or not.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub resume_data: ResumeRecord,
    pub match_result: MatchOutcome,
}

/// Per-file entry of a batch response, tagged by `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchItem {
    Success {
        filename: String,
        resume_data: ResumeRecord,
        match_result: MatchOutcome,
    },
    Error {
        filename: String,
        code: &'static str,
        error: String,
    },
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchItem::Success { .. })
    }
}

pub struct ResumeAnalyzer {
    extractor: Arc<dyn TextExtractor>,
    fetcher: Arc<dyn PageFetcher>,
    matcher: JobMatcher,
}

impl ResumeAnalyzer {
    pub fn new(extractor: Arc<dyn TextExtractor>, fetcher: Arc<dyn PageFetcher>, matcher: JobMatcher) -> Self {
        Self {
            extractor,
            fetcher,
            matcher,
        }
    }

    /// Format check, then text extraction off the async runtime, structuring and matching.
    #[tracing::instrument(skip_all, fields(request_id = %request_id, file = %upload.file_name))]
    pub async fn analyze_upload(&self, request_id: Uuid, upload: Upload, job: &JobQuery) -> Result<Analysis, ExtractionError> {
        let kind = DocumentKind::from_file_name(&upload.file_name)?;
        let text = self.extract_text(kind, upload.bytes).await?;
        info!("Extracted {} chars from {}", text.chars().count(), upload.file_name);
        Ok(self.analyze_text(&text, None, job).await)
    }

    #[tracing::instrument(skip_all, fields(request_id = %request_id, url = %url))]
    pub async fn analyze_url(&self, request_id: Uuid, url: &str, job: &JobQuery) -> Result<Analysis, ExtractionError> {
        let text = self.fetcher.fetch_text(url).await?;
        if text.trim().is_empty() {
            return Err(ExtractionError::Fetch {
                url: url.to_string(),
                message: "page contains no text".to_string(),
            });
        }
        Ok(self.analyze_text(&text, Some(url), job).await)
    }

    /// One item per upload, in input order. Bad files become error items.
    #[tracing::instrument(skip_all, fields(request_id = %request_id, files = uploads.len()))]
    pub async fn analyze_batch(&self, request_id: Uuid, uploads: Vec<Upload>, job: &JobQuery) -> Vec<BatchItem> {
        let mut results = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let filename = upload.file_name.clone();
            let item = match self.analyze_upload(request_id, upload, job).await {
                Ok(analysis) => BatchItem::Success {
                    filename,
                    resume_data: analysis.resume_data,
                    match_result: analysis.match_result,
                },
                Err(e) => {
                    warn!("Batch item {} failed: {}", filename, e);
                    BatchItem::Error {
                        filename,
                        code: e.code(),
                        error: e.to_string(),
                    }
                }
            };
            results.push(item);
        }
        info!(
            succeeded = results.iter().filter(|r| r.is_success()).count(),
            total = results.len(),
            "Batch analysed"
        );
        results
    }

    /// Scores an already-structured record.
    #[tracing::instrument(skip_all, fields(request_id = %request_id))]
    pub async fn match_record(&self, request_id: Uuid, record: &ResumeRecord, job: &JobQuery) -> MatchOutcome {
        self.matcher.calculate_match(record, job).await
    }

    async fn extract_text(&self, kind: DocumentKind, bytes: Bytes) -> Result<String, ExtractionError> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || extractor.extract(kind, &bytes))
            .await
            .map_err(|e| ExtractionError::Corrupt {
                kind,
                message: format!("extraction task failed: {e}"),
            })?
    }

    async fn analyze_text(&self, text: &str, source_url: Option<&str>, job: &JobQuery) -> Analysis {
        let record = build_record(
            text,
            source_url,
            self.matcher.oracle(),
            self.matcher.oracle_timeout(),
            self.matcher.vocabulary(),
        )
        .await;
        let match_result = self.matcher.calculate_match(&record, job).await;
        Analysis {
            resume_data: record,
            match_result,
        }
    }
}
