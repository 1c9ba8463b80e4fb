use axum::{
    extract::{Multipart, State},
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::matcher::JobQuery;
use crate::analysis::report::MatchOutcome;
use crate::analysis::service::{BatchItem, Upload};
use crate::errors::AppError;
use crate::extraction::DocumentKind;
use crate::resume::ResumeRecord;
use crate::state::AppState;

const STATUS_SUCCESS: &str = "success";

// ────────────────────────────────────────────────────────────────────────────
// Request / response shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Serialize)]
pub struct FileAnalysisResponse {
    pub status: &'static str,
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub resume_data: ResumeRecord,
    pub match_result: MatchOutcome,
    pub file_info: FileInfo,
}

/// Missing fields deserialize as empty and are rejected by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UrlAnalysisForm {
    pub url: String,
    pub job_description: String,
    pub job_title: String,
}

#[derive(Debug, Serialize)]
pub struct UrlInfo {
    pub url: String,
    #[serde(rename = "type")]
    pub source_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UrlAnalysisResponse {
    pub status: &'static str,
    pub request_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub resume_data: ResumeRecord,
    pub match_result: MatchOutcome,
    pub url_info: UrlInfo,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub status: &'static str,
    pub request_id: Uuid,
    pub total_files: usize,
    pub results: Vec<BatchItem>,
}

/// Pre-structured résumé plus the job to score it against.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume: ResumeRecord,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Input helpers
// ────────────────────────────────────────────────────────────────────────────

/// Fields of an upload form; every file part lands in `uploads` in arrival order.
#[derive(Default)]
struct UploadForm {
    uploads: Vec<Upload>,
    job_title: Option<String>,
    job_description: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart, file_field: &str) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "job_title" => form.job_title = Some(field.text().await?),
            "job_description" => form.job_description = Some(field.text().await?),
            n if n == file_field => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await?;
                form.uploads.push(Upload { file_name, bytes });
            }
            _ => {
                let _ = field.bytes().await?;
            }
        }
    }
    Ok(form)
}

/// Both job fields are required and must not be blank.
fn job_query(job_title: Option<String>, job_description: Option<String>) -> Result<JobQuery, AppError> {
    let require = |value: Option<String>, field: &str| {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Validation(format!("{field} is required")))
    };
    Ok(JobQuery {
        job_title: require(job_title, "job_title")?,
        job_description: require(job_description, "job_description")?,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload/file
pub async fn handle_upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<FileAnalysisResponse>, AppError> {
    let form = read_upload_form(multipart, "file").await?;
    let job = job_query(form.job_title, form.job_description)?;
    let upload = form
        .uploads
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let request_id = Uuid::new_v4();
    let kind = DocumentKind::from_file_name(&upload.file_name)?;
    let file_info = FileInfo {
        filename: upload.file_name.clone(),
        size: upload.bytes.len(),
        file_type: kind.extension().to_string(),
    };

    let analysis = state.analyzer.analyze_upload(request_id, upload, &job).await?;
    info!(
        %request_id,
        file = %file_info.filename,
        score = analysis.match_result.overall_match_score(),
        "File analysed"
    );

    Ok(Json(FileAnalysisResponse {
        status: STATUS_SUCCESS,
        request_id,
        analyzed_at: Utc::now(),
        resume_data: analysis.resume_data,
        match_result: analysis.match_result,
        file_info,
    }))
}

/// POST /upload/url
pub async fn handle_upload_url(
    State(state): State<AppState>,
    Form(form): Form<UrlAnalysisForm>,
) -> Result<Json<UrlAnalysisResponse>, AppError> {
    let job = job_query(Some(form.job_title), Some(form.job_description))?;
    let url = form.url.trim().to_string();
    if url.is_empty() {
        return Err(AppError::Validation("url is required".to_string()));
    }

    let request_id = Uuid::new_v4();
    let analysis = state.analyzer.analyze_url(request_id, &url, &job).await?;
    info!(
        %request_id,
        %url,
        score = analysis.match_result.overall_match_score(),
        "Web page analysed"
    );

    Ok(Json(UrlAnalysisResponse {
        status: STATUS_SUCCESS,
        request_id,
        analyzed_at: Utc::now(),
        resume_data: analysis.resume_data,
        match_result: analysis.match_result,
        url_info: UrlInfo {
            url,
            source_type: "webpage",
        },
    }))
}

/// POST /analyze/batch
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchResponse>, AppError> {
    let form = read_upload_form(multipart, "files").await?;
    let job = job_query(form.job_title, form.job_description)?;
    if form.uploads.is_empty() {
        return Err(AppError::Validation("at least one file is required".to_string()));
    }

    let request_id = Uuid::new_v4();
    let total_files = form.uploads.len();
    let results = state.analyzer.analyze_batch(request_id, form.uploads, &job).await;

    Ok(Json(BatchResponse {
        status: STATUS_SUCCESS,
        request_id,
        total_files,
        results,
    }))
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchOutcome>, AppError> {
    let job = job_query(Some(req.job_title), Some(req.job_description))?;
    let outcome = state
        .analyzer
        .match_record(Uuid::new_v4(), &req.resume, &job)
        .await;
    Ok(Json(outcome))
}
