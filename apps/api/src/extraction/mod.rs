//! Text extraction: turns an uploaded artifact into plain text.
//!
//! Callers depend on `TextExtractor` / `PageFetcher`; the scoring pipeline never
//! sees file formats.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod html;

pub use html::{HttpPageFetcher, PageFetcher};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{kind} parsing failed: {message}")]
    Corrupt { kind: DocumentKind, message: String },

    #[error("no text could be extracted from {0}")]
    Empty(DocumentKind),

    #[error("cannot fetch {url}: {message}")]
    Fetch { url: String, message: String },
}

impl ExtractionError {
    /// Machine-readable code surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ExtractionError::Fetch { .. } => "FETCH_ERROR",
            ExtractionError::Corrupt { .. } | ExtractionError::Empty(_) => "EXTRACTION_ERROR",
        }
    }
}

/// Declared type of an uploaded résumé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
    Markdown,
    Text,
}

impl DocumentKind {
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] = &[".pdf", ".docx", ".doc", ".md", ".txt"];

    /// Resolves the kind from a file name's extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "doc" => Ok(DocumentKind::Doc),
            "docx" => Ok(DocumentKind::Docx),
            "md" => Ok(DocumentKind::Markdown),
            "txt" => Ok(DocumentKind::Text),
            "" => Err(ExtractionError::UnsupportedFormat("(none)".to_string())),
            other => Err(ExtractionError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => ".pdf",
            DocumentKind::Doc => ".doc",
            DocumentKind::Docx => ".docx",
            DocumentKind::Markdown => ".md",
            DocumentKind::Text => ".txt",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Doc | DocumentKind::Docx => "Word document",
            DocumentKind::Markdown => "Markdown",
            DocumentKind::Text => "text file",
        };
        f.write_str(label)
    }
}

/// Given an artifact of a declared type, returns its plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Default extractor: pdf-extract for PDF, docx-rs for Word, regex clean-up for Markdown.
#[derive(Debug, Default, Clone)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = match kind {
            DocumentKind::Pdf => extract_pdf(bytes)?,
            DocumentKind::Doc | DocumentKind::Docx => extract_word(kind, bytes)?,
            DocumentKind::Markdown => markdown_to_text(&decode_utf8(kind, bytes)?),
            DocumentKind::Text => decode_utf8(kind, bytes)?,
        };
        debug!("Extracted {} chars from {}", text.chars().count(), kind);
        Ok(text)
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Corrupt {
        kind: DocumentKind::Pdf,
        message: e.to_string(),
    })?;
    non_empty(DocumentKind::Pdf, text.trim().to_string())
}

fn extract_word(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Corrupt {
        kind,
        message: e.to_string(),
    })?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    non_empty(kind, text.trim().to_string())
}

fn decode_utf8(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Corrupt {
        kind,
        message: e.to_string(),
    })
}

fn non_empty(kind: DocumentKind, text: String) -> Result<String, ExtractionError> {
    if text.is_empty() {
        Err(ExtractionError::Empty(kind))
    } else {
        Ok(text)
    }
}

struct MarkdownPatterns {
    fence: Regex,
    image: Regex,
    link: Regex,
    heading: Regex,
    quote: Regex,
    bullet: Regex,
    emphasis: Regex,
}

fn markdown_patterns() -> &'static MarkdownPatterns {
    static PATTERNS: OnceLock<MarkdownPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkdownPatterns {
        fence: Regex::new(r"(?m)^\s*(```|~~~).*$").expect("valid regex"),
        image: Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid regex"),
        link: Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"),
        heading: Regex::new(r"(?m)^\s{0,3}#{1,6}\s*").expect("valid regex"),
        quote: Regex::new(r"(?m)^\s*>\s?").expect("valid regex"),
        bullet: Regex::new(r"(?m)^(\s*)([-*+]|\d+\.)\s+").expect("valid regex"),
        // Paired delimiters only; the opening and closing marks must hug the text.
        emphasis: Regex::new(concat!(
            r"\*\*([^*\s](?:[^*\n]*[^*\s])?)\*\*",
            r"|\b__([^_\s](?:[^_\n]*[^_\s])?)__\b",
            r"|\*([^*\s](?:[^*\n]*[^*\s])?)\*",
            r"|\b_([^_\s](?:[^_\n]*[^_\s])?)_\b",
            r"|`([^`\n]+)`",
        ))
        .expect("valid regex"),
    })
}

/// Removes Markdown markup, keeping the visible text and line structure.
pub fn markdown_to_text(markdown: &str) -> String {
    let p = markdown_patterns();
    let text = p.fence.replace_all(markdown, "");
    let text = p.image.replace_all(&text, "$1");
    let text = p.link.replace_all(&text, "$1");
    let text = p.heading.replace_all(&text, "");
    let text = p.quote.replace_all(&text, "");
    let text = p.bullet.replace_all(&text, "$1");
    let text = p.emphasis.replace_all(&text, "${1}${2}${3}${4}${5}");
    text.trim().to_string()
}
