//! Plain-text document export.
//!
//! Generated drafts are plain text; these helpers turn them into downloadable PDF or DOCX
//! bytes. A document is rendered as an optional bold title followed by one paragraph per
//! source line.

mod docx;
mod pdf;

pub use docx::render_docx;
pub use pdf::render_pdf;

use std::fmt;
use std::str::FromStr;

use mime::Mime;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported export format `{0}` (expected pdf or docx)")]
    UnsupportedFormat(String),
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
    #[error("docx rendering failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn mime(self) -> Mime {
        match self {
            ExportFormat::Pdf => mime::APPLICATION_PDF,
            ExportFormat::Docx => DOCX_CONTENT_TYPE
                .parse()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        }
    }

    /// Picks the format whose media type matches, e.g. one guessed from a file extension.
    pub fn from_mime(mime: &Mime) -> Option<Self> {
        [ExportFormat::Pdf, ExportFormat::Docx]
            .into_iter()
            .find(|format| format.mime().essence_str() == mime.essence_str())
    }

    /// Attachment name in the `{prefix}_{unix millis}.{ext}` shape used for downloads.
    pub fn file_name(self, prefix: &str, timestamp_millis: i64) -> String {
        let prefix: String = prefix
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' { ch } else { '_' })
            .collect();
        let prefix = if prefix.is_empty() { "documento".to_string() } else { prefix };
        format!("{prefix}_{timestamp_millis}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Text to export plus an optional heading.
#[derive(Debug, Clone, Copy)]
pub struct ExportDocument<'a> {
    pub title: Option<&'a str>,
    pub body: &'a str,
}

impl<'a> ExportDocument<'a> {
    pub fn new(body: &'a str) -> Self {
        Self { title: None, body }
    }

    pub fn titled(title: &'a str, body: &'a str) -> Self {
        Self {
            title: Some(title).filter(|title| !title.trim().is_empty()),
            body,
        }
    }
}

pub fn render(format: ExportFormat, document: ExportDocument<'_>) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Pdf => render_pdf(document),
        ExportFormat::Docx => render_docx(document),
    }
}
