//! Document upload and ingest

use super::{DocumentError, RagClient};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One file ready to be sent as a `files` multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk
    pub async fn read(path: &Path) -> Result<Self, DocumentError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DocumentError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "document".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            content_type: content_type_for(path),
            file_name,
            bytes,
        })
    }

    fn into_part(self) -> Result<Part, DocumentError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.content_type)?)
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Response of `POST /upload`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(default)]
    pub filenames: Vec<String>,
}

/// Response of `POST /load-and-process-pdfs`
#[derive(Debug, Clone, Deserialize)]
pub struct IngestResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RagClient {
    /// Upload documents. Every file is read before anything is sent.
    pub async fn upload(&self, paths: &[PathBuf]) -> Result<UploadResponse, DocumentError> {
        if paths.is_empty() {
            return Err(DocumentError::NoFiles);
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(UploadFile::read(path).await?);
        }

        let mut form = Form::new();
        for file in files {
            form = form.part("files", file.into_part()?);
        }

        let response = self
            .client
            .post(self.url(&["upload"]))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Upload failed");
            return Err(DocumentError::Rejected { status, body });
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::info!(files = ?uploaded.filenames, "Upload successful");
        Ok(uploaded)
    }

    /// Ask the backend to load and index the uploaded PDFs
    pub async fn ingest(&self) -> Result<String, DocumentError> {
        let response = self
            .client
            .post(self.url(&["load-and-process-pdfs"]))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Ingest failed");
            return Err(DocumentError::Rejected { status, body });
        }

        let result: IngestResponse = response.json().await?;
        interpret_ingest(result)
    }
}

/// The backend reports script failures with status 200 and an `error` field
fn interpret_ingest(response: IngestResponse) -> Result<String, DocumentError> {
    match response {
        IngestResponse {
            error: Some(error), ..
        } => Err(DocumentError::IngestFailed(error)),
        IngestResponse { message, .. } => {
            Ok(message.unwrap_or_else(|| "PDFs loaded and processed successfully".to_string()))
        }
    }
}
