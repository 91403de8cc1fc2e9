//! HTTP client for the generation service — the single point of entry for
//! all service calls in the client.
//!
//! Every generation endpoint answers with the same envelope
//! `{success, data?, error?}`, including on 5xx, so the envelope is decoded
//! regardless of status. The export endpoint is different: it streams bytes
//! on 2xx and anything else is a transport error.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::ClientError;
use crate::models::{Attachment, CvForm, GenerationRequest, LetterForm};

const SEARCH_JOBS_PATH: &str = "/api/search-jobs";
const GENERATE_CV_PATH: &str = "/api/generate-cv";
const GENERATE_COVER_LETTER_PATH: &str = "/api/generate-cover-letter";
const DOWNLOAD_LATEX_PATH: &str = "/api/download-latex";

/// Boundary to the remote generation service. The coordinator depends on
/// this trait, not on reqwest, so submissions are testable with a scripted
/// service.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Submits one request and returns the payload of a successful response.
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, ClientError>;
}

/// Boundary to the export endpoint (LaTeX formatting/persistence).
#[async_trait]
pub trait FileExporter: Send + Sync {
    /// Sends stored text plus the requested filename; returns the rendered
    /// byte stream.
    async fn fetch_export(&self, content: &str, filename: &str) -> Result<Bytes, ClientError>;
}

/// Response envelope shared by all generation endpoints.
#[derive(Debug, Deserialize)]
struct ServiceEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExportRequest<'a> {
    latex_content: &'a str,
    filename: &'a str,
}

/// Reqwest-backed client for the generation service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, ClientError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_envelope(path, response).await
    }

    async fn post_multipart(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<Value, ClientError> {
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        read_envelope(path, response).await
    }
}

async fn read_envelope(path: &str, response: reqwest::Response) -> Result<Value, ClientError> {
    let envelope: ServiceEnvelope = response.json().await?;
    if envelope.success {
        debug!(path, "service call succeeded");
        Ok(envelope.data.unwrap_or(Value::Null))
    } else {
        Err(ClientError::Service(
            envelope
                .error
                .unwrap_or_else(|| "unknown service error".to_string()),
        ))
    }
}

/// Builds the multipart body for a CV submission. The service reads the
/// attachment when present and falls back to the inline `cv_content` field.
fn cv_multipart(form: &CvForm) -> multipart::Form {
    attach_cv_source(
        multipart::Form::new()
            .text("job_description", form.job_description.clone())
            .text("personal_info", form.personal_info.clone()),
        &form.cv_file,
        &form.cv_content,
    )
}

fn letter_multipart(form: &LetterForm) -> multipart::Form {
    attach_cv_source(
        multipart::Form::new()
            .text("job_description", form.job_description.clone())
            .text("company_info", form.company_info.clone()),
        &form.cv_file,
        &form.cv_content,
    )
}

/// How the resume reaches the service: as a file part when an attachment is
/// present, otherwise as the inline `cv_content` field (empty if the user
/// provided neither — the service treats that as an empty resume).
#[derive(Debug)]
enum CvSource<'a> {
    File(&'a Attachment),
    Inline(&'a str),
}

fn cv_source<'a>(file: &'a Option<Attachment>, inline: &'a Option<String>) -> CvSource<'a> {
    match (file, inline) {
        (Some(attachment), _) => CvSource::File(attachment),
        (None, Some(text)) => CvSource::Inline(text),
        (None, None) => CvSource::Inline(""),
    }
}

fn attach_cv_source(
    form: multipart::Form,
    file: &Option<Attachment>,
    inline: &Option<String>,
) -> multipart::Form {
    match cv_source(file, inline) {
        CvSource::File(attachment) => form.part(
            "cv_file",
            multipart::Part::bytes(attachment.bytes.clone()).file_name(attachment.filename.clone()),
        ),
        CvSource::Inline(text) => form.text("cv_content", text.to_string()),
    }
}

#[async_trait]
impl GenerationService for ApiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, ClientError> {
        match request {
            GenerationRequest::JobSearch(form) => self.post_json(SEARCH_JOBS_PATH, form).await,
            GenerationRequest::Cv(form) => {
                self.post_multipart(GENERATE_CV_PATH, cv_multipart(form)).await
            }
            GenerationRequest::CoverLetter(form) => {
                self.post_multipart(GENERATE_COVER_LETTER_PATH, letter_multipart(form))
                    .await
            }
        }
    }
}

#[async_trait]
impl FileExporter for ApiClient {
    async fn fetch_export(&self, content: &str, filename: &str) -> Result<Bytes, ClientError> {
        let response = self
            .client
            .post(self.url(DOWNLOAD_LATEX_PATH))
            .json(&ExportRequest {
                latex_content: content,
                filename,
            })
            .send()
            .await?
            .error_for_status()?;
        debug!(filename, "export endpoint returned a byte stream");
        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_with_string_data() {
        let envelope: ServiceEnvelope =
            serde_json::from_str(r#"{"success": true, "data": "generated text"}"#).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(Value::String("generated text".into())));
        assert_eq!(envelope.error, None);
    }

    #[test]
    fn test_envelope_failure_carries_error_text() {
        let envelope: ServiceEnvelope =
            serde_json::from_str(r#"{"success": false, "error": "quota exceeded"}"#).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_envelope_tolerates_missing_optional_fields() {
        let envelope: ServiceEnvelope = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5));
        assert_eq!(client.url(SEARCH_JOBS_PATH), "http://localhost:5000/api/search-jobs");
    }

    #[test]
    fn test_cv_source_prefers_the_attachment() {
        let attachment = Some(Attachment {
            filename: "resume.pdf".to_string(),
            bytes: vec![0x25, 0x50, 0x44, 0x46],
        });
        let inline = Some("pasted resume".to_string());
        assert!(matches!(
            cv_source(&attachment, &inline),
            CvSource::File(a) if a.filename == "resume.pdf"
        ));
    }

    #[test]
    fn test_cv_source_falls_back_to_inline_text() {
        let inline = Some("pasted resume".to_string());
        assert!(matches!(
            cv_source(&None, &inline),
            CvSource::Inline("pasted resume")
        ));
        assert!(matches!(cv_source(&None, &None), CvSource::Inline("")));
    }

    #[test]
    fn test_export_request_wire_field_names() {
        let json = serde_json::to_value(ExportRequest {
            latex_content: "\\documentclass{article}",
            filename: "cv.tex",
        })
        .unwrap();
        assert_eq!(json["latex_content"], "\\documentclass{article}");
        assert_eq!(json["filename"], "cv.tex");
    }
}
