use std::sync::Arc;
use std::time::Duration;

use analyser_core::{AnalysisResult, MAX_FILE_BYTES};
use bytes::Bytes;
use engine_logging::{engine_debug, engine_info};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};

use crate::{EngineEvent, FailureKind, SubmissionId, UploadError, UploadProgress, UploadRequest};

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub base_url: String,
    pub endpoint_path: String,
    pub connect_timeout: Duration,
    /// Whole-request budget, upload and analysis included.
    pub request_timeout: Duration,
    /// Size of the slices the file is streamed in; one progress event per slice.
    pub chunk_size: usize,
    pub part_name: String,
    /// Checked again against the bytes actually read, since the file may change after selection.
    pub max_file_bytes: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3005".to_string(),
            endpoint_path: "/api/analyze/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            chunk_size: 64 * 1024,
            part_name: "file".to_string(),
            max_file_bytes: MAX_FILE_BYTES,
        }
    }
}

impl UploadSettings {
    pub fn endpoint(&self) -> Result<reqwest::Url, UploadError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint_path.trim_start_matches('/')
        );
        reqwest::Url::parse(&joined)
            .map_err(|err| UploadError::new(FailureKind::InvalidUrl, format!("{joined}: {err}")))
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        request: &UploadRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<AnalysisResult, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| UploadError::new(FailureKind::Client, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        request: &UploadRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<AnalysisResult, UploadError> {
        let endpoint = self.settings.endpoint()?;
        let content = tokio::fs::read(&request.path).await.map_err(|err| {
            UploadError::new(
                FailureKind::Io,
                format!("{}: {err}", request.path.display()),
            )
        })?;
        let total = content.len() as u64;
        if total > self.settings.max_file_bytes {
            return Err(UploadError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_file_bytes,
                    actual: total,
                },
                format!("{} changed since it was selected", request.file_name),
            ));
        }
        let client = self.build_client()?;

        sink.emit(EngineEvent::Progress(UploadProgress {
            submission_id: request.submission_id,
            bytes_sent: 0,
            total_bytes: Some(total),
        }));

        let body = progress_body(
            request.submission_id,
            Bytes::from(content),
            self.settings.chunk_size,
            sink,
        );
        let part = Part::stream_with_length(body, total)
            .file_name(request.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|err| UploadError::new(FailureKind::Client, err.to_string()))?;
        let form = Form::new().part(self.settings.part_name.clone(), part);

        engine_info!(
            "Uploading submission={} file={} bytes={} to {}",
            request.submission_id,
            request.file_name,
            total,
            endpoint
        );
        let response = client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.ok();
            let detail = body.as_deref().and_then(error_detail);
            return Err(UploadError::new(
                FailureKind::HttpStatus {
                    status: status.as_u16(),
                    detail,
                },
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        engine_debug!(
            "Submission {} answered with {} bytes",
            request.submission_id,
            body.len()
        );
        serde_json::from_slice::<AnalysisResult>(&body)
            .map_err(|err| UploadError::new(FailureKind::InvalidResponse, err.to_string()))
    }
}

/// Streams `content` in `chunk_size` slices, reporting the running total as each slice is pulled.
fn progress_body(
    submission_id: SubmissionId,
    content: Bytes,
    chunk_size: usize,
    sink: Arc<dyn ProgressSink>,
) -> reqwest::Body {
    let total = content.len() as u64;
    let chunk_size = chunk_size.max(1);
    let chunks: Vec<Bytes> = (0..content.len())
        .step_by(chunk_size)
        .map(|start| content.slice(start..(start + chunk_size).min(content.len())))
        .collect();

    let mut sent = 0u64;
    let stream = futures_util::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        sink.emit(EngineEvent::Progress(UploadProgress {
            submission_id,
            bytes_sent: sent,
            total_bytes: Some(total),
        }));
        Ok::<Bytes, std::io::Error>(chunk)
    });
    reqwest::Body::wrap_stream(stream)
}

/// Pulls `detail` out of an error body. Non-string details are rendered as compact JSON;
/// an empty string counts as no detail.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(detail) if detail.is_empty() => None,
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    // A connect timeout means the service is unreachable, not that the request ran too long.
    if err.is_connect() {
        return UploadError::new(FailureKind::Network, err.to_string());
    }
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return UploadError::new(FailureKind::Client, err.to_string());
    }
    if err.is_decode() {
        return UploadError::new(FailureKind::InvalidResponse, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
