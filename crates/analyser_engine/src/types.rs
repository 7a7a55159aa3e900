use std::fmt;
use std::path::PathBuf;

pub use analyser_core::SubmissionId;
use analyser_core::{AnalysisResult, UploadFailure};

/// What the engine needs to upload one selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub submission_id: SubmissionId,
    pub path: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub submission_id: SubmissionId,
    pub bytes_sent: u64,
    pub total_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(UploadProgress),
    UploadCompleted {
        submission_id: SubmissionId,
        result: Result<AnalysisResult, UploadError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct UploadError {
    pub kind: FailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Sorts the failure into the buckets the user gets to see.
    pub fn classify(&self) -> UploadFailure {
        match &self.kind {
            FailureKind::Timeout => UploadFailure::Timeout,
            FailureKind::HttpStatus { status, detail } => UploadFailure::Server {
                status: *status,
                detail: detail.clone(),
            },
            FailureKind::Network => UploadFailure::NoResponse {
                reason: self.message.clone(),
            },
            FailureKind::InvalidUrl
            | FailureKind::Io
            | FailureKind::TooLarge { .. }
            | FailureKind::Client
            | FailureKind::InvalidResponse => UploadFailure::Local {
                description: self.to_string(),
            },
            FailureKind::Unexpected => UploadFailure::Unexpected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// The selected file could not be read.
    Io,
    /// The file read at upload time is over the limit.
    TooLarge { max_bytes: u64, actual: u64 },
    /// The HTTP client or request could not be built.
    Client,
    HttpStatus { status: u16, detail: Option<String> },
    Timeout,
    /// Sent (or tried to) but got no response back.
    Network,
    /// 2xx with a body that is not an analysis.
    InvalidResponse,
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Io => write!(f, "failed to read file"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "file too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::Client => write!(f, "failed to build request"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid analysis response"),
            FailureKind::Unexpected => write!(f, "unexpected failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_local() {
        let err = UploadError::new(FailureKind::Io, "bill.pdf: No such file or directory");
        assert_eq!(
            err.classify(),
            UploadFailure::Local {
                description: "failed to read file: bill.pdf: No such file or directory"
                    .to_string()
            }
        );
    }

    #[test]
    fn network_failures_have_no_response() {
        let err = UploadError::new(FailureKind::Network, "connection refused");
        assert!(matches!(err.classify(), UploadFailure::NoResponse { .. }));
    }

    #[test]
    fn oversized_file_is_local() {
        let err = UploadError::new(
            FailureKind::TooLarge {
                max_bytes: 10,
                actual: 11,
            },
            "bill.pdf changed since it was selected",
        );
        assert_eq!(
            err.classify().user_message(),
            "Error: file too large (max 10, actual 11): bill.pdf changed since it was selected"
        );
    }

    #[test]
    fn submission_ids_are_shared_with_core() {
        let id: analyser_core::SubmissionId = 7;
        let request = UploadRequest {
            submission_id: id,
            path: "bill.pdf".into(),
            file_name: "bill.pdf".to_string(),
        };
        assert_eq!(request.submission_id, id);
    }
}
