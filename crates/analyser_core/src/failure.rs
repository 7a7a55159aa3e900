use std::fmt;

/// Why a submission failed, as far as the user needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The service answered with a non-2xx status.
    Server { status: u16, detail: Option<String> },
    /// The request went out but nothing came back.
    NoResponse { reason: String },
    /// Anything that went wrong on this side of the wire.
    Local { description: String },
    /// The transport died without classifying its failure.
    Unexpected,
}

impl UploadFailure {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            UploadFailure::Timeout => {
                "The request timed out. Please try again or use a smaller file.".to_string()
            }
            UploadFailure::Server { detail, .. } => {
                let detail = detail.as_deref().filter(|detail| !detail.is_empty());
                format!("Error: {}", detail.unwrap_or("Unknown error"))
            }
            UploadFailure::NoResponse { .. } => {
                "No response received from server. Please check your connection and try again."
                    .to_string()
            }
            UploadFailure::Local { description } => format!("Error: {description}"),
            UploadFailure::Unexpected => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFailure::Timeout => write!(f, "timeout"),
            UploadFailure::Server { status, detail } => match detail {
                Some(detail) => write!(f, "server error {status}: {detail}"),
                None => write!(f, "server error {status}"),
            },
            UploadFailure::NoResponse { reason } => write!(f, "no response: {reason}"),
            UploadFailure::Local { description } => write!(f, "local failure: {description}"),
            UploadFailure::Unexpected => write!(f, "unexpected failure"),
        }
    }
}
