// Error types for the vision client. Every failure of `analyze` maps to one
// of these variants so the caller can decide how to present it.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type VisionResult<T> = Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Invalid file path: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read image file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid subscription key header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Vision service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl VisionError {
    /// Transport failures and non-success statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, VisionError::Network(_) | VisionError::Status { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, VisionError::Parse(_))
    }
}

impl From<serde_json::Error> for VisionError {
    fn from(err: serde_json::Error) -> Self {
        VisionError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_count_as_network_failures() {
        let err = VisionError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "Access denied".into(),
        };
        assert!(err.is_network());
        assert!(!err.is_parse());
        assert_eq!(
            err.to_string(),
            "Vision service returned 401 Unauthorized: Access denied"
        );
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: VisionError = json_err.into();
        assert!(err.is_parse());
        assert!(!err.is_network());
    }

    #[test]
    fn missing_file_message_names_the_path() {
        let err = VisionError::FileNotFound(PathBuf::from("data/missing.jpg"));
        assert_eq!(err.to_string(), "Invalid file path: data/missing.jpg");
    }
}
