//! Errors returned by the XRPC client.

use reqwest::StatusCode;

/// Result type for client calls
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a status the call does not accept.
    #[error("{operation} failed with status {status}: {body}")]
    Rejected {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status when the server rejected the call.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<&'static str> {
        match self {
            ApiError::Rejected { operation, .. }
            | ApiError::Transport { operation, .. }
            | ApiError::Decode { operation, .. } => Some(operation),
            ApiError::InvalidUrl { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_carries_status_and_body() {
        let err = ApiError::Rejected {
            operation: "uploadBlob",
            status: StatusCode::PAYLOAD_TOO_LARGE,
            body: r#"{"error":"BlobTooLarge"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"uploadBlob failed with status 413 Payload Too Large: {"error":"BlobTooLarge"}"#
        );
        assert_eq!(err.status(), Some(StatusCode::PAYLOAD_TOO_LARGE));
        assert_eq!(err.operation(), Some("uploadBlob"));
    }
}
