use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by every [`Service`](crate::Service) operation
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never completed: connection refused, DNS, timeout, or a
    /// body that could not be read
    #[error("Failed to reach postal: {0}")]
    Transport(#[from] reqwest::Error),

    /// Postal answered with a non-2xx status
    #[error("Postal returned {status}: {message}")]
    Remote {
        status: StatusCode,
        message: String,
        domain: Option<String>,
        code: Option<i64>,
    },

    /// Postal answered, but the body was not the expected JSON shape
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0} cannot be \".\" or \"..\"")]
    DotSegment(&'static str),
}

/// Error document Postal sends along with failure statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

impl ServiceError {
    /// Build a [`ServiceError::Remote`] from a failed response, using the
    /// Postal error document when the body carries one.
    pub(crate) async fn from_response(response: Response) -> Self {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                // The status is still worth reporting without a body
                tracing::warn!(status = %status, error = %e, "Failed to read postal error body");
                String::new()
            }
        };

        let error = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => ServiceError::Remote {
                status,
                message: parsed.message,
                domain: parsed.domain,
                code: parsed.code,
            },
            Err(_) => ServiceError::Remote {
                status,
                message: if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body
                },
                domain: None,
                code: None,
            },
        };

        tracing::warn!(status = %status, error = %error, "Postal request failed");

        error
    }

    /// HTTP status of a remote failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ServiceError::Remote { status, .. } => Some(*status),
            ServiceError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
