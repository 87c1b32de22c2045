//! Failure taxonomy for a single upstream request.

use reqwest::StatusCode;
use thiserror::Error;

/// Every variant is handled the same way by the acquisition pipeline: log it
/// and move on to the next tier.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request rejected, connection failed or timed out
    #[error("Request error for {url}: {message}")]
    Network {
        url: String,
        message: String,
        timed_out: bool,
    },

    /// Non-success HTTP status
    #[error("HTTP error: {status} for {url}")]
    BadStatus { url: String, status: StatusCode },

    /// Body did not have the expected shape
    #[error("Failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    pub fn network(url: &str, err: &reqwest::Error) -> Self {
        FetchError::Network {
            url: url.to_string(),
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }

    pub fn parse(url: &str, message: impl Into<String>) -> Self {
        FetchError::Parse {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FetchError::Network {
                timed_out: true,
                ..
            }
        )
    }
}
