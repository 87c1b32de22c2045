use crate::core::error::FetchError;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Builds the HTTP client shared by all providers. Every request made with it
/// is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("btc-supply/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// GETs `url` and returns the body of a successful response.
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    debug!("Requesting {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::network(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::BadStatus {
            url: url.to_string(),
            status,
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::network(url, &e))
}

pub fn parse_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::parse(url, e.to_string()))
}

/// Parses a plain-text integer body such as `"870123\n"`.
pub fn parse_integer(url: &str, body: &str) -> Result<u64, FetchError> {
    let trimmed = body.trim();
    trimmed
        .parse::<u64>()
        .map_err(|e| FetchError::parse(url, format!("expected an integer, got '{trimmed}': {e}")))
}

/// Presence check for numeric fields: must exist, be finite and non-negative.
pub fn require_amount(url: &str, field: &str, value: Option<f64>) -> Result<f64, FetchError> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(v) => Err(FetchError::parse(url, format!("invalid {field}: {v}"))),
        None => Err(FetchError::parse(url, format!("missing {field}"))),
    }
}
