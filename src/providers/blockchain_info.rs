use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{get_text, parse_integer, parse_json, require_amount};
use crate::core::constants::{MAX_SUPPLY, SATOSHIS_PER_BTC};
use crate::core::error::FetchError;
use crate::core::market::{PriceProvider, SupplyProvider};

/// Secondary tier. Supply comes from the plain-text `/q/totalbc` satoshi count,
/// price from the `/ticker` JSON.
pub struct BlockchainInfoProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BlockchainInfoProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        BlockchainInfoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[derive(Deserialize, Debug)]
struct TickerResponse {
    #[serde(rename = "USD")]
    usd: Option<TickerRate>,
}

#[derive(Deserialize, Debug)]
struct TickerRate {
    last: Option<f64>,
}

#[async_trait]
impl SupplyProvider for BlockchainInfoProvider {
    #[instrument(name = "BlockchainInfoSupplyFetch", skip(self))]
    async fn fetch_supply(&self) -> Result<f64, FetchError> {
        let url = format!("{}/q/totalbc", self.base_url);
        let body = get_text(&self.client, &url).await?;
        let satoshis = parse_integer(&url, &body)?;

        let supply = satoshis as f64 / SATOSHIS_PER_BTC;
        if supply > MAX_SUPPLY {
            return Err(FetchError::parse(
                &url,
                format!("{satoshis} satoshis exceeds the supply cap"),
            ));
        }
        debug!(satoshis, supply, "Received total supply");
        Ok(supply)
    }
}

#[async_trait]
impl PriceProvider for BlockchainInfoProvider {
    #[instrument(name = "BlockchainInfoPriceFetch", skip(self))]
    async fn fetch_price_usd(&self) -> Result<f64, FetchError> {
        let url = format!("{}/ticker", self.base_url);
        let body = get_text(&self.client, &url).await?;
        let ticker: TickerResponse = parse_json(&url, &body)?;

        let price = require_amount(&url, "USD.last", ticker.usd.and_then(|r| r.last))?;
        debug!(price, "Received ticker price");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::util::http_client;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(endpoint: &str, status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(mock_server: &MockServer) -> BlockchainInfoProvider {
        BlockchainInfoProvider::new(
            &mock_server.uri(),
            http_client(Duration::from_secs(5)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_supply_is_normalized_from_satoshis() {
        let mock_server = create_mock_server("/q/totalbc", 200, "1979000000000000").await;

        let supply = provider(&mock_server).fetch_supply().await.unwrap();
        assert_eq!(supply, 19_790_000.0);
    }

    #[tokio::test]
    async fn test_supply_with_fractional_btc() {
        let mock_server = create_mock_server("/q/totalbc", 200, "1981234512345678\n").await;

        let supply = provider(&mock_server).fetch_supply().await.unwrap();
        assert!((supply - 19_812_345.123_456_78).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_supply_not_a_number() {
        let mock_server = create_mock_server("/q/totalbc", 200, "Maximum concurrent requests").await;

        let err = provider(&mock_server).fetch_supply().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_supply_server_error() {
        let mock_server = create_mock_server("/q/totalbc", 503, "").await;

        let err = provider(&mock_server).fetch_supply().await.unwrap_err();
        assert!(matches!(err, FetchError::BadStatus { .. }));
    }

    #[tokio::test]
    async fn test_ticker_price() {
        let mock_response = r#"{
            "USD": { "15m": 96421.0, "last": 96420.69, "buy": 96420.69, "sell": 96420.69, "symbol": "$" },
            "EUR": { "15m": 91000.0, "last": 91000.0, "buy": 91000.0, "sell": 91000.0, "symbol": "€" }
        }"#;
        let mock_server = create_mock_server("/ticker", 200, mock_response).await;

        let price = provider(&mock_server).fetch_price_usd().await.unwrap();
        assert_eq!(price, 96_420.69);
    }

    #[tokio::test]
    async fn test_ticker_without_usd() {
        let mock_response = r#"{ "EUR": { "last": 91000.0 } }"#;
        let mock_server = create_mock_server("/ticker", 200, mock_response).await;

        let err = provider(&mock_server).fetch_price_usd().await.unwrap_err();
        assert!(err.to_string().contains("missing USD.last"));
    }
}
