use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{get_text, parse_json, require_amount};
use crate::core::constants::MAX_SUPPLY;
use crate::core::error::FetchError;
use crate::core::market::{MarketDataProvider, MarketSnapshot};

const COIN_PATH: &str =
    "/api/v3/coins/bitcoin?localization=false&tickers=false&community_data=false&developer_data=false";

/// Primary tier: circulating supply and USD price in one request.
pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[derive(Deserialize, Debug)]
struct CoinResponse {
    market_data: Option<MarketData>,
}

#[derive(Deserialize, Debug)]
struct MarketData {
    circulating_supply: Option<f64>,
    current_price: Option<CurrentPrice>,
}

#[derive(Deserialize, Debug)]
struct CurrentPrice {
    usd: Option<f64>,
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoMarketFetch", skip(self))]
    async fn fetch_market_data(&self) -> Result<MarketSnapshot, FetchError> {
        let url = format!("{}{}", self.base_url, COIN_PATH);
        let body = get_text(&self.client, &url).await?;
        let data: CoinResponse = parse_json(&url, &body)?;

        let market_data = data
            .market_data
            .ok_or_else(|| FetchError::parse(&url, "missing market_data"))?;
        let circulating_supply = require_amount(
            &url,
            "circulating_supply",
            market_data.circulating_supply,
        )?;
        if circulating_supply > MAX_SUPPLY {
            return Err(FetchError::parse(
                &url,
                format!("circulating_supply {circulating_supply} exceeds the supply cap"),
            ));
        }
        let price_usd = require_amount(
            &url,
            "current_price.usd",
            market_data.current_price.and_then(|p| p.usd),
        )?;

        debug!(circulating_supply, price_usd, "Received market data");
        Ok(MarketSnapshot {
            circulating_supply,
            price_usd,
        })
    }
}
