//! Market data abstractions

use crate::core::error::FetchError;
use async_trait::async_trait;

/// Combined reading from the primary endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    /// Circulating supply in BTC
    pub circulating_supply: f64,
    pub price_usd: f64,
}

/// Primary tier: supply and price from a single request.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_market_data(&self) -> Result<MarketSnapshot, FetchError>;
}

/// Secondary tier, supply only. Returns BTC units.
#[async_trait]
pub trait SupplyProvider: Send + Sync {
    async fn fetch_supply(&self) -> Result<f64, FetchError>;
}

/// Secondary tier, price only.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_price_usd(&self) -> Result<f64, FetchError>;
}

#[async_trait]
pub trait BlockHeightProvider: Send + Sync {
    async fn fetch_block_height(&self) -> Result<u64, FetchError>;
}
