//! One acquisition cycle: query every tier, degrade on failure, and always
//! produce a displayable [`SupplyState`].
use chrono::{DateTime, Utc};
use futures::future::join;
use tracing::{debug, info, warn};

use crate::core::constants::{FALLBACK_BLOCK_HEIGHT, FALLBACK_PRICE_USD, FALLBACK_SUPPLY};
use crate::core::market::{BlockHeightProvider, MarketDataProvider, PriceProvider, SupplyProvider};
use crate::core::state::{DataSource, Sources, SupplyState};

pub struct Acquirer {
    market: Box<dyn MarketDataProvider>,
    supply: Box<dyn SupplyProvider>,
    price: Box<dyn PriceProvider>,
    blocks: Box<dyn BlockHeightProvider>,
}

/// Resolves a field that no tier could provide: keep the last known value, or
/// use the estimate on the first run.
fn retain_or_estimate(previous: f64, estimate: f64) -> (f64, DataSource) {
    if previous > 0.0 {
        (previous, DataSource::Retained)
    } else {
        (estimate, DataSource::Estimated)
    }
}

impl Acquirer {
    pub fn new(
        market: Box<dyn MarketDataProvider>,
        supply: Box<dyn SupplyProvider>,
        price: Box<dyn PriceProvider>,
        blocks: Box<dyn BlockHeightProvider>,
    ) -> Self {
        Acquirer {
            market,
            supply,
            price,
            blocks,
        }
    }

    /// Runs every tier and returns the next state. Never fails: each error is
    /// logged and absorbed by the next tier or a fallback value.
    pub async fn acquire(&self, previous: &SupplyState, now: DateTime<Utc>) -> SupplyState {
        let mut notes: Vec<String> = Vec::new();
        let mut sources = Sources::default();

        let (circulating_supply, price_usd) = match self.market.fetch_market_data().await {
            Ok(snapshot) => {
                sources.supply = DataSource::Primary;
                sources.price = DataSource::Primary;
                (snapshot.circulating_supply, snapshot.price_usd)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    timed_out = e.is_timeout(),
                    "Primary market data failed, trying secondary sources"
                );
                notes.push("primary market data unavailable".to_string());

                let (supply_result, price_result) =
                    join(self.supply.fetch_supply(), self.price.fetch_price_usd()).await;

                let supply = match supply_result {
                    Ok(supply) => {
                        sources.supply = DataSource::Secondary;
                        supply
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            timed_out = e.is_timeout(),
                            "Secondary supply source failed"
                        );
                        let (supply, source) =
                            retain_or_estimate(previous.circulating_supply, FALLBACK_SUPPLY);
                        sources.supply = source;
                        supply
                    }
                };
                let price = match price_result {
                    Ok(price) => {
                        sources.price = DataSource::Secondary;
                        price
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            timed_out = e.is_timeout(),
                            "Secondary price source failed"
                        );
                        let (price, source) =
                            retain_or_estimate(previous.price_usd, FALLBACK_PRICE_USD);
                        sources.price = source;
                        price
                    }
                };
                notes.push(format!("supply {}", sources.supply));
                notes.push(format!("price {}", sources.price));
                (supply, price)
            }
        };

        let block_height = match self.blocks.fetch_block_height().await {
            Ok(height) => {
                sources.block_height = DataSource::Secondary;
                height
            }
            Err(e) => {
                warn!(
                    error = %e,
                    timed_out = e.is_timeout(),
                    "Block height source failed, using estimate"
                );
                sources.block_height = DataSource::Estimated;
                notes.push("block height estimated".to_string());
                FALLBACK_BLOCK_HEIGHT
            }
        };

        let last_error = if notes.is_empty() {
            debug!("All sources succeeded");
            None
        } else {
            let message = format!("Using fallback data: {}", notes.join("; "));
            info!("{}", message);
            Some(message)
        };

        SupplyState {
            circulating_supply,
            price_usd,
            block_height,
            last_error,
            sources,
            updated_at: Some(now),
        }
    }
}
