pub mod blockchain_info;
pub mod coingecko;
pub mod mempool;
pub mod util;

use crate::core::Acquirer;
use crate::core::config::AppConfig;
use anyhow::Result;

/// Wires the configured endpoints into an [`Acquirer`] sharing one HTTP client.
pub fn build_acquirer(config: &AppConfig) -> Result<Acquirer> {
    let client = util::http_client(config.polling.request_timeout())?;
    let providers = &config.providers;

    let market = coingecko::CoinGeckoProvider::new(&providers.coingecko.base_url, client.clone());
    let supply = blockchain_info::BlockchainInfoProvider::new(
        &providers.blockchain_info.base_url,
        client.clone(),
    );
    let price = blockchain_info::BlockchainInfoProvider::new(
        &providers.blockchain_info.base_url,
        client.clone(),
    );
    let blocks = mempool::MempoolProvider::new(&providers.mempool.base_url, client);

    Ok(Acquirer::new(
        Box::new(market),
        Box::new(supply),
        Box::new(price),
        Box::new(blocks),
    ))
}
