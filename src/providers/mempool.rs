use async_trait::async_trait;
use tracing::{debug, instrument};

use super::util::{get_text, parse_integer};
use crate::core::constants::MAX_BLOCK_HEIGHT;
use crate::core::error::FetchError;
use crate::core::market::BlockHeightProvider;

pub struct MempoolProvider {
    base_url: String,
    client: reqwest::Client,
}

impl MempoolProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        MempoolProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl BlockHeightProvider for MempoolProvider {
    #[instrument(name = "MempoolHeightFetch", skip(self))]
    async fn fetch_block_height(&self) -> Result<u64, FetchError> {
        let url = format!("{}/api/blocks/tip/height", self.base_url);
        let body = get_text(&self.client, &url).await?;
        let height = parse_integer(&url, &body)?;
        if height == 0 || height > MAX_BLOCK_HEIGHT {
            return Err(FetchError::parse(
                &url,
                format!("implausible block height {height}"),
            ));
        }
        debug!(height, "Received chain tip height");
        Ok(height)
    }
}
