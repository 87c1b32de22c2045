//! The state bundle shared between the acquisition cycle and its readers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

/// Where a field's current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DataSource {
    #[default]
    Unfetched,
    Primary,
    Secondary,
    /// Kept from the previous cycle after every tier failed
    Retained,
    /// Hardcoded approximation
    Estimated,
}

impl Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DataSource::Unfetched => "unfetched",
                DataSource::Primary => "primary",
                DataSource::Secondary => "secondary",
                DataSource::Retained => "retained",
                DataSource::Estimated => "estimated",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Sources {
    pub supply: DataSource,
    pub price: DataSource,
    pub block_height: DataSource,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SupplyState {
    /// Circulating supply in BTC, within `0..=MAX_SUPPLY`
    pub circulating_supply: f64,
    pub price_usd: f64,
    /// Zero means unknown
    pub block_height: u64,
    /// Advisory shown to the user whenever fallback data is in use
    pub last_error: Option<String>,
    pub sources: Sources,
    /// Completion time of the last cycle; `None` until the first one finishes
    pub updated_at: Option<DateTime<Utc>>,
}

impl SupplyState {
    pub fn is_loaded(&self) -> bool {
        self.updated_at.is_some()
    }

    pub fn uses_fallback(&self) -> bool {
        self.last_error.is_some()
    }
}
