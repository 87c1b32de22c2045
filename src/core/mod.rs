//! Data acquisition and projection core

pub mod acquisition;
pub mod config;
pub mod constants;
pub mod error;
pub mod log;
pub mod market;
pub mod projection;
pub mod state;
pub mod tracker;

// Re-export main types for cleaner imports
pub use acquisition::Acquirer;
pub use error::FetchError;
pub use market::{BlockHeightProvider, MarketDataProvider, MarketSnapshot, PriceProvider, SupplyProvider};
pub use projection::{MilestoneStatus, Projections, SeriesPoint};
pub use state::{DataSource, Sources, SupplyState};
pub use tracker::{CancelToken, CycleOutcome, SupplyTracker};
