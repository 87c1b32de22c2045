//! Protocol constants and the estimates used when every data source fails.

/// Hard cap on the number of bitcoin that will ever exist.
pub const MAX_SUPPLY: f64 = 21_000_000.0;

/// The "20th million" milestone.
pub const TARGET_SUPPLY: f64 = 20_000_000.0;

/// Block subsidy of the current halving epoch, in BTC.
pub const BLOCK_REWARD: f64 = 3.125;

/// Six blocks an hour at the ten minute target spacing.
pub const BLOCKS_PER_DAY: u64 = 144;

pub const HALVING_INTERVAL: u64 = 210_000;

pub const LAST_HALVING_BLOCK: u64 = 840_000;

pub const SATOSHIS_PER_BTC: f64 = 100_000_000.0;

/// Approximate year the final satoshi is issued.
pub const FINAL_ISSUANCE_YEAR: i32 = 2140;

pub const FALLBACK_SUPPLY: f64 = 19_790_000.0;

pub const FALLBACK_PRICE_USD: f64 = 96_420.69;

/// Positive on purpose: zero is the "unknown height" sentinel.
pub const FALLBACK_BLOCK_HEIGHT: u64 = 870_000;

/// Ceiling for heights reported upstream. The block subsidy is gone by
/// block 6,930,000, so anything above this is a malformed response.
pub const MAX_BLOCK_HEIGHT: u64 = 10_000_000;
