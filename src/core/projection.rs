//! Projections derived from a [`SupplyState`].
//!
//! Everything here is a pure function of the state, the protocol constants and,
//! where dates are involved, an explicit `now`. Calling any of them twice with
//! the same inputs yields identical results.
use crate::core::constants::{
    BLOCK_REWARD, BLOCKS_PER_DAY, HALVING_INTERVAL, LAST_HALVING_BLOCK, MAX_SUPPLY, TARGET_SUPPLY,
};
use crate::core::state::SupplyState;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Default number of points in the synthetic chart series.
pub const DEFAULT_SERIES_POINTS: usize = 30;

/// Default day offset of the first chart point relative to `now`.
pub const DEFAULT_SERIES_OFFSET: i64 = -5;

/// Outcome of the 20M countdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MilestoneStatus {
    /// Supply has reached or passed the target
    Reached,
    Pending { days: f64, date: DateTime<Utc> },
}

/// One point of the extrapolated supply curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: DateTime<Utc>,
    pub projected_supply: f64,
}

/// Adds a fractional number of days to `now`, at millisecond resolution.
/// Saturates at the representable date range.
fn add_days(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    let millis = (days * MILLIS_PER_DAY).round() as i64;
    Duration::try_milliseconds(millis)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if days < 0.0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

pub fn daily_emission() -> f64 {
    BLOCK_REWARD * BLOCKS_PER_DAY as f64
}

pub fn remaining_to_cap(state: &SupplyState) -> f64 {
    MAX_SUPPLY - state.circulating_supply
}

pub fn remaining_to_target(state: &SupplyState) -> f64 {
    TARGET_SUPPLY - state.circulating_supply
}

/// Days of issuance left until the 20M milestone. Negative once it has passed.
pub fn days_to_target(state: &SupplyState) -> f64 {
    remaining_to_target(state) / daily_emission()
}

pub fn target_date(state: &SupplyState, now: DateTime<Utc>) -> DateTime<Utc> {
    add_days(now, days_to_target(state))
}

pub fn target_milestone(state: &SupplyState, now: DateTime<Utc>) -> MilestoneStatus {
    if state.circulating_supply >= TARGET_SUPPLY {
        return MilestoneStatus::Reached;
    }
    MilestoneStatus::Pending {
        days: days_to_target(state),
        date: target_date(state, now),
    }
}

pub fn progress_percent(state: &SupplyState) -> f64 {
    state.circulating_supply / MAX_SUPPLY * 100.0
}

pub fn progress_to_target_percent(state: &SupplyState) -> f64 {
    state.circulating_supply / TARGET_SUPPLY * 100.0
}

/// Yearly issuance as a share of the current supply, `None` before any supply is known.
pub fn annual_inflation_percent(state: &SupplyState) -> Option<f64> {
    if state.circulating_supply <= 0.0 {
        return None;
    }
    Some(daily_emission() * 365.0 / state.circulating_supply * 100.0)
}

pub fn next_halving_block() -> u64 {
    LAST_HALVING_BLOCK + HALVING_INTERVAL
}

/// Blocks left until the next halving, or 0 when the height is unknown.
pub fn blocks_until_halving(state: &SupplyState) -> i64 {
    if state.block_height == 0 {
        return 0;
    }
    let height = i64::try_from(state.block_height).unwrap_or(i64::MAX);
    (next_halving_block() as i64).saturating_sub(height)
}

pub fn days_until_halving(state: &SupplyState) -> f64 {
    blocks_until_halving(state) as f64 / BLOCKS_PER_DAY as f64
}

/// Estimated halving date. Only meaningful once a block height is known.
pub fn halving_date(state: &SupplyState, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if state.block_height == 0 {
        return None;
    }
    Some(add_days(now, days_until_halving(state)))
}

/// Linear extrapolation of the supply around `now`, for charting only.
///
/// Always yields exactly `points` entries, the first one `offset` days from `now`.
pub fn synthetic_series(
    state: &SupplyState,
    now: DateTime<Utc>,
    points: usize,
    offset: i64,
) -> Vec<SeriesPoint> {
    let emission = daily_emission();
    (0..points as i64)
        .map(|i| {
            let day = offset.saturating_add(i);
            SeriesPoint {
                date: add_days(now, day as f64),
                projected_supply: state.circulating_supply + day as f64 * emission,
            }
        })
        .collect()
}

/// All projections for one state, evaluated against the same `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projections {
    pub remaining_to_cap: f64,
    pub remaining_to_target: f64,
    pub daily_emission: f64,
    pub progress_percent: f64,
    pub progress_to_target_percent: f64,
    pub annual_inflation_percent: Option<f64>,
    pub target: MilestoneStatus,
    pub next_halving_block: u64,
    pub blocks_until_halving: i64,
    pub days_until_halving: f64,
    pub halving_date: Option<DateTime<Utc>>,
    pub series: Vec<SeriesPoint>,
}

impl Projections {
    pub fn compute(
        state: &SupplyState,
        now: DateTime<Utc>,
        points: usize,
        offset: i64,
    ) -> Projections {
        Projections {
            remaining_to_cap: remaining_to_cap(state),
            remaining_to_target: remaining_to_target(state),
            daily_emission: daily_emission(),
            progress_percent: progress_percent(state),
            progress_to_target_percent: progress_to_target_percent(state),
            annual_inflation_percent: annual_inflation_percent(state),
            target: target_milestone(state, now),
            next_halving_block: next_halving_block(),
            blocks_until_halving: blocks_until_halving(state),
            days_until_halving: days_until_halving(state),
            halving_date: halving_date(state, now),
            series: synthetic_series(state, now, points, offset),
        }
    }
}
