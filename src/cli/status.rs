use super::{dashboard, ui};
use crate::core::config::ChartConfig;
use crate::core::{Projections, SupplyState, SupplyTracker};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport<'a> {
    state: &'a SupplyState,
    projections: &'a Projections,
}

fn render_json(state: &SupplyState, projections: &Projections) -> Result<String> {
    let report = StatusReport { state, projections };
    serde_json::to_string_pretty(&report).context("Failed to serialize status report")
}

/// Runs a single acquisition cycle and prints the dashboard, or JSON when `json` is set.
pub async fn run(tracker: &SupplyTracker, chart: &ChartConfig, json: bool) -> Result<()> {
    let spinner = (!json).then(|| ui::new_spinner("Initializing blockchain connection..."));
    let outcome = tracker.run_cycle().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    tracing::debug!(?outcome, "Status cycle finished");

    let state = tracker.snapshot();
    let now = Utc::now();
    let projections = Projections::compute(&state, now, chart.points, chart.offset_days);

    if json {
        println!("{}", render_json(&state, &projections)?);
    } else {
        println!("{}", dashboard::render(&state, &projections, now));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataSource, Sources};
    use chrono::TimeZone;

    #[test]
    fn test_json_report_shape() {
        let state = SupplyState {
            circulating_supply: 19_790_000.0,
            price_usd: 96_420.69,
            block_height: 876_960,
            sources: Sources {
                supply: DataSource::Secondary,
                price: DataSource::Primary,
                block_height: DataSource::Secondary,
            },
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let projections = Projections::compute(&state, now, 30, -5);

        let output = render_json(&state, &projections).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["state"]["circulating_supply"], 19_790_000.0);
        assert_eq!(value["state"]["block_height"], 876_960);
        assert_eq!(value["state"]["sources"]["supply"], "Secondary");
        assert!(value["state"]["last_error"].is_null());
        assert!(value["projections"]["target"]["Pending"]["days"].is_number());
        assert_eq!(value["projections"]["series"].as_array().unwrap().len(), 30);

        let reached = SupplyState {
            circulating_supply: 20_000_000.0,
            ..state
        };
        let projections = Projections::compute(&reached, now, 30, -5);
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&reached, &projections).unwrap()).unwrap();
        assert_eq!(value["projections"]["target"], "Reached");
    }
}
