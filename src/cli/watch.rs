use super::{dashboard, ui};
use crate::core::config::ChartConfig;
use crate::core::{Projections, SupplyState, SupplyTracker};
use anyhow::{Context, Result};
use chrono::Utc;
use console::Term;
use std::sync::Arc;
use tracing::debug;

fn redraw(term: &Term, state: &SupplyState, chart: &ChartConfig) -> Result<()> {
    let now = Utc::now();
    let projections = Projections::compute(state, now, chart.points, chart.offset_days);

    term.clear_screen().context("Failed to clear terminal")?;
    term.write_line(&dashboard::render(state, &projections, now))
        .context("Failed to write dashboard")?;
    term.write_line(&ui::style_text(
        "Press Ctrl-C to exit",
        ui::StyleType::Subtle,
    ))
    .context("Failed to write dashboard")?;
    Ok(())
}

/// Polls in the background and redraws the dashboard after every cycle until Ctrl-C.
pub async fn run(tracker: Arc<SupplyTracker>, chart: &ChartConfig) -> Result<()> {
    let term = Term::stdout();
    let mut updates = tracker.subscribe();
    let spinner = ui::new_spinner("Initializing blockchain connection...");
    let handle = Arc::clone(&tracker).spawn();

    let result = loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                debug!("Ctrl-C received");
                break signal.context("Failed to listen for Ctrl-C");
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                spinner.finish_and_clear();
                let state = updates.borrow_and_update().clone();
                if let Err(e) = redraw(&term, &state, chart) {
                    break Err(e);
                }
            }
        }
    };

    spinner.finish_and_clear();
    tracker.shutdown();
    handle.await.context("Supply tracker task failed")?;
    result
}
