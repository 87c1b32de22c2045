use super::ui::{self, StyleType};
use crate::core::constants::FINAL_ISSUANCE_YEAR;
use crate::core::{DataSource, MilestoneStatus, Projections, SupplyState};
use chrono::{DateTime, Datelike, Utc};
use comfy_table::{Cell, Color};

/// X axis label spacing of the projected supply table, in points.
const SERIES_LABEL_INTERVAL: usize = 6;

/// Renders the full dashboard for one state as a printable string.
pub fn render(state: &SupplyState, projections: &Projections, now: DateTime<Utc>) -> String {
    let mut sections = vec![
        render_header(state),
        render_supply(state, projections),
        render_milestone(projections),
        render_halving(state, projections),
        render_series(projections),
        render_footer(projections),
        ui::style_text(
            &format!("Updated {}", now.format("%Y-%m-%d %H:%M:%S UTC")),
            StyleType::Subtle,
        ),
    ];
    if let Some(message) = &state.last_error {
        sections.insert(1, render_banner(message));
    }
    sections.join("\n\n")
}

fn render_header(state: &SupplyState) -> String {
    let status = if state.uses_fallback() {
        ui::style_text("DEGRADED", StyleType::Warning)
    } else {
        ui::style_text("ONLINE", StyleType::Value)
    };
    let height = match state.sources.block_height {
        DataSource::Estimated => "Estimated".to_string(),
        DataSource::Unfetched => "Unknown".to_string(),
        _ => ui::format_number(state.block_height as f64, 0),
    };

    format!(
        "{}{}\n{} {} | {} {} | {} {}",
        ui::style_text("BITCOIN", StyleType::Title),
        ui::style_text(".SUPPLY", StyleType::Accent),
        ui::style_text("Network Status:", StyleType::Label),
        status,
        ui::style_text("Height:", StyleType::Label),
        height,
        ui::style_text("Current Price (USD):", StyleType::Label),
        ui::style_text(
            &format!("${}", ui::format_number(state.price_usd, 2)),
            StyleType::Value
        ),
    )
}

fn render_banner(message: &str) -> String {
    format!(
        "{}\n{}",
        ui::style_text("! Connection Warning", StyleType::Warning),
        ui::style_text(message, StyleType::Warning)
    )
}

fn render_supply(state: &SupplyState, projections: &Projections) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Circulating Supply"),
        ui::header_cell("Remaining to Mine"),
        ui::header_cell("Progress to 21M"),
        ui::header_cell("Progress to 20M"),
    ]);
    table.add_row(vec![
        ui::value_cell(ui::format_number(state.circulating_supply, 2), Color::White),
        ui::value_cell(
            ui::format_number(projections.remaining_to_cap, 2),
            Color::Green,
        ),
        ui::value_cell(format!("{:.4}%", projections.progress_percent), Color::White),
        ui::value_cell(
            format!("{:.4}%", projections.progress_to_target_percent),
            Color::White,
        ),
    ]);

    format!(
        "{}\n{} {:.4}%\nOnly {} BTC left to extract.",
        table,
        ui::gauge(projections.progress_percent, 50),
        projections.progress_percent,
        ui::style_text(
            &format!("{:.2}M", projections.remaining_to_cap / 1_000_000.0),
            StyleType::Value
        ),
    )
}

fn render_milestone(projections: &Projections) -> String {
    let title = ui::style_text("The 20th Million", StyleType::Title);
    match projections.target {
        MilestoneStatus::Reached => format!(
            "{title}\n{}\nMore than 20 million bitcoin are already in circulation.",
            ui::style_text("Milestone reached", StyleType::Accent),
        ),
        MilestoneStatus::Pending { days, date } => format!(
            "{title}\nAt current network emission rates, only 1 million bitcoin will remain unmined by:\n{}\n{}",
            ui::style_text(&date.format("%B %-d, %Y").to_string(), StyleType::Accent),
            ui::style_text(
                &format!("~{} days remaining", days.floor()),
                StyleType::Subtle
            ),
        ),
    }
}

fn render_halving(state: &SupplyState, projections: &Projections) -> String {
    let title = ui::style_text("Next Halving", StyleType::Title);
    let target = ui::format_number(projections.next_halving_block as f64, 0);

    let Some(date) = projections.halving_date else {
        return format!("{title}\nBlock {target}: block height unknown");
    };
    if projections.blocks_until_halving <= 0 {
        return format!("{title}\nBlock {target} has already been mined");
    }

    let estimate_note = if state.sources.block_height == DataSource::Estimated {
        " (from estimated height)"
    } else {
        ""
    };
    format!(
        "{title}\nBlock {target} in {} blocks, ~{} days, around {}{}",
        ui::format_number(projections.blocks_until_halving as f64, 0),
        projections.days_until_halving.floor(),
        ui::style_text(&date.format("%B %-d, %Y").to_string(), StyleType::Accent),
        estimate_note,
    )
}

fn render_series(projections: &Projections) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Projected Supply (BTC)"),
    ]);
    for point in projections
        .series
        .iter()
        .step_by(SERIES_LABEL_INTERVAL)
    {
        table.add_row(vec![
            Cell::new(point.date.format("%b %d").to_string()),
            ui::value_cell(ui::format_number(point.projected_supply, 2), Color::Yellow),
        ]);
    }
    format!(
        "{}\n{}",
        ui::style_text("Projected Issuance", StyleType::Title),
        table
    )
}

fn render_footer(projections: &Projections) -> String {
    let inflation = projections
        .annual_inflation_percent
        .map_or("N/A".to_string(), |p| format!("{p:.2}%"));
    let next_halving = projections
        .halving_date
        .filter(|_| projections.blocks_until_halving > 0)
        .map_or("N/A".to_string(), |d| format!("~{}", d.year()));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Daily Emission"),
        ui::header_cell("Inflation Rate"),
        ui::header_cell("Next Halving"),
        ui::header_cell("Last BTC Mined"),
    ]);
    table.add_row(vec![
        Cell::new(format!("~{} BTC", projections.daily_emission.round())),
        Cell::new(inflation),
        Cell::new(next_halving),
        Cell::new(format!("~{FINAL_ISSUANCE_YEAR}")),
    ]);
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sources;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn render_state(state: &SupplyState) -> String {
        let projections = Projections::compute(state, now(), 30, -5);
        console::strip_ansi_codes(&render(state, &projections, now())).to_string()
    }

    fn primary_state() -> SupplyState {
        SupplyState {
            circulating_supply: 19_790_000.0,
            price_usd: 96_420.69,
            block_height: 876_960,
            last_error: None,
            sources: Sources {
                supply: DataSource::Primary,
                price: DataSource::Primary,
                block_height: DataSource::Secondary,
            },
            updated_at: Some(now()),
        }
    }

    #[test]
    fn test_render_primary_state() {
        let output = render_state(&primary_state());

        assert!(output.contains("ONLINE"));
        assert!(output.contains("$96,420.69"));
        assert!(output.contains("876,960"));
        assert!(output.contains("19,790,000.00"));
        assert!(output.contains("1,210,000.00"));
        assert!(output.contains("94.2381%"));
        assert!(output.contains("Only 1.21M BTC left to extract."));
        assert!(output.contains("~466 days remaining"));
        assert!(output.contains("in 173,040 blocks, ~1201 days"));
        assert!(output.contains("~450 BTC"));
        assert!(output.contains("~2140"));
        assert!(!output.contains("Connection Warning"));
    }

    #[test]
    fn test_render_fallback_banner() {
        let state = SupplyState {
            last_error: Some("Using fallback data: block height estimated".to_string()),
            sources: Sources {
                block_height: DataSource::Estimated,
                ..primary_state().sources
            },
            ..primary_state()
        };

        let output = render_state(&state);
        assert!(output.contains("DEGRADED"));
        assert!(output.contains("Connection Warning"));
        assert!(output.contains("Using fallback data: block height estimated"));
        assert!(output.contains("Height: Estimated"));
        assert!(output.contains("(from estimated height)"));
    }

    #[test]
    fn test_render_milestone_reached() {
        let state = SupplyState {
            circulating_supply: 20_000_450.0,
            ..primary_state()
        };

        let output = render_state(&state);
        assert!(output.contains("Milestone reached"));
        assert!(!output.contains("days remaining"));
    }

    #[test]
    fn test_render_unknown_height() {
        let state = SupplyState {
            block_height: 0,
            sources: Sources::default(),
            ..primary_state()
        };

        let output = render_state(&state);
        assert!(output.contains("block height unknown"));
        assert!(output.contains("Height: Unknown"));
    }
}
