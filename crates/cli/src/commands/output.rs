//! Table rendering for scan results.

use super::ScanOutput;
use edge_scanner_engine::{DirectionFilter, EdgeSignal};

const QUESTION_WIDTH: usize = 56;

/// Prints the scan header and one row per signal.
pub fn print_report(output: &ScanOutput) {
    println!();
    println!("{}", "=".repeat(120));
    println!(
        "EDGE SCAN  {}",
        output.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "Poly markets: {} ({} eligible) | Bookie events: {} | Unmatched: {} | Edges: {}",
        output.markets_fetched,
        output.markets_eligible,
        output.events_fetched,
        output.summary.unmatched,
        output.signals.len()
    );
    println!("Filter: {}", describe_filter(output));
    println!("{}", "=".repeat(120));

    if output.signals.is_empty() {
        println!();
        println!(
            "  No edges >= {:.1}pp found. Try lowering the threshold or adjusting filters.",
            output.filter.min_abs_delta * 100.0
        );
        println!();
        return;
    }

    println!(
        "{:>9}  {:>6}  {:>6}  {:>6}  {:<13}  {:<16}  {:<8}  QUESTION / OUTCOME",
        "EDGE", "POLY", "BOOKIE", "ODDS", "DIRECTION", "BOOKMAKER", "PASS"
    );
    println!("{}", "-".repeat(120));

    for signal in &output.signals {
        println!("{}", format_row(signal));
        if !signal.url.is_empty() {
            println!("{:>77}{}", "", signal.url);
        }
    }

    println!("{}", "=".repeat(120));
    println!();
}

fn describe_filter(output: &ScanOutput) -> String {
    let filter = &output.filter;
    let days = match filter.max_days_to_end {
        Some(days) => format!("<= {days} days"),
        None => "any horizon".to_string(),
    };
    let direction = match filter.direction {
        DirectionFilter::Both => "both directions",
        DirectionFilter::PolyHigher => "POLY > BOOKIE only",
        DirectionFilter::BookieHigher => "BOOKIE > POLY only",
    };
    format!(
        "edge >= {:.1}pp | liquidity >= ${} | {} | {}",
        filter.min_abs_delta * 100.0,
        filter.min_liquidity,
        days,
        direction
    )
}

/// Formats one signal as a table row.
#[must_use]
pub fn format_row(signal: &EdgeSignal) -> String {
    format!(
        "{:>+7.2}pp  {:>5.1}%  {:>5.1}%  {:>6.2}  {:<13}  {:<16}  {:<8}  {} / {}",
        signal.delta_pp(),
        signal.poly_probability * 100.0,
        signal.bookie_probability * 100.0,
        signal.decimal_odds,
        signal.direction().as_str(),
        truncate(&signal.bookmaker, 16),
        signal.pass.as_str(),
        truncate(&signal.question, QUESTION_WIDTH),
        signal.outcome
    )
}

/// Shortens text to `max` characters, marking the cut with "...".
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
