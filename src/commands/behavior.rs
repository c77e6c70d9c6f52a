use std::path::Path;

use anyhow::{Context, Result};

use super::stats::load_window;
use crate::analytics::analyze_behavior;
use crate::utils::{fmt_money, pretty_table};

/// Behavioral analysis over a trailing window of days.
pub fn report(trades_path: &Path, days: u32, daily_limit: u32) -> Result<()> {
    let trades = load_window(trades_path, days)?;
    let report = analyze_behavior(&trades, daily_limit).context("failed to analyze behavior")?;

    println!(
        "Analyzed {} trades over the last {} day(s)\n",
        report.total_trades, days
    );

    if report.insights.is_empty() {
        println!("No behavioral flags raised.");
    } else {
        println!("Insights:");
        for insight in &report.insights {
            println!("  - {insight}");
        }
    }
    println!();

    if !report.overtrading_days.is_empty() {
        let rows = report
            .overtrading_days
            .iter()
            .map(|d| vec![d.date.to_string(), d.trade_count.to_string(), fmt_money(d.net_pnl)])
            .collect();
        println!("{}", pretty_table(&["Overtraded day", "Trades", "Net P&L"], rows));
    }

    let mood_rows = report
        .mood_distribution
        .iter()
        .map(|(mood, count)| {
            vec![
                mood.as_str().to_string(),
                count.to_string(),
                fmt_money(report.mood_pnl.get(mood).copied().unwrap_or(0.0)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Mood", "Trades", "P&L"], mood_rows));

    let setup_rows = report
        .setup_performance
        .iter()
        .map(|(setup, stats)| {
            vec![
                setup.as_str().to_string(),
                stats.count.to_string(),
                format!("{} / {}", stats.wins, stats.losses),
                fmt_money(stats.total_pnl),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Setup", "Trades", "W / L", "P&L"], setup_rows));

    let discipline_rows = vec![
        vec!["Revenge trades".into(), report.revenge_trading_count.to_string()],
        vec!["Rule breaks".into(), report.rule_breaks.to_string()],
        vec!["Trades without stop loss".into(), report.trades_without_sl.to_string()],
        vec!["Poor risk-reward (<1:1)".into(), report.poor_rr_trades.to_string()],
        vec!["Most active day".into(), report.most_active_day.clone()],
    ];
    println!("{}", pretty_table(&["Discipline", "Value"], discipline_rows));

    Ok(())
}
