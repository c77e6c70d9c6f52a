use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, Local, NaiveDate};

use super::import::load_trades_csv;
use crate::analytics::{BucketMode, build_equity_series, build_volume_series, compute_summary};
use crate::models::{Trade, TradeStatus};
use crate::utils::{fmt_money, pretty_table};

/// Performance summary over closed trades, optionally scoped to one
/// calendar month (`YYYY-MM`).
pub fn summary(trades_path: &Path, month: Option<&str>) -> Result<()> {
    let mut trades = load_trades_csv(trades_path)?;
    trades.retain(|t| t.status == TradeStatus::Closed);

    if let Some(month) = month {
        let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
            .with_context(|| format!("invalid month '{month}', expected YYYY-MM"))?;
        trades.retain(|t| t.date.year() == first.year() && t.date.month() == first.month());
    }

    let summary = compute_summary(&trades).context("failed to compute summary")?;

    let day = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    let rows = vec![
        vec!["Total trades".into(), summary.total_trades.to_string()],
        vec!["Winning / losing".into(), format!("{} / {}", summary.winning_trades, summary.losing_trades)],
        vec!["Win rate".into(), format!("{:.2}%", summary.win_rate)],
        vec!["Net P&L".into(), fmt_money(summary.net_pnl)],
        vec!["Avg P&L per trade".into(), fmt_money(summary.avg_pnl)],
        vec!["Avg risk-reward".into(), format!("{:.2}", summary.avg_rr)],
        vec!["Profit factor".into(), format!("{:.2}", summary.profit_factor)],
        vec!["Best trade".into(), fmt_money(summary.best_trade)],
        vec!["Worst trade".into(), fmt_money(summary.worst_trade)],
        vec![
            "Best day".into(),
            format!("{} ({})", day(summary.best_day.date), fmt_money(summary.best_day.pnl)),
        ],
        vec![
            "Worst day".into(),
            format!("{} ({})", day(summary.worst_day.date), fmt_money(summary.worst_day.pnl)),
        ],
        vec!["Max drawdown".into(), fmt_money(summary.max_drawdown)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

/// Equity curve over a trailing window of days.
pub fn equity(trades_path: &Path, mode: BucketMode, days: u32) -> Result<()> {
    let trades = load_window(trades_path, days)?;
    let curve = build_equity_series(&trades, mode).context("failed to build equity series")?;

    let rows = curve
        .iter()
        .map(|p| {
            let when = match p.time {
                Some(time) => format!("{} {}", p.date, time.format("%H:%M")),
                None => p.date.to_string(),
            };
            vec![when, fmt_money(p.pnl), fmt_money(p.cumulative_pnl)]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "P&L", "Cumulative"], rows));

    if let Some(last) = curve.last() {
        println!("Final P&L: {}", fmt_money(last.cumulative_pnl));
    }
    Ok(())
}

/// Per-day traded volume over a trailing window of days.
pub fn volume(trades_path: &Path, days: u32) -> Result<()> {
    let trades = load_window(trades_path, days)?;
    let series = build_volume_series(&trades).context("failed to build volume series")?;

    let rows = series
        .iter()
        .map(|p| vec![p.date.to_string(), p.value.to_string()])
        .collect();
    println!("{}", pretty_table(&["Date", "Quantity"], rows));
    Ok(())
}

/// The engines take pre-filtered slices; the trailing window is resolved
/// here against the local calendar date.
pub(crate) fn load_window(trades_path: &Path, days: u32) -> Result<Vec<Trade>> {
    let trades = load_trades_csv(trades_path)?;
    let since = Local::now()
        .date_naive()
        .checked_sub_days(Days::new(days as u64))
        .context("window start out of range")?;
    Ok(crate::analytics::filter_since(&trades, Some(since)))
}
