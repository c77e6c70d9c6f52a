use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AnalyticsError, validate_all};
use crate::models::Trade;
use crate::utils::round2;

/// Net P&L of one calendar day. `date` is `None` on the all-zero summary
/// produced for an empty trade set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPnl {
    pub date: Option<NaiveDate>,
    pub pnl: f64,
}

impl DayPnl {
    fn none() -> Self {
        Self { date: None, pnl: 0.0 }
    }
}

/// Aggregate performance over a trade set. Recomputed per request; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub net_pnl: f64,
    pub avg_pnl: f64,
    pub avg_rr: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub best_day: DayPnl,
    pub worst_day: DayPnl,
    pub max_drawdown: f64,
    pub profit_factor: f64,
}

impl MetricsSummary {
    fn zeroed() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: 0.0,
            net_pnl: 0.0,
            avg_pnl: 0.0,
            avg_rr: 0.0,
            best_trade: 0.0,
            worst_trade: 0.0,
            best_day: DayPnl::none(),
            worst_day: DayPnl::none(),
            max_drawdown: 0.0,
            profit_factor: 0.0,
        }
    }
}

/// Compute summary statistics over a trade set already scoped by the caller
/// (user, date range, closed status). Empty input is a defined terminal
/// case, not an error. Accumulation runs at full precision; rounding to two
/// decimals happens once, on emission.
pub fn compute_summary(trades: &[Trade]) -> Result<MetricsSummary, AnalyticsError> {
    validate_all(trades)?;

    if trades.is_empty() {
        return Ok(MetricsSummary::zeroed());
    }

    let total = trades.len();
    let winning = trades.iter().filter(|t| t.pnl > 0.0).count();
    let losing = trades.iter().filter(|t| t.pnl < 0.0).count();

    let net_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
    let total_gains: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let total_losses: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl)
        .sum::<f64>()
        .abs();

    // Zero gross loss is a defined fallback, never infinity.
    let profit_factor = if total_losses > 0.0 {
        total_gains / total_losses
    } else {
        0.0
    };

    // Trades without a stop/target carry rr_ratio 0 and are excluded from
    // the average rather than dragging it down.
    let rr_values: Vec<f64> = trades.iter().map(|t| t.rr_ratio).filter(|rr| *rr > 0.0).collect();
    let avg_rr = if rr_values.is_empty() {
        0.0
    } else {
        rr_values.iter().sum::<f64>() / rr_values.len() as f64
    };

    let best_trade = trades.iter().map(|t| t.pnl).fold(trades[0].pnl, f64::max);
    let worst_trade = trades.iter().map(|t| t.pnl).fold(trades[0].pnl, f64::min);

    let (best_day, worst_day) = day_extrema(trades);
    let max_drawdown = max_drawdown(trades);

    Ok(MetricsSummary {
        total_trades: total,
        winning_trades: winning,
        losing_trades: losing,
        win_rate: round2(winning as f64 / total as f64 * 100.0),
        net_pnl: round2(net_pnl),
        avg_pnl: round2(net_pnl / total as f64),
        avg_rr: round2(avg_rr),
        best_trade: round2(best_trade),
        worst_trade: round2(worst_trade),
        best_day,
        worst_day,
        max_drawdown: round2(max_drawdown),
        profit_factor: round2(profit_factor),
    })
}

/// Max/min of per-calendar-day P&L sums. Day aggregation comes first, so
/// two trades of +100 and -30 on one day compete as a single +70 entry.
fn day_extrema(trades: &[Trade]) -> (DayPnl, DayPnl) {
    let mut per_day: HashMap<NaiveDate, f64> = HashMap::new();
    for trade in trades {
        *per_day.entry(trade.date).or_insert(0.0) += trade.pnl;
    }

    // Scan in date order with ±∞ sentinels; strict comparisons mean ties go
    // to the earliest day. Zero days leaves both at {None, 0}.
    let mut days: Vec<(NaiveDate, f64)> = per_day.into_iter().collect();
    days.sort_by_key(|(date, _)| *date);

    let mut best = DayPnl::none();
    let mut worst = DayPnl::none();
    let mut best_pnl = f64::NEG_INFINITY;
    let mut worst_pnl = f64::INFINITY;

    for (date, pnl) in days {
        if pnl > best_pnl {
            best_pnl = pnl;
            best = DayPnl { date: Some(date), pnl: round2(pnl) };
        }
        if pnl < worst_pnl {
            worst_pnl = pnl;
            worst = DayPnl { date: Some(date), pnl: round2(pnl) };
        }
    }

    (best, worst)
}

/// Peak-to-trough decline over the running cumulative P&L, scanned in
/// ascending date order. The peak starts at 0, so an opening losing streak
/// counts as drawdown from flat.
fn max_drawdown(trades: &[Trade]) -> f64 {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.date);

    let mut running_pnl = 0.0;
    let mut peak = 0.0;
    let mut max_dd = 0.0;

    for trade in ordered {
        running_pnl += trade.pnl;
        if running_pnl > peak {
            peak = running_pnl;
        }
        let drawdown = peak - running_pnl;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }

    max_dd
}
