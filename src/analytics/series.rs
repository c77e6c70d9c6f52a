use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{AnalyticsError, validate_all};
use crate::models::Trade;
use crate::utils::round2;

/// How the equity curve is bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketMode {
    /// One point per distinct trading day (net P&L of the day).
    Daily,
    /// One point per trade, in (date, time) order.
    PerTrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    /// Set only in per-trade mode.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time: Option<NaiveTime>,
    pub pnl: f64,
    pub cumulative_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub value: u64,
}

/// Build the equity curve for charting. Days are keyed by calendar date and
/// ordered by real date value, never by string comparison. The series is
/// sparse: a day with no trades is absent, not zero-filled.
pub fn build_equity_series(
    trades: &[Trade],
    mode: BucketMode,
) -> Result<Vec<EquityPoint>, AnalyticsError> {
    validate_all(trades)?;

    let mut running_pnl = 0.0;
    let mut curve = Vec::new();

    match mode {
        BucketMode::Daily => {
            let mut per_day: HashMap<NaiveDate, f64> = HashMap::new();
            for trade in trades {
                *per_day.entry(trade.date).or_insert(0.0) += trade.pnl;
            }

            let mut days: Vec<(NaiveDate, f64)> = per_day.into_iter().collect();
            days.sort_by_key(|(date, _)| *date);

            for (date, pnl) in days {
                running_pnl += pnl;
                curve.push(EquityPoint {
                    date,
                    time: None,
                    pnl: round2(pnl),
                    cumulative_pnl: round2(running_pnl),
                });
            }
        }
        BucketMode::PerTrade => {
            let mut ordered: Vec<&Trade> = trades.iter().collect();
            ordered.sort_by_key(|t| (t.date, t.time));

            for trade in ordered {
                running_pnl += trade.pnl;
                curve.push(EquityPoint {
                    date: trade.date,
                    time: Some(trade.time),
                    pnl: round2(trade.pnl),
                    cumulative_pnl: round2(running_pnl),
                });
            }
        }
    }

    Ok(curve)
}

/// Per-day traded quantity. Independent of the equity curve: no cumulative
/// component.
pub fn build_volume_series(trades: &[Trade]) -> Result<Vec<VolumePoint>, AnalyticsError> {
    validate_all(trades)?;

    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
    for trade in trades {
        *per_day.entry(trade.date).or_insert(0) += trade.quantity as u64;
    }

    let mut days: Vec<VolumePoint> = per_day
        .into_iter()
        .map(|(date, value)| VolumePoint { date, value })
        .collect();
    days.sort_by_key(|p| p.date);

    Ok(days)
}
