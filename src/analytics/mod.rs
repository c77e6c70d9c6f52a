pub mod behavior;
pub mod metrics;
pub mod series;

pub use behavior::{BehaviorReport, OvertradingDay, SetupStats, analyze_behavior};
pub use metrics::{DayPnl, MetricsSummary, compute_summary};
pub use series::{BucketMode, EquityPoint, VolumePoint, build_equity_series, build_volume_series};

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{InvalidTrade, Trade};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    InvalidTrade(#[from] InvalidTrade),
}

/// Fail-fast gate run by every engine before aggregating.
pub(crate) fn validate_all(trades: &[Trade]) -> Result<(), AnalyticsError> {
    for trade in trades {
        trade.validate()?;
    }
    Ok(())
}

/// Trailing-window filter applied by callers before invoking the engines.
/// `None` passes everything through.
pub fn filter_since(trades: &[Trade], since: Option<NaiveDate>) -> Vec<Trade> {
    match since {
        Some(cutoff) => trades.iter().filter(|t| t.date >= cutoff).cloned().collect(),
        None => trades.to_vec(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::{Mood, Segment, Setup, Side, Trade, TradeStatus};

    /// Closed long equity trade with a precomputed `pnl`, dated `date`
    /// (parsed leniently, so "2024-2-1" works) at HH:MM `time`.
    pub fn trade(date: &str, time: &str, pnl: f64) -> Trade {
        let mut t = Trade {
            id: format!("{date}T{time}"),
            user_id: String::new(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            instrument: "RELIANCE".into(),
            segment: Segment::Equity,
            side: Side::Long,
            setup: Setup::Breakout,
            entry_price: 100.0,
            exit_price: Some(100.0),
            quantity: 1,
            stop_loss: Some(95.0),
            target: Some(110.0),
            pnl: 0.0,
            rr_ratio: 2.0,
            mood: Mood::Neutral,
            followed_plan: true,
            status: TradeStatus::Closed,
            notes: String::new(),
        };
        t.pnl = pnl;
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::trade;

    #[test]
    fn filter_since_keeps_cutoff_day() {
        let trades = vec![
            trade("2024-06-01", "10:00", 50.0),
            trade("2024-06-10", "10:00", 50.0),
            trade("2024-06-20", "10:00", 50.0),
        ];
        let since = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let kept = filter_since(&trades, Some(since));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|t| t.date >= since));
    }

    #[test]
    fn validate_all_fails_fast_on_first_bad_record() {
        let mut trades = vec![
            trade("2024-06-01", "10:00", 50.0),
            trade("2024-06-02", "10:00", 50.0),
        ];
        trades[1].quantity = 0;
        let err = validate_all(&trades).unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }
}
