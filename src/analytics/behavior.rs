use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{AnalyticsError, validate_all};
use crate::models::{Mood, Setup, Trade};
use crate::utils::round2;

/// Fallback when the account carries no configured limit.
pub const DEFAULT_DAILY_TRADE_LIMIT: u32 = 10;

/// Maximum gap, in minutes, between a loss and the next trade for the pair
/// to count as revenge trading.
pub const REVENGE_WINDOW_MINUTES: i64 = 30;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// A day whose trade count exceeded the configured limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertradingDay {
    pub date: NaiveDate,
    pub trade_count: usize,
    pub net_pnl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupStats {
    pub count: usize,
    pub total_pnl: f64,
    pub wins: usize,
    pub losses: usize,
}

/// Rule-based behavioral read over a trailing window of trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorReport {
    pub total_trades: usize,
    pub overtrading_days: Vec<OvertradingDay>,
    pub revenge_trading_count: usize,
    pub mood_distribution: BTreeMap<Mood, usize>,
    pub mood_pnl: BTreeMap<Mood, f64>,
    pub setup_performance: BTreeMap<Setup, SetupStats>,
    pub rule_breaks: usize,
    pub trades_without_sl: usize,
    pub poor_rr_trades: usize,
    pub most_active_day: String,
    pub insights: Vec<String>,
}

/// Scan a user's recent trades for behavioral patterns. Input is expected
/// pre-filtered to the analysis window; ordering is normalized here. This is
/// tagging, not causal inference; each heuristic is deliberately simple and
/// its exact output feeds user-visible insight text.
pub fn analyze_behavior(
    trades: &[Trade],
    daily_trade_limit: u32,
) -> Result<BehaviorReport, AnalyticsError> {
    validate_all(trades)?;

    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| (t.date, t.time));

    let mut trades_by_day: BTreeMap<NaiveDate, Vec<&Trade>> = BTreeMap::new();
    let mut trades_by_weekday = [0usize; 7];
    for trade in &ordered {
        trades_by_day.entry(trade.date).or_default().push(*trade);
        trades_by_weekday[trade.date.weekday().num_days_from_sunday() as usize] += 1;
    }

    let overtrading_days: Vec<OvertradingDay> = trades_by_day
        .iter()
        .filter(|(_, day)| day.len() > daily_trade_limit as usize)
        .map(|(date, day)| OvertradingDay {
            date: *date,
            trade_count: day.len(),
            net_pnl: round2(day.iter().map(|t| t.pnl).sum()),
        })
        .collect();

    // Pairwise O(n) scan: a loss, then a trade tagged "revenge" within the
    // window. No lookahead, no smarter windowing.
    let revenge_trading_count = ordered
        .windows(2)
        .filter(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            let gap = (curr.datetime() - prev.datetime()).num_minutes();
            prev.pnl < 0.0 && gap <= REVENGE_WINDOW_MINUTES && curr.mood == Mood::Revenge
        })
        .count();

    let mut mood_distribution: BTreeMap<Mood, usize> = BTreeMap::new();
    let mut mood_pnl_raw: BTreeMap<Mood, f64> = BTreeMap::new();
    let mut setup_raw: BTreeMap<Setup, SetupStats> = BTreeMap::new();
    for trade in &ordered {
        *mood_distribution.entry(trade.mood).or_insert(0) += 1;
        *mood_pnl_raw.entry(trade.mood).or_insert(0.0) += trade.pnl;

        let stats = setup_raw.entry(trade.setup).or_default();
        stats.count += 1;
        stats.total_pnl += trade.pnl;
        if trade.pnl > 0.0 {
            stats.wins += 1;
        } else if trade.pnl < 0.0 {
            stats.losses += 1;
        }
    }

    let rule_breaks = ordered.iter().filter(|t| !t.followed_plan).count();
    let trades_without_sl = ordered.iter().filter(|t| t.stop_loss.is_none()).count();
    let poor_rr_trades = ordered
        .iter()
        .filter(|t| t.rr_ratio > 0.0 && t.rr_ratio < 1.0)
        .count();

    // Strict-max reduce seeded at Sunday: ties break to the lowest weekday
    // index, and an empty window reports Sunday.
    let mut most_active = 0usize;
    for (weekday, count) in trades_by_weekday.iter().enumerate() {
        if *count > trades_by_weekday[most_active] {
            most_active = weekday;
        }
    }
    let most_active_day = WEEKDAY_NAMES[most_active].to_string();

    let worst_mood = mood_pnl_raw
        .iter()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(mood, pnl)| (*mood, *pnl));

    // Round the aggregates only now that accumulation is done.
    let mood_pnl: BTreeMap<Mood, f64> =
        mood_pnl_raw.into_iter().map(|(m, p)| (m, round2(p))).collect();
    let setup_performance: BTreeMap<Setup, SetupStats> = setup_raw
        .into_iter()
        .map(|(s, mut stats)| {
            stats.total_pnl = round2(stats.total_pnl);
            (s, stats)
        })
        .collect();

    // Fixed template order; each line gated independently. Downstream
    // rendering relies on this exact sequence.
    let mut insights = Vec::new();
    if !overtrading_days.is_empty() {
        insights.push(format!(
            "You exceeded your daily limit on {} day(s)",
            overtrading_days.len()
        ));
    }
    if revenge_trading_count > 0 {
        insights.push(format!("Detected {} potential revenge trades", revenge_trading_count));
    }
    if let Some((mood, pnl)) = worst_mood {
        if pnl < 0.0 {
            insights.push(format!("Most losses occur during \"{}\" trades", mood.as_str()));
        }
    }
    if trades_without_sl > 0 {
        insights.push(format!("{} trades without stop loss", trades_without_sl));
    }
    if poor_rr_trades as f64 > ordered.len() as f64 * 0.3 {
        insights.push(format!(
            "{} trades have poor risk-reward ratio (<1:1)",
            poor_rr_trades
        ));
    }

    Ok(BehaviorReport {
        total_trades: ordered.len(),
        overtrading_days,
        revenge_trading_count,
        mood_distribution,
        mood_pnl,
        setup_performance,
        rule_breaks,
        trades_without_sl,
        poor_rr_trades,
        most_active_day,
        insights,
    })
}
