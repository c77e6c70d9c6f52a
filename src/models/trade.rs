use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::round2;

/// Direction of a position. BUY/BOUGHT and SELL/SOLD spellings found in
/// broker exports deserialize into LONG and SHORT respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[serde(alias = "BUY", alias = "BOUGHT")]
    Long,
    #[serde(alias = "SELL", alias = "SOLD")]
    Short,
}

impl Side {
    /// Sign applied to (exit − entry) when realizing P&L.
    pub fn multiplier(&self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Equity,
    Futures,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Setup {
    Breakout,
    Trend,
    Reversal,
    Scalp,
    Other,
}

impl Setup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Setup::Breakout => "breakout",
            Setup::Trend => "trend",
            Setup::Reversal => "reversal",
            Setup::Scalp => "scalp",
            Setup::Other => "other",
        }
    }
}

/// Self-reported mood tag attached when the trade was logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Fomo,
    Revenge,
    Anxious,
    Confident,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Fomo => "fomo",
            Mood::Revenge => "revenge",
            Mood::Anxious => "anxious",
            Mood::Confident => "confident",
            Mood::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// A journaled trade. Records are owned by the storage layer; the analytics
/// engines consume them read-only with `pnl` and `rr_ratio` already derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default = "new_trade_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub instrument: String,
    pub segment: Segment,
    pub side: Side,
    pub setup: Setup,
    pub entry_price: f64,
    #[serde(default)]
    pub exit_price: Option<f64>,
    pub quantity: u32,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub pnl: f64,
    #[serde(default)]
    pub rr_ratio: f64,
    pub mood: Mood,
    #[serde(default = "default_followed_plan")]
    pub followed_plan: bool,
    pub status: TradeStatus,
    #[serde(default)]
    pub notes: String,
}

fn new_trade_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_followed_plan() -> bool {
    true
}

/// A trade record the engines refuse to aggregate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid trade {id}: {reason}")]
pub struct InvalidTrade {
    pub id: String,
    pub reason: String,
}

impl Trade {
    /// Derive `pnl` and `rr_ratio` from the price fields. The storage layer
    /// runs this once whenever a record is created or edited; downstream
    /// consumers treat the results as facts.
    pub fn recompute_derived(&mut self) {
        self.pnl = match (self.status, self.exit_price) {
            (TradeStatus::Closed, Some(exit)) => {
                round2((exit - self.entry_price) * self.side.multiplier() * self.quantity as f64)
            }
            _ => 0.0,
        };

        self.rr_ratio = match (self.stop_loss, self.target) {
            (Some(stop), Some(target)) => {
                let risk = (self.entry_price - stop).abs();
                let reward = (target - self.entry_price).abs();
                if risk > 0.0 { round2(reward / risk) } else { 0.0 }
            }
            _ => 0.0,
        };
    }

    /// Reject records the engines cannot aggregate. Policy is fail fast:
    /// a bad record is an error, never silently skipped.
    pub fn validate(&self) -> Result<(), InvalidTrade> {
        if self.quantity == 0 {
            return Err(self.invalid("quantity must be at least 1"));
        }
        if !(self.entry_price > 0.0) {
            return Err(self.invalid("entry price must be positive"));
        }
        if self.status == TradeStatus::Closed && self.exit_price.is_none() {
            return Err(self.invalid("closed trade has no exit price"));
        }
        if let Some(exit) = self.exit_price {
            if !(exit > 0.0) {
                return Err(self.invalid("exit price must be positive"));
            }
        }
        Ok(())
    }

    /// Combined calendar date + HH:MM time, for gap arithmetic.
    pub fn datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    fn invalid(&self, reason: &str) -> InvalidTrade {
        InvalidTrade {
            id: self.id.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Serde codec for the journal's HH:MM trade-time format. Accepts a
/// trailing seconds component on input for tolerance with older exports.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(de)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|_| D::Error::custom(format!("time must be in HH:MM format, got {:?}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_trade() -> Trade {
        Trade {
            id: "t1".into(),
            user_id: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            time: NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
            instrument: "RELIANCE".into(),
            segment: Segment::Equity,
            side: Side::Long,
            setup: Setup::Breakout,
            entry_price: 2900.0,
            exit_price: Some(2950.0),
            quantity: 10,
            stop_loss: Some(2880.0),
            target: Some(2960.0),
            pnl: 0.0,
            rr_ratio: 0.0,
            mood: Mood::Calm,
            followed_plan: true,
            status: TradeStatus::Closed,
            notes: String::new(),
        }
    }

    #[test]
    fn derives_pnl_with_side_multiplier() {
        let mut long = closed_trade();
        long.recompute_derived();
        assert_eq!(long.pnl, 500.0);

        let mut short = closed_trade();
        short.side = Side::Short;
        short.recompute_derived();
        assert_eq!(short.pnl, -500.0);
    }

    #[test]
    fn open_trade_has_zero_pnl() {
        let mut trade = closed_trade();
        trade.status = TradeStatus::Open;
        trade.exit_price = None;
        trade.recompute_derived();
        assert_eq!(trade.pnl, 0.0);
    }

    #[test]
    fn derives_rr_ratio_from_stop_and_target() {
        let mut trade = closed_trade();
        trade.recompute_derived();
        // reward 60, risk 20
        assert_eq!(trade.rr_ratio, 3.0);

        trade.stop_loss = None;
        trade.recompute_derived();
        assert_eq!(trade.rr_ratio, 0.0);
    }

    #[test]
    fn rr_ratio_zero_when_risk_is_zero() {
        let mut trade = closed_trade();
        trade.stop_loss = Some(trade.entry_price);
        trade.recompute_derived();
        assert_eq!(trade.rr_ratio, 0.0);
    }

    #[test]
    fn side_accepts_broker_spellings() {
        for (raw, expected) in [
            ("\"BUY\"", Side::Long),
            ("\"BOUGHT\"", Side::Long),
            ("\"LONG\"", Side::Long),
            ("\"SELL\"", Side::Short),
            ("\"SOLD\"", Side::Short),
            ("\"SHORT\"", Side::Short),
        ] {
            let side: Side = serde_json::from_str(raw).unwrap();
            assert_eq!(side, expected, "{raw}");
        }
    }

    #[test]
    fn validate_rejects_closed_trade_without_exit() {
        let mut trade = closed_trade();
        trade.exit_price = None;
        let err = trade.validate().unwrap_err();
        assert!(err.reason.contains("exit price"));
    }

    #[test]
    fn validate_rejects_zero_quantity() {
        let mut trade = closed_trade();
        trade.quantity = 0;
        assert!(trade.validate().is_err());
    }

    #[test]
    fn time_codec_round_trips_hhmm() {
        let trade = closed_trade();
        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"10:15\""));
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back.time, trade.time);
    }
}
