use serde::{Deserialize, Serialize};

use crate::analytics::behavior::DEFAULT_DAILY_TRADE_LIMIT;

/// Per-user journal preferences. Stored wherever the caller keeps account
/// data; the engines only ever see the individual values, injected per call.
/// The CLI uses the defaults when no flag overrides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalSettings {
    /// Trades per day beyond which a day is flagged as overtrading.
    pub daily_trade_limit: u32,
    /// Trailing window, in days, for behavioral and series analysis.
    pub behavior_window_days: u32,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            daily_trade_limit: DEFAULT_DAILY_TRADE_LIMIT,
            behavior_window_days: 30,
        }
    }
}
