use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::analytics::BucketMode;
use crate::models::JournalSettings;

fn defaults() -> JournalSettings {
    JournalSettings::default()
}

#[derive(Parser)]
#[command(
    name = "tradebook",
    version,
    about = "Trading journal analytics, behavioral insights, and screenshot import"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Performance summary over closed trades
    Summary {
        /// Journal CSV export to read
        #[arg(long)]
        trades: PathBuf,
        /// Restrict to one calendar month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Equity curve over a trailing window
    Equity {
        #[arg(long)]
        trades: PathBuf,
        /// Bucket by day or emit one point per trade
        #[arg(long, value_enum, default_value_t = SeriesMode::Daily)]
        mode: SeriesMode,
        /// Trailing window in days
        #[arg(long, default_value_t = defaults().behavior_window_days)]
        days: u32,
    },
    /// Daily traded volume over a trailing window
    Volume {
        #[arg(long)]
        trades: PathBuf,
        #[arg(long, default_value_t = defaults().behavior_window_days)]
        days: u32,
    },
    /// Behavioral pattern report (overtrading, revenge trading, mood)
    Behavior {
        #[arg(long)]
        trades: PathBuf,
        #[arg(long, default_value_t = defaults().behavior_window_days)]
        days: u32,
        /// Trades per day beyond which a day counts as overtrading
        #[arg(long, default_value_t = defaults().daily_trade_limit)]
        daily_limit: u32,
    },
    /// Extract trade fields from a broker screenshot
    Scan {
        /// Screenshot image (PNG, JPEG, or WebP)
        #[arg(required_unless_present = "check")]
        image: Option<PathBuf>,
        /// Tesseract binary to invoke
        #[arg(long, default_value = "tesseract")]
        tesseract: String,
        /// OCR language code
        #[arg(long, default_value = "eng")]
        lang: String,
        /// Print the scan result as JSON
        #[arg(long)]
        json: bool,
        /// Probe the OCR engine and exit without scanning
        #[arg(long)]
        check: bool,
    },
    /// Latest Indian business headlines
    News,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesMode {
    Daily,
    PerTrade,
}

impl From<SeriesMode> for BucketMode {
    fn from(mode: SeriesMode) -> Self {
        match mode {
            SeriesMode::Daily => BucketMode::Daily,
            SeriesMode::PerTrade => BucketMode::PerTrade,
        }
    }
}
