use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Side;

/// Fields pulled out of a broker-screenshot's OCR text. Extraction is
/// literal pattern matching only: a field with no matching pattern stays
/// `None` (never guessed, never defaulted) so the trade form can safely
/// auto-fill without clobbering anything the user already typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTradeFields {
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub quantity: Option<u32>,
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
    pub timestamp: Option<String>,
    /// Full OCR text, kept for audit and debugging.
    pub raw_text: String,
}

impl ExtractedTradeFields {
    /// Number of populated fields (excluding `raw_text`).
    pub fn fields_extracted(&self) -> usize {
        [
            self.symbol.is_some(),
            self.side.is_some(),
            self.entry_price.is_some(),
            self.exit_price.is_some(),
            self.quantity.is_some(),
            self.stop_loss.is_some(),
            self.target.is_some(),
            self.timestamp.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("pattern table entry must compile"))
        .collect()
}

static SIDE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(BUY|SELL|LONG|SHORT|BOUGHT|SOLD)\b").expect("side pattern"));

// Each table is tried top to bottom and the first match wins; the order is
// load-bearing. Exchange-prefixed symbols (NSE:RELIANCE) outrank generic
// labels, which outrank index names, which outrank the derivative-suffix
// heuristic (NIFTY 18000 CE).
static SYMBOL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:NSE|BSE):\s*([A-Z0-9]+)",
        r"SYMBOL\s*[:\-]?\s*([A-Z0-9]+)",
        r"SCRIP\s*[:\-]?\s*([A-Z0-9]+)",
        r"\b(NIFTY|BANKNIFTY|FINNIFTY)\s*\d*",
        r"\b([A-Z]{2,})\s+(?:CE|PE|FUT)",
    ])
});

static QUANTITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"QTY\s*[:\-]?\s*(\d+)",
        r"QUANTITY\s*[:\-]?\s*(\d+)",
        r"LOT\s*SIZE\s*[:\-]?\s*(\d+)",
        r"LOTS\s*[:\-]?\s*(\d+)",
        r"(\d+)\s*(?:SHARES|QTY|LOTS)",
    ])
});

// The bare ₹-amount fallback is last on purpose: a document with several
// rupee amounts and no explicit label yields the first occurrence, which may
// be wrong. Known limitation, kept as-is.
static ENTRY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:ENTRY|BUY|PURCHASE|AVG)\s*PRICE\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
        r"(?:PRICE|RATE)\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
        r"₹\s*([\d,]+\.?\d*)",
    ])
});

static EXIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:EXIT|SELL)\s*PRICE\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
        r"SOLD\s*AT\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    ])
});

static STOP_LOSS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"STOP\s*LOSS\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
        r"\bSL\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    ])
});

static TARGET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:TARGET|TGT)\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
        r"\bTP\s*[:\-]?\s*₹?\s*([\d,]+\.?\d*)",
    ])
});

static TIMESTAMP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\s+\d{1,2}:\d{2}(?::\d{2})?(?:\s*[AP]M)?)",
        r"(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})",
        r"(?:DATE|TIME|TIMESTAMP)\s*[:\-]?\s*([0-9/\-:\s]+)",
    ])
});

/// Deterministic field extraction over raw OCR text. Text is uppercased
/// before matching, so extracted symbols come back uppercase.
pub fn extract_trade_fields(ocr_text: &str) -> ExtractedTradeFields {
    let text = ocr_text.to_uppercase();

    let side = SIDE_PATTERN.captures(&text).map(|caps| {
        // Full normalization: broker verbs collapse into position direction.
        match &caps[1] {
            "BUY" | "BOUGHT" | "LONG" => Side::Long,
            _ => Side::Short,
        }
    });

    ExtractedTradeFields {
        symbol: first_capture(&text, &SYMBOL_PATTERNS).map(|s| s.trim().to_string()),
        side,
        entry_price: first_price(&text, &ENTRY_PATTERNS),
        exit_price: first_price(&text, &EXIT_PATTERNS),
        quantity: first_capture(&text, &QUANTITY_PATTERNS).and_then(|s| s.parse().ok()),
        stop_loss: first_price(&text, &STOP_LOSS_PATTERNS),
        target: first_price(&text, &TARGET_PATTERNS),
        timestamp: first_capture(&text, &TIMESTAMP_PATTERNS).map(|s| s.trim().to_string()),
        raw_text: ocr_text.to_string(),
    }
}

fn first_capture<'t>(text: &'t str, patterns: &[Regex]) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|p| p.captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str()))
}

/// First matching pattern wins; thousands-separator commas are stripped
/// before the numeric parse.
fn first_price(text: &str, patterns: &[Regex]) -> Option<f64> {
    first_capture(text, patterns).and_then(|raw| raw.replace(',', "").parse().ok())
}
