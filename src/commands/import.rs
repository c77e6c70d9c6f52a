use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Trade;

/// Load a journal CSV export into memory. Derived fields are recomputed the
/// way the storage layer does at write time, then every record is validated.
/// The first malformed row aborts the load with its row number; silently
/// skipping rows would corrupt every aggregate computed downstream.
pub fn load_trades_csv(path: &Path) -> Result<Vec<Trade>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut trades = Vec::new();
    for (index, row) in reader.deserialize::<Trade>().enumerate() {
        // +2: header row plus 1-based numbering.
        let row_number = index + 2;
        let mut trade =
            row.with_context(|| format!("{}: bad record at row {}", path.display(), row_number))?;
        trade.recompute_derived();
        trade
            .validate()
            .with_context(|| format!("{}: invalid trade at row {}", path.display(), row_number))?;
        trades.push(trade);
    }

    log::info!("loaded {} trades from {}", trades.len(), path.display());
    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    use crate::models::{Side, TradeStatus};

    const HEADER: &str = "id,user_id,date,time,instrument,segment,side,setup,entry_price,exit_price,quantity,stop_loss,target,mood,followed_plan,status,notes\n";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for row in rows {
            file.write_all(row.as_bytes()).unwrap();
            file.write_all(b"\n").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_and_derives_trades() {
        let file = write_csv(&[
            "t1,u1,2024-06-03,10:15,RELIANCE,equity,LONG,breakout,2900,2950,10,2880,2960,calm,true,CLOSED,clean entry",
            "t2,u1,2024-06-04,11:00,INFY,equity,SELL,scalp,1500,1520,5,,,fomo,false,CLOSED,",
        ]);

        let trades = load_trades_csv(file.path()).unwrap();
        assert_eq!(trades.len(), 2);

        assert_eq!(trades[0].pnl, 500.0);
        assert_eq!(trades[0].rr_ratio, 3.0);

        // SELL normalizes to SHORT; price rose, so the short lost.
        assert_eq!(trades[1].side, Side::Short);
        assert_eq!(trades[1].pnl, -100.0);
        assert_eq!(trades[1].rr_ratio, 0.0);
        assert_eq!(trades[1].stop_loss, None);
    }

    #[test]
    fn open_trade_loads_with_zero_pnl() {
        let file = write_csv(&[
            "t1,u1,2024-06-03,10:15,RELIANCE,equity,LONG,trend,2900,,10,2880,2960,calm,true,OPEN,running",
        ]);
        let trades = load_trades_csv(file.path()).unwrap();
        assert_eq!(trades[0].status, TradeStatus::Open);
        assert_eq!(trades[0].pnl, 0.0);
    }

    #[test]
    fn malformed_row_fails_fast_with_row_number() {
        let file = write_csv(&[
            "t1,u1,2024-06-03,10:15,RELIANCE,equity,LONG,breakout,2900,2950,10,,,calm,true,CLOSED,",
            "t2,u1,2024-06-04,25:99,INFY,equity,LONG,scalp,1500,1520,5,,,calm,true,CLOSED,",
        ]);
        let err = load_trades_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("row 3"), "{err}");
    }

    #[test]
    fn semantically_invalid_row_fails_validation() {
        let file = write_csv(&[
            "t1,u1,2024-06-03,10:15,RELIANCE,equity,LONG,breakout,2900,2950,0,,,calm,true,CLOSED,",
        ]);
        let err = load_trades_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid trade"), "{err}");
    }
}
