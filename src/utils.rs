use comfy_table::{Cell, Table, presets::UTF8_FULL};

/// Round to 2 decimal places. Monetary values accumulate at full precision
/// and are rounded once, at the point of output.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Render a monetary amount with its currency symbol, e.g. `₹1250.50`.
pub fn fmt_money(value: f64) -> String {
    if value < 0.0 {
        format!("-₹{:.2}", value.abs())
    } else {
        format!("₹{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(1.2345), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-1.236), -1.24);
        assert_eq!(round2(3.0), 3.0);
    }

    #[test]
    fn fmt_money_places_sign_before_symbol() {
        assert_eq!(fmt_money(1250.5), "₹1250.50");
        assert_eq!(fmt_money(-42.0), "-₹42.00");
    }
}
