//! Formatting utilities used for HTML views, insights and export outputs.

/// Round to cents, avoiding "-0.00".
pub fn round2(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

/// es: ("₹", 150.0) → "₹150.00"
pub fn money(currency: &str, amount: f64) -> String {
    format!("{}{:.2}", currency, round2(amount))
}

/// Plain amount with two decimals, as written in PDF cells.
pub fn amount_cell(amount: f64) -> String {
    format!("{:.2}", round2(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(money("₹", 50.0), "₹50.00");
        assert_eq!(money("$", 12.346), "$12.35");
        assert_eq!(money("$", -0.001), "$0.00");
    }
}
