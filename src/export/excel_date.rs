// src/export/excel_date.rs

use chrono::{Duration, NaiveDate};

/// Excel's day zero (1900 date system, including the 1900 leap-year bug).
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Convert an Excel date serial (fractional part = time of day) to a date.
///
/// Serials below 1 or beyond year 9999 are not dates.
pub(crate) fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    excel_epoch()?.checked_add_signed(Duration::days(serial.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_serials() {
        let d = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap();
        assert_eq!(excel_serial_to_date(45957.0), Some(d));
        assert_eq!(excel_serial_to_date(45957.75), Some(d));
    }

    #[test]
    fn out_of_range_serials_are_rejected() {
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-3.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(1e9), None);
    }
}
