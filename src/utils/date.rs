use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Today as "YYYY-MM-DD", the storage format of `expenses.date`.
pub fn today_str() -> String {
    today().format("%Y-%m-%d").to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// English month name from a two-digit month ("01".."12").
pub fn month_name(mm: &str) -> &'static str {
    match mm {
        "01" => "January",
        "02" => "February",
        "03" => "March",
        "04" => "April",
        "05" => "May",
        "06" => "June",
        "07" => "July",
        "08" => "August",
        "09" => "September",
        "10" => "October",
        "11" => "November",
        "12" => "December",
        _ => "Unknown",
    }
}

/// Last day of a month, or None for an invalid month.
pub fn month_last_day(year: i32, month: u32) -> Option<u32> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)?
        .pred_opt()
        .map(|d| chrono::Datelike::day(&d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(month_last_day(2024, 2), Some(29));
        assert_eq!(month_last_day(2025, 2), Some(28));
        assert_eq!(month_last_day(2025, 12), Some(31));
        assert_eq!(month_last_day(2025, 13), None);
    }

    #[test]
    fn parse_date_trims() {
        assert!(parse_date(" 2025-10-27 ").is_some());
        assert!(parse_date("27/10/2025").is_none());
    }
}
