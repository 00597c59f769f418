// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::utils::date::month_last_day;
use chrono::NaiveDate;

fn bad(msg: &str) -> AppError {
    AppError::Validation(format!("invalid --range: {msg}"))
}

/// First and last day covered by a single period: YYYY, YYYY-MM or YYYY-MM-DD.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| bad("invalid year"))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid year"))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid year"))?;
            Ok((d1, d2))
        }
        7 => {
            let (ys, ms) = p.split_once('-').ok_or_else(|| bad("invalid month"))?;
            let y: i32 = ys.parse().map_err(|_| bad("invalid year"))?;
            let m: u32 = ms.parse().map_err(|_| bad("invalid month"))?;
            let last = month_last_day(y, m).ok_or_else(|| bad("invalid month"))?;

            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| bad("invalid month"))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| bad("invalid month"))?;
            Ok((d1, d2))
        }
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| bad("invalid date"))?;
            Ok((d, d))
        }
        _ => Err(bad("unsupported format")),
    }
}

/// Parse --range.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub(crate) fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();

    let Some((start_raw, end_raw)) = r.split_once(':') else {
        return period_bounds(r);
    };

    let start = start_raw.trim();
    let end = end_raw.trim();
    if start.len() != end.len() {
        return Err(bad("start and end must have same format"));
    }

    let (d1, _) = period_bounds(start)?;
    let (_, d2) = period_bounds(end)?;
    if d1 > d2 {
        return Err(bad("start is after end"));
    }
    Ok((d1, d2))
}

/// Human label for a range, used in report titles.
pub(crate) fn describe_range(r: &str) -> Option<String> {
    let r = r.trim();
    if let Some((a, b)) = r.split_once(':') {
        return Some(format!("from {} to {}", a.trim(), b.trim()));
    }
    match r.len() {
        4 => Some(format!("for year {r}")),
        7 => crate::models::YearMonth::parse(r).map(|ym| format!("for {}", ym.label())),
        10 => Some(format!("for {r}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_periods() {
        assert_eq!(parse_range("2025").unwrap(), (d(2025, 1, 1), d(2025, 12, 31)));
        assert_eq!(parse_range("2024-02").unwrap(), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(parse_range("2025-10-27").unwrap(), (d(2025, 10, 27), d(2025, 10, 27)));
    }

    #[test]
    fn intervals() {
        assert_eq!(
            parse_range("2025-01:2025-03").unwrap(),
            (d(2025, 1, 1), d(2025, 3, 31))
        );
        assert_eq!(parse_range("2023:2024").unwrap(), (d(2023, 1, 1), d(2024, 12, 31)));
    }

    #[test]
    fn malformed_ranges() {
        assert!(parse_range("2025-13").is_err());
        assert!(parse_range("2025:2025-01").is_err());
        assert!(parse_range("2025-03:2025-01").is_err());
        assert!(parse_range("last week").is_err());
    }

    #[test]
    fn range_labels() {
        assert_eq!(describe_range("2025-03").as_deref(), Some("for March 2025"));
        assert_eq!(describe_range("2025").as_deref(), Some("for year 2025"));
    }
}
