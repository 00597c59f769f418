use crate::errors::{AppError, AppResult};
use crate::utils::date::{month_name, today};
use chrono::Datelike;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RE_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])$").expect("valid month regex"));

/// Sentinel used by the dashboard to select every expense.
pub const LIFETIME: &str = "lifetime";

/// A calendar month ("YYYY-MM").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn parse(s: &str) -> Option<Self> {
        let caps = RE_MONTH.captures(s.trim())?;
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, always within `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn current() -> Self {
        let t = today();
        Self {
            year: t.year(),
            month: t.month(),
        }
    }

    /// Previous calendar month, rolling January back to December of the year before.
    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            m => Self {
                year: self.year,
                month: m - 1,
            },
        }
    }

    /// Pattern for `date LIKE ?` matching every day of the month.
    pub fn like_pattern(&self) -> String {
        format!("{self}%")
    }

    /// Human label, e.g. "October 2025".
    pub fn label(&self) -> String {
        format!("{} {}", month_name(&format!("{:02}", self.month)), self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Dashboard filter: one month, or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    Lifetime,
    Month(YearMonth),
}

impl MonthFilter {
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case(LIFETIME) {
            return Some(MonthFilter::Lifetime);
        }
        YearMonth::parse(s).map(MonthFilter::Month)
    }

    /// Parse user input, falling back to the current month when missing or invalid.
    pub fn from_input(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse)
            .unwrap_or_else(|| MonthFilter::Month(YearMonth::current()))
    }

    pub fn month(&self) -> Option<YearMonth> {
        match self {
            MonthFilter::Lifetime => None,
            MonthFilter::Month(ym) => Some(*ym),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::Lifetime => f.write_str(LIFETIME),
            MonthFilter::Month(ym) => ym.fmt(f),
        }
    }
}

/// Validate a month for goal-setting. `lifetime` and malformed values are refused.
pub fn goal_month(raw: Option<&str>) -> AppResult<YearMonth> {
    match raw.map(str::trim) {
        None | Some("") => Ok(YearMonth::current()),
        Some(s) if s.eq_ignore_ascii_case(LIFETIME) => Err(AppError::InvalidMonth(
            "goals can only be set for a specific month".into(),
        )),
        Some(s) => YearMonth::parse(s).ok_or_else(|| AppError::InvalidMonth(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_month_rolls_over_year() {
        let jan = YearMonth::new(2025, 1).unwrap();
        assert_eq!(jan.previous(), YearMonth::new(2024, 12).unwrap());

        let oct = YearMonth::new(2025, 10).unwrap();
        assert_eq!(oct.previous().to_string(), "2025-09");
    }

    #[test]
    fn months_outside_the_calendar_are_refused() {
        assert!(YearMonth::new(2025, 0).is_none());
        assert!(YearMonth::new(2025, 13).is_none());

        let ym = YearMonth::parse("2025-01").unwrap();
        assert_eq!((ym.year(), ym.month()), (2025, 1));
        let prev = ym.previous();
        assert_eq!((prev.year(), prev.month()), (2024, 12));
    }

    #[test]
    fn parses_months_and_sentinel() {
        assert_eq!(
            MonthFilter::parse("2025-10"),
            Some(MonthFilter::Month(YearMonth::new(2025, 10).unwrap()))
        );
        assert_eq!(MonthFilter::parse("lifetime"), Some(MonthFilter::Lifetime));
        assert_eq!(MonthFilter::parse("2025-13"), None);
        assert_eq!(MonthFilter::parse("2025-1"), None);
        assert_eq!(MonthFilter::parse("october"), None);
    }

    #[test]
    fn invalid_input_falls_back_to_current_month() {
        let current = MonthFilter::Month(YearMonth::current());
        assert_eq!(MonthFilter::from_input(None), current);
        assert_eq!(MonthFilter::from_input(Some("garbage")), current);
    }

    #[test]
    fn goal_month_rejects_lifetime() {
        assert!(matches!(
            goal_month(Some("lifetime")),
            Err(AppError::InvalidMonth(_))
        ));
        assert!(goal_month(Some("2025-02")).is_ok());
        assert_eq!(goal_month(Some("")).unwrap(), YearMonth::current());
        assert!(goal_month(Some("2025/02")).is_err());
    }

    #[test]
    fn like_pattern_and_label() {
        let ym = YearMonth::new(2025, 3).unwrap();
        assert_eq!(ym.like_pattern(), "2025-03%");
        assert_eq!(ym.label(), "March 2025");
    }
}
