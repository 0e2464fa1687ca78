use chrono::{Datelike, NaiveDate};

use crate::domain::record::parse_date;
use crate::errors::Result;

/// Closed date interval `[start, end]`. A range whose start lies after its end is
/// valid and simply contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parses both bounds from `YYYY-MM-DD` text.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?))
    }

    /// Range covering every representable date.
    pub fn unbounded() -> Self {
        Self::new(NaiveDate::MIN, NaiveDate::MAX)
    }

    /// January 1st through December 31st of `year`.
    pub fn calendar_year(year: i32) -> Option<Self> {
        Some(Self::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    /// The calendar year containing `date`.
    pub fn year_of(date: NaiveDate) -> Self {
        Self::calendar_year(date.year()).unwrap_or_else(Self::unbounded)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 31));
        assert!(range.contains(day(2024, 1, 1)));
        assert!(range.contains(day(2024, 1, 31)));
        assert!(!range.contains(day(2023, 12, 31)));
        assert!(!range.contains(day(2024, 2, 1)));
    }

    #[test]
    fn reversed_range_is_empty_not_invalid() {
        let range = DateRange::parse("2024-02-01", "2024-01-01").expect("parses");
        assert!(range.is_empty());
        assert!(!range.contains(day(2024, 1, 15)));
    }

    #[test]
    fn parse_rejects_bad_bounds() {
        assert!(DateRange::parse("2024-01-01", "2024-02-30").is_err());
        assert!(DateRange::parse("01/01/2024", "2024-02-01").is_err());
    }

    #[test]
    fn calendar_year_spans_whole_year() {
        let range = DateRange::year_of(day(2024, 6, 9));
        assert_eq!(range.start, day(2024, 1, 1));
        assert_eq!(range.end, day(2024, 12, 31));
    }
}
