//! Code for working with calendar dates within a schedule year.
//!
//! Schedule periods are leap-day-agnostic: every year is treated as 365 days and February has
//! 28. Dates order naturally by (month, day), which is all period containment needs.
use anyhow::{Context, Result, ensure};

/// Days in each month of the (non-leap) schedule year
const DAYS_PER_MONTH: [u16; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Number of days in the schedule year
pub const DAYS_PER_YEAR: u16 = 365;

/// A month/day date within the schedule year (leap-day-agnostic).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Month of year (1-12)
    month: u8,
    /// Day of month (1-31, validated against the month)
    day: u8,
}

impl Date {
    /// January 1st, the start of every schedule year
    pub const JAN_1: Date = Date { month: 1, day: 1 };

    /// December 31st, the end of every schedule year
    pub const DEC_31: Date = Date { month: 12, day: 31 };

    /// Create a date from a month and day of month
    pub fn new(month: u8, day: u8) -> Result<Self> {
        ensure!((1..=12).contains(&month), "Invalid month: {month}");
        let days_in_month = DAYS_PER_MONTH[usize::from(month) - 1];
        ensure!(
            day >= 1 && u16::from(day) <= days_in_month,
            "Invalid day of month: {month}/{day}"
        );
        Ok(Self { month, day })
    }

    /// Parse the IDF `M/D` notation (e.g. "4/30", "12/31").
    pub fn from_month_day_str(s: &str) -> Result<Self> {
        let parse = || -> Option<Self> {
            let (month, day) = s.trim().split_once('/')?;
            Self::new(month.trim().parse().ok()?, day.trim().parse().ok()?).ok()
        };
        parse().with_context(|| format!("Invalid date: '{s}'"))
    }

    /// Create a date from a day of year (1-365)
    pub fn from_day_of_year(doy: u16) -> Result<Self> {
        ensure!(
            doy >= 1 && doy <= DAYS_PER_YEAR,
            "Invalid day of year: {doy}"
        );
        let mut remaining = doy;
        for (i, &days) in DAYS_PER_MONTH.iter().enumerate() {
            if remaining <= days {
                return Date::new(i as u8 + 1, remaining as u8);
            }
            remaining -= days;
        }
        unreachable!("day of year {doy} not mapped to a month");
    }

    /// The day of year (1-365) for this date
    pub fn day_of_year(&self) -> u16 {
        let preceding: u16 = DAYS_PER_MONTH[..usize::from(self.month) - 1].iter().sum();
        preceding + u16::from(self.day)
    }

    /// The following date, or `None` past December 31st
    pub fn succ(&self) -> Option<Date> {
        let doy = self.day_of_year();
        (doy < DAYS_PER_YEAR).then(|| Date::from_day_of_year(doy + 1).unwrap())
    }

    /// Month of year (1-12)
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of month
    pub fn day(&self) -> u8 {
        self.day
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1/1", 1)]
    #[case("2/28", 59)]
    #[case("3/1", 60)]
    #[case("7/4", 185)]
    #[case("12/31", 365)]
    fn test_day_of_year(#[case] input: &str, #[case] doy: u16) {
        let date = Date::from_month_day_str(input).unwrap();
        assert_eq!(date.day_of_year(), doy);
        assert_eq!(Date::from_day_of_year(doy).unwrap(), date);
    }

    #[rstest]
    #[case("2/29")] // leap-day-agnostic
    #[case("0/1")]
    #[case("13/1")]
    #[case("4/31")]
    #[case("12-31")]
    fn test_from_str_invalid(#[case] input: &str) {
        assert!(Date::from_month_day_str(input).is_err());
    }

    #[test]
    fn test_succ() {
        let date = Date::new(4, 2).unwrap();
        assert_eq!(date.succ(), Some(Date::new(4, 3).unwrap()));
        let date = Date::new(1, 31).unwrap();
        assert_eq!(date.succ(), Some(Date::new(2, 1).unwrap()));
        assert_eq!(Date::DEC_31.succ(), None);
    }

    #[test]
    fn test_ordering() {
        assert!(Date::JAN_1 < Date::new(1, 2).unwrap());
        assert!(Date::new(2, 28).unwrap() < Date::new(3, 1).unwrap());
        assert!(Date::new(11, 30).unwrap() < Date::DEC_31);
    }
}
