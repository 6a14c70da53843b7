//! Code for working with year schedules.
//!
//! A year schedule binds an ordered sequence of date-range periods to week schedules. Periods
//! are consulted in declaration order, so a date falling inside several declared ranges
//! resolves to the first listed. Coverage of the whole year is validated when the registry is
//! built (unless the caller opts into lenient coverage, in which case an uncovered date
//! surfaces at query time instead).
use crate::date::{DAYS_PER_YEAR, Date};
use crate::error::ScheduleError;
use crate::id::define_id_type;
use crate::time::{TimeOfDay, Timestep};
use crate::type_limits::ScheduleTypeLimits;
use crate::week::{DayCategory, WeekSchedule};
use anyhow::Result;
use std::rc::Rc;

define_id_type! {ScheduleID}

/// One date-range period of a year schedule, bound to a week schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct YearPeriod {
    /// The week schedule in effect during the period
    pub week: Rc<WeekSchedule>,
    /// First date of the period (inclusive)
    pub start: Date,
    /// Last date of the period (inclusive)
    pub end: Date,
}

impl YearPeriod {
    /// Whether the period's inclusive date range contains `date`
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// An ordered set of date-range periods, each bound to a week schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct YearSchedule {
    /// Unique identifier for the schedule
    pub id: ScheduleID,
    /// Limits which the schedule's values must respect, if any
    pub type_limits: Option<Rc<ScheduleTypeLimits>>,
    /// Periods in declaration order
    pub periods: Vec<YearPeriod>,
}

impl YearSchedule {
    /// Check that the periods jointly cover January 1st through December 31st.
    ///
    /// Overlaps are fine (first listed wins); a gap fails with
    /// [`ScheduleError::IncompleteYearCoverage`] naming the first uncovered date.
    pub fn validate_coverage(&self) -> Result<()> {
        let mut covered = [false; DAYS_PER_YEAR as usize];
        for period in &self.periods {
            let start = period.start.day_of_year();
            let end = period.end.day_of_year();
            for day in &mut covered[usize::from(start) - 1..usize::from(end)] {
                *day = true;
            }
        }

        if let Some(gap) = covered.iter().position(|covered| !covered) {
            // Position is within 1..=365 by construction
            let date = Date::from_day_of_year(gap as u16 + 1).unwrap();
            return Err(ScheduleError::IncompleteYearCoverage {
                id: self.id.to_string(),
                date,
            }
            .into());
        }

        Ok(())
    }

    /// The first declared period containing `date`, if any
    pub fn period_for(&self, date: Date) -> Option<&YearPeriod> {
        self.periods.iter().find(|period| period.contains(date))
    }

    /// The value of the schedule on a date, at a time of day, for a day category.
    ///
    /// The category comes from the caller: deriving it from the calendar (including holidays
    /// and design-day designations) is the run period's business, not the schedule's.
    pub fn value_at(
        &self,
        date: Date,
        time: TimeOfDay,
        category: DayCategory,
        timestep: Timestep,
    ) -> Result<f64> {
        let period = self
            .period_for(date)
            .ok_or_else(|| ScheduleError::DateNotCovered {
                id: self.id.to_string(),
                date,
            })?;

        Ok(period.week.day_schedule(category).value_at(time, timestep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, cooling_availability};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn value_on(schedule: &YearSchedule, date: &str, category: DayCategory) -> f64 {
        schedule
            .value_at(
                Date::from_month_day_str(date).unwrap(),
                TimeOfDay::from_hm(12, 0).unwrap(),
                category,
                Timestep::HOURLY,
            )
            .unwrap()
    }

    #[rstest]
    fn test_split_year_resolution(cooling_availability: YearSchedule) {
        // Jan 1 - Apr 2 maps every day to "off"
        assert_approx_eq!(
            f64,
            value_on(&cooling_availability, "2/1", DayCategory::Tuesday),
            0.0
        );
        assert_approx_eq!(
            f64,
            value_on(&cooling_availability, "4/2", DayCategory::Tuesday),
            0.0
        );
        // Apr 3 - Dec 31 maps every day to "on"
        assert_approx_eq!(
            f64,
            value_on(&cooling_availability, "4/3", DayCategory::Tuesday),
            1.0
        );
        assert_approx_eq!(
            f64,
            value_on(&cooling_availability, "4/10", DayCategory::Tuesday),
            1.0
        );
    }

    #[rstest]
    fn test_first_listed_period_wins(cooling_availability: YearSchedule) {
        // Rebind the second period so it overlaps the first from Mar 1
        let mut schedule = cooling_availability;
        schedule.periods[1].start = Date::new(3, 1).unwrap();
        schedule.validate_coverage().unwrap();

        // Mar 15 is in both; the first declared period (off) wins
        assert_approx_eq!(f64, value_on(&schedule, "3/15", DayCategory::Monday), 0.0);
    }

    #[rstest]
    fn test_coverage_valid(cooling_availability: YearSchedule) {
        cooling_availability.validate_coverage().unwrap();
    }

    #[rstest]
    fn test_coverage_gap(cooling_availability: YearSchedule) {
        let mut schedule = cooling_availability;
        // Push the second period's start out, leaving Apr 3 - Apr 30 uncovered
        schedule.periods[1].start = Date::new(5, 1).unwrap();
        assert_error!(
            schedule.validate_coverage(),
            "Incomplete year coverage for schedule 'cooling_avail': no period covers 4/3"
        );
    }

    #[rstest]
    fn test_date_not_covered_at_lookup(cooling_availability: YearSchedule) {
        let mut schedule = cooling_availability;
        schedule.periods.remove(1);
        let result = schedule.value_at(
            Date::new(6, 1).unwrap(),
            TimeOfDay::MIDNIGHT,
            DayCategory::Friday,
            Timestep::HOURLY,
        );
        assert_error!(
            result,
            "Schedule 'cooling_avail' has no period covering 6/1"
        );
    }
}
