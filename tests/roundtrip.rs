//! A compact schedule and the equivalent explicit Day/Week/Year triple must resolve
//! identically for every (date, time, category) sample.
use epsched::date::Date;
use epsched::registry::ScheduleRegistry;
use epsched::time::{TimeOfDay, Timestep};
use epsched::week::DayCategory;
use float_cmp::assert_approx_eq;
use strum::IntoEnumIterator;

/// A two-period occupancy schedule in the explicit form
const EXPLICIT_IDF: &str = "
ScheduleTypeLimits, Fractional, 0, 1, Continuous;

Schedule:Day:Interval, school weekday, Fractional, No,
  Until: 08:00, 0.0,
  Until: 15:00, 1.0,
  Until: 18:00, 0.5,
  Until: 24:00, 0.0;

Schedule:Day:Interval, school weekend, Fractional, No,
  Until: 24:00, 0.0;

Schedule:Day:Interval, summer weekday, Fractional, No,
  Until: 09:00, 0.0,
  Until: 17:00, 0.5,
  Until: 24:00, 0.0;

Schedule:Week:Compact, school week,
  For: Weekdays, school weekday,
  For: AllOtherDays, school weekend;

Schedule:Week:Compact, summer week,
  For: Weekdays, summer weekday,
  For: AllOtherDays, school weekend;

Schedule:Year, occupancy, Fractional,
  school week, 1, 1, 6, 20,
  summer week, 6, 21, 8, 31,
  school week, 9, 1, 12, 31;
";

/// The same schedule as a single Schedule:Compact record
const COMPACT_IDF: &str = "
ScheduleTypeLimits, Fractional, 0, 1, Continuous;

Schedule:Compact, occupancy, Fractional,
  Through: 6/20,
  For: Weekdays,
  Until: 08:00, 0.0,
  Until: 15:00, 1.0,
  Until: 18:00, 0.5,
  Until: 24:00, 0.0,
  For: AllOtherDays,
  Until: 24:00, 0.0,
  Through: 8/31,
  For: Weekdays,
  Until: 09:00, 0.0,
  Until: 17:00, 0.5,
  Until: 24:00, 0.0,
  For: AllOtherDays,
  Until: 24:00, 0.0,
  Through: 12/31,
  For: Weekdays,
  Until: 08:00, 0.0,
  Until: 15:00, 1.0,
  Until: 18:00, 0.5,
  Until: 24:00, 0.0,
  For: AllOtherDays,
  Until: 24:00, 0.0;
";

#[test]
fn test_compact_explicit_equivalence() {
    let explicit = ScheduleRegistry::from_idf_str(EXPLICIT_IDF).unwrap();
    let compact = ScheduleRegistry::from_idf_str(COMPACT_IDF).unwrap();

    // Period boundaries and mid-period dates
    let dates = ["1/1", "3/15", "6/20", "6/21", "7/15", "8/31", "9/1", "11/5", "12/31"];
    // Breakpoint edges and mid-interval times
    let times = [
        (0, 0),
        (7, 59),
        (8, 0),
        (8, 1),
        (12, 30),
        (15, 0),
        (17, 0),
        (18, 0),
        (23, 59),
        (24, 0),
    ];

    for date in dates {
        let date = Date::from_month_day_str(date).unwrap();
        for (hour, minute) in times {
            let time = TimeOfDay::from_hm(hour, minute).unwrap();
            for category in DayCategory::iter() {
                let expected = explicit
                    .value_at("occupancy", date, time, category, Timestep::HOURLY)
                    .unwrap();
                let actual = compact
                    .value_at("occupancy", date, time, category, Timestep::HOURLY)
                    .unwrap();
                assert_approx_eq!(f64, actual, expected);
            }
        }
    }
}

/// The two forms also agree on whole-day profiles at a sub-hourly timestep
#[test]
fn test_compact_explicit_day_values() {
    let explicit = ScheduleRegistry::from_idf_str(EXPLICIT_IDF).unwrap();
    let compact = ScheduleRegistry::from_idf_str(COMPACT_IDF).unwrap();

    let date = Date::new(7, 15).unwrap();
    let timestep = Timestep::per_hour(4).unwrap();
    let expected = explicit
        .day_values("occupancy", date, DayCategory::Thursday, timestep)
        .unwrap();
    let actual = compact
        .day_values("occupancy", date, DayCategory::Thursday, timestep)
        .unwrap();

    assert_eq!(expected.len(), 96);
    for (actual, expected) in actual.iter().zip(&expected) {
        assert_approx_eq!(f64, *actual, *expected);
    }
}
