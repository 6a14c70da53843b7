//! Fixtures for tests

use crate::date::Date;
use crate::day::{DaySchedule, constant_day};
use crate::time::TimeOfDay;
use crate::week::{DayTypeGroup, WeekSchedule};
use crate::year::{YearPeriod, YearSchedule};
use rstest::fixture;
use std::rc::Rc;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A complete IDF document with the office occupancy and cooling availability schedules
pub const OFFICE_IDF: &str = "
ScheduleTypeLimits,
  Fractional,                             !- Name
  0,                                      !- Lower Limit Value
  1,                                      !- Upper Limit Value
  Continuous;                             !- Numeric Type

ScheduleTypeLimits,
  On/Off,                                 !- Name
  0,                                      !- Lower Limit Value
  1,                                      !- Upper Limit Value
  Discrete,                               !- Numeric Type
  Availability;                           !- Unit Type

Schedule:Day:Interval,
  Medium Office Bldg Occ Default Schedule, !- Name
  Fractional,                             !- Schedule Type Limits Name
  No,                                     !- Interpolate to Timestep
  Until: 06:00, 0.0,
  Until: 07:00, 0.1,
  Until: 08:00, 0.2,
  Until: 12:00, 0.9,
  Until: 13:00, 0.95,
  Until: 17:00, 0.7,
  Until: 18:00, 0.4,
  Until: 22:00, 0.1,
  Until: 24:00, 0.05;

Schedule:Day:Interval,
  Medium Office Bldg Occ Saturday Schedule, !- Name
  Fractional,                             !- Schedule Type Limits Name
  No,                                     !- Interpolate to Timestep
  Until: 08:00, 0.0,
  Until: 14:00, 0.1,
  Until: 17:00, 0.5,
  Until: 24:00, 0.0;

Schedule:Day:Interval,
  Medium Office Bldg Occ Sunday Schedule, !- Name
  Fractional,                             !- Schedule Type Limits Name
  No,                                     !- Interpolate to Timestep
  Until: 24:00, 0.0;

Schedule:Day:Interval,
  Medium Office Bldg Occ Summer Design Day, !- Name
  Fractional, No,
  Until: 06:00, 0.0,
  Until: 22:00, 1.0,
  Until: 24:00, 0.05;

Schedule:Day:Interval,
  Medium Office Bldg Occ Winter Design Day, !- Name
  Fractional, No,
  Until: 24:00, 0.0;

Schedule:Week:Daily,
  Medium Office Bldg Occ Week,            !- Name
  Medium Office Bldg Occ Sunday Schedule, !- Sunday
  Medium Office Bldg Occ Default Schedule, !- Monday
  Medium Office Bldg Occ Default Schedule, !- Tuesday
  Medium Office Bldg Occ Default Schedule, !- Wednesday
  Medium Office Bldg Occ Default Schedule, !- Thursday
  Medium Office Bldg Occ Default Schedule, !- Friday
  Medium Office Bldg Occ Saturday Schedule, !- Saturday
  Medium Office Bldg Occ Sunday Schedule, !- Holiday
  Medium Office Bldg Occ Summer Design Day, !- SummerDesignDay
  Medium Office Bldg Occ Winter Design Day, !- WinterDesignDay
  Medium Office Bldg Occ Default Schedule, !- CustomDay1
  Medium Office Bldg Occ Default Schedule; !- CustomDay2

Schedule:Year,
  Medium Office Bldg Occ,                 !- Name
  Fractional,                             !- Schedule Type Limits Name
  Medium Office Bldg Occ Week, 1, 1, 12, 31;

Schedule:Day:Interval,
  off,                                    !- Name
  On/Off, No,
  Until: 24:00, 0;

Schedule:Day:Interval,
  on,                                     !- Name
  On/Off, No,
  Until: 24:00, 1;

Schedule:Week:Daily,
  cooling_avail_wk_off,                   !- Name
  off, off, off, off, off, off, off, off, off, off, off, off;

Schedule:Week:Compact,
  cooling_avail_wk_on,                    !- Name
  For: AllDays,                           !- DayType List 1
  on;                                     !- Schedule:Day Name 1

Schedule:Year,
  cooling_avail,                          !- Name
  On/Off,                                 !- Schedule Type Limits Name
  cooling_avail_wk_off, 1, 1, 4, 2,
  cooling_avail_wk_on, 4, 3, 12, 31;
";

/// The office occupancy weekday profile as a directly-constructed day schedule
#[fixture]
pub fn office_weekday() -> DaySchedule {
    let time = |h| TimeOfDay::from_hm(h, 0).unwrap();
    DaySchedule::new(
        "Medium Office Bldg Occ Default Schedule".into(),
        None,
        false,
        vec![
            (time(6), 0.0),
            (time(7), 0.1),
            (time(8), 0.2),
            (time(12), 0.9),
            (time(13), 0.95),
            (time(17), 0.7),
            (time(18), 0.4),
            (time(22), 0.1),
            (time(24), 0.05),
        ],
    )
    .unwrap()
}

/// The office occupancy Saturday profile
#[fixture]
pub fn saturday_schedule() -> DaySchedule {
    let time = |h| TimeOfDay::from_hm(h, 0).unwrap();
    DaySchedule::new(
        "Medium Office Bldg Occ Saturday Schedule".into(),
        None,
        false,
        vec![
            (time(8), 0.0),
            (time(14), 0.1),
            (time(17), 0.5),
            (time(24), 0.0),
        ],
    )
    .unwrap()
}

/// The split-year cooling availability schedule: off through April 2nd, on afterwards
#[fixture]
pub fn cooling_availability() -> YearSchedule {
    let week = |name: &str, value: f64| {
        let day = Rc::new(constant_day(format!("{name} day").into(), value));
        Rc::new(WeekSchedule::expand(name.into(), &[(vec![DayTypeGroup::AllDays], day)]).unwrap())
    };

    YearSchedule {
        id: "cooling_avail".into(),
        type_limits: None,
        periods: vec![
            YearPeriod {
                week: week("off week", 0.0),
                start: Date::JAN_1,
                end: Date::new(4, 2).unwrap(),
            },
            YearPeriod {
                week: week("on week", 1.0),
                start: Date::new(4, 3).unwrap(),
                end: Date::DEC_31,
            },
        ],
    }
}
