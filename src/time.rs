//! Code for working with times of day and timestep granularities.
//!
//! Schedule breakpoints use "until" times running from `00:00` to `24:00` inclusive, so a plain
//! hour/minute pair is not enough; [`TimeOfDay`] stores minutes into the day (0..=1440) and
//! parses the IDF `HH:MM` notation.
use anyhow::{Context, Result, bail, ensure};

/// Number of minutes in a full day
pub const MINUTES_PER_DAY: u16 = 1440;

/// A time of day between `00:00` and `24:00` inclusive, stored as minutes into the day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight at the start of the day
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// The end of the day (`24:00`)
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Create a time of day from minutes into the day
    pub fn from_minutes(minutes: u16) -> Result<Self> {
        ensure!(
            minutes <= MINUTES_PER_DAY,
            "Time of day must not exceed 24:00, got {} minutes",
            minutes
        );
        Ok(Self(minutes))
    }

    /// Create a time of day from an hour and minute pair
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        ensure!(minute < 60, "Minute must be below 60, got {minute}");
        Self::from_minutes(hour * 60 + minute)
    }

    /// Parse the IDF `HH:MM` notation (e.g. "8:30", "24:00").
    pub fn from_time_str(s: &str) -> Result<Self> {
        let parse = || -> Option<Self> {
            let (hour, minute) = s.trim().split_once(':')?;
            let hour = hour.trim().parse().ok()?;
            let minute = minute.trim().parse().ok()?;
            Self::from_hm(hour, minute).ok()
        };
        parse().with_context(|| format!("Invalid time of day: '{s}'"))
    }

    /// Minutes into the day
    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// Snap this time *up* to the next multiple of the timestep.
    ///
    /// Interpolated lookups never report a value for a finer instant than the simulation
    /// timestep; a time inside a step resolves to the value reached at the step's end.
    pub fn snap_up(&self, timestep: Timestep) -> TimeOfDay {
        let step = timestep.minutes();
        TimeOfDay(self.0.div_ceil(step) * step)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// The per-hour timestep granularities EnergyPlus accepts
const VALID_STEPS_PER_HOUR: [u16; 12] = [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60];

/// A simulation timestep granularity, as a number of steps per hour.
///
/// Lookups with interpolation are snapped to this granularity; a lookup never returns a value
/// for a timestamp finer than one step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timestep(u16);

impl Timestep {
    /// One value per hour
    pub const HOURLY: Timestep = Timestep(1);

    /// Create a timestep from a number of steps per hour.
    ///
    /// The count must be one of the values EnergyPlus accepts (1, 2, 3, 4, 5, 6, 10, 12, 15,
    /// 20, 30 or 60).
    pub fn per_hour(steps: u16) -> Result<Self> {
        ensure!(
            VALID_STEPS_PER_HOUR.contains(&steps),
            "Invalid timestep: {} steps per hour. Must be one of {:?}",
            steps,
            VALID_STEPS_PER_HOUR
        );
        Ok(Self(steps))
    }

    /// Create a timestep from the length of one step in minutes
    pub fn from_minutes_per_step(minutes: u16) -> Result<Self> {
        if minutes == 0 || 60 % minutes != 0 {
            bail!("Minutes per timestep must divide 60, got {minutes}");
        }
        Self::per_hour(60 / minutes)
    }

    /// Number of steps per hour
    pub fn steps_per_hour(&self) -> u16 {
        self.0
    }

    /// Length of one step in minutes
    pub fn minutes(&self) -> u16 {
        60 / self.0
    }

    /// Number of steps in a full day
    pub fn steps_per_day(&self) -> usize {
        usize::from(self.0) * 24
    }
}

impl Default for Timestep {
    fn default() -> Self {
        Self::HOURLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0:00", 0)]
    #[case("8:30", 510)]
    #[case("08:30", 510)]
    #[case(" 17:00 ", 1020)]
    #[case("24:00", 1440)]
    fn test_time_from_str_valid(#[case] input: &str, #[case] minutes: u16) {
        assert_eq!(TimeOfDay::from_time_str(input).unwrap().minutes(), minutes);
    }

    #[rstest]
    #[case("24:01")]
    #[case("25:00")]
    #[case("12:60")]
    #[case("12")]
    #[case("noon")]
    fn test_time_from_str_invalid(#[case] input: &str) {
        assert!(TimeOfDay::from_time_str(input).is_err());
    }

    #[test]
    fn test_time_display() {
        assert_eq!(TimeOfDay::from_hm(8, 5).unwrap().to_string(), "08:05");
        assert_eq!(TimeOfDay::END_OF_DAY.to_string(), "24:00");
    }

    #[rstest]
    #[case(1, 750, 780)] // 12:30 hourly -> 13:00
    #[case(4, 750, 750)] // 12:30 already on a 15-minute boundary
    #[case(4, 751, 765)] // 12:31 -> 12:45
    #[case(1, 0, 0)]
    #[case(1, 1440, 1440)]
    fn test_snap_up(#[case] steps: u16, #[case] minutes: u16, #[case] expected: u16) {
        let timestep = Timestep::per_hour(steps).unwrap();
        let time = TimeOfDay::from_minutes(minutes).unwrap();
        assert_eq!(time.snap_up(timestep).minutes(), expected);
    }

    #[test]
    fn test_timestep_valid() {
        assert_eq!(Timestep::per_hour(6).unwrap().minutes(), 10);
        assert_eq!(Timestep::from_minutes_per_step(15).unwrap(), Timestep(4));
        assert_eq!(Timestep::HOURLY.steps_per_day(), 24);
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(61)]
    fn test_timestep_invalid(#[case] steps: u16) {
        assert!(Timestep::per_hour(steps).is_err());
    }

    #[test]
    fn test_timestep_invalid_minutes() {
        assert!(Timestep::from_minutes_per_step(0).is_err());
        assert!(Timestep::from_minutes_per_step(7).is_err());
    }
}
