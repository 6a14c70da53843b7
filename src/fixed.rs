//! Code for working with file-backed fixed-interval schedules.
//!
//! A `Schedule:File` is read once at load time into a flat series of values, one per timestep
//! of the year. There is no week structure: a wall-clock lookup maps straight to a series
//! index by floor division on the minutes-per-item granularity.
use crate::date::Date;
use crate::error::ScheduleError;
use crate::time::{MINUTES_PER_DAY, TimeOfDay};
use crate::type_limits::ScheduleTypeLimits;
use crate::year::ScheduleID;
use anyhow::Result;
use std::rc::Rc;

/// A flat, non-week-structured schedule backed by an external column file.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedIntervalSchedule {
    /// Unique identifier for the schedule
    pub id: ScheduleID,
    /// Limits which the schedule's values must respect, if any
    pub type_limits: Option<Rc<ScheduleTypeLimits>>,
    /// Length of one data item in minutes (60 for hourly data)
    minutes_per_item: u16,
    /// Whether lookups between samples interpolate linearly
    pub interpolate: bool,
    /// The series, indexed by timestep-of-year
    values: Vec<f64>,
}

impl FixedIntervalSchedule {
    /// Create a fixed-interval schedule over an already-read series.
    ///
    /// `minutes_per_item` must divide an hour evenly and the series must hold a whole number
    /// of days.
    pub fn new(
        id: ScheduleID,
        type_limits: Option<Rc<ScheduleTypeLimits>>,
        minutes_per_item: u16,
        interpolate: bool,
        values: Vec<f64>,
    ) -> Result<Self> {
        let invalid = |reason: String| ScheduleError::InvalidScheduleDefinition {
            id: id.to_string(),
            reason,
        };

        if minutes_per_item == 0 || 60 % minutes_per_item != 0 {
            return Err(invalid(format!(
                "minutes per item must divide 60, got {minutes_per_item}"
            ))
            .into());
        }
        let items_per_day = usize::from(MINUTES_PER_DAY / minutes_per_item);
        if values.is_empty() || values.len() % items_per_day != 0 {
            return Err(invalid(format!(
                "series length {} is not a whole number of {}-item days",
                values.len(),
                items_per_day
            ))
            .into());
        }

        Ok(Self {
            id,
            type_limits,
            minutes_per_item,
            interpolate,
            values,
        })
    }

    /// Length of one data item in minutes
    pub fn minutes_per_item(&self) -> u16 {
        self.minutes_per_item
    }

    /// Number of data points in the series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series is empty (never true for a validated schedule)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the raw series values
    pub fn values(&self) -> impl Iterator<Item = f64> {
        self.values.iter().copied()
    }

    /// The value at a timestep-of-year index.
    ///
    /// A direct array access; an index past the end of the series fails with
    /// [`ScheduleError::TimestepOutOfRange`].
    pub fn value_at_index(&self, index: usize) -> Result<f64, ScheduleError> {
        self.values
            .get(index)
            .copied()
            .ok_or(ScheduleError::TimestepOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// The value at a wall-clock date and time of day.
    ///
    /// The timestamp maps to an index by floor division on the item granularity. With
    /// interpolation enabled, a timestamp between two samples ramps linearly between them
    /// (the final sample holds to the end of the year). A timestamp past the end of the
    /// series fails with [`ScheduleError::TimestepOutOfRange`].
    pub fn value_at(&self, date: Date, time: TimeOfDay) -> Result<f64, ScheduleError> {
        let minutes_per_item = u32::from(self.minutes_per_item);
        let minute_of_year = (u32::from(date.day_of_year()) - 1) * u32::from(MINUTES_PER_DAY)
            + u32::from(time.minutes());

        let index = (minute_of_year / minutes_per_item) as usize;
        let offset = minute_of_year % minutes_per_item;

        // 24:00 on the final covered day is the inclusive end of the series
        if index == self.values.len() && offset == 0 {
            return self.value_at_index(index - 1);
        }

        let value = self.value_at_index(index)?;
        if !self.interpolate || offset == 0 {
            return Ok(value);
        }

        let next = match self.values.get(index + 1) {
            Some(next) => *next,
            None => return Ok(value), // final sample holds
        };
        let fraction = f64::from(offset) / f64::from(minutes_per_item);
        Ok(value + (next - value) * fraction)
    }
}
