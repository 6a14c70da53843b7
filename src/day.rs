//! Code for working with day schedules.
//!
//! A day schedule is a 24-hour value profile keyed by "until" breakpoints: each breakpoint's
//! value holds from the previous breakpoint (exclusive) up to and including the breakpoint's
//! own time. The final breakpoint must land exactly on 24:00 so the profile is total over the
//! day.
use crate::error::ScheduleError;
use crate::id::define_id_type;
use crate::time::{TimeOfDay, Timestep};
use crate::type_limits::ScheduleTypeLimits;
use anyhow::Result;
use itertools::Itertools;
use std::rc::Rc;

define_id_type! {DayScheduleID}

/// A 24-hour value profile keyed by time-of-day breakpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct DaySchedule {
    /// Unique identifier for the day schedule
    pub id: DayScheduleID,
    /// Limits which the schedule's values must respect, if any
    pub type_limits: Option<Rc<ScheduleTypeLimits>>,
    /// Whether values between breakpoints are linearly interpolated to the simulation timestep
    pub interpolate: bool,
    /// Breakpoints as (until-time, value) pairs, strictly increasing and ending at 24:00
    breakpoints: Vec<(TimeOfDay, f64)>,
}

impl DaySchedule {
    /// Create a day schedule, validating its breakpoint structure.
    ///
    /// Breakpoint times must be strictly increasing and the final breakpoint must be exactly
    /// 24:00; anything else is an [`ScheduleError::InvalidScheduleDefinition`].
    pub fn new(
        id: DayScheduleID,
        type_limits: Option<Rc<ScheduleTypeLimits>>,
        interpolate: bool,
        breakpoints: Vec<(TimeOfDay, f64)>,
    ) -> Result<Self> {
        let invalid = |reason: &str| ScheduleError::InvalidScheduleDefinition {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        if breakpoints.is_empty() {
            return Err(invalid("no breakpoints").into());
        }
        if !breakpoints.iter().tuple_windows().all(|(a, b)| a.0 < b.0) {
            return Err(invalid("breakpoint times must be strictly increasing").into());
        }
        // Checked non-empty above
        if breakpoints.last().unwrap().0 != TimeOfDay::END_OF_DAY {
            return Err(invalid("final breakpoint must be 24:00").into());
        }

        Ok(Self {
            id,
            type_limits,
            interpolate,
            breakpoints,
        })
    }

    /// Build a day schedule from a sequence of uniformly spaced values.
    ///
    /// Value `k` covers the `k`-th step of the day at the given timestep. Runs of equal values
    /// collapse into a single breakpoint unless `keep_repeated` is set (which interpolating
    /// schedules want, so ramps stay anchored to their original sample points).
    pub fn from_values_at_timestep(
        id: DayScheduleID,
        type_limits: Option<Rc<ScheduleTypeLimits>>,
        interpolate: bool,
        timestep: Timestep,
        values: &[f64],
    ) -> Result<Self> {
        let expected = timestep.steps_per_day();
        if values.len() != expected {
            return Err(ScheduleError::InvalidScheduleDefinition {
                id: id.to_string(),
                reason: format!("expected {} values, got {}", expected, values.len()),
            }
            .into());
        }

        let keep_repeated = interpolate;
        let step = timestep.minutes();
        let mut breakpoints: Vec<(TimeOfDay, f64)> = Vec::new();
        for (i, &value) in values.iter().enumerate() {
            let until = TimeOfDay::from_minutes((i as u16 + 1) * step)?;
            match breakpoints.last_mut() {
                Some(last) if !keep_repeated && last.1 == value => last.0 = until,
                _ => breakpoints.push((until, value)),
            }
        }

        Self::new(id, type_limits, interpolate, breakpoints)
    }

    /// The schedule's breakpoints as (until-time, value) pairs
    pub fn breakpoints(&self) -> &[(TimeOfDay, f64)] {
        &self.breakpoints
    }

    /// Iterate over the schedule's values (without their times)
    pub fn values(&self) -> impl Iterator<Item = f64> {
        self.breakpoints.iter().map(|(_, value)| *value)
    }

    /// Whether the schedule holds a single value for the whole day
    pub fn is_constant(&self) -> bool {
        self.breakpoints.len() == 1
    }

    /// The value of the schedule at a time of day.
    ///
    /// Without interpolation this is a step function: the value of the first breakpoint whose
    /// time is at or after `time`. With interpolation, `time` snaps up to the timestep grid and
    /// the value ramps linearly from the previous breakpoint to the matched one. A query at
    /// exactly 24:00 returns the final breakpoint's value either way.
    pub fn value_at(&self, time: TimeOfDay, timestep: Timestep) -> f64 {
        if self.interpolate {
            self.interpolated_value(time.snap_up(timestep))
        } else {
            self.breakpoints[self.first_at_or_after(time)].1
        }
    }

    /// One value per timestep over the whole day.
    ///
    /// Entry `k` is the value reached at the end of step `k`, the convention under which an
    /// occupancy schedule running "until 17:00" still shows 17:00 itself as occupied.
    pub fn values_at_timestep(&self, timestep: Timestep) -> Vec<f64> {
        let step = timestep.minutes();
        (1..=timestep.steps_per_day() as u16)
            .map(|k| {
                // Step ends lie on the grid, so no snapping occurs for interpolated lookups
                let time = TimeOfDay::from_minutes(k * step).unwrap();
                self.value_at(time, timestep)
            })
            .collect()
    }

    /// Index of the first breakpoint whose time is >= `time`.
    ///
    /// Total coverage of the day means this always exists.
    fn first_at_or_after(&self, time: TimeOfDay) -> usize {
        let idx = self.breakpoints.partition_point(|(t, _)| *t < time);
        debug_assert!(idx < self.breakpoints.len());
        idx.min(self.breakpoints.len() - 1)
    }

    /// Linear interpolation against the breakpoint bracketing `time` from above.
    ///
    /// The stretch up to the first breakpoint has no predecessor to ramp from and holds
    /// constant, as EnergyPlus does.
    fn interpolated_value(&self, time: TimeOfDay) -> f64 {
        let idx = self.first_at_or_after(time);
        if idx == 0 {
            return self.breakpoints[0].1;
        }

        let (t_prev, v_prev) = self.breakpoints[idx - 1];
        let (t_next, v_next) = self.breakpoints[idx];
        let span = f64::from(t_next.minutes() - t_prev.minutes());
        let elapsed = f64::from(time.minutes() - t_prev.minutes());
        v_prev + (v_next - v_prev) * (elapsed / span)
    }
}

/// A day schedule holding one value for the entire day.
pub fn constant_day(id: DayScheduleID, value: f64) -> DaySchedule {
    // A single breakpoint at 24:00 always validates
    DaySchedule::new(id, None, false, vec![(TimeOfDay::END_OF_DAY, value)]).unwrap()
}
