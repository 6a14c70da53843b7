//! Code for reading `Schedule:Compact` objects.
//!
//! A compact schedule linearizes a whole year/week/day structure into one record: a
//! `Through:` field declares a period's end date, the `For:` fields after it open day-type
//! group runs and each `Until:` field (followed by a value field) appends a breakpoint to the
//! run's day profile. A period closes when the next `Through:` (or the end of the record)
//! arrives. The parser normalizes all of this into the same periods an explicit
//! `Schedule:Year` produces, so both forms resolve identically.
use super::{RawObject, parse_interpolate, parse_numeric};
use crate::date::Date;
use crate::day::DaySchedule;
use crate::error::ScheduleError;
use crate::time::TimeOfDay;
use crate::week::{DayTypeGroup, WeekSchedule, parse_day_type_list};
use crate::year::{ScheduleID, YearPeriod};
use anyhow::{Context, Result, ensure};
use std::rc::Rc;
use unicase::UniCase;

/// A compact schedule record, already normalized to year periods.
///
/// Only the type-limits reference remains unresolved: the day and week schedules a compact
/// record describes are anonymous and owned by its periods rather than registered by name.
#[derive(Clone, Debug, PartialEq)]
pub struct RawCompactSchedule {
    /// The schedule's name
    pub id: ScheduleID,
    /// Name of the referenced `ScheduleTypeLimits`, if any
    pub type_limits: Option<String>,
    /// Normalized periods in declaration order
    pub periods: Vec<YearPeriod>,
}

/// One `For:` run being accumulated: the selected groups and the day profile built so far
struct GroupRun {
    groups: Vec<DayTypeGroup>,
    interpolate: bool,
    breakpoints: Vec<(TimeOfDay, f64)>,
    pending_until: Option<TimeOfDay>,
}

/// Decode a `Schedule:Compact` record.
///
/// The period cursor starts at January 1st; each period runs from the day after the previous
/// `Through:` date up to its own, and the final `Through:` must land on December 31st or the
/// record fails with [`ScheduleError::IncompleteYearCoverage`].
pub fn read_compact(object: &RawObject) -> Result<RawCompactSchedule> {
    let name = object.name()?;

    let mut periods: Vec<YearPeriod> = Vec::new();
    // Start of the open period, and its end date from the most recent Through:
    let mut start = Date::JAN_1;
    let mut open_end: Option<Date> = None;
    let mut runs: Vec<GroupRun> = Vec::new();

    let close_period =
        |start: Date, end: Date, runs: Vec<GroupRun>, index: usize| -> Result<YearPeriod> {
            let week = close_week(name, index, runs)?;
            Ok(YearPeriod { week, start, end })
        };

    for field in object.fields_from(2) {
        if let Some(date) = keyword_value(field, "Through") {
            if let Some(end) = open_end {
                periods.push(close_period(start, end, std::mem::take(&mut runs), periods.len() + 1)?);
                start = end.succ().with_context(|| {
                    format!("'{name}': Through: field after Through: 12/31")
                })?;
            }
            let end = Date::from_month_day_str(date).with_context(|| format!("'{name}'"))?;
            ensure!(
                start <= end,
                "'{name}': Through: {end} does not advance past {}",
                start
            );
            open_end = Some(end);
        } else {
            ensure!(
                open_end.is_some(),
                "'{name}': field '{field}' before the first Through: field"
            );
            if let Some(day_types) = keyword_value(field, "For") {
                runs.push(GroupRun {
                    groups: parse_day_type_list(day_types)
                        .with_context(|| format!("'{name}'"))?,
                    interpolate: false,
                    breakpoints: Vec::new(),
                    pending_until: None,
                });
            } else if let Some(option) = keyword_value(field, "Interpolate") {
                current_run(&mut runs, name, field)?.interpolate =
                    parse_interpolate(Some(option), name)?;
            } else if let Some(time) = keyword_value(field, "Until") {
                let run = current_run(&mut runs, name, field)?;
                ensure!(
                    run.pending_until.is_none(),
                    "'{name}': Until: {time} follows an Until: with no value"
                );
                run.pending_until =
                    Some(TimeOfDay::from_time_str(time).with_context(|| format!("'{name}'"))?);
            } else {
                let value = parse_numeric(field, name, "schedule value")?;
                let run = current_run(&mut runs, name, field)?;
                let until = run.pending_until.take().with_context(|| {
                    format!("'{name}': value {value} not preceded by an Until: field")
                })?;
                run.breakpoints.push((until, value));
            }
        }
    }

    // Close the final period and require it to reach the end of the year
    let end = open_end.ok_or_else(|| ScheduleError::IncompleteYearCoverage {
        id: name.to_string(),
        date: Date::JAN_1,
    })?;
    periods.push(close_period(start, end, runs, periods.len() + 1)?);
    if let Some(uncovered) = end.succ() {
        return Err(ScheduleError::IncompleteYearCoverage {
            id: name.to_string(),
            date: uncovered,
        }
        .into());
    }

    Ok(RawCompactSchedule {
        id: name.into(),
        type_limits: object.optional_field(1).map(String::from),
        periods,
    })
}

/// Build the week schedule for one closed `Through:` period from its accumulated runs
fn close_week(name: &str, week_index: usize, runs: Vec<GroupRun>) -> Result<Rc<WeekSchedule>> {
    ensure!(
        !runs.is_empty(),
        "'{name}': Through: period with no For: runs"
    );

    let entries = runs
        .into_iter()
        .enumerate()
        .map(|(i, run)| {
            ensure!(
                run.pending_until.is_none(),
                "'{name}': Until: field with no value before the period closed"
            );
            let day_id = format!("{name} Wk {week_index} Day {}", i + 1);
            let day = DaySchedule::new(day_id.into(), None, run.interpolate, run.breakpoints)?;
            Ok((run.groups, Rc::new(day)))
        })
        .collect::<Result<Vec<_>>>()?;

    let week = WeekSchedule::expand(format!("{name} Wk {week_index}").into(), &entries)?;
    Ok(Rc::new(week))
}

/// The run the current field belongs to, failing if no `For:` has opened one
fn current_run<'a>(
    runs: &'a mut [GroupRun],
    name: &str,
    field: &str,
) -> Result<&'a mut GroupRun> {
    runs.last_mut()
        .with_context(|| format!("'{name}': field '{field}' before any For: field"))
}

/// Split a `Keyword: value` field, matching the keyword case-insensitively
fn keyword_value<'a>(field: &'a str, keyword: &str) -> Option<&'a str> {
    let (head, rest) = field.split_once(':')?;
    (UniCase::new(head.trim()) == UniCase::new(keyword)).then(|| rest.trim())
}
