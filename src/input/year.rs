//! Code for reading `Schedule:Year` and `Schedule:Constant` objects.
use super::{RawObject, parse_numeric};
use crate::date::Date;
use crate::year::ScheduleID;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;

/// A year schedule record with its week schedule references still unresolved.
#[derive(Clone, Debug, PartialEq)]
pub struct RawYearSchedule {
    /// The schedule's name
    pub id: ScheduleID,
    /// Name of the referenced `ScheduleTypeLimits`, if any
    pub type_limits: Option<String>,
    /// (week schedule name, start date, end date) periods in declaration order
    pub periods: Vec<(String, Date, Date)>,
}

/// A `Schedule:Constant` record: one value for every hour of the year.
#[derive(Clone, Debug, PartialEq)]
pub struct RawConstantSchedule {
    /// The schedule's name
    pub id: ScheduleID,
    /// Name of the referenced `ScheduleTypeLimits`, if any
    pub type_limits: Option<String>,
    /// The constant value (empty field defaults to 0, as EnergyPlus does)
    pub value: f64,
}

/// Decode a `Schedule:Year` record.
///
/// Field order: name, type limits, then groups of five fields per period: week schedule name,
/// start month, start day, end month, end day.
pub fn read_year(object: &RawObject) -> Result<RawYearSchedule> {
    let name = object.name()?;
    let period_fields = object.fields_from(2);
    ensure!(
        !period_fields.is_empty() && period_fields.len() % 5 == 0,
        "'{name}': expected groups of 5 period fields (week, start month/day, end month/day)"
    );

    let date = |month: &str, day: &str, what: &str| -> Result<Date> {
        let parse = |field: &str, part| {
            field
                .trim()
                .parse()
                .with_context(|| format!("'{name}': invalid {what} {part}: '{field}'"))
        };
        Date::new(parse(month, "month")?, parse(day, "day")?).with_context(|| format!("'{name}'"))
    };

    let periods = period_fields
        .iter()
        .tuples()
        .map(|(week, start_month, start_day, end_month, end_day)| {
            ensure!(!week.is_empty(), "'{name}': empty week schedule field");
            let start = date(start_month, start_day, "start date")?;
            let end = date(end_month, end_day, "end date")?;
            ensure!(
                start <= end,
                "'{name}': period start {start} is after its end {end}"
            );
            Ok((week.clone(), start, end))
        })
        .try_collect()?;

    Ok(RawYearSchedule {
        id: name.into(),
        type_limits: object.optional_field(1).map(String::from),
        periods,
    })
}

/// Decode a `Schedule:Constant` record: name, type limits, value.
pub fn read_constant(object: &RawObject) -> Result<RawConstantSchedule> {
    let name = object.name()?;
    let value = object
        .optional_field(2)
        .map(|field| parse_numeric(field, name, "constant value"))
        .transpose()?
        .unwrap_or(0.0);

    Ok(RawConstantSchedule {
        id: name.into(),
        type_limits: object.optional_field(1).map(String::from),
        value,
    })
}
