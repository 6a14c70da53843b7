//! Code for reading day schedule objects.
//!
//! All three EnergyPlus day forms are accepted and normalize to the same [`DaySchedule`]:
//! `Schedule:Day:Interval` (until-style breakpoints), `Schedule:Day:Hourly` (24 values) and
//! `Schedule:Day:List` (uniformly spaced values at a declared minutes-per-item).
use super::{RawObject, parse_interpolate, parse_numeric};
use crate::day::{DayScheduleID, DaySchedule};
use crate::time::{TimeOfDay, Timestep};
use crate::type_limits::ScheduleTypeLimits;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use std::rc::Rc;

/// A day schedule record with its type-limits reference still unresolved.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDaySchedule {
    /// The schedule's name
    pub id: DayScheduleID,
    /// Name of the referenced `ScheduleTypeLimits`, if any
    pub type_limits: Option<String>,
    /// Whether values interpolate to the simulation timestep
    pub interpolate: bool,
    /// The day profile in whichever shape the source object used
    pub values: RawDayValues,
}

/// The value payload of a day schedule record.
#[derive(Clone, Debug, PartialEq)]
pub enum RawDayValues {
    /// Until-style breakpoints (`Schedule:Day:Interval`)
    Breakpoints(Vec<(TimeOfDay, f64)>),
    /// Uniformly spaced values (`Schedule:Day:Hourly`, `Schedule:Day:List`)
    AtTimestep {
        /// Spacing of the values
        timestep: Timestep,
        /// One value per step of the day
        values: Vec<f64>,
    },
}

impl RawDaySchedule {
    /// Build the day schedule entity once its type limits are resolved
    pub fn resolve(self, type_limits: Option<Rc<ScheduleTypeLimits>>) -> Result<DaySchedule> {
        match self.values {
            RawDayValues::Breakpoints(breakpoints) => {
                DaySchedule::new(self.id, type_limits, self.interpolate, breakpoints)
            }
            RawDayValues::AtTimestep { timestep, values } => DaySchedule::from_values_at_timestep(
                self.id,
                type_limits,
                self.interpolate,
                timestep,
                &values,
            ),
        }
    }
}

/// Decode a `Schedule:Day:Interval` record.
///
/// Field order: name, type limits, interpolate, then (time, value) pairs. Time fields may
/// carry the "Until:" prefix most files write.
pub fn read_day_interval(object: &RawObject) -> Result<RawDaySchedule> {
    let name = object.name()?;
    let interpolate = parse_interpolate(object.optional_field(2), name)?;

    let pairs = object.fields_from(3);
    ensure!(
        !pairs.is_empty() && pairs.len() % 2 == 0,
        "'{name}': expected (time, value) field pairs"
    );
    let breakpoints = pairs
        .iter()
        .tuples()
        .map(|(time, value)| {
            let time = strip_until_prefix(time);
            Ok((
                TimeOfDay::from_time_str(time).with_context(|| format!("'{name}'"))?,
                parse_numeric(value, name, "schedule value")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RawDaySchedule {
        id: name.into(),
        type_limits: object.optional_field(1).map(String::from),
        interpolate,
        values: RawDayValues::Breakpoints(breakpoints),
    })
}

/// Decode a `Schedule:Day:Hourly` record: name, type limits, then 24 hourly values.
pub fn read_day_hourly(object: &RawObject) -> Result<RawDaySchedule> {
    let name = object.name()?;
    let values: Vec<f64> = object
        .fields_from(2)
        .iter()
        .map(|field| parse_numeric(field, name, "hourly value"))
        .try_collect()?;
    ensure!(
        values.len() == 24,
        "'{name}': expected 24 hourly values, got {}",
        values.len()
    );

    Ok(RawDaySchedule {
        id: name.into(),
        type_limits: object.optional_field(1).map(String::from),
        interpolate: false,
        values: RawDayValues::AtTimestep {
            timestep: Timestep::HOURLY,
            values,
        },
    })
}

/// Decode a `Schedule:Day:List` record.
///
/// Field order: name, type limits, interpolate, minutes per item, then one value per item
/// over the whole day.
pub fn read_day_list(object: &RawObject) -> Result<RawDaySchedule> {
    let name = object.name()?;
    let interpolate = parse_interpolate(object.optional_field(2), name)?;
    let minutes_per_item = object
        .required_field(3, "minutes per item")?
        .parse()
        .with_context(|| format!("'{name}': invalid minutes per item"))?;
    let timestep = Timestep::from_minutes_per_step(minutes_per_item)
        .with_context(|| format!("'{name}'"))?;

    let values: Vec<f64> = object
        .fields_from(4)
        .iter()
        .map(|field| parse_numeric(field, name, "schedule value"))
        .try_collect()?;

    Ok(RawDaySchedule {
        id: name.into(),
        type_limits: object.optional_field(1).map(String::from),
        interpolate,
        values: RawDayValues::AtTimestep { timestep, values },
    })
}

/// Strip an optional leading "Until:" keyword from a time field
fn strip_until_prefix(field: &str) -> &str {
    let trimmed = field.trim();
    match trimmed.split_once(':') {
        Some((keyword, rest)) if keyword.trim().eq_ignore_ascii_case("until") => rest,
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_idf_objects;
    use float_cmp::assert_approx_eq;

    fn parse_one(text: &str) -> RawObject {
        parse_idf_objects(text).unwrap().remove(0)
    }

    #[test]
    fn test_read_day_interval() {
        let object = parse_one(
            "Schedule:Day:Interval, office day, Fractional, No,
               Until: 08:00, 0.0,
               Until: 17:00, 1.0,
               Until: 24:00, 0.0;",
        );
        let raw = read_day_interval(&object).unwrap();
        assert_eq!(raw.id, "office day".into());
        assert_eq!(raw.type_limits.as_deref(), Some("Fractional"));
        assert!(!raw.interpolate);

        let day = raw.resolve(None).unwrap();
        assert_eq!(day.breakpoints().len(), 3);
        assert_approx_eq!(
            f64,
            day.value_at(TimeOfDay::from_hm(9, 0).unwrap(), Timestep::HOURLY),
            1.0
        );
    }

    #[test]
    fn test_read_day_interval_plain_times() {
        // Times without the "Until:" prefix are equally valid
        let object = parse_one("Schedule:Day:Interval, d, , Linear, 12:00, 0.5, 24:00, 1.0;");
        let raw = read_day_interval(&object).unwrap();
        assert!(raw.interpolate);
        assert_eq!(
            raw.values,
            RawDayValues::Breakpoints(vec![
                (TimeOfDay::from_hm(12, 0).unwrap(), 0.5),
                (TimeOfDay::END_OF_DAY, 1.0),
            ])
        );
    }

    #[test]
    fn test_read_day_interval_invalid() {
        // Odd number of pair fields
        let object = parse_one("Schedule:Day:Interval, d, , No, 24:00;");
        assert!(read_day_interval(&object).is_err());

        // Unknown interpolate keyword
        let object = parse_one("Schedule:Day:Interval, d, , Sometimes, 24:00, 1;");
        assert!(read_day_interval(&object).is_err());

        // Breakpoints not reaching 24:00 fail on resolve
        let object = parse_one("Schedule:Day:Interval, d, , No, 17:00, 1;");
        assert!(read_day_interval(&object).unwrap().resolve(None).is_err());
    }

    #[test]
    fn test_read_day_hourly() {
        let values = (0..24).map(|h| h.to_string()).collect::<Vec<_>>().join(", ");
        let object = parse_one(&format!("Schedule:Day:Hourly, h, , {values};"));
        let day = read_day_hourly(&object).unwrap().resolve(None).unwrap();
        assert_approx_eq!(
            f64,
            day.value_at(TimeOfDay::from_hm(2, 30).unwrap(), Timestep::HOURLY),
            2.0
        );

        let object = parse_one("Schedule:Day:Hourly, h, , 1, 2, 3;");
        assert!(read_day_hourly(&object).is_err());
    }

    #[test]
    fn test_read_day_list() {
        // 30-minute items: 48 values over the day
        let values = vec!["0.5"; 48].join(", ");
        let object = parse_one(&format!("Schedule:Day:List, l, , No, 30, {values};"));
        let raw = read_day_list(&object).unwrap();
        let day = raw.resolve(None).unwrap();
        assert!(day.is_constant());

        // Declared item length inconsistent with the value count fails on resolve
        let object = parse_one("Schedule:Day:List, l, , No, 30, 0.5, 0.5;");
        assert!(read_day_list(&object).unwrap().resolve(None).is_err());
    }
}
