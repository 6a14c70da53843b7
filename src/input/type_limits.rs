//! Code for reading `ScheduleTypeLimits` objects.
use super::{RawObject, parse_numeric};
use crate::type_limits::ScheduleTypeLimits;
use anyhow::{Context, Result, ensure};

/// Decode a `ScheduleTypeLimits` record.
///
/// Field order: name, lower limit, upper limit, numeric type, unit type. Every field but the
/// name may be empty, meaning unbounded / Continuous / Dimensionless.
pub fn read_type_limits(object: &RawObject) -> Result<ScheduleTypeLimits> {
    let name = object.name()?;

    let bound = |index: usize, what: &str| -> Result<Option<f64>> {
        object
            .optional_field(index)
            .map(|field| parse_numeric(field, name, what))
            .transpose()
    };
    let lower = bound(1, "lower limit")?;
    let upper = bound(2, "upper limit")?;
    if let (Some(lower), Some(upper)) = (lower, upper) {
        ensure!(
            lower <= upper,
            "'{name}': lower limit {lower} exceeds upper limit {upper}"
        );
    }

    let numeric_type = object
        .optional_field(3)
        .map(|field| {
            field
                .parse()
                .with_context(|| format!("'{name}': unknown numeric type '{field}'"))
        })
        .transpose()?
        .unwrap_or_default();
    let unit_type = object
        .optional_field(4)
        .map(|field| {
            field
                .parse()
                .with_context(|| format!("'{name}': unknown unit type '{field}'"))
        })
        .transpose()?
        .unwrap_or_default();

    Ok(ScheduleTypeLimits {
        id: name.into(),
        lower,
        upper,
        numeric_type,
        unit_type,
    })
}
