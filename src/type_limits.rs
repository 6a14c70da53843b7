//! Code for working with schedule type limits.
//!
//! A `ScheduleTypeLimits` object exists solely to validate schedule values against upper and
//! lower bounds and to declare whether a schedule is continuous or integer-valued. The unit
//! type is informational and plays no part in any calculation.
use crate::error::ScheduleError;
use crate::id::define_id_type;
use strum::{Display, EnumString};

define_id_type! {TypeLimitsID}

/// Whether schedule values are continuous or restricted to integers
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum NumericType {
    /// Any real value within the limits
    #[default]
    Continuous,
    /// Only integer values within the limits
    Discrete,
}

/// The unit attached to schedule values.
///
/// Not used in any calculation; EnergyPlus carries it purely for reporting.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum UnitType {
    #[default]
    Dimensionless,
    Temperature,
    DeltaTemperature,
    PrecipitationRate,
    Angle,
    ConvectionCoefficient,
    ActivityLevel,
    Velocity,
    Capacity,
    Power,
    Availability,
    Percent,
    Control,
    Mode,
}

/// Declares the legal numeric range and discreteness of a schedule's values.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleTypeLimits {
    /// Unique identifier for the limits object (e.g. "Fractional")
    pub id: TypeLimitsID,
    /// Lower bound on schedule values, if any
    pub lower: Option<f64>,
    /// Upper bound on schedule values, if any
    pub upper: Option<f64>,
    /// Continuous or Discrete
    pub numeric_type: NumericType,
    /// Informational unit type
    pub unit_type: UnitType,
}

impl ScheduleTypeLimits {
    /// Check a resolved schedule value against these limits.
    ///
    /// Violations are reported, never clamped; `owner` names the schedule holding the value so
    /// the error reads back to its source.
    pub fn check_value(&self, value: f64, owner: &str) -> Result<(), ScheduleError> {
        let fail = |reason: String| ScheduleError::ValueOutOfLimits {
            id: owner.to_string(),
            limits: self.id.to_string(),
            value,
            reason,
        };

        if let Some(lower) = self.lower
            && value < lower
        {
            return Err(fail(format!("below lower limit {lower}")));
        }
        if let Some(upper) = self.upper
            && value > upper
        {
            return Err(fail(format!("above upper limit {upper}")));
        }
        if self.numeric_type == NumericType::Discrete && value.fract() != 0.0 {
            return Err(fail("not an integer for Discrete limits".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fractional() -> ScheduleTypeLimits {
        ScheduleTypeLimits {
            id: "Fractional".into(),
            lower: Some(0.0),
            upper: Some(1.0),
            numeric_type: NumericType::Continuous,
            unit_type: UnitType::Dimensionless,
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn test_check_value_within(fractional: ScheduleTypeLimits, #[case] value: f64) {
        assert!(fractional.check_value(value, "sched").is_ok());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    fn test_check_value_outside(fractional: ScheduleTypeLimits, #[case] value: f64) {
        let err = fractional.check_value(value, "sched").unwrap_err();
        assert!(matches!(err, ScheduleError::ValueOutOfLimits { .. }));
    }

    #[test]
    fn test_check_value_discrete() {
        let on_off = ScheduleTypeLimits {
            id: "On/Off".into(),
            lower: Some(0.0),
            upper: Some(1.0),
            numeric_type: NumericType::Discrete,
            unit_type: UnitType::Availability,
        };
        assert!(on_off.check_value(1.0, "sched").is_ok());
        assert!(on_off.check_value(0.5, "sched").is_err());
    }

    #[test]
    fn test_unbounded() {
        let limits = ScheduleTypeLimits {
            id: "Any Number".into(),
            lower: None,
            upper: None,
            numeric_type: NumericType::Continuous,
            unit_type: UnitType::Dimensionless,
        };
        assert!(limits.check_value(-1e9, "sched").is_ok());
    }

    #[rstest]
    #[case("continuous", NumericType::Continuous)]
    #[case("Discrete", NumericType::Discrete)]
    fn test_numeric_type_parse(#[case] input: &str, #[case] expected: NumericType) {
        assert_eq!(input.parse::<NumericType>().unwrap(), expected);
    }

    #[test]
    fn test_unit_type_parse() {
        assert_eq!(
            "deltatemperature".parse::<UnitType>().unwrap(),
            UnitType::DeltaTemperature
        );
        assert!("Lumens".parse::<UnitType>().is_err());
    }
}
