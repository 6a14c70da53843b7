//! Code for reading week schedule objects.
//!
//! `Schedule:Week:Daily` names one day schedule per category in a fixed field order;
//! `Schedule:Week:Compact` pairs day-type group lists with day schedule names and expands
//! them with first-match-wins precedence. Both decode to the same raw form, resolved against
//! the day schedule registry once every day schedule is known.
use super::RawObject;
use crate::week::{DayCategory, DayTypeGroup, WeekScheduleID, parse_day_type_list};
use anyhow::{Result, ensure};
use itertools::Itertools;
use strum::{EnumCount, IntoEnumIterator};

/// A week schedule record with its day schedule references still unresolved.
#[derive(Clone, Debug, PartialEq)]
pub struct RawWeekSchedule {
    /// The schedule's name
    pub id: WeekScheduleID,
    /// Ordered (day-type groups, day schedule name) entries
    pub entries: Vec<(Vec<DayTypeGroup>, String)>,
}

/// Decode a `Schedule:Week:Daily` record.
///
/// Field order after the name: one day schedule per category, Sunday through Saturday, then
/// Holiday, SummerDesignDay, WinterDesignDay, CustomDay1, CustomDay2.
pub fn read_week_daily(object: &RawObject) -> Result<RawWeekSchedule> {
    let name = object.name()?;
    let day_names = object.fields_from(1);
    ensure!(
        day_names.len() == DayCategory::COUNT,
        "'{name}': expected {} day schedule fields, got {}",
        DayCategory::COUNT,
        day_names.len()
    );

    let entries = DayCategory::iter()
        .zip(day_names)
        .map(|(category, day_name)| {
            ensure!(
                !day_name.is_empty(),
                "'{name}': empty day schedule field for {category}"
            );
            Ok((vec![DayTypeGroup::Single(category)], day_name.clone()))
        })
        .try_collect()?;

    Ok(RawWeekSchedule {
        id: name.into(),
        entries,
    })
}

/// Decode a `Schedule:Week:Compact` record.
///
/// Field order after the name: (day-type list, day schedule name) pairs, e.g.
/// `For: Weekdays, office day, For: AllOtherDays, office weekend`.
pub fn read_week_compact(object: &RawObject) -> Result<RawWeekSchedule> {
    let name = object.name()?;
    let pairs = object.fields_from(1);
    ensure!(
        !pairs.is_empty() && pairs.len() % 2 == 0,
        "'{name}': expected (day type list, day schedule) field pairs"
    );

    let entries = pairs
        .iter()
        .tuples()
        .map(|(day_types, day_name)| {
            ensure!(
                !day_name.is_empty(),
                "'{name}': empty day schedule field for '{day_types}'"
            );
            Ok((parse_day_type_list(day_types)?, day_name.clone()))
        })
        .try_collect()?;

    Ok(RawWeekSchedule {
        id: name.into(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_idf_objects;

    fn parse_one(text: &str) -> RawObject {
        parse_idf_objects(text).unwrap().remove(0)
    }

    #[test]
    fn test_read_week_daily() {
        let object = parse_one(
            "Schedule:Week:Daily, office week,
               sunday day, weekday day, weekday day, weekday day, weekday day, weekday day,
               saturday day, sunday day, summer dd, winter dd, weekday day, weekday day;",
        );
        let raw = read_week_daily(&object).unwrap();
        assert_eq!(raw.id, "office week".into());
        assert_eq!(raw.entries.len(), DayCategory::COUNT);
        assert_eq!(
            raw.entries[0],
            (
                vec![DayTypeGroup::Single(DayCategory::Sunday)],
                "sunday day".to_string()
            )
        );
        assert_eq!(
            raw.entries[8],
            (
                vec![DayTypeGroup::Single(DayCategory::SummerDesignDay)],
                "summer dd".to_string()
            )
        );
    }

    #[test]
    fn test_read_week_daily_wrong_count() {
        let object = parse_one("Schedule:Week:Daily, w, d1, d2;");
        assert!(read_week_daily(&object).is_err());
    }

    #[test]
    fn test_read_week_compact() {
        let object = parse_one(
            "Schedule:Week:Compact, office week,
               For: Weekdays SummerDesignDay, weekday day,
               For: Saturday, saturday day,
               For: AllOtherDays, sunday day;",
        );
        let raw = read_week_compact(&object).unwrap();
        assert_eq!(raw.entries.len(), 3);
        assert_eq!(
            raw.entries[0].0,
            [
                DayTypeGroup::Weekdays,
                DayTypeGroup::Single(DayCategory::SummerDesignDay)
            ]
        );
        assert_eq!(raw.entries[2].0, [DayTypeGroup::AllOtherDays]);
    }

    #[test]
    fn test_read_week_compact_invalid() {
        let object = parse_one("Schedule:Week:Compact, w, For: Weekdays;");
        assert!(read_week_compact(&object).is_err());

        let object = parse_one("Schedule:Week:Compact, w, For: Mondays, d;");
        assert!(read_week_compact(&object).is_err());
    }
}
