//! Code for working with week schedules and day-type categories.
//!
//! A week schedule maps each of the twelve IDF day-type categories to a day schedule. The
//! compact form assigns day schedules to *groups* of categories ("Weekdays", "AllOtherDays",
//! ...) in declaration order, with earlier assignments never overridden by later ones.
use crate::day::DaySchedule;
use crate::error::ScheduleError;
use crate::id::define_id_type;
use anyhow::{Context, Result, anyhow, ensure};
use std::rc::Rc;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

define_id_type! {WeekScheduleID}

/// The twelve day-type categories, in IDF `Schedule:Week:Daily` field order.
///
/// Which category a calendar date belongs to is the caller's business (holidays and design
/// days come from the run period, not the schedule); schedules only map categories to values.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum DayCategory {
    /// Sunday
    Sunday,
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// A designated holiday
    Holiday,
    /// The summer sizing design day
    SummerDesignDay,
    /// The winter sizing design day
    WinterDesignDay,
    /// First user-defined custom day
    CustomDay1,
    /// Second user-defined custom day
    CustomDay2,
}

/// A day-type selector in a compact week or compact schedule `For:` field.
///
/// Either a single category or one of the composite groups EnergyPlus accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayTypeGroup {
    /// One literal category (e.g. "Tuesday", "SummerDesignDay")
    Single(DayCategory),
    /// Monday through Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
    /// Every category
    AllDays,
    /// Every category not assigned by an earlier group
    AllOtherDays,
}

impl DayTypeGroup {
    /// Parse a day-type keyword, case-insensitively.
    ///
    /// Accepts the twelve literal categories (with the plural spellings "Saturdays",
    /// "Sundays" and "Holidays" seen in sample files) and the composite groups.
    pub fn from_keyword(keyword: &str) -> Result<Self> {
        let keyword = keyword.trim();
        if let Ok(category) = keyword.parse() {
            return Ok(Self::Single(category));
        }

        let group = match keyword.to_ascii_lowercase().as_str() {
            "weekdays" => Self::Weekdays,
            "weekends" => Self::Weekends,
            "alldays" => Self::AllDays,
            "allotherdays" => Self::AllOtherDays,
            "saturdays" => Self::Single(DayCategory::Saturday),
            "sundays" => Self::Single(DayCategory::Sunday),
            "holidays" => Self::Single(DayCategory::Holiday),
            _ => return Err(anyhow!("Unknown day type: '{keyword}'")),
        };
        Ok(group)
    }

    /// Whether this group selects the given category.
    ///
    /// `AllOtherDays` selects everything; precedence is the expansion loop's business.
    fn selects(&self, category: DayCategory) -> bool {
        match self {
            Self::Single(single) => *single == category,
            Self::Weekdays => matches!(
                category,
                DayCategory::Monday
                    | DayCategory::Tuesday
                    | DayCategory::Wednesday
                    | DayCategory::Thursday
                    | DayCategory::Friday
            ),
            Self::Weekends => matches!(category, DayCategory::Saturday | DayCategory::Sunday),
            Self::AllDays | Self::AllOtherDays => true,
        }
    }
}

/// Parse a whitespace-separated day-type list (e.g. "Sunday Holidays AllOtherDays").
///
/// A leading `For:` keyword is accepted and stripped, as the compact forms write one.
pub fn parse_day_type_list(field: &str) -> Result<Vec<DayTypeGroup>> {
    let list = match field.trim().split_once(':') {
        Some((keyword, rest)) if keyword.trim().eq_ignore_ascii_case("for") => rest,
        _ => field,
    };

    let groups: Vec<_> = list
        .split_whitespace()
        .map(DayTypeGroup::from_keyword)
        .collect::<Result<_>>()
        .with_context(|| format!("Invalid day type list: '{field}'"))?;
    ensure!(!groups.is_empty(), "Empty day type list: '{field}'");
    Ok(groups)
}

/// A mapping from each of the twelve day-type categories to a day schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct WeekSchedule {
    /// Unique identifier for the week schedule
    pub id: WeekScheduleID,
    /// One day schedule per category, indexed by `DayCategory` discriminant
    days: [Rc<DaySchedule>; DayCategory::COUNT],
}

impl WeekSchedule {
    /// Create a week schedule from a complete per-category array.
    pub fn new(id: WeekScheduleID, days: [Rc<DaySchedule>; DayCategory::COUNT]) -> Self {
        Self { id, days }
    }

    /// Expand ordered (day-type groups, day schedule) entries into a full week schedule.
    ///
    /// Entries are scanned in declaration order and a category already assigned by an earlier
    /// entry is never reassigned, so "AllOtherDays" acts as a catch-all when placed last. Any
    /// category left unassigned fails with [`ScheduleError::IncompleteWeekSchedule`].
    pub fn expand(
        id: WeekScheduleID,
        entries: &[(Vec<DayTypeGroup>, Rc<DaySchedule>)],
    ) -> Result<Self> {
        let mut days: [Option<Rc<DaySchedule>>; DayCategory::COUNT] = Default::default();

        for (groups, day) in entries {
            for category in DayCategory::iter() {
                let slot = &mut days[category as usize];
                if slot.is_none() && groups.iter().any(|g| g.selects(category)) {
                    *slot = Some(Rc::clone(day));
                }
            }
        }

        for category in DayCategory::iter() {
            if days[category as usize].is_none() {
                return Err(ScheduleError::IncompleteWeekSchedule {
                    id: id.to_string(),
                    category,
                }
                .into());
            }
        }

        // All twelve slots checked just above
        Ok(Self::new(id, days.map(Option::unwrap)))
    }

    /// The day schedule assigned to a category
    pub fn day_schedule(&self, category: DayCategory) -> &Rc<DaySchedule> {
        &self.days[category as usize]
    }

    /// Iterate over the distinct day schedules the week references, in category order
    pub fn day_schedules(&self) -> impl Iterator<Item = &Rc<DaySchedule>> {
        self.days.iter()
    }
}
