//! The schedule registry: parsing orchestration and the public query API.
//!
//! A registry is built exactly once from a fully-read IDF document and is immutable
//! afterwards, so lookups are pure functions of (schedule name, date, time) and safe to call
//! from any number of readers. Construction is fail-fast: every structural error aborts the
//! build and no partially-resolved registry is ever handed out.
use crate::date::Date;
use crate::day::{DayScheduleID, DaySchedule};
use crate::error::ScheduleError;
use crate::fixed::FixedIntervalSchedule;
use crate::input::compact::{RawCompactSchedule, read_compact};
use crate::input::day::{RawDaySchedule, read_day_hourly, read_day_interval, read_day_list};
use crate::input::fixed::{RawFileSchedule, read_file_schedule};
use crate::input::type_limits::read_type_limits;
use crate::input::week::{RawWeekSchedule, read_week_compact, read_week_daily};
use crate::input::year::{
    RawConstantSchedule, RawYearSchedule, read_constant, read_year,
};
use crate::input::{RawObject, parse_idf_objects, read_idf_file};
use crate::time::{TimeOfDay, Timestep};
use crate::type_limits::{ScheduleTypeLimits, TypeLimitsID};
use crate::week::{DayCategory, DayTypeGroup, WeekSchedule, WeekScheduleID};
use crate::year::{ScheduleID, YearPeriod, YearSchedule};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::{debug, warn};
use std::fs::File;
use std::path::Path;
use std::rc::Rc;

/// The built-in schedule library every registry can fall back on (Always On, Always Off and
/// the limits they reference), mirroring the defaults the original ecosystem ships.
const DEFAULTS_IDF: &str = include_str!("../data/defaults.idf");

/// Whether year coverage gaps are rejected at load time or surface at query time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CoveragePolicy {
    /// Reject incomplete year coverage while the registry is built (the default)
    #[default]
    Strict,
    /// Allow gaps; querying an uncovered date fails with `DateNotCovered`
    Lenient,
}

/// What to do when a schedule value violates its type limits.
///
/// Values are never clamped or rounded either way; downstream energy calculations depend on
/// exact values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LimitsPolicy {
    /// Log a warning and keep the value (the default)
    #[default]
    Warn,
    /// Abort registry construction
    Error,
}

/// Options governing registry construction.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Year coverage validation policy
    pub coverage: CoveragePolicy,
    /// Type limits violation policy
    pub limits: LimitsPolicy,
}

/// A named top-level schedule: either year-structured or a flat file-backed series.
#[derive(Clone, Debug, PartialEq)]
pub enum Schedule {
    /// A year schedule (explicit, compact or constant)
    Year(Rc<YearSchedule>),
    /// A file-backed fixed-interval schedule
    FixedInterval(Rc<FixedIntervalSchedule>),
}

impl Schedule {
    /// The limits the schedule's values must respect, if any
    pub fn type_limits(&self) -> Option<&Rc<ScheduleTypeLimits>> {
        match self {
            Self::Year(year) => year.type_limits.as_ref(),
            Self::FixedInterval(fixed) => fixed.type_limits.as_ref(),
        }
    }

    /// The value of the schedule at a date, time of day and day category.
    ///
    /// File-backed schedules have no week structure and ignore the category.
    pub fn value_at(
        &self,
        date: Date,
        time: TimeOfDay,
        category: DayCategory,
        timestep: Timestep,
    ) -> Result<f64> {
        match self {
            Self::Year(year) => year.value_at(date, time, category, timestep),
            Self::FixedInterval(fixed) => Ok(fixed.value_at(date, time)?),
        }
    }
}

/// An immutable registry of named schedule objects, built once per input document.
#[derive(Debug, Default)]
pub struct ScheduleRegistry {
    /// Type limits by name
    pub type_limits: IndexMap<TypeLimitsID, Rc<ScheduleTypeLimits>>,
    /// Day schedules by name
    pub day_schedules: IndexMap<DayScheduleID, Rc<DaySchedule>>,
    /// Week schedules by name
    pub week_schedules: IndexMap<WeekScheduleID, Rc<WeekSchedule>>,
    /// Top-level schedules by name (year, compact, constant and file forms share a namespace)
    pub schedules: IndexMap<ScheduleID, Schedule>,
}

/// Raw records collected by the registration pass, keyed by name
#[derive(Default)]
struct RawDocument {
    type_limits: IndexMap<String, RawObject>,
    days: IndexMap<String, RawDaySchedule>,
    weeks: IndexMap<String, RawWeekSchedule>,
    years: IndexMap<String, RawYearSchedule>,
    compacts: IndexMap<String, RawCompactSchedule>,
    constants: IndexMap<String, RawConstantSchedule>,
    files: IndexMap<String, RawFileSchedule>,
}

impl ScheduleRegistry {
    /// Build a registry from IDF text with default options.
    pub fn from_idf_str(text: &str) -> Result<Self> {
        Self::from_idf_str_with_options(text, &LoadOptions::default(), None)
    }

    /// Build a registry from IDF text.
    ///
    /// `base_dir` anchors relative `Schedule:File` paths; with `None` they resolve against
    /// the working directory.
    pub fn from_idf_str_with_options(
        text: &str,
        options: &LoadOptions,
        base_dir: Option<&Path>,
    ) -> Result<Self> {
        let objects = parse_idf_objects(text)?;
        Self::from_objects(&objects, options, base_dir)
    }

    /// Build a registry from an IDF file with default options.
    ///
    /// Relative `Schedule:File` paths resolve against the file's directory.
    pub fn from_idf_file(file_path: &Path) -> Result<Self> {
        Self::from_idf_file_with_options(file_path, &LoadOptions::default())
    }

    /// Build a registry from an IDF file.
    pub fn from_idf_file_with_options(file_path: &Path, options: &LoadOptions) -> Result<Self> {
        let objects = read_idf_file(file_path)?;
        Self::from_objects(&objects, options, file_path.parent())
            .with_context(|| format!("Error loading schedules from {}", file_path.display()))
    }

    /// The built-in default library (Always On, Always Off and their type limits).
    pub fn defaults() -> Self {
        // The embedded document is a compile-time constant and always parses
        Self::from_idf_str(DEFAULTS_IDF).expect("Invalid built-in schedule library")
    }

    /// Build a registry from tokenized objects.
    ///
    /// This is the two-pass load: a registration pass collects every named object (rejecting
    /// duplicates), then a resolution pass follows name references in dependency order -
    /// limits, then day schedules, then weeks, then the year-structured and file-backed
    /// schedules - so object order in the document never matters.
    pub fn from_objects(
        objects: &[RawObject],
        options: &LoadOptions,
        base_dir: Option<&Path>,
    ) -> Result<Self> {
        let raw = register_objects(objects)?;
        let mut registry = Self::default();

        for (name, object) in &raw.type_limits {
            let limits = read_type_limits(object)?;
            registry
                .type_limits
                .insert(name.as_str().into(), Rc::new(limits));
        }

        for (name, raw_day) in raw.days {
            let limits = registry.resolve_limits(raw_day.type_limits.as_deref(), &name)?;
            let day = raw_day.resolve(limits)?;
            registry.check_day_limits(&day, options)?;
            registry.day_schedules.insert(name.into(), Rc::new(day));
        }

        for (name, raw_week) in raw.weeks {
            let week = registry.resolve_week(&raw_week)?;
            registry.week_schedules.insert(name.into(), Rc::new(week));
        }

        for (name, raw_year) in raw.years {
            let year = registry.resolve_year(raw_year, options)?;
            registry.insert_schedule(name.into(), Schedule::Year(Rc::new(year)))?;
        }

        for (name, raw_compact) in raw.compacts {
            let year = registry.finish_year(
                raw_compact.id,
                raw_compact.type_limits.as_deref(),
                raw_compact.periods,
                options,
            )?;
            registry.insert_schedule(name.into(), Schedule::Year(Rc::new(year)))?;
        }

        for (name, raw_constant) in raw.constants {
            let year = registry.resolve_constant(raw_constant, options)?;
            registry.insert_schedule(name.into(), Schedule::Year(Rc::new(year)))?;
        }

        for (name, raw_file) in raw.files {
            let fixed = registry.resolve_file(raw_file, options, base_dir)?;
            registry.insert_schedule(name.into(), Schedule::FixedInterval(Rc::new(fixed)))?;
        }

        debug!(
            "Loaded {} schedules ({} day, {} week, {} type limits)",
            registry.schedules.len(),
            registry.day_schedules.len(),
            registry.week_schedules.len(),
            registry.type_limits.len()
        );
        Ok(registry)
    }

    /// Look up a top-level schedule by name
    pub fn schedule(&self, name: &str) -> Result<&Schedule> {
        self.schedules
            .get(name)
            .with_context(|| format!("Unknown schedule: '{name}'"))
    }

    /// The value of a named schedule at a date, time of day and day category.
    ///
    /// The category is the caller's statement about what kind of day `date` is (from its
    /// calendar, holiday list and design-day designations); this registry never derives it.
    pub fn value_at(
        &self,
        name: &str,
        date: Date,
        time: TimeOfDay,
        category: DayCategory,
        timestep: Timestep,
    ) -> Result<f64> {
        self.schedule(name)?.value_at(date, time, category, timestep)
    }

    /// One value per timestep over a single day of a named schedule.
    pub fn day_values(
        &self,
        name: &str,
        date: Date,
        category: DayCategory,
        timestep: Timestep,
    ) -> Result<Vec<f64>> {
        let schedule = self.schedule(name)?;
        let step = timestep.minutes();
        (1..=timestep.steps_per_day() as u16)
            .map(|k| {
                // Step ends never exceed 24:00
                let time = TimeOfDay::from_minutes(k * step).unwrap();
                schedule.value_at(date, time, category, timestep)
            })
            .collect()
    }

    /// One value per timestep over the whole year of a named schedule.
    ///
    /// `classify` supplies the day category for each date; a host with holidays or design-day
    /// runs encodes them there.
    pub fn annual_values<F>(
        &self,
        name: &str,
        timestep: Timestep,
        classify: F,
    ) -> Result<Vec<f64>>
    where
        F: Fn(Date) -> DayCategory,
    {
        let mut values = Vec::with_capacity(365 * timestep.steps_per_day());
        let mut date = Some(Date::JAN_1);
        while let Some(current) = date {
            values.extend(self.day_values(name, current, classify(current), timestep)?);
            date = current.succ();
        }
        Ok(values)
    }

    /// Resolve an optional type-limits reference
    fn resolve_limits(
        &self,
        name: Option<&str>,
        referrer: &str,
    ) -> Result<Option<Rc<ScheduleTypeLimits>>> {
        name.map(|name| {
            self.type_limits
                .get(name)
                .cloned()
                .ok_or_else(|| unresolved(name, referrer))
        })
        .transpose()
        .map_err(Into::into)
    }

    /// Resolve a raw week schedule's day references and expand its day-type groups
    fn resolve_week(&self, raw: &RawWeekSchedule) -> Result<WeekSchedule> {
        let entries: Vec<(Vec<DayTypeGroup>, Rc<DaySchedule>)> = raw
            .entries
            .iter()
            .map(|(groups, day_name)| {
                let day = self
                    .day_schedules
                    .get(day_name.as_str())
                    .cloned()
                    .ok_or_else(|| unresolved(day_name, &raw.id.to_string()))?;
                Ok((groups.clone(), day))
            })
            .collect::<Result<_>>()?;
        WeekSchedule::expand(raw.id.clone(), &entries)
    }

    /// Resolve a raw year schedule's week references into periods
    fn resolve_year(&self, raw: RawYearSchedule, options: &LoadOptions) -> Result<YearSchedule> {
        let periods = raw
            .periods
            .iter()
            .map(|(week_name, start, end)| {
                let week = self
                    .week_schedules
                    .get(week_name.as_str())
                    .cloned()
                    .ok_or_else(|| unresolved(week_name, &raw.id.to_string()))?;
                Ok(YearPeriod {
                    week,
                    start: *start,
                    end: *end,
                })
            })
            .collect::<Result<_>>()?;

        self.finish_year(raw.id, raw.type_limits.as_deref(), periods, options)
    }

    /// Normalize a constant schedule into a one-period year schedule
    fn resolve_constant(
        &self,
        raw: RawConstantSchedule,
        options: &LoadOptions,
    ) -> Result<YearSchedule> {
        let day = Rc::new(crate::day::constant_day(
            format!("{} Day", raw.id).into(),
            raw.value,
        ));
        let week = WeekSchedule::expand(
            WeekScheduleID::from(format!("{} Wk", raw.id)),
            &[(vec![DayTypeGroup::AllDays], day)],
        )?;
        let periods = vec![YearPeriod {
            week: Rc::new(week),
            start: Date::JAN_1,
            end: Date::DEC_31,
        }];

        self.finish_year(raw.id, raw.type_limits.as_deref(), periods, options)
    }

    /// Attach limits to assembled periods, then run coverage and limits validation
    fn finish_year(
        &self,
        id: ScheduleID,
        type_limits: Option<&str>,
        periods: Vec<YearPeriod>,
        options: &LoadOptions,
    ) -> Result<YearSchedule> {
        let owner = id.to_string();
        let year = YearSchedule {
            id,
            type_limits: self.resolve_limits(type_limits, &owner)?,
            periods,
        };

        if options.coverage == CoveragePolicy::Strict {
            year.validate_coverage()?;
        }

        if let Some(limits) = &year.type_limits {
            for period in &year.periods {
                for day in period.week.day_schedules() {
                    check_limits(limits, day.values(), &owner, options)?;
                }
            }
        }

        Ok(year)
    }

    /// Load a file-backed schedule's series and assemble the entity
    fn resolve_file(
        &self,
        raw: RawFileSchedule,
        options: &LoadOptions,
        base_dir: Option<&Path>,
    ) -> Result<FixedIntervalSchedule> {
        let owner = raw.id.to_string();
        let path = raw.resolved_path(base_dir);
        let file = File::open(&path)
            .with_context(|| format!("'{owner}': cannot open data file {}", path.display()))?;
        let values = raw
            .read_series(file)
            .with_context(|| format!("'{owner}': error reading {}", path.display()))?;

        let fixed = FixedIntervalSchedule::new(
            raw.id,
            self.resolve_limits(raw.type_limits.as_deref(), &owner)?,
            raw.minutes_per_item,
            raw.interpolate,
            values,
        )?;

        if let Some(limits) = &fixed.type_limits {
            check_limits(limits, fixed.values(), &owner, options)?;
        }
        Ok(fixed)
    }

    /// Validate a day schedule's values against its own limits reference
    fn check_day_limits(&self, day: &DaySchedule, options: &LoadOptions) -> Result<()> {
        if let Some(limits) = &day.type_limits {
            check_limits(limits, day.values(), &day.id.to_string(), options)?;
        }
        Ok(())
    }

    /// Insert a top-level schedule, rejecting duplicate names across all schedule forms
    fn insert_schedule(&mut self, name: ScheduleID, schedule: Schedule) -> Result<()> {
        ensure!(
            self.schedules.insert(name.clone(), schedule).is_none(),
            "Duplicate schedule name: '{name}'"
        );
        Ok(())
    }
}

/// The registration pass: collect raw records by kind, rejecting duplicate names per kind
fn register_objects(objects: &[RawObject]) -> Result<RawDocument> {
    let mut raw = RawDocument::default();

    // Insert into a raw map, rejecting duplicates
    macro_rules! register {
        ($map:expr, $object:expr, $record:expr) => {{
            let name = $object.name()?.to_string();
            ensure!(
                $map.insert(name.clone(), $record).is_none(),
                "Duplicate {} name: '{}'",
                $object.type_name,
                name
            );
        }};
    }

    for object in objects {
        if object.is_type("ScheduleTypeLimits") {
            register!(raw.type_limits, object, object.clone());
        } else if object.is_type("Schedule:Day:Interval") {
            register!(raw.days, object, read_day_interval(object)?);
        } else if object.is_type("Schedule:Day:Hourly") {
            register!(raw.days, object, read_day_hourly(object)?);
        } else if object.is_type("Schedule:Day:List") {
            register!(raw.days, object, read_day_list(object)?);
        } else if object.is_type("Schedule:Week:Daily") {
            register!(raw.weeks, object, read_week_daily(object)?);
        } else if object.is_type("Schedule:Week:Compact") {
            register!(raw.weeks, object, read_week_compact(object)?);
        } else if object.is_type("Schedule:Year") {
            register!(raw.years, object, read_year(object)?);
        } else if object.is_type("Schedule:Compact") {
            register!(raw.compacts, object, read_compact(object)?);
        } else if object.is_type("Schedule:Constant") {
            register!(raw.constants, object, read_constant(object)?);
        } else if object.is_type("Schedule:File") {
            register!(raw.files, object, read_file_schedule(object)?);
        } else {
            // Input documents are often whole building models; everything else is not ours
            debug!("Ignoring {} object", object.type_name);
        }
    }

    Ok(raw)
}

/// Check a stream of values against limits, warning or failing per the configured policy
fn check_limits<I>(
    limits: &ScheduleTypeLimits,
    values: I,
    owner: &str,
    options: &LoadOptions,
) -> Result<()>
where
    I: Iterator<Item = f64>,
{
    for value in values {
        if let Err(err) = limits.check_value(value, owner) {
            match options.limits {
                LimitsPolicy::Warn => warn!("{err}"),
                LimitsPolicy::Error => return Err(err.into()),
            }
        }
    }
    Ok(())
}

fn unresolved(name: &str, referrer: &str) -> ScheduleError {
    ScheduleError::UnresolvedReference {
        name: name.to_string(),
        referrer: referrer.to_string(),
    }
}
