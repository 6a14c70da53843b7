//! The error taxonomy for schedule parsing and resolution.
//!
//! Structural errors are raised eagerly while the registry is being built, so a registry that
//! constructs successfully can only fail a lookup through [`ScheduleError::DateNotCovered`] (and
//! then only when strict coverage checking was disabled) or an out-of-range timestep index.
use crate::date::Date;
use crate::week::DayCategory;
use thiserror::Error;

/// An error arising from schedule input or a schedule lookup.
///
/// Carried through [`anyhow`]'s error chain, so callers can match on a variant with
/// `err.downcast_ref::<ScheduleError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A day schedule's breakpoints are malformed
    #[error("Invalid schedule definition for '{id}': {reason}")]
    InvalidScheduleDefinition {
        /// Name of the offending day schedule
        id: String,
        /// What was wrong with it
        reason: String,
    },

    /// A week schedule leaves one of the twelve day categories unassigned
    #[error("Incomplete week schedule '{id}': no day schedule assigned for {category}")]
    IncompleteWeekSchedule {
        /// Name of the offending week schedule
        id: String,
        /// The first unassigned category
        category: DayCategory,
    },

    /// A year schedule's periods leave part of the year uncovered
    #[error("Incomplete year coverage for schedule '{id}': no period covers {date}")]
    IncompleteYearCoverage {
        /// Name of the offending schedule
        id: String,
        /// The first uncovered date
        date: Date,
    },

    /// A lookup date falls outside every declared period (lenient coverage only)
    #[error("Schedule '{id}' has no period covering {date}")]
    DateNotCovered {
        /// Name of the queried schedule
        id: String,
        /// The uncovered date
        date: Date,
    },

    /// A file-backed schedule's data source has fewer rows than declared
    #[error("Expected {expected} data rows, found only {found}")]
    RowCountMismatch {
        /// Declared number of data points
        expected: usize,
        /// Rows actually present after the header
        found: usize,
    },

    /// A file-backed schedule names a column beyond the row's field count
    #[error("Column {column} is out of range for a row with {fields} fields")]
    ColumnOutOfRange {
        /// The 1-based column index requested
        column: usize,
        /// Number of fields in the offending row
        fields: usize,
    },

    /// A file-backed schedule's data cell is not numeric
    #[error("Malformed numeric field '{value}' in data row {row}")]
    MalformedNumericField {
        /// The offending cell contents
        value: String,
        /// The 1-based data row (header rows excluded)
        row: usize,
    },

    /// A schedule value violates its ScheduleTypeLimits
    #[error("Value {value} in schedule '{id}' violates type limits '{limits}': {reason}")]
    ValueOutOfLimits {
        /// Name of the schedule holding the value
        id: String,
        /// Name of the violated limits object
        limits: String,
        /// The offending value, unclamped
        value: f64,
        /// Which constraint was violated
        reason: String,
    },

    /// A named object reference does not resolve
    #[error("'{name}' referenced by '{referrer}' is not defined")]
    UnresolvedReference {
        /// The dangling name
        name: String,
        /// The object holding the reference
        referrer: String,
    },

    /// A direct timestep index past the end of a fixed-interval series
    #[error("Timestep index {index} is out of range for a series of {len} points")]
    TimestepOutOfRange {
        /// The requested index
        index: usize,
        /// Length of the series
        len: usize,
    },
}
