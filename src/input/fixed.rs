//! Code for reading `Schedule:File` objects and their external column files.
//!
//! The record declares where the data lives (path, 1-based column, header rows to skip,
//! separator) and its shape (hours of data, minutes per item); the column file itself is read
//! exactly once while the registry is built, never lazily.
use super::{RawObject, parse_interpolate};
use crate::error::ScheduleError;
use crate::year::ScheduleID;
use anyhow::{Context, Result, ensure};
use std::io::Read;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};

/// The column separator of a `Schedule:File` data source
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Separator {
    /// Comma-separated fields (the default)
    #[default]
    Comma,
    /// Tab-separated fields
    Tab,
    /// Space-separated fields
    Space,
    /// Semicolon-separated fields
    Semicolon,
}

impl Separator {
    /// The delimiter byte for the csv reader
    fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
            Self::Space => b' ',
            Self::Semicolon => b';',
        }
    }
}

/// A `Schedule:File` record, not yet loaded from its data source.
#[derive(Clone, Debug, PartialEq)]
pub struct RawFileSchedule {
    /// The schedule's name
    pub id: ScheduleID,
    /// Name of the referenced `ScheduleTypeLimits`, if any
    pub type_limits: Option<String>,
    /// Path to the column file, as written in the record
    pub path: PathBuf,
    /// 1-based column holding the schedule values
    pub column: usize,
    /// Number of leading rows to discard
    pub header_rows: usize,
    /// Declared hours of data (8760 for a full year of hourly values)
    pub hours_of_data: u32,
    /// Column separator
    pub separator: Separator,
    /// Whether lookups between samples interpolate linearly
    pub interpolate: bool,
    /// Length of one data item in minutes
    pub minutes_per_item: u16,
}

impl RawFileSchedule {
    /// The number of data points the record declares
    pub fn point_count(&self) -> usize {
        (self.hours_of_data * 60 / u32::from(self.minutes_per_item)) as usize
    }

    /// Resolve the record's path against the directory holding the input document
    pub fn resolved_path(&self, base_dir: Option<&Path>) -> PathBuf {
        match base_dir {
            Some(base) if self.path.is_relative() => base.join(&self.path),
            _ => self.path.clone(),
        }
    }

    /// Read the declared number of points from an already-opened data source
    pub fn read_series<R: Read>(&self, reader: R) -> Result<Vec<f64>> {
        read_series(
            reader,
            self.column,
            self.header_rows,
            self.point_count(),
            self.separator,
        )
    }
}

/// Decode a `Schedule:File` record.
///
/// Field order: name, type limits, file path, column, rows to skip, hours of data (default
/// 8760), separator (default Comma), interpolate (default No), minutes per item (default 60).
pub fn read_file_schedule(object: &RawObject) -> Result<RawFileSchedule> {
    let name = object.name()?;

    let parse_int = |index: usize, what: &str| -> Result<Option<u32>> {
        object
            .optional_field(index)
            .map(|field| {
                field
                    .trim()
                    .parse()
                    .with_context(|| format!("'{name}': invalid {what}: '{field}'"))
            })
            .transpose()
    };

    let path = PathBuf::from(object.required_field(2, "file path")?);
    let column = parse_int(3, "column number")?
        .with_context(|| format!("'{name}': missing column number"))?;
    ensure!(column >= 1, "'{name}': column number is 1-based");
    let header_rows = parse_int(4, "rows to skip")?
        .with_context(|| format!("'{name}': missing rows to skip"))?;
    let hours_of_data = parse_int(5, "hours of data")?.unwrap_or(8760);
    ensure!(
        hours_of_data > 0,
        "'{name}': hours of data must be positive"
    );

    let separator = object
        .optional_field(6)
        .map(|field| {
            field
                .parse()
                .with_context(|| format!("'{name}': unknown separator '{field}'"))
        })
        .transpose()?
        .unwrap_or_default();
    let interpolate = parse_interpolate(object.optional_field(7), name)?;

    let minutes_per_item = parse_int(8, "minutes per item")?.unwrap_or(60);
    ensure!(
        minutes_per_item >= 1 && minutes_per_item <= 60 && 60 % minutes_per_item == 0,
        "'{name}': minutes per item must divide 60, got {minutes_per_item}"
    );

    Ok(RawFileSchedule {
        id: name.into(),
        type_limits: object.optional_field(1).map(String::from),
        path,
        column: column as usize,
        header_rows: header_rows as usize,
        hours_of_data,
        separator,
        interpolate,
        minutes_per_item: minutes_per_item as u16,
    })
}

/// Read a column of numeric values from a delimited data source.
///
/// Discards `header_rows` rows, then reads exactly `point_count` records, extracting the
/// 1-based `column` field of each. Rows beyond the declared count are ignored.
pub fn read_series<R: Read>(
    reader: R,
    column: usize,
    header_rows: usize,
    point_count: usize,
    separator: Separator,
) -> Result<Vec<f64>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut values = Vec::with_capacity(point_count);
    for (i, record) in csv_reader
        .records()
        .skip(header_rows)
        .take(point_count)
        .enumerate()
    {
        let record = record.with_context(|| format!("Error reading data row {}", i + 1))?;
        let field =
            record
                .get(column - 1)
                .ok_or_else(|| ScheduleError::ColumnOutOfRange {
                    column,
                    fields: record.len(),
                })?;
        let value = field
            .trim()
            .parse()
            .map_err(|_| ScheduleError::MalformedNumericField {
                value: field.to_string(),
                row: i + 1,
            })?;
        values.push(value);
    }

    if values.len() < point_count {
        return Err(ScheduleError::RowCountMismatch {
            expected: point_count,
            found: values.len(),
        }
        .into());
    }

    Ok(values)
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
    fn test_read_file_schedule() {
        let object = parse_one(
            "Schedule:File, gains, Any Number, occupancy.csv, 2, 1, 8760, Comma, No, 60;",
        );
        let raw = read_file_schedule(&object).unwrap();
        assert_eq!(raw.id, "gains".into());
        assert_eq!(raw.path, PathBuf::from("occupancy.csv"));
        assert_eq!(raw.column, 2);
        assert_eq!(raw.header_rows, 1);
        assert_eq!(raw.point_count(), 8760);
        assert_eq!(raw.separator, Separator::Comma);
        assert!(!raw.interpolate);
    }

    #[test]
    fn test_read_file_schedule_defaults() {
        let object = parse_one("Schedule:File, gains, , data.csv, 1, 0;");
        let raw = read_file_schedule(&object).unwrap();
        assert_eq!(raw.hours_of_data, 8760);
        assert_eq!(raw.separator, Separator::Comma);
        assert_eq!(raw.minutes_per_item, 60);
        assert_eq!(raw.point_count(), 8760);
    }

    #[test]
    fn test_read_file_schedule_subhourly() {
        let object = parse_one("Schedule:File, gains, , data.csv, 1, 0, 8760, Tab, Yes, 15;");
        let raw = read_file_schedule(&object).unwrap();
        assert_eq!(raw.point_count(), 8760 * 4);
        assert!(raw.interpolate);
        assert_eq!(raw.separator, Separator::Tab);
    }

    #[test]
    fn test_read_file_schedule_invalid() {
        // Column numbers are 1-based
        let object = parse_one("Schedule:File, f, , data.csv, 0, 0;");
        assert!(read_file_schedule(&object).is_err());

        // Minutes per item must divide the hour
        let object = parse_one("Schedule:File, f, , data.csv, 1, 0, 8760, Comma, No, 7;");
        assert!(read_file_schedule(&object).is_err());

        // Unknown separator
        let object = parse_one("Schedule:File, f, , data.csv, 1, 0, 8760, Pipe;");
        assert!(read_file_schedule(&object).is_err());
    }

    #[test]
    fn test_read_series() {
        let data = "hour,value\n1,0.5\n2,0.75\n3,1.0\n";
        let values = read_series(data.as_bytes(), 2, 1, 3, Separator::Comma).unwrap();
        assert_eq!(values.len(), 3);
        assert_approx_eq!(f64, values[0], 0.5);
        assert_approx_eq!(f64, values[2], 1.0);
    }

    #[test]
    fn test_read_series_extra_rows_ignored() {
        let data = "1\n2\n3\n4\n";
        let values = read_series(data.as_bytes(), 1, 0, 2, Separator::Comma).unwrap();
        assert_eq!(values, [1.0, 2.0]);
    }

    #[test]
    fn test_read_series_row_count_mismatch() {
        let data = "header\n1.0\n2.0\n";
        let err = read_series(data.as_bytes(), 1, 1, 8760, Separator::Comma).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScheduleError>(),
            Some(&ScheduleError::RowCountMismatch {
                expected: 8760,
                found: 2
            })
        );
    }

    #[test]
    fn test_read_series_column_out_of_range() {
        let data = "1.0,2.0\n";
        let err = read_series(data.as_bytes(), 3, 0, 1, Separator::Comma).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScheduleError>(),
            Some(&ScheduleError::ColumnOutOfRange {
                column: 3,
                fields: 2
            })
        );
    }

    #[test]
    fn test_read_series_malformed_field() {
        let data = "1.0\nnot a number\n";
        let err = read_series(data.as_bytes(), 1, 0, 2, Separator::Comma).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScheduleError>(),
            Some(&ScheduleError::MalformedNumericField {
                value: "not a number".to_string(),
                row: 2
            })
        );
    }

    #[test]
    fn test_read_series_semicolon() {
        let data = "a;0.25\nb;0.5\n";
        let values = read_series(data.as_bytes(), 2, 0, 2, Separator::Semicolon).unwrap();
        assert_eq!(values, [0.25, 0.5]);
    }
}
