//! Common routines for parsing IDF input text.
//!
//! IDF is a flat textual format: comma-separated positional fields, records terminated by
//! `;`, with `!` starting a comment that runs to the end of the line (the `!-` field labels
//! seen in most files are just a comment style). Comments are not semantically significant.
//! Empty fields (consecutive commas) mean "use default / not applicable".
use anyhow::{Context, Result, bail, ensure};
use std::fs;
use std::path::Path;
use unicase::UniCase;

pub mod compact;
pub mod day;
pub mod fixed;
pub mod type_limits;
pub mod week;
pub mod year;

/// One IDF object record: a type name and its positional fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RawObject {
    /// The object type (e.g. "Schedule:Day:Interval"), case preserved
    pub type_name: String,
    /// The positional fields, trimmed, possibly empty
    pub fields: Vec<String>,
}

impl RawObject {
    /// Whether this object is of the given type (IDF type names are case-insensitive)
    pub fn is_type(&self, type_name: &str) -> bool {
        UniCase::new(self.type_name.as_str()) == UniCase::new(type_name)
    }

    /// The object's name (first field), which every schedule object carries
    pub fn name(&self) -> Result<&str> {
        let name = self.field(0).unwrap_or("");
        ensure!(!name.is_empty(), "{} object with no name", self.type_name);
        Ok(name)
    }

    /// The field at `index`, if present (may be empty)
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// The field at `index`, treating a missing or empty field as "not applicable"
    pub fn optional_field(&self, index: usize) -> Option<&str> {
        self.field(index).filter(|field| !field.is_empty())
    }

    /// The field at `index`, which must be present and non-empty
    pub fn required_field(&self, index: usize, what: &str) -> Result<&str> {
        self.optional_field(index)
            .with_context(|| format!("{} '{}': missing {}", self.type_name, self.name_lossy(), what))
    }

    /// The fields from `index` onwards
    pub fn fields_from(&self, index: usize) -> &[String] {
        self.fields.get(index..).unwrap_or(&[])
    }

    /// The object's name for error messages, without failing on anonymous objects
    fn name_lossy(&self) -> &str {
        self.field(0).unwrap_or("<unnamed>")
    }
}

/// Parse a numeric field, with the owning object named in any error
pub fn parse_numeric(value: &str, owner: &str, what: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("'{owner}': invalid {what}: '{value}'"))
}

/// Parse an "Interpolate to Timestep" field.
///
/// An empty or missing field means No; EnergyPlus accepts No, Yes, Linear and Average, and
/// everything except No turns interpolation on.
pub fn parse_interpolate(field: Option<&str>, owner: &str) -> Result<bool> {
    let field = match field {
        None => return Ok(false),
        Some(field) => field,
    };

    for (keyword, interpolate) in [("No", false), ("Yes", true), ("Linear", true), ("Average", true)]
    {
        if UniCase::new(field) == UniCase::new(keyword) {
            return Ok(interpolate);
        }
    }
    bail!("'{owner}': unknown interpolate option '{field}'")
}

/// Strip `!` comments from a line of IDF text
fn strip_comment(line: &str) -> &str {
    match line.find('!') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split a whole IDF document into object records.
///
/// Comments are stripped first, then the text splits into `;`-terminated records and each
/// record into comma-separated trimmed fields. Trailing text after the final `;` must be
/// blank.
pub fn parse_idf_objects(text: &str) -> Result<Vec<RawObject>> {
    let stripped: String = text
        .lines()
        .map(strip_comment)
        .collect::<Vec<_>>()
        .join("\n");

    let mut objects = Vec::new();
    let mut records = stripped.split(';').peekable();
    while let Some(record) = records.next() {
        // The chunk after the final ';' is not a record; it may only hold whitespace
        if records.peek().is_none() {
            ensure!(
                record.trim().is_empty(),
                "Unterminated object at end of input: '{}'",
                record.trim()
            );
            break;
        }

        if record.trim().is_empty() {
            continue;
        }

        let mut fields = record.split(',').map(|field| field.trim().to_string());
        // A record has at least one comma-less chunk
        let type_name = fields.next().unwrap();
        ensure!(!type_name.is_empty(), "Object record with no type name");
        objects.push(RawObject {
            type_name,
            fields: fields.collect(),
        });
    }

    Ok(objects)
}

/// Read and tokenize an IDF file
pub fn read_idf_file(file_path: &Path) -> Result<Vec<RawObject>> {
    let text = fs::read_to_string(file_path)
        .with_context(|| format!("Could not read {}", file_path.display()))?;
    parse_idf_objects(&text).with_context(|| format!("Error reading {}", file_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_idf_objects() {
        let text = "
ScheduleTypeLimits,
  Fractional,   !- Name
  0,            !- Lower Limit Value
  1,            !- Upper Limit Value
  Continuous;   !- Numeric Type

Schedule:Day:Interval, constant day, Fractional, No, 24:00, 0.5;
";
        let objects = parse_idf_objects(text).unwrap();
        assert_eq!(objects.len(), 2);

        assert!(objects[0].is_type("ScheduleTypeLimits"));
        assert!(objects[0].is_type("scheduletypelimits"));
        assert_eq!(objects[0].name().unwrap(), "Fractional");
        assert_eq!(objects[0].fields, ["Fractional", "0", "1", "Continuous"]);

        assert_eq!(
            objects[1].fields,
            ["constant day", "Fractional", "No", "24:00", "0.5"]
        );
    }

    #[test]
    fn test_empty_fields_are_preserved() {
        let objects = parse_idf_objects("Schedule:Day:Interval, d, , No, 24:00, 1;").unwrap();
        assert_eq!(objects[0].field(1), Some(""));
        assert_eq!(objects[0].optional_field(1), None);
        assert!(objects[0].required_field(1, "type limits").is_err());
        assert_eq!(objects[0].required_field(0, "name").unwrap(), "d");
    }

    #[test]
    fn test_comments_ignored() {
        let text = "! leading comment\nScheduleTypeLimits, t; ! trailing\n!- another\n";
        let objects = parse_idf_objects(text).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].name().unwrap(), "t");
    }

    #[test]
    fn test_unterminated_object() {
        assert!(parse_idf_objects("ScheduleTypeLimits, t").is_err());
    }

    #[test]
    fn test_fields_spanning_lines() {
        let objects = parse_idf_objects("Schedule:Week:Daily,\n w,\n d1,\n d2;").unwrap();
        assert_eq!(objects[0].fields, ["w", "d1", "d2"]);
        assert_eq!(objects[0].fields_from(1), ["d1", "d2"]);
        assert_eq!(objects[0].fields_from(5), Vec::<String>::new());
    }
}
