//! Reading and writing the `field: value` issue record format.
//!
//! An issue file is an append-only sequence of lines of the form
//! `<field>: <value>`. A line whose field is `+` continues the value of the
//! previous field on a new line. Reading a record keeps the latest value of
//! every field, positioned where the field was first seen.

use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use serde::Serialize;

/// Separator between a field name and its value.
pub const SEPARATOR: &str = ": ";

/// Field name marking a continuation line.
pub const CONTINUATION: &str = "+";

/// Fields every listed issue must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "title", "status", "description"];

/// Error type for record operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed record line {line}: expected '<field>: <value>', got {text:?}")]
    Malformed { line: usize, text: String },

    #[error("record line {line} continues a value but no field precedes it")]
    OrphanContinuation { line: usize },

    #[error("record is missing required field '{0}'")]
    MissingField(String),

    #[error("invalid field name {0:?}")]
    InvalidFieldName(String),
}

/// Result alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;

/// A single field of a record with its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// The no-meta view of an issue: fields in first-seen order, latest values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    /// Parses record text.
    ///
    /// Only the line terminator is stripped, so `description: ` keeps its
    /// empty value. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut record = Self::default();
        // Index into `fields` of the field the last line wrote to.
        let mut current: Option<usize> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.is_empty() {
                continue;
            }
            let (field, value) = split_line(line).ok_or_else(|| RecordError::Malformed {
                line: line_no,
                text: line.to_string(),
            })?;

            if field == CONTINUATION {
                let pos = current.ok_or(RecordError::OrphanContinuation { line: line_no })?;
                let slot = &mut record.fields[pos].value;
                slot.push('\n');
                slot.push_str(value);
            } else {
                current = Some(record.set(field, value));
            }
        }

        Ok(record)
    }

    /// Reads and parses a record file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Stores `value` for `name`, keeping the position of an existing field.
    ///
    /// Returns the index the field occupies.
    fn set(&mut self, name: &str, value: &str) -> usize {
        if let Some(pos) = self.fields.iter().position(|f| f.name == name) {
            self.fields[pos].value = value.to_string();
            pos
        } else {
            self.fields.push(Field {
                name: name.to_string(),
                value: value.to_string(),
            });
            self.fields.len() - 1
        }
    }

    /// Returns the current value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Returns the value of `name` or a [`RecordError::MissingField`].
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| RecordError::MissingField(name.to_string()))
    }

    /// Checks that all of [`REQUIRED_FIELDS`] are present.
    pub fn check_required(&self) -> Result<()> {
        for name in REQUIRED_FIELDS {
            self.require(name)?;
        }
        Ok(())
    }

    /// Iterates fields in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Splits a record line at the first `": "`.
///
/// A line that ends in `field:` (its trailing space removed by an editor) is
/// read as an empty value. Returns `None` for anything else without a
/// separator.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if let Some(split) = line.split_once(SEPARATOR) {
        return Some(split);
    }
    match line.strip_suffix(':') {
        Some(field) if !field.is_empty() && !field.contains(':') => Some((field, "")),
        _ => None,
    }
}

/// Checks that `name` can be written as a field name.
pub fn validate_field_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == CONTINUATION
        || name.contains(SEPARATOR)
        || name.contains('\n')
        || name.ends_with(':')
        || name.trim() != name;
    if invalid {
        return Err(RecordError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}

/// Renders one field as record text, newline-terminated.
///
/// Values spanning several lines become a first line followed by `+: `
/// continuation lines, so no line ever holds a raw newline.
pub fn format_field(name: &str, value: &str) -> Result<String> {
    validate_field_name(name)?;
    let mut out = String::new();
    let mut lines = value.split('\n');
    let first = lines.next().unwrap_or_default();
    out.push_str(name);
    out.push_str(SEPARATOR);
    out.push_str(first.trim_end_matches('\r'));
    out.push('\n');
    for line in lines {
        out.push_str(CONTINUATION);
        out.push_str(SEPARATOR);
        out.push_str(line.trim_end_matches('\r'));
        out.push('\n');
    }
    Ok(out)
}

/// Renders several fields in order.
pub fn format_fields<'a, I>(fields: I) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (name, value) in fields {
        out.push_str(&format_field(name, value)?);
    }
    Ok(out)
}

/// Appends rendered record text to `path`, creating the file if needed.
///
/// If the existing content does not end in a newline one is written first,
/// so the new lines never join the last existing line.
pub fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    let len = file.metadata()?.len();
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }

    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(())
}
