//! Fixed-width record decoder
//!
//! Slices one line into raw field values, provenance first. Values are never
//! trimmed or coerced. A line shorter than a field yields a truncated or empty
//! value for it; this is not an error.

use crate::schema::Schema;

/// One decoded record: provenance value followed by one value per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Provenance value (source file name without extension)
    pub fn source(&self) -> &str {
        &self.values[0]
    }

    /// Decoded field values, in schema order
    pub fn fields(&self) -> &[String] {
        &self.values[1..]
    }

    /// All values, provenance first, in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

impl AsRef<[String]> for Row {
    fn as_ref(&self) -> &[String] {
        &self.values
    }
}

/// Decodes lines against a schema.
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder<'a> {
    schema: &'a Schema,
    record_width: usize,
}

impl<'a> RecordDecoder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            record_width: schema.record_width(),
        }
    }

    /// Decodes one line. A trailing `\n` or `\r\n` is not part of the record.
    pub fn decode(&self, source: &str, line: &[u8]) -> Row {
        let line = strip_line_terminator(line);

        let mut values = Vec::with_capacity(self.schema.len() + 1);
        values.push(source.to_string());
        for field in self.schema.fields() {
            let raw = slice_field(line, field.offset, field.length);
            values.push(String::from_utf8_lossy(raw).into_owned());
        }

        Row { values }
    }

    /// Whether the line ends before the last field does.
    pub fn is_short(&self, line: &[u8]) -> bool {
        strip_line_terminator(line).len() < self.record_width
    }
}

/// `line[offset..offset + length]`, clamped to the line.
fn slice_field(line: &[u8], offset: usize, length: usize) -> &[u8] {
    let start = offset.min(line.len());
    let end = offset.saturating_add(length).min(line.len());
    &line[start..end]
}

/// Drops one trailing `\n` and a `\r` before it.
pub fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
