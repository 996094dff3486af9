//! Data dictionary parser
//!
//! A dictionary is a SAS input script. Field declarations look like
//!
//! ```text
//!   @ 1    PUBCSNUM    $char8.   /* Patient ID */
//!   @ 24   AGE_DX      3.        /* Age at diagnosis */
//! ```
//!
//! i.e. `@ <1-based offset> <NAME> <type prefix><length>. /* description */`.
//! Every other line (comments, labels, format statements) is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::{debug, trace};

use super::errors::{DictionaryError, DictionaryResult};
use crate::schema::FieldDescriptor;

const DECLARATION_PATTERN: &str =
    r"^\s*@\s*(\d+)\s+([A-Za-z0-9_]+)\s+\$?[A-Za-z]*(\d+)\.\s*(?:/\*\s*(.*?)\s*\*/)?";

/// Parses dictionary documents into ordered field descriptors.
///
/// The declaration pattern is compiled once per parser.
#[derive(Debug, Clone)]
pub struct DictionaryParser {
    pattern: Regex,
}

impl Default for DictionaryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryParser {
    pub fn new() -> Self {
        let pattern =
            Regex::new(DECLARATION_PATTERN).expect("declaration pattern is a valid literal");
        Self { pattern }
    }

    /// Parses the dictionary at `path`.
    pub fn parse_file(&self, path: &Path) -> DictionaryResult<Vec<FieldDescriptor>> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| DictionaryError::Read {
            origin: origin.clone(),
            source: e,
        })?;
        self.parse_reader(BufReader::new(file), &origin)
    }

    /// Parses a dictionary from any buffered reader.
    ///
    /// `origin` names the document in errors. A document that declares no
    /// field is an error.
    pub fn parse_reader<R: BufRead>(
        &self,
        reader: R,
        origin: &str,
    ) -> DictionaryResult<Vec<FieldDescriptor>> {
        let mut fields = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| DictionaryError::Read {
                origin: origin.to_string(),
                source: e,
            })?;

            if let Some(field) = self.parse_line(&line, index + 1)? {
                trace!(name = %field.name, offset = field.offset, length = field.length, "field declared");
                fields.push(field);
            }
        }

        if fields.is_empty() {
            return Err(DictionaryError::Empty(origin.to_string()));
        }

        debug!(origin, fields = fields.len(), "dictionary parsed");
        Ok(fields)
    }

    /// Parses one line. Returns `None` for lines that declare no field.
    ///
    /// `line_number` is 1-based and only used in errors.
    pub fn parse_line(
        &self,
        line: &str,
        line_number: usize,
    ) -> DictionaryResult<Option<FieldDescriptor>> {
        let caps = match self.pattern.captures(line) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let raw_offset = &caps[1];
        let offset = raw_offset
            .parse::<usize>()
            .ok()
            .and_then(|o| o.checked_sub(1))
            .ok_or_else(|| DictionaryError::InvalidOffset {
                line: line_number,
                value: raw_offset.to_string(),
            })?;

        let raw_length = &caps[3];
        let length = raw_length
            .parse::<usize>()
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| DictionaryError::InvalidLength {
                line: line_number,
                value: raw_length.to_string(),
            })?;
        if offset.checked_add(length).is_none() {
            return Err(DictionaryError::InvalidOffset {
                line: line_number,
                value: raw_offset.to_string(),
            });
        }

        let mut field = FieldDescriptor::new(offset, &caps[2], length);
        if let Some(description) = caps.get(4).map(|m| m.as_str()).filter(|d| !d.is_empty()) {
            field = field.with_description(description);
        }

        Ok(Some(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(doc: &str) -> DictionaryResult<Vec<FieldDescriptor>> {
        DictionaryParser::new().parse_reader(doc.as_bytes(), "<test>")
    }

    #[test]
    fn test_registry_declarations() {
        let doc = "\
filename seer9 'breast.txt';
data in;
  infile seer9 lrecl=358;
  input
  @ 1   PUBCSNUM         $char8.  /* Patient ID */
  @ 9   REG              $char10. /* SEER registry */
  @ 24  AGE_DX           $char3.  /* Age at diagnosis */
  ;
";
        let fields = parse(doc).unwrap();
        assert_eq!(fields.len(), 3);

        assert_eq!(fields[0].offset, 0);
        assert_eq!(fields[0].name, "PUBCSNUM");
        assert_eq!(fields[0].length, 8);
        assert_eq!(fields[0].description.as_deref(), Some("Patient ID"));

        assert_eq!(fields[1].offset, 8);
        assert_eq!(fields[1].length, 10);
        assert_eq!(fields[2].offset, 23);
        assert_eq!(fields[2].name, "AGE_DX");
    }

    #[test]
    fn test_numeric_format_without_prefix() {
        let doc = "@ 1 AGE_DX 3. /* age */\n@ 4 YEAR 4. /* year */\n";
        let fields = parse(doc).unwrap();
        assert_eq!(fields[0], FieldDescriptor::new(0, "AGE_DX", 3).with_description("age"));
        assert_eq!(fields[1], FieldDescriptor::new(3, "YEAR", 4).with_description("year"));
    }

    #[test]
    fn test_description_is_optional() {
        let fields = parse("  @ 5 GRADE $char1.\n").unwrap();
        assert_eq!(fields[0].description, None);
        assert_eq!(fields[0].offset, 4);
    }

    #[test]
    fn test_non_field_lines_skipped() {
        let doc = "\
/* header comment */

label PUBCSNUM = 'Patient ID';
  @ 1 PUBCSNUM $char8. /* Patient ID */
format AGE_DX 3.;
  @ 9 REG $char10. /* registry */
run;
";
        assert_eq!(parse(doc).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_document_is_error() {
        let err = parse("/* nothing */\nrun;\n").unwrap_err();
        assert!(matches!(err, DictionaryError::Empty(_)));
        assert!(!err.is_io());
    }

    #[test]
    fn test_zero_offset_rejected() {
        let err = parse("@ 0 REG $char2. /* x */\n").unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidOffset { line: 1, .. }));
    }

    #[test]
    fn test_offset_past_addressable_range_rejected() {
        let doc = format!("@ 1 REG $char2.\n@ {} AGE_DX 3. /* x */\n", usize::MAX);
        let err = parse(&doc).unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidOffset { line: 2, .. }));
        assert_eq!(err.code(), "SEER_DICTIONARY_INVALID_OFFSET");
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = parse("\n@ 1 REG $char0. /* x */\n").unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidLength { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DictionaryParser::new()
            .parse_file(Path::new("/nonexistent/read.seer.sas"))
            .unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.code(), "SEER_DICTIONARY_READ_FAILED");
    }
}
