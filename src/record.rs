#![warn(missing_docs)]
//! Flat `key = value` parameter records.
//!
//! A record holds the complete parameter set of one beamline entity (a light source or an optical
//! element) at one point in time. On disk it is a plain text file with one `NAME = value` line per
//! field and without any header:
//!
//! ```text
//! FDISTR = 3
//! HDIV1 = 0.0000005
//! FILE_TRAJ = NONESPECIFIED
//! ```
//!
//! The loader prepends a synthetic section header and parses the text like a raw INI file
//! (case preserving keys, `=` or `:` as delimiter, `#`/`;` comment lines, indented continuation
//! lines). Blank lines inside a continued value are kept, trailing ones are dropped. Values are
//! untyped at rest; their type is recovered by [`FieldValue::sniff`].
use crate::{
    error::{BeamrecError, BrResult},
    field_value::{FieldValue, SniffPolicy},
};
use log::{debug, warn};
use regex::Regex;
use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::Path,
    sync::OnceLock,
};

/// Name of the section header prepended to the file content before parsing.
const SYNTHETIC_SECTION: &str = "parameters";

/// An ordered set of named field values.
///
/// Field names are unique. Inserting an existing name replaces its value but keeps the position of
/// the first insertion (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterRecord {
    entries: Vec<(String, FieldValue)>,
    /// position of each name in `entries`
    index: HashMap<String, usize>,
}
impl ParameterRecord {
    /// Insert a field value.
    ///
    /// Returns the previous value if a field with this name already existed.
    pub fn insert(&mut self, name: &str, value: FieldValue) -> Option<FieldValue> {
        if let Some(&idx) = self.index.get(name) {
            return Some(std::mem::replace(&mut self.entries[idx].1, value));
        }
        self.index.insert(name.to_owned(), self.entries.len());
        self.entries.push((name.to_owned(), value));
        None
    }
    /// Return the value of the field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.index.get(name).map(|&idx| &self.entries[idx].1)
    }
    /// Return `true` if a field with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    /// Returns the number of fields of this [`ParameterRecord`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    /// Returns `true` if this [`ParameterRecord`] has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Iterate over the fields in insertion (file) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
    /// Parse a record from the content of a record file.
    ///
    /// # Errors
    ///
    /// This function will return an [`BeamrecError::Parse`] if a line is neither a `key = value`
    /// entry, a comment, a section header nor a continuation line, or if a key is empty.
    pub fn from_record_str(file_content: &str, policy: SniffPolicy) -> BrResult<Self> {
        let mut record = Self::default();
        for (name, text) in raw_entries(file_content)? {
            record.insert(&name, FieldValue::sniff(&text, policy));
        }
        Ok(record)
    }
    /// Read a record from the file at the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the file does not exist or cannot be read ([`BeamrecError::Io`]).
    ///   - the content cannot be parsed ([`BeamrecError::Parse`]).
    pub fn from_file(path: &Path, policy: SniffPolicy) -> BrResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BeamrecError::Io(format!("cannot read file {} : {}", path.display(), e))
        })?;
        let record = Self::from_record_str(&contents, policy).map_err(|e| match e {
            BeamrecError::Parse(m) => BeamrecError::Parse(format!("{}: {m}", path.display())),
            other => other,
        })?;
        debug!("read {} fields from {}", record.len(), path.display());
        Ok(record)
    }
    /// Return the file content of this [`ParameterRecord`].
    #[must_use]
    pub fn to_record_bytes(&self) -> Vec<u8> {
        let mut output = Vec::new();
        for (name, value) in &self.entries {
            output.extend_from_slice(name.as_bytes());
            output.extend_from_slice(b" = ");
            output.extend_from_slice(&value.to_record_bytes());
            output.push(b'\n');
        }
        output
    }
    /// Write this [`ParameterRecord`] to a file at the given path.
    ///
    /// An existing file is overwritten.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: &Path) -> BrResult<()> {
        let mut output = File::create(path).map_err(|e| {
            BeamrecError::Io(format!(
                "could not create file path: {}: {}",
                path.display(),
                e
            ))
        })?;
        output.write_all(&self.to_record_bytes()).map_err(|e| {
            BeamrecError::Io(format!(
                "writing to file path {} failed: {}",
                path.display(),
                e
            ))
        })?;
        debug!("wrote {} fields to {}", self.len(), path.display());
        Ok(())
    }
}
impl<'a> IntoIterator for &'a ParameterRecord {
    type IntoIter = std::slice::Iter<'a, (String, FieldValue)>;
    type Item = &'a (String, FieldValue);
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Where continuation lines of the last entry go.
struct Continuation {
    /// index into the collected entries, `None` for an entry of a foreign section
    entry: Option<usize>,
    indent: usize,
}

/// Compile `pattern` on first use and keep it in `cell`.
fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> BrResult<&'static Regex> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern)
        .map_err(|e| BeamrecError::Other(format!("invalid pattern {pattern}: {e}")))?;
    Ok(cell.get_or_init(|| re))
}

/// Split the file content into raw `(key, value)` pairs of the synthetic section.
fn raw_entries(file_content: &str) -> BrResult<Vec<(String, String)>> {
    static SECTION_RE: OnceLock<Regex> = OnceLock::new();
    static OPTION_RE: OnceLock<Regex> = OnceLock::new();
    let section_re = cached_regex(&SECTION_RE, r"^\[(?P<header>.+)\]")?;
    let option_re = cached_regex(&OPTION_RE, r"^(?P<option>.*?)\s*[=:]\s*(?P<value>.*)$")?;

    let content = format!("[{SYNTHETIC_SECTION}]\n{file_content}");
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut in_synthetic_section = false;
    let mut continuation: Option<Continuation> = None;
    // line 0 is the synthetic header, so indices are the line numbers of the stored file
    for (line_nr, line) in content.lines().enumerate() {
        let stripped = line.trim();
        if stripped.is_empty() {
            // blank lines belong to the value being continued
            if let Some(idx) = continuation.as_ref().and_then(|c| c.entry) {
                entries[idx].1.push('\n');
            }
            continue;
        }
        if stripped.starts_with('#') || stripped.starts_with(';') {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        if let Some(cont) = &continuation {
            if indent > cont.indent {
                if let Some(idx) = cont.entry {
                    let value = &mut entries[idx].1;
                    value.push('\n');
                    value.push_str(stripped);
                }
                continue;
            }
        }
        if let Some(caps) = section_re.captures(stripped) {
            let header = &caps["header"];
            if line_nr == 0 {
                in_synthetic_section = true;
            } else {
                in_synthetic_section = false;
                warn!("ignoring entries of section [{header}] found in line {line_nr}");
            }
            continuation = None;
            continue;
        }
        let Some(caps) = option_re.captures(stripped) else {
            return Err(BeamrecError::Parse(format!(
                "line {line_nr}: expected 'key = value' but found '{stripped}'"
            )));
        };
        let name = caps["option"].trim_end();
        if name.is_empty() {
            return Err(BeamrecError::Parse(format!(
                "line {line_nr}: empty field name"
            )));
        }
        let value = caps["value"].trim();
        let entry = if in_synthetic_section {
            if let Some(&idx) = positions.get(name) {
                entries[idx].1 = value.to_owned();
                Some(idx)
            } else {
                positions.insert(name.to_owned(), entries.len());
                entries.push((name.to_owned(), value.to_owned()));
                Some(entries.len() - 1)
            }
        } else {
            None
        };
        continuation = Some(Continuation { entry, indent });
    }
    for (_, value) in &mut entries {
        value.truncate(value.trim_end().len());
    }
    Ok(entries)
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_helper::test_helper::check_warnings;
    use assert_matches::assert_matches;
    use tempfile::NamedTempFile;

    #[test]
    fn insert_and_get() {
        let mut record = ParameterRecord::default();
        assert!(record.is_empty());
        assert_eq!(record.insert("NPOINT", 5000.into()), None);
        assert_eq!(record.insert("PH1", 1000.0.into()), None);
        assert_eq!(
            record.insert("NPOINT", 100.into()),
            Some(FieldValue::Int(5000))
        );
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("NPOINT"), Some(&FieldValue::Int(100)));
        assert!(record.contains("PH1"));
        assert!(!record.contains("PH2"));
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["NPOINT", "PH1"]);
    }
    #[test]
    fn parse_basic() {
        let record = ParameterRecord::from_record_str(
            "FDISTR = 3\nHDIV1=0.5\nFILE_REFL   =   Pt.dat  \n",
            SniffPolicy::Standard,
        )
        .unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("FDISTR"), Some(&FieldValue::Int(3)));
        assert_eq!(record.get("HDIV1"), Some(&FieldValue::Float(0.5)));
        assert_eq!(record.get("FILE_REFL"), Some(&FieldValue::from("Pt.dat")));
    }
    #[test]
    fn parse_keeps_case() {
        let record =
            ParameterRecord::from_record_str("Kv = 1.9\nkv = 0.0", SniffPolicy::Standard).unwrap();
        assert_eq!(record.get("Kv"), Some(&FieldValue::Float(1.9)));
        assert_eq!(record.get("kv"), Some(&FieldValue::Float(0.0)));
    }
    #[test]
    fn parse_empty() {
        let record = ParameterRecord::from_record_str("", SniffPolicy::Standard).unwrap();
        assert!(record.is_empty());
        let record =
            ParameterRecord::from_record_str("\n\n# only a comment\n", SniffPolicy::Standard)
                .unwrap();
        assert!(record.is_empty());
    }
    #[test]
    fn parse_first_delimiter_splits() {
        let record = ParameterRecord::from_record_str(
            "A: b = c\nB = x:y\nC =\n",
            SniffPolicy::Standard,
        )
        .unwrap();
        assert_eq!(record.get("A"), Some(&FieldValue::from("b = c")));
        assert_eq!(record.get("B"), Some(&FieldValue::from("x:y")));
        assert_eq!(record.get("C"), Some(&FieldValue::from("")));
    }
    #[test]
    fn parse_comments_and_crlf() {
        let record = ParameterRecord::from_record_str(
            "# header comment\r\nA = 1\r\n; other comment\r\nB = 2\r\n",
            SniffPolicy::Standard,
        )
        .unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("B"), Some(&FieldValue::Int(2)));
    }
    #[test]
    fn parse_continuation() {
        let record = ParameterRecord::from_record_str(
            "TITLE = first\n   second\nNEXT = 1\n",
            SniffPolicy::Standard,
        )
        .unwrap();
        assert_eq!(record.get("TITLE"), Some(&FieldValue::from("first\nsecond")));
        assert_eq!(record.get("NEXT"), Some(&FieldValue::Int(1)));
    }
    #[test]
    fn parse_continuation_keeps_blank_lines() {
        let record = ParameterRecord::from_record_str(
            "A = x\n\n  B = 1\nC = 2\n\n\nD = 3\n",
            SniffPolicy::Standard,
        )
        .unwrap();
        assert_eq!(record.get("A"), Some(&FieldValue::from("x\n\nB = 1")));
        assert!(!record.contains("B"));
        assert_eq!(record.get("C"), Some(&FieldValue::Int(2)));
        assert_eq!(record.get("D"), Some(&FieldValue::Int(3)));
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
    }
    #[test]
    fn regexes_are_reused() {
        for _ in 0..3 {
            let record =
                ParameterRecord::from_record_str("[x]\nA = 1\n", SniffPolicy::Standard).unwrap();
            assert!(record.is_empty());
        }
    }
    #[test]
    fn many_fields() {
        let content: String = (0..2000).map(|i| format!("F{i} = {i}\n")).collect();
        let record = ParameterRecord::from_record_str(&content, SniffPolicy::Standard).unwrap();
        assert_eq!(record.len(), 2000);
        assert_eq!(record.get("F1999"), Some(&FieldValue::Int(1999)));
        let mut copy = record.clone();
        assert_eq!(copy.insert("F0", 7.into()), Some(FieldValue::Int(0)));
        assert_eq!(copy.iter().next(), Some(("F0", &FieldValue::Int(7))));
    }
    #[test]
    fn parse_duplicate_last_wins() {
        let record = ParameterRecord::from_record_str(
            "A = 1\nB = 2\nA = abc\n",
            SniffPolicy::Standard,
        )
        .unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("A"), Some(&FieldValue::from("abc")));
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
    #[test]
    fn parse_errors() {
        assert_eq!(
            ParameterRecord::from_record_str("A = 1\nno delimiter here", SniffPolicy::Standard),
            Err(BeamrecError::Parse(
                "line 2: expected 'key = value' but found 'no delimiter here'".into()
            ))
        );
        assert_eq!(
            ParameterRecord::from_record_str("= 5", SniffPolicy::Standard),
            Err(BeamrecError::Parse("line 1: empty field name".into()))
        );
    }
    #[test]
    fn parse_foreign_section() {
        testing_logger::setup();
        let record = ParameterRecord::from_record_str(
            "A = 1\n[other]\nB = 2\n",
            SniffPolicy::Standard,
        )
        .unwrap();
        assert_eq!(record.len(), 1);
        assert!(!record.contains("B"));
        check_warnings(vec!["ignoring entries of section [other] found in line 2"]);
    }
    #[test]
    fn file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parameters_start_missing.dat");
        assert_matches!(
            ParameterRecord::from_file(&path, SniffPolicy::Standard),
            Err(BeamrecError::Io(_))
        );
    }
    #[test]
    fn parse_error_names_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "broken").unwrap();
        let err = ParameterRecord::from_file(file.path(), SniffPolicy::Standard).unwrap_err();
        assert_matches!(err, BeamrecError::Parse(m) if m.contains("line 1"));
    }
    #[test]
    fn to_record_bytes() {
        let mut record = ParameterRecord::default();
        record.insert("NPOINT", 5000.into());
        record.insert("PH1", 1000.0.into());
        record.insert("FILE_TRAJ", "NONESPECIFIED".into());
        assert_eq!(
            String::from_utf8(record.to_record_bytes()).unwrap(),
            "NPOINT = 5000\nPH1 = 1000.0\nFILE_TRAJ = NONESPECIFIED\n"
        );
    }
    #[test]
    fn save_and_read() {
        let mut record = ParameterRecord::default();
        record.insert("NPOINT", 42.into());
        record.insert("SIGMAX", 0.0012.into());
        record.insert("NEG", (-3.5).into());
        record.insert("CRYSTAL", "Si111".into());
        let file = NamedTempFile::new().unwrap();
        record.save_to_file(file.path()).unwrap();
        let loaded = ParameterRecord::from_file(file.path(), SniffPolicy::Standard).unwrap();
        assert_eq!(loaded, record);
    }
    #[test]
    fn save_to_invalid_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("record.dat");
        assert_matches!(
            ParameterRecord::default().save_to_file(&path),
            Err(BeamrecError::Io(_))
        );
    }
}
