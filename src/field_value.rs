#![warn(missing_docs)]
//! Typed values of record fields.
//!
//! Values are stored untyped in a record file. Their kind is recovered from the text alone by an
//! ordered chain of parsers: integer first, then floating point, and finally an opaque byte string.
//! Sniffing never fails: anything which is not recognized as a number ends up as [`FieldValue::Bytes`].
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use strum::EnumIter;

/// The value of a single field of a parameter record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// a signed integer
    Int(i64),
    /// a floating point number
    Float(f64),
    /// an opaque byte string (labels, symbols, file names, flags)
    Bytes(Vec<u8>),
}

/// The kind of a [`FieldValue`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum FieldKind {
    /// signed integer
    Int,
    /// floating point number
    Float,
    /// opaque byte string
    Bytes,
}
impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bytes => write!(f, "bytes"),
        }
    }
}

/// Strategy used for recognizing floating point values.
///
/// Both policies recognize integers the same way (a non-empty string of decimal digits) and both
/// fall back to [`FieldValue::Bytes`] for anything else.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum SniffPolicy {
    /// Decimal numbers with an optional leading `-`, at most one `.` and an optional exponent
    /// (`e` or `E`, optionally signed).
    #[default]
    Standard,
    /// The historic heuristic: remove the first `.`, the first `-` and the first `E` and accept the
    /// value if only decimal digits remain. Negative mantissas with negative exponents (`-1.2E-3`)
    /// and lowercase exponents (`1e5`) are not recognized.
    Legacy,
}
impl Display for SniffPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl FieldValue {
    /// Recover a typed value from its textual representation.
    ///
    /// The parsers are tried in order: [`parse_int`], [`parse_float`] and finally the text is kept as
    /// a byte string.
    #[must_use]
    pub fn sniff(text: &str, policy: SniffPolicy) -> Self {
        if let Some(value) = parse_int(text) {
            return Self::Int(value);
        }
        if let Some(value) = parse_float(text, policy) {
            return Self::Float(value);
        }
        Self::Bytes(text.as_bytes().to_vec())
    }
    /// Returns the [`FieldKind`] of this [`FieldValue`].
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::Bytes(_) => FieldKind::Bytes,
        }
    }
    /// Returns the text written to a record file for this value.
    ///
    /// Floats always carry a decimal point so that they are not read back as integers.
    #[must_use]
    pub fn to_record_bytes(&self) -> Vec<u8> {
        match self {
            Self::Int(value) => value.to_string().into_bytes(),
            Self::Float(value) => format_float(*value).into_bytes(),
            Self::Bytes(value) => value.clone(),
        }
    }
}
impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{}", format_float(*value)),
            Self::Bytes(value) => write!(f, "{}", String::from_utf8_lossy(value)),
        }
    }
}
impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}
impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Bytes(value.as_bytes().to_vec())
    }
}
impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}
impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
fn is_digits_or_empty(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}
/// Parse a value consisting solely of decimal digits.
///
/// Returns `None` for anything else, including a leading sign and values exceeding the `i64` range.
#[must_use]
pub fn parse_int(text: &str) -> Option<i64> {
    if is_all_digits(text) {
        text.parse().ok()
    } else {
        None
    }
}
/// Parse a floating point value following the given [`SniffPolicy`].
///
/// Strings accepted by the policy's shape check but rejected by the number parser (e.g. `1-2` under
/// [`SniffPolicy::Legacy`]) return `None`.
#[must_use]
pub fn parse_float(text: &str, policy: SniffPolicy) -> Option<f64> {
    let shape_ok = match policy {
        SniffPolicy::Standard => has_float_shape(text),
        SniffPolicy::Legacy => has_legacy_float_shape(text),
    };
    if !shape_ok {
        return None;
    }
    let value = text.parse::<f64>().ok();
    if value.is_none() {
        debug!("value '{text}' looks numeric but is not a number, keeping it as bytes");
    }
    value
}
fn has_float_shape(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = unsigned
        .find(['e', 'E'])
        .map_or((unsigned, None), |idx| {
            (&unsigned[..idx], Some(&unsigned[idx + 1..]))
        });
    let mantissa_ok = mantissa.split_once('.').map_or_else(
        || is_all_digits(mantissa),
        |(int_part, frac_part)| {
            !(int_part.is_empty() && frac_part.is_empty())
                && is_digits_or_empty(int_part)
                && is_digits_or_empty(frac_part)
        },
    );
    let exponent_ok = exponent.map_or(true, |exp| {
        is_all_digits(exp.strip_prefix(['+', '-']).unwrap_or(exp))
    });
    mantissa_ok && exponent_ok
}
fn has_legacy_float_shape(text: &str) -> bool {
    let stripped = text
        .replacen('.', "", 1)
        .replacen('-', "", 1)
        .replacen('E', "", 1);
    is_all_digits(&stripped)
}
fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    use strum::IntoEnumIterator;
    #[test]
    fn sniff_int() {
        assert_eq!(FieldValue::sniff("42", SniffPolicy::Standard), FieldValue::Int(42));
        assert_eq!(FieldValue::sniff("0", SniffPolicy::Legacy), FieldValue::Int(0));
        assert_eq!(
            FieldValue::sniff("007", SniffPolicy::Standard),
            FieldValue::Int(7)
        );
    }
    #[test]
    fn sniff_int_overflow() {
        assert_matches!(
            FieldValue::sniff("99999999999999999999", SniffPolicy::Standard),
            FieldValue::Float(_)
        );
    }
    #[test]
    fn sniff_float() {
        for policy in SniffPolicy::iter() {
            assert_eq!(FieldValue::sniff("3.5", policy), FieldValue::Float(3.5));
            assert_eq!(FieldValue::sniff("-3.5", policy), FieldValue::Float(-3.5));
            assert_eq!(FieldValue::sniff("1E10", policy), FieldValue::Float(1E10));
            assert_eq!(FieldValue::sniff("-5", policy), FieldValue::Float(-5.0));
            assert_eq!(
                FieldValue::sniff("1.0000000000000000E-002", policy),
                FieldValue::Float(0.01)
            );
        }
        assert_eq!(
            FieldValue::sniff("-1.2E-3", SniffPolicy::Standard),
            FieldValue::Float(-1.2E-3)
        );
        assert_eq!(
            FieldValue::sniff("2.5e+3", SniffPolicy::Standard),
            FieldValue::Float(2500.0)
        );
        assert_eq!(
            FieldValue::sniff(".5", SniffPolicy::Standard),
            FieldValue::Float(0.5)
        );
    }
    #[test]
    fn sniff_legacy_quirks() {
        assert_eq!(
            FieldValue::sniff("-1.2E-3", SniffPolicy::Legacy),
            FieldValue::Bytes(b"-1.2E-3".to_vec())
        );
        assert_eq!(
            FieldValue::sniff("1e5", SniffPolicy::Legacy),
            FieldValue::Bytes(b"1e5".to_vec())
        );
        assert_eq!(
            FieldValue::sniff("1-2", SniffPolicy::Legacy),
            FieldValue::Bytes(b"1-2".to_vec())
        );
        assert_eq!(
            FieldValue::sniff("1E-3", SniffPolicy::Legacy),
            FieldValue::Float(1E-3)
        );
    }
    #[test]
    fn sniff_bytes() {
        for policy in SniffPolicy::iter() {
            assert_eq!(
                FieldValue::sniff("Si111", policy),
                FieldValue::Bytes(b"Si111".to_vec())
            );
            assert_eq!(
                FieldValue::sniff("abc", policy),
                FieldValue::Bytes(b"abc".to_vec())
            );
            assert_eq!(FieldValue::sniff("", policy), FieldValue::Bytes(vec![]));
        }
    }
    #[test]
    fn sniff_ambiguous_falls_back_to_bytes() {
        for policy in SniffPolicy::iter() {
            assert_eq!(
                FieldValue::sniff("1.2.3", policy),
                FieldValue::Bytes(b"1.2.3".to_vec())
            );
            assert_eq!(
                FieldValue::sniff("--5", policy),
                FieldValue::Bytes(b"--5".to_vec())
            );
            assert_eq!(
                FieldValue::sniff("1E2E3", policy),
                FieldValue::Bytes(b"1E2E3".to_vec())
            );
            assert_eq!(
                FieldValue::sniff("-", policy),
                FieldValue::Bytes(b"-".to_vec())
            );
            assert_eq!(
                FieldValue::sniff("+5", policy),
                FieldValue::Bytes(b"+5".to_vec())
            );
        }
    }
    #[test]
    fn parse_int_rejects_sign() {
        assert_eq!(parse_int("-1"), None);
        assert_eq!(parse_int("+1"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("12"), Some(12));
    }
    #[test]
    fn kind() {
        assert_eq!(FieldValue::Int(1).kind(), FieldKind::Int);
        assert_eq!(FieldValue::Float(1.0).kind(), FieldKind::Float);
        assert_eq!(FieldValue::from("a").kind(), FieldKind::Bytes);
    }
    #[test]
    fn record_bytes() {
        assert_eq!(FieldValue::Int(12).to_record_bytes(), b"12");
        assert_eq!(FieldValue::Float(1.0).to_record_bytes(), b"1.0");
        assert_eq!(FieldValue::Float(-0.25).to_record_bytes(), b"-0.25");
        assert_eq!(FieldValue::Float(1e-7).to_record_bytes(), b"0.0000001");
        assert_eq!(FieldValue::Float(f64::NAN).to_record_bytes(), b"NaN");
        assert_eq!(FieldValue::from("Pt.dat").to_record_bytes(), b"Pt.dat");
    }
    #[test]
    fn written_floats_sniff_back_as_floats() {
        for value in [0.0, 1.0, -2.0, 0.1, -1.2e-3, 2.5e10, 1e-9] {
            let text = format_float(value);
            for policy in SniffPolicy::iter() {
                assert_eq!(FieldValue::sniff(&text, policy), FieldValue::Float(value));
            }
        }
    }
    #[test]
    fn display() {
        assert_eq!(format!("{}", FieldValue::Int(3)), "3");
        assert_eq!(format!("{}", FieldValue::Float(3.0)), "3.0");
        assert_eq!(format!("{}", FieldValue::from("GAAS.SHA")), "GAAS.SHA");
        assert_eq!(format!("{}", FieldKind::Bytes), "bytes");
        assert_eq!(format!("{}", SniffPolicy::Legacy), "legacy");
    }
}
