//! Module for additional computational capabilities
pub mod geometry;
pub mod test_helper;

/// Round a value to the given number of decimal digits. Negative digits round to tens, hundreds, ...
#[must_use]
pub fn round_to_digits(value: f64, digits: i32) -> f64 {
    let scale = 10.0_f64.powi(digits);
    (value * scale).round() / scale
}
