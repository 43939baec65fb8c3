//! Planar geometry helpers used for motor and axis-system bookkeeping.
use nalgebra::{Point2, Rotation2};

/// Map a negative angle (in degrees) into the positive range by adding a full turn.
///
/// Non-negative angles are returned unchanged. Only a single turn is added, so angles below
/// `-360°` stay negative.
#[must_use]
pub fn normalise_angle(angle: f64) -> f64 {
    if angle < 0.0 {
        360.0 + angle
    } else {
        angle
    }
}
/// Rotate a point counter-clockwise by a given angle (in degrees) around a given origin.
#[must_use]
pub fn rotate(origin: Point2<f64>, point: Point2<f64>, angle: f64) -> Point2<f64> {
    let rotation = Rotation2::new(normalise_angle(angle).to_radians());
    origin + rotation * (point - origin)
}
