#![warn(missing_docs)]
//! Motor resolutions of the focusing optics and the defaults of the KB mirror optimization.
//!
//! Resolutions are stored in the native units of the motors (mm for translations, degrees for
//! rotations) and converted on request.
use crate::{
    error::{BeamrecError, BrResult},
    utils::round_to_digits,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::EnumIter;
use uom::si::{
    angle::{degree, radian},
    f64::{Angle, Length},
    length::{micrometer, millimeter},
};

/// A motor resolution together with the number of decimal digits positions are rounded to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// smallest step of the motor
    pub value: f64,
    /// number of decimal digits
    pub digits: i32,
}
impl Resolution {
    /// Creates a new [`Resolution`].
    #[must_use]
    pub const fn new(value: f64, digits: i32) -> Self {
        Self { value, digits }
    }
}
/// Units of translational motors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum DistanceUnits {
    /// millimeters (native unit)
    Millimeters,
    /// micrometers
    #[default]
    Microns,
}
/// Units of rotational motors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum AngularUnits {
    /// degrees (native unit)
    Degrees,
    /// milliradians
    #[default]
    Milliradians,
    /// radians
    Radians,
}
/// Translational motors of the focusing optics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum TranslationMotor {
    /// coherence slits
    CoherenceSlits,
    /// vertical KB mirror, benders 1 & 2
    VkbBender,
    /// vertical KB mirror, translation (motor 4)
    VkbTranslation,
    /// horizontal KB mirror, benders 1 & 2
    HkbBender,
    /// horizontal KB mirror, translation (motor 4)
    HkbTranslation,
}
/// Rotational motors of the focusing optics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum RotationMotor {
    /// vertical KB mirror, pitch (motor 3)
    VkbPitch,
    /// horizontal KB mirror, pitch (motor 3)
    HkbPitch,
}

/// The resolutions of all motors of the focusing optics.
///
/// Missing entries in a deserialized value keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorResolution {
    /// coherence slits [mm]
    pub coh_slits: Resolution,
    /// vertical KB benders [mm]
    pub vkb_bender: Resolution,
    /// vertical KB pitch [deg]
    pub vkb_pitch: Resolution,
    /// vertical KB translation [mm]
    pub vkb_translation: Resolution,
    /// horizontal KB benders [mm]
    pub hkb_bender: Resolution,
    /// horizontal KB pitch [deg]
    pub hkb_pitch: Resolution,
    /// horizontal KB translation [mm]
    pub hkb_translation: Resolution,
}
impl Default for MotorResolution {
    fn default() -> Self {
        Self {
            coh_slits: Resolution::new(1e-7, 7),
            vkb_bender: Resolution::new(1e-7, 7),
            vkb_pitch: Resolution::new(1e-4, 4),
            vkb_translation: Resolution::new(1e-3, 3),
            hkb_bender: Resolution::new(1e-7, 7),
            hkb_pitch: Resolution::new(1e-4, 4),
            hkb_translation: Resolution::new(1e-3, 3),
        }
    }
}
impl MotorResolution {
    /// Returns the resolution of a translational motor in the given units.
    #[must_use]
    pub fn translational(&self, motor: TranslationMotor, units: DistanceUnits) -> Resolution {
        let native = match motor {
            TranslationMotor::CoherenceSlits => self.coh_slits,
            TranslationMotor::VkbBender => self.vkb_bender,
            TranslationMotor::VkbTranslation => self.vkb_translation,
            TranslationMotor::HkbBender => self.hkb_bender,
            TranslationMotor::HkbTranslation => self.hkb_translation,
        };
        match units {
            DistanceUnits::Millimeters => native,
            DistanceUnits::Microns => Resolution::new(
                Length::new::<millimeter>(native.value).get::<micrometer>(),
                native.digits - 3,
            ),
        }
    }
    /// Returns the resolution of a rotational motor in the given units.
    #[must_use]
    pub fn rotational(&self, motor: RotationMotor, units: AngularUnits) -> Resolution {
        let native = match motor {
            RotationMotor::VkbPitch => self.vkb_pitch,
            RotationMotor::HkbPitch => self.hkb_pitch,
        };
        let in_radians = Angle::new::<degree>(native.value).get::<radian>();
        match units {
            AngularUnits::Degrees => native,
            AngularUnits::Milliradians => Resolution::new(1e3 * in_radians, native.digits - 1),
            AngularUnits::Radians => Resolution::new(in_radians, native.digits + 2),
        }
    }
}

/// Kind of a motor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Movement {
    /// move to the given position
    Absolute,
    /// move by the given offset
    Relative,
}
/// Compute the target position of a motor movement, rounded to the digits of its resolution.
///
/// # Errors
///
/// This function will return an error if the resulting position is not finite.
pub fn move_to(current: f64, value: f64, movement: Movement, resolution: Resolution) -> BrResult<f64> {
    let target = match movement {
        Movement::Absolute => value,
        Movement::Relative => current + value,
    };
    if !target.is_finite() {
        return Err(BeamrecError::Motor(format!(
            "invalid target position {target}"
        )));
    }
    Ok(round_to_digits(target, resolution.digits))
}

/// Tolerances of the loss functions of the optimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossTolerances {
    /// beam centroid
    pub centroid: f64,
    /// full width at half maximum
    pub fwhm: f64,
    /// peak intensity (`-inf`: never converged on)
    pub peak_intensity: f64,
}
impl Default for LossTolerances {
    fn default() -> Self {
        Self {
            centroid: 2e-4,
            fwhm: 2e-4,
            peak_intensity: f64::NEG_INFINITY,
        }
    }
}
/// Defaults of the KB mirror optimization, keyed by the short motor names (`hkb_4`, `vkb_3`, ...).
///
/// Translations (`*_4`) are in µm, pitches (`*_3`) in mrad, the `q` distances and benders (`*_1_2`) in mm.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationDefaults {
    movement_ranges: BTreeMap<String, [f64; 2]>,
    motor_resolutions: BTreeMap<String, f64>,
    loss_tolerances: LossTolerances,
}
impl OptimizationDefaults {
    /// Creates the [`OptimizationDefaults`] based on the given [`MotorResolution`].
    #[must_use]
    pub fn new(resolution: &MotorResolution) -> Self {
        let ranges = [
            ("hkb_4", [-0.2, 0.2]),
            ("vkb_4", [-0.2, 0.2]),
            ("hkb_3", [-100.0, 100.0]),
            ("vkb_3", [-100.0, 100.0]),
            ("hkb_q", [-20.0, 20.0]),
            ("vkb_q", [-20.0, 20.0]),
            ("hkb_1_2", [-5.0, 5.0]),
            ("vkb_1_2", [-5.0, 5.0]),
        ];
        let resolutions = [
            (
                "hkb_4",
                resolution
                    .translational(TranslationMotor::HkbTranslation, DistanceUnits::Microns)
                    .value,
            ),
            (
                "vkb_4",
                resolution
                    .translational(TranslationMotor::VkbTranslation, DistanceUnits::Microns)
                    .value,
            ),
            (
                "hkb_3",
                resolution
                    .rotational(RotationMotor::HkbPitch, AngularUnits::Milliradians)
                    .value,
            ),
            (
                "vkb_3",
                resolution
                    .rotational(RotationMotor::VkbPitch, AngularUnits::Milliradians)
                    .value,
            ),
            ("hkb_q", 0.1),
            ("vkb_q", 0.1),
            ("hkb_1_2", 1e-4),
            ("vkb_1_2", 1e-4),
        ];
        Self {
            movement_ranges: ranges
                .into_iter()
                .map(|(name, range)| (name.to_owned(), range))
                .collect(),
            motor_resolutions: resolutions
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value))
                .collect(),
            loss_tolerances: LossTolerances::default(),
        }
    }
    /// Returns the allowed movement range of the given motor.
    ///
    /// # Errors
    ///
    /// This function will return an error if the motor is unknown.
    pub fn movement_range(&self, motor: &str) -> BrResult<[f64; 2]> {
        self.movement_ranges
            .get(motor)
            .copied()
            .ok_or_else(|| BeamrecError::Motor(format!("unknown motor {motor}")))
    }
    /// Returns the resolution of the given motor.
    ///
    /// # Errors
    ///
    /// This function will return an error if the motor is unknown.
    pub fn motor_resolution(&self, motor: &str) -> BrResult<f64> {
        self.motor_resolutions
            .get(motor)
            .copied()
            .ok_or_else(|| BeamrecError::Motor(format!("unknown motor {motor}")))
    }
    /// Returns the convergence tolerance of the given motor (equal to its resolution).
    ///
    /// # Errors
    ///
    /// This function will return an error if the motor is unknown.
    pub fn motor_tolerance(&self, motor: &str) -> BrResult<f64> {
        self.motor_resolution(motor)
    }
    /// Returns the loss tolerances.
    #[must_use]
    pub const fn loss_tolerances(&self) -> &LossTolerances {
        &self.loss_tolerances
    }
    /// Check that a movement of the given motor stays within its range.
    ///
    /// # Errors
    ///
    /// This function will return an error if the motor is unknown or the value is out of range.
    pub fn check_movement(&self, motor: &str, value: f64) -> BrResult<()> {
        let [min, max] = self.movement_range(motor)?;
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(BeamrecError::Motor(format!(
                "movement {value} of motor {motor} outside of range [{min}, {max}]"
            )))
        }
    }
}
