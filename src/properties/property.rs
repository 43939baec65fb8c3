use crate::{
    error::{BeamrecError, BrResult},
    field_value::{FieldKind, FieldValue},
};
use log::debug;
use serde::{Deserialize, Serialize};

/// (entity) Property
///
/// A property consists of the actual value (stored as [`FieldValue`]) and a description. The kind
/// of the initial value is the declared kind of the property: later values must be of the same kind
/// or losslessly convertible into it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct Property {
    value: FieldValue,
    #[serde(skip)]
    description: String,
}
impl Property {
    /// Creates a new [`Property`]. The kind of `value` becomes the declared kind of the property.
    #[must_use]
    pub const fn new(value: FieldValue, description: String) -> Self {
        Self { value, description }
    }
    /// Returns a reference to the actual property value of this [`Property`].
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }
    /// Returns the declared kind of this [`Property`].
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.value.kind()
    }
    /// Returns a reference to the description of this [`Property`].
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_ref()
    }
    /// Sets the value of this [`Property`].
    ///
    /// An integer is accepted by a float property. A float with an integral value is accepted by an
    /// integer property (negative integers such as `-1` are sniffed as floats). A bytes property
    /// stores numbers in their record text, so a file name like `111` survives a save and load.
    ///
    /// # Errors
    ///
    /// This function will return a [`BeamrecError::TypeMismatch`] if the value cannot be converted
    /// into the declared kind.
    pub fn set_value(&mut self, value: FieldValue) -> BrResult<()> {
        let value = match (self.kind(), value) {
            (FieldKind::Float, FieldValue::Int(i)) => {
                #[allow(clippy::cast_precision_loss)]
                let f = i as f64;
                FieldValue::Float(f)
            }
            (FieldKind::Int, FieldValue::Float(f)) => {
                let i = float_to_int(f).ok_or_else(|| {
                    BeamrecError::TypeMismatch(format!(
                        "expected an int but found the float {f}"
                    ))
                })?;
                debug!("narrowing float {f} to int {i}");
                FieldValue::Int(i)
            }
            (FieldKind::Bytes, value @ (FieldValue::Int(_) | FieldValue::Float(_))) => {
                debug!("storing {} '{value}' as bytes", value.kind());
                FieldValue::Bytes(value.to_record_bytes())
            }
            (kind, value) if kind == value.kind() => value,
            (kind, value) => {
                return Err(BeamrecError::TypeMismatch(format!(
                    "expected {kind} but found {} '{value}'",
                    value.kind()
                )));
            }
        };
        self.value = value;
        Ok(())
    }
}
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_int(value: f64) -> Option<i64> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}
