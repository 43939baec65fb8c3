#![warn(missing_docs)]
//! The common interface of all beamline entities whose parameters are persisted as records.
use crate::{
    error::{BeamrecError, BrResult},
    field_value::{FieldValue, SniffPolicy},
    properties::Properties,
    record::ParameterRecord,
};
use log::info;
use std::path::Path;

/// An entity (light source, optical element, ...) defined by a fixed set of named scalar fields.
///
/// Implementors declare their complete field set in their [`Default`] implementation. All record
/// handling (export, import, file access) is provided on top of [`ParameterEntity::properties`].
pub trait ParameterEntity: Default {
    /// Short name of the entity kind, used in messages.
    fn entity_kind(&self) -> &'static str;
    /// Return a reference to the field registry of this entity.
    fn properties(&self) -> &Properties;
    /// Return a mutable reference to the field registry of this entity.
    fn properties_mut(&mut self) -> &mut Properties;
    /// Set a single field.
    ///
    /// # Errors
    ///
    /// This function will return an error if the field is unknown or the value does not fit the
    /// declared kind of the field.
    fn set_field(&mut self, name: &str, value: FieldValue) -> BrResult<()> {
        self.properties_mut().set(name, value)
    }
    /// Return the value of a single field.
    ///
    /// # Errors
    ///
    /// This function will return an error if the field is unknown.
    fn field(&self, name: &str) -> BrResult<&FieldValue> {
        self.properties().get(name)
    }
    /// Export the complete field set as a [`ParameterRecord`].
    fn to_record(&self) -> ParameterRecord {
        let mut record = ParameterRecord::default();
        for (name, prop) in self.properties() {
            record.insert(name, prop.value().clone());
        }
        record
    }
    /// Apply all fields of a [`ParameterRecord`] in record order.
    ///
    /// The apply is not atomic: if a field fails, all fields before it stay applied.
    ///
    /// # Errors
    ///
    /// This function will return an error on the first field which is unknown or whose value does
    /// not fit the declared kind.
    fn apply_record(&mut self, record: &ParameterRecord) -> BrResult<&mut Self> {
        let kind = self.entity_kind();
        for (name, value) in record {
            self.set_field(name, value.clone()).map_err(|e| match e {
                BeamrecError::UnknownField(m) => BeamrecError::UnknownField(format!("{kind}: {m}")),
                BeamrecError::TypeMismatch(m) => BeamrecError::TypeMismatch(format!("{kind}: {m}")),
                other => other,
            })?;
        }
        Ok(self)
    }
    /// Write the complete field set to a record file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be written.
    fn save_to_file(&self, path: &Path) -> BrResult<()> {
        self.to_record().save_to_file(path)?;
        info!("saved {} parameters to {}", self.entity_kind(), path.display());
        Ok(())
    }
    /// Read a record file and apply it onto this entity.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the file cannot be read or parsed. The entity is not modified in this case.
    ///   - a field cannot be applied (see [`ParameterEntity::apply_record`]).
    fn update_from_file(&mut self, path: &Path, policy: SniffPolicy) -> BrResult<&mut Self> {
        let record = ParameterRecord::from_file(path, policy)?;
        self.apply_record(&record)?;
        info!(
            "loaded {} {} parameters from {}",
            record.len(),
            self.entity_kind(),
            path.display()
        );
        Ok(self)
    }
    /// Create a fresh entity from a record file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read, parsed or applied.
    fn load_from_file(path: &Path, policy: SniffPolicy) -> BrResult<Self> {
        let mut entity = Self::default();
        entity.update_from_file(path, policy)?;
        Ok(entity)
    }
}
