#![warn(missing_docs)]
//! Start / end record pairs of a simulation stage.
//!
//! For a beam data file `X` (written by the external engine), the parameters of the entity at
//! the start and at the end of the stage are stored next to it as `parameters_start_X` and
//! `parameters_end_X`. A source may instead be stored as the single record `source_X`, which
//! then stands for both the start and the end of the stage.
use crate::{
    entity::ParameterEntity,
    error::{BeamrecError, BrResult},
    field_value::{FieldValue, SniffPolicy},
};
use log::info;
use std::path::{Path, PathBuf};

/// Default beam data file of a source.
pub const DEFAULT_SOURCE_BEAM_FILE: &str = "source_beam.dat";
/// Default beam data file of an optical element.
pub const DEFAULT_BEAM_FILE: &str = "shadow_beam.dat";
/// Default beam data file of a source stored with a single record.
pub const DEFAULT_SOURCE_RECORD_BEAM_FILE: &str = "begin.dat";

const START_PREFIX: &str = "parameters_start_";
const END_PREFIX: &str = "parameters_end_";
const SOURCE_PREFIX: &str = "source_";

/// The file names belonging to one beam data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamFileNames {
    beam: PathBuf,
    parameters_start: PathBuf,
    parameters_end: PathBuf,
    source_record: PathBuf,
}
impl BeamFileNames {
    /// Derive the record file names of the given beam data file.
    ///
    /// The prefixes are applied to the file name only, so records end up in the directory of the
    /// beam data file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the path has no file name component.
    pub fn new(beam_file: &Path) -> BrResult<Self> {
        let file_name = beam_file
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| {
                BeamrecError::Io(format!(
                    "beam file {} has no valid file name",
                    beam_file.display()
                ))
            })?;
        Ok(Self {
            beam: beam_file.to_path_buf(),
            parameters_start: beam_file.with_file_name(format!("{START_PREFIX}{file_name}")),
            parameters_end: beam_file.with_file_name(format!("{END_PREFIX}{file_name}")),
            source_record: beam_file.with_file_name(format!("{SOURCE_PREFIX}{file_name}")),
        })
    }
    /// Returns the path of the beam data file.
    #[must_use]
    pub fn beam(&self) -> &Path {
        &self.beam
    }
    /// Returns the path of the start record.
    #[must_use]
    pub fn parameters_start(&self) -> &Path {
        &self.parameters_start
    }
    /// Returns the path of the end record.
    #[must_use]
    pub fn parameters_end(&self) -> &Path {
        &self.parameters_end
    }
    /// Returns the path of the single record of a source.
    #[must_use]
    pub fn source_record(&self) -> &Path {
        &self.source_record
    }
}

/// A field whose value differs between start and end of a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// field name
    pub name: String,
    /// value at the start
    pub start: FieldValue,
    /// value at the end
    pub end: FieldValue,
}

/// The parameters of an entity at the start and the end of a simulation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPair<E: ParameterEntity> {
    /// entity before the stage
    pub start: E,
    /// entity after the stage
    pub end: E,
}
impl<E: ParameterEntity> RecordPair<E> {
    /// Creates a new [`RecordPair`].
    pub const fn new(start: E, end: E) -> Self {
        Self { start, end }
    }
    /// Write both records next to the given beam data file.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the files cannot be written.
    pub fn save(&self, beam_file: &Path) -> BrResult<BeamFileNames> {
        let names = BeamFileNames::new(beam_file)?;
        self.start.save_to_file(names.parameters_start())?;
        self.end.save_to_file(names.parameters_end())?;
        Ok(names)
    }
    /// Load both records belonging to the given beam data file onto fresh entities.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - one of the record files does not exist. Nothing is loaded in this case.
    ///   - a record cannot be read, parsed or applied.
    pub fn load(beam_file: &Path, policy: SniffPolicy) -> BrResult<Self> {
        let names = BeamFileNames::new(beam_file)?;
        for path in [names.parameters_start(), names.parameters_end()] {
            if !path.is_file() {
                return Err(BeamrecError::Io(format!(
                    "record file {} not found",
                    path.display()
                )));
            }
        }
        let pair = Self {
            start: E::load_from_file(names.parameters_start(), policy)?,
            end: E::load_from_file(names.parameters_end(), policy)?,
        };
        info!("loaded record pair of {}", beam_file.display());
        Ok(pair)
    }
    /// Write the end record as the single source record next to the given beam data file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be written.
    pub fn save_source(&self, beam_file: &Path) -> BrResult<BeamFileNames> {
        let names = BeamFileNames::new(beam_file)?;
        self.end.save_to_file(names.source_record())?;
        Ok(names)
    }
    /// Load the single source record belonging to the given beam data file as both start and end.
    ///
    /// # Errors
    ///
    /// This function will return an error if the record file does not exist or cannot be read,
    /// parsed or applied.
    pub fn load_source(beam_file: &Path, policy: SniffPolicy) -> BrResult<Self>
    where
        E: Clone,
    {
        let names = BeamFileNames::new(beam_file)?;
        let path = names.source_record();
        if !path.is_file() {
            return Err(BeamrecError::Io(format!(
                "record file {} not found",
                path.display()
            )));
        }
        let entity = E::load_from_file(path, policy)?;
        info!("loaded source record of {}", beam_file.display());
        Ok(Self::new(entity.clone(), entity))
    }
    /// Returns the fields whose values differ between start and end, in name order.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<FieldChange> {
        let end = self.end.properties();
        self.start
            .properties()
            .iter()
            .filter_map(|(name, prop)| {
                let end_value = end.get(name).ok()?;
                (prop.value() != end_value).then(|| FieldChange {
                    name: name.clone(),
                    start: prop.value().clone(),
                    end: end_value.clone(),
                })
            })
            .collect()
    }
}
