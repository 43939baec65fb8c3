#![warn(missing_docs)]
//! Input parameters of the hybrid diffraction calculation of an optical element.
use super::{declare_fields, float, int};
use crate::{
    entity::ParameterEntity,
    error::{BeamrecError, BrResult},
    properties::Properties,
};
use strum::EnumIter;

/// Value of a distance field meaning "use the default of the calculation".
const DEFAULT_DISTANCE: f64 = -1.0;

/// Plane(s) in which the diffraction is calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum DiffractionPlane {
    /// sagittal plane only
    Sagittal,
    /// tangential plane only
    #[default]
    Tangential,
    /// both planes, two dimensional calculation
    Both2D,
    /// both planes, two one dimensional calculations
    Both1D,
}
impl DiffractionPlane {
    const fn code(self) -> i64 {
        match self {
            Self::Sagittal => 1,
            Self::Tangential => 2,
            Self::Both2D => 3,
            Self::Both1D => 4,
        }
    }
}

/// What limits the beam in the diffraction calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum CalculationType {
    /// slit aperture
    #[default]
    Slits,
    /// size of a mirror or grating
    MirrorSize,
    /// size of a mirror together with its height error profile
    MirrorSizeAndError,
    /// size of a grating together with its height error profile
    GratingSizeAndError,
}
impl CalculationType {
    const fn code(self) -> i64 {
        match self {
            Self::Slits => 1,
            Self::MirrorSize => 2,
            Self::MirrorSizeAndError => 3,
            Self::GratingSizeAndError => 4,
        }
    }
}

/// The inputs of the hybrid diffraction calculation applied after an optical element.
///
/// Only the parameters are kept here. The calculation itself is done by the external engine.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridDiffractionParameters {
    props: Properties,
}
impl Default for HybridDiffractionParameters {
    fn default() -> Self {
        let props = declare_fields(vec![
            int("ghy_lengthunit", "length unit (0 m, 1 cm, 2 mm)", 2),
            int(
                "ghy_diff_plane",
                "1 sagittal, 2 tangential, 3 both (2D), 4 both (1D+1D)",
                DiffractionPlane::default().code(),
            ),
            int(
                "ghy_calcType",
                "1 slits, 2 mirror/grating size, 3 mirror size + error, 4 grating size + error",
                CalculationType::default().code(),
            ),
            float("ghy_distance", "image distance after the near field calculation (-1 default)", DEFAULT_DISTANCE),
            float("ghy_focallength", "focal distance of the wavefront (-1 default)", DEFAULT_DISTANCE),
            int("ghy_nf", "near field calculation (0 no, 1 yes)", 0),
            int("ghy_nbins_x", "number of bins, horizontal", 100),
            int("ghy_nbins_z", "number of bins, vertical", 100),
            int("ghy_npeak", "number of diffraction peaks", 20),
            int("ghy_fftnpts", "number of points of the FFT", 50_000),
            int("file_to_write_out", "write intermediate files (0 no)", 0),
            int("ghy_automatic", "automatic setting of the calculation parameters (0 no)", 0),
        ]);
        Self { props }
    }
}
impl HybridDiffractionParameters {
    /// Creates the inputs of a diffraction calculation.
    ///
    /// `focal_length` and `image_distance` are only used by the near field calculation. `None`
    /// lets the calculation choose them.
    ///
    /// # Errors
    ///
    /// This function will return an error if a given distance is not positive and finite.
    pub fn new(
        plane: DiffractionPlane,
        calc_type: CalculationType,
        near_field: bool,
        focal_length: Option<f64>,
        image_distance: Option<f64>,
    ) -> BrResult<Self> {
        let mut params = Self::default();
        let props = &mut params.props;
        props.set("ghy_diff_plane", plane.code().into())?;
        props.set("ghy_calcType", calc_type.code().into())?;
        props.set("ghy_nf", i64::from(near_field).into())?;
        props.set("ghy_focallength", distance("focal length", focal_length)?.into())?;
        props.set("ghy_distance", distance("image distance", image_distance)?.into())?;
        Ok(params)
    }
    /// Returns `true` if the near field calculation is switched on.
    ///
    /// # Errors
    ///
    /// This function will return an error if the field cannot be read.
    pub fn near_field(&self) -> BrResult<bool> {
        Ok(self.props.get_int("ghy_nf")? != 0)
    }
}
fn distance(name: &str, value: Option<f64>) -> BrResult<f64> {
    match value {
        None => Ok(DEFAULT_DISTANCE),
        Some(d) if d.is_finite() && d > 0.0 => Ok(d),
        Some(d) => Err(BeamrecError::Other(format!(
            "{name} must be positive, got {d}"
        ))),
    }
}
impl ParameterEntity for HybridDiffractionParameters {
    fn entity_kind(&self) -> &'static str {
        "hybrid diffraction"
    }
    fn properties(&self) -> &Properties {
        &self.props
    }
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.props
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::field_value::SniffPolicy;
    use assert_matches::assert_matches;
    use strum::IntoEnumIterator;
    use tempfile::NamedTempFile;
    #[test]
    fn default() {
        let params = HybridDiffractionParameters::default();
        let props = params.properties();
        assert_eq!(props.nr_of_props(), 12);
        assert_eq!(props.get_int("ghy_lengthunit").unwrap(), 2);
        assert_eq!(props.get_int("ghy_diff_plane").unwrap(), 2);
        assert_eq!(props.get_int("ghy_calcType").unwrap(), 1);
        assert_eq!(props.get_float("ghy_distance").unwrap(), -1.0);
        assert_eq!(props.get_float("ghy_focallength").unwrap(), -1.0);
        assert_eq!(props.get_int("ghy_nbins_x").unwrap(), 100);
        assert_eq!(props.get_int("ghy_nbins_z").unwrap(), 100);
        assert_eq!(props.get_int("ghy_npeak").unwrap(), 20);
        assert_eq!(props.get_int("ghy_fftnpts").unwrap(), 50000);
        assert_eq!(props.get_int("ghy_automatic").unwrap(), 0);
        assert!(!params.near_field().unwrap());
    }
    #[test]
    fn new() {
        let params = HybridDiffractionParameters::new(
            DiffractionPlane::Both1D,
            CalculationType::MirrorSizeAndError,
            true,
            Some(1500.0),
            None,
        )
        .unwrap();
        let props = params.properties();
        assert_eq!(props.get_int("ghy_diff_plane").unwrap(), 4);
        assert_eq!(props.get_int("ghy_calcType").unwrap(), 3);
        assert_eq!(props.get_float("ghy_focallength").unwrap(), 1500.0);
        assert_eq!(props.get_float("ghy_distance").unwrap(), -1.0);
        assert!(params.near_field().unwrap());
        assert_eq!(
            HybridDiffractionParameters::new(
                DiffractionPlane::default(),
                CalculationType::default(),
                false,
                None,
                None
            )
            .unwrap(),
            HybridDiffractionParameters::default()
        );
    }
    #[test]
    fn new_invalid_distance() {
        for d in [0.0, -1.0, f64::NAN] {
            assert_matches!(
                HybridDiffractionParameters::new(
                    DiffractionPlane::Sagittal,
                    CalculationType::Slits,
                    true,
                    None,
                    Some(d)
                ),
                Err(BeamrecError::Other(m)) if m.starts_with("image distance")
            );
        }
    }
    #[test]
    fn codes() {
        let planes: Vec<i64> = DiffractionPlane::iter().map(DiffractionPlane::code).collect();
        assert_eq!(planes, vec![1, 2, 3, 4]);
        let types: Vec<i64> = CalculationType::iter().map(CalculationType::code).collect();
        assert_eq!(types, vec![1, 2, 3, 4]);
    }
    #[test]
    fn save_and_load() {
        let params = HybridDiffractionParameters::new(
            DiffractionPlane::Both2D,
            CalculationType::MirrorSize,
            false,
            None,
            Some(250.5),
        )
        .unwrap();
        let file = NamedTempFile::new().unwrap();
        params.save_to_file(file.path()).unwrap();
        let loaded =
            HybridDiffractionParameters::load_from_file(file.path(), SniffPolicy::Standard)
                .unwrap();
        assert_eq!(loaded, params);
    }
}
