#![warn(missing_docs)]
//! Parameters of the ray-tracing light source.
use super::{bytes, declare_fields, float, int};
use crate::{error::BrResult, entity::ParameterEntity, properties::Properties};

/// The parameters of a ray-tracing light source.
///
/// Field names and units follow the conventions of the ray-tracing engine (lengths in user units,
/// i.e. mm, angles in rad, photon energies in eV).
///
/// ## Fields (selection)
///   - `NPOINT`: number of rays
///   - `ISTAR1`: random seed
///   - `FDISTR`: angular distribution
///   - `HDIV1`, `HDIV2`, `VDIV1`, `VDIV2`: divergence limits
///   - `F_COLOR`, `PH1`, `PH2`: photon energy distribution and range
///   - `SIGMAX`, `SIGMAZ`, `SIGDIX`, `SIGDIZ`: size and divergence of a gaussian source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceParameters {
    props: Properties,
}
impl Default for SourceParameters {
    fn default() -> Self {
        let props = declare_fields(vec![
            int("FDISTR", "angular distribution (1 flat, 2 uniform, 3 gaussian, 4 synchrotron, 5 conical, 6 exact synchrotron)", 2),
            int("FGRID", "grid type (0 random)", 0),
            int("FSOUR", "spatial distribution (0 point, 1 rectangle, 2 ellipse, 3 gaussian)", 3),
            int("FSOURCE_DEPTH", "depth distribution (1 off, 2 uniform, 3 gaussian, 4 synchrotron)", 1),
            int("F_BOUND_SOUR", "optimize source using an acceptance file", 0),
            int("F_COHER", "phase relation (0 incoherent, 1 coherent)", 0),
            int("F_COLOR", "photon energy distribution (1 single line, 2 several lines, 3 uniform, 4 weighted lines)", 2),
            int("F_OPD", "store optical paths", 1),
            int("F_PHOT", "photon energy units (0 eV, 1 angstrom)", 0),
            int("F_POL", "polarization components (1 parallel, 2 perpendicular, 3 total)", 3),
            int("F_POLAR", "generate polarization", 1),
            int("F_SR_TYPE", "synchrotron radiation type (0 photons, 1 power)", 0),
            int("F_WIGGLER", "insertion device (0 none, 1 wiggler, 2 undulator)", 0),
            int("IDO_VX", "grid points along vx", 1),
            int("IDO_VZ", "grid points along vz", 1),
            int("IDO_X_S", "grid points along x", 1),
            int("IDO_Y_S", "grid points along y", 1),
            int("IDO_Z_S", "grid points along z", 1),
            int("ISTAR1", "random seed", 6_775_431),
            int("NCOL", "number of energy lines", 0),
            int("NPOINT", "number of rays", 5000),
            int("N_CIRCLE", "number of concentric circles of a conical source", 0),
            int("N_COLOR", "number of colors", 0),
            int("N_CONE", "number of cones", 0),
            float("BENER", "electron energy [GeV]", 0.0),
            float("CONE_MAX", "maximum half divergence of a conical source [rad]", 0.0),
            float("CONE_MIN", "minimum half divergence of a conical source [rad]", 0.0),
            float("EPSI_DX", "distance from waist, horizontal", 0.0),
            float("EPSI_DZ", "distance from waist, vertical", 0.0),
            float("EPSI_X", "electron beam emittance, horizontal", 0.0),
            float("EPSI_Z", "electron beam emittance, vertical", 0.0),
            float("HDIV1", "horizontal divergence, +X side [rad]", 0.0),
            float("HDIV2", "horizontal divergence, -X side [rad]", 0.0),
            float("PH1", "photon energy (lower limit) [eV]", 1000.0),
            float("PH2", "photon energy (upper limit) [eV]", 1010.0),
            float("POL_ANGLE", "phase difference of the polarization components [rad]", 0.0),
            float("POL_DEG", "polarization degree", 1.0),
            float("R_ALADDIN", "bending radius of the magnet [user units]", 0.0),
            float("R_MAGNET", "magnetic radius [m]", 0.0),
            float("SIGDIX", "horizontal divergence sigma [rad]", 0.001),
            float("SIGDIZ", "vertical divergence sigma [rad]", 0.0001),
            float("SIGMAX", "horizontal size sigma [user units]", 0.001),
            float("SIGMAY", "depth sigma [user units]", 0.001),
            float("SIGMAZ", "vertical size sigma [user units]", 0.001),
            float("VDIV1", "vertical divergence, +Z side [rad]", 0.0),
            float("VDIV2", "vertical divergence, -Z side [rad]", 0.0),
            float("WXSOU", "source width [user units]", 0.1),
            float("WYSOU", "source depth [user units]", 0.2),
            float("WZSOU", "source height [user units]", 0.2),
            bytes("FILE_BOUND", "acceptance file for source optimization", "NONESPECIFIED"),
            bytes("FILE_SOURCE", "source file", "NONESPECIFIED"),
            bytes("FILE_TRAJ", "electron trajectory file", "NONESPECIFIED"),
        ]);
        Self { props }
    }
}
impl SourceParameters {
    /// Creates new [`SourceParameters`] with the given number of rays and random seed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the fields cannot be set.
    pub fn new(number_of_rays: i64, random_seed: i64) -> BrResult<Self> {
        let mut source = Self::default();
        source.props.set("NPOINT", number_of_rays.into())?;
        source.props.set("ISTAR1", random_seed.into())?;
        Ok(source)
    }
    /// Returns the number of rays of this [`SourceParameters`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the field is missing (which cannot happen for a properly constructed source).
    pub fn number_of_rays(&self) -> BrResult<i64> {
        self.props.get_int("NPOINT")
    }
    /// Returns the random seed of this [`SourceParameters`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the field is missing.
    pub fn random_seed(&self) -> BrResult<i64> {
        self.props.get_int("ISTAR1")
    }
}
impl ParameterEntity for SourceParameters {
    fn entity_kind(&self) -> &'static str {
        "source"
    }
    fn properties(&self) -> &Properties {
        &self.props
    }
    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.props
    }
}
