#![warn(missing_docs)]
//! Settings of the wavefront based (hybrid) undulator source.
use super::{declare_fields, float, int};
use crate::{
    entity::ParameterEntity,
    error::BrResult,
    properties::Properties,
    undulator::{StorageRing, ELECTRON_REST_ENERGY},
};

/// Settings of a hybrid (wavefront based) undulator source.
///
/// The field names are those of the settings of the hybrid undulator widget. Electron beam
/// and wavefront sampling fields depend on the [`StorageRing`] (see [`Self::for_storage_ring`]).
#[derive(Debug, Clone, PartialEq)]
pub struct HybridUndulatorParameters {
    props: Properties,
}
impl Default for HybridUndulatorParameters {
    fn default() -> Self {
        let beam = StorageRing::Aps.electron_beam();
        let wf = StorageRing::Aps.wavefront_sampling();
        let props = declare_fields(vec![
            int("number_of_rays", "number of rays", 500_000),
            int("seed", "random seed", 5_676_561),
            int("distribution_source", "0 SRW calculation, 1 SRW files, 2 ASCII files", 0),
            int("optimize_source", "0 no, 1 using the angular acceptance, 2 saved file", 0),
            int("polarization", "generate polarization", 1),
            int("coherent_beam", "phase relation (0 incoherent, 1 coherent)", 0),
            float("phase_diff", "phase difference [deg]", 0.0),
            float("polarization_degree", "polarization degree", 1.0),
            int("max_number_of_rejected_rays", "maximum number of rejected rays", 0),
            int("use_harmonic", "energy selection (0 harmonic, 1 single energy, 2 range)", 2),
            int("harmonic_number", "harmonic number", 1),
            float("energy", "photon energy (lower limit) [eV]", 4999.0),
            float("energy_to", "photon energy (upper limit) [eV]", 5001.0),
            int("energy_points", "number of energy points", 11),
            int("number_of_periods", "number of periods", 72),
            float("undulator_period", "period length [m]", 0.033),
            float("horizontal_central_position", "horizontal center [m]", 0.0),
            float("vertical_central_position", "vertical center [m]", 0.0),
            float("longitudinal_central_position", "longitudinal center [m]", 0.0),
            float("Kv", "vertical deflection parameter", 1.907_944),
            float("Kh", "horizontal deflection parameter", 0.0),
            int("magnetic_field_from", "0 from K, 1 from field", 0),
            float("initial_phase_vertical", "initial phase, vertical [rad]", 0.0),
            float("initial_phase_horizontal", "initial phase, horizontal [rad]", 0.0),
            int("symmetry_vs_longitudinal_position_vertical", "vertical field symmetry", 1),
            int("symmetry_vs_longitudinal_position_horizontal", "horizontal field symmetry", 0),
            float("electron_energy_in_GeV", "electron energy [GeV]", beam.energy_in_gev),
            float("electron_energy_spread", "relative energy spread", beam.energy_spread),
            float("ring_current", "ring current [A]", beam.ring_current),
            float("electron_beam_size_h", "horizontal size sigma", beam.sigma_x),
            float("electron_beam_size_v", "vertical size sigma", beam.sigma_z),
            float("electron_beam_divergence_h", "horizontal divergence sigma [rad]", beam.sigdi_x),
            float("electron_beam_divergence_v", "vertical divergence sigma [rad]", beam.sigdi_z),
            float("source_dimension_wf_h_slit_gap", "wavefront slit gap, horizontal [m]", wf.h_slit_gap),
            float("source_dimension_wf_v_slit_gap", "wavefront slit gap, vertical [m]", wf.v_slit_gap),
            int("source_dimension_wf_h_slit_points", "wavefront points, horizontal", wf.h_slit_points),
            int("source_dimension_wf_v_slit_points", "wavefront points, vertical", wf.v_slit_points),
            float("source_dimension_wf_distance", "wavefront distance [m]", wf.distance),
            int("type_of_initialization", "0 at center, 1 from source", 0),
            float("horizontal_range_modification_factor_at_resizing", "", 0.5),
            float("horizontal_resolution_modification_factor_at_resizing", "", 5.0),
            float("vertical_range_modification_factor_at_resizing", "", 0.5),
            float("vertical_resolution_modification_factor_at_resizing", "", 5.0),
            int("auto_expand", "expand the beam automatically", 0),
            int("auto_expand_rays", "expand the number of rays automatically", 0),
            int("kind_of_sampler", "ray sampler", 1),
            int("save_srw_result", "store the wavefront files", 0),
        ]);
        Self { props }
    }
}
impl HybridUndulatorParameters {
    /// Creates the default settings with the electron beam and wavefront sampling of the given [`StorageRing`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the fields cannot be set.
    pub fn for_storage_ring(storage_ring: StorageRing) -> BrResult<Self> {
        let mut settings = Self::default();
        let beam = storage_ring.electron_beam();
        let wf = storage_ring.wavefront_sampling();
        let props = &mut settings.props;
        props.set("electron_energy_in_GeV", beam.energy_in_gev.into())?;
        props.set("electron_energy_spread", beam.energy_spread.into())?;
        props.set("ring_current", beam.ring_current.into())?;
        props.set("electron_beam_size_h", beam.sigma_x.into())?;
        props.set("electron_beam_size_v", beam.sigma_z.into())?;
        props.set("electron_beam_divergence_h", beam.sigdi_x.into())?;
        props.set("electron_beam_divergence_v", beam.sigdi_z.into())?;
        props.set("source_dimension_wf_h_slit_gap", wf.h_slit_gap.into())?;
        props.set("source_dimension_wf_v_slit_gap", wf.v_slit_gap.into())?;
        props.set("source_dimension_wf_h_slit_points", wf.h_slit_points.into())?;
        props.set("source_dimension_wf_v_slit_points", wf.v_slit_points.into())?;
        props.set("source_dimension_wf_distance", wf.distance.into())?;
        Ok(settings)
    }
    /// Returns the relativistic Lorentz factor of the electron beam.
    ///
    /// # Errors
    ///
    /// This function will return an error if the electron energy field cannot be read.
    pub fn gamma(&self) -> BrResult<f64> {
        Ok(1e9 * self.props.get_float("electron_energy_in_GeV")? / ELECTRON_REST_ENERGY)
    }
}
impl ParameterEntity for HybridUndulatorParameters {
    fn entity_kind(&self) -> &'static str {
        "hybrid undulator"
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
    use crate::field_value::{FieldKind, SniffPolicy};
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;
    #[test]
    fn default() {
        let settings = HybridUndulatorParameters::default();
        assert_eq!(settings.properties().nr_of_props(), 47);
        assert_eq!(settings.entity_kind(), "hybrid undulator");
        let props = settings.properties();
        assert_eq!(props.get_int("number_of_periods").unwrap(), 72);
        assert_eq!(props.get_float("undulator_period").unwrap(), 0.033);
        assert_eq!(props.get_float("electron_energy_in_GeV").unwrap(), 7.0);
        assert_eq!(
            props.get("energy").unwrap().kind(),
            FieldKind::Float
        );
    }
    #[test]
    fn for_storage_ring() {
        let settings = HybridUndulatorParameters::for_storage_ring(StorageRing::ApsU).unwrap();
        let props = settings.properties();
        assert_eq!(props.get_float("electron_energy_in_GeV").unwrap(), 6.0);
        assert_eq!(props.get_float("electron_beam_size_h").unwrap(), 1.48e-5);
        assert_eq!(props.get_float("source_dimension_wf_h_slit_gap").unwrap(), 0.001);
        assert_eq!(props.get_int("source_dimension_wf_h_slit_points").unwrap(), 100);
        assert_eq!(
            HybridUndulatorParameters::for_storage_ring(StorageRing::Aps).unwrap(),
            HybridUndulatorParameters::default()
        );
    }
    #[test]
    fn gamma() {
        let settings = HybridUndulatorParameters::default();
        assert_relative_eq!(settings.gamma().unwrap(), 13_698.658, max_relative = 1e-6);
    }
    #[test]
    fn save_and_load() {
        let mut settings = HybridUndulatorParameters::for_storage_ring(StorageRing::ApsU).unwrap();
        settings.set_field("Kh", 0.25.into()).unwrap();
        let file = NamedTempFile::new().unwrap();
        settings.save_to_file(file.path()).unwrap();
        let loaded =
            HybridUndulatorParameters::load_from_file(file.path(), SniffPolicy::Standard).unwrap();
        assert_eq!(loaded, settings);
    }
}
