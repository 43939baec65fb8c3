#![warn(missing_docs)]
//! Setup of undulator light sources.
//!
//! Two kinds of sources are prepared here, both purely by marshaling parameters for the external
//! engines which do the actual computation:
//!   - [`GaussianUndulatorSource`]: a geometrical source whose size and divergence are the
//!     convolution of the electron beam with the photon beam of a single undulator harmonic.
//!   - [`HybridUndulatorSource`]: the settings of a hybrid (wavefront based) undulator source.
use crate::{
    config::BeamlineConfig,
    entities::{HybridUndulatorParameters, SourceParameters},
    entity::ParameterEntity,
    error::{BeamrecError, BrResult},
    properties::Properties,
    utils::round_to_digits,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt::Display};
use strum::EnumIter;

const SPEED_OF_LIGHT: f64 = 299_792_458.0;
const PLANCK_CONSTANT: f64 = 6.626_070_15e-34;
const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
/// Electron rest energy in eV.
pub const ELECTRON_REST_ENERGY: f64 = 510_998.95;
/// Conversion factor between photon energy (eV) and wavelength (m): `λ = M2EV / E`.
pub const M2EV: f64 = SPEED_OF_LIGHT * PLANCK_CONSTANT / ELEMENTARY_CHARGE;

/// Default aperture `[width, height]` (mm) defining the angular acceptance of a new source.
pub const DEFAULT_APERTURE: [f64; 2] = [0.03, 0.07];
/// Default distance (mm) of [`DEFAULT_APERTURE`] from the source.
pub const DEFAULT_APERTURE_DISTANCE: f64 = 50500.0;
/// Default undulator length (m).
pub const DEFAULT_UNDULATOR_LENGTH: f64 = 2.376;

/// The storage ring delivering the electron beam.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum StorageRing {
    /// Advanced Photon Source
    #[default]
    #[serde(rename = "APS")]
    Aps,
    /// Advanced Photon Source upgrade (multi-bend achromat lattice)
    #[serde(rename = "APS-U")]
    ApsU,
}
impl Display for StorageRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aps => write!(f, "APS"),
            Self::ApsU => write!(f, "APS-U"),
        }
    }
}
/// Electron beam properties of a storage ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectronBeam {
    /// electron energy [GeV]
    pub energy_in_gev: f64,
    /// relative energy spread
    pub energy_spread: f64,
    /// ring current [A]
    pub ring_current: f64,
    /// horizontal size sigma [mm]
    pub sigma_x: f64,
    /// vertical size sigma [mm]
    pub sigma_z: f64,
    /// horizontal divergence sigma [rad]
    pub sigdi_x: f64,
    /// vertical divergence sigma [rad]
    pub sigdi_z: f64,
}
/// Sampling of the wavefront used by the hybrid source for computing the source dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavefrontSampling {
    /// horizontal slit gap [m]
    pub h_slit_gap: f64,
    /// vertical slit gap [m]
    pub v_slit_gap: f64,
    /// horizontal number of points
    pub h_slit_points: i64,
    /// vertical number of points
    pub v_slit_points: i64,
    /// distance of the slit [m]
    pub distance: f64,
}
impl StorageRing {
    /// Returns the [`ElectronBeam`] of this [`StorageRing`].
    #[must_use]
    pub const fn electron_beam(self) -> ElectronBeam {
        match self {
            Self::Aps => ElectronBeam {
                energy_in_gev: 7.0,
                energy_spread: 0.000_98,
                ring_current: 0.1,
                sigma_x: 0.000_280_5,
                sigma_z: 1.02e-05,
                sigdi_x: 1.18e-05,
                sigdi_z: 3.4e-06,
            },
            Self::ApsU => ElectronBeam {
                energy_in_gev: 6.0,
                energy_spread: 0.001_38,
                ring_current: 0.2,
                sigma_x: 1.48e-05,
                sigma_z: 3.7e-06,
                sigdi_x: 2.8e-06,
                sigdi_z: 1.5e-06,
            },
        }
    }
    /// Returns the [`WavefrontSampling`] suited for this [`StorageRing`].
    #[must_use]
    pub const fn wavefront_sampling(self) -> WavefrontSampling {
        match self {
            Self::Aps => WavefrontSampling {
                h_slit_gap: 0.005,
                v_slit_gap: 0.001,
                h_slit_points: 500,
                v_slit_points: 100,
                distance: 10.0,
            },
            Self::ApsU => WavefrontSampling {
                h_slit_gap: 0.001,
                v_slit_gap: 0.001,
                h_slit_points: 100,
                v_slit_points: 100,
                distance: 10.0,
            },
        }
    }
}

/// Photon energy selection of a [`GaussianUndulatorSource`] (energies in eV).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhotonEnergy {
    /// a single photon energy
    SingleLine(f64),
    /// a uniform distribution between two energies
    Uniform {
        /// lower limit
        from: f64,
        /// upper limit
        to: f64,
    },
}
impl PhotonEnergy {
    const fn color_flag(self) -> i64 {
        match self {
            Self::SingleLine(_) => 1,
            Self::Uniform { .. } => 3,
        }
    }
    fn validate(self) -> BrResult<()> {
        let valid = match self {
            Self::SingleLine(energy) => energy.is_finite() && energy > 0.0,
            Self::Uniform { from, to } => from.is_finite() && to.is_finite() && from > 0.0 && from <= to,
        };
        if valid {
            Ok(())
        } else {
            Err(BeamrecError::Source(format!("invalid photon energy {self:?}")))
        }
    }
}

fn divergence_from_aperture(aperture: [f64; 2], distance: f64) -> BrResult<[f64; 2]> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(BeamrecError::Source(format!(
            "aperture distance must be positive, got {distance}"
        )));
    }
    Ok([aperture[0] / distance, aperture[1] / distance])
}

/// A geometrical source emulating an undulator by a gaussian photon beam.
#[derive(Debug, Clone)]
pub struct GaussianUndulatorSource {
    source: SourceParameters,
    undulator_length: f64,
    storage_ring: StorageRing,
}
impl GaussianUndulatorSource {
    /// Creates a new [`GaussianUndulatorSource`].
    ///
    /// The source is initialized with the angular acceptance of [`DEFAULT_APERTURE`] at
    /// [`DEFAULT_APERTURE_DISTANCE`] and a uniform photon energy distribution between 4999 and 5001 eV.
    ///
    /// # Errors
    ///
    /// This function will return an error if the undulator length is not positive.
    pub fn new(
        number_of_rays: i64,
        random_seed: i64,
        undulator_length: f64,
        storage_ring: StorageRing,
    ) -> BrResult<Self> {
        if !undulator_length.is_finite() || undulator_length <= 0.0 {
            return Err(BeamrecError::Source(format!(
                "undulator length must be positive, got {undulator_length}"
            )));
        }
        let mut source = SourceParameters::new(number_of_rays, random_seed)?;
        let props = source.properties_mut();
        props.set("FSOUR", 3.into())?;
        props.set("FSOURCE_DEPTH", 1.into())?;
        props.set("F_PHOT", 0.into())?;
        props.set("F_POLAR", 1.into())?;
        let mut undulator = Self {
            source,
            undulator_length,
            storage_ring,
        };
        undulator.set_angular_acceptance_from_aperture(DEFAULT_APERTURE, DEFAULT_APERTURE_DISTANCE)?;
        undulator.set_energy(PhotonEnergy::Uniform {
            from: 4999.0,
            to: 5001.0,
        })?;
        Ok(undulator)
    }
    /// Creates a new [`GaussianUndulatorSource`] from the settings of a [`BeamlineConfig`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the configured undulator length is not positive.
    pub fn from_config(config: &BeamlineConfig) -> BrResult<Self> {
        Self::new(
            config.number_of_rays,
            config.random_seed,
            config.undulator_length,
            config.storage_ring,
        )
    }
    /// Limit the angular acceptance to the given full divergence `[horizontal, vertical]` (rad).
    ///
    /// # Errors
    ///
    /// This function will return an error if the divergence is not positive.
    pub fn set_angular_acceptance(&mut self, divergence: [f64; 2]) -> BrResult<()> {
        if divergence.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(BeamrecError::Source(format!(
                "divergence must be positive, got {divergence:?}"
            )));
        }
        info!("limiting divergence of the geometrical source to {divergence:?} rad");
        let props = self.source.properties_mut();
        props.set("FDISTR", 3.into())?;
        props.set("HDIV1", (divergence[0] / 2.0).into())?;
        props.set("HDIV2", (divergence[0] / 2.0).into())?;
        props.set("VDIV1", (divergence[1] / 2.0).into())?;
        props.set("VDIV2", (divergence[1] / 2.0).into())?;
        Ok(())
    }
    /// Limit the angular acceptance to an aperture `[width, height]` at the given distance (same units).
    ///
    /// # Errors
    ///
    /// This function will return an error if the distance or the resulting divergence is not positive.
    pub fn set_angular_acceptance_from_aperture(
        &mut self,
        aperture: [f64; 2],
        distance: f64,
    ) -> BrResult<()> {
        self.set_angular_acceptance(divergence_from_aperture(aperture, distance)?)
    }
    /// Set the photon energy and update the photon beam size accordingly.
    ///
    /// # Errors
    ///
    /// This function will return an error if the energies are not positive or not ordered.
    pub fn set_energy(&mut self, energy: PhotonEnergy) -> BrResult<()> {
        energy.validate()?;
        let props = self.source.properties_mut();
        props.set("F_COLOR", energy.color_flag().into())?;
        match energy {
            PhotonEnergy::SingleLine(energy) => props.set("PH1", energy.into())?,
            PhotonEnergy::Uniform { from, to } => {
                props.set("PH1", from.into())?;
                props.set("PH2", to.into())?;
            }
        }
        self.set_photon_sizes()
    }
    /// Returns the energy of the harmonic the photon sizes are computed for (eV).
    ///
    /// # Errors
    ///
    /// This function will return an error if the energy fields cannot be read.
    pub fn harmonic_energy(&self) -> BrResult<f64> {
        let props = self.source.properties();
        if props.get_int("F_COLOR")? == 3 {
            Ok(0.5 * (props.get_float("PH1")? + props.get_float("PH2")?))
        } else {
            props.get_float("PH1")
        }
    }
    /// Sizes of the photon beam after Onuki & Elleaume (formulas 25 & 30), convoluted with the
    /// electron beam. Lengths in the engine are in user units (mm).
    fn set_photon_sizes(&mut self) -> BrResult<()> {
        let beam = self.storage_ring.electron_beam();
        let harmonic_wavelength = M2EV / self.harmonic_energy()?;
        let s_phot = 2.740 / (4.0 * PI) * (self.undulator_length * harmonic_wavelength).sqrt();
        let sp_phot = 0.69 * (harmonic_wavelength / self.undulator_length).sqrt();
        let user_unit_to_m = 1e-3;

        let props = self.source.properties_mut();
        props.set("F_OPD", 1.into())?;
        props.set("F_SR_TYPE", 0.into())?;
        props.set(
            "SIGMAX",
            ((beam.sigma_x * user_unit_to_m).hypot(s_phot) / user_unit_to_m).into(),
        )?;
        props.set(
            "SIGMAZ",
            ((beam.sigma_z * user_unit_to_m).hypot(s_phot) / user_unit_to_m).into(),
        )?;
        props.set("SIGDIX", beam.sigdi_x.hypot(sp_phot).into())?;
        props.set("SIGDIZ", beam.sigdi_z.hypot(sp_phot).into())?;
        Ok(())
    }
    /// Returns a reference to the source parameters of this [`GaussianUndulatorSource`].
    #[must_use]
    pub const fn source(&self) -> &SourceParameters {
        &self.source
    }
    /// Consumes this [`GaussianUndulatorSource`] and returns its source parameters.
    #[must_use]
    pub fn into_source(self) -> SourceParameters {
        self.source
    }
    /// Returns the storage ring of this [`GaussianUndulatorSource`].
    #[must_use]
    pub const fn storage_ring(&self) -> StorageRing {
        self.storage_ring
    }
}

/// Direction of the magnetic field deflection parameter K.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum KDirection {
    /// vertical field, horizontal oscillation
    Vertical,
    /// horizontal field, vertical oscillation
    Horizontal,
    /// both directions with equal strength
    Both,
}
/// Photon energy selection of a [`HybridUndulatorSource`] (energies in eV).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HybridPhotonEnergy {
    /// the energy of the given harmonic of the undulator
    OnHarmonic {
        /// harmonic number
        harmonic_number: i64,
    },
    /// a single photon energy
    SingleEnergy(f64),
    /// an energy range sampled with the given number of points
    Range {
        /// lower limit
        from: f64,
        /// upper limit
        to: f64,
        /// number of energy points
        points: i64,
    },
}
/// An aperture limiting the angular acceptance of a hybrid source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceptance {
    /// aperture `[width, height]`
    pub aperture: [f64; 2],
    /// distance of the aperture from the source
    pub distance: f64,
}

/// Settings of a hybrid undulator source together with its angular acceptance.
#[derive(Debug, Clone)]
pub struct HybridUndulatorSource {
    settings: HybridUndulatorParameters,
    acceptance: Option<Acceptance>,
}
impl HybridUndulatorSource {
    /// Creates a new [`HybridUndulatorSource`] for the given storage ring without angular acceptance.
    ///
    /// # Errors
    ///
    /// This function will return an error if the settings cannot be set.
    pub fn new(number_of_rays: i64, random_seed: i64, storage_ring: StorageRing) -> BrResult<Self> {
        let mut settings = HybridUndulatorParameters::for_storage_ring(storage_ring)?;
        settings
            .properties_mut()
            .set("number_of_rays", number_of_rays.into())?;
        settings.properties_mut().set("seed", random_seed.into())?;
        Ok(Self {
            settings,
            acceptance: None,
        })
    }
    /// Set the angular acceptance from a full divergence `[horizontal, vertical]` (rad), expressed as
    /// an aperture at 10 m. `None` removes the acceptance.
    pub fn set_angular_acceptance(&mut self, divergence: Option<[f64; 2]>) {
        self.acceptance = divergence.map(|divergence| {
            let distance = 10.0;
            Acceptance {
                aperture: [
                    distance * divergence[0].tan(),
                    distance * divergence[1].tan(),
                ],
                distance,
            }
        });
    }
    /// Set the angular acceptance to an aperture at the given distance.
    ///
    /// # Errors
    ///
    /// This function will return an error if the distance is not positive.
    pub fn set_angular_acceptance_from_aperture(
        &mut self,
        aperture: [f64; 2],
        distance: f64,
    ) -> BrResult<()> {
        divergence_from_aperture(aperture, distance)?;
        self.acceptance = Some(Acceptance { aperture, distance });
        Ok(())
    }
    /// Tune the deflection parameter K such that the given harmonic matches the given photon energy.
    ///
    /// Returns the computed K (before splitting it for [`KDirection::Both`]).
    ///
    /// # Errors
    ///
    /// This function will return an error if the energy cannot be reached with the undulator period
    /// and electron energy of this source.
    pub fn set_k_on_specific_harmonic(
        &mut self,
        harmonic_energy: f64,
        harmonic_number: i64,
        which: KDirection,
    ) -> BrResult<f64> {
        if !harmonic_energy.is_finite() || harmonic_energy <= 0.0 || harmonic_number < 1 {
            return Err(BeamrecError::Source(format!(
                "invalid harmonic {harmonic_number} at {harmonic_energy} eV"
            )));
        }
        let period = self.settings.properties().get_float("undulator_period")?;
        let gamma = self.settings.gamma()?;
        #[allow(clippy::cast_precision_loss)]
        let wavelength = harmonic_number as f64 * M2EV / harmonic_energy;
        let radicand = 2.0 * ((wavelength * 2.0 * gamma.powi(2) / period) - 1.0);
        if radicand < 0.0 {
            return Err(BeamrecError::Source(format!(
                "harmonic {harmonic_number} cannot reach {harmonic_energy} eV with a period of {period} m"
            )));
        }
        let k = round_to_digits(radicand.sqrt(), 6);
        let (kv, kh) = match which {
            KDirection::Vertical => (k, 0.0),
            KDirection::Horizontal => (0.0, k),
            KDirection::Both => {
                let k_both = round_to_digits(k / 2.0_f64.sqrt(), 6);
                (k_both, k_both)
            }
        };
        let props = self.settings.properties_mut();
        props.set("Kv", kv.into())?;
        props.set("Kh", kh.into())?;
        info!("K set to {k} for harmonic {harmonic_number} at {harmonic_energy} eV");
        Ok(k)
    }
    /// Select the photon energy of the source.
    ///
    /// # Errors
    ///
    /// This function will return an error if the energies are not positive or not ordered.
    pub fn set_energy(&mut self, energy: HybridPhotonEnergy) -> BrResult<()> {
        let props: &mut Properties = self.settings.properties_mut();
        match energy {
            HybridPhotonEnergy::OnHarmonic { harmonic_number } => {
                if harmonic_number < 1 {
                    return Err(BeamrecError::Source(format!(
                        "invalid harmonic number {harmonic_number}"
                    )));
                }
                props.set("use_harmonic", 0.into())?;
                props.set("harmonic_number", harmonic_number.into())?;
            }
            HybridPhotonEnergy::SingleEnergy(energy) => {
                if !energy.is_finite() || energy <= 0.0 {
                    return Err(BeamrecError::Source(format!(
                        "invalid photon energy {energy}"
                    )));
                }
                props.set("use_harmonic", 1.into())?;
                props.set("energy", energy.into())?;
            }
            HybridPhotonEnergy::Range { from, to, points } => {
                if !(from.is_finite() && to.is_finite() && from > 0.0 && from <= to && points > 0) {
                    return Err(BeamrecError::Source(format!(
                        "invalid photon energy range {from}..{to} with {points} points"
                    )));
                }
                props.set("use_harmonic", 2.into())?;
                props.set("energy", from.into())?;
                props.set("energy_to", to.into())?;
                props.set("energy_points", points.into())?;
            }
        }
        Ok(())
    }
    /// Returns the angular acceptance of this [`HybridUndulatorSource`].
    #[must_use]
    pub const fn acceptance(&self) -> Option<&Acceptance> {
        self.acceptance.as_ref()
    }
    /// Returns a reference to the settings of this [`HybridUndulatorSource`].
    #[must_use]
    pub const fn settings(&self) -> &HybridUndulatorParameters {
        &self.settings
    }
}
