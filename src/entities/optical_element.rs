#![warn(missing_docs)]
//! Parameters of an optical element and its screen / slit slots.
use super::{bytes, declare_fields, float, int, FieldDecl};
use crate::{
    entity::ParameterEntity,
    error::{BeamrecError, BrResult},
    properties::Properties,
    utils::geometry::normalise_angle,
};

/// Number of screen / slit slots of an optical element.
pub const NR_OF_SCREEN_SLOTS: usize = 10;

/// Return the field name of an indexed (screen) field such as `RX_SLIT(1)`.
///
/// # Errors
///
/// This function will return an error if `index` is not in `1..=NR_OF_SCREEN_SLOTS`.
pub fn indexed_field_name(name: &str, index: usize) -> BrResult<String> {
    if (1..=NR_OF_SCREEN_SLOTS).contains(&index) {
        Ok(format!("{name}({index})"))
    } else {
        Err(BeamrecError::Other(format!(
            "screen index {index} out of range 1..={NR_OF_SCREEN_SLOTS}"
        )))
    }
}

/// The parameters of an optical element (mirror, crystal, slit, screen or empty element).
///
/// Distances are given in user units (mm) and angles in degrees. Screens and slits placed
/// on an element are described by the indexed fields `I_SCREEN(i)`, `I_SLIT(i)`, `RX_SLIT(i)`, ...
/// with `i` in `1..=NR_OF_SCREEN_SLOTS`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalElementParameters {
    props: Properties,
}
impl Default for OpticalElementParameters {
    fn default() -> Self {
        let mut fields = vec![
            int("FCYL", "cylindrical surface", 0),
            int("FHIT_C", "mirror dimensions (0 unlimited, 1 finite)", 0),
            int("FMIRR", "surface shape (1 spherical, 2 ellipsoidal, 3 toroidal, 4 paraboloid, 5 plane, 6 codling slit, 7 hyperbolical, 8 cone, 9 polynomial)", 5),
            int("FSHAPE", "mirror contour (1 rectangle, 2 full ellipse, 3 ellipse with hole)", 1),
            int("FWRITE", "files to write out (0 all, 1 mirror, 2 image, 3 none)", 0),
            int("F_ANGLE", "write out incident/reflected angles", 0),
            int("F_BRAGG_A", "asymmetric crystal", 0),
            int("F_CENTRAL", "automatic tuning of the central ray", 0),
            int("F_CONVEX", "convex surface", 0),
            int("F_CRYSTAL", "crystal element", 0),
            int("F_DEFAULT", "focii placed at continuation planes", 1),
            int("F_EXT", "external (0) or internal (1) parameter calculation", 0),
            int("F_FACET", "faceted surface", 0),
            int("F_GRATING", "grating element", 0),
            int("F_G_S", "surface error given by a file", 0),
            int("F_JOHANSSON", "johansson geometry", 0),
            int("F_KOMA", "kumakhov lens", 0),
            int("F_MOSAIC", "mosaic crystal", 0),
            int("F_MOVE", "apply mirror movements", 0),
            int("F_PHOT_CENT", "units of the central photon energy (0 eV, 1 angstrom)", 0),
            int("F_REFLEC", "reflectivity (0 off, 1 full polarization dependence, 2 no polarization dependence)", 0),
            int("F_REFL", "reflectivity source (0 prerefl file, 1 electric susceptibility, 2 user defined)", 0),
            int("F_REFRAC", "reflector (0), refractor (1) or empty element (2)", 0),
            int("F_RIPPLE", "surface ripple", 0),
            int("F_ROUGHNESS", "surface roughness", 0),
            int("F_SCREEN", "screens present", 0),
            int("F_SIDE", "side of the element", 0),
            int("N_SCREEN", "number of screens", 0),
            float("ALPHA", "rotation of the axis system around the beam [deg]", 0.0),
            float("AXMAJ", "semi major axis [user units]", 0.0),
            float("AXMIN", "semi minor axis [user units]", 0.0),
            float("CIL_ANG", "angle of the cylinder axis [deg]", 0.0),
            float("DUMMY", "user unit in cm", 1.0),
            float("OFFX", "mirror offset along x [user units]", 0.0),
            float("OFFY", "mirror offset along y [user units]", 0.0),
            float("OFFZ", "mirror offset along z [user units]", 0.0),
            float("PHOT_CENT", "central photon energy", 0.0),
            float("RLEN1", "mirror half length, +Y side [user units]", 0.0),
            float("RLEN2", "mirror half length, -Y side [user units]", 0.0),
            float("RMIRR", "radius of the mirror [user units]", 0.0),
            float("RWIDX1", "mirror half width, +X side [user units]", 0.0),
            float("RWIDX2", "mirror half width, -X side [user units]", 0.0),
            float("R_IND_IMA", "refraction index in image space", 1.0),
            float("R_IND_OBJ", "refraction index in object space", 1.0),
            float("SIMAG", "image plane distance for focii calculation [user units]", 0.0),
            float("SSOUR", "source plane distance for focii calculation [user units]", 0.0),
            float("THETA", "incidence angle for focii calculation [deg]", 0.0),
            float("T_IMAGE", "distance to the image plane [user units]", 20.0),
            float("T_INCIDENCE", "incidence angle [deg]", 10.0),
            float("T_REFLECTION", "reflection angle [deg]", 10.0),
            float("T_SOURCE", "distance from the previous element [user units]", 10.0),
            float("X_ROT", "mirror rotation around x [deg]", 0.0),
            float("Y_ROT", "mirror rotation around y [deg]", 0.0),
            float("Z_ROT", "mirror rotation around z [deg]", 0.0),
            bytes("FILE_FAC", "facet file", "NONESPECIFIED"),
            bytes("FILE_KOMA", "kumakhov lens file", "NONESPECIFIED"),
            bytes("FILE_MIR", "mirror surface file", "NONESPECIFIED"),
            bytes("FILE_REFL", "reflectivity or crystal file", "GAAS.SHA"),
            bytes("FILE_RIP", "surface error file", "NONESPECIFIED"),
            bytes("FILE_ROUGH", "surface roughness file", "NONESPECIFIED"),
        ];
        fields.extend(screen_fields());
        Self {
            props: declare_fields(fields),
        }
    }
}
fn screen_fields() -> Vec<FieldDecl> {
    let mut fields = Vec::new();
    for index in 1..=NR_OF_SCREEN_SLOTS {
        let name = |base: &str| format!("{base}({index})");
        fields.extend([
            int(&name("I_ABS"), "screen absorption", 0),
            int(&name("I_SCREEN"), "screen position (0 after, 1 before the element)", 0),
            int(&name("I_SLIT"), "aperture present", 0),
            int(&name("I_STOP"), "obstruction (1) or aperture (0)", 0),
            int(&name("K_SLIT"), "aperture shape (0 rectangle, 1 ellipse, 2 external)", 0),
            float(&name("CX_SLIT"), "aperture center, x [user units]", 0.0),
            float(&name("CZ_SLIT"), "aperture center, z [user units]", 0.0),
            float(&name("RX_SLIT"), "aperture width, x [user units]", 0.0),
            float(&name("RZ_SLIT"), "aperture height, z [user units]", 0.0),
            float(&name("SL_DIS"), "screen distance from the element [user units]", 0.0),
            float(&name("THICK"), "absorber thickness [user units]", 0.0),
            bytes(&name("FILE_ABS"), "absorber file", "NONESPECIFIED"),
        ]);
    }
    fields
}
impl OpticalElementParameters {
    /// Create an empty element carrying a single rectangular aperture (white beam slits).
    ///
    /// The aperture is given as `[width, height]` and placed at `distance` from the previous
    /// element (all in user units).
    ///
    /// # Errors
    ///
    /// This function will return an error if the aperture is not positive or the distance is negative.
    pub fn screen_slits(aperture: [f64; 2], distance: f64) -> BrResult<Self> {
        if aperture.iter().any(|a| !a.is_finite() || *a <= 0.0) {
            return Err(BeamrecError::Other(format!(
                "aperture must be positive, got {aperture:?}"
            )));
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(BeamrecError::Other(format!(
                "distance must be positive, got {distance}"
            )));
        }
        let mut oe = Self::empty_element()?;
        oe.props.set("F_SCREEN", 1.into())?;
        oe.props.set("N_SCREEN", 1.into())?;
        oe.props.set(&indexed_field_name("I_SLIT", 1)?, 1.into())?;
        oe.props
            .set(&indexed_field_name("RX_SLIT", 1)?, aperture[0].into())?;
        oe.props
            .set(&indexed_field_name("RZ_SLIT", 1)?, aperture[1].into())?;
        oe.props.set("T_SOURCE", distance.into())?;
        Ok(oe)
    }
    /// Create an empty element which only rotates the axis system around the beam by the given
    /// angle (in degrees). Negative angles are mapped into the positive range.
    ///
    /// # Errors
    ///
    /// This function will return an error if the fields cannot be set.
    pub fn axis_rotation(rotation_angle: f64) -> BrResult<Self> {
        let mut oe = Self::empty_element()?;
        oe.props
            .set("ALPHA", normalise_angle(rotation_angle).into())?;
        oe.props.set("T_SOURCE", 0.0.into())?;
        Ok(oe)
    }
    fn empty_element() -> BrResult<Self> {
        let mut oe = Self::default();
        oe.props.set("DUMMY", 0.1.into())?;
        oe.props.set("FWRITE", 3.into())?;
        oe.props.set("F_REFRAC", 2.into())?;
        oe.props.set("T_IMAGE", 0.0.into())?;
        oe.props.set("T_INCIDENCE", 0.0.into())?;
        oe.props.set("T_REFLECTION", 180.0.into())?;
        Ok(oe)
    }
}
impl ParameterEntity for OpticalElementParameters {
    fn entity_kind(&self) -> &'static str {
        "optical element"
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
    use crate::field_value::{FieldValue, SniffPolicy};
    use tempfile::NamedTempFile;
    #[test]
    fn default() {
        let oe = OpticalElementParameters::default();
        assert_eq!(
            oe.properties().nr_of_props(),
            60 + 12 * NR_OF_SCREEN_SLOTS
        );
        assert_eq!(oe.properties().get_float("T_SOURCE").unwrap(), 10.0);
        assert!(oe.properties().contains("RX_SLIT(10)"));
        assert!(!oe.properties().contains("RX_SLIT(11)"));
    }
    #[test]
    fn indexed_name() {
        assert_eq!(indexed_field_name("RX_SLIT", 1).unwrap(), "RX_SLIT(1)");
        assert_eq!(indexed_field_name("I_SLIT", 10).unwrap(), "I_SLIT(10)");
        assert!(indexed_field_name("I_SLIT", 0).is_err());
        assert!(indexed_field_name("I_SLIT", 11).is_err());
    }
    #[test]
    fn screen_slits() {
        let oe = OpticalElementParameters::screen_slits([0.03, 0.07], 50500.0).unwrap();
        let props = oe.properties();
        assert_eq!(props.get_float("DUMMY").unwrap(), 0.1);
        assert_eq!(props.get_int("FWRITE").unwrap(), 3);
        assert_eq!(props.get_int("F_REFRAC").unwrap(), 2);
        assert_eq!(props.get_int("F_SCREEN").unwrap(), 1);
        assert_eq!(props.get_int("N_SCREEN").unwrap(), 1);
        assert_eq!(props.get_int("I_SLIT(1)").unwrap(), 1);
        assert_eq!(props.get_float("RX_SLIT(1)").unwrap(), 0.03);
        assert_eq!(props.get_float("RZ_SLIT(1)").unwrap(), 0.07);
        assert_eq!(props.get_float("RX_SLIT(2)").unwrap(), 0.0);
        assert_eq!(props.get_float("T_REFLECTION").unwrap(), 180.0);
        assert_eq!(props.get_float("T_SOURCE").unwrap(), 50500.0);
    }
    #[test]
    fn screen_slits_invalid() {
        assert!(OpticalElementParameters::screen_slits([0.0, 0.1], 1.0).is_err());
        assert!(OpticalElementParameters::screen_slits([0.1, f64::NAN], 1.0).is_err());
        assert!(OpticalElementParameters::screen_slits([0.1, 0.1], -1.0).is_err());
    }
    #[test]
    fn axis_rotation() {
        let oe = OpticalElementParameters::axis_rotation(-90.0).unwrap();
        assert_eq!(oe.properties().get_float("ALPHA").unwrap(), 270.0);
        assert_eq!(oe.properties().get_float("T_SOURCE").unwrap(), 0.0);
        assert_eq!(oe.entity_kind(), "optical element");
    }
    #[test]
    fn round_trip_with_indexed_fields() {
        let oe = OpticalElementParameters::screen_slits([0.1, 0.2], 25000.0).unwrap();
        let file = NamedTempFile::new().unwrap();
        oe.save_to_file(file.path()).unwrap();
        let loaded =
            OpticalElementParameters::load_from_file(file.path(), SniffPolicy::Standard).unwrap();
        assert_eq!(loaded, oe);
        assert_eq!(
            loaded.field("FILE_REFL").unwrap(),
            &FieldValue::from("GAAS.SHA")
        );
    }
}
