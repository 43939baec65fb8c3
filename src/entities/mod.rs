//! Concrete beamline entity kinds and their declared field sets.
mod hybrid_diffraction;
mod hybrid_undulator;
mod optical_element;
mod source;

pub use hybrid_diffraction::{CalculationType, DiffractionPlane, HybridDiffractionParameters};
pub use hybrid_undulator::HybridUndulatorParameters;
pub use optical_element::{indexed_field_name, OpticalElementParameters, NR_OF_SCREEN_SLOTS};
pub use source::SourceParameters;

use crate::{field_value::FieldValue, properties::Properties};
use log::warn;
use std::fmt::Display;
use strum::EnumIter;

/// The kinds of entities whose parameters can be stored as records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum EntityKind {
    /// a ray-tracing light source
    Source,
    /// an optical element (slit, mirror, screen, empty element)
    OpticalElement,
    /// the settings of a hybrid undulator source
    HybridUndulator,
    /// the inputs of a hybrid diffraction calculation
    HybridDiffraction,
}
impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::OpticalElement => write!(f, "optical element"),
            Self::HybridUndulator => write!(f, "hybrid undulator"),
            Self::HybridDiffraction => write!(f, "hybrid diffraction"),
        }
    }
}

/// Field declaration: name, description and default value.
type FieldDecl = (String, &'static str, FieldValue);

fn declare_fields(fields: Vec<FieldDecl>) -> Properties {
    let mut props = Properties::default();
    for (name, description, value) in fields {
        if props.create(&name, description, value).is_err() {
            warn!("field {name} declared twice, keeping the first declaration");
        }
    }
    props
}
fn int(name: &str, description: &'static str, value: i64) -> FieldDecl {
    (name.to_owned(), description, FieldValue::Int(value))
}
fn float(name: &str, description: &'static str, value: f64) -> FieldDecl {
    (name.to_owned(), description, FieldValue::Float(value))
}
fn bytes(name: &str, description: &'static str, value: &str) -> FieldDecl {
    (name.to_owned(), description, FieldValue::from(value))
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_helper::test_helper::check_warnings;
    #[test]
    fn declare_duplicate() {
        testing_logger::setup();
        let props = declare_fields(vec![int("A", "", 1), float("A", "", 2.0)]);
        assert_eq!(props.nr_of_props(), 1);
        assert_eq!(props.get_int("A").unwrap(), 1);
        check_warnings(vec!["field A declared twice, keeping the first declaration"]);
    }
    #[test]
    fn display() {
        assert_eq!(format!("{}", EntityKind::Source), "source");
        assert_eq!(format!("{}", EntityKind::OpticalElement), "optical element");
        assert_eq!(format!("{}", EntityKind::HybridUndulator), "hybrid undulator");
        assert_eq!(format!("{}", EntityKind::HybridDiffraction), "hybrid diffraction");
    }
}
