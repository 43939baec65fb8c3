//! Module for handling entity properties
//!
//! Every beamline entity kind declares its complete field set as [`Properties`]: each field is
//! created once with a description and a default value whose kind is the declared kind of the
//! field. Values read from record files are applied through [`Properties::set`], which rejects
//! unknown names and incompatible kinds.
pub mod property;

pub use property::Property;

use crate::{
    error::{BeamrecError, BrResult},
    field_value::FieldValue,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A general set of (entity) properties.
///
/// ## Example
/// ```rust
/// use beamrec::properties::Properties;
/// let mut props = Properties::default();
/// props.create("T_SOURCE", "distance from the previous element", 10.0.into()).unwrap();
/// props.set("T_SOURCE", 2.71.into()).unwrap();
/// ```
#[derive(Default, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Properties {
    props: BTreeMap<String, Property>,
}
impl Properties {
    /// Create a new property with the given name.
    ///
    /// # Errors
    ///
    /// This function will return an [`BeamrecError::Other`] if a property with the same name was already created before.
    pub fn create(&mut self, name: &str, description: &str, value: FieldValue) -> BrResult<()> {
        if self.props.contains_key(name) {
            return Err(BeamrecError::Other(format!(
                "property {name} already created",
            )));
        }
        let new_property = Property::new(value, description.into());
        self.props.insert(name.into(), new_property);
        Ok(())
    }
    /// Returns the number of properties that have been created
    #[must_use]
    pub fn nr_of_props(&self) -> usize {
        self.props.len()
    }
    /// Set the value of the property with the given name.
    ///
    /// # Errors
    ///
    /// This function will return
    ///   - [`BeamrecError::UnknownField`] if the property with the given name does not exist.
    ///   - [`BeamrecError::TypeMismatch`] if the value does not fit the declared kind.
    pub fn set(&mut self, name: &str, value: FieldValue) -> BrResult<()> {
        let property = self
            .props
            .get_mut(name)
            .ok_or_else(|| BeamrecError::UnknownField(format!("property {name} does not exist")))?;
        property.set_value(value).map_err(|e| match e {
            BeamrecError::TypeMismatch(m) => BeamrecError::TypeMismatch(format!("{name}: {m}")),
            other => other,
        })
    }
    /// Returns the iter of this [`Properties`].
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, Property> {
        self.props.iter()
    }
    /// Returns `true` if no property has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
    /// Return `true`if a property with the given name exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }
    /// Return the value of the given property.
    ///
    /// # Errors
    ///
    /// This function will return an error if the property with the given name does not exist.
    pub fn get(&self, name: &str) -> BrResult<&FieldValue> {
        self.props.get(name).map_or_else(
            || {
                Err(BeamrecError::UnknownField(format!(
                    "property {name} does not exist"
                )))
            },
            |prop| Ok(prop.value()),
        )
    }
    /// Return the value of an integer property.
    ///
    /// # Errors
    ///
    /// This function will return an error if the property does not exist or is not an integer.
    pub fn get_int(&self, name: &str) -> BrResult<i64> {
        match self.get(name)? {
            FieldValue::Int(value) => Ok(*value),
            _ => Err(BeamrecError::TypeMismatch(format!(
                "{name} is not an int property"
            ))),
        }
    }
    /// Return the value of a float property.
    ///
    /// # Errors
    ///
    /// This function will return an error if the property does not exist or is not a float.
    pub fn get_float(&self, name: &str) -> BrResult<f64> {
        match self.get(name)? {
            FieldValue::Float(value) => Ok(*value),
            _ => Err(BeamrecError::TypeMismatch(format!(
                "{name} is not a float property"
            ))),
        }
    }
    /// Return the value of a byte string property.
    ///
    /// # Errors
    ///
    /// This function will return an error if the property does not exist or is not a byte string.
    pub fn get_bytes(&self, name: &str) -> BrResult<&[u8]> {
        match self.get(name)? {
            FieldValue::Bytes(value) => Ok(value),
            _ => Err(BeamrecError::TypeMismatch(format!(
                "{name} is not a bytes property"
            ))),
        }
    }
}

impl<'a> IntoIterator for &'a Properties {
    type IntoIter = std::collections::btree_map::Iter<'a, String, Property>;
    type Item = (&'a std::string::String, &'a Property);
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    #[test]
    fn properties_create() {
        let mut props = Properties::default();
        assert!(props.create("test", "my description", 1.into()).is_ok());
        assert_eq!(props.nr_of_props(), 1);
        assert!(props.create("test2", "my description", 1.into()).is_ok());
        assert_eq!(props.nr_of_props(), 2);
        assert!(props.create("test", "my description", 2.into()).is_err());
        assert_eq!(props.nr_of_props(), 2);
    }
    #[test]
    fn properties_get() {
        let mut props = Properties::default();
        props.create("test", "my description", 1.into()).unwrap();
        let prop = props.get("test").unwrap();
        assert_matches!(prop, &FieldValue::Int(1));
        assert_matches!(props.get("wrong"), Err(BeamrecError::UnknownField(_)));
    }
    #[test]
    fn properties_set() {
        let mut props = Properties::default();
        props.create("PH1", "photon energy", 1000.0.into()).unwrap();
        props.set("PH1", 5000.0.into()).unwrap();
        assert_eq!(props.get_float("PH1").unwrap(), 5000.0);
        assert_eq!(
            props.set("PH3", 1.0.into()),
            Err(BeamrecError::UnknownField(
                "property PH3 does not exist".into()
            ))
        );
        assert_matches!(
            props.set("PH1", "abc".into()),
            Err(BeamrecError::TypeMismatch(m)) if m.starts_with("PH1:")
        );
    }
    #[test]
    fn properties_typed_getters() {
        let mut props = Properties::default();
        props.create("NPOINT", "", 5000.into()).unwrap();
        props.create("SIGMAX", "", 0.1.into()).unwrap();
        props.create("FILE_TRAJ", "", "NONESPECIFIED".into()).unwrap();
        assert_eq!(props.get_int("NPOINT").unwrap(), 5000);
        assert_eq!(props.get_float("SIGMAX").unwrap(), 0.1);
        assert_eq!(props.get_bytes("FILE_TRAJ").unwrap(), b"NONESPECIFIED");
        assert!(props.get_int("SIGMAX").is_err());
        assert!(props.get_float("FILE_TRAJ").is_err());
        assert!(props.get_bytes("NPOINT").is_err());
        assert!(props.get_int("wrong").is_err());
    }
    #[test]
    fn is_empty() {
        let mut props = Properties::default();
        assert!(props.is_empty());
        props.create("my prop", "my description", 1.into()).unwrap();
        assert!(!props.is_empty());
        assert!(props.contains("my prop"));
    }
    #[test]
    fn iter_in_name_order() {
        let mut props = Properties::default();
        props.create("b", "", 1.into()).unwrap();
        props.create("a", "", 2.into()).unwrap();
        let names: Vec<&String> = props.iter().map(|p| p.0).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
