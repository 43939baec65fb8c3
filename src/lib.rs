//! This is the documentation for the **beamrec** package.
//!
//! **beamrec** prepares the parameters of X-ray beamline simulations (undulator sources, slits, KB
//! mirrors) for external ray-tracing engines and persists them as flat `key = value` records:
//!   - [`record`]: the record format and the type sniffing of stored values ([`field_value`]).
//!   - [`entity`] / [`entities`]: typed field sets of sources, optical elements, hybrid
//!     undulators and hybrid diffraction inputs.
//!   - [`history`]: the start / end record pairs stored next to a beam data file.
//!   - [`undulator`]: setup of gaussian and hybrid undulator sources.
//!   - [`motors`]: motor resolutions and optimization defaults of the focusing optics.
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod console;
pub mod entities;
pub mod entity;
pub mod error;
pub mod field_value;
pub mod history;
pub mod motors;
pub mod properties;
pub mod record;
pub mod undulator;
pub mod utils;

/// Return the version of the currently built beamrec library.
#[must_use]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}
