#![warn(missing_docs)]
//! Beamrec specific error structures
use std::{error::Error, fmt::Display};

/// Beamrec application specific Result type
pub type BrResult<T> = std::result::Result<T, BeamrecError>;

/// Errors that can be returned by various beamrec functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeamrecError {
    /// a record file could not be read or written
    Io(String),
    /// a record file contains a line which is neither an entry, a comment nor a continuation
    Parse(String),
    /// a record names a field the target entity does not define
    UnknownField(String),
    /// a value does not fit the declared kind of a field
    TypeMismatch(String),
    /// errors while setting up a light source
    Source(String),
    /// errors in connection with motor positions and resolutions
    Motor(String),
    /// errors while reading the beamline configuration
    Config(String),
    /// errors console io
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for BeamrecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(m) => {
                write!(f, "Io:{m}")
            }
            Self::Parse(m) => {
                write!(f, "Parse:{m}")
            }
            Self::UnknownField(m) => {
                write!(f, "UnknownField:{m}")
            }
            Self::TypeMismatch(m) => {
                write!(f, "TypeMismatch:{m}")
            }
            Self::Source(m) => {
                write!(f, "Source:{m}")
            }
            Self::Motor(m) => {
                write!(f, "Motor:{m}")
            }
            Self::Config(m) => {
                write!(f, "Config:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "Beamrec Error:Other:{m}"),
        }
    }
}
impl Error for BeamrecError {}

impl std::convert::From<String> for BeamrecError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        let error = BeamrecError::from("test".to_string());
        assert_eq!(error, BeamrecError::Other("test".to_string()));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", BeamrecError::Io("test".to_string())),
            "Io:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::Parse("test".to_string())),
            "Parse:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::UnknownField("test".to_string())),
            "UnknownField:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::TypeMismatch("test".to_string())),
            "TypeMismatch:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::Source("test".to_string())),
            "Source:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::Motor("test".to_string())),
            "Motor:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::Config("test".to_string())),
            "Config:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::Console("test".to_string())),
            "Console:test"
        );
        assert_eq!(
            format!("{}", BeamrecError::Other("test".to_string())),
            "Beamrec Error:Other:test"
        );
    }
    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", BeamrecError::Io("test".to_string())),
            "Io(\"test\")"
        );
    }
}
