//! Property engine errors.

use std::path::PathBuf;
use thiserror::Error;
use tp_core::TpError;

/// Result type for property operations.
pub type PropsResult<T> = Result<T, PropsError>;

/// Errors that can occur while locating, parsing or evaluating property data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropsError {
    /// The species index file could not be opened.
    #[error("Index file not found: {}", path.display())]
    IndexFileNotFound { path: PathBuf },

    /// The per-species property data file could not be opened.
    #[error("Species file not found: {}", path.display())]
    SpeciesFileNotFound { path: PathBuf },

    /// The species is absent from every index searched.
    #[error("Species {species} is not in the property database")]
    SpeciesNotFound { species: String },

    /// No record for the property, or none valid at the requested state.
    #[error("No valid {property} record for species {species} at T={t}, P={p}")]
    RecordNotFound {
        species: String,
        property: String,
        t: f64,
        p: f64,
    },

    /// A model's constants do not match what the model requires.
    #[error("Invalid parameter set for model {model}: {reason}")]
    InvalidParameterSet { model: String, reason: String },

    /// A model, property, representation or dependence tag outside the known vocabulary.
    #[error("Unknown {what} tag '{tag}'")]
    UnknownTag { what: &'static str, tag: String },

    /// A record that breaks a structural invariant (table shape, validity, dependence).
    #[error("Malformed {property} record for species {species}: {reason}")]
    MalformedRecord {
        species: String,
        property: String,
        reason: String,
    },

    /// No conversion path between the two units.
    #[error("Unsupported unit conversion from {from} to {to}")]
    UnsupportedUnitConversion { from: String, to: String },

    /// Value outside the range a built-in correlation covers.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: String, value: f64 },

    /// Species or operation not covered by a built-in correlation.
    #[error("Not supported: {what}")]
    NotSupported { what: String },

    /// Mole fractions that cannot be normalized.
    #[error("Invalid composition: {what}")]
    InvalidComposition { what: &'static str },

    /// Read failure after a file was successfully opened.
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl From<PropsError> for TpError {
    fn from(err: PropsError) -> Self {
        match err {
            PropsError::IndexFileNotFound { .. }
            | PropsError::SpeciesFileNotFound { .. }
            | PropsError::SpeciesNotFound { .. }
            | PropsError::RecordNotFound { .. } => TpError::NotFound {
                what: err.to_string(),
            },
            PropsError::InvalidParameterSet { .. }
            | PropsError::UnknownTag { .. }
            | PropsError::MalformedRecord { .. }
            | PropsError::Io { .. } => TpError::Data {
                what: err.to_string(),
            },
            PropsError::UnsupportedUnitConversion { .. }
            | PropsError::OutOfRange { .. }
            | PropsError::NotSupported { .. }
            | PropsError::InvalidComposition { .. } => TpError::InvalidArg {
                what: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropsError::SpeciesNotFound {
            species: "XENON".into(),
        };
        assert!(err.to_string().contains("XENON"));

        let err = PropsError::InvalidParameterSet {
            model: "ANTOINE".into(),
            reason: "unknown constant D".into(),
        };
        assert!(err.to_string().contains("ANTOINE"));
    }

    #[test]
    fn error_to_tp_error() {
        let err = PropsError::RecordNotFound {
            species: "H2O".into(),
            property: "PSAT".into(),
            t: 900.0,
            p: 1e5,
        };
        let tp_err: TpError = err.into();
        assert!(matches!(tp_err, TpError::NotFound { .. }));
    }
}
