//! Error types for solver operations.

use thiserror::Error;
use tp_core::TpError;
use tp_props::PropsError;

/// Errors that can occur while solving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Iteration cap reached before the step fell below tolerance.
    #[error("Solver did not converge after {iterations} iterations (last estimate {last})")]
    DidNotConverge { iterations: usize, last: f64 },

    #[error("Invalid solver configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Property error: {0}")]
    Props(#[from] PropsError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for TpError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::DidNotConverge { .. } => TpError::NoConvergence {
                what: e.to_string(),
            },
            SolverError::InvalidConfig { what } => TpError::InvalidArg { what },
            SolverError::Numeric { what } => TpError::Data { what },
            SolverError::Props(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_convergence_maps_to_core_error() {
        let err: TpError = SolverError::DidNotConverge {
            iterations: 5000,
            last: 812.0,
        }
        .into();
        assert!(matches!(err, TpError::NoConvergence { .. }));
    }

    #[test]
    fn props_errors_pass_through() {
        let err: SolverError = PropsError::NotSupported {
            what: "NASA enthalpy for SO2".into(),
        }
        .into();
        assert!(err.to_string().contains("SO2"));
        let core: TpError = err.into();
        assert!(matches!(core, TpError::InvalidArg { .. }));
    }
}
