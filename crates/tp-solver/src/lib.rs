//! tp-solver: damped Newton iteration and enthalpy → temperature inversion.
//!
//! The inversion carries no hidden state between calls: the previous
//! solution, when there is one, is passed in explicitly as `prior`.

pub mod error;
pub mod inversion;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use inversion::{
    DEFAULT_INITIAL_GUESS_C, InversionConfig, invert_enthalpy_to_temperature, invert_enthalpy_with,
};
pub use newton::{DampedNewtonConfig, NewtonResult, damped_newton};
