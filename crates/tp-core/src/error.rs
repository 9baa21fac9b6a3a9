use thiserror::Error;

pub type TpResult<T> = Result<T, TpError>;

#[derive(Error, Debug)]
pub enum TpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Lookup failed: {what}")]
    NotFound { what: String },

    #[error("Data error: {what}")]
    Data { what: String },

    #[error("Did not converge: {what}")]
    NoConvergence { what: String },
}
