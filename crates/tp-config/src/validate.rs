//! Configuration validation.

use crate::schema::EngineConfig;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_config(config: &EngineConfig) -> Result<(), ValidationError> {
    if config.database.index_file.as_os_str().is_empty() {
        return Err(invalid("database.index_file", "", "must not be empty"));
    }
    if let Some(secondary) = &config.database.secondary_index {
        if secondary.as_os_str().is_empty() {
            return Err(invalid("database.secondary_index", "", "must not be empty"));
        }
    }

    let solver = &config.solver;
    if solver.max_iterations == 0 {
        return Err(invalid("solver.max_iterations", 0, "must be positive"));
    }
    if !(solver.tolerance.is_finite() && solver.tolerance > 0.0) {
        return Err(invalid("solver.tolerance", solver.tolerance, "must be positive"));
    }
    if !(solver.damping > 0.0 && solver.damping <= 1.0) {
        return Err(invalid("solver.damping", solver.damping, "must lie in (0, 1]"));
    }
    if !(solver.fd_step.is_finite() && solver.fd_step != 0.0) {
        return Err(invalid("solver.fd_step", solver.fd_step, "must be finite and non-zero"));
    }
    if !solver.initial_guess_c.is_finite() {
        return Err(invalid(
            "solver.initial_guess_c",
            solver.initial_guess_c,
            "must be finite",
        ));
    }

    if !config.reference_temperature_c.is_finite() {
        return Err(invalid(
            "reference_temperature_c",
            config.reference_temperature_c,
            "must be finite",
        ));
    }
    if !(config.normal_molar_volume.is_finite() && config.normal_molar_volume > 0.0) {
        return Err(invalid(
            "normal_molar_volume",
            config.normal_molar_volume,
            "must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_solver_settings() {
        let mut cfg = EngineConfig::default();
        cfg.solver.damping = 0.0;
        let err = validate_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("solver.damping"));

        let mut cfg = EngineConfig::default();
        cfg.solver.max_iterations = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = EngineConfig::default();
        cfg.solver.tolerance = -1.0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = EngineConfig::default();
        cfg.solver.fd_step = 0.0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_empty_index_path() {
        let mut cfg = EngineConfig::default();
        cfg.database.index_file = "".into();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_non_positive_molar_volume() {
        let cfg = EngineConfig {
            normal_molar_volume: 0.0,
            ..Default::default()
        };
        assert!(validate_config(&cfg).is_err());
    }
}
