//! Engine configuration file schema.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tp_props::{EnthalpyBasis, PropertyDatabase, UpperBoundPolicy};
use tp_solver::{DampedNewtonConfig, InversionConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub interpolation: InterpolationConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    /// Temperature of zero sensible mixture enthalpy [°C].
    #[serde(default = "default_reference_temperature_c")]
    pub reference_temperature_c: f64,
    /// Ideal-gas molar volume at normal conditions [m³/mol].
    #[serde(default = "default_normal_molar_volume")]
    pub normal_molar_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Primary `SPECIES_ID/COMPOSITION/THERMO_DATA` index.
    pub index_file: PathBuf,
    /// Legacy `COMPOUND/COMPOSITION/FILE` index, searched second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_index: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    #[serde(default)]
    pub upper_bound: UpperBoundPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub damping: f64,
    pub fd_step: f64,
    /// Starting temperature [°C] when no prior estimate exists.
    pub initial_guess_c: f64,
}

fn default_reference_temperature_c() -> f64 {
    EnthalpyBasis::default().reference_c
}

fn default_normal_molar_volume() -> f64 {
    EnthalpyBasis::default().molar_volume
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            index_file: PathBuf::from("species_index.txt"),
            secondary_index: None,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        let newton = DampedNewtonConfig::default();
        Self {
            max_iterations: newton.max_iterations,
            tolerance: newton.tolerance,
            damping: newton.damping,
            fd_step: newton.fd_step,
            initial_guess_c: InversionConfig::default().initial_guess_c,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            interpolation: InterpolationConfig::default(),
            solver: SolverConfig::default(),
            reference_temperature_c: default_reference_temperature_c(),
            normal_molar_volume: default_normal_molar_volume(),
        }
    }
}

impl EngineConfig {
    /// Database handle with the configured indexes and interpolation policy.
    pub fn open_database(&self) -> PropertyDatabase {
        let db = PropertyDatabase::new(&self.database.index_file)
            .with_upper_bound_policy(self.interpolation.upper_bound);
        match &self.database.secondary_index {
            Some(path) => db.with_secondary_index(path),
            None => db,
        }
    }

    pub fn solver_config(&self) -> InversionConfig {
        InversionConfig {
            newton: DampedNewtonConfig {
                max_iterations: self.solver.max_iterations,
                tolerance: self.solver.tolerance,
                damping: self.solver.damping,
                fd_step: self.solver.fd_step,
            },
            initial_guess_c: self.solver.initial_guess_c,
        }
    }

    pub fn enthalpy_basis(&self) -> EnthalpyBasis {
        EnthalpyBasis {
            reference_c: self.reference_temperature_c,
            molar_volume: self.normal_molar_volume,
        }
    }
}
