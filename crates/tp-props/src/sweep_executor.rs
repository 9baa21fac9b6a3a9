//! Sweep execution: evaluate one property of one species across a sweep.
//!
//! Points are independent queries against a read-only database, so they are
//! evaluated in parallel with rayon. A failing point is recorded, not fatal.

use crate::query::{PropertyDatabase, PropertyQuery};
use crate::record::PropertyKind;
use crate::sweeps::{SweepAxis, SweepDefinition};
use rayon::prelude::*;
use thiserror::Error;

/// Error in sweep setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("Invalid sweep configuration: {0}")]
    InvalidConfiguration(String),
}

/// Per-point outcome of a property sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub species: String,
    pub property: PropertyKind,
    pub unit: String,
    pub axis: SweepAxis,
    /// Fixed value of the other state variable (Pa for temperature sweeps, K for pressure sweeps).
    pub fixed_value: f64,
    /// Sweep parameter values, K or Pa.
    pub independent_values: Vec<f64>,
    /// Property values; `None` where evaluation failed.
    pub values: Vec<Option<f64>>,
    /// `(point index, error message)` for each failed point.
    pub failures: Vec<(usize, String)>,
    pub num_successful: usize,
    pub num_failed: usize,
}

impl SweepResult {
    /// `(x, value)` pairs of the points that evaluated.
    pub fn successful_points(&self) -> Vec<(f64, f64)> {
        self.independent_values
            .iter()
            .zip(&self.values)
            .filter_map(|(x, v)| v.map(|v| (*x, v)))
            .collect()
    }

    /// `(T [K], P [Pa])` of point `i`.
    pub fn state_at(&self, i: usize) -> Option<(f64, f64)> {
        let x = *self.independent_values.get(i)?;
        Some(match self.axis {
            SweepAxis::Temperature => (x, self.fixed_value),
            SweepAxis::Pressure => (self.fixed_value, x),
        })
    }
}

/// Evaluate `property` of `species` at every sweep point.
///
/// `fixed_value` is the pressure [Pa] of a temperature sweep or the
/// temperature [K] of a pressure sweep.
pub fn execute_property_sweep(
    db: &PropertyDatabase,
    species: &str,
    property: PropertyKind,
    unit: &str,
    sweep: &SweepDefinition,
    fixed_value: f64,
) -> Result<SweepResult, SweepError> {
    if !fixed_value.is_finite() {
        return Err(SweepError::InvalidConfiguration(format!(
            "fixed value must be finite, got {fixed_value}"
        )));
    }

    let points = sweep.generate_points();
    let outcomes: Vec<Result<f64, String>> = points
        .par_iter()
        .map(|&x| {
            let (t, p) = match sweep.axis {
                SweepAxis::Temperature => (x, fixed_value),
                SweepAxis::Pressure => (fixed_value, x),
            };
            let query = PropertyQuery::new(species, property, t, p).in_unit(unit);
            db.evaluate(&query).map_err(|e| e.to_string())
        })
        .collect();

    let mut values = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(v) => values.push(Some(v)),
            Err(msg) => {
                values.push(None);
                failures.push((i, msg));
            }
        }
    }
    let num_failed = failures.len();
    let num_successful = values.len() - num_failed;
    tracing::debug!(
        species,
        property = %property,
        sweep = %sweep,
        num_successful,
        num_failed,
        "property sweep finished"
    );

    Ok(SweepResult {
        species: species.to_string(),
        property,
        unit: unit.to_string(),
        axis: sweep.axis,
        fixed_value,
        independent_values: points,
        values,
        failures,
        num_successful,
        num_failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweeps::SweepType;

    #[test]
    fn missing_database_records_every_point_as_failed() {
        let db = PropertyDatabase::new("/nonexistent/species_index.txt");
        let sweep =
            SweepDefinition::new(SweepAxis::Temperature, 300.0, 400.0, 4, SweepType::Linear).unwrap();
        let result =
            execute_property_sweep(&db, "H2O", PropertyKind::Psat, "DEFAULT", &sweep, 1e5).unwrap();
        assert_eq!(result.num_successful, 0);
        assert_eq!(result.num_failed, 4);
        assert_eq!(result.failures[2].0, 2);
        assert!(result.successful_points().is_empty());
        assert_eq!(result.state_at(0), Some((300.0, 1e5)));
    }

    #[test]
    fn rejects_non_finite_fixed_value() {
        let db = PropertyDatabase::new("/nonexistent/species_index.txt");
        let sweep =
            SweepDefinition::new(SweepAxis::Pressure, 1e5, 2e5, 2, SweepType::Linear).unwrap();
        assert!(
            execute_property_sweep(&db, "H2O", PropertyKind::Psat, "DEFAULT", &sweep, f64::NAN)
                .is_err()
        );
    }
}
