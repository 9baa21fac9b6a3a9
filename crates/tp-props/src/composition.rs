//! Gas mixture composition.

use crate::error::{PropsError, PropsResult};
use crate::gas::GasSpecies;
use tp_core::numeric::{Tolerances, nearly_equal};

/// Gas composition defined by normalized mole fractions.
///
/// Inputs may be mole fractions, molar flows or normal volume flows; they are
/// normalized to sum to 1.0 on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GasComposition {
    items: Vec<(GasSpecies, f64)>,
}

impl GasComposition {
    pub fn pure(species: GasSpecies) -> Self {
        Self {
            items: vec![(species, 1.0)],
        }
    }

    /// Create a composition from mole fractions (or any amounts proportional to them).
    ///
    /// Repeated species are summed. Zero entries are dropped.
    pub fn new_mole_fractions(fractions: Vec<(GasSpecies, f64)>) -> PropsResult<Self> {
        if fractions.is_empty() {
            return Err(PropsError::InvalidComposition {
                what: "empty composition",
            });
        }

        let mut merged: Vec<(GasSpecies, f64)> = Vec::with_capacity(fractions.len());
        let mut sum = 0.0;
        for (species, frac) in fractions {
            if !frac.is_finite() {
                return Err(PropsError::InvalidComposition {
                    what: "non-finite mole fraction",
                });
            }
            if frac < 0.0 {
                return Err(PropsError::InvalidComposition {
                    what: "negative mole fraction",
                });
            }
            sum += frac;
            match merged.iter_mut().find(|(s, _)| *s == species) {
                Some((_, existing)) => *existing += frac,
                None => merged.push((species, frac)),
            }
        }

        if sum <= 0.0 || !sum.is_finite() {
            return Err(PropsError::InvalidComposition {
                what: "mole fractions sum to zero or non-finite",
            });
        }

        let items: Vec<(GasSpecies, f64)> = merged
            .into_iter()
            .map(|(s, f)| (s, f / sum))
            .filter(|(_, f)| *f > 1e-15)
            .collect();

        Ok(Self { items })
    }

    /// Flue-gas style constructor in the conventional CO2/H2O/O2/N2/CO/H2 order.
    pub fn flue_gas(
        x_co2: f64,
        x_h2o: f64,
        x_o2: f64,
        x_n2: f64,
        x_co: f64,
        x_h2: f64,
    ) -> PropsResult<Self> {
        Self::new_mole_fractions(vec![
            (GasSpecies::CO2, x_co2),
            (GasSpecies::H2O, x_h2o),
            (GasSpecies::O2, x_o2),
            (GasSpecies::N2, x_n2),
            (GasSpecies::CO, x_co),
            (GasSpecies::H2, x_h2),
        ])
    }

    /// Mole fraction of `species` (0.0 if absent).
    pub fn mole_fraction(&self, species: GasSpecies) -> f64 {
        self.items
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// `Some(species)` when a single species makes up the whole mixture.
    pub fn is_pure(&self) -> Option<GasSpecies> {
        match self.items.as_slice() {
            [(species, frac)] if nearly_equal(*frac, 1.0, Tolerances { abs: 1e-10, rel: 1e-10 }) => {
                Some(*species)
            }
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GasSpecies, f64)> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mixture molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        self.items
            .iter()
            .map(|(species, x)| species.molar_mass() * x)
            .sum()
    }
}
