//! Gas mixture properties: sensible enthalpy per normal cubic metre and Wilke viscosity.

use crate::composition::GasComposition;
use crate::error::PropsResult;
use crate::gas::{self, GasSpecies};
use crate::query::PropertyDatabase;
use tp_core::units::constants::NORMAL_MOLAR_VOLUME_M3;
use tp_core::units::{DynVisc, Temperature, degc, kelvin_of, pa_s};

/// Supplier of species molar enthalpies [J/mol].
///
/// Only differences are used, so any consistent reference state works.
pub trait EnthalpySource {
    fn molar_enthalpy(&self, species: GasSpecies, t: Temperature) -> PropsResult<f64>;
}

/// Built-in NASA 7-coefficient polynomials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NasaPolynomials;

impl EnthalpySource for NasaPolynomials {
    fn molar_enthalpy(&self, species: GasSpecies, t: Temperature) -> PropsResult<f64> {
        Ok(gas::nasa_enthalpy(species, t)?.value)
    }
}

/// Built-in NIST Shomate tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShomateTables;

impl EnthalpySource for ShomateTables {
    fn molar_enthalpy(&self, species: GasSpecies, t: Temperature) -> PropsResult<f64> {
        Ok(gas::shomate_enthalpy(species, t)?.value)
    }
}

/// `H` records of the property database, looked up by formula at a fixed pressure.
#[derive(Debug, Clone)]
pub struct DatabaseEnthalpy<'a> {
    db: &'a PropertyDatabase,
    pressure_pa: f64,
}

impl<'a> DatabaseEnthalpy<'a> {
    pub fn new(db: &'a PropertyDatabase, pressure_pa: f64) -> Self {
        Self { db, pressure_pa }
    }
}

impl EnthalpySource for DatabaseEnthalpy<'_> {
    fn molar_enthalpy(&self, species: GasSpecies, t: Temperature) -> PropsResult<f64> {
        self.db
            .get_property(species.formula(), "H", kelvin_of(t), self.pressure_pa, "J/MOL")
    }
}

/// Reference state of the normal-volume enthalpy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnthalpyBasis {
    /// Temperature of zero sensible enthalpy [°C].
    pub reference_c: f64,
    /// Molar volume at normal conditions [m³/mol].
    pub molar_volume: f64,
}

impl Default for EnthalpyBasis {
    fn default() -> Self {
        Self {
            reference_c: 25.0,
            molar_volume: NORMAL_MOLAR_VOLUME_M3,
        }
    }
}

/// Sensible enthalpy of a gas mixture [J/Nm³].
#[derive(Debug, Clone, Default)]
pub struct MixtureEnthalpy<S> {
    source: S,
    basis: EnthalpyBasis,
}

impl<S: EnthalpySource> MixtureEnthalpy<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            basis: EnthalpyBasis::default(),
        }
    }

    pub fn with_basis(mut self, basis: EnthalpyBasis) -> Self {
        self.basis = basis;
        self
    }

    pub fn basis(&self) -> EnthalpyBasis {
        self.basis
    }

    /// Σ xᵢ (Hᵢ(T) − Hᵢ(T_ref)) / V_n at `t_c` [°C].
    pub fn enthalpy(&self, t_c: f64, composition: &GasComposition) -> PropsResult<f64> {
        let t = degc(t_c);
        let t_ref = degc(self.basis.reference_c);
        let mut sum = 0.0;
        for (species, x) in composition.iter() {
            let dh = self.source.molar_enthalpy(species, t)?
                - self.source.molar_enthalpy(species, t_ref)?;
            sum += x * dh;
        }
        Ok(sum / self.basis.molar_volume)
    }
}

/// Mixture enthalpy [J/Nm³] at `t_c` [°C] from the NASA polynomials, relative to 25 °C.
pub fn mixture_enthalpy(t_c: f64, composition: &GasComposition) -> PropsResult<f64> {
    MixtureEnthalpy::new(NasaPolynomials).enthalpy(t_c, composition)
}

/// Wilke mixing rule for the viscosity of a gas mixture at `t_c` [°C].
pub fn mixture_viscosity(t_c: f64, composition: &GasComposition) -> PropsResult<DynVisc> {
    let t = degc(t_c);
    let components = composition
        .iter()
        .map(|(species, x)| {
            let mu = gas::gas_viscosity(species, t)?.value;
            Ok((x, mu, species.molar_mass()))
        })
        .collect::<PropsResult<Vec<_>>>()?;

    let mut mu_mix = 0.0;
    for &(x_i, mu_i, m_i) in &components {
        let denom: f64 = components
            .iter()
            .map(|&(x_j, mu_j, m_j)| {
                let phi = (1.0 + (mu_i / mu_j).sqrt() * (m_j / m_i).powf(0.25)).powi(2)
                    / (8.0 * (1.0 + m_i / m_j)).sqrt();
                x_j * phi
            })
            .sum();
        mu_mix += x_i * mu_i / denom;
    }
    Ok(pa_s(mu_mix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropsError;

    fn flue() -> GasComposition {
        GasComposition::flue_gas(0.12, 0.10, 0.04, 0.74, 0.0, 0.0).unwrap()
    }

    #[test]
    fn zero_at_reference_temperature() {
        assert!(mixture_enthalpy(25.0, &flue()).unwrap().abs() < 1e-9);
    }

    #[test]
    fn nitrogen_at_1000c() {
        // ~30.6 kJ/mol over 0.02241 m³/mol
        let h = mixture_enthalpy(1000.0, &GasComposition::pure(GasSpecies::N2)).unwrap();
        assert!((h / 1.365e6 - 1.0).abs() < 0.02, "h = {h}");
    }

    #[test]
    fn enthalpy_increases_with_temperature() {
        let comp = flue();
        let mut last = mixture_enthalpy(0.0, &comp).unwrap();
        for t in (100..=1500).step_by(100) {
            let h = mixture_enthalpy(t as f64, &comp).unwrap();
            assert!(h > last);
            last = h;
        }
    }

    #[test]
    fn nasa_and_shomate_agree() {
        let comp = flue();
        let nasa = mixture_enthalpy(800.0, &comp).unwrap();
        let shomate = MixtureEnthalpy::new(ShomateTables).enthalpy(800.0, &comp).unwrap();
        assert!((nasa / shomate - 1.0).abs() < 0.01, "{nasa} vs {shomate}");
    }

    #[test]
    fn custom_basis() {
        let comp = GasComposition::pure(GasSpecies::O2);
        let basis = EnthalpyBasis {
            reference_c: 0.0,
            molar_volume: 1.0,
        };
        let mix = MixtureEnthalpy::new(NasaPolynomials).with_basis(basis);
        let h = mix.enthalpy(100.0, &comp).unwrap();
        let direct = gas::nasa_enthalpy(GasSpecies::O2, degc(100.0)).unwrap().value
            - gas::nasa_enthalpy(GasSpecies::O2, degc(0.0)).unwrap().value;
        assert!((h - direct).abs() < 1e-9);
    }

    #[test]
    fn unsupported_species_propagates() {
        let comp = GasComposition::pure(GasSpecies::SO2);
        assert!(matches!(
            mixture_enthalpy(500.0, &comp),
            Err(PropsError::NotSupported { .. })
        ));
    }

    #[test]
    fn viscosity_of_pure_gas_is_the_species_value() {
        let comp = GasComposition::pure(GasSpecies::N2);
        let mix = mixture_viscosity(500.0, &comp).unwrap().value;
        let pure = gas::gas_viscosity(GasSpecies::N2, degc(500.0)).unwrap().value;
        assert!((mix - pure).abs() < 1e-15);
    }

    #[test]
    fn viscosity_of_mixture_between_components() {
        let comp = GasComposition::flue_gas(0.0, 0.0, 0.5, 0.5, 0.0, 0.0).unwrap();
        let mix = mixture_viscosity(300.0, &comp).unwrap().value;
        let o2 = gas::gas_viscosity(GasSpecies::O2, degc(300.0)).unwrap().value;
        let n2 = gas::gas_viscosity(GasSpecies::N2, degc(300.0)).unwrap().value;
        assert!(mix > o2.min(n2) && mix < o2.max(n2));
    }
}
