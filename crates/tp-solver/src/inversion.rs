//! Temperature of a gas mixture from its normal-volume enthalpy.

use crate::error::SolverResult;
use crate::newton::{DampedNewtonConfig, NewtonResult, damped_newton};
use tp_props::{EnthalpySource, GasComposition, MixtureEnthalpy, NasaPolynomials};

/// Starting temperature [°C] when no prior estimate is supplied.
pub const DEFAULT_INITIAL_GUESS_C: f64 = 1000.0;

/// Inversion settings: Newton parameters plus the fallback starting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionConfig {
    pub newton: DampedNewtonConfig,
    pub initial_guess_c: f64,
}

impl Default for InversionConfig {
    fn default() -> Self {
        Self {
            newton: DampedNewtonConfig::default(),
            initial_guess_c: DEFAULT_INITIAL_GUESS_C,
        }
    }
}

/// Solve `mixture.enthalpy(T) = h` for T [°C].
///
/// `prior` is the caller's previous solution, if any; it replaces the
/// configured initial guess so that repeated calls along a process start close.
pub fn invert_enthalpy_with<S: EnthalpySource>(
    mixture: &MixtureEnthalpy<S>,
    h: f64,
    composition: &GasComposition,
    prior: Option<f64>,
    config: &InversionConfig,
) -> SolverResult<NewtonResult> {
    let t0 = prior
        .filter(|t| t.is_finite())
        .unwrap_or(config.initial_guess_c);
    tracing::debug!(h, t0, "inverting mixture enthalpy");
    damped_newton(
        t0,
        |t_c| Ok(h - mixture.enthalpy(t_c, composition)?),
        &config.newton,
    )
}

/// Temperature [°C] at which the mixture has enthalpy `h` [J/Nm³] relative to 25 °C,
/// using the built-in NASA polynomials.
pub fn invert_enthalpy_to_temperature(
    h: f64,
    composition: &GasComposition,
    prior: Option<f64>,
) -> SolverResult<f64> {
    let mixture = MixtureEnthalpy::new(NasaPolynomials);
    invert_enthalpy_with(&mixture, h, composition, prior, &InversionConfig::default())
        .map(|result| result.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use tp_props::{GasSpecies, ShomateTables, mixture_enthalpy};

    fn flue() -> GasComposition {
        GasComposition::flue_gas(0.12, 0.10, 0.04, 0.74, 0.0, 0.0).unwrap()
    }

    #[test]
    fn recovers_temperature() {
        let comp = flue();
        let h = mixture_enthalpy(650.0, &comp).unwrap();
        let t = invert_enthalpy_to_temperature(h, &comp, None).unwrap();
        assert!((t - 650.0).abs() < 0.1, "t = {t}");
    }

    #[test]
    fn prior_estimate_shortens_the_search() {
        let comp = flue();
        let h = mixture_enthalpy(300.0, &comp).unwrap();
        let mixture = MixtureEnthalpy::new(NasaPolynomials);
        let cfg = InversionConfig::default();
        let cold = invert_enthalpy_with(&mixture, h, &comp, None, &cfg).unwrap();
        let warm = invert_enthalpy_with(&mixture, h, &comp, Some(301.0), &cfg).unwrap();
        assert!(warm.iterations < cold.iterations);
        assert!((warm.x - 300.0).abs() < 0.1);
    }

    #[test]
    fn non_finite_prior_falls_back_to_default_guess() {
        let comp = flue();
        let h = mixture_enthalpy(500.0, &comp).unwrap();
        let t = invert_enthalpy_to_temperature(h, &comp, Some(f64::NAN)).unwrap();
        assert!((t - 500.0).abs() < 0.1);
    }

    #[test]
    fn works_with_other_enthalpy_sources() {
        let comp = GasComposition::pure(GasSpecies::CO2);
        let mixture = MixtureEnthalpy::new(ShomateTables);
        let h = mixture.enthalpy(900.0, &comp).unwrap();
        let result =
            invert_enthalpy_with(&mixture, h, &comp, None, &InversionConfig::default()).unwrap();
        assert!((result.x - 900.0).abs() < 0.1);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let comp = flue();
        let h = mixture_enthalpy(200.0, &comp).unwrap();
        let cfg = InversionConfig {
            newton: DampedNewtonConfig {
                max_iterations: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let err =
            invert_enthalpy_with(&MixtureEnthalpy::new(NasaPolynomials), h, &comp, None, &cfg)
                .unwrap_err();
        assert!(matches!(err, SolverError::DidNotConverge { iterations: 2, .. }));
    }

    #[test]
    fn unsupported_species_is_a_props_error() {
        let comp = GasComposition::pure(GasSpecies::SO2);
        assert!(matches!(
            invert_enthalpy_to_temperature(1e6, &comp, None),
            Err(SolverError::Props(_))
        ));
    }
}
