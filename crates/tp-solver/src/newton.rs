//! Damped scalar Newton iteration with a forward-difference derivative.

use crate::error::{SolverError, SolverResult};
use tp_core::numeric::ensure_finite;

/// Damped Newton configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedNewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Stop once |x_{n+1} − x_n| is at most this
    pub tolerance: f64,
    /// Weight of the Newton update: x_{n+1} = (1 − d)·x_n + d·(x_n − f/f')
    pub damping: f64,
    /// Forward-difference step for f'
    pub fd_step: f64,
}

impl Default for DampedNewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            tolerance: 0.05,
            damping: 0.5,
            fd_step: 1.0,
        }
    }
}

impl DampedNewtonConfig {
    pub fn validate(&self) -> SolverResult<()> {
        let invalid = |what: &str| {
            Err(SolverError::InvalidConfig {
                what: what.to_string(),
            })
        };
        if self.max_iterations == 0 {
            return invalid("max_iterations must be positive");
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return invalid("tolerance must be positive");
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid("damping must lie in (0, 1]");
        }
        if !(self.fd_step.is_finite() && self.fd_step != 0.0) {
            return invalid("fd_step must be finite and non-zero");
        }
        Ok(())
    }
}

/// Outcome of a converged iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonResult {
    /// Solution estimate
    pub x: f64,
    /// Number of iterations taken
    pub iterations: usize,
    /// Size of the last step
    pub last_step: f64,
}

/// Solve `residual(x) = 0` from `x0`.
///
/// Each iteration takes a damped Newton step using a forward-difference
/// derivative; iteration stops when the step is within `tolerance`.
pub fn damped_newton<F>(
    x0: f64,
    mut residual: F,
    config: &DampedNewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    config.validate()?;
    let x0 = ensure_finite(x0, "initial estimate").map_err(|e| SolverError::Numeric {
        what: e.to_string(),
    })?;

    let mut x = x0;
    for iter in 1..=config.max_iterations {
        let f = residual(x)?;
        let f_step = residual(x + config.fd_step)?;
        let dfdx = (f_step - f) / config.fd_step;
        if !(dfdx.is_finite() && dfdx != 0.0 && f.is_finite()) {
            return Err(SolverError::Numeric {
                what: format!("degenerate derivative {dfdx} at x = {x} (residual {f})"),
            });
        }

        let newton = x - f / dfdx;
        let x_new = (1.0 - config.damping) * x + config.damping * newton;
        let step = (x_new - x).abs();
        tracing::trace!(iter, x, f, dfdx, x_new, "damped newton step");
        x = x_new;

        if step <= config.tolerance {
            tracing::debug!(iterations = iter, x, step, "damped newton converged");
            return Ok(NewtonResult {
                x,
                iterations: iter,
                last_step: step,
            });
        }
    }

    tracing::warn!(
        iterations = config.max_iterations,
        last = x,
        "damped newton hit the iteration cap"
    );
    Err(SolverError::DidNotConverge {
        iterations: config.max_iterations,
        last: x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_residual() {
        let cfg = DampedNewtonConfig::default();
        let result = damped_newton(1000.0, |x| Ok(2.0 * x - 300.0), &cfg).unwrap();
        assert!((result.x - 150.0).abs() < 0.1, "x = {}", result.x);
        assert!(result.last_step <= cfg.tolerance);
    }

    #[test]
    fn undamped_is_plain_newton() {
        let cfg = DampedNewtonConfig {
            damping: 1.0,
            tolerance: 1e-10,
            fd_step: 1e-7,
            ..Default::default()
        };
        let result = damped_newton(3.0, |x| Ok(x * x - 4.0), &cfg).unwrap();
        assert!((result.x - 2.0).abs() < 1e-6);
        assert!(result.iterations < 20);
    }

    #[test]
    fn iteration_cap() {
        let cfg = DampedNewtonConfig {
            max_iterations: 3,
            tolerance: 1e-12,
            ..Default::default()
        };
        let err = damped_newton(1000.0, |x| Ok(x - 1.0), &cfg).unwrap_err();
        match err {
            SolverError::DidNotConverge { iterations, last } => {
                assert_eq!(iterations, 3);
                assert!(last < 1000.0 && last > 1.0);
            }
            other => panic!("expected DidNotConverge, got {other:?}"),
        }
    }

    #[test]
    fn flat_residual_is_a_numeric_error() {
        let cfg = DampedNewtonConfig::default();
        assert!(matches!(
            damped_newton(0.0, |_| Ok(5.0), &cfg),
            Err(SolverError::Numeric { .. })
        ));
    }

    #[test]
    fn non_finite_start_is_rejected() {
        let err = damped_newton(f64::INFINITY, |x| Ok(x), &DampedNewtonConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("initial estimate"));
    }

    #[test]
    fn residual_errors_propagate() {
        let cfg = DampedNewtonConfig::default();
        let err = damped_newton(
            0.0,
            |_| {
                Err(SolverError::Numeric {
                    what: "boom".into(),
                })
            },
            &cfg,
        )
        .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn invalid_configs() {
        let bad = [
            DampedNewtonConfig {
                max_iterations: 0,
                ..Default::default()
            },
            DampedNewtonConfig {
                tolerance: 0.0,
                ..Default::default()
            },
            DampedNewtonConfig {
                damping: 1.5,
                ..Default::default()
            },
            DampedNewtonConfig {
                fd_step: 0.0,
                ..Default::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(
                damped_newton(1.0, |x| Ok(x), &cfg),
                Err(SolverError::InvalidConfig { .. })
            ));
        }
    }
}
