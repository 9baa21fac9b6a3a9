use crate::TpError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TpError::NonFinite { what, value: v })
    }
}

/// Parse a numeric token the lenient way the data files expect.
///
/// Unparsable tokens yield `None`; callers decide whether to degrade to 0.0.
pub fn parse_real(token: &str) -> Option<Real> {
    token.trim().parse::<Real>().ok()
}

/// Straight line through `(x1, y1)` and `(x2, y2)` evaluated at `x`.
pub fn line_through(x1: Real, y1: Real, x2: Real, y2: Real, x: Real) -> Real {
    y1 + (y2 - y1) / (x2 - x1) * (x - x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn parse_real_rejects_garbage() {
        assert_eq!(parse_real(" 1.5e3 "), Some(1500.0));
        assert_eq!(parse_real("abc"), None);
    }

    #[test]
    fn line_through_hits_both_points() {
        assert_eq!(line_through(1.0, 10.0, 2.0, 30.0, 1.0), 10.0);
        assert_eq!(line_through(1.0, 10.0, 2.0, 30.0, 2.0), 30.0);
        assert_eq!(line_through(1.0, 10.0, 2.0, 30.0, 3.0), 50.0);
    }
}
