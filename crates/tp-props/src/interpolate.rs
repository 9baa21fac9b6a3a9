//! Linear interpolation over tabulated records.

use crate::record::TableData;
use serde::{Deserialize, Serialize};
use tp_core::numeric::line_through;

/// Behaviour for queries past the last tabulated point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBoundPolicy {
    /// Return the last tabulated value.
    #[default]
    HoldLast,
    /// Extend the last non-degenerate interval linearly, mirroring the lower bound.
    Extrapolate,
}

/// Interpolate `table` at `x`.
///
/// At or below the first point the first interval is extended; inside the
/// table the bracket `[x_i, x_{i+1})` is interpolated; past the last point
/// `policy` decides. Zero-width intervals from repeated abscissae are skipped.
pub fn interpolate(table: &TableData, x: f64, policy: UpperBoundPolicy) -> f64 {
    let xs = &table.independent;
    let ys = &table.dependent;
    let n = xs.len().min(ys.len());
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return ys[0];
    }

    let segment = |i: usize| line_through(xs[i], ys[i], xs[i + 1], ys[i + 1], x);
    let first_open = (0..n - 1).find(|&i| xs[i] < xs[i + 1]);
    let last_open = (0..n - 1).rev().find(|&i| xs[i] < xs[i + 1]);
    let (Some(first_open), Some(last_open)) = (first_open, last_open) else {
        // every abscissa identical
        return ys[0];
    };

    if x <= xs[0] {
        return segment(first_open);
    }
    if let Some(i) = (0..n - 1).find(|&i| x >= xs[i] && x < xs[i + 1]) {
        return segment(i);
    }
    match policy {
        UpperBoundPolicy::HoldLast => ys[n - 1],
        UpperBoundPolicy::Extrapolate => segment(last_open),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(points: &[(f64, f64)]) -> TableData {
        TableData {
            constant: 0.0,
            independent: points.iter().map(|p| p.0).collect(),
            dependent: points.iter().map(|p| p.1).collect(),
        }
    }

    #[test]
    fn interior_points() {
        let t = table(&[(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)]);
        assert_eq!(interpolate(&t, 1.0, UpperBoundPolicy::HoldLast), 10.0);
        assert_eq!(interpolate(&t, 1.5, UpperBoundPolicy::HoldLast), 20.0);
        assert_eq!(interpolate(&t, 0.5, UpperBoundPolicy::HoldLast), 5.0);
    }

    #[test]
    fn lower_bound_extrapolates() {
        let t = table(&[(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)]);
        assert_eq!(interpolate(&t, 0.0, UpperBoundPolicy::HoldLast), 0.0);
        assert_eq!(interpolate(&t, -1.0, UpperBoundPolicy::HoldLast), -10.0);
    }

    #[test]
    fn upper_bound_policies() {
        let t = table(&[(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)]);
        assert_eq!(interpolate(&t, 2.0, UpperBoundPolicy::HoldLast), 30.0);
        assert_eq!(interpolate(&t, 3.0, UpperBoundPolicy::HoldLast), 30.0);
        assert_eq!(interpolate(&t, 2.0, UpperBoundPolicy::Extrapolate), 30.0);
        assert_eq!(interpolate(&t, 3.0, UpperBoundPolicy::Extrapolate), 50.0);
    }

    #[test]
    fn repeated_abscissae() {
        let t = table(&[(0.0, 0.0), (0.0, 5.0), (1.0, 10.0), (1.0, 12.0)]);
        assert_eq!(interpolate(&t, -1.0, UpperBoundPolicy::HoldLast), 0.0);
        assert_eq!(interpolate(&t, 0.5, UpperBoundPolicy::HoldLast), 7.5);
        assert_eq!(interpolate(&t, 2.0, UpperBoundPolicy::Extrapolate), 15.0);
        assert_eq!(interpolate(&t, 2.0, UpperBoundPolicy::HoldLast), 12.0);
    }

    #[test]
    fn policy_default_is_hold_last() {
        assert_eq!(UpperBoundPolicy::default(), UpperBoundPolicy::HoldLast);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reproduces_tabulated_points(ys in prop::collection::vec(-1e3f64..1e3, 2..12)) {
            let t = TableData {
                constant: 0.0,
                independent: (0..ys.len()).map(|i| i as f64).collect(),
                dependent: ys.clone(),
            };
            for (i, y) in ys.iter().enumerate() {
                let v = interpolate(&t, i as f64, UpperBoundPolicy::HoldLast);
                prop_assert!((v - y).abs() <= 1e-9 * y.abs().max(1.0));
            }
        }

        #[test]
        fn interior_stays_within_bracket(ys in prop::collection::vec(-1e3f64..1e3, 2..12), frac in 0.0f64..1.0) {
            let t = TableData {
                constant: 0.0,
                independent: (0..ys.len()).map(|i| i as f64).collect(),
                dependent: ys.clone(),
            };
            let x = frac * (ys.len() - 1) as f64;
            let v = interpolate(&t, x, UpperBoundPolicy::Extrapolate);
            let i = (x.floor() as usize).min(ys.len() - 2);
            let (lo, hi) = (ys[i].min(ys[i + 1]), ys[i].max(ys[i + 1]));
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }
}
