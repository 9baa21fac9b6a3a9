//! Property sweep generation over temperature or pressure.

use crate::sweep_executor::SweepError;
use crate::units::try_convert;
use std::fmt;

/// State variable being swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAxis {
    /// Temperature, canonical unit K.
    Temperature,
    /// Pressure, canonical unit Pa.
    Pressure,
}

impl SweepAxis {
    fn canonical_unit(self) -> &'static str {
        match self {
            Self::Temperature => "K",
            Self::Pressure => "PA",
        }
    }
}

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepType {
    Linear,
    Logarithmic,
}

/// Definition of a single parameter sweep.
///
/// Bounds are stored in canonical units (K or Pa) next to the text the user typed.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepDefinition {
    pub axis: SweepAxis,
    pub start_si: f64,
    pub start_raw: String,
    pub end_si: f64,
    pub end_raw: String,
    pub num_points: usize,
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    /// Create a sweep from canonical bounds.
    pub fn new(
        axis: SweepAxis,
        start_si: f64,
        end_si: f64,
        num_points: usize,
        sweep_type: SweepType,
    ) -> Result<Self, SweepError> {
        let unit = axis.canonical_unit();
        Self::validated(SweepDefinition {
            axis,
            start_si,
            start_raw: format!("{start_si}{unit}"),
            end_si,
            end_raw: format!("{end_si}{unit}"),
            num_points,
            sweep_type,
        })
    }

    /// Create a sweep from user text such as `"25 C"`, `"1bar"` or `"373.15"`.
    ///
    /// A bare number is taken in the canonical unit of the axis.
    pub fn from_text(
        start_raw: impl Into<String>,
        end_raw: impl Into<String>,
        axis: SweepAxis,
        num_points: usize,
        sweep_type: SweepType,
    ) -> Result<Self, SweepError> {
        let start_raw = start_raw.into();
        let end_raw = end_raw.into();
        let start_si = parse_axis_value(&start_raw, axis)
            .map_err(|e| SweepError::InvalidConfiguration(format!("start value: {e}")))?;
        let end_si = parse_axis_value(&end_raw, axis)
            .map_err(|e| SweepError::InvalidConfiguration(format!("end value: {e}")))?;
        Self::validated(SweepDefinition {
            axis,
            start_si,
            start_raw,
            end_si,
            end_raw,
            num_points,
            sweep_type,
        })
    }

    fn validated(def: SweepDefinition) -> Result<Self, SweepError> {
        if def.num_points < 2 {
            return Err(SweepError::InvalidConfiguration(
                "sweep must have at least 2 points".to_string(),
            ));
        }
        if !(def.start_si.is_finite() && def.end_si.is_finite()) {
            return Err(SweepError::InvalidConfiguration(
                "sweep bounds must be finite".to_string(),
            ));
        }
        if (def.start_si - def.end_si).abs() < 1e-12 {
            return Err(SweepError::InvalidConfiguration(
                "start and end values must be different".to_string(),
            ));
        }
        if def.sweep_type == SweepType::Logarithmic && (def.start_si <= 0.0 || def.end_si <= 0.0) {
            return Err(SweepError::InvalidConfiguration(
                "logarithmic sweep needs positive bounds".to_string(),
            ));
        }
        Ok(def)
    }

    /// All points of the sweep, endpoints exact.
    pub fn generate_points(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start_si];
        }
        let last = (self.num_points - 1) as f64;
        let mut points: Vec<f64> = match self.sweep_type {
            SweepType::Linear => {
                let delta = (self.end_si - self.start_si) / last;
                (0..self.num_points)
                    .map(|i| self.start_si + i as f64 * delta)
                    .collect()
            }
            SweepType::Logarithmic => {
                let log_start = self.start_si.ln();
                let log_delta = (self.end_si.ln() - log_start) / last;
                (0..self.num_points)
                    .map(|i| (log_start + i as f64 * log_delta).exp())
                    .collect()
            }
        };
        points[self.num_points - 1] = self.end_si;
        points
    }
}

/// Parse `"<number><unit>"` into the axis' canonical unit.
fn parse_axis_value(text: &str, axis: SweepAxis) -> Result<f64, String> {
    let text = text.trim();
    let split = (1..=text.len())
        .rev()
        .filter(|&i| text.is_char_boundary(i))
        .find(|&i| text[..i].parse::<f64>().is_ok())
        .ok_or_else(|| format!("'{text}' does not start with a number"))?;
    let (number, unit) = text.split_at(split);
    let value: f64 = number.parse().map_err(|_| format!("bad number '{number}'"))?;
    let unit = unit.trim();
    if unit.is_empty() {
        return Ok(value);
    }
    try_convert(value, unit, axis.canonical_unit(), None).map_err(|e| e.to_string())
}

impl fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "Temperature"),
            Self::Pressure => write!(f, "Pressure"),
        }
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep {} from {} to {} ({} points, {})",
            self.axis, self.start_raw, self.end_raw, self.num_points, self.sweep_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_sweep_generation() {
        let sweep =
            SweepDefinition::new(SweepAxis::Temperature, 300.0, 400.0, 5, SweepType::Linear).unwrap();
        let points = sweep.generate_points();
        assert_eq!(points.len(), 5);
        assert!((points[0] - 300.0).abs() < 1e-9);
        assert!((points[2] - 350.0).abs() < 1e-9);
        assert_eq!(points[4], 400.0);
    }

    #[test]
    fn logarithmic_sweep_generation() {
        let sweep =
            SweepDefinition::new(SweepAxis::Pressure, 1e5, 1e6, 3, SweepType::Logarithmic).unwrap();
        let points = sweep.generate_points();
        let expected_mid = (1e5_f64 * 1e6_f64).sqrt();
        assert!((points[0] - 1e5).abs() < 1e-6);
        assert!((points[1] - expected_mid).abs() / expected_mid < 1e-9);
        assert_eq!(points[2], 1e6);
    }

    #[test]
    fn sweep_from_text_with_units() {
        let sweep =
            SweepDefinition::from_text("25 C", "125C", SweepAxis::Temperature, 3, SweepType::Linear)
                .unwrap();
        assert!((sweep.start_si - 298.15).abs() < 1e-9);
        assert!((sweep.end_si - 398.15).abs() < 1e-9);

        let sweep =
            SweepDefinition::from_text("1bar", "1e6", SweepAxis::Pressure, 4, SweepType::Logarithmic)
                .unwrap();
        assert!((sweep.start_si - 1e5).abs() < 1e-6);
        assert_eq!(sweep.end_si, 1e6);
        assert!(sweep.to_string().contains("1bar"));
    }

    #[test]
    fn reject_invalid_definitions() {
        let bad = [
            SweepDefinition::new(SweepAxis::Temperature, 300.0, 400.0, 1, SweepType::Linear),
            SweepDefinition::new(SweepAxis::Temperature, 300.0, 300.0, 5, SweepType::Linear),
            SweepDefinition::new(SweepAxis::Pressure, 0.0, 1e5, 5, SweepType::Logarithmic),
            SweepDefinition::from_text("hot", "400K", SweepAxis::Temperature, 5, SweepType::Linear),
            SweepDefinition::from_text("1bar", "400K", SweepAxis::Pressure, 5, SweepType::Linear),
        ];
        for result in bad {
            assert!(matches!(result, Err(SweepError::InvalidConfiguration(_))));
        }
    }
}
