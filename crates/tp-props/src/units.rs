//! Unit vocabulary and conversion for property values.
//!
//! Records carry their native unit as free text (e.g. `"J/MOLK"`, `"MMHG"`).
//! Conversion goes through a canonical base per family:
//!
//! - **Temperature**: K
//! - **Pressure**: Pa
//! - **Energy**: J/mol on a molar basis, J/kg on a mass basis
//!
//! Energy units may carry a trailing `K` or `C` (`J/MOLK`, `KJ/KGC`); the suffix
//! only marks a per-degree quantity and never changes the numeric factor, since a
//! kelvin and a Celsius degree are the same interval. Crossing between bare and
//! per-degree spellings is accepted.

use crate::error::{PropsError, PropsResult};
use std::fmt;
use tp_core::units::constants::ZERO_CELSIUS_K;

/// Target unit meaning "leave the value in the record's native unit".
pub const DEFAULT_UNIT: &str = "DEFAULT";

/// Pascals per millimetre of mercury.
pub const PA_PER_MMHG: f64 = 101_325.0 / 760.0;

/// Temperature units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
}

/// Pressure units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    Pascal,
    KiloPascal,
    MegaPascal,
    Bar,
    MmHg,
}

/// Numerator of an energy unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyScale {
    Joule,
    KiloJoule,
}

/// Denominator of an energy unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountBasis {
    Mole,
    KiloMole,
    Kilogram,
}

impl AmountBasis {
    fn is_molar(self) -> bool {
        matches!(self, Self::Mole | Self::KiloMole)
    }
}

/// Energy per amount, optionally per degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyUnit {
    pub scale: EnergyScale,
    pub basis: AmountBasis,
    pub per_degree: bool,
}

/// A parsed unit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Temperature(TemperatureUnit),
    Pressure(PressureUnit),
    Energy(EnergyUnit),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature(TemperatureUnit::Kelvin) => write!(f, "K"),
            Self::Temperature(TemperatureUnit::Celsius) => write!(f, "C"),
            Self::Pressure(PressureUnit::Pascal) => write!(f, "PA"),
            Self::Pressure(PressureUnit::KiloPascal) => write!(f, "KPA"),
            Self::Pressure(PressureUnit::MegaPascal) => write!(f, "MPA"),
            Self::Pressure(PressureUnit::Bar) => write!(f, "BAR"),
            Self::Pressure(PressureUnit::MmHg) => write!(f, "MMHG"),
            Self::Energy(e) => {
                let num = match e.scale {
                    EnergyScale::Joule => "J",
                    EnergyScale::KiloJoule => "KJ",
                };
                let den = match e.basis {
                    AmountBasis::Mole => "MOL",
                    AmountBasis::KiloMole => "KMOL",
                    AmountBasis::Kilogram => "KG",
                };
                let deg = if e.per_degree { "K" } else { "" };
                write!(f, "{num}/{den}{deg}")
            }
        }
    }
}

/// Parse a unit string, case-insensitively.
///
/// Whitespace and the separators `·`, `*`, `.`, `(`, `)` are ignored, so
/// `"J/(mol·K)"`, `"J/MOL/K"` and `"J/MOLK"` all parse the same.
pub fn parse_unit(raw: &str) -> Option<Unit> {
    let norm: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '·' | '*' | '.' | '(' | ')' | '°'))
        .collect::<String>()
        .to_uppercase();

    let unit = match norm.as_str() {
        "K" | "KELVIN" => Unit::Temperature(TemperatureUnit::Kelvin),
        "C" | "CELSIUS" | "DEGC" => Unit::Temperature(TemperatureUnit::Celsius),
        "PA" | "PASCAL" => Unit::Pressure(PressureUnit::Pascal),
        "KPA" | "KILOPASCAL" => Unit::Pressure(PressureUnit::KiloPascal),
        "MPA" | "MEGAPASCAL" => Unit::Pressure(PressureUnit::MegaPascal),
        "BAR" => Unit::Pressure(PressureUnit::Bar),
        "MMHG" | "TORR" => Unit::Pressure(PressureUnit::MmHg),
        other => return parse_energy(other).map(Unit::Energy),
    };
    Some(unit)
}

fn parse_energy(norm: &str) -> Option<EnergyUnit> {
    let (num, den) = norm.split_once('/')?;
    let scale = match num {
        "J" => EnergyScale::Joule,
        "KJ" => EnergyScale::KiloJoule,
        _ => return None,
    };
    let den: String = den.chars().filter(|c| *c != '/').collect();
    let (basis, rest) = if let Some(rest) = den.strip_prefix("KMOL") {
        (AmountBasis::KiloMole, rest)
    } else if let Some(rest) = den.strip_prefix("MOL") {
        (AmountBasis::Mole, rest)
    } else if let Some(rest) = den.strip_prefix("KG") {
        (AmountBasis::Kilogram, rest)
    } else {
        return None;
    };
    let per_degree = match rest {
        "" => false,
        "K" | "C" => true,
        _ => return None,
    };
    Some(EnergyUnit {
        scale,
        basis,
        per_degree,
    })
}

fn temperature_to_kelvin(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Kelvin => value,
        TemperatureUnit::Celsius => value + ZERO_CELSIUS_K,
    }
}

fn kelvin_to_temperature(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Kelvin => value,
        TemperatureUnit::Celsius => value - ZERO_CELSIUS_K,
    }
}

fn pascals_per(unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::Pascal => 1.0,
        PressureUnit::KiloPascal => 1e3,
        PressureUnit::MegaPascal => 1e6,
        PressureUnit::Bar => 1e5,
        PressureUnit::MmHg => PA_PER_MMHG,
    }
}

/// Factor from `unit` to its canonical base (J/mol or J/kg).
fn energy_factor(unit: EnergyUnit) -> f64 {
    let num = match unit.scale {
        EnergyScale::Joule => 1.0,
        EnergyScale::KiloJoule => 1e3,
    };
    let den = match unit.basis {
        AmountBasis::Mole | AmountBasis::Kilogram => 1.0,
        AmountBasis::KiloMole => 1e3,
    };
    num / den
}

fn convert_energy(
    value: f64,
    from: EnergyUnit,
    to: EnergyUnit,
    molecular_weight: Option<f64>,
) -> Option<f64> {
    let base = value * energy_factor(from);
    let base = match (from.basis.is_molar(), to.basis.is_molar()) {
        (true, true) | (false, false) => base,
        // MW in g/mol: J/mol * 1000 / MW = J/kg
        (true, false) => base * 1e3 / usable_mw(molecular_weight)?,
        (false, true) => base * usable_mw(molecular_weight)? / 1e3,
    };
    Some(base / energy_factor(to))
}

fn usable_mw(molecular_weight: Option<f64>) -> Option<f64> {
    molecular_weight.filter(|mw| mw.is_finite() && *mw > 0.0)
}

/// Convert `value` from unit `from` to unit `to`.
///
/// `molecular_weight` [g/mol] is only consulted when switching between molar
/// and mass bases. A target of `DEFAULT`, or identical unit strings, returns
/// the value untouched.
pub fn try_convert(
    value: f64,
    from: &str,
    to: &str,
    molecular_weight: Option<f64>,
) -> PropsResult<f64> {
    if to.eq_ignore_ascii_case(DEFAULT_UNIT) || from.trim().eq_ignore_ascii_case(to.trim()) {
        return Ok(value);
    }

    let unsupported = || PropsError::UnsupportedUnitConversion {
        from: from.to_string(),
        to: to.to_string(),
    };

    let (src, dst) = match (parse_unit(from), parse_unit(to)) {
        (Some(src), Some(dst)) => (src, dst),
        _ => return Err(unsupported()),
    };

    let converted = match (src, dst) {
        (Unit::Temperature(a), Unit::Temperature(b)) => {
            Some(kelvin_to_temperature(temperature_to_kelvin(value, a), b))
        }
        (Unit::Pressure(a), Unit::Pressure(b)) => Some(value * pascals_per(a) / pascals_per(b)),
        (Unit::Energy(a), Unit::Energy(b)) => convert_energy(value, a, b, molecular_weight),
        _ => None,
    };

    converted.ok_or_else(unsupported)
}

/// Lenient conversion: an unsupported pair logs a warning and returns `value` unchanged.
pub fn convert(value: f64, from: &str, to: &str, molecular_weight: Option<f64>) -> f64 {
    match try_convert(value, from, to, molecular_weight) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(%err, value, "unit conversion skipped, returning native value");
            value
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pressure_round_trip(v in 1.0f64..1e8) {
            for unit in ["KPA", "MPA", "BAR", "MMHG"] {
                let there = try_convert(v, "PA", unit, None).unwrap();
                let back = try_convert(there, unit, "PA", None).unwrap();
                prop_assert!((back - v).abs() <= 1e-9 * v);
            }
        }

        #[test]
        fn molar_mass_round_trip(v in -1e6f64..1e6, mw in 1.0f64..500.0) {
            let there = try_convert(v, "J/MOL", "KJ/KG", Some(mw)).unwrap();
            let back = try_convert(there, "KJ/KG", "J/MOL", Some(mw)).unwrap();
            prop_assert!((back - v).abs() <= 1e-9 * v.abs().max(1.0));
        }
    }
}
