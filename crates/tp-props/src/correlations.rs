//! Correlation library: one stateless evaluator per model family.
//!
//! Every evaluator receives the record's named constants, checks them against
//! the family's parameter table and returns a raw value in the record's native
//! unit. Families with a secant extrapolation policy sample the in-range formula
//! at the validity bound and one unit inward, then extend that line to the query
//! point, so values are continuous at the bound.

use crate::error::{PropsError, PropsResult};
use crate::record::{ModelData, PropertyKind, Validity};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tp_core::numeric::line_through;

/// Correlation families understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// Vapour pressure / saturation temperature, log10 form.
    Antoine,
    /// Wagner 2.5-5 vapour pressure equation.
    Wagner25,
    /// Majer & Svoboda (1985) heat of vaporization.
    Majer1985,
    /// PPDS12 heat of vaporization.
    Ppds12,
    /// Aly-Lee / DIPPR 107 ideal gas heat capacity.
    Dippr107,
    /// TDE Watson heat of vaporization.
    TdeWatson,
    /// TDE saturated liquid heat capacity.
    TdeLiquid,
    /// ThermoML polynomial heat capacity.
    ThermoMl,
    /// NIST Shomate equation (Cp, H - H298, S).
    Shomate,
    /// Constant value.
    Constant,
}

impl ModelType {
    pub const ALL: [ModelType; 10] = [
        ModelType::Antoine,
        ModelType::Wagner25,
        ModelType::Majer1985,
        ModelType::Ppds12,
        ModelType::Dippr107,
        ModelType::TdeWatson,
        ModelType::TdeLiquid,
        ModelType::ThermoMl,
        ModelType::Shomate,
        ModelType::Constant,
    ];

    /// Canonical data-file tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Antoine => "ANTOINE",
            Self::Wagner25 => "WAGNER25",
            Self::Majer1985 => "MAJER1985",
            Self::Ppds12 => "PPDS12",
            Self::Dippr107 => "DIPPR107",
            Self::TdeWatson => "TDEWATSON",
            Self::TdeLiquid => "TDELIQUID",
            Self::ThermoMl => "THERMOML",
            Self::Shomate => "SHOMATE",
            Self::Constant => "CONSTANT",
        }
    }

    /// Parse a model tag, case-insensitively, including legacy aliases.
    pub fn from_tag(tag: &str) -> PropsResult<Self> {
        let model = match tag.trim().to_uppercase().as_str() {
            "ANTOINE" => Self::Antoine,
            "WAGNER25" => Self::Wagner25,
            "MAJER1985" => Self::Majer1985,
            "PPDS12" => Self::Ppds12,
            "DIPPR107" | "ALYLEE" | "CPIDEAL" => Self::Dippr107,
            "TDEWATSON" => Self::TdeWatson,
            "TDELIQUID" | "TDELIQ" | "CPLIQ" => Self::TdeLiquid,
            "THERMOML" => Self::ThermoMl,
            "SHOMATE" => Self::Shomate,
            "CONSTANT" => Self::Constant,
            _ => {
                return Err(PropsError::UnknownTag {
                    what: "model",
                    tag: tag.to_string(),
                });
            }
        };
        Ok(model)
    }

    /// Whether this family can produce the given property.
    pub fn supports(self, kind: PropertyKind) -> bool {
        use PropertyKind as K;
        match self {
            Self::Antoine => matches!(kind, K::Psat | K::Tsat),
            Self::Wagner25 => kind == K::Psat,
            Self::Majer1985 | Self::Ppds12 | Self::TdeWatson => kind == K::Hvap,
            Self::Dippr107 => kind == K::Cp,
            Self::TdeLiquid | Self::ThermoMl => matches!(kind, K::Cp | K::CpLiquid),
            Self::Shomate => matches!(kind, K::Cp | K::H | K::S),
            Self::Constant => true,
        }
    }

    fn parameter_table(self) -> &'static [ParamSpec] {
        match self {
            Self::Antoine => ANTOINE_PARAMS,
            Self::Wagner25 => WAGNER25_PARAMS,
            Self::Majer1985 => MAJER1985_PARAMS,
            Self::TdeWatson => TDE_WATSON_PARAMS,
            Self::Ppds12 => PPDS12_PARAMS,
            Self::Dippr107 => DIPPR107_PARAMS,
            Self::TdeLiquid => TDE_LIQUID_PARAMS,
            Self::ThermoMl => THERMOML_PARAMS,
            Self::Shomate => SHOMATE_PARAMS,
            Self::Constant => CONSTANT_PARAMS,
        }
    }
}

const fn req(name: &'static str) -> ParamSpec {
    ParamSpec::new(name, &[], Need::Always)
}

const ANTOINE_PARAMS: &[ParamSpec] = &[req("A"), req("B"), req("C")];
const WAGNER25_PARAMS: &[ParamSpec] = &[
    req("C1"),
    req("C2"),
    req("C3"),
    req("C4"),
    ParamSpec::new("lPc", &["Pc"], Need::Always),
    req("Tc"),
];
const MAJER1985_PARAMS: &[ParamSpec] = &[req("A"), req("alpha"), req("beta"), req("Tc")];
const TDE_WATSON_PARAMS: &[ParamSpec] = &[req("C1"), req("C2"), req("C3"), req("C4"), req("Tc")];
const PPDS12_PARAMS: &[ParamSpec] = &[
    req("A"),
    req("B"),
    req("C"),
    req("D"),
    req("E"),
    req("Tc"),
    req("R"),
];
const DIPPR107_PARAMS: &[ParamSpec] = &[req("A"), req("B"), req("C"), req("D"), req("E")];
const TDE_LIQUID_PARAMS: &[ParamSpec] = &[
    req("C1"),
    req("C2"),
    req("C3"),
    req("C4"),
    req("B"),
    req("Tc"),
];
const THERMOML_PARAMS: &[ParamSpec] = &[
    req("C1"),
    req("C2"),
    req("C3"),
    req("C4"),
    req("C5"),
    req("Tc"),
];
const SHOMATE_PARAMS: &[ParamSpec] = &[
    req("A"),
    req("B"),
    req("C"),
    req("D"),
    req("E"),
    ParamSpec::new("F", &[], Need::For(&[PropertyKind::H])),
    ParamSpec::new("G", &[], Need::For(&[PropertyKind::S])),
    ParamSpec::new("H", &[], Need::For(&[PropertyKind::H])),
];
const CONSTANT_PARAMS: &[ParamSpec] = &[req("A")];

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ModelType {
    type Err = PropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

/// When a recognized constant must be present.
#[derive(Debug, Clone, Copy)]
enum Need {
    Always,
    For(&'static [PropertyKind]),
}

#[derive(Debug, Clone, Copy)]
struct ParamSpec {
    name: &'static str,
    aliases: &'static [&'static str],
    need: Need,
}

impl ParamSpec {
    const fn new(name: &'static str, aliases: &'static [&'static str], need: Need) -> Self {
        Self {
            name,
            aliases,
            need,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    fn required_for(&self, kind: PropertyKind) -> bool {
        match self.need {
            Need::Always => true,
            Need::For(kinds) => kinds.contains(&kind),
        }
    }
}

/// Constants of one model, resolved to their canonical names.
#[derive(Debug, Clone)]
pub struct Parameters {
    model: ModelType,
    values: BTreeMap<&'static str, f64>,
}

impl Parameters {
    /// Check `raw` against the family's parameter table for property `kind`.
    ///
    /// Fails on unrecognized names, duplicates (including alias collisions),
    /// missing required constants and unsupported property kinds.
    pub fn resolve(
        model: ModelType,
        kind: PropertyKind,
        raw: &BTreeMap<String, f64>,
    ) -> PropsResult<Self> {
        let invalid = |reason: String| PropsError::InvalidParameterSet {
            model: model.tag().to_string(),
            reason,
        };

        if !model.supports(kind) {
            return Err(invalid(format!("property {kind} is not produced by this model")));
        }

        let table = model.parameter_table();
        let mut values = BTreeMap::new();
        for (name, value) in raw {
            let spec = table
                .iter()
                .find(|spec| spec.matches(name))
                .ok_or_else(|| invalid(format!("unrecognized constant '{name}'")))?;
            if values.insert(spec.name, *value).is_some() {
                return Err(invalid(format!("constant '{}' given more than once", spec.name)));
            }
        }

        if let Some(missing) = table
            .iter()
            .find(|spec| spec.required_for(kind) && !values.contains_key(spec.name))
        {
            return Err(invalid(format!("missing constant '{}'", missing.name)));
        }

        Ok(Self { model, values })
    }

    /// Value of a required constant.
    pub fn get(&self, name: &'static str) -> PropsResult<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| PropsError::InvalidParameterSet {
                model: self.model.tag().to_string(),
                reason: format!("missing constant '{name}'"),
            })
    }
}

/// Line through `f(bound)` and `f(bound + inward)` evaluated at `x`.
fn secant(f: impl Fn(f64) -> f64, bound: f64, inward: f64, x: f64) -> f64 {
    let x2 = bound + inward;
    line_through(bound, f(bound), x2, f(x2), x)
}

/// Evaluate `f` inside `validity`, secant-extrapolate outside.
fn with_secant_bounds(f: impl Fn(f64) -> f64, validity: Validity, t: f64) -> f64 {
    if t < validity.min {
        secant(f, validity.min, 1.0, t)
    } else if t > validity.max {
        secant(f, validity.max, -1.0, t)
    } else {
        f(t)
    }
}

/// Evaluate a model record at (T, P).
///
/// `t` and `p` are in the record's conventions (K for the temperature
/// correlations; Antoine uses whatever units its constants were fitted in).
pub fn evaluate_model(
    model: &ModelData,
    kind: PropertyKind,
    validity: Validity,
    t: f64,
    p: f64,
) -> PropsResult<f64> {
    let params = Parameters::resolve(model.model_type, kind, &model.parameters)?;
    let value = match model.model_type {
        ModelType::Antoine => antoine(&params, kind, t, p)?,
        ModelType::Wagner25 => wagner25(&params, validity, t)?,
        ModelType::Majer1985 => majer1985(&params, t)?,
        ModelType::Ppds12 => ppds12(&params, validity, t)?,
        ModelType::Dippr107 => dippr107(&params, t)?,
        ModelType::TdeWatson => tde_watson(&params, validity, t)?,
        ModelType::TdeLiquid => tde_liquid(&params, validity, t)?,
        ModelType::ThermoMl => thermoml(&params, validity, t)?,
        ModelType::Shomate => {
            let coeffs = ShomateCoeffs::from_parameters(&params)?;
            match kind {
                PropertyKind::H => coeffs.enthalpy(t),
                PropertyKind::S => coeffs.entropy(t),
                _ => coeffs.cp(t),
            }
        }
        ModelType::Constant => params.get("A")?,
    };
    tracing::trace!(model = %model.model_type, %kind, t, p, value, "model evaluated");
    Ok(value)
}

fn antoine(params: &Parameters, kind: PropertyKind, t: f64, p: f64) -> PropsResult<f64> {
    let a = params.get("A")?;
    let b = params.get("B")?;
    let c = params.get("C")?;
    Ok(match kind {
        PropertyKind::Tsat => b / (a - p.log10()) - c,
        _ => 10f64.powf(a - b / (t + c)),
    })
}

fn wagner25(params: &Parameters, validity: Validity, t: f64) -> PropsResult<f64> {
    let c1 = params.get("C1")?;
    let c2 = params.get("C2")?;
    let c3 = params.get("C3")?;
    let c4 = params.get("C4")?;
    let ln_pc = params.get("lPc")?;
    let tc = params.get("Tc")?;

    let ln_psat = |t: f64| {
        let tr = t / tc;
        let tau = 1.0 - tr;
        ln_pc + (c1 * tau + c2 * tau.powf(1.5) + c3 * tau.powf(2.5) + c4 * tau.powi(5)) / tr
    };
    Ok(with_secant_bounds(ln_psat, validity, t).exp())
}

fn majer1985(params: &Parameters, t: f64) -> PropsResult<f64> {
    let a = params.get("A")?;
    let alpha = params.get("alpha")?;
    let beta = params.get("beta")?;
    let tc = params.get("Tc")?;

    let tr = t / tc;
    if tr >= 1.0 {
        return Ok(0.0);
    }
    Ok(a * (-alpha * tr).exp() * (1.0 - tr).powf(beta))
}

fn tde_watson(params: &Parameters, validity: Validity, t: f64) -> PropsResult<f64> {
    let c1 = params.get("C1")?;
    let c2 = params.get("C2")?;
    let c3 = params.get("C3")?;
    let c4 = params.get("C4")?;
    let tc = params.get("Tc")?;

    if t > tc {
        return Ok(0.0);
    }
    let hvap = |t: f64| {
        let tr = t / tc;
        let ln_tau = (1.0 - tr).ln();
        (c1 + c2 * ln_tau + c3 * tr * ln_tau + c4 * tr * tr * ln_tau).exp()
    };
    Ok(with_secant_bounds(hvap, validity, t))
}

fn ppds12(params: &Parameters, validity: Validity, t: f64) -> PropsResult<f64> {
    let a = params.get("A")?;
    let b = params.get("B")?;
    let c = params.get("C")?;
    let d = params.get("D")?;
    let e = params.get("E")?;
    let tc = params.get("Tc")?;
    let r = params.get("R")?;

    let hvap = |t: f64| {
        let tau = 1.0 - t / tc;
        r * tc
            * (a * tau.powf(1.0 / 3.0)
                + b * tau.powf(2.0 / 3.0)
                + c * tau
                + d * tau.powi(2)
                + e * tau.powi(6))
    };

    // lower extrapolation first, then the critical cutoff, then the upper bound
    let value = if t < validity.min {
        secant(hvap, validity.min, 1.0, t)
    } else if t > tc {
        0.0
    } else if t > validity.max {
        secant(hvap, validity.max, -1.0, t)
    } else {
        hvap(t)
    };
    Ok(value)
}

fn dippr107(params: &Parameters, t: f64) -> PropsResult<f64> {
    let a = params.get("A")?;
    let b = params.get("B")?;
    let c = params.get("C")?;
    let d = params.get("D")?;
    let e = params.get("E")?;

    let x = c / t;
    let y = e / t;
    Ok(a + b * (x / x.sinh()).powi(2) + d * (y / y.cosh()).powi(2))
}

fn tde_liquid(params: &Parameters, validity: Validity, t: f64) -> PropsResult<f64> {
    let c1 = params.get("C1")?;
    let c2 = params.get("C2")?;
    let c3 = params.get("C3")?;
    let c4 = params.get("C4")?;
    let b = params.get("B")?;
    let tc = params.get("Tc")?;

    let cp = |t: f64| b / (1.0 - t / tc) + c1 + c2 * t + c3 * t * t + c4 * t.powi(3);
    Ok(with_secant_bounds(cp, validity, t))
}

fn thermoml(params: &Parameters, validity: Validity, t: f64) -> PropsResult<f64> {
    let c1 = params.get("C1")?;
    let c2 = params.get("C2")?;
    let c3 = params.get("C3")?;
    let c4 = params.get("C4")?;
    let c5 = params.get("C5")?;
    // Tc is part of the published parameter set but unused by the polynomial.
    params.get("Tc")?;

    let cp = |t: f64| c1 + c2 * t + c3 * t * t + c4 * t.powi(3) + c5 * t.powi(4);
    Ok(with_secant_bounds(cp, validity, t))
}

/// Shomate coefficients as published by NIST.
///
/// Units: Cp [J/(mol·K)], H − H298 [kJ/mol], S [J/(mol·K)], T [K].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShomateCoeffs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
}

impl ShomateCoeffs {
    fn from_parameters(params: &Parameters) -> PropsResult<Self> {
        // F, G and H are only required for H and S; resolve() has enforced that
        let optional = |name: &'static str| params.get(name).unwrap_or(0.0);
        Ok(Self {
            a: params.get("A")?,
            b: params.get("B")?,
            c: params.get("C")?,
            d: params.get("D")?,
            e: params.get("E")?,
            f: optional("F"),
            g: optional("G"),
            h: optional("H"),
        })
    }

    /// Heat capacity [J/(mol·K)] at `t_k`.
    pub fn cp(&self, t_k: f64) -> f64 {
        let t = t_k / 1000.0;
        self.a + self.b * t + self.c * t * t + self.d * t.powi(3) + self.e / (t * t)
    }

    /// Standard enthalpy relative to 298.15 K, H − H298 [kJ/mol].
    pub fn enthalpy(&self, t_k: f64) -> f64 {
        let t = t_k / 1000.0;
        self.a * t + self.b * t * t / 2.0 + self.c * t.powi(3) / 3.0 + self.d * t.powi(4) / 4.0
            - self.e / t
            + self.f
            - self.h
    }

    /// Standard entropy [J/(mol·K)].
    pub fn entropy(&self, t_k: f64) -> f64 {
        let t = t_k / 1000.0;
        self.a * t.ln() + self.b * t + self.c * t * t / 2.0 + self.d * t.powi(3) / 3.0
            - self.e / (2.0 * t * t)
            + self.g
    }
}
