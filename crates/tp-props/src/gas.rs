//! Built-in ideal-gas library for common combustion and flue-gas species.
//!
//! Correlations that need no database files:
//! - NASA 7-coefficient polynomials for molar enthalpy (two ranges split at 1000 K),
//! - NIST Shomate tables for Cp, H − H298 and S°,
//! - Lucas corresponding-states viscosity, plus a quadratic fit for H2,
//! - polynomial thermal conductivity with a validity range.

use crate::correlations::ShomateCoeffs;
use crate::error::{PropsError, PropsResult};
use std::fmt;
use std::str::FromStr;
use tp_core::units::constants::R_J_PER_MOL_K;
use tp_core::units::{
    DynVisc, MolarEnergy, MolarHeatCapacity, Temperature, ThermalConductivity, j_per_mol,
    j_per_mol_k, kelvin_of, pa_s, w_per_m_k,
};

/// Gas species with built-in correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GasSpecies {
    CO2,
    H2O,
    O2,
    N2,
    CO,
    H2,
    CH4,
    SO2,
    SO3,
    HCl,
    Cl2,
    NH3,
    NO2,
    N2O4,
}

impl GasSpecies {
    pub const ALL: [GasSpecies; 14] = [
        GasSpecies::CO2,
        GasSpecies::H2O,
        GasSpecies::O2,
        GasSpecies::N2,
        GasSpecies::CO,
        GasSpecies::H2,
        GasSpecies::CH4,
        GasSpecies::SO2,
        GasSpecies::SO3,
        GasSpecies::HCl,
        GasSpecies::Cl2,
        GasSpecies::NH3,
        GasSpecies::NO2,
        GasSpecies::N2O4,
    ];

    pub fn formula(&self) -> &'static str {
        match self {
            GasSpecies::CO2 => "CO2",
            GasSpecies::H2O => "H2O",
            GasSpecies::O2 => "O2",
            GasSpecies::N2 => "N2",
            GasSpecies::CO => "CO",
            GasSpecies::H2 => "H2",
            GasSpecies::CH4 => "CH4",
            GasSpecies::SO2 => "SO2",
            GasSpecies::SO3 => "SO3",
            GasSpecies::HCl => "HCl",
            GasSpecies::Cl2 => "Cl2",
            GasSpecies::NH3 => "NH3",
            GasSpecies::NO2 => "NO2",
            GasSpecies::N2O4 => "N2O4",
        }
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            GasSpecies::CO2 => 44.010,
            GasSpecies::H2O => 18.015,
            GasSpecies::O2 => 31.999,
            GasSpecies::N2 => 28.014,
            GasSpecies::CO => 28.010,
            GasSpecies::H2 => 2.016,
            GasSpecies::CH4 => 16.043,
            GasSpecies::SO2 => 64.066,
            GasSpecies::SO3 => 80.064,
            GasSpecies::HCl => 36.461,
            GasSpecies::Cl2 => 70.906,
            GasSpecies::NH3 => 17.031,
            GasSpecies::NO2 => 46.006,
            GasSpecies::N2O4 => 92.011,
        }
    }
}

impl fmt::Display for GasSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.formula())
    }
}

impl FromStr for GasSpecies {
    type Err = PropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(GasSpecies::CO2),
            "H2O" | "WATER" | "STEAM" => Ok(GasSpecies::H2O),
            "O2" | "OXYGEN" => Ok(GasSpecies::O2),
            "N2" | "NITROGEN" => Ok(GasSpecies::N2),
            "CO" | "CARBONMONOXIDE" | "CARBON MONOXIDE" => Ok(GasSpecies::CO),
            "H2" | "HYDROGEN" => Ok(GasSpecies::H2),
            "CH4" | "METHANE" => Ok(GasSpecies::CH4),
            "SO2" => Ok(GasSpecies::SO2),
            "SO3" => Ok(GasSpecies::SO3),
            "HCL" => Ok(GasSpecies::HCl),
            "CL2" | "CHLORINE" => Ok(GasSpecies::Cl2),
            "NH3" | "AMMONIA" => Ok(GasSpecies::NH3),
            "NO2" => Ok(GasSpecies::NO2),
            "N2O4" => Ok(GasSpecies::N2O4),
            _ => Err(PropsError::UnknownTag {
                what: "gas species",
                tag: s.to_string(),
            }),
        }
    }
}

fn not_supported(species: GasSpecies, correlation: &str) -> PropsError {
    PropsError::NotSupported {
        what: format!("{correlation} for {species}"),
    }
}

// ---------------------------------------------------------------------------
// NASA 7-coefficient polynomials
// ---------------------------------------------------------------------------

const NASA_T_SPLIT_K: f64 = 1000.0;

struct Nasa7 {
    low: [f64; 7],
    high: [f64; 7],
}

const NASA_O2: Nasa7 = Nasa7 {
    low: [3.78245636, -2.99673416e-3, 9.84730201e-6, -9.68129509e-9, 3.24372837e-12, -1063.94356, 3.65767573],
    high: [3.28253784, 1.48308754e-3, -7.57966669e-7, 2.09470555e-10, -2.16717794e-14, -1088.45772, 5.45323129],
};

const NASA_N2: Nasa7 = Nasa7 {
    low: [3.298677, 1.4082404e-3, -3.963222e-6, 5.641515e-9, -2.444854e-12, -1020.8999, 3.950372],
    high: [2.92664, 1.4879768e-3, -5.68476e-7, 1.0097038e-10, -6.753351e-15, -922.7977, 5.980528],
};

const NASA_H2O: Nasa7 = Nasa7 {
    low: [4.19864056, -2.0364341e-3, 6.52040211e-6, -5.48797062e-9, 1.77197817e-12, -30293.7267, -0.849032208],
    high: [3.03399249, 2.17691804e-3, -1.64072518e-7, -9.7041987e-11, 1.68200992e-14, -30004.2971, 4.9667701],
};

const NASA_CO2: Nasa7 = Nasa7 {
    low: [2.35677352, 8.98459677e-3, -7.12356269e-6, 2.45919022e-9, -1.43699548e-13, -48371.9697, 9.90105222],
    high: [3.85746029, 4.41437026e-3, -2.21481404e-6, 5.23490188e-10, -4.72084164e-14, -48759.166, 2.27163806],
};

const NASA_CO: Nasa7 = Nasa7 {
    low: [3.57953347, -6.1035368e-4, 1.01681433e-6, 9.07005884e-10, -9.04424499e-13, -14344.086, 3.50840928],
    high: [2.71518561, 2.06252743e-3, -9.98825771e-7, 2.30053008e-10, -2.03647716e-14, -14151.8724, 7.81868772],
};

const NASA_H2: Nasa7 = Nasa7 {
    low: [2.34433112, 7.98052075e-3, -1.9478151e-5, 2.01572094e-8, -7.37611761e-12, -917.935173, 0.683010238],
    high: [3.3372792, -4.94024731e-5, 4.99456778e-7, -1.79566394e-10, 2.00255376e-14, -950.158922, -3.20502331],
};

fn nasa_table(species: GasSpecies) -> Option<&'static Nasa7> {
    match species {
        GasSpecies::O2 => Some(&NASA_O2),
        GasSpecies::N2 => Some(&NASA_N2),
        GasSpecies::H2O => Some(&NASA_H2O),
        GasSpecies::CO2 => Some(&NASA_CO2),
        GasSpecies::CO => Some(&NASA_CO),
        GasSpecies::H2 => Some(&NASA_H2),
        _ => None,
    }
}

fn nasa_h(a: &[f64; 7], t: f64) -> f64 {
    R_J_PER_MOL_K
        * t
        * (a[0]
            + a[1] * t / 2.0
            + a[2] * t * t / 3.0
            + a[3] * t.powi(3) / 4.0
            + a[4] * t.powi(4) / 5.0
            + a[5] / t)
}

/// Absolute molar enthalpy (formation enthalpy included) from the NASA polynomials.
pub fn nasa_enthalpy(species: GasSpecies, t: Temperature) -> PropsResult<MolarEnergy> {
    let table = nasa_table(species).ok_or_else(|| not_supported(species, "NASA enthalpy"))?;
    let t_k = kelvin_of(t);
    let coeffs = if t_k > NASA_T_SPLIT_K {
        &table.high
    } else {
        &table.low
    };
    Ok(j_per_mol(nasa_h(coeffs, t_k)))
}

// ---------------------------------------------------------------------------
// Shomate tables
// ---------------------------------------------------------------------------

/// Coefficient set valid up to `t_max` (reduced temperature t = T/1000).
struct ShomateRange {
    t_max: f64,
    coeffs: ShomateCoeffs,
}

#[allow(clippy::too_many_arguments)]
const fn sh(t_max: f64, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, g: f64, h: f64) -> ShomateRange {
    ShomateRange {
        t_max,
        coeffs: ShomateCoeffs { a, b, c, d, e, f, g, h },
    }
}

const OPEN: f64 = f64::INFINITY;

const SHOMATE_CO2: &[ShomateRange] = &[
    sh(1.2, 24.99735, 55.18696, -33.69137, 7.948387, -0.136638, -403.6075, 228.2431, -393.5224),
    sh(OPEN, 58.16639, 2.720074, -0.492289, 0.038844, -6.447293, -425.9186, 263.6125, -393.5224),
];
const SHOMATE_CO: &[ShomateRange] = &[
    sh(1.3, 25.56759, 6.09613, 4.054656, -2.671301, 0.131021, -118.0089, 227.3665, -110.5271),
    sh(OPEN, 35.1507, 1.300095, -0.205921, 0.01355, -3.28278, -127.8375, 231.712, -110.5271),
];
const SHOMATE_H2O: &[ShomateRange] = &[
    sh(1.7, 30.092, 6.832514, 6.793435, -2.53448, 0.082139, -250.881, 223.3967, -241.8264),
    sh(OPEN, 41.96426, 8.622053, -1.499781, 0.098119, -11.15764, -272.1797, 219.7809, -241.8264),
];
const SHOMATE_H2: &[ShomateRange] = &[
    sh(1.5, 33.1078, -11.508, 11.6093, -2.8444, -0.159665, -9.991971, 172.788, 0.0),
    sh(OPEN, 34.1434, 0.503927, 0.372036, -0.038599, -8.074761, -21.2188, 162.093, 0.0),
];
const SHOMATE_CH4: &[ShomateRange] = &[
    sh(1.3, -0.703029, 108.4773, -42.52157, 5.862788, 0.678565, -76.84376, 158.7163, -74.8731),
    sh(OPEN, 85.81217, 11.26467, -2.114146, 0.13819, -26.42221, -153.5327, 224.4143, -74.8731),
];
const SHOMATE_N2: &[ShomateRange] = &[sh(
    OPEN, 26.092, 8.218801, -1.976141, 0.159274, 0.044434, -7.98923, 221.02, 0.0,
)];
const SHOMATE_O2: &[ShomateRange] = &[sh(
    OPEN, 29.659, 6.137261, -1.186521, 0.09578, -0.219663, -9.861391, 237.948, 0.0,
)];
const SHOMATE_SO2: &[ShomateRange] = &[
    sh(1.2, 21.43049, 74.35094, -57.75217, 16.35534, 0.086731, -305.7688, 254.8872, -296.8422),
    sh(OPEN, 57.48188, 1.009328, -0.07629, 0.005174, -4.045401, -324.414, 302.7798, -296.8422),
];
const SHOMATE_SO3: &[ShomateRange] = &[
    sh(1.2, 24.02503, 119.4607, -94.38686, 26.96237, -0.117517, -407.8526, 253.5186, -395.7654),
    sh(OPEN, 81.99008, 0.622236, -0.12244, 0.008294, -6.703688, -437.659, 330.9264, -395.7654),
];
const SHOMATE_HCL: &[ShomateRange] = &[
    sh(1.2, 32.12392, -13.45805, 19.86852, -6.853936, -0.049672, -101.6206, 228.6866, -92.31201),
    sh(OPEN, 31.91923, 3.203184, -0.541539, 0.035925, -3.438525, -108.015, 218.2768, -92.31201),
];
const SHOMATE_CL2: &[ShomateRange] = &[
    sh(1.0, 33.0506, 12.2294, -12.0651, 4.38533, -0.159494, -10.8348, 259.029, 0.0),
    sh(3.0, 42.6773, -5.00957, 1.904621, -0.165641, -2.098481, -17.2898, 269.84, 0.0),
    sh(OPEN, -42.5535, 41.6857, -7.12683, 0.387839, 101.144, 132.764, 264.786, 0.0),
];
const SHOMATE_NH3: &[ShomateRange] = &[
    sh(1.4, 19.99563, 49.77119, -15.37599, 1.921168, 0.189174, -53.30667, 203.8591, -45.89806),
    sh(OPEN, 52.02427, 18.48801, -3.765128, 0.248541, -12.45799, -85.53895, 223.8022, -45.89806),
];
const SHOMATE_NO2: &[ShomateRange] = &[
    sh(1.2, 16.10857, 75.89525, -54.3874, 14.30777, 0.239423, 26.17464, 240.5386, 33.09502),
    sh(OPEN, 56.82541, 0.738053, -0.144721, 0.009777, -5.459911, 2.846456, 290.5056, 33.09502),
];
const SHOMATE_N2O4: &[ShomateRange] = &[
    sh(1.0, 34.05274, 191.9845, -151.0575, 44.3935, -0.158949, -8.893428, 293.7724, 9.078988),
    sh(OPEN, 128.622, 2.524345, -0.520883, 0.03663, -11.55704, -59.22619, 417.0444, 9.078988),
];

fn shomate_table(species: GasSpecies) -> &'static [ShomateRange] {
    match species {
        GasSpecies::CO2 => SHOMATE_CO2,
        GasSpecies::CO => SHOMATE_CO,
        GasSpecies::H2O => SHOMATE_H2O,
        GasSpecies::H2 => SHOMATE_H2,
        GasSpecies::CH4 => SHOMATE_CH4,
        GasSpecies::N2 => SHOMATE_N2,
        GasSpecies::O2 => SHOMATE_O2,
        GasSpecies::SO2 => SHOMATE_SO2,
        GasSpecies::SO3 => SHOMATE_SO3,
        GasSpecies::HCl => SHOMATE_HCL,
        GasSpecies::Cl2 => SHOMATE_CL2,
        GasSpecies::NH3 => SHOMATE_NH3,
        GasSpecies::NO2 => SHOMATE_NO2,
        GasSpecies::N2O4 => SHOMATE_N2O4,
    }
}

/// Shomate coefficient set covering `t_k`.
pub fn shomate_coeffs(species: GasSpecies, t_k: f64) -> PropsResult<ShomateCoeffs> {
    if !(t_k.is_finite() && t_k > 0.0) {
        return Err(PropsError::OutOfRange {
            what: format!("Shomate temperature for {species} [K]"),
            value: t_k,
        });
    }
    let t = t_k / 1000.0;
    shomate_table(species)
        .iter()
        .find(|range| t <= range.t_max)
        .map(|range| range.coeffs)
        .ok_or_else(|| not_supported(species, "Shomate table"))
}

/// Isobaric heat capacity from the Shomate tables.
pub fn shomate_cp(species: GasSpecies, t: Temperature) -> PropsResult<MolarHeatCapacity> {
    let t_k = kelvin_of(t);
    Ok(j_per_mol_k(shomate_coeffs(species, t_k)?.cp(t_k)))
}

/// H − H298 from the Shomate tables.
pub fn shomate_enthalpy(species: GasSpecies, t: Temperature) -> PropsResult<MolarEnergy> {
    let t_k = kelvin_of(t);
    Ok(j_per_mol(shomate_coeffs(species, t_k)?.enthalpy(t_k) * 1000.0))
}

/// Standard entropy from the Shomate tables.
pub fn shomate_entropy(species: GasSpecies, t: Temperature) -> PropsResult<MolarHeatCapacity> {
    let t_k = kelvin_of(t);
    Ok(j_per_mol_k(shomate_coeffs(species, t_k)?.entropy(t_k)))
}

/// Mean heat capacity between `t1` and `t2`, ΔH/ΔT.
///
/// Falls back to the point value when the interval is degenerate.
pub fn shomate_mean_cp(
    species: GasSpecies,
    t1: Temperature,
    t2: Temperature,
) -> PropsResult<MolarHeatCapacity> {
    let dt = kelvin_of(t2) - kelvin_of(t1);
    if dt.abs() < 1e-9 {
        return shomate_cp(species, t1);
    }
    let dh = shomate_enthalpy(species, t2)?.value - shomate_enthalpy(species, t1)?.value;
    Ok(j_per_mol_k(dh / dt))
}

// ---------------------------------------------------------------------------
// Viscosity
// ---------------------------------------------------------------------------

/// Critical data for the Lucas method.
struct LucasData {
    mw: f64,
    tc_k: f64,
    pc_bar: f64,
    zc: f64,
    dipole_debye: f64,
}

fn lucas_data(species: GasSpecies) -> Option<LucasData> {
    let (mw, tc_k, pc_bar, zc, dipole_debye) = match species {
        GasSpecies::H2O => (18.015, 647.3, 221.2, 0.235, 1.8),
        GasSpecies::O2 => (32.0, 154.6, 50.4, 0.288, 0.0),
        GasSpecies::N2 => (28.0, 126.2, 33.9, 0.29, 0.0),
        GasSpecies::CO => (28.01, 132.9, 35.0, 0.295, 0.1),
        GasSpecies::CO2 => (44.01, 304.1, 73.8, 0.274, 0.0),
        _ => return None,
    };
    Some(LucasData {
        mw,
        tc_k,
        pc_bar,
        zc,
        dipole_debye,
    })
}

/// Low-pressure gas viscosity by the Lucas corresponding-states method.
pub fn lucas_viscosity(species: GasSpecies, t: Temperature) -> PropsResult<DynVisc> {
    let data = lucas_data(species).ok_or_else(|| not_supported(species, "Lucas viscosity"))?;
    let tr = kelvin_of(t) / data.tc_k;

    // inverse reduced viscosity
    let xi = 0.176 * (data.tc_k / (data.mw.powi(3) * data.pc_bar.powi(4))).powf(1.0 / 6.0);

    let mu_r = 52.46 * data.dipole_debye.powi(2) * data.pc_bar / data.tc_k.powi(2);
    let polar = 30.55 * (0.292 - data.zc).powf(1.72);
    let fp0 = if mu_r < 0.022 {
        1.0
    } else if mu_r < 0.075 {
        1.0 + polar
    } else {
        1.0 + polar * (0.96 + 0.1 * (tr - 0.7)).abs()
    };

    let reduced = 0.807 * tr.powf(0.618) - 0.357 * (-0.449 * tr).exp()
        + 0.34 * (-4.058 * tr).exp()
        + 0.018;
    // micropoise to Pa·s
    Ok(pa_s(1e-7 * reduced * fp0 / xi))
}

fn hydrogen_viscosity(t: Temperature) -> DynVisc {
    let t_k = kelvin_of(t);
    pa_s((21.87 + 0.222 * t_k - 3.751e-5 * t_k * t_k) * 1e-7)
}

/// Gas viscosity: Lucas method, or the quadratic fit for H2.
pub fn gas_viscosity(species: GasSpecies, t: Temperature) -> PropsResult<DynVisc> {
    match species {
        GasSpecies::H2 => Ok(hydrogen_viscosity(t)),
        _ => lucas_viscosity(species, t),
    }
}

// ---------------------------------------------------------------------------
// Thermal conductivity
// ---------------------------------------------------------------------------

/// Cubic in T [K], valid on `[t_min_k, t_max_k]`.
struct ConductivityFit {
    coeffs: [f64; 4],
    t_min_k: f64,
    t_max_k: f64,
}

fn conductivity_fit(species: GasSpecies) -> Option<ConductivityFit> {
    let (coeffs, t_min_k, t_max_k) = match species {
        GasSpecies::H2O => ([7.341e-3, -1.013e-5, 1.801e-7, -9.1e-11], 273.0, 1070.0),
        GasSpecies::O2 => ([-3.273e-4, 9.966e-5, -3.743e-8, 9.732e-12], 115.0, 1470.0),
        GasSpecies::N2 => ([3.919e-4, 9.816e-5, -5.067e-8, 1.504e-11], 115.0, 1470.0),
        GasSpecies::CO => ([5.067e-4, 9.125e-5, -3.524e-8, 8.199e-12], 115.0, 1670.0),
        GasSpecies::CO2 => ([-7.215e-3, 8.015e-5, 5.477e-9, -1.053e-11], 185.0, 1670.0),
        _ => return None,
    };
    Some(ConductivityFit {
        coeffs,
        t_min_k,
        t_max_k,
    })
}

/// Low-pressure gas thermal conductivity; `OutOfRange` outside the fit's range.
pub fn thermal_conductivity(
    species: GasSpecies,
    t: Temperature,
) -> PropsResult<ThermalConductivity> {
    let fit =
        conductivity_fit(species).ok_or_else(|| not_supported(species, "thermal conductivity"))?;
    let t_k = kelvin_of(t);
    if !(fit.t_min_k..=fit.t_max_k).contains(&t_k) {
        return Err(PropsError::OutOfRange {
            what: format!("{species} thermal conductivity temperature [K]"),
            value: t_k,
        });
    }
    let [a, b, c, d] = fit.coeffs;
    Ok(w_per_m_k(a + b * t_k + c * t_k * t_k + d * t_k.powi(3)))
}
