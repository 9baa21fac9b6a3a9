// tp-core/src/units.rs

use uom::si::f64::{
    DynamicViscosity as UomDynamicViscosity, MolarEnergy as UomMolarEnergy,
    MolarHeatCapacity as UomMolarHeatCapacity, ThermalConductivity as UomThermalConductivity,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type DynVisc = UomDynamicViscosity;
pub type MolarEnergy = UomMolarEnergy;
pub type MolarHeatCapacity = UomMolarHeatCapacity;
pub type Temperature = UomThermodynamicTemperature;
pub type ThermalConductivity = UomThermalConductivity;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn j_per_mol(v: f64) -> MolarEnergy {
    use uom::si::molar_energy::joule_per_mole;
    MolarEnergy::new::<joule_per_mole>(v)
}

#[inline]
pub fn j_per_mol_k(v: f64) -> MolarHeatCapacity {
    use uom::si::molar_heat_capacity::joule_per_kelvin_mole;
    MolarHeatCapacity::new::<joule_per_kelvin_mole>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn w_per_m_k(v: f64) -> ThermalConductivity {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    ThermalConductivity::new::<watt_per_meter_kelvin>(v)
}

/// Temperature in Kelvin as a bare number.
#[inline]
pub fn kelvin_of(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

pub mod constants {
    /// Offset between the Celsius and Kelvin scales.
    pub const ZERO_CELSIUS_K: f64 = 273.15;

    /// Universal gas constant [J/(mol·K)].
    pub const R_J_PER_MOL_K: f64 = 8.314;

    /// Molar volume of an ideal gas at normal conditions [m³/mol].
    pub const NORMAL_MOLAR_VOLUME_M3: f64 = 0.02241;
}
