//! Property records: one table or correlation for one (species, property) pair.

use crate::correlations::{ModelType, Parameters};
use crate::error::{PropsError, PropsResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Validity range applied when a record does not declare one.
pub const DEFAULT_VALIDITY: Validity = Validity {
    min: -1.0e4,
    max: 1.0e4,
};

/// Properties the engine knows how to store and evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKind {
    /// Heat capacity (ideal gas or generic).
    Cp,
    /// Liquid heat capacity.
    CpLiquid,
    /// Enthalpy.
    H,
    /// Entropy.
    S,
    /// Heat of vaporization.
    Hvap,
    /// Saturation temperature.
    Tsat,
    /// Saturation (vapour) pressure.
    Psat,
    Viscosity,
    ThermalConductivity,
    Density,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 10] = [
        PropertyKind::Cp,
        PropertyKind::CpLiquid,
        PropertyKind::H,
        PropertyKind::S,
        PropertyKind::Hvap,
        PropertyKind::Tsat,
        PropertyKind::Psat,
        PropertyKind::Viscosity,
        PropertyKind::ThermalConductivity,
        PropertyKind::Density,
    ];

    /// Canonical data-file tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Cp => "CP",
            Self::CpLiquid => "CPLIQ",
            Self::H => "H",
            Self::S => "S",
            Self::Hvap => "HVAP",
            Self::Tsat => "TSAT",
            Self::Psat => "PSAT",
            Self::Viscosity => "VISCOSITY",
            Self::ThermalConductivity => "THERMAL_CONDUCTIVITY",
            Self::Density => "DENSITY",
        }
    }

    /// Parse a property tag case-insensitively. `T` and `P` are the legacy
    /// spellings of `TSAT` and `PSAT`.
    pub fn from_tag(tag: &str) -> PropsResult<Self> {
        let kind = match tag.trim().to_uppercase().as_str() {
            "CP" => Self::Cp,
            "CPLIQ" | "CP_LIQ" | "CPLIQUID" => Self::CpLiquid,
            "H" | "ENTHALPY" => Self::H,
            "S" | "ENTROPY" => Self::S,
            "HVAP" | "DHVAP" => Self::Hvap,
            "TSAT" | "T" => Self::Tsat,
            "PSAT" | "P" => Self::Psat,
            "VISCOSITY" | "MU" => Self::Viscosity,
            "THERMAL_CONDUCTIVITY" | "LAMBDA" => Self::ThermalConductivity,
            "DENSITY" | "RHO" => Self::Density,
            _ => {
                return Err(PropsError::UnknownTag {
                    what: "property",
                    tag: tag.to_string(),
                });
            }
        };
        Ok(kind)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PropertyKind {
    type Err = PropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

/// How a record stores its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Table,
    Model,
}

impl Representation {
    /// `LIST` is accepted as the legacy spelling of `TABLE`.
    pub fn from_tag(tag: &str) -> PropsResult<Self> {
        match tag.trim().to_uppercase().as_str() {
            "TABLE" | "LIST" => Ok(Self::Table),
            "MODEL" => Ok(Self::Model),
            _ => Err(PropsError::UnknownTag {
                what: "representation",
                tag: tag.to_string(),
            }),
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("TABLE"),
            Self::Model => f.write_str("MODEL"),
        }
    }
}

/// Query axis a record's validity range and table refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependence {
    Temperature,
    Pressure,
}

impl Dependence {
    pub fn from_tag(tag: &str) -> PropsResult<Self> {
        match tag.trim().to_uppercase().as_str() {
            "TEMPERATURE" | "T" => Ok(Self::Temperature),
            "PRESSURE" | "P" => Ok(Self::Pressure),
            _ => Err(PropsError::UnknownTag {
                what: "dependence",
                tag: tag.to_string(),
            }),
        }
    }

    /// Pick the value on this axis.
    pub fn select(self, t: f64, p: f64) -> f64 {
        match self {
            Self::Temperature => t,
            Self::Pressure => p,
        }
    }
}

impl fmt::Display for Dependence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => f.write_str("TEMPERATURE"),
            Self::Pressure => f.write_str("PRESSURE"),
        }
    }
}

/// Closed interval over which a record is authoritative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validity {
    pub min: f64,
    pub max: f64,
}

impl Validity {
    /// Interval between two bounds, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Interval spanning the extrema of `values`, `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        Some(Self { min, max })
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }
}

impl Default for Validity {
    fn default() -> Self {
        DEFAULT_VALIDITY
    }
}

/// Tabulated property: `dependent[i]` at `independent[i]`, with one state variable held at `constant`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub constant: f64,
    pub independent: Vec<f64>,
    pub dependent: Vec<f64>,
}

impl TableData {
    /// Shape check: equal lengths, at least two points, non-decreasing abscissa.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.independent.len() != self.dependent.len() {
            return Err(format!(
                "{} independent values but {} dependent values",
                self.independent.len(),
                self.dependent.len()
            ));
        }
        if self.independent.len() < 2 {
            return Err("a table needs at least two points".to_string());
        }
        if self.independent.windows(2).any(|w| w[1] < w[0]) {
            return Err("independent values must be non-decreasing".to_string());
        }
        Ok(())
    }
}

/// Correlation family plus its named constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub model_type: ModelType,
    pub parameters: BTreeMap<String, f64>,
}

/// Payload of a record; exactly one representation per record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    Table(TableData),
    Model(ModelData),
}

/// One parsed property definition.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    /// Canonical upper-case species identifier.
    pub species_id: String,
    pub property_kind: PropertyKind,
    pub dependence: Dependence,
    /// Native unit as written in the data file.
    pub unit: String,
    /// Molecular weight [g/mol], needed for molar/mass conversions.
    pub molecular_weight: Option<f64>,
    pub validity: Validity,
    pub extrapolate: bool,
    pub data: RecordData,
}

impl PropertyRecord {
    pub fn representation(&self) -> Representation {
        match self.data {
            RecordData::Table(_) => Representation::Table,
            RecordData::Model(_) => Representation::Model,
        }
    }

    /// The query value on this record's dependence axis.
    pub fn axis_value(&self, t: f64, p: f64) -> f64 {
        self.dependence.select(t, p)
    }

    /// Whether the record may answer a query at (T, P): inside its validity
    /// range, or outside it with extrapolation allowed.
    pub fn accepts(&self, t: f64, p: f64) -> bool {
        self.extrapolate || self.validity.contains(self.axis_value(t, p))
    }

    /// Check every structural invariant of the record.
    pub fn validate(&self) -> PropsResult<()> {
        let malformed = |reason: String| PropsError::MalformedRecord {
            species: self.species_id.clone(),
            property: self.property_kind.to_string(),
            reason,
        };

        if !(self.validity.min <= self.validity.max) {
            return Err(malformed(format!(
                "validity min {} exceeds max {}",
                self.validity.min, self.validity.max
            )));
        }

        match &self.data {
            RecordData::Table(table) => table.check_shape().map_err(malformed),
            RecordData::Model(model) => {
                Parameters::resolve(model.model_type, self.property_kind, &model.parameters)
                    .map(|_| ())
            }
        }
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, values: &[f64]) -> fmt::Result {
    write!(f, "  {label:<10}")?;
    for v in values {
        write!(f, " {v}")?;
    }
    writeln!(f)
}

impl fmt::Display for PropertyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} [{}]", self.species_id, self.property_kind, self.representation())?;
        writeln!(f, "  {:<10} {}", "DEPENDENCE", self.dependence)?;
        writeln!(f, "  {:<10} {}", "UNIT", self.unit)?;
        if let Some(mw) = self.molecular_weight {
            writeln!(f, "  {:<10} {mw}", "MW")?;
        }
        writeln!(
            f,
            "  {:<10} {} .. {}",
            "VALIDITY", self.validity.min, self.validity.max
        )?;
        writeln!(
            f,
            "  {:<10} {}",
            "EXTRAPOL.",
            if self.extrapolate { "YES" } else { "NO" }
        )?;
        match &self.data {
            RecordData::Table(table) => {
                writeln!(f, "  {:<10} {}", "CONSPROP", table.constant)?;
                write_row(f, "VAR", &table.independent)?;
                write_row(f, "PROP", &table.dependent)
            }
            RecordData::Model(model) => {
                writeln!(f, "  {:<10} {}", "MODEL", model.model_type)?;
                for (name, value) in &model.parameters {
                    writeln!(f, "  {name:<10} {value}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_record(independent: Vec<f64>, dependent: Vec<f64>) -> PropertyRecord {
        PropertyRecord {
            species_id: "H2O".into(),
            property_kind: PropertyKind::Density,
            dependence: Dependence::Temperature,
            unit: "KG/M3".into(),
            molecular_weight: Some(18.015),
            validity: Validity::new(273.15, 373.15),
            extrapolate: false,
            data: RecordData::Table(TableData {
                constant: 101_325.0,
                independent,
                dependent,
            }),
        }
    }

    #[test]
    fn property_tags() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::from_tag(kind.tag()).unwrap(), kind);
        }
        assert_eq!("t".parse::<PropertyKind>().unwrap(), PropertyKind::Tsat);
        assert_eq!("P".parse::<PropertyKind>().unwrap(), PropertyKind::Psat);
        assert!(PropertyKind::from_tag("ENTHALPY_OF_MIXING").is_err());
    }

    #[test]
    fn representation_accepts_list() {
        assert_eq!(Representation::from_tag("list").unwrap(), Representation::Table);
        assert_eq!(Representation::from_tag("TABLE").unwrap(), Representation::Table);
        assert_eq!(Representation::from_tag("Model").unwrap(), Representation::Model);
        assert!(Representation::from_tag("CURVE").is_err());
    }

    #[test]
    fn validity_from_unordered_values() {
        let v = Validity::from_values(&[500.0, 250.0, 300.0]).unwrap();
        assert_eq!(v, Validity::new(250.0, 500.0));
        assert!(Validity::from_values(&[]).is_none());
        assert!(v.contains(250.0) && v.contains(500.0) && !v.contains(500.1));
    }

    #[test]
    fn accepts_honours_extrapolation() {
        let mut rec = table_record(vec![273.15, 373.15], vec![999.8, 958.4]);
        assert!(rec.accepts(300.0, 0.0));
        assert!(!rec.accepts(400.0, 0.0));
        rec.extrapolate = true;
        assert!(rec.accepts(400.0, 0.0));
    }

    #[test]
    fn accepts_uses_dependence_axis() {
        let mut rec = table_record(vec![1e5, 2e5], vec![1.0, 2.0]);
        rec.dependence = Dependence::Pressure;
        rec.validity = Validity::new(1e5, 2e5);
        assert!(rec.accepts(9999.0, 1.5e5));
        assert!(!rec.accepts(150.0, 3e5));
    }

    #[test]
    fn validate_table_shape() {
        assert!(table_record(vec![1.0, 2.0], vec![1.0, 2.0]).validate().is_ok());
        assert!(table_record(vec![1.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).validate().is_ok());
        let err = table_record(vec![1.0], vec![1.0]).validate().unwrap_err();
        assert!(matches!(err, PropsError::MalformedRecord { .. }));
        assert!(table_record(vec![1.0, 2.0], vec![1.0]).validate().is_err());
        assert!(table_record(vec![2.0, 1.0], vec![1.0, 2.0]).validate().is_err());
    }

    #[test]
    fn validate_model_parameters() {
        let mut rec = table_record(vec![1.0, 2.0], vec![1.0, 2.0]);
        rec.property_kind = PropertyKind::Psat;
        rec.data = RecordData::Model(ModelData {
            model_type: ModelType::Antoine,
            parameters: [("A".to_string(), 1.0), ("B".to_string(), 2.0)]
                .into_iter()
                .collect(),
        });
        assert!(matches!(
            rec.validate(),
            Err(PropsError::InvalidParameterSet { .. })
        ));
    }

    #[test]
    fn display_lists_data() {
        let rec = table_record(vec![273.15, 373.15], vec![999.8, 958.4]);
        let text = rec.to_string();
        assert!(text.starts_with("H2O DENSITY [TABLE]"));
        assert!(text.contains("958.4"));
        assert!(text.contains("EXTRAPOL.  NO"));
    }
}
