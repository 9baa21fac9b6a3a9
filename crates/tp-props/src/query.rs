//! Property query facade: species + property + state → value in the requested unit.

use crate::correlations::evaluate_model;
use crate::error::{PropsError, PropsResult};
use crate::index::SpeciesIndex;
use crate::interpolate::{UpperBoundPolicy, interpolate};
use crate::parser::{find_record, parse_all_records};
use crate::record::{PropertyKind, PropertyRecord, RecordData};
use crate::units::{DEFAULT_UNIT, convert};
use std::path::{Path, PathBuf};

/// Value returned by [`PropertyDatabase::thermodynamic_property`] when nothing can be computed.
pub const NOT_COMPUTABLE: f64 = -1.0;

/// One property request.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    pub species: String,
    pub property: PropertyKind,
    pub t: f64,
    pub p: f64,
    /// Target unit; `DEFAULT` keeps the record's native unit.
    pub unit: String,
}

impl PropertyQuery {
    pub fn new(species: impl Into<String>, property: PropertyKind, t: f64, p: f64) -> Self {
        Self {
            species: species.into(),
            property,
            t,
            p,
            unit: DEFAULT_UNIT.to_string(),
        }
    }

    pub fn in_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Evaluate a record at (T, P) in its native unit.
pub fn evaluate_record(
    record: &PropertyRecord,
    t: f64,
    p: f64,
    policy: UpperBoundPolicy,
) -> PropsResult<f64> {
    match &record.data {
        RecordData::Table(table) => Ok(interpolate(table, record.axis_value(t, p), policy)),
        RecordData::Model(model) => {
            evaluate_model(model, record.property_kind, record.validity, t, p)
        }
    }
}

/// Read-only handle on an on-disk property database.
///
/// Index and species files are re-read on every query, so the handle holds no
/// parsed state and can be shared freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDatabase {
    index_file: PathBuf,
    secondary_index: Option<PathBuf>,
    upper_bound: UpperBoundPolicy,
}

impl PropertyDatabase {
    pub fn new(index_file: impl Into<PathBuf>) -> Self {
        Self {
            index_file: index_file.into(),
            secondary_index: None,
            upper_bound: UpperBoundPolicy::default(),
        }
    }

    /// Index searched when the primary one does not list a species.
    pub fn with_secondary_index(mut self, path: impl Into<PathBuf>) -> Self {
        self.secondary_index = Some(path.into());
        self
    }

    pub fn with_upper_bound_policy(mut self, policy: UpperBoundPolicy) -> Self {
        self.upper_bound = policy;
        self
    }

    pub fn index_file(&self) -> &Path {
        &self.index_file
    }

    pub fn upper_bound_policy(&self) -> UpperBoundPolicy {
        self.upper_bound
    }

    /// Data file of `species`, from the primary index then the secondary one.
    pub fn locate_species(&self, species: &str) -> PropsResult<PathBuf> {
        let primary = SpeciesIndex::load(&self.index_file)?;
        if let Some(entry) = primary.lookup(species) {
            return Ok(entry.path.clone());
        }
        if let Some(secondary) = &self.secondary_index {
            let secondary = SpeciesIndex::load(secondary)?;
            if let Some(entry) = secondary.lookup(species) {
                return Ok(entry.path.clone());
            }
        }
        Err(PropsError::SpeciesNotFound {
            species: species.to_string(),
        })
    }

    /// Record of `property` for `species` accepting (T, P).
    pub fn find(
        &self,
        species: &str,
        property: PropertyKind,
        t: f64,
        p: f64,
    ) -> PropsResult<PropertyRecord> {
        let file = self.locate_species(species)?;
        find_record(&file, property, t, p).map_err(|err| match err {
            PropsError::RecordNotFound { property, t, p, .. } => PropsError::RecordNotFound {
                species: species.to_string(),
                property,
                t,
                p,
            },
            other => other,
        })
    }

    /// Every record in the species' data file.
    pub fn species_records(&self, species: &str) -> PropsResult<Vec<PropertyRecord>> {
        let file = self.locate_species(species)?;
        parse_all_records(&file)
    }

    /// Evaluate a query, converting to the requested unit.
    ///
    /// Unsupported unit pairs are not an error: the native value is returned
    /// with a warning.
    pub fn evaluate(&self, query: &PropertyQuery) -> PropsResult<f64> {
        let record = self.find(&query.species, query.property, query.t, query.p)?;
        let raw = evaluate_record(&record, query.t, query.p, self.upper_bound)?;
        let value = convert(raw, &record.unit, &query.unit, record.molecular_weight);
        tracing::debug!(
            species = %query.species,
            property = %query.property,
            t = query.t,
            p = query.p,
            native = raw,
            unit = %query.unit,
            value,
            "property evaluated"
        );
        Ok(value)
    }

    /// Evaluate `property` (a property tag such as `"PSAT"`) for `species` at (T, P).
    pub fn get_property(
        &self,
        species: &str,
        property: &str,
        t: f64,
        p: f64,
        unit: &str,
    ) -> PropsResult<f64> {
        let kind = PropertyKind::from_tag(property)?;
        self.evaluate(&PropertyQuery::new(species, kind, t, p).in_unit(unit))
    }

    /// Sentinel form of [`get_property`](Self::get_property): any failure yields [`NOT_COMPUTABLE`].
    pub fn thermodynamic_property(
        &self,
        species: &str,
        property: &str,
        t: f64,
        p: f64,
        unit: &str,
    ) -> f64 {
        match self.get_property(species, property, t, p, unit) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, species, property, t, p, unit, "property not computable");
                NOT_COMPUTABLE
            }
        }
    }
}

/// Every record of `species`, resolved through a single index file.
pub fn get_species_records(index_file: &Path, species: &str) -> PropsResult<Vec<PropertyRecord>> {
    PropertyDatabase::new(index_file).species_records(species)
}
