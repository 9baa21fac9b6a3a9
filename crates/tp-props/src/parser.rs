//! Line-oriented reader for species property-data files.
//!
//! ```text
//! COMPOUND: H2O
//! PROPERTY: PSAT
//! DATA: MODEL
//! MODEL: ANTOINE
//! UNIT: MMHG
//! DEPENDENCE: TEMPERATURE
//! VALIDITY: 1 100
//! EXTRAPOLATION: NO
//! CONSTANTS: A B C
//! VALUES: 8.07131 1730.63 233.426
//! ```
//!
//! Keys are the first whitespace-delimited token of a line, case-insensitive,
//! with an optional trailing colon. A record has no terminator: it closes on the
//! first line whose key is not valid for the record's representation (a blank
//! line, the next `PROPERTY:` or `COMPOUND:`, or anything unstructured).

use crate::correlations::ModelType;
use crate::error::{PropsError, PropsResult};
use crate::record::{
    Dependence, ModelData, PropertyKind, PropertyRecord, RecordData, Representation, TableData,
    Validity,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tp_core::numeric::parse_real;

/// Where the reader is within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Before the first `COMPOUND:` line.
    ScanningCompound,
    /// Inside a compound, collecting header keys of the current property.
    ReadingPropertyHeader,
    ReadingTableBody,
    ReadingModelBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Compound,
    Property,
    Data,
    Extrapolation,
    Unit,
    MolecularWeight,
    Validity,
    Dependence,
    HeldConstant,
    Independent,
    Dependent,
    Model,
    ConstantNames,
    ConstantValues,
    Other,
}

impl Key {
    fn classify(token: &str) -> Self {
        match token.trim_end_matches(':').to_uppercase().as_str() {
            "COMPOUND" => Self::Compound,
            "PROPERTY" => Self::Property,
            "DATA" => Self::Data,
            "EXTRAPOLATION" => Self::Extrapolation,
            "UNIT" => Self::Unit,
            "MW" => Self::MolecularWeight,
            "VALIDITY" => Self::Validity,
            "DEPENDENCE" => Self::Dependence,
            "CONSPROP" | "CONSTANT" | "ISOBAR" | "ISOTERM" | "ISOTHERM" => Self::HeldConstant,
            "VAR" | "VARIABLE" => Self::Independent,
            "PROP" => Self::Dependent,
            "MODEL" => Self::Model,
            "CONSTANTS" => Self::ConstantNames,
            "VALUES" => Self::ConstantValues,
            _ => Self::Other,
        }
    }

    fn is_header(self) -> bool {
        matches!(
            self,
            Self::Data
                | Self::Extrapolation
                | Self::Unit
                | Self::MolecularWeight
                | Self::Validity
                | Self::Dependence
        )
    }

    fn is_table_body(self) -> bool {
        matches!(self, Self::HeldConstant | Self::Independent | Self::Dependent)
    }

    fn is_model_body(self) -> bool {
        matches!(self, Self::Model | Self::ConstantNames | Self::ConstantValues)
    }
}

/// Numeric token with the legacy leniency: unparsable input reads as 0.0.
fn lenient_number(token: &str, line_no: usize) -> f64 {
    parse_real(token).unwrap_or_else(|| {
        tracing::warn!(token, line = line_no, "unparsable numeric token read as 0.0");
        0.0
    })
}

/// Fields of a record as read, before validation.
#[derive(Debug, Clone, Default)]
pub struct PendingRecord {
    species_id: String,
    property_tag: String,
    line_no: usize,
    representation_tag: Option<String>,
    dependence_tag: Option<String>,
    unit: Option<String>,
    molecular_weight: Option<f64>,
    validity: Option<Validity>,
    extrapolate: bool,
    held_constant: f64,
    independent: Vec<f64>,
    dependent: Vec<f64>,
    model_tag: Option<String>,
    constant_names: Vec<String>,
    constant_values: Vec<f64>,
}

impl PendingRecord {
    pub fn species_id(&self) -> &str {
        &self.species_id
    }

    /// Property kind named by the `PROPERTY:` line, if the tag is known.
    pub fn property_kind(&self) -> Option<PropertyKind> {
        PropertyKind::from_tag(&self.property_tag).ok()
    }

    fn apply(&mut self, key: Key, values: &[&str], line_no: usize) {
        let first = values.first().copied();
        let numbers = || values.iter().map(|v| lenient_number(v, line_no));
        match key {
            Key::Data => self.representation_tag = first.map(str::to_string),
            Key::Extrapolation => {
                self.extrapolate = first
                    .map(|v| matches!(v.to_uppercase().as_str(), "YES" | "TRUE" | "Y"))
                    .unwrap_or(false)
            }
            Key::Unit => self.unit = (!values.is_empty()).then(|| values.join(" ")),
            Key::MolecularWeight => self.molecular_weight = first.map(|v| lenient_number(v, line_no)),
            Key::Validity => {
                let numbers: Vec<f64> = numbers().collect();
                if let Some(validity) = Validity::from_values(&numbers) {
                    self.validity = Some(validity);
                }
            }
            Key::Dependence => self.dependence_tag = first.map(str::to_string),
            Key::HeldConstant => {
                // "CONSTANT PROPERTY: 101325" spelling
                let value = values
                    .iter()
                    .find(|v| !v.trim_end_matches(':').eq_ignore_ascii_case("PROPERTY"))
                    .copied();
                self.held_constant = value.map(|v| lenient_number(v, line_no)).unwrap_or(0.0);
            }
            Key::Independent => self.independent.extend(numbers()),
            Key::Dependent => self.dependent.extend(numbers()),
            Key::Model => self.model_tag = first.map(str::to_string),
            Key::ConstantNames => self
                .constant_names
                .extend(values.iter().map(|v| v.to_string())),
            Key::ConstantValues => self.constant_values.extend(numbers()),
            Key::Compound | Key::Property | Key::Other => {}
        }
    }

    /// Validate the collected fields and build the record.
    pub fn build(self) -> PropsResult<PropertyRecord> {
        let property_kind = PropertyKind::from_tag(&self.property_tag)?;
        let malformed = |reason: &str| PropsError::MalformedRecord {
            species: self.species_id.clone(),
            property: self.property_tag.clone(),
            reason: format!("{reason} (record starting at line {})", self.line_no),
        };

        let representation = match &self.representation_tag {
            Some(tag) => Representation::from_tag(tag)?,
            None => return Err(malformed("missing DATA line")),
        };
        let dependence = match &self.dependence_tag {
            Some(tag) => Dependence::from_tag(tag)?,
            None => return Err(malformed("missing DEPENDENCE line")),
        };

        let data = match representation {
            Representation::Table => RecordData::Table(TableData {
                constant: self.held_constant,
                independent: self.independent,
                dependent: self.dependent,
            }),
            Representation::Model => {
                let model_type = match &self.model_tag {
                    Some(tag) => ModelType::from_tag(tag)?,
                    None => return Err(malformed("missing MODEL line")),
                };
                let invalid = |reason: String| PropsError::InvalidParameterSet {
                    model: model_type.tag().to_string(),
                    reason,
                };
                if self.constant_names.len() != self.constant_values.len() {
                    return Err(invalid(format!(
                        "{} constant names but {} values for {} {}",
                        self.constant_names.len(),
                        self.constant_values.len(),
                        self.species_id,
                        self.property_tag
                    )));
                }
                let mut parameters = BTreeMap::new();
                for (name, value) in self.constant_names.into_iter().zip(self.constant_values) {
                    if parameters.contains_key(&name) {
                        return Err(invalid(format!("constant '{name}' listed twice")));
                    }
                    parameters.insert(name, value);
                }
                RecordData::Model(ModelData {
                    model_type,
                    parameters,
                })
            }
        };

        let record = PropertyRecord {
            species_id: self.species_id,
            property_kind,
            dependence,
            unit: self.unit.unwrap_or_default(),
            molecular_weight: self.molecular_weight,
            validity: self.validity.unwrap_or_default(),
            extrapolate: self.extrapolate,
            data,
        };
        record.validate()?;
        Ok(record)
    }
}

/// State machine over the lines of one species file, yielding each record as it closes.
#[derive(Debug)]
pub struct RecordReader<I> {
    lines: I,
    line_no: usize,
    state: ParserState,
    species: Option<String>,
    pending: Option<PendingRecord>,
}

impl<'a, I: Iterator<Item = &'a str>> RecordReader<I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            line_no: 0,
            state: ParserState::ScanningCompound,
            species: None,
            pending: None,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Species of the most recent `COMPOUND:` line.
    pub fn current_species(&self) -> Option<&str> {
        self.species.as_deref()
    }

    fn close(&mut self) -> Option<PendingRecord> {
        self.state = if self.species.is_some() {
            ParserState::ReadingPropertyHeader
        } else {
            ParserState::ScanningCompound
        };
        self.pending.take()
    }

    fn feed(&mut self, line: &'a str) -> Option<PendingRecord> {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return match self.state {
                ParserState::ReadingTableBody | ParserState::ReadingModelBody => self.close(),
                _ => None,
            };
        };
        let key = Key::classify(first);
        let values: Vec<&str> = tokens.collect();

        match (self.state, key) {
            (_, Key::Compound) => {
                let closed = self.close();
                match values.first() {
                    Some(id) => {
                        self.species = Some(id.to_uppercase());
                        self.state = ParserState::ReadingPropertyHeader;
                    }
                    None => {
                        tracing::warn!(line = self.line_no, "COMPOUND line without a species id");
                        self.species = None;
                        self.state = ParserState::ScanningCompound;
                    }
                }
                closed
            }
            (ParserState::ScanningCompound, _) => None,
            (_, Key::Property) => {
                let closed = self.close();
                match values.first() {
                    Some(tag) => {
                        self.pending = Some(PendingRecord {
                            species_id: self.species.clone().unwrap_or_default(),
                            property_tag: tag.to_uppercase(),
                            line_no: self.line_no,
                            ..PendingRecord::default()
                        });
                    }
                    None => tracing::warn!(line = self.line_no, "PROPERTY line without a tag"),
                }
                closed
            }
            (state, key) if key.is_header() => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.apply(key, &values, self.line_no);
                    if key == Key::Data {
                        self.state = match pending
                            .representation_tag
                            .as_deref()
                            .map(Representation::from_tag)
                        {
                            Some(Ok(Representation::Table)) => ParserState::ReadingTableBody,
                            Some(Ok(Representation::Model)) => ParserState::ReadingModelBody,
                            _ => state,
                        };
                    }
                }
                None
            }
            (ParserState::ReadingTableBody, key) if key.is_table_body() => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.apply(key, &values, self.line_no);
                }
                None
            }
            (ParserState::ReadingModelBody, key) if key.is_model_body() => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.apply(key, &values, self.line_no);
                }
                None
            }
            (ParserState::ReadingTableBody | ParserState::ReadingModelBody, _) => self.close(),
            (ParserState::ReadingPropertyHeader, _) => {
                tracing::trace!(line = self.line_no, first, "line ignored outside a record body");
                None
            }
        }
    }
}

impl<'a, I: Iterator<Item = &'a str>> Iterator for RecordReader<I> {
    type Item = PendingRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(line) = self.lines.next() {
            self.line_no += 1;
            if let Some(closed) = self.feed(line) {
                return Some(closed);
            }
        }
        self.close()
    }
}

/// Read a text file, mapping "cannot open" to `not_found`.
pub(crate) fn read_text(
    path: &Path,
    not_found: impl FnOnce(PathBuf) -> PropsError,
) -> PropsResult<String> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(not_found(path.to_path_buf())),
        Err(err) => Err(PropsError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

/// Parse every record in `content`.
pub fn parse_records_str(content: &str) -> PropsResult<Vec<PropertyRecord>> {
    RecordReader::new(content.lines())
        .map(PendingRecord::build)
        .collect()
}

/// Parse every record of a species file.
pub fn parse_all_records(species_file: &Path) -> PropsResult<Vec<PropertyRecord>> {
    let content = read_text(species_file, |path| PropsError::SpeciesFileNotFound { path })?;
    let records = parse_records_str(&content)?;
    tracing::debug!(file = %species_file.display(), count = records.len(), "parsed species file");
    Ok(records)
}

/// First record of `kind` in `content` that accepts (T, P).
///
/// Only the matching records are built, and reading stops at the first hit.
/// Returns `Ok(None)` when nothing qualifies, along with the species id seen.
pub fn find_record_str(
    content: &str,
    kind: PropertyKind,
    t: f64,
    p: f64,
) -> PropsResult<(Option<PropertyRecord>, Option<String>)> {
    let mut reader = RecordReader::new(content.lines());
    while let Some(pending) = reader.next() {
        if pending.property_kind() != Some(kind) {
            continue;
        }
        let record = pending.build()?;
        if record.accepts(t, p) {
            tracing::debug!(
                species = %record.species_id,
                %kind,
                min = record.validity.min,
                max = record.validity.max,
                extrapolate = record.extrapolate,
                "record selected"
            );
            return Ok((Some(record), reader.current_species().map(str::to_string)));
        }
        tracing::debug!(
            species = %record.species_id,
            %kind,
            axis = record.axis_value(t, p),
            min = record.validity.min,
            max = record.validity.max,
            "record outside validity, extrapolation not allowed"
        );
    }
    Ok((None, reader.current_species().map(str::to_string)))
}

/// First record of `kind` in a species file that accepts (T, P), or `RecordNotFound`.
pub fn find_record(
    species_file: &Path,
    kind: PropertyKind,
    t: f64,
    p: f64,
) -> PropsResult<PropertyRecord> {
    let content = read_text(species_file, |path| PropsError::SpeciesFileNotFound { path })?;
    match find_record_str(&content, kind, t, p)? {
        (Some(record), _) => Ok(record),
        (None, species) => Err(PropsError::RecordNotFound {
            species: species.unwrap_or_else(|| {
                species_file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            }),
            property: kind.to_string(),
            t,
            p,
        }),
    }
}

/// Records for `species` and `kind` in an already-parsed set that accept (T, P), in file order.
pub fn search_records<'r>(
    records: &'r [PropertyRecord],
    species: &str,
    kind: PropertyKind,
    t: f64,
    p: f64,
) -> impl Iterator<Item = &'r PropertyRecord> + 'r {
    let species = species.trim().to_uppercase();
    records.iter().filter(move |r| {
        r.species_id == species && r.property_kind == kind && r.accepts(t, p)
    })
}
