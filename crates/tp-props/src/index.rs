//! Species index: maps species names and aliases to property-data files.
//!
//! Two layouts are read, one line per key:
//!
//! ```text
//! SPECIES_ID: H2O            COMPOUND: H2O
//! COMPOSITION: WATER         COMPOSITION: WATER
//! THERMO_DATA: h2o.txt       FILE: h2o.txt
//! ```
//!
//! An entry is emitted on each data-file line using the most recent id and
//! composition. Relative paths resolve against the index file's directory,
//! falling back to the path as written when only that one exists.

use crate::error::{PropsError, PropsResult};
use crate::parser::read_text;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One species entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesIndexEntry {
    /// Canonical upper-case species id.
    pub species_id: String,
    /// Optional alias, upper-case.
    pub composition: Option<String>,
    pub path: PathBuf,
}

impl SpeciesIndexEntry {
    fn matches(&self, name: &str) -> bool {
        self.species_id == name || self.composition.as_deref() == Some(name)
    }
}

/// Entries of one index file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesIndex {
    entries: Vec<SpeciesIndexEntry>,
}

impl SpeciesIndex {
    /// Read and parse an index file.
    pub fn load(index_file: &Path) -> PropsResult<Self> {
        let content = read_text(index_file, |path| PropsError::IndexFileNotFound { path })?;
        let base = index_file.parent().unwrap_or_else(|| Path::new(""));
        let index = Self::parse_str(&content, base);
        tracing::debug!(
            file = %index_file.display(),
            entries = index.entries.len(),
            "loaded species index"
        );
        Ok(index)
    }

    /// Parse index text, resolving relative paths against `base_dir`.
    pub fn parse_str(content: &str, base_dir: &Path) -> Self {
        let mut entries = Vec::new();
        let mut species_id: Option<String> = None;
        let mut composition: Option<String> = None;

        for line in content.lines() {
            let mut tokens = line.split_whitespace();
            let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
                continue;
            };
            match key.trim_end_matches(':').to_uppercase().as_str() {
                "SPECIES_ID" | "COMPOUND" => {
                    species_id = Some(value.to_uppercase());
                    composition = None;
                }
                "COMPOSITION" => composition = Some(value.to_uppercase()),
                "THERMO_DATA" | "FILE" => match &species_id {
                    Some(id) => entries.push(SpeciesIndexEntry {
                        species_id: id.clone(),
                        composition: composition.clone(),
                        path: resolve_data_path(base_dir, value),
                    }),
                    None => tracing::warn!(file = value, "index data file listed before any species id"),
                },
                _ => {}
            }
        }
        Self { entries }
    }

    /// First entry whose id or alias matches `name`, case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&SpeciesIndexEntry> {
        let name = name.trim().to_uppercase();
        self.entries.iter().find(|e| e.matches(&name))
    }

    /// Data file for `name`, or `SpeciesNotFound`.
    pub fn resolve(&self, name: &str) -> PropsResult<&Path> {
        self.lookup(name)
            .map(|e| e.path.as_path())
            .ok_or_else(|| PropsError::SpeciesNotFound {
                species: name.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesIndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve_data_path(base_dir: &Path, raw: &str) -> PathBuf {
    let raw_path = Path::new(raw);
    if raw_path.is_absolute() {
        return raw_path.to_path_buf();
    }
    let beside_index = base_dir.join(raw_path);
    if !beside_index.exists() && raw_path.exists() {
        raw_path.to_path_buf()
    } else {
        beside_index
    }
}

/// Species id and alias → data file, as a map. The first entry wins for a repeated name.
pub fn load_species_index(index_file: &Path) -> PropsResult<BTreeMap<String, PathBuf>> {
    let index = SpeciesIndex::load(index_file)?;
    let mut map = BTreeMap::new();
    for entry in index.iter() {
        map.entry(entry.species_id.clone())
            .or_insert_with(|| entry.path.clone());
        if let Some(alias) = &entry.composition {
            map.entry(alias.clone()).or_insert_with(|| entry.path.clone());
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_layout() {
        let text = "SPECIES_ID: H2O\nCOMPOSITION: water\nTHERMO_DATA: h2o.txt\n\n\
                    SPECIES_ID: co2\nTHERMO_DATA: /data/co2.txt\n";
        let index = SpeciesIndex::parse_str(text, Path::new("/db"));
        assert_eq!(index.len(), 2);

        let water = index.lookup("Water").unwrap();
        assert_eq!(water.species_id, "H2O");
        assert_eq!(water.path, PathBuf::from("/db/h2o.txt"));

        let co2 = index.lookup("CO2").unwrap();
        assert_eq!(co2.composition, None);
        assert_eq!(co2.path, PathBuf::from("/data/co2.txt"));
    }

    #[test]
    fn legacy_layout() {
        let text = "COMPOUND: N2\nCOMPOSITION: NITROGEN\nFILE: n2.txt\n";
        let index = SpeciesIndex::parse_str(text, Path::new("db"));
        assert_eq!(index.resolve("nitrogen").unwrap(), Path::new("db/n2.txt"));
    }

    #[test]
    fn unknown_species() {
        let index = SpeciesIndex::parse_str("SPECIES_ID: H2O\nTHERMO_DATA: h2o.txt\n", Path::new(""));
        assert!(matches!(
            index.resolve("XE"),
            Err(PropsError::SpeciesNotFound { .. })
        ));
    }

    #[test]
    fn first_entry_wins() {
        let text = "SPECIES_ID: H2O\nTHERMO_DATA: a.txt\nSPECIES_ID: H2O\nTHERMO_DATA: b.txt\n";
        let index = SpeciesIndex::parse_str(text, Path::new(""));
        assert_eq!(index.resolve("h2o").unwrap(), Path::new("a.txt"));
    }

    #[test]
    fn missing_index_file() {
        let err = SpeciesIndex::load(Path::new("/nonexistent/index.txt")).unwrap_err();
        assert!(matches!(err, PropsError::IndexFileNotFound { .. }));
    }
}
