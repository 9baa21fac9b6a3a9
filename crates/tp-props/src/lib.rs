//! tp-props: thermodynamic property data engine.
//!
//! Provides:
//! - Species index and property-data file parsing (`index`, `parser`)
//! - Property records with validity intervals (`record`)
//! - Correlation models and list interpolation (`correlations`, `interpolate`)
//! - Unit conversion for record values (`units`)
//! - The query facade, including the `-1.0` sentinel form (`query`)
//! - Built-in gas correlations, compositions and mixture rules (`gas`, `composition`, `mixture`)
//! - Parallel property sweeps (`sweeps`, `sweep_executor`)
//!
//! # Example
//!
//! ```no_run
//! use tp_props::PropertyDatabase;
//!
//! let db = PropertyDatabase::new("data/species_index.txt");
//! let psat = db.thermodynamic_property("H2O", "PSAT", 373.15, 101_325.0, "PA");
//! if psat < 0.0 {
//!     eprintln!("not computable");
//! }
//! ```

pub mod composition;
pub mod correlations;
pub mod error;
pub mod gas;
pub mod index;
pub mod interpolate;
pub mod mixture;
pub mod parser;
pub mod query;
pub mod record;
pub mod sweep_executor;
pub mod sweeps;
pub mod units;

// Re-exports for ergonomics
pub use composition::GasComposition;
pub use correlations::{ModelType, Parameters, ShomateCoeffs, evaluate_model};
pub use error::{PropsError, PropsResult};
pub use gas::GasSpecies;
pub use index::{SpeciesIndex, SpeciesIndexEntry, load_species_index};
pub use interpolate::{UpperBoundPolicy, interpolate};
pub use mixture::{
    DatabaseEnthalpy, EnthalpyBasis, EnthalpySource, MixtureEnthalpy, NasaPolynomials,
    ShomateTables, mixture_enthalpy, mixture_viscosity,
};
pub use parser::{
    ParserState, RecordReader, find_record, find_record_str, parse_all_records,
    parse_records_str, search_records,
};
pub use query::{
    NOT_COMPUTABLE, PropertyDatabase, PropertyQuery, evaluate_record, get_species_records,
};
pub use record::{
    Dependence, ModelData, PropertyKind, PropertyRecord, RecordData, Representation, TableData,
    Validity,
};
pub use sweep_executor::{SweepError, SweepResult, execute_property_sweep};
pub use sweeps::{SweepAxis, SweepDefinition, SweepType};
pub use units::{DEFAULT_UNIT, Unit, convert, parse_unit, try_convert};
