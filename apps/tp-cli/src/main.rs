use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tp_config::{ConfigError, EngineConfig};
use tp_props::{
    DatabaseEnthalpy, GasComposition, MixtureEnthalpy, NasaPolynomials, PropertyKind, PropsError,
    ShomateTables, SweepAxis, SweepDefinition, SweepError, SweepType,
    execute_property_sweep, mixture_viscosity,
};
use tp_solver::{SolverError, invert_enthalpy_with};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(about = "Thermodynamic property engine CLI", long_about = None)]
struct Cli {
    /// Engine configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one property of one species
    Property {
        /// Species id or alias (e.g. H2O, WATER)
        species: String,
        /// Property tag (e.g. PSAT, CP, H, DENSITY)
        property: String,
        /// Temperature, in the record's convention
        #[arg(short, long)]
        t: f64,
        /// Pressure, in the record's convention
        #[arg(short, long, default_value_t = 101_325.0)]
        p: f64,
        /// Target unit
        #[arg(short, long, default_value = "DEFAULT")]
        unit: String,
        /// Report failures as errors instead of printing -1
        #[arg(long)]
        strict: bool,
    },
    /// Dump the parsed records of a species
    Records {
        species: String,
    },
    /// Mixture enthalpy [J/Nm³] relative to the reference temperature
    MixEnthalpy {
        /// Temperature [°C]
        #[arg(long)]
        t_c: f64,
        #[command(flatten)]
        composition: CompositionArgs,
        #[arg(long, value_enum, default_value_t = EnthalpySourceArg::Nasa)]
        source: EnthalpySourceArg,
    },
    /// Mixture temperature [°C] from its enthalpy [J/Nm³]
    MixTemperature {
        /// Enthalpy [J/Nm³]
        #[arg(long)]
        h: f64,
        /// Previous solution [°C], used as the starting point
        #[arg(long)]
        prior: Option<f64>,
        #[command(flatten)]
        composition: CompositionArgs,
        #[arg(long, value_enum, default_value_t = EnthalpySourceArg::Nasa)]
        source: EnthalpySourceArg,
    },
    /// Mixture viscosity [Pa·s] by the Wilke rule
    MixViscosity {
        /// Temperature [°C]
        #[arg(long)]
        t_c: f64,
        #[command(flatten)]
        composition: CompositionArgs,
    },
    /// Evaluate a property across a temperature or pressure range
    Sweep {
        species: String,
        property: String,
        #[arg(long, value_enum, default_value_t = AxisArg::Temperature)]
        axis: AxisArg,
        /// Start value, optionally with a unit (e.g. "300K", "1bar")
        #[arg(long)]
        start: String,
        /// End value, optionally with a unit
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = 11)]
        points: usize,
        /// Logarithmic spacing
        #[arg(long)]
        log: bool,
        /// Pressure [Pa] of a temperature sweep, or temperature [K] of a pressure sweep
        #[arg(long, default_value_t = 101_325.0)]
        fixed: f64,
        #[arg(short, long, default_value = "DEFAULT")]
        unit: String,
    },
    /// Validate a configuration file and print the effective settings
    CheckConfig {
        path: PathBuf,
    },
}

/// Gas amounts: mole fractions, molar flows or normal volume flows.
#[derive(Args)]
struct CompositionArgs {
    #[arg(long, default_value_t = 0.0)]
    co2: f64,
    #[arg(long, default_value_t = 0.0)]
    h2o: f64,
    #[arg(long, default_value_t = 0.0)]
    o2: f64,
    #[arg(long, default_value_t = 0.0)]
    n2: f64,
    #[arg(long, default_value_t = 0.0)]
    co: f64,
    #[arg(long, default_value_t = 0.0)]
    h2: f64,
}

impl CompositionArgs {
    fn composition(&self) -> Result<GasComposition, PropsError> {
        GasComposition::flue_gas(self.co2, self.h2o, self.o2, self.n2, self.co, self.h2)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EnthalpySourceArg {
    Nasa,
    Shomate,
    Database,
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    Temperature,
    Pressure,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Props(#[from] PropsError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
}

type CliResult<T> = Result<T, CliError>;

/// Pressure at which database enthalpies are looked up [Pa].
const ATMOSPHERIC_PA: f64 = 101_325.0;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => tp_config::load_yaml(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Property {
            species,
            property,
            t,
            p,
            unit,
            strict,
        } => cmd_property(&config, &species, &property, t, p, &unit, strict),
        Commands::Records { species } => cmd_records(&config, &species),
        Commands::MixEnthalpy {
            t_c,
            composition,
            source,
        } => cmd_mix_enthalpy(&config, t_c, &composition.composition()?, source),
        Commands::MixTemperature {
            h,
            prior,
            composition,
            source,
        } => cmd_mix_temperature(&config, h, prior, &composition.composition()?, source),
        Commands::MixViscosity { t_c, composition } => {
            let mu = mixture_viscosity(t_c, &composition.composition()?)?;
            println!("{:.6e}", mu.value);
            Ok(())
        }
        Commands::Sweep {
            species,
            property,
            axis,
            start,
            end,
            points,
            log,
            fixed,
            unit,
        } => {
            let axis = match axis {
                AxisArg::Temperature => SweepAxis::Temperature,
                AxisArg::Pressure => SweepAxis::Pressure,
            };
            let spacing = if log {
                SweepType::Logarithmic
            } else {
                SweepType::Linear
            };
            let sweep = SweepDefinition::from_text(start, end, axis, points, spacing)?;
            cmd_sweep(&config, &species, &property, &sweep, fixed, &unit)
        }
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

fn cmd_property(
    config: &EngineConfig,
    species: &str,
    property: &str,
    t: f64,
    p: f64,
    unit: &str,
    strict: bool,
) -> CliResult<()> {
    let db = config.open_database();
    let value = if strict {
        db.get_property(species, property, t, p, unit)?
    } else {
        db.thermodynamic_property(species, property, t, p, unit)
    };
    println!("{value}");
    Ok(())
}

fn cmd_records(config: &EngineConfig, species: &str) -> CliResult<()> {
    let records = config.open_database().species_records(species)?;
    if records.is_empty() {
        println!("No records for {species}");
    }
    for record in records {
        println!("{record}");
    }
    Ok(())
}

fn cmd_mix_enthalpy(
    config: &EngineConfig,
    t_c: f64,
    composition: &GasComposition,
    source: EnthalpySourceArg,
) -> CliResult<()> {
    let basis = config.enthalpy_basis();
    let h = match source {
        EnthalpySourceArg::Nasa => MixtureEnthalpy::new(NasaPolynomials)
            .with_basis(basis)
            .enthalpy(t_c, composition)?,
        EnthalpySourceArg::Shomate => MixtureEnthalpy::new(ShomateTables)
            .with_basis(basis)
            .enthalpy(t_c, composition)?,
        EnthalpySourceArg::Database => {
            let db = config.open_database();
            MixtureEnthalpy::new(DatabaseEnthalpy::new(&db, ATMOSPHERIC_PA))
                .with_basis(basis)
                .enthalpy(t_c, composition)?
        }
    };
    println!("{h:.3}");
    Ok(())
}

fn cmd_mix_temperature(
    config: &EngineConfig,
    h: f64,
    prior: Option<f64>,
    composition: &GasComposition,
    source: EnthalpySourceArg,
) -> CliResult<()> {
    let basis = config.enthalpy_basis();
    let solver = config.solver_config();
    let result = match source {
        EnthalpySourceArg::Nasa => {
            let mix = MixtureEnthalpy::new(NasaPolynomials).with_basis(basis);
            invert_enthalpy_with(&mix, h, composition, prior, &solver)?
        }
        EnthalpySourceArg::Shomate => {
            let mix = MixtureEnthalpy::new(ShomateTables).with_basis(basis);
            invert_enthalpy_with(&mix, h, composition, prior, &solver)?
        }
        EnthalpySourceArg::Database => {
            let db = config.open_database();
            let mix =
                MixtureEnthalpy::new(DatabaseEnthalpy::new(&db, ATMOSPHERIC_PA)).with_basis(basis);
            invert_enthalpy_with(&mix, h, composition, prior, &solver)?
        }
    };
    println!("{:.3}", result.x);
    tracing::info!(iterations = result.iterations, "mixture temperature solved");
    Ok(())
}

fn cmd_sweep(
    config: &EngineConfig,
    species: &str,
    property: &str,
    sweep: &SweepDefinition,
    fixed: f64,
    unit: &str,
) -> CliResult<()> {
    let kind = PropertyKind::from_tag(property)?;
    let db = config.open_database();
    let result = execute_property_sweep(&db, species, kind, unit, sweep, fixed)?;

    println!("# {sweep}");
    println!("# {species} {kind} [{unit}]");
    for (x, value) in result.independent_values.iter().zip(&result.values) {
        match value {
            Some(v) => println!("{x}\t{v}"),
            None => println!("{x}\t-"),
        }
    }
    for (i, msg) in &result.failures {
        eprintln!("point {i}: {msg}");
    }
    println!(
        "# {} succeeded, {} failed",
        result.num_successful, result.num_failed
    );
    Ok(())
}

fn cmd_check_config(path: &Path) -> CliResult<()> {
    println!("Validating config: {}", path.display());
    let config = tp_config::load_yaml(path)?;
    println!("✓ Config is valid");
    println!("  index file: {}", config.database.index_file.display());
    if let Some(secondary) = &config.database.secondary_index {
        println!("  secondary index: {}", secondary.display());
    }
    println!("  upper bound: {:?}", config.interpolation.upper_bound);
    println!(
        "  solver: {} iterations, tolerance {}, damping {}",
        config.solver.max_iterations, config.solver.tolerance, config.solver.damping
    );
    Ok(())
}
