//! `fenestra`: the optional CLI surface over the optical engine.
//!
//! ```text
//! fenestra solve <geometry.json> <spectrum.csv>
//! fenestra bsdf <geometry.json> <basis>
//! ```
//!
//! Per the engine's external interface contract, exit codes are
//! `0` success, `2` invalid geometry, `3` spectral-data error, `4`
//! numerical failure.

mod geometry;
mod report;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fenestra_bsdf::multipane::{CalculationProperties, MultiPaneBSDF};
use fenestra_core::error::FenestraError;
use fenestra_core::Series;
use geometry::{BasisArg, GeometryFile};

#[derive(Parser, Debug)]
#[command(name = "fenestra", about = "Angle-resolved BSDF optical analysis for fenestration systems")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the layer stack in `geometry` and report band-integrated
    /// scattering properties over `spectrum`'s wavelength range.
    Solve {
        geometry: PathBuf,
        spectrum: PathBuf,
    },
    /// Build the layer stack in `geometry` over the hemisphere named by
    /// `basis` (overriding the file's own `basis` field) and print its
    /// front transmittance matrix.
    Bsdf {
        geometry: PathBuf,
        basis: BasisArg,
    },
}

fn read_geometry(path: &PathBuf) -> Result<GeometryFile, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::Io(path.clone(), e))?;
    serde_json::from_str(&text).map_err(|e| CliError::Json(path.clone(), e))
}

/// `wavelength,value` rows, blank lines and `#`-prefixed comments ignored.
fn read_spectrum(path: &PathBuf) -> Result<Series, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::Io(path.clone(), e))?;
    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split(',');
        let lambda: f64 = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| CliError::Csv(path.clone(), lineno + 1))?;
        let value: f64 = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| CliError::Csv(path.clone(), lineno + 1))?;
        points.push((lambda, value));
    }
    Ok(Series::new(points))
}

#[derive(Debug)]
enum CliError {
    Io(PathBuf, std::io::Error),
    Json(PathBuf, serde_json::Error),
    Csv(PathBuf, usize),
    Engine(FenestraError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(path, e) => write!(f, "reading {}: {e}", path.display()),
            CliError::Json(path, e) => write!(f, "parsing {} as JSON: {e}", path.display()),
            CliError::Csv(path, line) => write!(f, "{}:{line}: expected 'wavelength,value'", path.display()),
            CliError::Engine(e) => write!(f, "{e}"),
        }
    }
}

impl From<FenestraError> for CliError {
    fn from(e: FenestraError) -> Self {
        CliError::Engine(e)
    }
}

/// Maps a failure to the process exit code the CLI contract names: `2`
/// invalid geometry, `3` spectral-data error, `4` numerical failure.
/// I/O and parse errors that have no engine-error counterpart also land
/// on `2`/`3` depending on which argument they came from; both are
/// reported before the engine ever runs.
fn exit_code(err: &CliError) -> u8 {
    match err {
        CliError::Io(..) | CliError::Json(..) => 2,
        CliError::Csv(..) => 3,
        CliError::Engine(FenestraError::InvalidGeometry(_))
        | CliError::Engine(FenestraError::BasisMismatch { .. })
        | CliError::Engine(FenestraError::OutOfRangeQuery(_)) => 2,
        CliError::Engine(FenestraError::InconsistentSpectralData(_))
        | CliError::Engine(FenestraError::MissingSource(_)) => 3,
        CliError::Engine(FenestraError::SingularSystem(_)) => 4,
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Solve { geometry, spectrum } => {
            let geometry_file = read_geometry(&geometry)?;
            let source = read_spectrum(&spectrum)?;
            let lambda_lo = *geometry_file.wavelengths.first().ok_or_else(|| {
                CliError::Engine(FenestraError::InconsistentSpectralData(
                    "geometry file has no wavelengths".to_string(),
                ))
            })?;
            let lambda_hi = *geometry_file.wavelengths.last().unwrap();
            let layers = geometry_file.build_layers(geometry_file.basis.to_basis())?;
            let mut pane = MultiPaneBSDF::create(&layers, Some(geometry_file.wavelengths.clone()))?;
            pane.set_calculation_properties(CalculationProperties::new(
                source,
                geometry_file.wavelengths,
                None,
            )?);
            let report = report::build(&pane, lambda_lo, lambda_hi)?;
            println!("{}", serde_json::to_string_pretty(&report).expect("report serializes"));
        }
        Command::Bsdf { geometry, basis } => {
            let geometry_file = read_geometry(&geometry)?;
            let layers = geometry_file.build_layers(basis.to_basis())?;
            let pane = MultiPaneBSDF::create(&layers, Some(geometry_file.wavelengths.clone()))?;
            let lambda_lo = geometry_file.wavelengths[0];
            let lambda_hi = *geometry_file.wavelengths.last().unwrap();
            let matrix = pane.get_matrix(
                lambda_lo,
                lambda_hi,
                fenestra_core::common::Side::Front,
                fenestra_core::common::PropertySimple::T,
            )?;
            let rows: Vec<Vec<f64>> = (0..matrix.rows())
                .map(|r| matrix.row(r).to_vec())
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows).expect("matrix serializes"));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}
