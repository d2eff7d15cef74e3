// src/bin/poscar_symmetry.rs

use clap::Parser;
use poscar_tools::model::symmetry::marshal;
use poscar_tools::physics::analysis::symmetry::analyze_marshaled;
use poscar_tools::physics::operations::conversion::{convert_marshaled, CellType};
use poscar_tools::utils::report;
use poscar_tools::{io, tools};
use std::path::PathBuf;
use std::process::ExitCode;

/// Report the space group of a POSCAR structure, optionally writing its
/// primitive cell.
#[derive(Parser, Debug)]
#[command(
    version,
    allow_negative_numbers = true,
    after_help = "Example:\n  poscar_symmetry --input POSCARin --symprec 1e-5 --primitive"
)]
struct Cli {
    /// Input POSCAR file name
    #[arg(long, default_value = "POSCAR")]
    input: PathBuf,

    /// Symmetry tolerance [default: 1e-5]
    #[arg(long)]
    symprec: Option<f64>,

    /// Print the Wyckoff positions
    #[arg(long)]
    wyckoff: bool,

    /// Print the symmetry operations
    #[arg(long)]
    symoper: bool,

    /// Generate the primitive POSCAR file
    #[arg(long)]
    primitive: bool,

    /// Output POSCAR file name (used with --primitive)
    #[arg(long, default_value = "POSCAR_primitive")]
    output: PathBuf,

    /// Print debug messages
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match tools::parse_args::<Cli>() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    let config = tools::init(cli.verbose);

    let symprec = match tools::validate_symprec(cli.symprec.unwrap_or(config.symprec), &config) {
        Ok(v) => v,
        Err(e) => return tools::fail(e),
    };

    let structure = match io::load_structure(&cli.input) {
        Ok(s) => s,
        Err(e) => return tools::fail(e),
    };

    // marshaled once, so placeholder warnings appear once
    let cell = match marshal(&structure) {
        Ok(c) => c,
        Err(e) => return tools::fail(format!("failed to analyze symmetry: {}", e)),
    };

    match analyze_marshaled(&cell, symprec) {
        Ok(dataset) => print!("{}", report::symmetry_summary(&dataset, cli.wyckoff, cli.symoper)),
        Err(e) => return tools::fail(format!("failed to analyze symmetry: {}", e)),
    }

    if cli.primitive {
        println!("Creating the primitive cell file.");
        let primitive = match convert_marshaled(&structure, &cell, CellType::Primitive, symprec) {
            Ok(s) => s,
            Err(e) => return tools::fail(format!("failed to create primitive POSCAR: {}", e)),
        };
        if let Err(e) = io::save_structure(&cli.output, &primitive) {
            return tools::fail(e);
        }
        println!("Output written to: {}", cli.output.display());
    }

    ExitCode::SUCCESS
}
