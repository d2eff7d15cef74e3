// src/bin/poscar_2conventional.rs

use clap::Parser;
use poscar_tools::physics::operations::conversion::conventional_cell;
use poscar_tools::{io, tools};
use std::path::PathBuf;
use std::process::ExitCode;

/// Write the conventional (standardized) cell of a POSCAR structure.
#[derive(Parser, Debug)]
#[command(
    version,
    allow_negative_numbers = true,
    after_help = "Example:\n  poscar_2conventional --input POSCARin --symprec 1e-5"
)]
struct Cli {
    /// Input POSCAR file name
    #[arg(long, default_value = "POSCAR")]
    input: PathBuf,

    /// Symmetry tolerance [default: 1e-5]
    #[arg(long)]
    symprec: Option<f64>,

    /// Output POSCAR file name
    #[arg(long, default_value = "POSCAR_conventional")]
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

    let conventional = match conventional_cell(&structure, symprec) {
        Ok(s) => s,
        Err(e) => return tools::fail(format!("failed to create conventional POSCAR: {}", e)),
    };
    println!(
        "Conventional cell: {} atoms (input had {})",
        conventional.total_atoms(),
        structure.total_atoms()
    );

    if let Err(e) = io::save_structure(&cli.output, &conventional) {
        return tools::fail(e);
    }
    println!("Output written to: {}", cli.output.display());
    ExitCode::SUCCESS
}
