// src/bin/poscar_d2c.rs

use clap::Parser;
use poscar_tools::{io, tools, utils::report};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert a POSCAR file from Direct to Cartesian coordinates.
#[derive(Parser, Debug)]
#[command(version, after_help = "Example:\n  poscar_d2c --input POSCARin --output POSCARout")]
struct Cli {
    /// Input POSCAR file name
    #[arg(long, default_value = "POSCAR")]
    input: PathBuf,

    /// Output POSCAR file name
    #[arg(long, default_value = "POSCAR_cartesian")]
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
    tools::init(cli.verbose);

    let mut structure = match io::load_structure(&cli.input) {
        Ok(s) => s,
        Err(e) => return tools::fail(e),
    };
    log::debug!("\n{}", report::structure_summary(&structure, &cli.input.to_string_lossy()));

    if structure.is_direct() {
        structure.to_cartesian();
        println!("Converted Direct -> Cartesian");
    } else {
        println!("POSCAR is already in Cartesian coordinates");
    }

    if let Err(e) = io::save_structure(&cli.output, &structure) {
        return tools::fail(e);
    }
    println!("Output written to: {}", cli.output.display());
    ExitCode::SUCCESS
}
