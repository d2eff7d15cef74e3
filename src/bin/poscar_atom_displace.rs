// src/bin/poscar_atom_displace.rs

use clap::Parser;
use poscar_tools::physics::operations::displacement::displaced_copy;
use poscar_tools::utils::random::RandomSource;
use poscar_tools::{io, tools};
use std::path::PathBuf;
use std::process::ExitCode;

/// Write randomly displaced copies of a POSCAR structure.
#[derive(Parser, Debug)]
#[command(
    version,
    allow_negative_numbers = true,
    after_help = "Example:\n  poscar_atom_displace --input POSCAR --nfiles 10 --natoms 1 --amp 0.1"
)]
struct Cli {
    /// POSCAR file name
    #[arg(long, default_value = "POSCAR")]
    input: PathBuf,

    /// Number of displaced structure files to create
    #[arg(long, default_value_t = 1)]
    nfiles: i64,

    /// Number of atoms to displace [default: 1]
    #[arg(long)]
    natoms: Option<i64>,

    /// Displace all atoms in the input file (overrides --natoms)
    #[arg(long)]
    allatoms: bool,

    /// Maximal norm of the displacement vector in Angstroms [default: 0.01]
    #[arg(long)]
    amp: Option<f64>,

    /// Seed for the random generator, for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output files are named <PREFIX>1, <PREFIX>2, ...
    #[arg(long, default_value = "POSCAR_modified")]
    output_prefix: String,

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

    let amplitude = cli.amp.unwrap_or(config.amplitude);
    let (n_files, n_atoms) =
        match tools::validate_displacement(cli.nfiles, cli.natoms.unwrap_or(1), amplitude, &config) {
            Ok(counts) => counts,
            Err(e) => return tools::fail(e),
        };

    let original = match io::load_structure(&cli.input) {
        Ok(s) => s,
        Err(e) => return tools::fail(e),
    };

    let total = original.total_atoms();
    let n_atoms = tools::resolve_atom_count(n_atoms, cli.natoms.is_some(), cli.allatoms, total);
    if cli.allatoms {
        println!("Displacing all atoms in input file.");
    } else {
        println!("Number of atoms to displace: {}", n_atoms);
    }

    let mut rng = match cli.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };

    for j in 1..=n_files {
        let output = match displaced_copy(&original, n_atoms, amplitude, &mut rng) {
            Ok(s) => s,
            Err(e) => return tools::fail(e),
        };
        let path = format!("{}{}", cli.output_prefix, j);
        if let Err(e) = io::save_structure(&path, &output) {
            return tools::fail(e);
        }
        log::debug!("wrote {}", path);
    }

    println!(
        "Output written to: {}1 .. {}{}",
        cli.output_prefix, cli.output_prefix, n_files
    );
    ExitCode::SUCCESS
}
