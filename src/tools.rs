// src/tools.rs
//
// Plumbing shared by the command-line front-ends.

use crate::config::Config;
use crate::utils::logger;
use clap::Parser;
use log::LevelFilter;
use std::fmt::Display;
use std::process::ExitCode;
use thiserror::Error;

/// Bad command-line values, caught before any structure is touched.
#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
  #[error("symprec must be positive (got {0})")]
  NonPositiveTolerance(f64),
  #[error("number of atoms to displace must be positive (got {0})")]
  NonPositiveAtoms(i64),
  #[error("number of output files must be positive (got {0})")]
  NonPositiveFiles(i64),
  #[error("too many output files requested ({requested}, at most {max})")]
  TooManyFiles { requested: i64, max: usize },
  #[error("displacement amplitude cannot be negative (got {0})")]
  NegativeAmplitude(f64),
}

/// Parse the command line. Help and version requests come back as a
/// successful exit code; everything else clap rejects is a failure.
pub fn parse_args<P: Parser>() -> Result<P, ExitCode> {
  P::try_parse().map_err(|e| {
    let _ = e.print();
    if e.use_stderr() {
      ExitCode::FAILURE
    } else {
      ExitCode::SUCCESS
    }
  })
}

/// Install the console logger and read the user configuration.
pub fn init(verbose: bool) -> Config {
  let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
  // a second init only happens in tests; keep the first logger
  let _ = logger::init(level);

  let (config, status) = Config::load();
  if status.starts_with("Error") {
    log::warn!("{}", status);
  } else {
    log::debug!("{}", status);
  }
  config
}

pub fn validate_symprec(symprec: f64, config: &Config) -> Result<f64, UsageError> {
  if !(symprec.is_finite() && symprec > 0.0) {
    return Err(UsageError::NonPositiveTolerance(symprec));
  }
  if symprec > config.symprec_warning {
    log::warn!(
      "symprec is too high! Consider using default value {:e}.",
      Config::default().symprec
    );
  }
  Ok(symprec)
}

/// Check the displacement tool's numbers. Returns them as unsigned counts.
pub fn validate_displacement(
  n_files: i64,
  n_atoms: i64,
  amplitude: f64,
  config: &Config,
) -> Result<(usize, usize), UsageError> {
  if n_atoms <= 0 {
    return Err(UsageError::NonPositiveAtoms(n_atoms));
  }
  if n_files <= 0 {
    return Err(UsageError::NonPositiveFiles(n_files));
  }
  if n_files as u64 > config.max_displaced_files as u64 {
    return Err(UsageError::TooManyFiles { requested: n_files, max: config.max_displaced_files });
  }
  if amplitude.is_nan() || amplitude < 0.0 {
    return Err(UsageError::NegativeAmplitude(amplitude));
  }
  if amplitude > config.amplitude_warning {
    log::warn!(
      "amplitude {} is larger than {}; the displaced structures may be unphysical.",
      amplitude,
      config.amplitude_warning
    );
  }
  Ok((n_files as usize, n_atoms as usize))
}

/// How many atoms to displace out of `total`.
pub fn resolve_atom_count(requested: usize, requested_explicitly: bool, all_atoms: bool, total: usize) -> usize {
  if all_atoms {
    if requested_explicitly {
      log::info!("--allatoms given, ignoring --natoms {}.", requested);
    }
    return total;
  }
  if requested > total {
    log::warn!(
      "requested {} atoms but the structure only has {}; displacing all of them.",
      requested,
      total
    );
    return total;
  }
  requested
}

/// Log `err` and hand back the failure exit code.
pub fn fail(err: impl Display) -> ExitCode {
  log::error!("{}", err);
  ExitCode::FAILURE
}
