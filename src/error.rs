// src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type FailResult<T> = Result<T, StructureError>;

/// Everything that can go wrong while reading, writing or transforming a structure.
#[derive(Debug, Error)]
pub enum StructureError {
  #[error("cannot access file {path:?}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("unexpected end of file at line {line}")]
  UnexpectedEof { line: usize },

  #[error("line {line}: cannot parse {token:?} as a number")]
  InvalidNumber { line: usize, token: String },

  #[error("line {line}: missing {what}")]
  MissingField { line: usize, what: &'static str },

  #[error("{labels} element labels but {counts} atom counts")]
  SpeciesCountMismatch { labels: usize, counts: usize },

  #[error("selective dynamics is not supported yet")]
  SelectiveDynamicsUnsupported,

  #[error("species counts add up to {expected} atoms but {found} positions are present")]
  AtomCountMismatch { expected: usize, found: usize },

  #[error("singular matrix (determinant {determinant:e})")]
  SingularMatrix { determinant: f64 },

  #[error("displacement amplitude is negative: {0}")]
  NegativeAmplitude(f64),
}

impl StructureError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    StructureError::Io { path: path.into(), source }
  }
}

/// Failures of the symmetry adapter. A missing result is always one of these,
/// never a partially built structure.
#[derive(Debug, Error)]
pub enum SymmetryError {
  #[error("symmetry tolerance must be positive, got {0}")]
  InvalidTolerance(f64),

  #[error(transparent)]
  Structure(#[from] StructureError),

  #[error("symmetry search failed: {0}")]
  DatasetUnavailable(String),

  #[error("cell reduction returned no atoms")]
  ReductionFailed,

  #[error("symmetry search returned unknown type code {0}")]
  UnknownTypeCode(i32),
}
