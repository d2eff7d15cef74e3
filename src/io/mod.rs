// src/io/mod.rs
pub mod poscar;

use crate::error::FailResult;
use crate::model::Structure;
use std::path::Path;

/// Read a structure file. Only the POSCAR layout is understood, whatever the
/// file name.
pub fn load_structure(path: impl AsRef<Path>) -> FailResult<Structure> {
    poscar::parse(path)
}

/// Write `structure` in the POSCAR layout. An existing file is overwritten
/// with a warning.
pub fn save_structure(path: impl AsRef<Path>, structure: &Structure) -> FailResult<()> {
    poscar::write(path, structure)
}
