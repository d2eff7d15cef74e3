// src/model/symmetry.rs
//
// Marshaling between `Structure` and moyo's `Cell`.

use crate::error::SymmetryError;
use crate::model::elements::is_placeholder;
use crate::model::{CoordinateMode, Species, Structure};
use crate::utils::linalg::Mat3;
use moyo::base::{AngleTolerance, Cell, Lattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::Vector3;

/// Species label <-> integer type code, assigned from 1 in order of first
/// appearance. A repeated label reuses its code.
///
/// Built fresh for every symmetry call; element order differs between inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCodes {
  labels: Vec<String>,
}

impl TypeCodes {
  pub fn from_species(species: &[Species]) -> Self {
    let mut labels: Vec<String> = Vec::new();
    for s in species {
      if !labels.contains(&s.label) {
        labels.push(s.label.clone());
      }
    }
    Self { labels }
  }

  pub fn code_of(&self, label: &str) -> Option<i32> {
    self.labels.iter().position(|l| l == label).map(|i| i as i32 + 1)
  }

  pub fn label_of(&self, code: i32) -> Option<&str> {
    if code < 1 {
      return None;
    }
    self.labels.get(code as usize - 1).map(String::as_str)
  }

  /// Labels in code order (code 1 first).
  pub fn labels(&self) -> &[String] {
    &self.labels
  }
}

/// The flat fractional form handed to the symmetry search.
#[derive(Debug, Clone)]
pub struct MarshaledCell {
  pub lattice: Mat3,
  pub positions: Vec<[f64; 3]>,
  pub types: Vec<i32>,
  pub codes: TypeCodes,
}

impl MarshaledCell {
  pub fn num_atoms(&self) -> usize {
    self.positions.len()
  }

  pub fn to_moyo(&self) -> Cell {
    // moyo takes the lattice vectors as rows
    let lattice = Lattice::new(*self.lattice.as_nalgebra());
    let positions = self.positions.iter().map(|p| Vector3::new(p[0], p[1], p[2])).collect();
    Cell::new(lattice, positions, self.types.clone())
  }
}

/// Copy `structure` into fractional coordinates and assign type codes.
pub fn marshal(structure: &Structure) -> Result<MarshaledCell, SymmetryError> {
  structure.check_invariants()?;
  warn_placeholders(structure);

  let mut direct = structure.clone();
  direct.to_direct()?;

  let codes = TypeCodes::from_species(&direct.species);
  let mut types = Vec::with_capacity(direct.positions.len());
  for (label, range) in direct.species_ranges() {
    // every label was registered above
    let code = codes.code_of(label).unwrap_or_default();
    types.extend(std::iter::repeat(code).take(range.len()));
  }

  Ok(MarshaledCell {
    lattice: direct.lattice_matrix(),
    positions: direct.positions,
    types,
    codes,
  })
}

/// Placeholder labels present in the structure. Each one is reported with a
/// warning, since the symmetry search counts them as ordinary atoms.
pub fn warn_placeholders(structure: &Structure) -> Vec<String> {
  let mut found: Vec<String> = Vec::new();
  for s in &structure.species {
    if is_placeholder(&s.label) && !found.contains(&s.label) {
      log::warn!(
        "Empty sphere detected ({}). The symmetry search treats it as a real atom and symmetry may change.",
        s.label
      );
      found.push(s.label.clone());
    }
  }
  found
}

/// Run moyo on the marshaled cell.
///
/// With `rotate_basis` the standardized cells are rotated into the
/// conventional orientation (a along x, b in the xy plane); without it they
/// keep the orientation of the input lattice.
pub fn search(cell: &MarshaledCell, symprec: f64, rotate_basis: bool) -> Result<MoyoDataset, SymmetryError> {
  if !(symprec.is_finite() && symprec > 0.0) {
    return Err(SymmetryError::InvalidTolerance(symprec));
  }
  if cell.num_atoms() == 0 {
    return Err(SymmetryError::DatasetUnavailable("structure has no atoms".to_string()));
  }

  log::debug!("Symmetry search on {} atoms, symprec = {:e}", cell.num_atoms(), symprec);
  MoyoDataset::new(&cell.to_moyo(), symprec, AngleTolerance::Default, Setting::Spglib, rotate_basis)
    .map_err(|e| SymmetryError::DatasetUnavailable(format!("{:?}", e)))
}

/// Build a new structure from a cell returned by the symmetry search.
///
/// Atoms are regrouped into contiguous species blocks following the type code
/// order; species absent from the result are dropped.
pub fn rebuild(
  comment: String,
  scale: f64,
  cell: &Cell,
  codes: &TypeCodes,
) -> Result<Structure, SymmetryError> {
  if cell.positions.is_empty() || cell.positions.len() != cell.numbers.len() {
    return Err(SymmetryError::ReductionFailed);
  }
  if let Some(&bad) = cell.numbers.iter().find(|&&n| codes.label_of(n).is_none()) {
    return Err(SymmetryError::UnknownTypeCode(bad));
  }

  let mut species = Vec::new();
  let mut positions = Vec::with_capacity(cell.positions.len());
  for (i, label) in codes.labels().iter().enumerate() {
    let code = i as i32 + 1;
    let block: Vec<[f64; 3]> = cell
      .positions
      .iter()
      .zip(&cell.numbers)
      .filter(|(_, n)| **n == code)
      .map(|(p, _)| [p.x, p.y, p.z])
      .collect();
    if block.is_empty() {
      continue;
    }
    species.push(Species::new(label.clone(), block.len()));
    positions.extend(block);
  }

  let lattice = Mat3::from_column_basis(&cell.lattice.basis).to_rows();
  let mut structure = Structure::new(comment, lattice, species, CoordinateMode::Direct, positions)?;
  structure.scale = scale;
  Ok(structure)
}
