// src/physics/operations/conversion.rs

use crate::error::SymmetryError;
use crate::model::symmetry::{marshal, rebuild, search, MarshaledCell};
use crate::model::Structure;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellType {
  Primitive,
  Conventional,
}

impl CellType {
  fn comment_suffix(self) -> &'static str {
    match self {
      CellType::Primitive => "primitive cell",
      CellType::Conventional => "standardized cell",
    }
  }

  // The primitive cell comes out in the standard orientation; the
  // conventional cell keeps the orientation of the input lattice.
  fn rotate_basis(self) -> bool {
    match self {
      CellType::Primitive => true,
      CellType::Conventional => false,
    }
  }
}

/// Reduce or standardize `structure`, returning a new structure in Direct
/// coordinates. The input is left untouched.
pub fn convert_structure(
  structure: &Structure,
  cell_type: CellType,
  symprec: f64,
) -> Result<Structure, SymmetryError> {
  let marshaled = marshal(structure)?;
  convert_marshaled(structure, &marshaled, cell_type, symprec)
}

/// [`convert_structure`] on a cell already marshaled from `structure`, so a
/// caller running several symmetry steps marshals only once.
pub fn convert_marshaled(
  structure: &Structure,
  marshaled: &MarshaledCell,
  cell_type: CellType,
  symprec: f64,
) -> Result<Structure, SymmetryError> {
  let dataset = search(marshaled, symprec, cell_type.rotate_basis())?;

  // Pick the requested cell and rebuild the species blocks
  let cell = match cell_type {
    CellType::Primitive => &dataset.prim_std_cell,
    CellType::Conventional => &dataset.std_cell,
  };
  let comment = format!("{} {}", structure.comment, cell_type.comment_suffix());
  let out = rebuild(comment, structure.scale, cell, &marshaled.codes)?;

  log::debug!(
    "{:?} cell: {} -> {} atoms",
    cell_type,
    structure.total_atoms(),
    out.total_atoms()
  );
  Ok(out)
}

pub fn primitive_cell(structure: &Structure, symprec: f64) -> Result<Structure, SymmetryError> {
  convert_structure(structure, CellType::Primitive, symprec)
}

pub fn conventional_cell(structure: &Structure, symprec: f64) -> Result<Structure, SymmetryError> {
  convert_structure(structure, CellType::Conventional, symprec)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::poscar;
  use crate::model::Species;
  use crate::physics::analysis::symmetry::analyze;

  const NACL: &str = include_str!("../../../tests/data/NaCl_conv_fcc.poscar");
  const A: f64 = 5.5881264354399347;

  fn volume(s: &Structure) -> f64 {
    s.lattice_matrix().determinant().abs()
  }

  #[test]
  fn test_primitive_nacl() {
    let conv = poscar::parse_str(NACL).unwrap();
    let prim = primitive_cell(&conv, 1e-5).unwrap();

    assert_eq!(prim.comment, "Na4 Cl4 primitive cell");
    assert!(prim.is_direct());
    assert_eq!(prim.total_atoms(), 2);
    assert_eq!(prim.species, vec![Species::new("Na", 1), Species::new("Cl", 1)]);
    assert!((volume(&prim) - A.powi(3) / 4.0).abs() < 1e-6);

    // the source is untouched
    assert_eq!(conv, poscar::parse_str(NACL).unwrap());
  }

  #[test]
  fn test_conventional_from_primitive() {
    let conv = poscar::parse_str(NACL).unwrap();
    let prim = primitive_cell(&conv, 1e-5).unwrap();
    let back = conventional_cell(&prim, 1e-5).unwrap();

    assert!(back.comment.ends_with("standardized cell"));
    assert_eq!(back.total_atoms(), 8);
    assert_eq!(back.species, vec![Species::new("Na", 4), Species::new("Cl", 4)]);
    assert!((volume(&back) - A.powi(3)).abs() < 1e-6);
    assert_eq!(analyze(&back, 1e-5).unwrap().number, 225);
  }

  #[test]
  fn test_conventional_keeps_orientation() {
    // the cubic cell turned by 30 degrees about z
    let (sin, cos) = 30f64.to_radians().sin_cos();
    let mut s = poscar::parse_str(NACL).unwrap();
    s.lattice = [[A * cos, A * sin, 0.0], [-A * sin, A * cos, 0.0], [0.0, 0.0, A]];

    let conv = conventional_cell(&s, 1e-5).unwrap();
    assert_eq!(conv.total_atoms(), 8);
    // every output lattice vector is parallel to one of the input ones
    for out in &conv.lattice {
      let parallel = s.lattice.iter().any(|v| {
        let dot = out[0] * v[0] + out[1] * v[1] + out[2] * v[2];
        (dot.abs() - A * A).abs() < 1e-6
      });
      assert!(parallel, "{:?} is not along any input axis", out);
    }
    // none of them lies along x
    assert!(conv.lattice.iter().all(|v| v[1].abs() > 1e-3 || v[0].abs() < 1e-3));
  }

  #[test]
  fn test_shared_marshaling() {
    let mut s = poscar::parse_str(NACL).unwrap();
    s.species = vec![Species::new("Na", 4), Species::new("X", 4)];
    let marshaled = marshal(&s).unwrap();

    let prim = convert_marshaled(&s, &marshaled, CellType::Primitive, 1e-5).unwrap();
    assert_eq!(prim, primitive_cell(&s, 1e-5).unwrap());
    assert_eq!(prim.species, vec![Species::new("Na", 1), Species::new("X", 1)]);
  }

  #[test]
  fn test_result_serializes() {
    let conv = poscar::parse_str(NACL).unwrap();
    let prim = primitive_cell(&conv, 1e-5).unwrap();
    let text = poscar::to_string(&prim).unwrap();
    let reread = poscar::parse_str(&text).unwrap();
    assert_eq!(reread.species, prim.species);
  }

  #[test]
  fn test_invalid_tolerance() {
    let conv = poscar::parse_str(NACL).unwrap();
    assert!(matches!(
      conventional_cell(&conv, -1.0),
      Err(SymmetryError::InvalidTolerance(_))
    ));
  }

  #[test]
  fn test_singular_lattice() {
    let mut s = poscar::parse_str(NACL).unwrap();
    s.to_cartesian();
    s.lattice[2] = s.lattice[0];
    assert!(matches!(primitive_cell(&s, 1e-5), Err(SymmetryError::Structure(_))));
  }
}
