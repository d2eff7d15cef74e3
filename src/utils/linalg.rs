// src/utils/linalg.rs

use crate::error::{FailResult, StructureError};
use nalgebra::{Matrix3, Vector3};

/// Determinants smaller than this (in magnitude) are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// A 3x3 matrix. Lattices built with [`Mat3::from_rows`] keep one lattice
/// vector per row: `[[ax, ay, az], [bx, by, bz], [cx, cy, cz]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(pub Matrix3<f64>);

impl Mat3 {
  pub fn identity() -> Self {
    Mat3(Matrix3::identity())
  }

  pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
    Mat3(Matrix3::from_row_slice(&[
      rows[0][0], rows[0][1], rows[0][2],
      rows[1][0], rows[1][1], rows[1][2],
      rows[2][0], rows[2][1], rows[2][2],
    ]))
  }

  pub fn to_rows(&self) -> [[f64; 3]; 3] {
    let m = &self.0;
    [
      [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
      [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
      [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
  }

  /// Matrix-vector product `M × v`.
  pub fn multiply(&self, v: [f64; 3]) -> [f64; 3] {
    let out = self.0 * Vector3::from(v);
    [out.x, out.y, out.z]
  }

  pub fn determinant(&self) -> f64 {
    self.0.determinant()
  }

  /// # Errors
  /// [`StructureError::SingularMatrix`] when `|det| < 1e-12`.
  pub fn inverse(&self) -> FailResult<Mat3> {
    let det = self.determinant();
    if det.abs() < SINGULAR_EPSILON {
      return Err(StructureError::SingularMatrix { determinant: det });
    }
    self
      .0
      .try_inverse()
      .map(Mat3)
      .ok_or(StructureError::SingularMatrix { determinant: det })
  }

  pub fn transpose(&self) -> Mat3 {
    Mat3(self.0.transpose())
  }

  /// The wrapped nalgebra matrix.
  pub fn as_nalgebra(&self) -> &Matrix3<f64> {
    &self.0
  }

  /// Build from a matrix whose columns are the lattice vectors.
  pub fn from_column_basis(basis: &Matrix3<f64>) -> Mat3 {
    Mat3(basis.transpose())
  }
}

impl From<[[f64; 3]; 3]> for Mat3 {
  fn from(rows: [[f64; 3]; 3]) -> Self {
    Mat3::from_rows(rows)
  }
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: &Mat3) -> [f64; 3] {
  lattice.transpose().multiply(frac)
}

/// Convert Cartesian coordinates to fractional using lattice matrix
///
/// # Formula
/// ```text
/// Fractional = (Lattice^T)^-1 × Cartesian
/// ```
///
/// Converting many vectors against one lattice should use
/// [`cart_to_frac_operator`] once and multiply by the result.
pub fn cart_to_frac(cart: [f64; 3], lattice: &Mat3) -> FailResult<[f64; 3]> {
  Ok(cart_to_frac_operator(lattice)?.multiply(cart))
}

/// `(Lattice^T)^-1`, the matrix taking Cartesian vectors to fractional ones.
pub fn cart_to_frac_operator(lattice: &Mat3) -> FailResult<Mat3> {
  Ok(lattice.inverse()?.transpose())
}

pub fn norm(v: [f64; 3]) -> f64 {
  Vector3::from(v).norm()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_mat_close(a: &Matrix3<f64>, b: &Matrix3<f64>, tol: f64) {
    for i in 0..3 {
      for j in 0..3 {
        assert!((a[(i, j)] - b[(i, j)]).abs() < tol, "[{}][{}]: {} vs {}", i, j, a[(i, j)], b[(i, j)]);
      }
    }
  }

  #[test]
  fn test_determinant() {
    assert_eq!(Mat3::identity().determinant(), 1.0);

    let m = Mat3::from_rows([[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 1.0]]);
    // 2*(3-2) - 0 + 1*(1-3)
    assert!((m.determinant() - 0.0).abs() < 1e-14);

    let m = Mat3::from_rows([[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]]);
    assert!((m.determinant() - 4.0 * 3.46 * 5.0).abs() < 1e-12);
  }

  #[test]
  fn test_inverse() {
    let m = Mat3::from_rows([[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.5, -1.0, 5.0]]);
    let inv = m.inverse().unwrap();
    assert_mat_close(&(m.0 * inv.0), &Matrix3::identity(), 1e-12);
    assert_mat_close(&(inv.0 * m.0), &Matrix3::identity(), 1e-12);
  }

  #[test]
  fn test_singular_inverse() {
    let m = Mat3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
    match m.inverse() {
      Err(StructureError::SingularMatrix { determinant }) => assert!(determinant.abs() < SINGULAR_EPSILON),
      other => panic!("expected singular matrix, got {:?}", other),
    }

    // tiny but nonzero determinants are still singular
    let m = Mat3::from_rows([[1e-5, 0.0, 0.0], [0.0, 1e-5, 0.0], [0.0, 0.0, 1e-5]]);
    assert!(m.inverse().is_err());
  }

  #[test]
  fn test_multiply() {
    let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
    assert_eq!(m.multiply([1.0, 0.0, -1.0]), [-2.0, -2.0, -2.0]);
    assert_eq!(m.transpose().multiply([1.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
  }

  #[test]
  fn test_row_layout() {
    let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
    let m = Mat3::from_rows(rows);
    assert_eq!(m.as_nalgebra()[(0, 1)], 2.0);
    assert_eq!(m.as_nalgebra()[(2, 0)], 7.0);
    assert_eq!(m.to_rows(), rows);
    // columns of the transpose are the rows of m
    assert_eq!(Mat3::from_column_basis(&m.0.transpose()), m);
  }

  #[test]
  fn test_norm() {
    assert!((norm([3.0, 4.0, 12.0]) - 13.0).abs() < 1e-14);
    assert_eq!(norm([0.0; 3]), 0.0);
  }

  #[test]
  fn test_cubic_lattice() {
    // Simple cubic lattice 5.0 Å
    let lattice = Mat3::from_rows([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);

    let cart = frac_to_cart([0.5, 0.5, 0.5], &lattice);

    assert!((cart[0] - 2.5).abs() < 1e-10);
    assert!((cart[1] - 2.5).abs() < 1e-10);
    assert!((cart[2] - 2.5).abs() < 1e-10);
  }

  #[test]
  fn test_roundtrip() {
    // Non-orthogonal lattice
    let lattice = Mat3::from_rows([[4.0, 0.0, 0.0], [2.0, 3.46, 0.0], [0.0, 0.0, 5.0]]);

    let frac_orig = [0.333, 0.667, 0.25];
    let cart = frac_to_cart(frac_orig, &lattice);
    // second lattice vector contributes along x
    assert!((cart[0] - (0.333 * 4.0 + 0.667 * 2.0)).abs() < 1e-12);

    let frac_back = cart_to_frac(cart, &lattice).unwrap();

    assert!((frac_back[0] - frac_orig[0]).abs() < 1e-10);
    assert!((frac_back[1] - frac_orig[1]).abs() < 1e-10);
    assert!((frac_back[2] - frac_orig[2]).abs() < 1e-10);
  }

  #[test]
  fn test_origin() {
    let lattice = Mat3::from_rows([[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]]);

    let cart = frac_to_cart([0.0, 0.0, 0.0], &lattice);

    assert!((cart[0]).abs() < 1e-10);
    assert!((cart[1]).abs() < 1e-10);
    assert!((cart[2]).abs() < 1e-10);
  }
}
