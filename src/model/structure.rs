// src/model/structure.rs

use crate::error::{FailResult, StructureError};
use crate::utils::linalg::{cart_to_frac_operator, Mat3};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateMode {
    /// Fractional coordinates along the lattice vectors.
    Direct,
    /// Absolute coordinates in the units of the lattice vectors.
    Cartesian,
}

/// One block of the species header: a label and how many consecutive
/// positions belong to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub label: String,
    pub count: usize,
}

impl Species {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self { label: label.into(), count }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub comment: String,
    // Stored and written back, never multiplied into the lattice.
    pub scale: f64,
    // Lattice vectors: [a_vec, b_vec, c_vec]
    pub lattice: [[f64; 3]; 3],
    pub species: Vec<Species>,
    pub coordinate_mode: CoordinateMode,
    pub selective_dynamics: bool,
    pub positions: Vec<[f64; 3]>,
}

impl Default for Structure {
    fn default() -> Self {
        Self {
            comment: "System".to_string(),
            scale: 1.0,
            lattice: Mat3::identity().to_rows(),
            species: Vec::new(),
            coordinate_mode: CoordinateMode::Direct,
            selective_dynamics: false,
            positions: Vec::new(),
        }
    }
}

impl Structure {
    /// Build a structure and check that positions match the species counts.
    pub fn new(
        comment: impl Into<String>,
        lattice: [[f64; 3]; 3],
        species: Vec<Species>,
        coordinate_mode: CoordinateMode,
        positions: Vec<[f64; 3]>,
    ) -> FailResult<Self> {
        let structure = Self {
            comment: comment.into(),
            lattice,
            species,
            coordinate_mode,
            positions,
            ..Self::default()
        };
        structure.check_invariants()?;
        Ok(structure)
    }

    /// Sum over the species counts.
    pub fn total_atoms(&self) -> usize {
        self.species.iter().map(|s| s.count).sum()
    }

    pub fn check_invariants(&self) -> FailResult<()> {
        let expected = self.total_atoms();
        if expected != self.positions.len() {
            return Err(StructureError::AtomCountMismatch {
                expected,
                found: self.positions.len(),
            });
        }
        Ok(())
    }

    pub fn is_direct(&self) -> bool {
        self.coordinate_mode == CoordinateMode::Direct
    }

    pub fn lattice_matrix(&self) -> Mat3 {
        Mat3::from_rows(self.lattice)
    }

    /// Position index range of every species block, in header order.
    pub fn species_ranges(&self) -> impl Iterator<Item = (&str, Range<usize>)> + '_ {
        let mut start = 0;
        self.species.iter().map(move |s| {
            let range = start..start + s.count;
            start = range.end;
            (s.label.as_str(), range)
        })
    }

    /// Label of the species block that atom `index` falls in.
    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.species_ranges()
            .find(|(_, range)| range.contains(&index))
            .map(|(label, _)| label)
    }

    /// Fractional -> Cartesian in place. Does nothing when already Cartesian.
    pub fn to_cartesian(&mut self) {
        if !self.is_direct() {
            return;
        }

        // cart = L^T · frac
        let op = self.lattice_matrix().transpose();
        for pos in &mut self.positions {
            *pos = op.multiply(*pos);
        }
        self.coordinate_mode = CoordinateMode::Cartesian;
    }

    /// Cartesian -> fractional in place. Does nothing when already Direct.
    ///
    /// # Errors
    /// [`StructureError::SingularMatrix`] for a degenerate lattice; the
    /// structure is left untouched in that case.
    pub fn to_direct(&mut self) -> FailResult<()> {
        if self.is_direct() {
            return Ok(());
        }

        let op = cart_to_frac_operator(&self.lattice_matrix())?;
        for pos in &mut self.positions {
            *pos = op.multiply(*pos);
        }
        self.coordinate_mode = CoordinateMode::Direct;
        Ok(())
    }
}
