// src/physics/analysis/symmetry.rs

use crate::error::SymmetryError;
use crate::model::symmetry::{marshal, search, MarshaledCell};
use crate::model::Structure;
use moyo::data::hall_symbol_entry;
use std::collections::BTreeSet;

// --- Structs for Analysis Results ---

/// One space-group operation in fractional coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOperation {
    pub rotation: [[i32; 3]; 3],
    pub translation: [f64; 3],
}

/// Everything the symmetry search reports about a structure.
#[derive(Debug, Clone)]
pub struct SymmetryDataset {
    pub number: i32,
    pub international_symbol: String,
    pub hall_number: i32,
    pub hall_symbol: String,
    pub point_group: &'static str,
    pub crystal_system: &'static str,
    /// For every atom, the index of a representative of its orbit.
    pub equivalent_atoms: Vec<usize>,
    pub wyckoffs: Vec<char>,
    pub operations: Vec<SymmetryOperation>,
}

impl SymmetryDataset {
    pub fn num_atoms(&self) -> usize {
        self.equivalent_atoms.len()
    }

    /// Number of symmetry-distinct sites.
    pub fn irreducible_atoms(&self) -> usize {
        self.equivalent_atoms.iter().collect::<BTreeSet<_>>().len()
    }

    /// Wyckoff letter of atom `i` as an index: 'a' -> 0, 'b' -> 1, ...
    pub fn wyckoff_index(&self, i: usize) -> Option<usize> {
        let c = *self.wyckoffs.get(i)?;
        match c {
            'a'..='z' => Some(c as usize - 'a' as usize),
            // the 27th letter in the tables
            'A' => Some(26),
            _ => None,
        }
    }
}

// =========================================================================
// ANALYSIS: Read-only check of the Space Group
// =========================================================================
pub fn analyze(structure: &Structure, symprec: f64) -> Result<SymmetryDataset, SymmetryError> {
    analyze_marshaled(&marshal(structure)?, symprec)
}

/// [`analyze`] on an already marshaled cell.
pub fn analyze_marshaled(cell: &MarshaledCell, symprec: f64) -> Result<SymmetryDataset, SymmetryError> {
    let dataset = search(cell, symprec, true)?;

    let hall_symbol = hall_symbol_entry(dataset.hall_number)
        .map(|entry| entry.hall_symbol.to_string())
        .unwrap_or_default();

    let operations = dataset
        .operations
        .iter()
        .map(|op| {
            let r = &op.rotation;
            let t = &op.translation;
            SymmetryOperation {
                rotation: [
                    [r[(0, 0)], r[(0, 1)], r[(0, 2)]],
                    [r[(1, 0)], r[(1, 1)], r[(1, 2)]],
                    [r[(2, 0)], r[(2, 1)], r[(2, 2)]],
                ],
                translation: [t[0], t[1], t[2]],
            }
        })
        .collect();

    Ok(SymmetryDataset {
        number: dataset.number,
        international_symbol: dataset.hm_symbol.clone(),
        hall_number: dataset.hall_number,
        hall_symbol,
        point_group: point_group_symbol(dataset.number),
        crystal_system: crystal_system(dataset.number),
        equivalent_atoms: dataset.orbits.clone(),
        wyckoffs: dataset.wyckoffs.clone(),
        operations,
    })
}

pub fn crystal_system(number: i32) -> &'static str {
    match number {
        1..=2 => "Triclinic",
        3..=15 => "Monoclinic",
        16..=74 => "Orthorhombic",
        75..=142 => "Tetragonal",
        143..=167 => "Trigonal",
        168..=194 => "Hexagonal",
        195..=230 => "Cubic",
        _ => "Unknown",
    }
}

/// Hermann-Mauguin symbol of the crystallographic point group.
pub fn point_group_symbol(number: i32) -> &'static str {
    match number {
        1 => "1",
        2 => "-1",
        3..=5 => "2",
        6..=9 => "m",
        10..=15 => "2/m",
        16..=24 => "222",
        25..=46 => "mm2",
        47..=74 => "mmm",
        75..=80 => "4",
        81..=82 => "-4",
        83..=88 => "4/m",
        89..=98 => "422",
        99..=110 => "4mm",
        111..=122 => "-42m",
        123..=142 => "4/mmm",
        143..=146 => "3",
        147..=148 => "-3",
        149..=155 => "32",
        156..=161 => "3m",
        162..=167 => "-3m",
        168..=173 => "6",
        174 => "-6",
        175..=176 => "6/m",
        177..=182 => "622",
        183..=186 => "6mm",
        187..=190 => "-6m2",
        191..=194 => "6/mmm",
        195..=199 => "23",
        200..=206 => "m-3",
        207..=214 => "432",
        215..=220 => "-43m",
        221..=230 => "m-3m",
        _ => "?",
    }
}
