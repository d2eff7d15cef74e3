// src/utils/report.rs

use crate::model::structure::Structure;
use crate::physics::analysis::symmetry::SymmetryDataset;
use std::fmt::Write;

/// Text report of a symmetry dataset. Operations and Wyckoff letters are
/// only listed when asked for.
pub fn symmetry_summary(dataset: &SymmetryDataset, wyckoff: bool, operations: bool) -> String {
    let mut out = String::new();
    out.push_str("=== Symmetry Information ===\n");
    out.push_str(&format!("Space group number: {}\n", dataset.number));
    out.push_str(&format!("International symbol: {}\n", dataset.international_symbol));
    out.push_str(&format!("Hall symbol: {}\n", dataset.hall_symbol));
    out.push_str(&format!("Point group: {}\n", dataset.point_group));
    out.push_str(&format!("Crystal system: {}\n", dataset.crystal_system));

    out.push_str(&format!(
        "\nNumber of symmetry operations: {}\n",
        dataset.operations.len()
    ));
    if operations {
        out.push_str(&symmetry_operations(dataset));
    }

    out.push_str(&format!(
        "\nNumber of Wyckoff positions (irreducible atoms): {}\n",
        dataset.irreducible_atoms()
    ));
    if wyckoff {
        out.push_str("Wyckoff letters: ");
        for letter in &dataset.wyckoffs {
            out.push(*letter);
            out.push(' ');
        }
        out.push('\n');
    }

    out
}

/// One block per operation: the integer rotation then the translation.
pub fn symmetry_operations(dataset: &SymmetryDataset) -> String {
    let mut out = String::new();
    for (i, op) in dataset.operations.iter().enumerate() {
        let _ = writeln!(out, "Operation {}:", i + 1);
        out.push_str("  Rotation matrix:\n");
        for row in &op.rotation {
            let _ = writeln!(out, "   {:>2} {:>2} {:>2}", row[0], row[1], row[2]);
        }
        let t = op.translation;
        let _ = writeln!(out, "  Translation vector: {} {} {}", t[0], t[1], t[2]);
    }
    out
}

/// Short description of a structure, used by the tools in verbose mode.
pub fn structure_summary(structure: &Structure, filename: &str) -> String {
    let formula_str: String = structure
        .species
        .iter()
        .map(|s| format!("{}{}", s.label, s.count))
        .collect::<Vec<_>>()
        .join(" ");

    let mode = if structure.is_direct() { "Direct" } else { "Cartesian" };

    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));
    out.push_str(&format!("Comment: {}\n", structure.comment));
    out.push_str(&format!("Formula: {}\n", formula_str));
    out.push_str(&format!("Coordinates: {}\n", mode));
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!(
        "{:<8} {:<8} {:<10} {:<10} {:<10}\n",
        "Index", "Element", "X", "Y", "Z"
    ));
    out.push_str("--------------------------------------------------\n");

    for (i, pos) in structure.positions.iter().take(20).enumerate() {
        let label = structure.label_of(i).unwrap_or("?");
        out.push_str(&format!(
            "{:<8} {:<8} {:<10.4} {:<10.4} {:<10.4}\n",
            i, label, pos[0], pos[1], pos[2]
        ));
    }

    if structure.positions.len() > 20 {
        out.push_str(&format!("... and {} more atoms.\n", structure.positions.len() - 20));
    }

    out
}
