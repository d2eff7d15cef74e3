// src/physics/operations/displacement.rs

use crate::error::{FailResult, StructureError};
use crate::model::structure::Structure;
use crate::utils::linalg::{cart_to_frac_operator, norm};
use crate::utils::random::RandomSource;

/// Below this norm a random direction is considered degenerate.
const DIRECTION_EPSILON: f64 = 1e-12;

/// A random Cartesian vector uniformly distributed inside the ball of radius
/// `amplitude`.
///
/// Returns `None` when the direction draw is degenerate; that atom is then
/// left where it is.
pub fn random_displacement(amplitude: f64, rng: &mut RandomSource) -> Option<[f64; 3]> {
    let d = [
        rng.uniform(-1.0, 1.0),
        rng.uniform(-1.0, 1.0),
        rng.uniform(-1.0, 1.0),
    ];
    let len = norm(d);
    if len < DIRECTION_EPSILON {
        return None;
    }

    // cbrt keeps the radius uniform by volume
    let r = amplitude * rng.uniform(0.0, 1.0).cbrt();
    Some([d[0] / len * r, d[1] / len * r, d[2] / len * r])
}

/// Displace `n_atoms` distinct atoms, picked at random, by at most
/// `amplitude` (Cartesian length units). Returns how many atoms moved.
///
/// The coordinate mode is preserved. In Direct mode the Cartesian vector is
/// mapped to fractional space, so atoms not chosen keep their exact values.
/// `n_atoms` larger than the atom count displaces every atom.
pub fn displace_atoms(
    structure: &mut Structure,
    n_atoms: usize,
    amplitude: f64,
    rng: &mut RandomSource,
) -> FailResult<usize> {
    if amplitude.is_nan() || amplitude < 0.0 {
        return Err(StructureError::NegativeAmplitude(amplitude));
    }

    let to_frac = if structure.is_direct() {
        Some(cart_to_frac_operator(&structure.lattice_matrix())?)
    } else {
        None
    };

    let mut order: Vec<usize> = (0..structure.positions.len()).collect();
    rng.shuffle(&mut order);

    let mut moved = 0;
    for &i in order.iter().take(n_atoms) {
        let Some(delta) = random_displacement(amplitude, rng) else {
            log::debug!("Degenerate direction for atom {}, skipped", i);
            continue;
        };
        let delta = match &to_frac {
            Some(op) => op.multiply(delta),
            None => delta,
        };

        let pos = &mut structure.positions[i];
        for k in 0..3 {
            pos[k] += delta[k];
        }
        moved += 1;
    }

    log::debug!("Displaced {} of {} atoms (amp = {})", moved, structure.total_atoms(), amplitude);
    Ok(moved)
}

/// Like [`displace_atoms`] but on a copy; the source is untouched.
pub fn displaced_copy(
    structure: &Structure,
    n_atoms: usize,
    amplitude: f64,
    rng: &mut RandomSource,
) -> FailResult<Structure> {
    let mut copy = structure.clone();
    displace_atoms(&mut copy, n_atoms, amplitude, rng)?;
    Ok(copy)
}
