//! Table-driven bond detection.
//!
//! A pair of atoms is considered bonded when its element-pair key has a window in the
//! [`BondTable`] and the interatomic distance (in Ångström) falls inside it. This is a
//! first-neighbour heuristic tuned for small organic molecules. It does not compute bond
//! orders and will miss or invent bonds for unusual geometries.
//!
//! The result, [`HelpingData`], feeds the bond adjacency descriptor.

use super::{DescriptorError, DescriptorOptions, check_dimensions};
use crate::core::tables::BondTable;
use crate::core::utils::geometry::{COINCIDENCE_TOLERANCE, distance_matrix, find_coincident};
use itertools::Itertools;
use nalgebra::{DMatrix, Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    /// Atom indices, `atoms.0 < atoms.1`.
    pub atoms: (usize, usize),
    /// The bond constant `k` of the matched window.
    pub constant: f64,
    /// `Z_i·Z_j·(r_i − r_j)/r³`.
    pub force: Vector3<f64>,
}

impl Bond {
    pub fn shares_atom_with(&self, other: &Bond) -> bool {
        let (a, b) = self.atoms;
        a == other.atoms.0 || a == other.atoms.1 || b == other.atoms.0 || b == other.atoms.1
    }
}

/// Detected bonds of one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpingData {
    /// S×S first-neighbour mask over atoms, symmetric, false outside the leading n×n block.
    pub adjacency: DMatrix<bool>,
    /// Bonds ordered by `(i, j)` ascending.
    pub bonds: Vec<Bond>,
}

impl HelpingData {
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    pub fn constants(&self) -> Vec<f64> {
        self.bonds.iter().map(|b| b.constant).collect()
    }

    pub fn forces(&self) -> Vec<Vector3<f64>> {
        self.bonds.iter().map(|b| b.force).collect()
    }

    pub fn atom_pairs(&self) -> Vec<(usize, usize)> {
        self.bonds.iter().map(|b| b.atoms).collect()
    }
}

/// Detects bonds in a molecule given its coordinates, nuclear charges and element symbols.
///
/// Windows are matched against Ångström distances. The force magnitude uses the distance
/// expressed in the unit selected by `options.bohr_radius_units`. The atom count is
/// subject to the capacity policy, since the mask is padded to the descriptor size.
pub fn helping_data(
    coordinates: &[Point3<f64>],
    charges: &[f64],
    symbols: &[&str],
    table: &BondTable,
    options: &DescriptorOptions,
) -> Result<HelpingData, DescriptorError> {
    let n = check_dimensions(coordinates, charges)?;
    if symbols.len() != n {
        return Err(DescriptorError::DimensionMismatch {
            what: "element symbols",
            expected: n,
            found: symbols.len(),
        });
    }
    let size = options.resolve_size(n)?;
    if let Some((i, j)) = find_coincident(coordinates, COINCIDENCE_TOLERANCE) {
        return Err(DescriptorError::CoincidentAtoms { i, j });
    }

    let conversion_rate = options.conversion_rate();
    let distances = distance_matrix(coordinates);
    let mut adjacency = DMatrix::from_element(size, size, false);
    let mut bonds = Vec::new();

    for (i, j) in (0..n).tuple_combinations() {
        let Some(window) = table.window(symbols[i], symbols[j]) else {
            continue;
        };
        let d = distances[(i, j)];
        if !window.contains(d) {
            continue;
        }

        let r = d / conversion_rate;
        let direction = (coordinates[i] - coordinates[j]) / d;
        let force = direction * (charges[i] * charges[j] / (r * r));

        adjacency[(i, j)] = true;
        adjacency[(j, i)] = true;
        bonds.push(Bond {
            atoms: (i, j),
            constant: window.k,
            force,
        });
    }

    Ok(HelpingData { adjacency, bonds })
}
