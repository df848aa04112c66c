use super::coulomb::self_interaction;
use super::{
    Descriptor, DescriptorBuilder, DescriptorError, DescriptorOptions, check_dimensions,
    pad_square,
};
use crate::core::models::molecule::Molecule;
use crate::core::tables::ElementTable;
use crate::core::utils::geometry::{COINCIDENCE_TOLERANCE, distance_matrix, find_coincident};
use nalgebra::{DMatrix, Point3};

/// Parameters of the Lennard-Jones-shaped pair term `4ε((σ/r)^12 − (σ/r)^6)`.
///
/// This is a structural descriptor; the parameters are not fitted to any force field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJonesParams {
    pub sigma: f64,
    pub epsilon: f64,
    /// Replaces `0.5·Z^2.4` on the diagonal when set.
    pub diagonal_override: Option<f64>,
}

impl Default for LennardJonesParams {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            epsilon: 1.0,
            diagonal_override: None,
        }
    }
}

impl LennardJonesParams {
    #[inline]
    fn pair_term(&self, r: f64) -> f64 {
        let r2 = (self.sigma * self.sigma) / (r * r);
        let r6 = r2 * r2 * r2;
        let r12 = r6 * r6;
        4.0 * self.epsilon * (r12 - r6)
    }

    #[inline]
    fn diagonal(&self, charge: f64) -> f64 {
        self.diagonal_override
            .unwrap_or_else(|| self_interaction(charge))
    }
}

pub fn lennard_jones_matrix(
    coordinates: &[Point3<f64>],
    charges: &[f64],
    params: &LennardJonesParams,
    options: &DescriptorOptions,
) -> Result<Descriptor, DescriptorError> {
    let n = check_dimensions(coordinates, charges)?;
    let size = options.resolve_size(n)?;
    if let Some((i, j)) = find_coincident(coordinates, COINCIDENCE_TOLERANCE) {
        return Err(DescriptorError::CoincidentAtoms { i, j });
    }
    let conversion_rate = options.conversion_rate();
    let distances = distance_matrix(coordinates);

    let mut block = DMatrix::zeros(n, n);
    for i in 0..n {
        block[(i, i)] = params.diagonal(charges[i]);
        for j in (i + 1)..n {
            let value = params.pair_term(distances[(i, j)] / conversion_rate);
            block[(i, j)] = value;
            block[(j, i)] = value;
        }
    }

    Ok(options.finalize(pad_square(&block, size), n))
}

#[derive(Debug, Clone)]
pub struct LennardJonesMatrix<'a> {
    elements: &'a ElementTable,
    params: LennardJonesParams,
    options: DescriptorOptions,
}

impl<'a> LennardJonesMatrix<'a> {
    pub fn new(
        elements: &'a ElementTable,
        params: LennardJonesParams,
        options: DescriptorOptions,
    ) -> Self {
        Self {
            elements,
            params,
            options,
        }
    }
}

impl DescriptorBuilder for LennardJonesMatrix<'_> {
    fn identifier(&self) -> &'static str {
        "LJM"
    }

    fn build(&self, molecule: &Molecule) -> Result<Descriptor, DescriptorError> {
        let charges = molecule.nuclear_charges(self.elements)?;
        lennard_jones_matrix(
            &molecule.positions(),
            &charges,
            &self.params,
            &self.options,
        )
    }
}
