use super::{
    Descriptor, DescriptorBuilder, DescriptorError, DescriptorOptions, check_dimensions,
    pad_square,
};
use crate::core::models::molecule::Molecule;
use crate::core::tables::ElementTable;
use crate::core::utils::geometry::{COINCIDENCE_TOLERANCE, distance_matrix, find_coincident};
use nalgebra::{DMatrix, Point3};

/// Self-interaction term `0.5 * Z^2.4` shared by the Coulomb and Lennard-Jones diagonals.
#[inline]
pub fn self_interaction(charge: f64) -> f64 {
    0.5 * charge.powf(2.4)
}

/// Unpadded n×n Coulomb matrix. Distances are divided by `conversion_rate`.
pub(crate) fn coulomb_block(
    coordinates: &[Point3<f64>],
    charges: &[f64],
    conversion_rate: f64,
) -> Result<DMatrix<f64>, DescriptorError> {
    let n = check_dimensions(coordinates, charges)?;
    if let Some((i, j)) = find_coincident(coordinates, COINCIDENCE_TOLERANCE) {
        return Err(DescriptorError::CoincidentAtoms { i, j });
    }
    let distances = distance_matrix(coordinates);
    let mut block = DMatrix::zeros(n, n);

    for i in 0..n {
        block[(i, i)] = self_interaction(charges[i]);
        for j in (i + 1)..n {
            let value = charges[i] * charges[j] / (distances[(i, j)] / conversion_rate);
            block[(i, j)] = value;
            block[(j, i)] = value;
        }
    }
    Ok(block)
}

/// Builds the Coulomb Matrix of one molecule.
///
/// `M[i,i] = 0.5·Z_i^2.4` and `M[i,j] = Z_i·Z_j / r_ij`; everything outside the leading
/// n×n block is zero. The output shape follows `options.output`.
pub fn coulomb_matrix(
    coordinates: &[Point3<f64>],
    charges: &[f64],
    options: &DescriptorOptions,
) -> Result<Descriptor, DescriptorError> {
    let n = check_dimensions(coordinates, charges)?;
    let size = options.resolve_size(n)?;
    let block = coulomb_block(coordinates, charges, options.conversion_rate())?;
    Ok(options.finalize(pad_square(&block, size), n))
}

#[derive(Debug, Clone)]
pub struct CoulombMatrix<'a> {
    elements: &'a ElementTable,
    options: DescriptorOptions,
}

impl<'a> CoulombMatrix<'a> {
    pub fn new(elements: &'a ElementTable, options: DescriptorOptions) -> Self {
        Self { elements, options }
    }
}

impl DescriptorBuilder for CoulombMatrix<'_> {
    fn identifier(&self) -> &'static str {
        "CM"
    }

    fn build(&self, molecule: &Molecule) -> Result<Descriptor, DescriptorError> {
        let charges = molecule.nuclear_charges(self.elements)?;
        coulomb_matrix(&molecule.positions(), &charges, &self.options)
    }
}
