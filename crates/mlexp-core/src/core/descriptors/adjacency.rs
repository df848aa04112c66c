use super::bonds::{HelpingData, helping_data};
use super::{Descriptor, DescriptorBuilder, DescriptorError, DescriptorOptions, pad_square};
use crate::core::models::molecule::Molecule;
use crate::core::tables::{BondTable, ElementTable};
use nalgebra::DMatrix;

/// Bond-graph adjacency matrix: one row and column per bond.
///
/// Entry `(i, j)`, `i != j`, is non-zero when bonds `i` and `j` share an atom. Its value is
/// the constant of bond `i`, or the dot product of both force vectors with `use_forces`.
/// The constant variant is not symmetric when neighbouring bonds have different constants;
/// eigenvalue output decomposes its symmetric part.
pub fn adjacency_matrix(
    data: &HelpingData,
    use_forces: bool,
    options: &DescriptorOptions,
) -> Result<Descriptor, DescriptorError> {
    let n = data.len();
    let size = options.resolve_size(n)?;

    let block = DMatrix::from_fn(n, n, |i, j| {
        let (a, b) = (&data.bonds[i], &data.bonds[j]);
        if i == j || !a.shares_atom_with(b) {
            0.0
        } else if use_forces {
            a.force.dot(&b.force)
        } else {
            a.constant
        }
    });

    Ok(options.finalize(pad_square(&block, size), n))
}

#[derive(Debug, Clone)]
pub struct AdjacencyMatrix<'a> {
    elements: &'a ElementTable,
    bonds: &'a BondTable,
    use_forces: bool,
    options: DescriptorOptions,
}

impl<'a> AdjacencyMatrix<'a> {
    pub fn new(
        elements: &'a ElementTable,
        bonds: &'a BondTable,
        use_forces: bool,
        options: DescriptorOptions,
    ) -> Self {
        Self {
            elements,
            bonds,
            use_forces,
            options,
        }
    }
}

impl DescriptorBuilder for AdjacencyMatrix<'_> {
    fn identifier(&self) -> &'static str {
        "AM"
    }

    fn build(&self, molecule: &Molecule) -> Result<Descriptor, DescriptorError> {
        let charges = molecule.nuclear_charges(self.elements)?;
        let data = helping_data(
            &molecule.positions(),
            &charges,
            &molecule.symbols(),
            self.bonds,
            &self.options,
        )?;
        adjacency_matrix(&data, self.use_forces, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::bonds::Bond;
    use crate::core::descriptors::{CapacityPolicy, OutputMode};
    use crate::core::models::molecule::Atom;
    use nalgebra::{Point3, Vector3};

    fn bond(i: usize, j: usize, constant: f64, force: Vector3<f64>) -> Bond {
        Bond {
            atoms: (i, j),
            constant,
            force,
        }
    }

    // Chain 0-1-2-3 plus an isolated bond 4-5.
    fn chain() -> HelpingData {
        HelpingData {
            adjacency: DMatrix::from_element(6, 6, false),
            bonds: vec![
                bond(0, 1, 5.0, Vector3::new(1.0, 0.0, 0.0)),
                bond(1, 2, 4.5, Vector3::new(0.0, 2.0, 0.0)),
                bond(2, 3, 5.4, Vector3::new(3.0, 1.0, 0.0)),
                bond(4, 5, 2.5, Vector3::new(1.0, 1.0, 1.0)),
            ],
        }
    }

    fn matrix_options(size: usize) -> DescriptorOptions {
        DescriptorOptions {
            size,
            output: OutputMode::Matrix,
            ..Default::default()
        }
    }

    #[test]
    fn constants_mark_bonds_sharing_an_atom() {
        let am = adjacency_matrix(&chain(), false, &matrix_options(5)).unwrap();
        let m = am.as_matrix().unwrap();

        assert_eq!(m.shape(), (5, 5));
        assert_eq!(m[(0, 1)], 5.0);
        assert_eq!(m[(1, 0)], 4.5);
        assert_eq!(m[(1, 2)], 4.5);
        assert_eq!(m[(0, 2)], 0.0);
        assert_eq!(m[(3, 0)], 0.0);
        assert!((0..5).all(|k| m[(k, k)] == 0.0));
        assert!((0..5).all(|k| m[(4, k)] == 0.0 && m[(k, 4)] == 0.0));
    }

    #[test]
    fn forces_use_dot_products_and_stay_symmetric() {
        let am = adjacency_matrix(&chain(), true, &matrix_options(4)).unwrap();
        let m = am.as_matrix().unwrap();

        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(m[(1, 2)], 2.0);
        assert_eq!(m[(2, 1)], 2.0);
        assert_eq!(m[(2, 3)], 0.0);
    }

    #[test]
    fn bond_count_is_subject_to_capacity_policy() {
        assert_eq!(
            adjacency_matrix(&chain(), false, &matrix_options(3)),
            Err(DescriptorError::CapacityExceeded { count: 4, size: 3 })
        );
        let growing = DescriptorOptions {
            capacity_policy: CapacityPolicy::Grow,
            ..matrix_options(3)
        };
        let am = adjacency_matrix(&chain(), false, &growing).unwrap();
        assert_eq!(am.shape(), (4, 4));
    }

    #[test]
    fn molecule_without_bonds_gives_all_zero_spectrum() {
        let data = HelpingData {
            adjacency: DMatrix::from_element(3, 3, false),
            bonds: Vec::new(),
        };
        let options = DescriptorOptions {
            size: 3,
            ..Default::default()
        };
        let am = adjacency_matrix(&data, false, &options).unwrap();
        assert_eq!(am.values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn builder_detects_bonds_from_molecule() {
        let molecule = Molecule::from_atoms(
            "formaldehyde-like",
            vec![
                Atom::new("C", Point3::new(0.0, 0.0, 0.0)),
                Atom::new("O", Point3::new(1.50, 0.0, 0.0)),
                Atom::new("H", Point3::new(-0.55, 0.95, 0.0)),
                Atom::new("H", Point3::new(-0.55, -0.95, 0.0)),
            ],
        );
        let elements = ElementTable::default();
        let bonds = BondTable::default();
        let builder = AdjacencyMatrix::new(&elements, &bonds, false, matrix_options(4));
        assert_eq!(builder.identifier(), "AM");

        let am = builder.build(&molecule).unwrap();
        let m = am.as_matrix().unwrap();
        // Bonds: C-O, C-H, C-H; all three share the carbon.
        assert_eq!(m[(0, 1)], 5.4);
        assert_eq!(m[(1, 0)], 5.0);
        assert_eq!(m[(1, 2)], 5.0);
        assert_eq!(m[(3, 3)], 0.0);
    }
}
