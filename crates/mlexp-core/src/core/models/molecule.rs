use crate::core::tables::ElementTable;
use nalgebra::Point3;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Unknown element symbol '{symbol}' at atom {index} (no nuclear charge in table)")]
    UnknownElement { symbol: String, index: usize },
}

/// A single atom of a molecule: its element symbol and Cartesian position in Ångström.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "C", "H", "Cl").
    pub symbol: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(symbol: &str, position: Point3<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            position,
        }
    }
}

/// An ordered collection of atoms.
///
/// Atom order is significant: descriptor rows and columns follow it, and only the
/// permutation-invariant output modes (eigenvalues, sorted bags) hide it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    name: String,
    comment: Option<String>,
    atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            atoms: Vec::new(),
        }
    }

    pub fn from_atoms(name: &str, atoms: Vec<Atom>) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            atoms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    pub fn push_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.atoms.iter().map(|a| a.symbol.as_str()).collect()
    }

    /// Looks up the nuclear charge of every atom in `table`.
    pub fn nuclear_charges(&self, table: &ElementTable) -> Result<Vec<f64>, MoleculeError> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(index, atom)| {
                table
                    .charge(&atom.symbol)
                    .map(f64::from)
                    .ok_or_else(|| MoleculeError::UnknownElement {
                        symbol: atom.symbol.clone(),
                        index,
                    })
            })
            .collect()
    }

    /// Number of atoms per element symbol, in alphabetical symbol order.
    pub fn composition(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.symbol.clone()).or_insert(0) += 1;
        }
        counts
    }
}
