//! # Descriptors Module
//!
//! Fixed-size numeric encodings of molecules, suitable as kernel ridge regression inputs.
//!
//! ## Overview
//!
//! Every builder consumes atom coordinates plus per-atom nuclear charges (or element
//! symbols) and produces a [`Descriptor`] whose shape depends only on the
//! [`DescriptorOptions`], never on the molecule. That is what lets molecules of different
//! sizes share one kernel space.
//!
//! ## Key Components
//!
//! - [`coulomb`] - Coulomb Matrix
//! - [`lennard_jones`] - Lennard-Jones-shaped structural matrix
//! - [`bonds`] - Table-driven bond detection ("helping data")
//! - [`adjacency`] - Bond-graph adjacency matrix
//! - [`bag_of_bonds`] - Bag-of-Bonds vectors
//! - [`spectrum`] - Output-mode post-processing (eigenvalues, row-norm sorting, flattening)
//!
//! ## Output modes
//!
//! Matrix-shaped descriptors share one [`OutputMode`]: the padded matrix itself, its
//! sorted eigenvalue spectrum, or the matrix flattened row-major into a vector.

use crate::core::models::molecule::{Molecule, MoleculeError};
use nalgebra::{DMatrix, DVector, Point3};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

pub mod adjacency;
pub mod bag_of_bonds;
pub mod bonds;
pub mod coulomb;
pub mod lennard_jones;
pub mod spectrum;

/// One Bohr radius in Angstroms.
pub const BOHR_RADIUS: f64 = 0.52917721067;

pub const DEFAULT_DESCRIPTOR_SIZE: usize = 23;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("Dimension mismatch: expected {expected} {what}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{count} entries exceed the configured descriptor size {size}")]
    CapacityExceeded { count: usize, size: usize },

    #[error("Atoms {i} and {j} occupy the same position")]
    CoincidentAtoms { i: usize, j: usize },

    #[error("Bag '{label}' is not part of the Bag-of-Bonds layout")]
    UnknownBag { label: String },

    #[error("Bag '{label}' holds {count} values but its capacity is {capacity}")]
    BagOverflow {
        label: String,
        count: usize,
        capacity: usize,
    },

    #[error(transparent)]
    Molecule(#[from] MoleculeError),
}

#[derive(Debug, Error)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

/// How a matrix-shaped descriptor is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// The zero-padded S×S matrix.
    Matrix,
    /// Eigenvalues sorted descending, zeros packed at the tail (length S).
    #[default]
    Eigenvalues,
    /// The S×S matrix flattened row-major into a vector of length S².
    FlattenedMatrix,
}

impl FromStr for OutputMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "matrix" => Ok(OutputMode::Matrix),
            "eigenvalues" | "eig" => Ok(OutputMode::Eigenvalues),
            "flattened" | "flattened-matrix" | "flat" => Ok(OutputMode::FlattenedMatrix),
            _ => Err(ParseOptionError {
                kind: "output mode",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputMode::Matrix => "matrix",
            OutputMode::Eigenvalues => "eigenvalues",
            OutputMode::FlattenedMatrix => "flattened",
        };
        f.write_str(name)
    }
}

/// What to do when a molecule has more entries (atoms, bonds) than the descriptor size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CapacityPolicy {
    /// Fail with [`DescriptorError::CapacityExceeded`].
    #[default]
    Error,
    /// Raise the size to fit this molecule and log a warning. The result no longer has
    /// the configured shape, so kernels will reject it next to regular descriptors.
    Grow,
}

impl FromStr for CapacityPolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(CapacityPolicy::Error),
            "grow" => Ok(CapacityPolicy::Grow),
            _ => Err(ParseOptionError {
                kind: "capacity policy",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptorOptions {
    /// Padding target S.
    pub size: usize,
    pub output: OutputMode,
    /// Reorder rows and columns by descending row norm (matrix and flattened modes).
    pub sort: bool,
    /// Express distances in Bohr radii instead of Angstroms.
    pub bohr_radius_units: bool,
    pub capacity_policy: CapacityPolicy,
}

impl Default for DescriptorOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_DESCRIPTOR_SIZE,
            output: OutputMode::default(),
            sort: false,
            bohr_radius_units: false,
            capacity_policy: CapacityPolicy::default(),
        }
    }
}

impl DescriptorOptions {
    /// Divisor turning Angstrom distances into the configured unit.
    pub fn conversion_rate(&self) -> f64 {
        if self.bohr_radius_units {
            BOHR_RADIUS
        } else {
            1.0
        }
    }

    /// Effective padded size for `count` entries under the capacity policy.
    pub fn resolve_size(&self, count: usize) -> Result<usize, DescriptorError> {
        if count <= self.size {
            return Ok(self.size);
        }
        match self.capacity_policy {
            CapacityPolicy::Error => Err(DescriptorError::CapacityExceeded {
                count,
                size: self.size,
            }),
            CapacityPolicy::Grow => {
                warn!(
                    count,
                    size = self.size,
                    "Entry count exceeds descriptor size; growing the size to fit."
                );
                Ok(count)
            }
        }
    }

    /// Applies the output mode to a padded matrix whose leading `count`×`count` block
    /// holds the real entries.
    pub(crate) fn finalize(&self, matrix: DMatrix<f64>, count: usize) -> Descriptor {
        match self.output {
            OutputMode::Eigenvalues => {
                Descriptor::Vector(spectrum::sorted_eigenvalues(&matrix, count))
            }
            OutputMode::Matrix => Descriptor::Matrix(self.maybe_sorted(matrix)),
            OutputMode::FlattenedMatrix => {
                Descriptor::Vector(spectrum::flatten_row_major(&self.maybe_sorted(matrix)))
            }
        }
    }

    fn maybe_sorted(&self, matrix: DMatrix<f64>) -> DMatrix<f64> {
        if self.sort {
            spectrum::sort_by_row_norm(&matrix)
        } else {
            matrix
        }
    }
}

/// A computed descriptor. Kernels only look at the flattened values, so both shapes
/// are handled uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Matrix(DMatrix<f64>),
    Vector(DVector<f64>),
}

impl Descriptor {
    pub fn values(&self) -> &[f64] {
        match self {
            Descriptor::Matrix(m) => m.as_slice(),
            Descriptor::Vector(v) => v.as_slice(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            Descriptor::Matrix(m) => m.shape(),
            Descriptor::Vector(v) => v.shape(),
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            Descriptor::Matrix(m) => Some(m),
            Descriptor::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            Descriptor::Vector(v) => Some(v),
            Descriptor::Matrix(_) => None,
        }
    }
}

/// A descriptor builder bound to its tables and options.
pub trait DescriptorBuilder: Send + Sync {
    /// Short identifier used in logs and reports ("CM", "LJM", ...).
    fn identifier(&self) -> &'static str;

    fn build(&self, molecule: &Molecule) -> Result<Descriptor, DescriptorError>;
}

pub(crate) fn check_dimensions(
    coordinates: &[Point3<f64>],
    charges: &[f64],
) -> Result<usize, DescriptorError> {
    if coordinates.len() != charges.len() {
        return Err(DescriptorError::DimensionMismatch {
            what: "nuclear charges",
            expected: coordinates.len(),
            found: charges.len(),
        });
    }
    Ok(coordinates.len())
}

/// Embeds `block` in the top-left corner of a `size`×`size` zero matrix.
pub(crate) fn pad_square(block: &DMatrix<f64>, size: usize) -> DMatrix<f64> {
    let mut padded = DMatrix::zeros(size, size);
    let (rows, cols) = block.shape();
    padded.view_mut((0, 0), (rows, cols)).copy_from(block);
    padded
}
