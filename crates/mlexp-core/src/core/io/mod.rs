//! Reading and writing molecular geometries and labelled datasets.
//!
//! Geometries use the XYZ format behind the [`traits::MolecularFile`] interface. The
//! dataset loader pairs every geometry of a directory with the energies listed in an
//! index file.

pub mod dataset;
pub mod traits;
pub mod xyz;
