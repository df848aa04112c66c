//! # Core Models Module
//!
//! Data structures describing a molecule as consumed by the descriptor builders.
//!
//! - [`molecule`] - [`molecule::Atom`] and [`molecule::Molecule`]
//!
//! ```ignore
//! use mlexp::core::models::molecule::{Atom, Molecule};
//! use nalgebra::Point3;
//!
//! let mut molecule = Molecule::new("methane");
//! molecule.push_atom(Atom::new("C", Point3::new(0.0, 0.0, 0.0)));
//! molecule.push_atom(Atom::new("H", Point3::new(0.63, 0.63, 0.63)));
//! ```

pub mod molecule;
