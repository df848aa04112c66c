//! End-to-end procedures built on the engine.
//!
//! [`regression`] trains and evaluates one kernel ridge model on precomputed descriptors.
//! [`benchmark`] sweeps descriptor kinds and training sizes over a dataset and records
//! the results.

pub mod benchmark;
pub mod regression;
