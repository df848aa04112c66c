use super::config::{DescriptorConfig, DescriptorKind};
use super::error::{EngineError, MoleculeFailure};
use super::progress::{Progress, ProgressReporter};
use crate::core::descriptors::adjacency::AdjacencyMatrix;
use crate::core::descriptors::bag_of_bonds::{BagLayout, BagOfBonds};
use crate::core::descriptors::coulomb::CoulombMatrix;
use crate::core::descriptors::lennard_jones::LennardJonesMatrix;
use crate::core::descriptors::{Descriptor, DescriptorBuilder};
use crate::core::models::molecule::Molecule;
use crate::core::tables::{BondTable, ElementTable};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lookup tables shared by every descriptor builder.
#[derive(Debug, Clone, Copy)]
pub struct Tables<'a> {
    pub elements: &'a ElementTable,
    pub bonds: &'a BondTable,
}

fn resolve_layout(config: &DescriptorConfig, molecules: &[&Molecule]) -> BagLayout {
    if config.kind != DescriptorKind::BagOfBonds {
        return BagLayout::default();
    }
    match &config.bag_counts {
        Some(counts) => BagLayout::from_atom_counts(counts),
        None => BagLayout::from_molecules(molecules.iter().copied()),
    }
}

fn make_builder<'a>(
    config: &'a DescriptorConfig,
    tables: Tables<'a>,
    layout: &'a BagLayout,
) -> Box<dyn DescriptorBuilder + 'a> {
    match config.kind {
        DescriptorKind::CoulombMatrix => {
            Box::new(CoulombMatrix::new(tables.elements, config.options))
        }
        DescriptorKind::LennardJonesMatrix => Box::new(LennardJonesMatrix::new(
            tables.elements,
            config.lennard_jones,
            config.options,
        )),
        DescriptorKind::AdjacencyMatrix => Box::new(AdjacencyMatrix::new(
            tables.elements,
            tables.bonds,
            config.use_forces,
            config.options,
        )),
        DescriptorKind::BagOfBonds => {
            Box::new(BagOfBonds::new(tables.elements, layout, config.options))
        }
    }
}

/// Computes one descriptor per molecule, in input order.
///
/// Every molecule is attempted. If any fail, the call returns
/// [`EngineError::BatchFailed`] naming each failed molecule, and no descriptors.
#[instrument(skip_all, name = "batch_descriptors", fields(kind = %config.kind, molecules = molecules.len()))]
pub fn compute_descriptors(
    molecules: &[&Molecule],
    config: &DescriptorConfig,
    tables: Tables,
    reporter: &ProgressReporter,
) -> Result<Vec<Descriptor>, EngineError> {
    let layout = resolve_layout(config, molecules);
    let builder = make_builder(config, tables, &layout);

    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = molecules.iter();

    #[cfg(feature = "parallel")]
    let iterator = molecules.par_iter();

    let results: Vec<_> = iterator
        .map(|molecule| {
            let result = builder.build(molecule);
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut descriptors = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (molecule, result) in molecules.iter().zip(results) {
        match result {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(error) => {
                warn!(molecule = molecule.name(), %error, "Descriptor generation failed.");
                failures.push(MoleculeFailure {
                    molecule: molecule.name().to_string(),
                    error,
                });
            }
        }
    }

    if !failures.is_empty() {
        return Err(EngineError::BatchFailed { failures });
    }
    info!(
        identifier = builder.identifier(),
        count = descriptors.len(),
        "Descriptors computed."
    );
    Ok(descriptors)
}

/// Computes the descriptor of a single molecule. A Bag-of-Bonds layout without explicit
/// atom counts is sized for this molecule alone.
pub fn describe_molecule(
    molecule: &Molecule,
    config: &DescriptorConfig,
    tables: Tables,
) -> Result<Descriptor, EngineError> {
    let layout = resolve_layout(config, &[molecule]);
    make_builder(config, tables, &layout)
        .build(molecule)
        .map_err(|source| EngineError::Descriptor {
            molecule: molecule.name().to_string(),
            source,
        })
}
