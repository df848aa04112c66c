//! Bag-of-Bonds vectors.
//!
//! The upper triangle of a Coulomb matrix is split into bags: diagonal entries go into the
//! bag of their element, off-diagonal entries into the bag of their element pair. Each bag
//! is zero padded to a fixed capacity given by a [`BagLayout`], and the bags are
//! concatenated in canonical order (element bags alphabetically, then pair bags `(a, b)`
//! with `a <= b`). Molecules encoded with the same layout always produce vectors of the
//! same length.

use super::coulomb::coulomb_block;
use super::{Descriptor, DescriptorBuilder, DescriptorError, DescriptorOptions};
use crate::core::models::molecule::Molecule;
use crate::core::tables::ElementTable;
use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BagKey {
    Element(String),
    /// Sorted so that `.0 <= .1`.
    Pair(String, String),
}

impl BagKey {
    pub fn for_atoms(a: &str, b: &str) -> Self {
        if a <= b {
            BagKey::Pair(a.to_string(), b.to_string())
        } else {
            BagKey::Pair(b.to_string(), a.to_string())
        }
    }
}

impl fmt::Display for BagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BagKey::Element(symbol) => f.write_str(symbol),
            BagKey::Pair(a, b) => write!(f, "{a}{b}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    pub key: BagKey,
    pub capacity: usize,
    pub offset: usize,
}

/// Canonical bag order and per-bag capacities.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BagLayout {
    bags: Vec<Bag>,
    index: HashMap<BagKey, usize>,
    len: usize,
}

impl BagLayout {
    /// Layout for molecules with at most `counts[X]` atoms of each element X.
    ///
    /// Capacities: `X -> count(X)`, `XY -> count(X)·count(Y)`, `XX -> count(X)·(count(X)−1)/2`.
    /// Bags of capacity zero are left out.
    pub fn from_atom_counts(counts: &BTreeMap<String, usize>) -> Self {
        let element_bags = counts
            .iter()
            .map(|(symbol, &count)| (BagKey::Element(symbol.clone()), count));

        let pair_bags = counts
            .iter()
            .tuple_combinations()
            .map(|((a, &ca), (b, &cb))| (BagKey::Pair(a.clone(), b.clone()), ca * cb));
        let same_element_bags = counts.iter().map(|(symbol, &count)| {
            (
                BagKey::Pair(symbol.clone(), symbol.clone()),
                count * count.saturating_sub(1) / 2,
            )
        });

        let mut entries: Vec<(BagKey, usize)> = element_bags
            .chain(pair_bags)
            .chain(same_element_bags)
            .filter(|(_, capacity)| *capacity > 0)
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut layout = BagLayout::default();
        for (key, capacity) in entries {
            layout.index.insert(key.clone(), layout.bags.len());
            layout.bags.push(Bag {
                key,
                capacity,
                offset: layout.len,
            });
            layout.len += capacity;
        }
        layout
    }

    /// Layout sized for the maximum per-element composition found in `molecules`.
    pub fn from_molecules<'a, I>(molecules: I) -> Self
    where
        I: IntoIterator<Item = &'a Molecule>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for molecule in molecules {
            for (symbol, count) in molecule.composition() {
                let entry = counts.entry(symbol).or_insert(0);
                *entry = (*entry).max(count);
            }
        }
        Self::from_atom_counts(&counts)
    }

    /// Total vector length.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bags(&self) -> &[Bag] {
        &self.bags
    }

    pub fn bag(&self, key: &BagKey) -> Option<&Bag> {
        self.index.get(key).map(|&i| &self.bags[i])
    }
}

/// Encodes an unpadded n×n Coulomb matrix as a Bag-of-Bonds vector of length `layout.len()`.
///
/// With `sort`, each bag is ordered descending before padding, which makes the result
/// invariant under atom permutation.
pub fn bag_of_bonds(
    coulomb: &DMatrix<f64>,
    symbols: &[&str],
    layout: &BagLayout,
    sort: bool,
) -> Result<DVector<f64>, DescriptorError> {
    let n = symbols.len();
    if coulomb.shape() != (n, n) {
        return Err(DescriptorError::DimensionMismatch {
            what: "Coulomb matrix rows",
            expected: n,
            found: coulomb.nrows(),
        });
    }

    let mut bags: BTreeMap<BagKey, Vec<f64>> = BTreeMap::new();
    for i in 0..n {
        for j in i..n {
            let key = if i == j {
                BagKey::Element(symbols[i].to_string())
            } else {
                BagKey::for_atoms(symbols[i], symbols[j])
            };
            bags.entry(key).or_default().push(coulomb[(i, j)]);
        }
    }

    let mut vector = DVector::zeros(layout.len());
    for (key, mut values) in bags {
        let bag = layout.bag(&key).ok_or_else(|| DescriptorError::UnknownBag {
            label: key.to_string(),
        })?;
        if values.len() > bag.capacity {
            return Err(DescriptorError::BagOverflow {
                label: key.to_string(),
                count: values.len(),
                capacity: bag.capacity,
            });
        }
        if sort {
            values.sort_by(|a, b| b.total_cmp(a));
        }
        for (slot, value) in values.into_iter().enumerate() {
            vector[bag.offset + slot] = value;
        }
    }
    Ok(vector)
}

#[derive(Debug, Clone)]
pub struct BagOfBonds<'a> {
    elements: &'a ElementTable,
    layout: &'a BagLayout,
    options: DescriptorOptions,
}

impl<'a> BagOfBonds<'a> {
    /// Only `options.sort` and `options.bohr_radius_units` apply; the vector length is
    /// fixed by the layout.
    pub fn new(elements: &'a ElementTable, layout: &'a BagLayout, options: DescriptorOptions) -> Self {
        Self {
            elements,
            layout,
            options,
        }
    }
}

impl DescriptorBuilder for BagOfBonds<'_> {
    fn identifier(&self) -> &'static str {
        "BOB"
    }

    fn build(&self, molecule: &Molecule) -> Result<Descriptor, DescriptorError> {
        let charges = molecule.nuclear_charges(self.elements)?;
        let cm = coulomb_block(
            &molecule.positions(),
            &charges,
            self.options.conversion_rate(),
        )?;
        let bob = bag_of_bonds(&cm, &molecule.symbols(), self.layout, self.options.sort)?;
        Ok(Descriptor::Vector(bob))
    }
}
