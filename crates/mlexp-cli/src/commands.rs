pub mod benchmark;
pub mod describe;

use crate::config::models::TablePaths;
use crate::error::Result;
use mlexp::core::tables::{BondTable, ElementTable};
use tracing::info;

/// Loads the configured lookup tables, falling back to the built-in ones.
fn load_tables(paths: &TablePaths) -> Result<(ElementTable, BondTable)> {
    let elements = match &paths.elements {
        Some(path) => {
            info!("Loading nuclear charge table from {:?}", path);
            ElementTable::load_csv(path)?
        }
        None => ElementTable::default(),
    };
    let bonds = match &paths.bonds {
        Some(path) => {
            info!("Loading bond table from {:?}", path);
            BondTable::load_toml(path)?
        }
        None => BondTable::default(),
    };
    Ok((elements, bonds))
}
