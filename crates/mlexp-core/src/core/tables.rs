//! Immutable lookup tables injected into the descriptor builders.
//!
//! Both tables come with built-in defaults and can be replaced by tables loaded from
//! disk. They are never mutated after construction.

use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[rustfmt::skip]
static DEFAULT_NUCLEAR_CHARGES: Map<&'static str, u32> = phf_map! {
    "H" => 1, "He" => 2,
    "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
    "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17, "Ar" => 18,
    "K" => 19, "Ca" => 20, "Br" => 35, "I" => 53,
};

// (r_min, r_max) in Angstrom and the bond constant k.
#[rustfmt::skip]
static DEFAULT_BOND_WINDOWS: Map<&'static str, (f64, f64, f64)> = phf_map! {
    "CC" => (1.20, 1.60, 4.5),
    "CH" => (1.06, 1.12, 5.0),
    "CO" => (1.43, 2.15, 5.4),
    "CN" => (1.47, 2.10, 4.9),
    "CS" => (1.81, 2.55, 2.5),
};

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid record {record} in '{path}': {message}")]
    InvalidRecord {
        path: String,
        record: usize,
        message: String,
    },
}

/// Canonical element-pair key: the two symbols concatenated in sorted order ("HC" -> "CH").
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}{b}")
    } else {
        format!("{b}{a}")
    }
}

/// Element symbol to nuclear charge (atomic number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTable {
    charges: HashMap<String, u32>,
}

impl Default for ElementTable {
    fn default() -> Self {
        Self {
            charges: DEFAULT_NUCLEAR_CHARGES
                .entries()
                .map(|(symbol, charge)| (symbol.to_string(), *charge))
                .collect(),
        }
    }
}

impl ElementTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            charges: entries.into_iter().map(|(s, z)| (s.into(), z)).collect(),
        }
    }

    pub fn charge(&self, symbol: &str) -> Option<u32> {
        self.charges.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    /// Loads a periodic-table CSV: a header row, then records whose first column is the
    /// atomic number and whose third column is the element symbol.
    pub fn load_csv(path: &Path) -> Result<Self, TableLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| TableLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;

        let mut charges = HashMap::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| TableLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            let invalid = |message: String| TableLoadError::InvalidRecord {
                path: path_str.clone(),
                record: idx + 1,
                message,
            };
            let number = record
                .get(0)
                .ok_or_else(|| invalid("missing atomic number column".to_string()))?;
            let symbol = record
                .get(2)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| invalid("missing symbol column".to_string()))?;
            let charge: u32 = number
                .parse()
                .map_err(|_| invalid(format!("invalid atomic number '{number}'")))?;
            charges.insert(symbol.to_string(), charge);
        }
        Ok(Self { charges })
    }
}

/// Distance window and constant for one element pair.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BondWindow {
    pub r_min: f64,
    pub r_max: f64,
    pub k: f64,
}

impl BondWindow {
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.r_min && distance <= self.r_max
    }
}

/// Bond-distance windows keyed by [`pair_key`].
///
/// The windows are empirical ranges for first-neighbour distances in small organic
/// molecules; they make the bond detector a heuristic, not a bond-order calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct BondTable {
    windows: HashMap<String, BondWindow>,
}

impl Default for BondTable {
    fn default() -> Self {
        Self {
            windows: DEFAULT_BOND_WINDOWS
                .entries()
                .map(|(key, &(r_min, r_max, k))| (key.to_string(), BondWindow { r_min, r_max, k }))
                .collect(),
        }
    }
}

impl BondTable {
    pub fn from_windows(windows: HashMap<String, BondWindow>) -> Self {
        Self { windows }
    }

    pub fn window(&self, a: &str, b: &str) -> Option<&BondWindow> {
        self.windows.get(&pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Loads a TOML table of `[KEY] r-min = .., r-max = .., k = ..` sections, where `KEY` is
    /// a canonical pair key.
    pub fn load_toml(path: &Path) -> Result<Self, TableLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TableLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let windows: HashMap<String, BondWindow> =
            toml::from_str(&content).map_err(|e| TableLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Ok(Self { windows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(pair_key("H", "C"), "CH");
        assert_eq!(pair_key("C", "H"), "CH");
        assert_eq!(pair_key("O", "O"), "OO");
    }

    #[test]
    fn default_element_table_knows_common_organic_elements() {
        let table = ElementTable::default();
        assert_eq!(table.charge("H"), Some(1));
        assert_eq!(table.charge("C"), Some(6));
        assert_eq!(table.charge("N"), Some(7));
        assert_eq!(table.charge("O"), Some(8));
        assert_eq!(table.charge("S"), Some(16));
        assert_eq!(table.charge("Xx"), None);
    }

    #[test]
    fn load_csv_reads_number_and_symbol_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("periodic_table_of_elements.txt");
        fs::write(
            &path,
            "AtomicNumber,Element,Symbol,AtomicMass\n1,Hydrogen,H,1.007\n6,Carbon,C,12.011\n",
        )
        .unwrap();

        let table = ElementTable::load_csv(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.charge("C"), Some(6));
    }

    #[test]
    fn load_csv_rejects_non_numeric_atomic_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "AtomicNumber,Element,Symbol\nsix,Carbon,C\n").unwrap();

        let result = ElementTable::load_csv(&path);
        assert!(matches!(
            result,
            Err(TableLoadError::InvalidRecord { record: 1, .. })
        ));
    }

    #[test]
    fn load_csv_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = ElementTable::load_csv(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(TableLoadError::Csv { .. })));
    }

    #[test]
    fn default_bond_table_matches_pairs_in_either_order() {
        let table = BondTable::default();
        let window = table.window("H", "C").unwrap();
        assert!(window.contains(1.09));
        assert!(!window.contains(1.20));
        assert!(table.window("H", "H").is_none());
    }

    #[test]
    fn load_toml_reads_windows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bonds.toml");
        fs::write(
            &path,
            r#"
            [CH]
            r-min = 1.0
            r-max = 1.2
            k = 3.0

            [OO]
            r-min = 1.2
            r-max = 1.5
            k = 1.5
            "#,
        )
        .unwrap();

        let table = BondTable::load_toml(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.window("O", "O"),
            Some(&BondWindow {
                r_min: 1.2,
                r_max: 1.5,
                k: 1.5
            })
        );
    }

    #[test]
    fn load_toml_fails_for_malformed_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bonds.toml");
        fs::write(&path, "this is not toml").unwrap();
        assert!(matches!(
            BondTable::load_toml(&path),
            Err(TableLoadError::Toml { .. })
        ));
    }
}
