use crate::core::descriptors::ParseOptionError;
use crate::core::io::traits::MolecularFile;
use crate::core::io::xyz::{XyzError, XyzFile};
use crate::core::models::molecule::Molecule;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Index file name inside a QM7 dataset directory.
pub const QM7_INDEX_FILE: &str = "hof_qm7.txt";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid index record on line {line} of '{path}': {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },
    #[error("Failed to read geometry '{path}': {source}")]
    Xyz { path: String, source: XyzError },
}

/// Which energy serves as the regression target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelKind {
    /// PBE0 formation energy.
    #[default]
    Pbe0,
    /// `pbe0 − dftb`, the correction on top of the DFTB energy.
    Delta,
}

impl FromStr for LabelKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pbe0" => Ok(LabelKind::Pbe0),
            "delta" => Ok(LabelKind::Delta),
            _ => Err(ParseOptionError {
                kind: "label",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelKind::Pbe0 => f.write_str("pbe0"),
            LabelKind::Delta => f.write_str("delta"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    pub molecule: Molecule,
    pub pbe0: f64,
    pub dftb: f64,
}

impl DatasetEntry {
    pub fn label(&self, kind: LabelKind) -> f64 {
        match kind {
            LabelKind::Pbe0 => self.pbe0,
            LabelKind::Delta => self.pbe0 - self.dftb,
        }
    }
}

/// Molecules with their reference energies, in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
}

impl Dataset {
    pub fn from_entries(entries: Vec<DatasetEntry>) -> Self {
        Self { entries }
    }

    /// Loads `hof_qm7.txt` from `dir` and every geometry it lists. Each non-blank index
    /// line reads `<xyz file> <pbe0> <dftb>`, with the file relative to `dir`.
    #[instrument(skip_all, name = "load_qm7", fields(dir = %dir.display()))]
    pub fn load_qm7(dir: &Path) -> Result<Self, DatasetError> {
        let index_path = dir.join(QM7_INDEX_FILE);
        let path_str = index_path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(&index_path).map_err(|e| DatasetError::Io {
            path: path_str.clone(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let parse_error = |message: String| DatasetError::Parse {
                path: path_str.clone(),
                line: idx + 1,
                message,
            };
            if fields.len() < 3 {
                return Err(parse_error(format!(
                    "expected 3 fields, found {}",
                    fields.len()
                )));
            }
            let energy = |token: &str| {
                token
                    .parse::<f64>()
                    .map_err(|_| parse_error(format!("invalid energy '{token}'")))
            };
            let pbe0 = energy(fields[1])?;
            let dftb = energy(fields[2])?;

            let xyz_path = dir.join(fields[0]);
            let molecule = XyzFile::read_from_path(&xyz_path).map_err(|e| DatasetError::Xyz {
                path: xyz_path.to_string_lossy().to_string(),
                source: e,
            })?;
            entries.push(DatasetEntry {
                molecule,
                pbe0,
                dftb,
            });
        }

        info!(molecules = entries.len(), "Dataset loaded.");
        Ok(Self { entries })
    }

    /// Shuffles the entries; the same seed always gives the same order.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.entries.shuffle(&mut rng);
        debug!(seed, "Dataset shuffled.");
    }

    /// Keeps only the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    pub fn molecules(&self) -> Vec<&Molecule> {
        self.entries.iter().map(|e| &e.molecule).collect()
    }

    pub fn labels(&self, kind: LabelKind) -> Vec<f64> {
        self.entries.iter().map(|e| e.label(kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write_dataset(index: &str) -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0001.xyz"), "1\n\nC 0.0 0.0 0.0\n").unwrap();
        fs::write(
            dir.path().join("0002.xyz"),
            "2\n\nO 0.0 0.0 0.0\nH 0.96 0.0 0.0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("0003.xyz"),
            "2\n\nN 0.0 0.0 0.0\nH 1.01 0.0 0.0\n",
        )
        .unwrap();
        fs::write(dir.path().join(QM7_INDEX_FILE), index).unwrap();
        dir
    }

    const INDEX: &str = "0001.xyz -417.96 -396.25\n0002.xyz -712.42 -650.00\n\n0003.xyz -564.21 -510.20\n";

    #[test]
    fn loads_geometries_and_energies_in_index_order() {
        let dir = write_dataset(INDEX);
        let dataset = Dataset::load_qm7(dir.path()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.entries()[1].molecule.name(), "0002");
        assert_eq!(dataset.entries()[1].molecule.len(), 2);
        assert_eq!(dataset.labels(LabelKind::Pbe0), vec![-417.96, -712.42, -564.21]);
    }

    #[test]
    fn delta_label_is_pbe0_minus_dftb() {
        let dir = write_dataset(INDEX);
        let dataset = Dataset::load_qm7(dir.path()).unwrap();
        let delta = dataset.labels(LabelKind::Delta);
        assert!((delta[0] - (-417.96 + 396.25)).abs() < 1e-12);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_seed() {
        let dir = write_dataset(INDEX);
        let dataset = Dataset::load_qm7(dir.path()).unwrap();

        let mut first = dataset.clone();
        let mut second = dataset.clone();
        first.shuffle(111);
        second.shuffle(111);
        assert_eq!(first, second);

        let mut names: Vec<&str> = first.entries().iter().map(|e| e.molecule.name()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["0001", "0002", "0003"]);
    }

    #[test]
    fn malformed_index_reports_line() {
        let dir = write_dataset("0001.xyz -417.96 -396.25\n0002.xyz oops -650.0\n");
        let result = Dataset::load_qm7(dir.path());
        assert!(matches!(result, Err(DatasetError::Parse { line: 2, .. })));

        let dir = write_dataset("0001.xyz -417.96\n");
        assert!(matches!(
            Dataset::load_qm7(dir.path()),
            Err(DatasetError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn missing_geometry_is_reported_with_its_path() {
        let dir = write_dataset("0009.xyz -1.0 -1.0\n");
        match Dataset::load_qm7(dir.path()) {
            Err(DatasetError::Xyz { path, .. }) => assert!(path.ends_with("0009.xyz")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_index_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Dataset::load_qm7(dir.path()),
            Err(DatasetError::Io { .. })
        ));
    }

    #[test]
    fn label_kind_parses() {
        assert_eq!("Delta".parse::<LabelKind>().unwrap(), LabelKind::Delta);
        assert!("dftb".parse::<LabelKind>().is_err());
    }
}
