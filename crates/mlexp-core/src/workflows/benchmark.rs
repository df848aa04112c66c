use super::regression::{self, RegressionReport};
use crate::core::descriptors::lennard_jones::LennardJonesParams;
use crate::core::io::dataset::Dataset;
use crate::engine::batch::{Tables, compute_descriptors};
use crate::engine::config::BenchmarkConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info, instrument};

/// One row of the benchmark results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub descriptor_type: String,
    pub train_size: usize,
    pub test_size: usize,
    pub kernel_sigma: f64,
    pub mae: f64,
    /// Wall-clock seconds of the regression run.
    pub time: f64,
    pub lj_sigma: f64,
    pub lj_epsilon: f64,
}

impl BenchmarkRecord {
    pub fn from_report(report: &RegressionReport, lennard_jones: &LennardJonesParams) -> Self {
        Self {
            descriptor_type: report.identifier.clone(),
            train_size: report.training_size,
            test_size: report.test_size,
            kernel_sigma: report.sigma,
            mae: report.mae,
            time: report.duration.as_secs_f64(),
            lj_sigma: lennard_jones.sigma,
            lj_epsilon: lennard_jones.epsilon,
        }
    }
}

/// Runs kernel ridge regression for every configured descriptor and training size.
///
/// Descriptors of one kind are computed once for the whole dataset and reused for all
/// training sizes. Reports come back grouped by identifier, in configuration order.
#[instrument(skip_all, name = "benchmark_workflow", fields(molecules = dataset.len()))]
pub fn run(
    dataset: &Dataset,
    config: &BenchmarkConfig,
    tables: Tables,
    reporter: &ProgressReporter,
) -> Result<Vec<RegressionReport>, EngineError> {
    let molecules = dataset.molecules();
    let labels = dataset.labels(config.label);
    let mut reports = Vec::with_capacity(config.identifiers.len() * config.training_sizes.len());

    for &kind in &config.identifiers {
        reporter.report(Progress::DescriptorStart {
            identifier: kind.identifier().to_string(),
            molecules: molecules.len(),
        });
        reporter.report(Progress::PhaseStart {
            name: "Computing descriptors",
        });
        let descriptor_config = config.descriptor.with_kind(kind);
        let descriptors = compute_descriptors(&molecules, &descriptor_config, tables, reporter)?;
        reporter.report(Progress::PhaseFinish);

        reporter.report(Progress::PhaseStart {
            name: "Kernel ridge regression",
        });
        for &training_size in &config.training_sizes {
            let regression_config = config.regression_config(kind, training_size);
            let outcome = regression::run(
                &descriptors,
                &labels,
                kind.identifier(),
                &regression_config,
            )?;
            reporter.report(Progress::RunFinished {
                identifier: kind.identifier().to_string(),
                training_size,
                mae: outcome.report.mae,
            });
            reports.push(outcome.report);
        }
        reporter.report(Progress::PhaseFinish);
    }

    info!(runs = reports.len(), "Benchmark finished.");
    Ok(reports)
}

/// Appends records to a CSV file, writing the header only when the file is new or empty.
pub fn append_records(path: &Path, records: &[BenchmarkRecord]) -> Result<(), EngineError> {
    let path_str = path.to_string_lossy().to_string();
    let io_error = |source: std::io::Error| EngineError::Io {
        path: path_str.clone(),
        source,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    let is_empty = file.metadata().map_err(io_error)?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_empty)
        .from_writer(file);
    for record in records {
        writer
            .serialize(record)
            .map_err(|source| EngineError::Output {
                path: path_str.clone(),
                source,
            })?;
    }
    writer.flush().map_err(io_error)?;
    debug!(path = %path.display(), rows = records.len(), "Benchmark records appended.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::dataset::{DatasetEntry, LabelKind};
    use crate::core::learning::kernels::KernelKind;
    use crate::core::models::molecule::{Atom, Molecule};
    use crate::core::tables::{BondTable, ElementTable};
    use crate::engine::config::{BenchmarkConfigBuilder, DescriptorConfig, DescriptorKind};
    use nalgebra::Point3;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    // Stretched CH4-like molecules; the label is a smooth function of the stretch.
    fn toy_dataset(count: usize) -> Dataset {
        let entries = (0..count)
            .map(|k| {
                let stretch = 1.0 + 0.01 * k as f64;
                let d = 0.629 * stretch;
                let molecule = Molecule::from_atoms(
                    &format!("m{k:02}"),
                    vec![
                        Atom::new("C", Point3::new(0.0, 0.0, 0.0)),
                        Atom::new("H", Point3::new(d, d, d)),
                        Atom::new("H", Point3::new(-d, -d, d)),
                        Atom::new("H", Point3::new(-d, d, -d)),
                        Atom::new("H", Point3::new(d, -d, -d)),
                    ],
                );
                DatasetEntry {
                    molecule,
                    pbe0: -400.0 + 10.0 * stretch,
                    dftb: -380.0,
                }
            })
            .collect();
        Dataset::from_entries(entries)
    }

    fn benchmark_config() -> BenchmarkConfig {
        let mut descriptor = DescriptorConfig::new(DescriptorKind::CoulombMatrix);
        descriptor.options.size = 6;
        BenchmarkConfigBuilder::new()
            .descriptor(descriptor)
            .identifiers(vec![DescriptorKind::CoulombMatrix, DescriptorKind::BagOfBonds])
            .training_sizes(vec![4, 6])
            .sigma(1.0)
            .label(LabelKind::Delta)
            .build()
            .unwrap()
    }

    #[test]
    fn runs_every_identifier_and_training_size() {
        let dataset = toy_dataset(10);
        let elements = ElementTable::default();
        let bonds = BondTable::default();
        let tables = Tables {
            elements: &elements,
            bonds: &bonds,
        };

        let reports = run(&dataset, &benchmark_config(), tables, &ProgressReporter::new()).unwrap();
        let summary: Vec<(&str, KernelKind, usize, usize)> = reports
            .iter()
            .map(|r| (r.identifier.as_str(), r.kernel, r.training_size, r.test_size))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("CM", KernelKind::Gaussian, 4, 6),
                ("CM", KernelKind::Gaussian, 6, 4),
                ("BOB", KernelKind::Laplacian, 4, 6),
                ("BOB", KernelKind::Laplacian, 6, 4),
            ]
        );
        assert!(reports.iter().all(|r| r.mae.is_finite()));
    }

    #[test]
    fn reports_each_finished_run() {
        let dataset = toy_dataset(8);
        let elements = ElementTable::default();
        let bonds = BondTable::default();
        let tables = Tables {
            elements: &elements,
            bonds: &bonds,
        };
        let started = Mutex::new(Vec::new());
        let finished = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::DescriptorStart {
                identifier,
                molecules,
            } => started.lock().unwrap().push((identifier, molecules)),
            Progress::RunFinished {
                identifier,
                training_size,
                ..
            } => finished.lock().unwrap().push((identifier, training_size)),
            _ => {}
        }));

        run(&dataset, &benchmark_config(), tables, &reporter).unwrap();
        drop(reporter);
        assert_eq!(
            started.into_inner().unwrap(),
            vec![("CM".to_string(), 8), ("BOB".to_string(), 8)]
        );
        assert_eq!(
            finished.into_inner().unwrap(),
            vec![
                ("CM".to_string(), 4),
                ("CM".to_string(), 6),
                ("BOB".to_string(), 4),
                ("BOB".to_string(), 6),
            ]
        );
    }

    #[test]
    fn training_size_larger_than_dataset_fails() {
        let dataset = toy_dataset(5);
        let elements = ElementTable::default();
        let bonds = BondTable::default();
        let tables = Tables {
            elements: &elements,
            bonds: &bonds,
        };
        let result = run(&dataset, &benchmark_config(), tables, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::InvalidSplit { .. })));
    }

    fn record(descriptor_type: &str, mae: f64) -> BenchmarkRecord {
        let report = RegressionReport {
            identifier: descriptor_type.to_string(),
            kernel: KernelKind::Gaussian,
            sigma: 1000.0,
            training_size: 1000,
            test_size: 1500,
            mae,
            duration: Duration::from_millis(1500),
        };
        BenchmarkRecord::from_report(&report, &LennardJonesParams::default())
    }

    #[test]
    fn append_records_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");

        append_records(&path, &[record("CM", 10.5)]).unwrap();
        append_records(&path, &[record("BOB", 3.25), record("AM", 7.0)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "descriptor_type,train_size,test_size,kernel_sigma,mae,time,lj_sigma,lj_epsilon"
        );

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<BenchmarkRecord> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows, vec![record("CM", 10.5), record("BOB", 3.25), record("AM", 7.0)]);
        assert_eq!(rows[0].time, 1.5);
    }
}
