use crate::cli::BenchmarkArgs;
use crate::config::builder::build_benchmark_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use mlexp::core::io::dataset::Dataset;
use mlexp::engine::batch::Tables;
use mlexp::engine::error::EngineError;
use mlexp::engine::progress::ProgressReporter;
use mlexp::workflows::benchmark::{self, BenchmarkRecord};
use tracing::info;

pub fn run(args: BenchmarkArgs) -> Result<()> {
    info!("Building benchmark configuration...");
    let app = build_benchmark_config(&args)?;
    let (elements, bonds) = super::load_tables(&app.tables)?;

    let index_path = app.dataset.index_path();
    if !index_path.is_file() {
        return Err(CliError::Argument(format!(
            "Dataset index not found: {}",
            index_path.display()
        )));
    }

    info!("Loading dataset from {:?}", &app.dataset.directory);
    let mut dataset = Dataset::load_qm7(&app.dataset.directory).map_err(EngineError::from)?;
    if let Some(seed) = app.dataset.shuffle_seed {
        info!(seed, "Shuffling dataset.");
        dataset.shuffle(seed);
    }
    if let Some(limit) = app.dataset.limit {
        dataset.truncate(limit);
    }
    println!("Loaded {} molecules.", dataset.len());

    let runs_total = app.core_config.identifiers.len() * app.core_config.training_sizes.len();
    let progress_handler = CliProgressHandler::new(runs_total);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let reports = benchmark::run(
        &dataset,
        &app.core_config,
        Tables {
            elements: &elements,
            bonds: &bonds,
        },
        &reporter,
    )?;

    println!(
        "{:<6} {:>10} {:>10} {:>12} {:>10} {:>12}",
        "desc", "train", "test", "sigma", "time (s)", "MAE"
    );
    for report in &reports {
        println!(
            "{:<6} {:>10} {:>10} {:>12.1} {:>10.2} {:>12.4}",
            report.identifier,
            report.training_size,
            report.test_size,
            report.sigma,
            report.duration.as_secs_f64(),
            report.mae
        );
    }

    if let Some(path) = &app.output {
        let lennard_jones = &app.core_config.descriptor.lennard_jones;
        let records: Vec<BenchmarkRecord> = reports
            .iter()
            .map(|report| BenchmarkRecord::from_report(report, lennard_jones))
            .collect();
        benchmark::append_records(path, &records)?;
        println!("✓ {} result(s) appended to {}", records.len(), path.display());
    }

    Ok(())
}
