use crate::core::descriptors::Descriptor;
use crate::core::learning::kernels::{KernelKind, kernel_matrix};
use crate::engine::config::RegressionConfig;
use crate::engine::error::EngineError;
use crate::engine::split::DataSplit;
use nalgebra::DVector;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionReport {
    pub identifier: String,
    pub kernel: KernelKind,
    pub sigma: f64,
    pub training_size: usize,
    pub test_size: usize,
    pub mae: f64,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct RegressionOutcome {
    pub report: RegressionReport,
    /// Predictions for the test entries, in dataset order.
    pub predictions: DVector<f64>,
    /// Regression coefficients, one per training entry.
    pub alpha: DVector<f64>,
}

pub fn mean_absolute_error(predictions: &DVector<f64>, targets: &[f64]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / targets.len() as f64
}

/// Trains kernel ridge regression on a training prefix and evaluates it on a test suffix.
///
/// The kernel matrix of the training set is solved for `α` with the configured solver;
/// test predictions are `K(X_test, X_train)·α`.
#[instrument(skip_all, name = "regression_workflow", fields(identifier = identifier, training_size = config.training_size))]
pub fn run(
    descriptors: &[Descriptor],
    labels: &[f64],
    identifier: &str,
    config: &RegressionConfig,
) -> Result<RegressionOutcome, EngineError> {
    if descriptors.len() != labels.len() {
        return Err(EngineError::SizeMismatch {
            descriptors: descriptors.len(),
            labels: labels.len(),
        });
    }
    let start = Instant::now();
    let split = DataSplit::new(descriptors.len(), config.training_size, config.test_size)?;
    debug!(
        training = ?split.training,
        test = ?split.test,
        "Dataset split."
    );

    let x_train = &descriptors[split.training.clone()];
    let y_train = DVector::from_row_slice(&labels[split.training.clone()]);
    let x_test = &descriptors[split.test.clone()];
    let y_test = &labels[split.test.clone()];

    let k_train = kernel_matrix(config.kernel, x_train, x_train, config.sigma)?;
    let solver = config.solver.build(config.ridge);
    let alpha = solver.solve(&k_train, &y_train)?;

    let k_test = kernel_matrix(config.kernel, x_test, x_train, config.sigma)?;
    let predictions = k_test * &alpha;
    let mae = mean_absolute_error(&predictions, y_test);
    let duration = start.elapsed();

    info!(
        mae,
        test_size = split.test_size(),
        kernel = %config.kernel,
        solver = solver.name(),
        seconds = duration.as_secs_f64(),
        "Regression finished."
    );

    Ok(RegressionOutcome {
        report: RegressionReport {
            identifier: identifier.to_string(),
            kernel: config.kernel,
            sigma: config.sigma,
            training_size: split.training_size(),
            test_size: split.test_size(),
            mae,
            duration,
        },
        predictions,
        alpha,
    })
}
