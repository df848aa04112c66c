use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mlexp::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Bar state for one benchmark: the descriptor family in flight and how many of the
/// `identifiers × training sizes` regression runs are done.
struct BenchmarkProgress {
    bar: ProgressBar,
    identifier: Option<String>,
    runs_done: usize,
    runs_total: usize,
}

impl BenchmarkProgress {
    fn label(&self, what: &str) -> String {
        match &self.identifier {
            Some(identifier) => format!("[{identifier}] {what}"),
            None => what.to_string(),
        }
    }

    fn handle(&mut self, event: Progress) {
        match event {
            Progress::DescriptorStart {
                identifier,
                molecules,
            } => {
                self.bar
                    .println(format!("▶ {identifier}: {molecules} molecules"));
                self.identifier = Some(identifier);
            }
            Progress::PhaseStart { name } => {
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.bar.set_message(self.label(name));
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_length(total_steps);
                self.bar.set_style(bar_style());
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = self.bar.length() {
                    self.bar.set_position(length);
                }
            }
            Progress::RunFinished {
                identifier,
                training_size,
                mae,
            } => {
                self.runs_done += 1;
                self.bar.println(format!(
                    "  [{}/{}] {:<4} n = {:>6}  MAE = {:.4}",
                    self.runs_done, self.runs_total, identifier, training_size, mae
                ));
                let status = format!("run {}/{}", self.runs_done, self.runs_total);
                self.bar.set_message(self.label(&status));
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                let message = if self.runs_total > 0 && self.runs_done == self.runs_total {
                    "✓ All runs finished".to_string()
                } else {
                    self.label("✓ done")
                };
                self.bar.finish_with_message(message);
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<32} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// Renders benchmark progress on stderr: a bar over the molecules while descriptors are
/// computed, then one line per finished regression run.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BenchmarkProgress>>,
}

impl CliProgressHandler {
    pub fn new(runs_total: usize) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BenchmarkProgress {
                bar,
                identifier: None,
                runs_done: 0,
                runs_total,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();
        Box::new(move |event: Progress| match state.lock() {
            Ok(mut guard) => guard.handle(event),
            Err(_) => warn!("Progress state mutex was poisoned. Cannot update progress."),
        })
    }
}
