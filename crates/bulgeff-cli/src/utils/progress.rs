use bulgeff::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::warn;

const TICK_INTERVAL: Duration = Duration::from_millis(80);
const PHASE_DONE: &str = "✓ Done";

/// Renders workflow progress on stderr: a spinner per phase and a bar over residues.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
    hidden: bool,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::build(false)
    }

    fn build(hidden: bool) -> Self {
        let bar = new_bar(hidden);
        bar.finish_and_clear();
        Self {
            bar: Arc::new(Mutex::new(bar)),
            hidden,
        }
    }

    /// A callback for [`bulgeff::engine::progress::ProgressReporter`] driving this handler's bar.
    pub fn callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |event| handler.handle(event))
    }

    fn lock(&self) -> Option<MutexGuard<'_, ProgressBar>> {
        match self.bar.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("Progress bar lock is poisoned; dropping progress event.");
                None
            }
        }
    }

    fn handle(&self, event: Progress) {
        let Some(mut bar) = self.lock() else {
            return;
        };

        match event {
            Progress::PhaseStart { name } => {
                *bar = new_bar(self.hidden).with_message(name);
                bar.enable_steady_tick(TICK_INTERVAL);
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                bar.finish_with_message(PHASE_DONE);
            }
            Progress::ResiduesStart { total } => {
                bar.disable_steady_tick();
                bar.set_style(residue_style());
                bar.set_length(total);
                bar.set_position(0);
            }
            Progress::ResidueStart { label } => bar.set_message(label),
            Progress::ResidueFinish => bar.inc(1),
            Progress::ResiduesFinish => {
                let len = bar.length().unwrap_or(0);
                bar.set_position(len);
            }
            Progress::Message(text) => bar.println(format!("  {}", text)),
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn new_bar(hidden: bool) -> ProgressBar {
    let target = if hidden {
        ProgressDrawTarget::hidden()
    } else {
        ProgressDrawTarget::stderr()
    };
    ProgressBar::with_draw_target(Some(0), target).with_style(phase_style())
}

fn phase_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn residue_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<10} [{bar:40.cyan/blue}] {pos}/{len} residues")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
