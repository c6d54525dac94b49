use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use soilcell::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct BarState {
    bar: ProgressBar,
    phase: &'static str,
}

/// Renders engine [`Progress`] events as a single spinner/bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::new(0).with_style(Self::spinner_style());
        bar.set_draw_target(target);
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState { bar, phase: "" })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            let BarState { bar, phase } = &mut *guard;

            match progress {
                Progress::PhaseStart { name } => {
                    *phase = name;
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    bar.set_message(name);
                }
                Progress::PhaseFinish => {
                    bar.disable_steady_tick();
                    bar.finish_with_message(format!("✓ {}", phase));
                }
                Progress::TaskStart { total_steps } => {
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_position(0);
                    bar.set_style(Self::bar_style());
                    bar.set_message(*phase);
                }
                Progress::TaskIncrement => bar.inc(1),
                Progress::TaskFinish => {
                    let len = bar.length().unwrap_or(0);
                    if bar.position() < len {
                        bar.set_position(len);
                    }
                    bar.finish();
                }
                Progress::CandidatesGenerated { examined, feasible } => {
                    bar.set_message(format!("{} ({}/{} feasible)", phase, feasible, examined));
                }
                Progress::Message(msg) => {
                    if bar.is_finished() {
                        bar.set_message(msg);
                    } else {
                        bar.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        match ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} ({eta})") {
            Ok(style) => style
                .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                })
                .progress_chars("##-"),
            Err(_) => ProgressStyle::default_bar(),
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
