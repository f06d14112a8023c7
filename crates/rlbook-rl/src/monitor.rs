//! Progress monitors
//!
//! Monitors are purely observational: algorithms report to them but never
//! read anything back.

use rlbook_core::{Reward, State, StateValue};
use tracing::{debug, info};

/// Default sweeps at which state values are displayed
pub const DEFAULT_DISPLAY_SWEEPS: [usize; 6] = [1, 2, 3, 10, 100, 1000];

/// Grid width used when the model does not declare one
const DEFAULT_WIDTH: usize = 8;

/// Sink for the reward obtained at each bandit step
pub trait RewardMonitor {
    fn record_reward(&mut self, reward: Reward);
}

/// Sink for the state values obtained at the end of each sweep
pub trait SweepMonitor<S: State> {
    fn record_sweep(
        &mut self,
        sweep: usize,
        delta: f64,
        values: &StateValue<S>,
        states: &[S],
        width: Option<usize>,
    );
}

impl RewardMonitor for () {
    fn record_reward(&mut self, _: Reward) {}
}

impl<S: State> SweepMonitor<S> for () {
    fn record_sweep(&mut self, _: usize, _: f64, _: &StateValue<S>, _: &[S], _: Option<usize>) {}
}

/// Monitor logging a running average and periodic state-value snapshots
#[derive(Debug, Clone)]
pub struct LiveMonitor {
    output: String,
    steps: u64,
    average: f64,
    display_sweeps: Vec<usize>,
}

impl LiveMonitor {
    /// Create a monitor following the value called `output`, eg. "reward"
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            steps: 0,
            average: 0.0,
            display_sweeps: DEFAULT_DISPLAY_SWEEPS.to_vec(),
        }
    }

    /// Sweeps (1-based) at which state values are logged
    pub fn with_display_sweeps(mut self, sweeps: Vec<usize>) -> Self {
        self.display_sweeps = sweeps;
        self
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn average(&self) -> f64 {
        self.average
    }
}

impl RewardMonitor for LiveMonitor {
    fn record_reward(&mut self, reward: Reward) {
        self.steps += 1;
        self.average += (reward.as_f64() - self.average) / self.steps as f64;
        info!(
            "average_{}={:.6};steps={}",
            self.output, self.average, self.steps
        );
    }
}

impl<S: State> SweepMonitor<S> for LiveMonitor {
    fn record_sweep(
        &mut self,
        sweep: usize,
        delta: f64,
        values: &StateValue<S>,
        states: &[S],
        width: Option<usize>,
    ) {
        self.steps += 1;
        debug!("sweep={} delta={:e}", sweep, delta);

        if self.display_sweeps.contains(&sweep) {
            info!("==================== {}", self.output);
            info!("step={}", sweep);
            info!("\n{}", values.render(states, width.unwrap_or(DEFAULT_WIDTH)));
        }
    }
}
