//! Bandit testbeds used to exercise the simple bandit

use rand::Rng;

use rlbook_core::{Action, Action1D, Arm, Reward};

use crate::bandit::RewardSource;

/// The ten arms `1.0..=10.0` of the testbed
pub fn ten_arms() -> Vec<Action1D> {
    (1..=10).map(|i| Action1D::new(f64::from(i))).collect()
}

/// Deterministic reward `v^(1/v)` where `v` is the action's value.
///
/// Over the ten arms the best one is `3.0`.
pub fn root_reward(action: &Action1D) -> Reward {
    let v = action.magnitude().as_f64();
    Reward(v.powf(1.0 / v))
}

/// Testbed paying `arm * u` where `u` is drawn uniformly in [0, 1)
#[derive(Debug, Clone)]
pub struct UniformTestbed<R> {
    rng: R,
}

impl<R: Rng> UniformTestbed<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RewardSource<Arm> for UniformTestbed<R> {
    fn reward(&mut self, action: &Arm) -> Reward {
        Reward(action.0 as f64 * self.rng.gen::<f64>())
    }
}
