//! Simple bandit algorithm
//!
//! Epsilon-greedy action selection with incremental sample-average
//! estimation of each action's value (Sutton & Barto, "a simple bandit
//! algorithm", page 32).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use rlbook_core::{argmax, pick, random_from, Action, Result, Reward, RlError, State, Value};

use crate::monitor::RewardMonitor;

/// Source of rewards for the actions taken by a bandit
pub trait RewardSource<A> {
    fn reward(&mut self, action: &A) -> Reward;
}

impl<A, F> RewardSource<A> for F
where
    F: FnMut(&A) -> Reward,
{
    fn reward(&mut self, action: &A) -> Reward {
        self(action)
    }
}

/// Adapter for state-aware reward functions.
///
/// Every trial starts from the same state and the next state returned by
/// the function is discarded.
#[derive(Debug, Clone)]
pub struct Stateless<S, F> {
    state: S,
    transition: F,
}

impl<S, F> Stateless<S, F> {
    pub fn new(state: S, transition: F) -> Self {
        Self { state, transition }
    }
}

impl<S, A, F> RewardSource<A> for Stateless<S, F>
where
    S: State,
    F: FnMut(&S, &A) -> (S, Reward),
{
    fn reward(&mut self, action: &A) -> Reward {
        let (_, reward) = (self.transition)(&self.state, action);
        reward
    }
}

/// Value estimates (Q) and visit counts (N) over a fixed set of actions.
///
/// Both tables share one key set by construction.
#[derive(Debug, Clone)]
pub struct ActionValues<A: Action> {
    actions: Vec<A>,
    index: HashMap<A, usize>,
    values: Vec<Value>,
    counts: Vec<u64>,
}

impl<A: Action> ActionValues<A> {
    /// Zero-initialised tables; duplicated actions are only kept once
    pub fn new(actions: Vec<A>) -> Self {
        let mut index = HashMap::with_capacity(actions.len());
        let mut unique = Vec::with_capacity(actions.len());
        for action in actions {
            if !index.contains_key(&action) {
                index.insert(action.clone(), unique.len());
                unique.push(action);
            }
        }
        let k = unique.len();

        Self {
            actions: unique,
            index,
            values: vec![Value::ZERO; k],
            counts: vec![0; k],
        }
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Current estimate Q(a)
    pub fn value(&self, action: &A) -> Option<Value> {
        self.index.get(action).map(|&i| self.values[i])
    }

    /// Number of times N(a) the action was taken
    pub fn count(&self, action: &A) -> Option<u64> {
        self.index.get(action).map(|&i| self.counts[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&A, Value, u64)> {
        self.actions
            .iter()
            .zip(self.values.iter())
            .zip(self.counts.iter())
            .map(|((a, v), n)| (a, *v, *n))
    }

    /// Greedy action, ties broken uniformly at random
    pub fn greedy<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&A> {
        argmax(
            self.actions.iter().zip(self.values.iter().map(|v| v.as_f64())),
            rng,
        )
    }

    /// Record a reward for `action`: `N(a) += 1; Q(a) += (R - Q(a)) / N(a)`
    pub fn update(&mut self, action: &A, reward: Reward) -> Result<Value> {
        let i = *self
            .index
            .get(action)
            .ok_or_else(|| RlError::UnknownAction(format!("{action:?}")))?;
        self.counts[i] += 1;
        let step = Value::from_count(self.counts[i]).inverse();
        let q = self.values[i];
        self.values[i] = q + step * (reward.to_value() - q);
        Ok(self.values[i])
    }
}

/// Outcome of a single bandit step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<A> {
    pub action: A,
    pub reward: Reward,
    pub explored: bool,
}

/// Epsilon-greedy bandit over a fixed set of actions
pub struct SimpleBandit<A: Action, F, R = StdRng> {
    table: ActionValues<A>,
    epsilon: f64,
    source: F,
    rng: R,
    steps: u64,
    explorations: u64,
    total_reward: f64,
}

impl<A, F> SimpleBandit<A, F, StdRng>
where
    A: Action,
    F: RewardSource<A>,
{
    /// Create a bandit seeded from the operating system's entropy
    pub fn new(actions: Vec<A>, epsilon: f64, source: F) -> Result<Self> {
        Self::with_rng(actions, epsilon, source, StdRng::from_entropy())
    }

    /// Create a bandit with a reproducible random source
    pub fn seeded(actions: Vec<A>, epsilon: f64, source: F, seed: u64) -> Result<Self> {
        Self::with_rng(actions, epsilon, source, StdRng::seed_from_u64(seed))
    }
}

impl<A, F, R> SimpleBandit<A, F, R>
where
    A: Action,
    F: RewardSource<A>,
    R: Rng,
{
    /// Create a bandit drawing its random numbers from `rng`
    pub fn with_rng(actions: Vec<A>, epsilon: f64, source: F, rng: R) -> Result<Self> {
        if actions.is_empty() {
            return Err(RlError::EmptyActionSet);
        }
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(RlError::InvalidEpsilon(epsilon));
        }

        let table = ActionValues::new(actions);
        info!("Simple bandit created with {} actions, epsilon={}", table.len(), epsilon);

        Ok(Self {
            table,
            epsilon,
            source,
            rng,
            steps: 0,
            explorations: 0,
            total_reward: 0.0,
        })
    }

    /// Take one action, observe its reward and update the estimates
    pub fn step<M: RewardMonitor + ?Sized>(&mut self, monitor: &mut M) -> Result<Step<A>> {
        // Random action with probability ɛ
        let explored = pick(self.epsilon, &mut self.rng)?;
        let action = if explored {
            random_from(self.table.actions(), &mut self.rng)?.clone()
        } else {
            self.table.greedy(&mut self.rng)?.clone()
        };

        let reward = self.source.reward(&action);
        let estimate = self.table.update(&action, reward)?;

        self.steps += 1;
        self.total_reward += reward.as_f64();
        if explored {
            self.explorations += 1;
        }
        debug!(
            "step={} action={} explored={} reward={} estimate={}",
            self.steps,
            action.name(),
            explored,
            reward,
            estimate
        );
        monitor.record_reward(reward);

        Ok(Step {
            action,
            reward,
            explored,
        })
    }

    /// Run a fixed budget of steps
    pub fn run<M: RewardMonitor + ?Sized>(&mut self, steps: u64, monitor: &mut M) -> Result<()> {
        for _ in 0..steps {
            self.step(monitor)?;
        }
        Ok(())
    }

    /// Run until `stop` is raised, returning the number of steps taken
    pub fn run_until<M: RewardMonitor + ?Sized>(
        &mut self,
        stop: &AtomicBool,
        monitor: &mut M,
    ) -> Result<u64> {
        let mut taken = 0;
        while !stop.load(Ordering::Relaxed) {
            self.step(monitor)?;
            taken += 1;
        }
        info!("Simple bandit stopped after {} steps", taken);
        Ok(taken)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn table(&self) -> &ActionValues<A> {
        &self.table
    }

    /// Current estimate Q(a)
    pub fn estimate(&self, action: &A) -> Option<Value> {
        self.table.value(action)
    }

    /// Number of times N(a) the action was taken
    pub fn visits(&self, action: &A) -> Option<u64> {
        self.table.count(action)
    }

    /// Get statistics
    pub fn stats(&self) -> BanditStats {
        BanditStats {
            steps: self.steps,
            explorations: self.explorations,
            total_reward: self.total_reward,
            average_reward: if self.steps > 0 {
                self.total_reward / self.steps as f64
            } else {
                0.0
            },
            epsilon: self.epsilon,
            estimates: self
                .table
                .iter()
                .map(|(action, value, visits)| ArmEstimate {
                    action: action.name(),
                    value: value.as_f64(),
                    visits,
                })
                .collect(),
        }
    }
}

/// Bandit statistics
#[derive(Debug, Clone, Serialize)]
pub struct BanditStats {
    pub steps: u64,
    pub explorations: u64,
    pub total_reward: f64,
    pub average_reward: f64,
    pub epsilon: f64,
    pub estimates: Vec<ArmEstimate>,
}

/// Estimate held for one action
#[derive(Debug, Clone, Serialize)]
pub struct ArmEstimate {
    pub action: String,
    pub value: f64,
    pub visits: u64,
}

impl BanditStats {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
