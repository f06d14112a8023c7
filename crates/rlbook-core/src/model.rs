//! Finite Markov Decision Process model

use std::fmt;

use tracing::debug;

use crate::action::Action;
use crate::error::{is_probability, Result, RlError};
use crate::policy::Policy;
use crate::state::State;
use crate::types::Reward;

/// Probability to end up in state s' and receive reward r starting in state s
/// and picking action a: `p(s',r|s,a)`
pub type ProbabilityFn<S, A> = Box<dyn Fn(&S, Reward, &S, &A) -> f64 + Send + Sync>;

/// Characteristics of a model: its states, the policy and the dynamics
pub struct Model<S: State, A: Action> {
    states: Vec<S>,
    policy: Policy<S, A>,
    probability: ProbabilityFn<S, A>,
    grid_width: Option<usize>,
}

impl<S: State, A: Action> Model<S, A> {
    /// Create a model over `states`, terminal ones included
    pub fn new<F>(states: Vec<S>, policy: Policy<S, A>, probability: F) -> Result<Self>
    where
        F: Fn(&S, Reward, &S, &A) -> f64 + Send + Sync + 'static,
    {
        if states.is_empty() {
            return Err(RlError::EmptyStateSpace);
        }
        debug!("Model created with {} states", states.len());
        Ok(Self {
            states,
            policy,
            probability: Box::new(probability),
            grid_width: None,
        })
    }

    /// Model whose transitions always happen with probability one
    pub fn deterministic(states: Vec<S>, policy: Policy<S, A>) -> Result<Self> {
        Self::new(states, policy, |_, _, _, _| 1.0)
    }

    /// Set the width of the grid/2D matrix the model represents, if any
    pub fn with_grid_width(mut self, width: usize) -> Self {
        self.grid_width = Some(width);
        self
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn policy(&self) -> &Policy<S, A> {
        &self.policy
    }

    pub fn grid_width(&self) -> Option<usize> {
        self.grid_width
    }

    /// Probability `p(s',r|s,a)`
    pub fn probability(&self, next: &S, reward: Reward, state: &S, action: &A) -> Result<f64> {
        let p = (self.probability)(next, reward, state, action);
        if is_probability(p) {
            Ok(p)
        } else {
            Err(RlError::InvalidProbability(p))
        }
    }
}

impl<S: State, A: Action> fmt::Debug for Model<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("states", &self.states.len())
            .field("policy", &self.policy)
            .field("grid_width", &self.grid_width)
            .finish_non_exhaustive()
    }
}
