//! Policies: legal actions, action-selection probabilities and discounting

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::action::Action;
use crate::error::{is_probability, Result, RlError};
use crate::state::State;

/// Action-selection probability function 𝛑(a|s)
pub type PolicyFn<S, A> = Box<dyn Fn(&A, &S) -> f64 + Send + Sync>;

/// Actions a policy may choose from
#[derive(Debug, Clone)]
pub enum ActionSet<S: State, A: Action> {
    /// The same actions are legal in every state
    Global(Vec<A>),

    /// Legal actions depend on the state
    PerState(HashMap<S, Vec<A>>),
}

impl<S: State, A: Action> ActionSet<S, A> {
    /// Legal actions in `state`, empty when the state is unknown
    pub fn at(&self, state: &S) -> &[A] {
        match self {
            ActionSet::Global(actions) => actions,
            ActionSet::PerState(actions) => actions.get(state).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ActionSet::Global(actions) => actions.is_empty(),
            ActionSet::PerState(actions) => actions.values().all(Vec::is_empty),
        }
    }
}

/// The policy to evaluate
pub struct Policy<S: State, A: Action> {
    actions: ActionSet<S, A>,
    gamma: f64,
    pi: PolicyFn<S, A>,
}

impl<S: State, A: Action> Policy<S, A> {
    /// Create a policy with the same legal actions in every state
    pub fn new<F>(actions: Vec<A>, gamma: f64, pi: F) -> Result<Self>
    where
        F: Fn(&A, &S) -> f64 + Send + Sync + 'static,
    {
        Self::build(ActionSet::Global(actions), gamma, Box::new(pi))
    }

    /// Create a policy whose legal actions depend on the state
    pub fn per_state<F>(actions: HashMap<S, Vec<A>>, gamma: f64, pi: F) -> Result<Self>
    where
        F: Fn(&A, &S) -> f64 + Send + Sync + 'static,
    {
        Self::build(ActionSet::PerState(actions), gamma, Box::new(pi))
    }

    /// Equiprobable random policy over a global action list
    pub fn uniform(actions: Vec<A>, gamma: f64) -> Result<Self> {
        let p = 1.0 / actions.len().max(1) as f64;
        Self::new(actions, gamma, move |_, _| p)
    }

    fn build(actions: ActionSet<S, A>, gamma: f64, pi: PolicyFn<S, A>) -> Result<Self> {
        if !(0.0..=1.0).contains(&gamma) {
            return Err(RlError::InvalidGamma(gamma));
        }
        if actions.is_empty() {
            return Err(RlError::EmptyActionSet);
        }
        debug!("Policy created with gamma={}", gamma);
        Ok(Self { actions, gamma, pi })
    }

    /// Discounting rate 𝛾
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn action_set(&self) -> &ActionSet<S, A> {
        &self.actions
    }

    /// Legal actions in `state`
    pub fn actions(&self, state: &S) -> &[A] {
        self.actions.at(state)
    }

    /// Probability 𝛑(a|s) of taking `action` in `state`
    pub fn pi(&self, action: &A, state: &S) -> Result<f64> {
        let p = (self.pi)(action, state);
        if is_probability(p) {
            Ok(p)
        } else {
            Err(RlError::InvalidProbability(p))
        }
    }
}

impl<S: State, A: Action> fmt::Debug for Policy<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("actions", &self.actions)
            .field("gamma", &self.gamma)
            .finish_non_exhaustive()
    }
}
