//! State abstraction and the state-value table

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use ndarray::Array1;

use crate::error::{Result, RlError};

/// A point of the environment's state space.
///
/// States are used as keys of the state-value table, so implementations
/// must provide a stable `Eq`/`Hash` identity, terminal states included.
pub trait State: Clone + Eq + Hash + Debug {
    fn is_terminal(&self) -> bool;

    /// Vector representation of the state
    fn vector(&self) -> Array1<f64>;
}

/// Expected value for each state of a model
#[derive(Debug, Clone, PartialEq)]
pub struct StateValue<S: State> {
    values: HashMap<S, f64>,
}

impl<S: State> StateValue<S> {
    /// Create a table holding zero for every passed state
    pub fn zeros(states: &[S]) -> Self {
        Self {
            values: states.iter().map(|s| (s.clone(), 0.0)).collect(),
        }
    }

    pub fn get(&self, state: &S) -> Option<f64> {
        self.values.get(state).copied()
    }

    /// Value of a state that must belong to the table
    pub fn value(&self, state: &S) -> Result<f64> {
        self.get(state)
            .ok_or_else(|| RlError::UnknownState(format!("{state:?}")))
    }

    /// Replace the value of a known state, returning the previous one
    pub fn set(&mut self, state: &S, value: f64) -> Result<f64> {
        match self.values.get_mut(state) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(RlError::UnknownState(format!("{state:?}"))),
        }
    }

    pub fn contains(&self, state: &S) -> bool {
        self.values.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> {
        self.values.iter().map(|(s, v)| (s, *v))
    }

    /// Render the values of `states` as a numpy-like matrix of `width` columns
    pub fn render(&self, states: &[S], width: usize) -> String {
        let rows: Vec<String> = states
            .chunks(width.max(1))
            .map(|row| {
                row.iter()
                    .map(|s| match self.get(s) {
                        Some(v) if v == 0.0 => format!("{:>10}", "0."),
                        Some(v) => format!("{v:>10.6}"),
                        None => format!("{:>10}", "-"),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        format!("[[{}]]", rows.join("]\n ["))
    }
}
