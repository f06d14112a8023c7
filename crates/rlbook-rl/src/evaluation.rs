//! Iterative policy evaluation
//!
//! Estimates V ≈ v𝛑 for a finite MDP by sweeping synchronous
//! Bellman-expectation backups until the largest change of a sweep drops
//! below θ (Sutton & Barto, page 75).

use std::collections::HashMap;

use tracing::{debug, info, warn};

use rlbook_core::{Action, Model, Result, RlError, State, StateValue, Transition};

use crate::monitor::SweepMonitor;

/// Synchronous policy evaluator over a model.
///
/// The evaluator exclusively owns the state-value table it updates.
pub struct PolicyEvaluator<'m, S: State, A: Action> {
    model: &'m Model<S, A>,
    theta: f64,
    max_sweeps: Option<usize>,
    values: StateValue<S>,
    sweeps: usize,
    delta: f64,
}

impl<'m, S, A> PolicyEvaluator<'m, S, A>
where
    S: State,
    A: Transition<S>,
{
    /// Create an evaluator stopping once a sweep changes no value by θ or more
    pub fn new(model: &'m Model<S, A>, theta: f64) -> Result<Self> {
        if theta.is_nan() || theta < 0.0 {
            return Err(RlError::InvalidTheta(theta));
        }
        if model.states().is_empty() {
            return Err(RlError::EmptyStateSpace);
        }
        if model.policy().action_set().is_empty() {
            return Err(RlError::EmptyActionSet);
        }

        Ok(Self {
            model,
            theta,
            max_sweeps: None,
            values: StateValue::zeros(model.states()),
            sweeps: 0,
            delta: f64::INFINITY,
        })
    }

    /// Give up with `RlError::NotConverged` after `max_sweeps` sweeps
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Current state values
    pub fn values(&self) -> &StateValue<S> {
        &self.values
    }

    /// Number of sweeps performed so far
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Largest change of the last sweep, infinite before the first one
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Sweep until convergence and return the state values
    pub fn evaluate<M>(&mut self, monitor: &mut M) -> Result<StateValue<S>>
    where
        M: SweepMonitor<S> + ?Sized,
    {
        info!(
            "Evaluating policy over {} states (theta={:e})",
            self.model.states().len(),
            self.theta
        );

        let mut delta = f64::INFINITY;
        while delta >= self.theta {
            if let Some(max) = self.max_sweeps {
                if self.sweeps >= max {
                    warn!(
                        "Policy evaluation stopped after {} sweeps (delta={:e})",
                        self.sweeps, delta
                    );
                    return Err(RlError::NotConverged {
                        sweeps: self.sweeps,
                        delta,
                    });
                }
            }

            delta = self.sweep()?;
            monitor.record_sweep(
                self.sweeps,
                delta,
                &self.values,
                self.model.states(),
                self.model.grid_width(),
            );
        }

        info!("Policy evaluation converged after {} sweeps", self.sweeps);
        Ok(self.values.clone())
    }

    /// Perform one synchronous sweep over every state, returning its delta
    pub fn sweep(&mut self) -> Result<f64> {
        let previous = self.values.clone();
        let mut delta: f64 = 0.0;

        for s in self.model.states() {
            let v = if s.is_terminal() {
                0.0
            } else {
                self.backup(s, &previous)?
            };
            let old = self.values.set(s, v)?;
            delta = delta.max((old - v).abs());
        }

        self.sweeps += 1;
        self.delta = delta;
        debug!("sweep={} delta={:e}", self.sweeps, delta);
        Ok(delta)
    }

    // V(s) ← Σ 𝛑(a|s) p(s',r|s,a) [r + 𝛾V(s')]
    fn backup(&self, s: &S, previous: &StateValue<S>) -> Result<f64> {
        let policy = self.model.policy();
        let gamma = policy.gamma();

        let mut value = 0.0;
        for a in policy.actions(s) {
            let (next, r) = a.transition(s);
            let pi = policy.pi(a, s)?;
            let p = self.model.probability(&next, r, s, a)?;
            value += pi * p * (r.as_f64() + gamma * previous.value(&next)?);
        }
        Ok(value)
    }
}

/// Evaluate the model's policy to convergence without monitoring
pub fn evaluate_policy<S, A>(model: &Model<S, A>, theta: f64) -> Result<StateValue<S>>
where
    S: State,
    A: Transition<S>,
{
    PolicyEvaluator::new(model, theta)?.evaluate(&mut ())
}

/// Greedy actions for each state of a model, ties kept together
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyPolicy<S: State, A: Action> {
    actions: HashMap<S, Vec<A>>,
}

impl<S: State, A: Action> GreedyPolicy<S, A> {
    /// Greedy actions in `state`, empty for terminal or unknown states
    pub fn actions(&self, state: &S) -> &[A] {
        self.actions.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Render the action names of `states` as a matrix of `width` columns
    pub fn render(&self, states: &[S], width: usize) -> String {
        let rows: Vec<String> = states
            .chunks(width.max(1))
            .map(|row| {
                row.iter()
                    .map(|s| {
                        let names: Vec<String> = self.actions(s).iter().map(Action::name).collect();
                        if names.is_empty() {
                            format!("{:<12}", "-")
                        } else {
                            format!("{:<12}", names.join(","))
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        format!("[[{}]]", rows.join("]\n ["))
    }
}

/// Extract the greedy policy of converged state values.
///
/// Each legal action is scored by the value of the state it leads to; an
/// action leaving the state unchanged scores −∞. Every action tied at the
/// best score is kept, in the policy's action order.
pub fn extract_greedy_policy<S, A>(
    model: &Model<S, A>,
    values: &StateValue<S>,
) -> Result<GreedyPolicy<S, A>>
where
    S: State,
    A: Transition<S>,
{
    let mut actions = HashMap::with_capacity(model.states().len());

    for s in model.states() {
        if s.is_terminal() {
            actions.insert(s.clone(), Vec::new());
            continue;
        }

        let legal = model.policy().actions(s);
        let mut scores = Vec::with_capacity(legal.len());
        for a in legal {
            let (next, _) = a.transition(s);
            let score = if next == *s {
                f64::NEG_INFINITY
            } else {
                values.value(&next)?
            };
            scores.push(score);
        }

        let highest = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let greedy = legal
            .iter()
            .zip(scores)
            .filter(|(_, score)| *score == highest)
            .map(|(a, _)| a.clone())
            .collect();
        actions.insert(s.clone(), greedy);
    }

    Ok(GreedyPolicy { actions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array1};
    use rlbook_core::{Policy, Reward};

    /// Chain 0 <- 1 <- 2 <- 3 where 0 is terminal
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Link(i32);

    impl State for Link {
        fn is_terminal(&self) -> bool {
            self.0 == 0
        }

        fn vector(&self) -> Array1<f64> {
            arr1(&[f64::from(self.0)])
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Walk {
        Back,
        Stay,
    }

    impl Action for Walk {
        fn vector(&self) -> Array1<f64> {
            match self {
                Walk::Back => arr1(&[-1.0]),
                Walk::Stay => arr1(&[0.0]),
            }
        }
    }

    impl Transition<Link> for Walk {
        fn transition(&self, state: &Link) -> (Link, Reward) {
            match self {
                Walk::Back => (Link(state.0 - 1), Reward(-1.0)),
                Walk::Stay => (*state, Reward(-1.0)),
            }
        }
    }

    fn chain() -> Vec<Link> {
        (0..4).map(Link).collect()
    }

    #[test]
    fn test_deterministic_chain() {
        let policy = Policy::new(vec![Walk::Back], 1.0, |_, _| 1.0).unwrap();
        let model = Model::deterministic(chain(), policy).unwrap();

        let values = evaluate_policy(&model, 1e-9).unwrap();
        for i in 0..4 {
            assert_eq!(values.get(&Link(i)), Some(-f64::from(i)));
        }
    }

    #[test]
    fn test_discounted_chain() {
        let policy = Policy::uniform(vec![Walk::Back, Walk::Stay], 0.5).unwrap();
        let model = Model::deterministic(chain(), policy).unwrap();

        let values = evaluate_policy(&model, 1e-12).unwrap();
        // v(1) = 0.5 (-1 + 0.5 v(0)) + 0.5 (-1 + 0.5 v(1)) => v(1) = -4/3
        assert!((values.get(&Link(1)).unwrap() + 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(values.get(&Link(0)), Some(0.0));
    }

    #[test]
    fn test_stochastic_transition_probability() {
        let policy = Policy::new(vec![Walk::Back], 1.0, |_, _| 1.0).unwrap();
        let model = Model::new(vec![Link(0), Link(1)], policy, |_, _, _, _| 0.5).unwrap();

        let values = evaluate_policy(&model, 1e-12).unwrap();
        assert_eq!(values.get(&Link(1)), Some(-0.5));
    }

    #[test]
    fn test_per_state_actions() {
        let mut legal = HashMap::new();
        legal.insert(Link(1), vec![Walk::Back]);
        legal.insert(Link(2), vec![Walk::Back, Walk::Stay]);
        let policy = Policy::per_state(legal, 0.5, |_, s: &Link| if s.0 == 2 { 0.5 } else { 1.0 })
            .unwrap();
        let model = Model::deterministic(vec![Link(0), Link(1), Link(2)], policy).unwrap();

        let values = evaluate_policy(&model, 1e-12).unwrap();
        // v(2) = 0.5 (-1 + 0.5 v(1)) + 0.5 (-1 + 0.5 v(2)) with v(1) = -1
        assert_eq!(values.get(&Link(1)), Some(-1.0));
        assert!((values.get(&Link(2)).unwrap() + 5.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_theta() {
        let policy = Policy::new(vec![Walk::Back], 1.0, |_, _| 1.0).unwrap();
        let model = Model::deterministic(chain(), policy).unwrap();

        assert!(matches!(
            PolicyEvaluator::new(&model, -0.1),
            Err(RlError::InvalidTheta(_))
        ));
        assert!(matches!(
            PolicyEvaluator::new(&model, f64::NAN),
            Err(RlError::InvalidTheta(_))
        ));
    }

    #[test]
    fn test_sweep_cap() {
        // A self-loop with gamma = 1 never converges
        let policy = Policy::new(vec![Walk::Stay], 1.0, |_, _| 1.0).unwrap();
        let model = Model::deterministic(chain(), policy).unwrap();

        let mut evaluator = PolicyEvaluator::new(&model, 1e-6).unwrap().with_max_sweeps(25);
        let result = evaluator.evaluate(&mut ());

        assert!(matches!(result, Err(RlError::NotConverged { sweeps: 25, .. })));
        assert_eq!(evaluator.sweeps(), 25);
        assert_eq!(evaluator.values().get(&Link(0)), Some(0.0));
    }

    #[test]
    fn test_unknown_successor() {
        // Walking back from the first state leaves the declared state space
        let policy = Policy::new(vec![Walk::Back], 1.0, |_, _| 1.0).unwrap();
        let model = Model::deterministic(vec![Link(1), Link(2)], policy).unwrap();

        let result = evaluate_policy(&model, 1e-6);
        assert!(matches!(result, Err(RlError::UnknownState(_))));
    }

    #[test]
    fn test_malformed_policy_probability() {
        let policy = Policy::new(vec![Walk::Back], 1.0, |_, _| -0.5).unwrap();
        let model = Model::deterministic(chain(), policy).unwrap();

        let result = evaluate_policy(&model, 1e-6);
        assert_eq!(result.unwrap_err(), RlError::InvalidProbability(-0.5));
    }

    #[test]
    fn test_greedy_policy_avoids_self_loops() {
        let policy = Policy::uniform(vec![Walk::Back, Walk::Stay], 1.0).unwrap();
        let model = Model::deterministic(chain(), policy).unwrap();
        let values = StateValue::zeros(model.states());

        let greedy = extract_greedy_policy(&model, &values).unwrap();
        assert!(greedy.actions(&Link(0)).is_empty());
        for i in 1..4 {
            assert_eq!(greedy.actions(&Link(i)), &[Walk::Back]);
        }
        assert_eq!(greedy.len(), 4);
    }

    #[test]
    fn test_greedy_policy_render() {
        let policy = Policy::uniform(vec![Walk::Back, Walk::Stay], 1.0).unwrap();
        let model = Model::deterministic(chain(), policy).unwrap();
        let values = StateValue::zeros(model.states());

        let greedy = extract_greedy_policy(&model, &values).unwrap();
        let rendered = greedy.render(model.states(), 2);

        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("Back"));
        assert!(!rendered.contains("Stay"));
    }
}
