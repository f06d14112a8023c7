//! rlbook RL - Reinforcement Learning algorithms
//!
//! This crate provides the textbook algorithms built on `rlbook-core`:
//! the epsilon-greedy simple bandit and iterative policy evaluation,
//! plus the demonstration environments they are exercised on.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod bandit;
pub mod evaluation;
pub mod gridworld;
pub mod monitor;
pub mod testbed;

pub use bandit::{ActionValues, BanditStats, RewardSource, SimpleBandit, Stateless, Step};
pub use evaluation::{evaluate_policy, extract_greedy_policy, GreedyPolicy, PolicyEvaluator};
pub use gridworld::{Cell, Direction, GridWorld, Move};
pub use monitor::{LiveMonitor, RewardMonitor, SweepMonitor};
