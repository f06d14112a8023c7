//! rlbook Core - States, actions, policies and models
//!
//! This crate provides the abstractions shared by every rlbook algorithm:
//! scalar value/reward primitives, the `Action` and `State` capability
//! traits, policies, finite MDP models and the randomized argmax utility.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_precision_loss)]

pub mod action;
pub mod error;
pub mod model;
pub mod policy;
pub mod state;
pub mod types;
pub mod util;

pub use action::{Action, Action1D, Action2D, Action3D, Action4D, Arm, Transition};
pub use error::{Result, RlError};
pub use model::{Model, ProbabilityFn};
pub use policy::{ActionSet, Policy, PolicyFn};
pub use state::{State, StateValue};
pub use types::{Reward, Value};
pub use util::{argmax, pick, random_from};
