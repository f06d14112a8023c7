//! CLI subcommands

pub mod bandit;
pub mod config;
pub mod evaluate;
