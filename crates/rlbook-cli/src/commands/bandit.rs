//! Simple bandit command

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use rlbook_core::{Action, Action1D, Arm};
use rlbook_rl::testbed::{root_reward, ten_arms, UniformTestbed};
use rlbook_rl::{BanditStats, LiveMonitor, RewardSource, SimpleBandit};

use crate::config::BanditConfig;

#[derive(Args, Debug)]
pub struct BanditArgs {
    /// Probability ɛ of taking a random action rather than the greedy one
    #[arg(short, long)]
    epsilon: Option<f64>,

    /// Stop after this many steps instead of waiting for Ctrl-C
    #[arg(short = 'n', long)]
    steps: Option<u64>,

    /// Seed of the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between two trials, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Use the ten-arm testbed paying `arm * U[0, 1)` instead of `v^(1/v)`
    #[arg(long)]
    uniform: bool,

    /// Print the final statistics as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: BanditArgs, config: &BanditConfig) -> Result<()> {
    let epsilon = args.epsilon.unwrap_or(config.epsilon);
    let steps = args.steps.or(config.steps);
    let seed = args.seed.or(config.seed);
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(config.step_delay_ms));

    if steps.is_none() {
        info!("Testing SimpleBandit (10-armed testbed agent)... (Press Ctrl^C to end)");
    }

    let stats = if args.uniform {
        let mut testbed = UniformTestbed::new(seeded_rng(seed.map(|s| s.wrapping_add(1))));
        let source = move |arm: &Arm| {
            pause(delay);
            testbed.reward(arm)
        };
        let arms = (1..=10).map(Arm).collect();
        drive(build(arms, epsilon, source, seed)?, steps).await?
    } else {
        let source = move |action: &Action1D| {
            pause(delay);
            root_reward(action)
        };
        drive(build(ten_arms(), epsilon, source, seed)?, steps).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

fn build<A, F>(
    actions: Vec<A>,
    epsilon: f64,
    source: F,
    seed: Option<u64>,
) -> rlbook_core::Result<SimpleBandit<A, F>>
where
    A: Action,
    F: RewardSource<A>,
{
    SimpleBandit::with_rng(actions, epsilon, source, seeded_rng(seed))
}

/// Run the bandit on a blocking thread until its budget is spent or Ctrl-C
async fn drive<A, F>(mut bandit: SimpleBandit<A, F>, steps: Option<u64>) -> Result<BanditStats>
where
    A: Action + Send + 'static,
    F: RewardSource<A> + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let mut worker = tokio::task::spawn_blocking(move || -> rlbook_core::Result<BanditStats> {
        let mut monitor = LiveMonitor::new("reward");
        let mut taken = 0;
        while !flag.load(Ordering::Relaxed) && steps.map_or(true, |n| taken < n) {
            bandit.step(&mut monitor)?;
            taken += 1;
        }
        Ok(bandit.stats())
    });

    let stats = loop {
        tokio::select! {
            result = &mut worker => break result??,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Stopping bandit...");
                stop.store(true, Ordering::Relaxed);
            }
        }
    };

    Ok(stats)
}

fn print_stats(stats: &BanditStats) {
    println!();
    println!("Simple bandit");
    println!("=============");
    println!("Steps:          {}", stats.steps);
    println!("Explorations:   {}", stats.explorations);
    println!("Epsilon:        {}", stats.epsilon);
    println!("Average reward: {:.6}", stats.average_reward);
    println!();
    println!("{:<24} {:>12} {:>10}", "ACTION", "ESTIMATE", "VISITS");
    for estimate in &stats.estimates {
        println!(
            "{:<24} {:>12.6} {:>10}",
            estimate.action, estimate.value, estimate.visits
        );
    }
}
