//! Iterative policy evaluation command

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use rlbook_core::{Action, Model, StateValue};
use rlbook_rl::{extract_greedy_policy, Cell, GreedyPolicy, GridWorld, LiveMonitor, Move, PolicyEvaluator};

use crate::config::EvaluationConfig;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Stop once a sweep changes no value by more than theta
    #[arg(short, long)]
    theta: Option<f64>,

    /// Discount factor
    #[arg(short, long)]
    gamma: Option<f64>,

    /// Give up after this many sweeps
    #[arg(long)]
    max_sweeps: Option<usize>,

    /// Side of the square grid, terminal cells sit in opposite corners
    #[arg(short, long, default_value_t = 4)]
    size: usize,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CellReport {
    x: i32,
    y: i32,
    value: f64,
    greedy: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    size: usize,
    theta: f64,
    gamma: f64,
    sweeps: usize,
    cells: Vec<CellReport>,
}

pub async fn run(args: EvaluateArgs, config: &EvaluationConfig) -> Result<()> {
    if args.size < 2 {
        bail!("Grid size must be at least 2, got {}", args.size);
    }

    let theta = args.theta.unwrap_or(config.theta);
    let gamma = args.gamma.unwrap_or(config.gamma);
    let max_sweeps = args.max_sweeps.or(config.max_sweeps);

    let last = args.size as i32 - 1;
    let grid = GridWorld::new(args.size, args.size, &[(0, 0), (last, last)]);
    let model = grid.equiprobable_model(gamma)?;

    info!("Testing IterativePolicyEvaluation (gridworld {0}x{0})...", args.size);

    let mut evaluator = PolicyEvaluator::new(&model, theta)?;
    if let Some(max) = max_sweeps {
        evaluator = evaluator.with_max_sweeps(max);
    }
    let mut monitor =
        LiveMonitor::new("state-value").with_display_sweeps(config.report_sweeps.clone());

    let values = evaluator.evaluate(&mut monitor)?;
    let greedy = extract_greedy_policy(&model, &values)?;

    if args.json {
        let report = EvaluationReport {
            size: args.size,
            theta,
            gamma,
            sweeps: evaluator.sweeps(),
            cells: report_cells(&model, &values, &greedy)?,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("Converged after {} sweeps", evaluator.sweeps());
        println!();
        println!("State values:");
        println!("{}", values.render(model.states(), grid.width()));
        println!();
        println!("Greedy policy:");
        println!("{}", greedy.render(model.states(), grid.width()));
    }

    Ok(())
}

fn report_cells(
    model: &Model<Cell, Move>,
    values: &StateValue<Cell>,
    greedy: &GreedyPolicy<Cell, Move>,
) -> Result<Vec<CellReport>> {
    model
        .states()
        .iter()
        .map(|cell| -> Result<CellReport> {
            Ok(CellReport {
                x: cell.x,
                y: cell.y,
                value: values.value(cell)?,
                greedy: greedy.actions(cell).iter().map(Action::name).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_cells_of_classic_grid() {
        let grid = GridWorld::classic();
        let model = grid.equiprobable_model(1.0).unwrap();
        let values = PolicyEvaluator::new(&model, 1e-10)
            .unwrap()
            .evaluate(&mut ())
            .unwrap();
        let greedy = extract_greedy_policy(&model, &values).unwrap();

        let cells = report_cells(&model, &values, &greedy).unwrap();
        assert_eq!(cells.len(), 16);

        assert_eq!(cells[0].value, 0.0);
        assert!(cells[0].greedy.is_empty());

        // (1, 0) sits next to the top-left terminal
        assert!((cells[1].value + 14.0).abs() < 1e-6);
        assert_eq!(cells[1].greedy, vec!["left".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_degenerate_grid() {
        let args = EvaluateArgs {
            theta: None,
            gamma: None,
            max_sweeps: None,
            size: 1,
            json: false,
        };

        assert!(run(args, &EvaluationConfig::default()).await.is_err());
    }
}
