//! Gridworld environment (Sutton & Barto, example 4.1)
//!
//! Cells of a rectangular grid, some of them terminal. Moving off the grid
//! leaves the agent in place; every move costs the same reward.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ndarray::{arr1, Array1};
use serde::{Deserialize, Serialize};

use rlbook_core::{Action, Model, Policy, Result, Reward, State, Transition};

/// A cell of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    terminal: bool,
}

impl State for Cell {
    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn vector(&self) -> Array1<f64> {
        arr1(&[f64::from(self.x), f64::from(self.y)])
    }
}

/// Direction of a move, `Up` decreasing `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

#[derive(Debug)]
struct Layout {
    width: i32,
    height: i32,
    terminals: Vec<(i32, i32)>,
    step_reward: f64,
}

impl Layout {
    fn contains(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    fn cell(&self, x: i32, y: i32) -> Cell {
        Cell {
            x,
            y,
            terminal: self.terminals.contains(&(x, y)),
        }
    }
}

/// A move on a given grid; moves are identified by their direction only
#[derive(Debug, Clone)]
pub struct Move {
    direction: Direction,
    layout: Arc<Layout>,
}

impl Move {
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.direction.hash(state);
    }
}

impl Action for Move {
    fn name(&self) -> String {
        self.direction.name().to_string()
    }

    fn vector(&self) -> Array1<f64> {
        let (dx, dy) = self.direction.delta();
        arr1(&[f64::from(dx), f64::from(dy)])
    }
}

impl Transition<Cell> for Move {
    fn transition(&self, state: &Cell) -> (Cell, Reward) {
        let (dx, dy) = self.direction.delta();
        let (x, y) = (state.x + dx, state.y + dy);
        let next = if self.layout.contains(x, y) {
            self.layout.cell(x, y)
        } else {
            *state
        };
        (next, Reward(self.layout.step_reward))
    }
}

/// Rectangular gridworld
#[derive(Debug, Clone)]
pub struct GridWorld {
    layout: Arc<Layout>,
}

impl GridWorld {
    /// Create a `width` x `height` grid with the given terminal cells and a
    /// reward of -1 per move
    pub fn new(width: usize, height: usize, terminals: &[(i32, i32)]) -> Self {
        Self {
            layout: Arc::new(Layout {
                width: width as i32,
                height: height as i32,
                terminals: terminals.to_vec(),
                step_reward: -1.0,
            }),
        }
    }

    /// The 4x4 grid whose top-left and bottom-right corners are terminal
    pub fn classic() -> Self {
        Self::new(4, 4, &[(0, 0), (3, 3)])
    }

    /// Change the reward received for every move
    pub fn with_step_reward(self, reward: f64) -> Self {
        Self {
            layout: Arc::new(Layout {
                width: self.layout.width,
                height: self.layout.height,
                terminals: self.layout.terminals.clone(),
                step_reward: reward,
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.layout.width as usize
    }

    pub fn height(&self) -> usize {
        self.layout.height as usize
    }

    /// Cell at column `x` and row `y`
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        self.layout.cell(x, y)
    }

    /// All cells, row by row
    pub fn states(&self) -> Vec<Cell> {
        (0..self.layout.height)
            .flat_map(|y| (0..self.layout.width).map(move |x| (x, y)))
            .map(|(x, y)| self.layout.cell(x, y))
            .collect()
    }

    /// The four moves: left, right, up and down
    pub fn moves(&self) -> Vec<Move> {
        Direction::ALL
            .iter()
            .map(|&direction| Move {
                direction,
                layout: Arc::clone(&self.layout),
            })
            .collect()
    }

    /// Deterministic model of the equiprobable random policy
    pub fn equiprobable_model(&self, gamma: f64) -> Result<Model<Cell, Move>> {
        let policy = Policy::uniform(self.moves(), gamma)?;
        Ok(Model::deterministic(self.states(), policy)?.with_grid_width(self.width()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout() {
        let grid = GridWorld::classic();
        let states = grid.states();

        assert_eq!(states.len(), 16);
        assert_eq!(states[1], grid.cell(1, 0));
        assert_eq!(states[4], grid.cell(0, 1));

        let terminals: Vec<&Cell> = states.iter().filter(|c| c.is_terminal()).collect();
        assert_eq!(terminals, vec![&grid.cell(0, 0), &grid.cell(3, 3)]);
    }

    #[test]
    fn test_moves_are_clipped() {
        let grid = GridWorld::classic();
        let moves = grid.moves();
        let corner = grid.cell(0, 1);

        let (next, reward) = moves[0].transition(&corner);
        assert_eq!(next, corner);
        assert_eq!(reward, Reward(-1.0));

        let (next, _) = moves[1].transition(&corner);
        assert_eq!(next, grid.cell(1, 1));

        let (next, _) = moves[2].transition(&corner);
        assert_eq!(next, grid.cell(0, 0));
        assert!(next.is_terminal());
    }

    #[test]
    fn test_move_identity() {
        let grid = GridWorld::classic();
        let other = GridWorld::new(5, 5, &[]);

        assert_eq!(grid.moves()[3], other.moves()[3]);
        assert_eq!(grid.moves()[3].name(), "down");
        assert_eq!(grid.moves()[0].vector().to_vec(), vec![-1.0, 0.0]);
    }

    #[test]
    fn test_step_reward() {
        let grid = GridWorld::classic().with_step_reward(-2.0);
        let (_, reward) = grid.moves()[1].transition(&grid.cell(1, 1));
        assert_eq!(reward, Reward(-2.0));
    }

    #[test]
    fn test_equiprobable_model() {
        let model = GridWorld::classic().equiprobable_model(1.0).unwrap();

        assert_eq!(model.states().len(), 16);
        assert_eq!(model.grid_width(), Some(4));
        assert_eq!(model.policy().actions(&model.states()[5]).len(), 4);
    }
}
