use grid_util::point::Point;
use std::f32::consts::SQRT_2;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_WALL_PROBABILITY};

/// Step cost and heuristic used by a search. Fixed for the lifetime of a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CostModel {
    /// Every move costs 1, diagonals included, and the heuristic is the
    /// [Chebyshev distance](https://en.wikipedia.org/wiki/Chebyshev_distance).
    /// Consistent, so returned paths have the minimal number of moves.
    #[default]
    Chebyshev,
    /// Straight moves cost 1 and diagonal moves cost √2, with the
    /// Euclidean distance as heuristic. Consistent.
    Euclidean,
    /// Every move costs 1 but the heuristic is the Euclidean distance. This
    /// overestimates along diagonals, so paths are not guaranteed to be
    /// shortest.
    UnitStepEuclidean,
}

impl CostModel {
    /// Cost of moving between two adjacent cells.
    pub fn step_cost(&self, from: &Point, to: &Point) -> f32 {
        match self {
            CostModel::Euclidean if from.x != to.x && from.y != to.y => SQRT_2,
            _ => 1.0,
        }
    }

    /// Estimated remaining cost from `p` to `goal`.
    pub fn heuristic(&self, p: &Point, goal: &Point) -> f32 {
        match self {
            CostModel::Chebyshev => p.move_distance(goal) as f32,
            CostModel::Euclidean | CostModel::UnitStepEuclidean => {
                let dx = (p.x - goal.x) as f32;
                let dy = (p.y - goal.y) as f32;
                dx.hypot(dy)
            }
        }
    }
}

impl FromStr for CostModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chebyshev" => Ok(CostModel::Chebyshev),
            "euclidean" => Ok(CostModel::Euclidean),
            "unit-step-euclidean" | "unit_step_euclidean" => Ok(CostModel::UnitStepEuclidean),
            other => Err(format!("unknown cost model '{other}'")),
        }
    }
}

/// Parameters for building a [Grid](crate::Grid).
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub cols: usize,
    pub rows: usize,
    /// Probability that a cell other than start or goal is a wall.
    /// Default: 0.4
    pub wall_probability: f64,
    /// Defaults to the top-left corner.
    pub start: Option<Point>,
    /// Defaults to the bottom-right corner.
    pub goal: Option<Point>,
    /// Seed for wall generation. `None` draws from entropy.
    pub seed: Option<u64>,
    pub cost_model: CostModel,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            wall_probability: DEFAULT_WALL_PROBABILITY,
            start: None,
            goal: None,
            seed: None,
            cost_model: CostModel::default(),
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, cols: usize, rows: usize) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    pub fn with_wall_probability(mut self, probability: f64) -> Self {
        self.wall_probability = probability;
        self
    }

    pub fn with_start(mut self, start: Point) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_goal(mut self, goal: Point) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn start_point(&self) -> Point {
        self.start.unwrap_or_else(|| Point::new(0, 0))
    }

    /// Falls back to the bottom-right corner. Only meaningful for non-empty grids.
    pub fn goal_point(&self) -> Point {
        self.goal.unwrap_or_else(|| {
            Point::new(
                self.cols.saturating_sub(1) as i32,
                self.rows.saturating_sub(1) as i32,
            )
        })
    }

    /// Checks dimensions, endpoints and wall probability.
    pub fn validate(&self) -> Result<()> {
        validate_layout(self.cols, self.rows, &self.start_point(), &self.goal_point())?;
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(Error::InvalidWallProbability(self.wall_probability));
        }
        Ok(())
    }
}

pub(crate) fn validate_layout(cols: usize, rows: usize, start: &Point, goal: &Point) -> Result<()> {
    if cols == 0 || rows == 0 || cols > i32::MAX as usize || rows > i32::MAX as usize {
        return Err(Error::InvalidDimensions { cols, rows });
    }
    for point in [start, goal] {
        if point.x < 0 || point.y < 0 || point.x as usize >= cols || point.y as usize >= rows {
            return Err(Error::OutOfBounds {
                point: *point,
                cols,
                rows,
            });
        }
    }
    Ok(())
}
