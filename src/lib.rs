//! # grid_astar
//!
//! Step-by-step [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search on a fixed-size
//! grid with randomly placed walls. Moves go to any of the 8 neighbouring cells. Instead of
//! returning a path in one call, the [SearchEngine] expands a single node per
//! [step](SearchEngine::step), and the open set, closed set and current best path can be
//! inspected in between, which is what a visualization needs to draw the search as it runs.
//!
//! ```
//! use grid_astar::{Grid, GridConfig, SearchEngine, SearchStatus};
//!
//! let config = GridConfig::new().with_size(20, 20).with_seed(1);
//! let mut engine = SearchEngine::new(Grid::from_config(&config).unwrap());
//! while !engine.step().is_terminal() {
//!     let _frontier = engine.open_set().count();
//! }
//! if let SearchStatus::Succeeded(path) = engine.status() {
//!     assert_eq!(path.first(), Some(&engine.grid().start()));
//! }
//! ```
mod config;
mod driver;
mod error;
mod grid;
mod node;
mod search;

pub use crate::config::{CostModel, GridConfig};
pub use crate::driver::{Renderer, StepDriver, TextRenderer};
pub use crate::error::{Error, Result};
pub use crate::grid::Grid;
pub use crate::node::Node;
pub use crate::search::{CellState, SearchEngine, SearchSnapshot, SearchStatus};
pub use grid_util::point::Point;

use itertools::Itertools;

pub const DEFAULT_COLS: usize = 50;
pub const DEFAULT_ROWS: usize = 50;
pub const DEFAULT_WALL_PROBABILITY: f64 = 0.4;

/// Checks that consecutive points of a path are distinct Moore neighbours.
pub fn is_connected_path(path: &[Point]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| a.move_distance(b) == 1)
}

/// Sums the step costs along a path under the given cost model.
pub fn path_cost(path: &[Point], cost_model: CostModel) -> f32 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| cost_model.step_cost(a, b))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_paths() {
        let path = [Point::new(0, 0), Point::new(1, 1), Point::new(1, 2)];
        assert!(is_connected_path(&path));
        assert!(is_connected_path(&path[..1]));
        assert!(!is_connected_path(&[Point::new(0, 0), Point::new(2, 0)]));
        assert!(!is_connected_path(&[Point::new(0, 0), Point::new(0, 0)]));
    }

    #[test]
    fn path_costs() {
        let path = [Point::new(0, 0), Point::new(1, 1), Point::new(1, 2)];
        assert_eq!(path_cost(&path, CostModel::Chebyshev), 2.0);
        assert_eq!(
            path_cost(&path, CostModel::Euclidean),
            std::f32::consts::SQRT_2 + 1.0
        );
        assert_eq!(path_cost(&path[..1], CostModel::Euclidean), 0.0);
    }
}
