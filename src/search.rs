//! Step-driven A* search. Each call to [SearchEngine::step] expands at most one node, so a
//! caller can observe the open set, closed set and best path after every expansion.
//!
//! The frontier is kept in insertion order and scanned linearly for the lowest `f`. Ties go
//! to the node that entered the frontier first, which together with the neighbour linking
//! order of [Grid] decides which of several equally cheap paths is returned.
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use log::{debug, info, trace, warn};
use smallvec::SmallVec;

use crate::grid::Grid;
use crate::node::Node;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Outcome of a search step.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchStatus {
    Running,
    /// The goal was selected from the frontier. Holds the path from start to goal.
    Succeeded(Vec<Point>),
    /// The frontier ran out before the goal was reached.
    Failed,
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchStatus::Running)
    }
}

/// How a cell appears to an observer between two steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Wall,
    /// Not discovered yet.
    Free,
    Open,
    Closed,
    /// On the final path.
    Path,
}

/// Owned copy of the search state between two steps.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchSnapshot {
    pub open: Vec<Point>,
    pub closed: Vec<Point>,
    /// Empty until the search succeeds.
    pub path: Vec<Point>,
    /// Best known path from start to `current`.
    pub partial_path: Vec<Point>,
    pub current: Option<Point>,
    pub status: SearchStatus,
    pub steps: usize,
}

/// Owns a [Grid] and the open and closed sets of an A* search over it.
#[derive(Clone, Debug)]
pub struct SearchEngine {
    grid: Grid,
    open: FxIndexSet<Point>,
    closed: FxIndexSet<Point>,
    current: Option<Point>,
    status: SearchStatus,
    steps: usize,
}

impl SearchEngine {
    /// Seeds the frontier with the start node of `grid`.
    pub fn new(grid: Grid) -> SearchEngine {
        let mut engine = SearchEngine {
            grid,
            open: FxIndexSet::default(),
            closed: FxIndexSet::default(),
            current: None,
            status: SearchStatus::Running,
            steps: 0,
        };
        engine.seed();
        engine
    }

    fn seed(&mut self) {
        let start = self.grid.start();
        let h = self
            .grid
            .cost_model()
            .heuristic(&start, &self.grid.goal());
        let node = self.grid.node_mut(&start);
        node.g = 0.0;
        node.h = h;
        node.f = h;
        node.previous = None;
        self.open.insert(start);
    }

    /// Clears all search state so the same grid can be searched again.
    pub fn restart(&mut self) {
        self.grid.reset_costs();
        self.open.clear();
        self.closed.clear();
        self.current = None;
        self.status = SearchStatus::Running;
        self.steps = 0;
        self.seed();
    }

    /// Advances the search by one expansion.
    ///
    /// Once the search has succeeded or failed, further calls change nothing and return the
    /// terminal status again.
    pub fn step(&mut self) -> SearchStatus {
        if self.status.is_terminal() {
            warn!("step() called on a finished search, returning last status");
            return self.status.clone();
        }
        self.steps += 1;

        let Some(current) = self.lowest_f() else {
            info!("Frontier exhausted after {} steps: no path", self.steps);
            self.status = SearchStatus::Failed;
            return SearchStatus::Failed;
        };
        self.current = Some(current);

        if current == self.grid.goal() {
            let path = self.path_to(&current);
            info!(
                "Reached {} after {} steps, path has {} nodes",
                current,
                self.steps,
                path.len()
            );
            self.status = SearchStatus::Succeeded(path);
            return self.status.clone();
        }

        self.open.shift_remove(&current);
        self.closed.insert(current);
        debug!("Expanding {} ({} open)", current, self.open.len());
        self.relax_neighbors(&current);
        SearchStatus::Running
    }

    /// First node of the frontier with the smallest `f`.
    fn lowest_f(&self) -> Option<Point> {
        let mut best: Option<(Point, f32)> = None;
        for p in &self.open {
            let f = self.grid.node(p).map_or(f32::INFINITY, |n| n.f);
            if best.map_or(true, |(_, best_f)| f < best_f) {
                best = Some((*p, f));
            }
        }
        best.map(|(p, _)| p)
    }

    fn relax_neighbors(&mut self, current: &Point) {
        let goal = self.grid.goal();
        let cost_model = self.grid.cost_model();
        let current_g = self.grid.node(current).map_or(0.0, Node::g);
        let successors = self
            .grid
            .open_neighbors(current)
            .filter(|n| !self.closed.contains(n))
            .collect::<SmallVec<[Point; 8]>>();

        for successor in successors {
            let tentative_g = current_g + cost_model.step_cost(current, &successor);
            if self.open.contains(&successor) {
                let node = self.grid.node_mut(&successor);
                // Only strict improvements may rewrite `previous`, which keeps the chain acyclic.
                if tentative_g < node.g {
                    trace!("Improved {} from {} to {}", successor, node.g, tentative_g);
                    node.g = tentative_g;
                    node.f = tentative_g + node.h;
                    node.previous = Some(*current);
                }
            } else {
                let h = cost_model.heuristic(&successor, &goal);
                let node = self.grid.node_mut(&successor);
                node.g = tentative_g;
                node.h = h;
                node.f = tentative_g + h;
                node.previous = Some(*current);
                trace!("Discovered {} with f = {}", successor, node.f);
                self.open.insert(successor);
            }
        }
    }

    /// Follows `previous` links back from `end` and returns the chain start-first.
    /// The walk is bounded by the number of cells.
    fn path_to(&self, end: &Point) -> Vec<Point> {
        let limit = self.grid.cols() * self.grid.rows();
        let mut path = std::iter::successors(Some(*end), |p| {
            self.grid.node(p).and_then(|n| n.previous)
        })
        .take(limit)
        .collect::<Vec<Point>>();
        debug_assert!(path.last() == Some(&self.grid.start()));
        path.reverse();
        path
    }

    /// Steps until the search succeeds or fails.
    pub fn solve(&mut self) -> SearchStatus {
        loop {
            let status = self.step();
            if status.is_terminal() {
                return status;
            }
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn status(&self) -> &SearchStatus {
        &self.status
    }
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
    /// Number of steps that changed the search state.
    pub fn steps(&self) -> usize {
        self.steps
    }
    /// Node selected by the most recent step.
    pub fn current(&self) -> Option<Point> {
        self.current
    }
    pub fn open_set(&self) -> impl Iterator<Item = &Point> {
        self.open.iter()
    }
    pub fn closed_set(&self) -> impl Iterator<Item = &Point> {
        self.closed.iter()
    }
    pub fn is_open(&self, point: &Point) -> bool {
        self.open.contains(point)
    }
    pub fn is_closed(&self, point: &Point) -> bool {
        self.closed.contains(point)
    }
    /// The final path, empty unless the search succeeded.
    pub fn path(&self) -> &[Point] {
        match &self.status {
            SearchStatus::Succeeded(path) => path.as_slice(),
            _ => &[],
        }
    }
    /// Best known path from start to the current node.
    pub fn partial_path(&self) -> Vec<Point> {
        self.current
            .map(|current| self.path_to(&current))
            .unwrap_or_default()
    }

    pub fn cell_state(&self, point: &Point) -> CellState {
        if self.grid.is_wall(point) {
            CellState::Wall
        } else if self.path().contains(point) {
            CellState::Path
        } else if self.closed.contains(point) {
            CellState::Closed
        } else if self.open.contains(point) {
            CellState::Open
        } else {
            CellState::Free
        }
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            open: self.open.iter().copied().collect(),
            closed: self.closed.iter().copied().collect(),
            path: self.path().to_vec(),
            partial_path: self.partial_path(),
            current: self.current,
            status: self.status.clone(),
            steps: self.steps,
        }
    }
}
