use core::fmt;
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{validate_layout, CostModel, GridConfig};
use crate::error::{Error, Result};
use crate::node::Node;

/// Neighbour offsets in linking order: the four cardinal moves first, then the diagonals.
/// This order decides which of several equally cheap frontier nodes a search expands first.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// [Grid] owns one [Node] per cell together with the start, goal and cost model of the search
/// that will run on it. Its topology is fixed once built: walls never change and every node's
/// neighbour list is computed during construction.
/// Free cells are also grouped into 8-connected components using a [UnionFind] structure,
/// which allows answering reachability queries without searching.
#[derive(Clone, Debug)]
pub struct Grid {
    cols: usize,
    rows: usize,
    nodes: Vec<Node>,
    start: Point,
    goal: Point,
    cost_model: CostModel,
    components: UnionFind<usize>,
}

impl Grid {
    /// Builds a grid with randomly placed walls as described by `config`, seeding from
    /// [GridConfig::seed] when present.
    pub fn from_config(config: &GridConfig) -> Result<Grid> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::random(config, &mut rng)
    }

    /// Builds a grid with walls sampled from `rng`. Every cell is a wall with probability
    /// [GridConfig::wall_probability], except start and goal which are always free.
    pub fn random<R: Rng>(config: &GridConfig, rng: &mut R) -> Result<Grid> {
        config.validate()?;
        let (start, goal) = (config.start_point(), config.goal_point());
        let p = config.wall_probability;
        let walls = (0..config.cols * config.rows)
            .map(|_| rng.gen_bool(p))
            .collect::<Vec<bool>>();
        let grid = Self::build(config.cols, config.rows, start, goal, config.cost_model, |ix| {
            walls[ix]
        });
        info!(
            "Generated {}x{} grid with {} walls (p = {})",
            grid.cols,
            grid.rows,
            grid.wall_count(),
            p
        );
        Ok(grid)
    }

    /// Builds a grid with walls at exactly the given points. Walls on start or goal are ignored.
    pub fn from_walls<I>(
        cols: usize,
        rows: usize,
        start: Point,
        goal: Point,
        cost_model: CostModel,
        walls: I,
    ) -> Result<Grid>
    where
        I: IntoIterator<Item = Point>,
    {
        validate_layout(cols, rows, &start, &goal)?;
        let mut blocked = vec![false; cols * rows];
        for wall in walls {
            if !in_bounds(cols, rows, &wall) {
                return Err(Error::OutOfBounds {
                    point: wall,
                    cols,
                    rows,
                });
            }
            blocked[wall.y as usize * cols + wall.x as usize] = true;
        }
        Ok(Self::build(cols, rows, start, goal, cost_model, |ix| {
            blocked[ix]
        }))
    }

    /// Two passes: every node is allocated before any neighbour list is linked.
    fn build<F>(
        cols: usize,
        rows: usize,
        start: Point,
        goal: Point,
        cost_model: CostModel,
        is_wall: F,
    ) -> Grid
    where
        F: Fn(usize) -> bool,
    {
        let mut nodes = Vec::with_capacity(cols * rows);
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                let point = Point::new(x, y);
                let wall = point != start && point != goal && is_wall(nodes.len());
                nodes.push(Node::new(point, wall));
            }
        }
        for node in nodes.iter_mut() {
            let p = node.point;
            node.neighbors = NEIGHBOR_OFFSETS
                .iter()
                .map(|&(dx, dy)| Point::new(p.x + dx, p.y + dy))
                .filter(|n| in_bounds(cols, rows, n))
                .collect();
        }
        let components = generate_components(&nodes, cols);
        Grid {
            cols,
            rows,
            nodes,
            start,
            goal,
            cost_model,
            components,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn goal(&self) -> Point {
        self.goal
    }
    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }
    pub fn in_bounds(&self, point: &Point) -> bool {
        in_bounds(self.cols, self.rows, point)
    }
    pub fn node(&self, point: &Point) -> Option<&Node> {
        self.in_bounds(point).then(|| &self.nodes[self.ix(point)])
    }
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
    /// Out-of-bounds points count as walls.
    pub fn is_wall(&self, point: &Point) -> bool {
        self.node(point).map_or(true, |n| n.wall)
    }
    pub fn wall_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.wall).count()
    }
    /// Neighbours of `point` that are not walls.
    pub fn open_neighbors(&self, point: &Point) -> impl Iterator<Item = Point> + '_ {
        self.node(point)
            .into_iter()
            .flat_map(|n| n.neighbors.iter().copied())
            .filter(move |n| !self.nodes[self.ix(n)].wall)
    }
    /// Checks if two free cells are on the same connected component.
    pub fn reachable(&self, a: &Point, b: &Point) -> bool {
        if self.is_wall(a) || self.is_wall(b) {
            return false;
        }
        self.components.equiv(self.ix(a), self.ix(b))
    }

    pub(crate) fn ix(&self, point: &Point) -> usize {
        point.y as usize * self.cols + point.x as usize
    }
    pub(crate) fn node_mut(&mut self, point: &Point) -> &mut Node {
        let ix = self.ix(point);
        &mut self.nodes[ix]
    }
    pub(crate) fn reset_costs(&mut self) {
        self.nodes.iter_mut().for_each(Node::reset);
    }
}

/// Generates a [UnionFind] structure linking up free neighbouring cells into the same component.
fn generate_components(nodes: &[Node], cols: usize) -> UnionFind<usize> {
    let mut components = UnionFind::new(nodes.len());
    for (ix, node) in nodes.iter().enumerate().filter(|(_, n)| !n.wall) {
        for n in &node.neighbors {
            let n_ix = n.y as usize * cols + n.x as usize;
            if !nodes[n_ix].wall {
                components.union(ix, n_ix);
            }
        }
    }
    components
}

fn in_bounds(cols: usize, rows: usize, point: &Point) -> bool {
    point.x >= 0 && point.y >= 0 && (point.x as usize) < cols && (point.y as usize) < rows
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.nodes.chunks(self.cols) {
            for node in row {
                let c = if node.point == self.start {
                    'S'
                } else if node.point == self.goal {
                    'G'
                } else if node.wall {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(cols: usize, rows: usize) -> Grid {
        let goal = Point::new(cols as i32 - 1, rows as i32 - 1);
        Grid::from_walls(cols, rows, Point::new(0, 0), goal, CostModel::Chebyshev, [])
            .unwrap()
    }

    #[test]
    fn rejects_invalid_dimensions() {
        let config = GridConfig::new().with_size(0, 0);
        assert!(matches!(
            Grid::from_config(&config),
            Err(Error::InvalidDimensions { .. })
        ));
        let walls = Grid::from_walls(
            3,
            3,
            Point::new(0, 0),
            Point::new(2, 2),
            CostModel::Chebyshev,
            [Point::new(5, 5)],
        );
        assert!(matches!(walls, Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn neighbour_counts() {
        let grid = open_grid(4, 3);
        assert_eq!(grid.node(&Point::new(0, 0)).unwrap().neighbors().len(), 3);
        assert_eq!(grid.node(&Point::new(1, 0)).unwrap().neighbors().len(), 5);
        assert_eq!(grid.node(&Point::new(1, 1)).unwrap().neighbors().len(), 8);
        assert_eq!(grid.node(&Point::new(3, 2)).unwrap().neighbors().len(), 3);
        for node in grid.nodes() {
            for n in node.neighbors() {
                assert!(grid.in_bounds(n));
                assert_eq!(node.point().move_distance(n), 1);
            }
        }
    }

    #[test]
    fn single_cell_has_no_neighbours() {
        let grid = Grid::from_walls(
            1,
            1,
            Point::new(0, 0),
            Point::new(0, 0),
            CostModel::Chebyshev,
            [],
        )
        .unwrap();
        assert!(grid.node(&Point::new(0, 0)).unwrap().neighbors().is_empty());
    }

    #[test]
    fn endpoints_are_never_walls() {
        let config = GridConfig::new()
            .with_size(6, 5)
            .with_wall_probability(1.0)
            .with_seed(3);
        let grid = Grid::from_config(&config).unwrap();
        assert!(!grid.is_wall(&grid.start()));
        assert!(!grid.is_wall(&grid.goal()));
        assert_eq!(grid.wall_count(), 6 * 5 - 2);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = GridConfig::new().with_size(20, 20).with_seed(42);
        let a = Grid::from_config(&config).unwrap();
        let b = Grid::from_config(&config).unwrap();
        assert_eq!(a.to_string(), b.to_string());
        assert!(a.wall_count() > 0);
        let empty = Grid::from_config(&config.with_wall_probability(0.0)).unwrap();
        assert_eq!(empty.wall_count(), 0);
    }

    /// Corresponds to the following grid, where the right column is cut off:
    ///  ___
    /// |S #.|
    /// |  #G|
    ///  ___
    #[test]
    fn component_generation() {
        let grid = Grid::from_walls(
            4,
            2,
            Point::new(0, 0),
            Point::new(3, 1),
            CostModel::Chebyshev,
            [Point::new(2, 0), Point::new(2, 1)],
        )
        .unwrap();
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(1, 1)));
        assert!(grid.reachable(&Point::new(3, 0), &Point::new(3, 1)));
        assert!(!grid.reachable(&Point::new(0, 0), &Point::new(3, 1)));
        assert!(!grid.reachable(&Point::new(0, 0), &Point::new(2, 0)));
    }

    #[test]
    fn diagonal_gap_connects() {
        //  __
        // |S#|
        // |#G|
        //  __
        let grid = Grid::from_walls(
            2,
            2,
            Point::new(0, 0),
            Point::new(1, 1),
            CostModel::Chebyshev,
            [Point::new(1, 0), Point::new(0, 1)],
        )
        .unwrap();
        assert!(grid.reachable(&grid.start(), &grid.goal()));
        assert_eq!(grid.open_neighbors(&grid.start()).collect::<Vec<_>>(), vec![Point::new(1, 1)]);
        assert_eq!(grid.to_string(), "S#\n#G\n");
    }

    /// Checks the components against a flood fill from the start over free neighbours.
    #[test]
    fn components_match_flood_fill() {
        let config = GridConfig::new()
            .with_size(16, 12)
            .with_wall_probability(0.45)
            .with_seed(9);
        let grid = Grid::from_config(&config).unwrap();
        let start = grid.start();
        let mut seen = vec![false; 16 * 12];
        seen[grid.ix(&start)] = true;
        let mut stack = vec![start];
        while let Some(p) = stack.pop() {
            for n in grid.open_neighbors(&p) {
                let ix = grid.ix(&n);
                if !seen[ix] {
                    seen[ix] = true;
                    stack.push(n);
                }
            }
        }
        for node in grid.nodes() {
            let p = node.point();
            assert_eq!(grid.reachable(&start, &p), seen[grid.ix(&p)]);
        }
    }
}
