use grid_util::point::Point;
use smallvec::SmallVec;

/// State of a single grid cell. Walls and neighbours are fixed when the grid is built;
/// the costs and the back-reference change while a search runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) point: Point,
    pub(crate) wall: bool,
    pub(crate) g: f32,
    pub(crate) h: f32,
    pub(crate) f: f32,
    pub(crate) previous: Option<Point>,
    pub(crate) neighbors: SmallVec<[Point; 8]>,
}

impl Node {
    pub(crate) fn new(point: Point, wall: bool) -> Node {
        Node {
            point,
            wall,
            g: 0.0,
            h: 0.0,
            f: 0.0,
            previous: None,
            neighbors: SmallVec::new(),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }
    pub fn is_wall(&self) -> bool {
        self.wall
    }
    /// Cost of the best known path from the start.
    pub fn g(&self) -> f32 {
        self.g
    }
    /// Heuristic estimate of the remaining cost to the goal.
    pub fn h(&self) -> f32 {
        self.h
    }
    pub fn f(&self) -> f32 {
        self.f
    }
    /// Predecessor on the best known path to this node.
    pub fn previous(&self) -> Option<Point> {
        self.previous
    }
    /// In-bounds Moore neighbours, walls included.
    pub fn neighbors(&self) -> &[Point] {
        &self.neighbors
    }

    pub(crate) fn reset(&mut self) {
        self.g = 0.0;
        self.h = 0.0;
        self.f = 0.0;
        self.previous = None;
    }
}
