use grid_util::point::Point;
use thiserror::Error;

/// Errors raised while building a [Grid](crate::Grid) or driving a search.
///
/// Running out of frontier is not an error: it is reported as
/// [SearchStatus::Failed](crate::SearchStatus::Failed).
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid dimensions {cols}x{rows}")]
    InvalidDimensions { cols: usize, rows: usize },

    #[error("{point} lies outside the {cols}x{rows} grid")]
    OutOfBounds { point: Point, cols: usize, rows: usize },

    #[error("wall probability {0} is not in [0, 1]")]
    InvalidWallProbability(f64),

    #[error("renderer failed: {0}")]
    Render(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
