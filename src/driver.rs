use fxhash::FxHashSet;
use grid_util::point::Point;
use log::info;
use std::io::Write;

use crate::error::Result;
use crate::grid::Grid;
use crate::search::{SearchEngine, SearchSnapshot, SearchStatus};

/// Receives the search state once per step. Implementations only draw; they never steer the
/// search.
pub trait Renderer {
    fn render(&mut self, grid: &Grid, snapshot: &SearchSnapshot) -> std::io::Result<()>;
}

/// Calls [SearchEngine::step] once per tick and hands every resulting snapshot to a [Renderer].
#[derive(Clone, Debug, Default)]
pub struct StepDriver {
    /// Stop after this many ticks even if the search is still running.
    pub max_steps: Option<usize>,
}

impl StepDriver {
    pub fn new() -> StepDriver {
        StepDriver::default()
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> StepDriver {
        self.max_steps = Some(max_steps);
        self
    }

    /// Drives `engine` until it terminates or the step budget runs out, in which case
    /// [SearchStatus::Running] is returned. The terminal tick is rendered as well.
    pub fn run<R: Renderer>(
        &self,
        engine: &mut SearchEngine,
        renderer: &mut R,
    ) -> Result<SearchStatus> {
        self.run_with(engine, renderer, |_| {})
    }

    /// Like [run](Self::run), calling `on_tick` after every rendered frame. Pacing such as
    /// sleeping between frames belongs there.
    pub fn run_with<R, F>(
        &self,
        engine: &mut SearchEngine,
        renderer: &mut R,
        mut on_tick: F,
    ) -> Result<SearchStatus>
    where
        R: Renderer,
        F: FnMut(&SearchSnapshot),
    {
        let mut ticks = 0;
        loop {
            if self.max_steps.map_or(false, |max| ticks >= max) {
                info!("Step budget of {} exhausted", ticks);
                return Ok(SearchStatus::Running);
            }
            let status = engine.step();
            ticks += 1;
            let snapshot = engine.snapshot();
            renderer.render(engine.grid(), &snapshot)?;
            on_tick(&snapshot);
            if status.is_terminal() {
                return Ok(status);
            }
        }
    }
}

/// Draws each frame as text: `#` wall, `o` open, `x` closed, `*` path, `S` and `G` for the
/// endpoints. While the search runs, the best path to the current node is drawn.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> TextRenderer<W> {
        TextRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, grid: &Grid, snapshot: &SearchSnapshot) -> std::io::Result<()> {
        let path = if snapshot.path.is_empty() {
            &snapshot.partial_path
        } else {
            &snapshot.path
        };
        let path = path.iter().copied().collect::<FxHashSet<Point>>();
        let open = snapshot.open.iter().copied().collect::<FxHashSet<Point>>();
        let closed = snapshot.closed.iter().copied().collect::<FxHashSet<Point>>();
        writeln!(self.out, "step {}: {}", snapshot.steps, describe(&snapshot.status))?;
        for y in 0..grid.rows() as i32 {
            let line = (0..grid.cols() as i32)
                .map(|x| {
                    let p = Point::new(x, y);
                    if p == grid.start() {
                        'S'
                    } else if p == grid.goal() {
                        'G'
                    } else if grid.is_wall(&p) {
                        '#'
                    } else if path.contains(&p) {
                        '*'
                    } else if open.contains(&p) {
                        'o'
                    } else if closed.contains(&p) {
                        'x'
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

fn describe(status: &SearchStatus) -> String {
    match status {
        SearchStatus::Running => "running".to_owned(),
        SearchStatus::Succeeded(path) => format!("done, {} moves", path.len().saturating_sub(1)),
        SearchStatus::Failed => "no solution".to_owned(),
    }
}
