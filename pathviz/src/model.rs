//! The session controller: a phase machine between user input and the
//! traversal engine.
//!
//! Left-drag paints walls, right-click places the single target, space
//! starts the search, `r` resets, `q` / escape quits. While searching, one
//! expansion step runs per tick; the caption follows every phase change.

use tilegrid_core::{
    Point, Tile, TileGrid,
    app::{Effect, Model},
    messages::{Key, MouseAction, Msg},
};
use tilegrid_search::{Board, BoardError, CellId, SearchState, Traversal};

use crate::colors;
use crate::config::Config;

/// Application title, also the caption prefix.
pub const TITLE: &str = "Pathviz";

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepting walls and a target; the search has not started.
    Idle,
    /// One expansion step per tick.
    Searching,
    /// Terminal: the target was reached.
    Found { distance: usize },
    /// Terminal: the frontier ran dry.
    NoSolution,
}

impl Phase {
    /// Whether walls may still be painted.
    #[inline]
    fn allows_painting(self) -> bool {
        matches!(self, Self::Idle | Self::Searching)
    }
}

// ---------------------------------------------------------------------------
// VizModel
// ---------------------------------------------------------------------------

/// The visualizer session.
pub struct VizModel {
    columns: i32,
    rows: i32,
    board: Board,
    traversal: Traversal,
    target: Option<CellId>,
    phase: Phase,
    /// Primary button held: painting continues across cursor moves.
    paint_held: bool,
    /// Secondary button held: the target drops on the next cell reached.
    target_held: bool,
}

impl VizModel {
    /// Create a session for the configured grid.
    pub fn new(config: &Config) -> Result<Self, BoardError> {
        let board = Board::new(config.columns, config.rows)?;
        let traversal = Traversal::new(&board);
        Ok(Self {
            columns: config.columns,
            rows: config.rows,
            board,
            traversal,
            target: None,
            phase: Phase::Idle,
            paint_held: false,
            target_held: false,
        })
    }

    /// Current session phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Discard the board and all traversal state, returning to a fresh
    /// `Idle` session.
    fn reset(&mut self) -> Effect {
        // Dimensions were validated when the session was created.
        self.board = Board::new(self.columns, self.rows)
            .expect("dimensions validated at construction");
        self.traversal = Traversal::new(&self.board);
        self.target = None;
        self.phase = Phase::Idle;
        log::info!("session reset to {}x{}", self.columns, self.rows);
        Effect::Status(TITLE.into())
    }

    fn caption(&self, text: &str) -> Effect {
        Effect::Status(format!("{TITLE} - {text}"))
    }

    fn begin_search(&mut self) -> Option<Effect> {
        if self.phase != Phase::Idle || self.target.is_none() {
            return None;
        }
        self.phase = Phase::Searching;
        Some(self.caption("Searching..."))
    }

    fn paint(&mut self, pos: Point) {
        if self.phase.allows_painting() {
            // Rejections (start, target, out of bounds) are silent no-ops.
            self.board.paint_wall(pos);
        }
    }

    fn place_target(&mut self, pos: Point) {
        if self.target.is_none() {
            self.target = self.board.set_target(pos);
        }
    }

    fn on_mouse(&mut self, action: MouseAction, pos: Point) {
        match action {
            MouseAction::Main => {
                self.paint_held = true;
                self.paint(pos);
            }
            MouseAction::Secondary => {
                self.target_held = true;
                self.place_target(pos);
            }
            MouseAction::Release => {
                self.paint_held = false;
                self.target_held = false;
            }
            MouseAction::Move => {
                if self.paint_held {
                    self.paint(pos);
                }
                if self.target_held {
                    self.place_target(pos);
                }
            }
            MouseAction::Auxiliary => {}
        }
    }

    fn on_tick(&mut self) -> Option<Effect> {
        if self.phase != Phase::Searching {
            return None;
        }
        let target = self.target?;
        match self.traversal.advance(&mut self.board, target) {
            SearchState::Searching => None,
            SearchState::Found { distance } => {
                self.phase = Phase::Found { distance };
                log::info!("path found, distance {distance}");
                Some(self.caption(&format!("Path Found! Distance: {distance}")))
            }
            SearchState::NoSolution => {
                self.phase = Phase::NoSolution;
                log::info!("frontier exhausted, no path to target");
                Some(self.caption("No Solution Found"))
            }
        }
    }
}

impl Model for VizModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => Some(Effect::Status(TITLE.into())),
            Msg::KeyDown { key, .. } => match key {
                Key::Char('r') => Some(self.reset()),
                Key::Space => self.begin_search(),
                Key::Char('q') | Key::Escape => Some(Effect::End),
                _ => None,
            },
            Msg::Mouse { action, pos, .. } => {
                self.on_mouse(action, pos);
                None
            }
            Msg::Tick { .. } => self.on_tick(),
            Msg::Quit => Some(Effect::End),
            Msg::Screen { .. } => None,
        }
    }

    fn draw(&self, grid: &mut TileGrid) {
        // Traversal trail first.
        for p in self.board.bounds().iter() {
            let Some(cell) = self.board.cell_at(p) else {
                continue;
            };
            let mut color = colors::BOX;
            if cell.queued {
                color = colors::QUEUED;
            }
            if cell.visited {
                color = colors::VISITED;
            }
            grid.set(p, Tile::new(color));
        }

        // Final path overdraws the trail.
        for &id in self.traversal.path() {
            grid.set(self.board.cell(id).pos(), Tile::new(colors::PATH));
        }

        // Role markers overdraw everything.
        for p in self.board.bounds().iter() {
            let Some(cell) = self.board.cell_at(p) else {
                continue;
            };
            if cell.start {
                grid.set(p, Tile::new(colors::START));
            }
            if cell.wall {
                grid.set(p, Tile::new(colors::WALL));
            }
            if cell.target {
                grid.set(p, Tile::new(colors::TARGET));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(columns: i32, rows: i32) -> Config {
        Config {
            columns,
            rows,
            ..Config::default()
        }
    }

    fn model(columns: i32, rows: i32) -> VizModel {
        VizModel::new(&config(columns, rows)).unwrap()
    }

    fn status_text(effect: Option<Effect>) -> Option<String> {
        match effect {
            Some(Effect::Status(s)) => Some(s),
            _ => None,
        }
    }

    fn press(m: &mut VizModel, key: Key) -> Option<Effect> {
        m.update(Msg::key(key))
    }

    fn mouse(m: &mut VizModel, action: MouseAction, x: i32, y: i32) {
        m.update(Msg::mouse(action, Point::new(x, y)));
    }

    fn wall_count(m: &VizModel) -> usize {
        m.board
            .bounds()
            .iter()
            .filter(|&p| m.board.cell_at(p).is_some_and(|c| c.wall))
            .count()
    }

    /// Tick until a terminal phase, bounded by the board size.
    fn run_to_end(m: &mut VizModel) -> Option<String> {
        let mut last = None;
        for _ in 0..=m.board.len() {
            if let Some(s) = status_text(m.update(Msg::tick())) {
                last = Some(s);
            }
            if !matches!(m.phase(), Phase::Searching) {
                return last;
            }
        }
        panic!("search did not terminate");
    }

    #[test]
    fn init_emits_title() {
        let mut m = model(3, 3);
        assert_eq!(status_text(m.update(Msg::Init)).as_deref(), Some("Pathviz"));
    }

    #[test]
    fn begin_requires_target() {
        let mut m = model(3, 3);
        assert!(press(&mut m, Key::Space).is_none());
        assert_eq!(m.phase(), Phase::Idle);

        mouse(&mut m, MouseAction::Secondary, 2, 2);
        let status = status_text(press(&mut m, Key::Space));
        assert_eq!(status.as_deref(), Some("Pathviz - Searching..."));
        assert_eq!(m.phase(), Phase::Searching);
    }

    #[test]
    fn search_finds_path_and_reports_distance() {
        let mut m = model(3, 1);
        mouse(&mut m, MouseAction::Secondary, 2, 0);
        press(&mut m, Key::Space);
        let status = run_to_end(&mut m);
        assert_eq!(m.phase(), Phase::Found { distance: 1 });
        assert_eq!(status.as_deref(), Some("Pathviz - Path Found! Distance: 1"));
    }

    #[test]
    fn enclosed_target_reports_no_solution() {
        let mut m = model(3, 3);
        // Box in the corner target.
        mouse(&mut m, MouseAction::Main, 1, 2);
        mouse(&mut m, MouseAction::Move, 2, 1);
        mouse(&mut m, MouseAction::Release, 2, 1);
        mouse(&mut m, MouseAction::Secondary, 2, 2);
        press(&mut m, Key::Space);
        let status = run_to_end(&mut m);
        assert_eq!(m.phase(), Phase::NoSolution);
        assert_eq!(status.as_deref(), Some("Pathviz - No Solution Found"));
        assert!(m.traversal.path().is_empty());
    }

    #[test]
    fn painting_is_continuous_while_held() {
        let mut m = model(5, 5);
        mouse(&mut m, MouseAction::Main, 1, 1);
        mouse(&mut m, MouseAction::Move, 2, 1);
        mouse(&mut m, MouseAction::Move, 3, 1);
        assert_eq!(wall_count(&m), 3);

        // After release, moves paint nothing.
        mouse(&mut m, MouseAction::Release, 3, 1);
        mouse(&mut m, MouseAction::Move, 4, 1);
        assert_eq!(wall_count(&m), 3);
    }

    #[test]
    fn painting_stops_in_terminal_phase() {
        let mut m = model(2, 1);
        mouse(&mut m, MouseAction::Secondary, 1, 0);
        press(&mut m, Key::Space);
        run_to_end(&mut m);
        assert!(matches!(m.phase(), Phase::Found { .. }));

        mouse(&mut m, MouseAction::Main, 0, 0);
        mouse(&mut m, MouseAction::Move, 1, 0);
        assert_eq!(wall_count(&m), 0);
    }

    #[test]
    fn target_is_set_at_most_once() {
        let mut m = model(4, 4);
        mouse(&mut m, MouseAction::Secondary, 2, 2);
        mouse(&mut m, MouseAction::Release, 2, 2);
        mouse(&mut m, MouseAction::Secondary, 3, 3);
        let target = m.target.unwrap();
        assert_eq!(m.board.cell(target).pos(), Point::new(2, 2));
        assert!(!m.board.cell_at(Point::new(3, 3)).unwrap().target);
    }

    #[test]
    fn reset_is_idempotent_from_any_phase() {
        let mut m = model(4, 4);
        mouse(&mut m, MouseAction::Main, 1, 0);
        mouse(&mut m, MouseAction::Release, 1, 0);
        mouse(&mut m, MouseAction::Secondary, 3, 3);
        press(&mut m, Key::Space);
        run_to_end(&mut m);

        for _ in 0..3 {
            let status = status_text(press(&mut m, Key::Char('r')));
            assert_eq!(status.as_deref(), Some("Pathviz"));
            assert_eq!(m.phase(), Phase::Idle);
            assert!(m.target.is_none());
            assert_eq!(wall_count(&m), 0);
            assert_eq!(m.traversal.frontier_len(), 1);
            let start = m.board.cell(m.board.start());
            assert!(start.visited && start.queued);
        }
    }

    #[test]
    fn quit_keys_end_the_session() {
        let mut m = model(2, 2);
        assert!(matches!(press(&mut m, Key::Char('q')), Some(Effect::End)));
        let mut m = model(2, 2);
        assert!(matches!(press(&mut m, Key::Escape), Some(Effect::End)));
        let mut m = model(2, 2);
        assert!(matches!(m.update(Msg::Quit), Some(Effect::End)));
    }

    #[test]
    fn draw_layers_colors() {
        let mut m = model(3, 1);
        mouse(&mut m, MouseAction::Secondary, 2, 0);
        press(&mut m, Key::Space);
        run_to_end(&mut m);

        let mut grid = TileGrid::new(3, 1);
        m.draw(&mut grid);
        assert_eq!(grid.at(Point::new(0, 0)).color, colors::START);
        assert_eq!(grid.at(Point::new(1, 0)).color, colors::PATH);
        assert_eq!(grid.at(Point::new(2, 0)).color, colors::TARGET);
    }

    #[test]
    fn draw_shows_trail_while_searching() {
        let mut m = model(3, 3);
        mouse(&mut m, MouseAction::Secondary, 2, 2);
        press(&mut m, Key::Space);
        // One step: the start is expanded, its neighbors are queued.
        m.update(Msg::tick());

        let mut grid = TileGrid::new(3, 3);
        m.draw(&mut grid);
        assert_eq!(grid.at(Point::new(1, 0)).color, colors::QUEUED);
        assert_eq!(grid.at(Point::new(0, 1)).color, colors::QUEUED);
        assert_eq!(grid.at(Point::new(1, 1)).color, colors::BOX);
    }
}
