//! The frame-driven application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`], and the [`AppRunner`] used by event-loop-owning back-ends.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::messages::Msg;
use crate::recording::FrameEncoder;
use crate::tile::{Frame, TileGrid, compute_frame};

/// Target animation-frame interval (~60 Hz). One `Msg::Tick` is delivered
/// per elapsed interval, regardless of how fast input events arrive.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command that produces an optional follow-up message.
    Cmd(Box<dyn FnOnce() -> Option<Msg> + Send>),
    /// Multiple effects batched together.
    Batch(Vec<Effect>),
    /// Update the human-readable status caption (terminal or window title).
    Status(String),
    /// Signal the application loop to stop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::Batch(v) => f.debug_tuple("Effect::Batch").field(&v.len()).finish(),
            Self::Status(s) => f.debug_tuple("Effect::Status").field(s).finish(),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + Send + 'static,
{
    Effect::Cmd(Box::new(f))
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model.
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut TileGrid);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Polling back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`. May block for at
    /// most roughly one frame interval. The implementation should honour
    /// `ctx.is_done()` and return promptly when it becomes `true`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Update the status caption (terminal or window title).
    fn set_status(&mut self, status: &str);

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
    /// When set, every non-empty frame is appended to this writer through
    /// [`FrameEncoder`], producing a replayable recording of the session.
    pub frame_writer: Option<Box<dyn Write>>,
}

/// The main application runner for polling drivers.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
    encoder: Option<FrameEncoder<Box<dyn Write>>>,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
            encoder: config.frame_writer.map(FrameEncoder::new),
        }
    }

    /// Run the main loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Enters the loop: poll → inject one `Msg::Tick` → update → draw →
    ///    diff → flush.
    /// 4. Stops when the model returns `Effect::End` or the driver fails.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        let start = Instant::now();

        tx.send(Msg::Init).ok();
        self.process_pending(&rx, &ctx, &tx)?;

        let mut prev_grid = TileGrid::new(self.width, self.height);
        let mut curr_grid = TileGrid::new(self.width, self.height);
        let mut last_tick = Instant::now();

        while !ctx.is_done() {
            // The driver pushes pending input into tx, blocking at most one
            // frame interval.
            match self.driver.poll_msgs(&ctx, tx.clone()) {
                Ok(()) => {}
                Err(e) => {
                    ctx.cancel();
                    self.driver.close();
                    return Err(e);
                }
            }

            if ctx.is_done() {
                break;
            }

            // A frame boundary at most once per interval, however quickly
            // input events make the poll return.
            if last_tick.elapsed() >= FRAME_INTERVAL {
                last_tick = Instant::now();
                tx.send(Msg::tick()).ok();
            }

            if let Err(e) = self.pump(&rx, &ctx, &tx, start, &mut prev_grid, &mut curr_grid) {
                ctx.cancel();
                self.driver.close();
                return Err(e);
            }
        }

        if let Some(enc) = self.encoder.as_mut() {
            let _ = enc.flush();
        }
        self.driver.close();
        Ok(())
    }

    fn pump(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        tx: &Sender<Msg>,
        start: Instant,
        prev_grid: &mut TileGrid,
        curr_grid: &mut TileGrid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.process_pending(rx, ctx, tx)?;

        if ctx.is_done() {
            return Ok(());
        }

        self.model.draw(curr_grid);
        let frame = compute_frame(prev_grid, curr_grid, start.elapsed().as_millis() as u64);
        if !frame.cells.is_empty() {
            if let Some(enc) = self.encoder.as_mut() {
                enc.encode(&frame)?;
            }
            self.driver.flush(frame)?;
            prev_grid.copy_from(curr_grid);
        }

        Ok(())
    }

    /// Drain queued messages through the model, applying effects.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        tx: &Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while let Ok(msg) = rx.try_recv() {
            if let Some(effect) = self.model.update(msg) {
                if self.handle_effect(effect, ctx, tx) {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if the app should stop.
    fn handle_effect(&mut self, effect: Effect, ctx: &Context, tx: &Sender<Msg>) -> bool {
        match effect {
            Effect::End => {
                ctx.cancel();
                true
            }
            Effect::Status(s) => {
                self.driver.set_status(&s);
                false
            }
            Effect::Cmd(f) => {
                if let Some(msg) = f() {
                    tx.send(msg).ok();
                }
                false
            }
            Effect::Batch(effects) => {
                for e in effects {
                    if self.handle_effect(e, ctx, tx) {
                        return true;
                    }
                }
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AppRunner / EventLoopDriver
// ---------------------------------------------------------------------------

/// Model-and-grids bundle for back-ends that own the OS event loop (e.g.
/// winit) and therefore cannot be driven by [`App::run`]'s polling loop.
///
/// The driver feeds messages in with [`handle_msg`](AppRunner::handle_msg),
/// pulls frame diffs out with [`draw_frame`](AppRunner::draw_frame), and
/// checks [`should_quit`](AppRunner::should_quit) after each message.
pub struct AppRunner {
    model: Box<dyn Model>,
    prev_grid: TileGrid,
    curr_grid: TileGrid,
    quit: bool,
    status: Option<String>,
    encoder: Option<FrameEncoder<Box<dyn Write>>>,
    start: Instant,
}

impl AppRunner {
    /// Create a runner for a boxed model and grid dimensions.
    pub fn new(model: Box<dyn Model>, width: i32, height: i32) -> Self {
        Self {
            model,
            prev_grid: TileGrid::new(width, height),
            curr_grid: TileGrid::new(width, height),
            quit: false,
            status: None,
            encoder: None,
            start: Instant::now(),
        }
    }

    /// Record every non-empty frame to `writer` (builder).
    pub fn with_frame_writer(mut self, writer: Box<dyn Write>) -> Self {
        self.encoder = Some(FrameEncoder::new(writer));
        self
    }

    /// Send `Msg::Init` through the model.
    pub fn init(&mut self) {
        self.handle_msg(Msg::Init);
    }

    /// Feed one message through the model, applying effects.
    pub fn handle_msg(&mut self, msg: Msg) {
        if self.quit {
            return;
        }
        if let Some(effect) = self.model.update(msg) {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::End => self.quit = true,
            Effect::Status(s) => self.status = Some(s),
            Effect::Cmd(f) => {
                if let Some(msg) = f() {
                    self.handle_msg(msg);
                }
            }
            Effect::Batch(effects) => {
                for e in effects {
                    if self.quit {
                        return;
                    }
                    self.apply_effect(e);
                }
            }
        }
    }

    /// Whether the model requested termination.
    #[inline]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Take a pending status caption, if the model emitted one since the
    /// last call.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Draw the model and diff against the previous frame. Returns `None`
    /// when nothing changed.
    pub fn draw_frame(&mut self) -> Option<Frame> {
        if self.quit {
            return None;
        }
        self.model.draw(&mut self.curr_grid);
        let frame = compute_frame(
            &self.prev_grid,
            &self.curr_grid,
            self.start.elapsed().as_millis() as u64,
        );
        if frame.cells.is_empty() {
            return None;
        }
        self.prev_grid.copy_from(&self.curr_grid);
        if let Some(enc) = self.encoder.as_mut() {
            // Recording stops on the first write error.
            if enc.encode(&frame).is_err() {
                self.encoder = None;
            }
        }
        Some(frame)
    }

    /// Replace both grids with fresh ones of the given dimensions. The next
    /// [`draw_frame`](AppRunner::draw_frame) produces a full redraw.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.prev_grid = TileGrid::new(width, height);
        self.curr_grid = TileGrid::new(width, height);
    }
}

/// Back-end driver that owns the main-thread event loop and drives an
/// [`AppRunner`] from inside it.
pub trait EventLoopDriver {
    fn run(self, runner: AppRunner) -> Result<(), Box<dyn std::error::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geom::Point;
    use crate::tile::Tile;

    /// Counts ticks, quits after three.
    struct TickModel {
        ticks: u32,
    }

    impl Model for TickModel {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::Tick { .. } => {
                    self.ticks += 1;
                    if self.ticks >= 3 {
                        Some(Effect::End)
                    } else {
                        Some(Effect::Status(format!("tick {}", self.ticks)))
                    }
                }
                _ => None,
            }
        }

        fn draw(&self, grid: &mut TileGrid) {
            grid.set(
                Point::new(0, 0),
                Tile::new(Color::from_rgb(self.ticks as u8, 0, 0)),
            );
        }
    }

    #[test]
    fn runner_collects_status_and_quit() {
        let mut runner = AppRunner::new(Box::new(TickModel { ticks: 0 }), 2, 2);
        runner.init();
        runner.handle_msg(Msg::tick());
        assert_eq!(runner.take_status().as_deref(), Some("tick 1"));
        assert!(runner.take_status().is_none());
        assert!(!runner.should_quit());
        runner.handle_msg(Msg::tick());
        runner.handle_msg(Msg::tick());
        assert!(runner.should_quit());
    }

    #[test]
    fn runner_diffs_frames() {
        let mut runner = AppRunner::new(Box::new(TickModel { ticks: 0 }), 2, 2);
        runner.init();
        runner.handle_msg(Msg::tick());
        let frame = runner.draw_frame().expect("first draw changes tiles");
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(0, 0));
        // Unchanged state draws nothing.
        assert!(runner.draw_frame().is_none());
    }

    #[test]
    fn runner_resize_forces_full_redraw() {
        let mut runner = AppRunner::new(Box::new(TickModel { ticks: 1 }), 2, 2);
        runner.handle_msg(Msg::tick());
        runner.draw_frame();
        runner.resize(2, 2);
        // Same model state, but fresh grids: the changed tile reappears.
        assert!(runner.draw_frame().is_some());
    }

    #[test]
    fn cmd_effect_feeds_follow_up_message() {
        struct CmdModel;
        impl Model for CmdModel {
            fn update(&mut self, msg: Msg) -> Option<Effect> {
                match msg {
                    Msg::Init => Some(cmd(|| Some(Msg::Quit))),
                    Msg::Quit => Some(Effect::End),
                    _ => None,
                }
            }
            fn draw(&self, _grid: &mut TileGrid) {}
        }

        // End is reachable only through the command's follow-up message.
        let mut runner = AppRunner::new(Box::new(CmdModel), 1, 1);
        runner.init();
        assert!(runner.should_quit());
    }
}
