//! Winit graphical backend for tilegrid.
//!
//! Renders the tile grid as colored rectangles in a native window using:
//! - [`winit`] for window creation and input events
//! - [`softbuffer`] for CPU-based pixel rendering
//!
//! The driver owns the OS event loop, so it implements
//! [`EventLoopDriver`] and drives an [`AppRunner`]: input events are
//! translated into messages, one `Msg::Tick` fires per frame interval, and
//! status captions become the window title.

mod input;
mod renderer;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use tilegrid_core::{
    Color, Point,
    app::{AppRunner, EventLoopDriver, FRAME_INTERVAL},
    messages::Msg,
};

use renderer::TileRenderer;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the winit driver.
pub struct WinitConfig {
    /// Initial window title.
    pub title: String,
    /// Cell size in pixels.
    pub cell_width: u32,
    pub cell_height: u32,
    /// Number of grid columns.
    pub grid_width: i32,
    /// Number of grid rows.
    pub grid_height: i32,
    /// Color of the 2px grid lines between cells.
    pub gap_color: Color,
}

impl Default for WinitConfig {
    fn default() -> Self {
        Self {
            title: "tilegrid".into(),
            cell_width: 20,
            cell_height: 20,
            grid_width: 25,
            grid_height: 25,
            gap_color: Color::DEFAULT,
        }
    }
}

// ---------------------------------------------------------------------------
// WinitDriver
// ---------------------------------------------------------------------------

/// Winit-based graphical driver for tilegrid.
pub struct WinitDriver {
    config: WinitConfig,
}

impl WinitDriver {
    pub fn new(config: WinitConfig) -> Self {
        Self { config }
    }
}

impl EventLoopDriver for WinitDriver {
    fn run(self, runner: AppRunner) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        let mut app = WinitApp::new(self.config, runner);
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WinitApp — ApplicationHandler
// ---------------------------------------------------------------------------

struct WinitApp {
    config: WinitConfig,
    runner: AppRunner,
    state: Option<WinitState>,
    /// Last cursor position in grid coordinates. Button events carry no
    /// position of their own.
    cursor: Point,
    last_tick: Instant,
}

struct WinitState {
    window: Arc<Window>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    renderer: TileRenderer,
    pixel_width: u32,
    pixel_height: u32,
}

impl WinitApp {
    fn new(config: WinitConfig, runner: AppRunner) -> Self {
        Self {
            config,
            runner,
            state: None,
            cursor: Point::ZERO,
            last_tick: Instant::now(),
        }
    }

    fn apply_status(&mut self) {
        if let Some(status) = self.runner.take_status() {
            if let Some(state) = self.state.as_ref() {
                state.window.set_title(&status);
            }
        }
    }

    fn render(&mut self) {
        if self.runner.should_quit() {
            return;
        }

        let frame = self.runner.draw_frame();

        let Some(state) = self.state.as_mut() else {
            return;
        };

        if let Some(frame) = frame {
            state.renderer.apply_frame(&frame);
        }

        let width = state.pixel_width;
        let height = state.pixel_height;
        if width == 0 || height == 0 {
            return;
        }

        let Ok(mut buf) = state.surface.buffer_mut() else {
            log::warn!("surface buffer unavailable, skipping frame");
            return;
        };

        state
            .renderer
            .blit_to_buffer(&mut buf, width as usize, height as usize);

        buf.present().ok();
    }

    fn handle(&mut self, event_loop: &ActiveEventLoop, msg: Msg) {
        self.runner.handle_msg(msg);
        if self.runner.should_quit() {
            event_loop.exit();
            return;
        }
        self.apply_status();
        self.render();
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return; // already initialized
        }

        let renderer = TileRenderer::new(
            self.config.grid_width.max(0) as usize,
            self.config.grid_height.max(0) as usize,
            self.config.cell_width as usize,
            self.config.cell_height as usize,
            self.config.gap_color,
        );

        let pixel_w = renderer.pixel_width() as u32;
        let pixel_h = renderer.pixel_height() as u32;

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(pixel_w, pixel_h))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("failed to create window"),
        );

        let context =
            softbuffer::Context::new(window.clone()).expect("failed to create softbuffer context");
        let mut surface = softbuffer::Surface::new(&context, window.clone())
            .expect("failed to create softbuffer surface");

        surface
            .resize(
                NonZeroU32::new(pixel_w).unwrap_or(NonZeroU32::new(1).unwrap()),
                NonZeroU32::new(pixel_h).unwrap_or(NonZeroU32::new(1).unwrap()),
            )
            .ok();

        self.state = Some(WinitState {
            window,
            surface,
            renderer,
            pixel_width: pixel_w,
            pixel_height: pixel_h,
        });

        // Send Init to the model.
        self.runner.init();
        self.apply_status();
        self.render();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.runner.handle_msg(Msg::Quit);
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(state) = self.state.as_mut() {
                    state.pixel_width = width;
                    state.pixel_height = height;
                    state
                        .surface
                        .resize(
                            NonZeroU32::new(width).unwrap_or(NonZeroU32::new(1).unwrap()),
                            NonZeroU32::new(height).unwrap_or(NonZeroU32::new(1).unwrap()),
                        )
                        .ok();
                }
                self.render();
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(msg) = input::translate_keyboard(&event) {
                    self.handle(event_loop, msg);
                }
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                if let Some(msg) = input::translate_mouse_button(btn_state, button, self.cursor) {
                    self.handle(event_loop, msg);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (cw, ch) = match self.state.as_ref() {
                    Some(s) => s.renderer.cell_size(),
                    None => return,
                };
                self.cursor = input::pixel_to_grid(position.x, position.y, cw, ch);
                let msg = input::translate_cursor_moved(self.cursor);
                self.handle(event_loop, msg);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.runner.should_quit() {
            event_loop.exit();
            return;
        }

        // One animation step per frame interval, however often the event
        // loop wakes up in between.
        if self.last_tick.elapsed() >= FRAME_INTERVAL {
            self.last_tick = Instant::now();
            self.handle(event_loop, Msg::tick());
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.last_tick + FRAME_INTERVAL));
    }
}
