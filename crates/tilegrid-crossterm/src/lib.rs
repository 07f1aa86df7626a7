//! Crossterm terminal driver for tilegrid.
//!
//! Provides a [`CrosstermDriver`] that implements [`tilegrid_core::Driver`],
//! rendering each tile as a background-colored terminal cell and the status
//! caption as the terminal title.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind},
    execute,
    style::{Color as CtColor, SetBackgroundColor},
    terminal::{self, ClearType, SetTitle},
};

use tilegrid_core::{
    Color, Point,
    app::{Context, Driver, FRAME_INTERVAL},
    messages::{Key, ModMask, MouseAction, Msg},
    tile::Frame,
};

/// Maps a [`tilegrid_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        let (r, g, b) = (c.r(), c.g(), c.b());
        CtColor::Rgb { r, g, b }
    }
}

/// Maps crossterm key modifiers to [`ModMask`].
fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    if mods.contains(KeyModifiers::META) {
        m = m | ModMask::META;
    }
    m
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// A terminal back-end for tilegrid using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
}

impl CrosstermDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Block for at most one frame interval, then drain whatever queued.
        if !event::poll(FRAME_INTERVAL)? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }

            let ev = event::read()?;

            let msg = match ev {
                Event::Key(KeyEvent {
                    code, modifiers, ..
                }) => to_key(code).map(|key| Msg::KeyDown {
                    key,
                    modifiers: to_mod_mask(modifiers),
                    time: Instant::now(),
                }),
                Event::Mouse(me) => {
                    let pos = Point::new(me.column as i32, me.row as i32);
                    let modifiers = to_mod_mask(me.modifiers);
                    let action = match me.kind {
                        MouseEventKind::Down(MouseButton::Left) => Some(MouseAction::Main),
                        MouseEventKind::Down(MouseButton::Right) => Some(MouseAction::Secondary),
                        MouseEventKind::Down(MouseButton::Middle) => Some(MouseAction::Auxiliary),
                        MouseEventKind::Up(_) => Some(MouseAction::Release),
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(MouseAction::Move),
                        _ => None,
                    };
                    action.map(|action| Msg::Mouse {
                        action,
                        pos,
                        modifiers,
                        time: Instant::now(),
                    })
                }
                Event::Resize(w, h) => Some(Msg::Screen {
                    width: w as i32,
                    height: h as i32,
                    time: Instant::now(),
                }),
                _ => None,
            };

            if let Some(m) = msg {
                tx.send(m).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();

        for fc in &frame.cells {
            let p = fc.pos;
            execute!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetBackgroundColor(to_ct_color(fc.tile.color))
            )?;
            write!(stdout, " ")?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        let _ = execute!(io::stdout(), SetTitle(status));
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
