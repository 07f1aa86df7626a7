//! Translates winit input events into tilegrid [`Msg`] values.

use std::time::Instant;

use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key as WKey, NamedKey};

use tilegrid_core::{
    Point,
    messages::{Key, ModMask, MouseAction, Msg},
};

/// Convert a pixel position to grid (cell) coordinates.
#[inline]
pub(crate) fn pixel_to_grid(px: f64, py: f64, cell_width: usize, cell_height: usize) -> Point {
    Point::new(
        (px as i32) / (cell_width as i32).max(1),
        (py as i32) / (cell_height as i32).max(1),
    )
}

pub(crate) fn translate_keyboard(event: &KeyEvent) -> Option<Msg> {
    // Only key-down (pressed) events.
    if event.state != ElementState::Pressed {
        return None;
    }

    let key = match &event.logical_key {
        WKey::Named(named) => match named {
            NamedKey::ArrowUp => Key::ArrowUp,
            NamedKey::ArrowDown => Key::ArrowDown,
            NamedKey::ArrowLeft => Key::ArrowLeft,
            NamedKey::ArrowRight => Key::ArrowRight,
            NamedKey::Escape => Key::Escape,
            NamedKey::Enter => Key::Enter,
            NamedKey::Space => Key::Space,
            _ => return None,
        },
        WKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(' '), None) => Key::Space,
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
        _ => return None,
    };

    // The logical key already incorporates shift; modifier combos beyond
    // that are not needed here.
    Some(Msg::KeyDown {
        key,
        modifiers: ModMask::NONE,
        time: Instant::now(),
    })
}

/// Translate a button transition. `pos` is the last tracked cursor position
/// in grid coordinates (winit button events carry no position themselves).
pub(crate) fn translate_mouse_button(
    btn_state: ElementState,
    button: MouseButton,
    pos: Point,
) -> Option<Msg> {
    let action = match btn_state {
        ElementState::Pressed => match button {
            MouseButton::Left => MouseAction::Main,
            MouseButton::Right => MouseAction::Secondary,
            MouseButton::Middle => MouseAction::Auxiliary,
            _ => return None,
        },
        ElementState::Released => MouseAction::Release,
    };

    Some(Msg::Mouse {
        action,
        pos,
        modifiers: ModMask::NONE,
        time: Instant::now(),
    })
}

pub(crate) fn translate_cursor_moved(pos: Point) -> Msg {
    Msg::Mouse {
        action: MouseAction::Move,
        pos,
        modifiers: ModMask::NONE,
        time: Instant::now(),
    }
}
