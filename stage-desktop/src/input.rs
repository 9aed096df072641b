//! winit input in router terms.
//!
//! Physical key codes become symbol strings, winit modifier state and lock
//! toggles become a [`Modifiers`] mask, and the cursor plus held buttons are
//! tracked so motion can be reported as a drag or a plain move.

use stage_core::{keys, Modifiers, MouseButtons};
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, ModifiersState};

/// Pixel scroll distance treated as one wheel click.
pub const PIXELS_PER_CLICK: f64 = 20.0;

/// Symbol string for a physical key, or `None` for keys the router never sees.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn key_symbol(code: KeyCode) -> Option<&'static str> {
    let symbol = match code {
        KeyCode::KeyA => "A",
        KeyCode::KeyB => "B",
        KeyCode::KeyC => "C",
        KeyCode::KeyD => "D",
        KeyCode::KeyE => "E",
        KeyCode::KeyF => "F",
        KeyCode::KeyG => "G",
        KeyCode::KeyH => "H",
        KeyCode::KeyI => "I",
        KeyCode::KeyJ => "J",
        KeyCode::KeyK => "K",
        KeyCode::KeyL => "L",
        KeyCode::KeyM => "M",
        KeyCode::KeyN => "N",
        KeyCode::KeyO => "O",
        KeyCode::KeyP => "P",
        KeyCode::KeyQ => "Q",
        KeyCode::KeyR => "R",
        KeyCode::KeyS => "S",
        KeyCode::KeyT => "T",
        KeyCode::KeyU => "U",
        KeyCode::KeyV => "V",
        KeyCode::KeyW => "W",
        KeyCode::KeyX => "X",
        KeyCode::KeyY => "Y",
        KeyCode::KeyZ => "Z",
        KeyCode::Digit0 => "_0",
        KeyCode::Digit1 => "_1",
        KeyCode::Digit2 => "_2",
        KeyCode::Digit3 => "_3",
        KeyCode::Digit4 => "_4",
        KeyCode::Digit5 => "_5",
        KeyCode::Digit6 => "_6",
        KeyCode::Digit7 => "_7",
        KeyCode::Digit8 => "_8",
        KeyCode::Digit9 => "_9",
        KeyCode::F1 => "F1",
        KeyCode::F2 => "F2",
        KeyCode::F3 => "F3",
        KeyCode::F4 => "F4",
        KeyCode::F5 => "F5",
        KeyCode::F6 => "F6",
        KeyCode::F7 => "F7",
        KeyCode::F8 => "F8",
        KeyCode::F9 => "F9",
        KeyCode::F10 => "F10",
        KeyCode::F11 => "F11",
        KeyCode::F12 => "F12",
        KeyCode::ShiftLeft => keys::LSHIFT,
        KeyCode::ShiftRight => keys::RSHIFT,
        KeyCode::ControlLeft => keys::LCTRL,
        KeyCode::ControlRight => keys::RCTRL,
        KeyCode::AltLeft => keys::LALT,
        KeyCode::AltRight => keys::RALT,
        KeyCode::CapsLock => keys::CAPSLOCK,
        KeyCode::Escape => keys::ESCAPE,
        KeyCode::Enter | KeyCode::NumpadEnter => keys::RETURN,
        KeyCode::Space => keys::SPACE,
        KeyCode::Tab => keys::TAB,
        KeyCode::Backspace => keys::BACKSPACE,
        KeyCode::ArrowLeft => keys::LEFT,
        KeyCode::ArrowRight => keys::RIGHT,
        KeyCode::ArrowUp => keys::UP,
        KeyCode::ArrowDown => keys::DOWN,
        KeyCode::Delete => "DELETE",
        KeyCode::Insert => "INSERT",
        KeyCode::Home => "HOME",
        KeyCode::End => "END",
        KeyCode::PageUp => "PAGEUP",
        KeyCode::PageDown => "PAGEDOWN",
        KeyCode::NumLock => "NUMLOCK",
        KeyCode::ScrollLock => "SCROLLLOCK",
        KeyCode::Minus => "MINUS",
        KeyCode::Equal => "EQUAL",
        KeyCode::Comma => "COMMA",
        KeyCode::Period => "PERIOD",
        KeyCode::Slash => "SLASH",
        KeyCode::Semicolon => "SEMICOLON",
        KeyCode::Quote => "APOSTROPHE",
        KeyCode::BracketLeft => "BRACKETLEFT",
        KeyCode::BracketRight => "BRACKETRIGHT",
        KeyCode::Backslash => "BACKSLASH",
        KeyCode::Backquote => "GRAVE",
        _ => return None,
    };
    Some(symbol)
}

/// Router button for a winit button. Back/forward and others are ignored.
#[must_use]
pub fn mouse_button(button: MouseButton) -> Option<MouseButtons> {
    match button {
        MouseButton::Left => Some(MouseButtons::LEFT),
        MouseButton::Middle => Some(MouseButtons::MIDDLE),
        MouseButton::Right => Some(MouseButtons::RIGHT),
        _ => None,
    }
}

/// Wheel movement in clicks, positive `y` away from the user.
#[must_use]
pub fn scroll_clicks(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (f64::from(x), f64::from(y)),
        MouseScrollDelta::PixelDelta(pos) => (pos.x / PIXELS_PER_CLICK, pos.y / PIXELS_PER_CLICK),
    }
}

/// Pointer movement, split into drag or plain motion by the held buttons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMove {
    /// Moved from `(x, y)` by `(dx, dy)` with `buttons` held.
    Drag {
        /// Previous x.
        x: f64,
        /// Previous y.
        y: f64,
        /// Horizontal movement.
        dx: f64,
        /// Vertical movement, positive downward.
        dy: f64,
        /// Held buttons.
        buttons: MouseButtons,
    },
    /// Moved from `(x, y)` by `(dx, dy)` with nothing held.
    Motion {
        /// Previous x.
        x: f64,
        /// Previous y.
        y: f64,
        /// Horizontal movement.
        dx: f64,
        /// Vertical movement, positive downward.
        dy: f64,
    },
}

/// Input state winit reports piecemeal.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    cursor: Option<(f64, f64)>,
    held: MouseButtons,
    keyboard: ModifiersState,
    locks: Modifiers,
}

impl InputState {
    /// Fresh state: no cursor, nothing held, all locks off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position, `(0, 0)` before the first move.
    #[must_use]
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor.unwrap_or((0.0, 0.0))
    }

    /// Buttons currently held.
    #[must_use]
    pub fn held_buttons(&self) -> MouseButtons {
        self.held
    }

    /// Record new keyboard modifier state.
    pub fn set_keyboard_modifiers(&mut self, state: ModifiersState) {
        self.keyboard = state;
    }

    /// Toggle lock state for lock keys. Call for every key press.
    pub fn key_pressed(&mut self, symbol: &str) {
        let lock = match symbol {
            keys::CAPSLOCK => Modifiers::CAPSLOCK,
            "NUMLOCK" => Modifiers::NUMLOCK,
            "SCROLLLOCK" => Modifiers::SCROLLLOCK,
            _ => return,
        };
        let on = !self.locks.contains(lock);
        self.locks.set(lock, on);
    }

    /// Current modifier mask.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        let mut mods = self.locks;
        mods.set(Modifiers::SHIFT, self.keyboard.shift_key());
        mods.set(Modifiers::CTRL, self.keyboard.control_key());
        if cfg!(target_os = "macos") {
            mods.set(Modifiers::ALT | Modifiers::OPTION, self.keyboard.alt_key());
            mods.set(Modifiers::COMMAND, self.keyboard.super_key());
        } else {
            mods.set(Modifiers::ALT, self.keyboard.alt_key());
            mods.set(Modifiers::WINDOWS, self.keyboard.super_key());
        }
        mods
    }

    /// Record a button going down or up.
    pub fn set_button(&mut self, button: MouseButtons, pressed: bool) {
        self.held.set(button, pressed);
    }

    /// Record a cursor move and describe it.
    ///
    /// The first move after entering the window has no origin, so it
    /// reports zero movement.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> PointerMove {
        let (from_x, from_y) = self.cursor.unwrap_or((x, y));
        self.cursor = Some((x, y));

        let (dx, dy) = (x - from_x, y - from_y);
        if self.held.is_empty() {
            PointerMove::Motion {
                x: from_x,
                y: from_y,
                dx,
                dy,
            }
        } else {
            PointerMove::Drag {
                x: from_x,
                y: from_y,
                dx,
                dy,
                buttons: self.held,
            }
        }
    }

    /// Forget the cursor when it leaves the window.
    pub fn cursor_left(&mut self) {
        self.cursor = None;
    }
}
