//! Input events routed to screens.
//!
//! Events are built fresh by the router for every raw input occurrence.
//! Positions are window coordinates with y growing downward, the same input
//! space shapes are described in.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

macro_rules! bit_set {
    ($(#[$meta:meta])* $name:ident { $($(#[$flag_meta:meta])* $flag:ident = $bit:expr,)+ }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            $($(#[$flag_meta])* pub const $flag: Self = Self($bit);)+

            /// The empty set.
            #[must_use]
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Wrap raw bits from the input backend, keeping unknown bits.
            #[must_use]
            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            /// Raw bits, laid out as the input backend expects.
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Whether every bit of `other` is set.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Whether no bit is set.
            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Set or clear the bits of `other`.
            pub fn set(&mut self, other: Self, on: bool) {
                if on {
                    self.0 |= other.0;
                } else {
                    self.0 &= !other.0;
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let names: Vec<&str> = [$((Self::$flag, stringify!($flag)),)+]
                    .into_iter()
                    .filter(|(flag, _)| self.contains(*flag))
                    .map(|(_, name)| name)
                    .collect();
                write!(f, "{}({})", stringify!($name), names.join(" | "))
            }
        }
    };
}

bit_set! {
    /// Modifier key state accompanying clicks, drags and key presses.
    ///
    /// The bit layout matches the input backend this scaffold grew up on
    /// and must stay stable for interop.
    Modifiers {
        /// Either shift key.
        SHIFT = 1 << 0,
        /// Either control key.
        CTRL = 1 << 1,
        /// Either alt key.
        ALT = 1 << 2,
        /// Caps lock is on.
        CAPSLOCK = 1 << 3,
        /// Num lock is on.
        NUMLOCK = 1 << 4,
        /// Windows/super key.
        WINDOWS = 1 << 5,
        /// macOS command key.
        COMMAND = 1 << 6,
        /// macOS option key.
        OPTION = 1 << 7,
        /// Scroll lock is on.
        SCROLLLOCK = 1 << 8,
    }
}

bit_set! {
    /// Mouse buttons. A click carries one, a drag carries every held button.
    MouseButtons {
        /// Primary button.
        LEFT = 1 << 0,
        /// Wheel button.
        MIDDLE = 1 << 1,
        /// Secondary button.
        RIGHT = 1 << 2,
    }
}

/// Key symbol names produced by the input backend.
pub mod keys {
    /// Left shift.
    pub const LSHIFT: &str = "LSHIFT";
    /// Right shift.
    pub const RSHIFT: &str = "RSHIFT";
    /// Left control.
    pub const LCTRL: &str = "LCTRL";
    /// Right control.
    pub const RCTRL: &str = "RCTRL";
    /// Left alt.
    pub const LALT: &str = "LALT";
    /// Right alt.
    pub const RALT: &str = "RALT";
    /// Caps lock.
    pub const CAPSLOCK: &str = "CAPSLOCK";
    /// Escape.
    pub const ESCAPE: &str = "ESCAPE";
    /// Return/enter.
    pub const RETURN: &str = "RETURN";
    /// Space bar.
    pub const SPACE: &str = "SPACE";
    /// Tab.
    pub const TAB: &str = "TAB";
    /// Backspace.
    pub const BACKSPACE: &str = "BACKSPACE";
    /// Left arrow.
    pub const LEFT: &str = "LEFT";
    /// Right arrow.
    pub const RIGHT: &str = "RIGHT";
    /// Up arrow.
    pub const UP: &str = "UP";
    /// Down arrow.
    pub const DOWN: &str = "DOWN";

    /// Keys that only change modifier state and never reach a screen.
    pub const MODIFIER_KEYS: [&str; 7] = [LSHIFT, RSHIFT, LCTRL, RCTRL, LALT, RALT, CAPSLOCK];
}

/// Which kind of input an [`Event`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A mouse button went down.
    MouseClick,
    /// A mouse button went up.
    MouseRelease,
    /// The mouse moved with a button held.
    MouseDrag,
    /// A key went down.
    KeyPress,
    /// The wheel turned.
    MouseScroll,
    /// The mouse moved with no button held.
    MouseMotion,
}

/// An input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[allow(missing_docs)] // Field meaning documented at variant level
pub enum Event {
    /// Button `button` pressed at `(x, y)`.
    MouseClick {
        x: f64,
        y: f64,
        button: MouseButtons,
        modifiers: Modifiers,
    },

    /// Button `button` released at `(x, y)`.
    MouseRelease {
        x: f64,
        y: f64,
        button: MouseButtons,
        modifiers: Modifiers,
    },

    /// Moved from `(x, y)` by `(dx, dy)` while `buttons` were held.
    MouseDrag {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        buttons: MouseButtons,
        modifiers: Modifiers,
    },

    /// Key `symbol` pressed.
    KeyPress { symbol: String, modifiers: Modifiers },

    /// Wheel turned by `(scroll_x, scroll_y)` clicks with the pointer at `(x, y)`.
    MouseScroll {
        x: f64,
        y: f64,
        scroll_x: f64,
        scroll_y: f64,
    },

    /// Moved from `(x, y)` by `(dx, dy)` with nothing held.
    MouseMotion { x: f64, y: f64, dx: f64, dy: f64 },
}

impl Event {
    /// The kind tag of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MouseClick { .. } => EventKind::MouseClick,
            Self::MouseRelease { .. } => EventKind::MouseRelease,
            Self::MouseDrag { .. } => EventKind::MouseDrag,
            Self::KeyPress { .. } => EventKind::KeyPress,
            Self::MouseScroll { .. } => EventKind::MouseScroll,
            Self::MouseMotion { .. } => EventKind::MouseMotion,
        }
    }

    /// Modifier mask, absent for scroll and motion events.
    #[must_use]
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::MouseClick { modifiers, .. }
            | Self::MouseRelease { modifiers, .. }
            | Self::MouseDrag { modifiers, .. }
            | Self::KeyPress { modifiers, .. } => Some(*modifiers),
            Self::MouseScroll { .. } | Self::MouseMotion { .. } => None,
        }
    }

    fn has_modifier(&self, flag: Modifiers) -> bool {
        self.modifiers().is_some_and(|m| m.contains(flag))
    }

    /// Whether control was held.
    #[must_use]
    pub fn control_pressed(&self) -> bool {
        self.has_modifier(Modifiers::CTRL)
    }

    /// Whether shift was held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.has_modifier(Modifiers::SHIFT)
    }

    /// Whether alt was held.
    #[must_use]
    pub fn alt_pressed(&self) -> bool {
        self.has_modifier(Modifiers::ALT)
    }

    /// Whether caps lock was on.
    #[must_use]
    pub fn caps_lock_on(&self) -> bool {
        self.has_modifier(Modifiers::CAPSLOCK)
    }

    /// Whether the router should hand this event to the active screen.
    ///
    /// Presses of pure modifier keys are folded into modifier state instead.
    #[must_use]
    pub fn should_be_processed(&self) -> bool {
        match self {
            Self::KeyPress { symbol, .. } => !keys::MODIFIER_KEYS.contains(&symbol.as_str()),
            _ => true,
        }
    }

    /// Whether this is a key press of a single letter.
    #[must_use]
    pub fn is_letter(&self) -> bool {
        match self {
            Self::KeyPress { symbol, .. } => {
                symbol.len() == 1 && symbol.bytes().all(|b| b.is_ascii_alphabetic())
            }
            _ => false,
        }
    }

    /// The case-resolved key of a key press.
    ///
    /// Letters are upper case when exactly one of shift and caps lock is in
    /// effect and lower case otherwise. Other symbols pass through.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        let Self::KeyPress { symbol, .. } = self else {
            return None;
        };

        if !self.is_letter() {
            return Some(symbol.clone());
        }

        if self.shift_pressed() != self.caps_lock_on() {
            Some(symbol.to_ascii_uppercase())
        } else {
            Some(symbol.to_ascii_lowercase())
        }
    }

    /// Pointer position for every mouse event.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MouseClick { x, y, .. }
            | Self::MouseRelease { x, y, .. }
            | Self::MouseDrag { x, y, .. }
            | Self::MouseScroll { x, y, .. }
            | Self::MouseMotion { x, y, .. } => Some((x, y)),
            Self::KeyPress { .. } => None,
        }
    }

    /// Where a click or release happened.
    #[must_use]
    pub fn location(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MouseClick { x, y, .. } | Self::MouseRelease { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// Start of a drag or motion.
    #[must_use]
    pub fn initial_location(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MouseDrag { x, y, .. } | Self::MouseMotion { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// End of a drag or motion: start plus delta.
    #[must_use]
    pub fn final_location(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MouseDrag { x, y, dx, dy, .. } | Self::MouseMotion { x, y, dx, dy } => {
                Some((x + dx, y + dy))
            }
            _ => None,
        }
    }

    /// Delta of a drag or motion.
    #[must_use]
    pub fn vector(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MouseDrag { dx, dy, .. } | Self::MouseMotion { dx, dy, .. } => Some((dx, dy)),
            _ => None,
        }
    }

    /// Vertical wheel clicks of a scroll.
    #[must_use]
    pub fn scroll_clicks(&self) -> Option<f64> {
        match *self {
            Self::MouseScroll { scroll_y, .. } => Some(scroll_y),
            _ => None,
        }
    }

    fn clicked(&self, button: MouseButtons) -> bool {
        matches!(self, Self::MouseClick { button: b, .. } if b.contains(button))
    }

    fn dragged(&self, button: MouseButtons) -> bool {
        matches!(self, Self::MouseDrag { buttons, .. } if buttons.contains(button))
    }

    /// Click with the left button.
    #[must_use]
    pub fn left_button_pressed(&self) -> bool {
        self.clicked(MouseButtons::LEFT)
    }

    /// Click with the middle button.
    #[must_use]
    pub fn middle_button_pressed(&self) -> bool {
        self.clicked(MouseButtons::MIDDLE)
    }

    /// Click with the right button.
    #[must_use]
    pub fn right_button_pressed(&self) -> bool {
        self.clicked(MouseButtons::RIGHT)
    }

    /// Drag with the left button held.
    #[must_use]
    pub fn left_button_dragged(&self) -> bool {
        self.dragged(MouseButtons::LEFT)
    }

    /// Drag with the middle button held.
    #[must_use]
    pub fn middle_button_dragged(&self) -> bool {
        self.dragged(MouseButtons::MIDDLE)
    }

    /// Drag with the right button held.
    #[must_use]
    pub fn right_button_dragged(&self) -> bool {
        self.dragged(MouseButtons::RIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_press(symbol: &str, modifiers: Modifiers) -> Event {
        Event::KeyPress {
            symbol: symbol.to_string(),
            modifiers,
        }
    }

    #[test]
    fn test_modifier_bits_are_stable() {
        assert_eq!(Modifiers::SHIFT.bits(), 1);
        assert_eq!(Modifiers::CTRL.bits(), 2);
        assert_eq!(Modifiers::ALT.bits(), 4);
        assert_eq!(Modifiers::CAPSLOCK.bits(), 8);
        assert_eq!(Modifiers::SCROLLLOCK.bits(), 256);
        assert_eq!(MouseButtons::RIGHT.bits(), 4);
    }

    #[test]
    fn test_bit_set_ops() {
        let mut m = Modifiers::SHIFT | Modifiers::ALT;
        assert!(m.contains(Modifiers::SHIFT));
        assert!(!m.contains(Modifiers::CTRL));
        assert!(m.contains(Modifiers::empty()));
        assert!(Modifiers::empty().contains(Modifiers::empty()));

        m.set(Modifiers::SHIFT, false);
        m |= Modifiers::CAPSLOCK;
        assert_eq!(m.bits(), 4 | 8);
        assert_eq!(format!("{m:?}"), "Modifiers(ALT | CAPSLOCK)");
    }

    #[test]
    fn test_key_case_resolution() {
        assert_eq!(key_press("A", Modifiers::empty()).key().as_deref(), Some("a"));
        assert_eq!(
            key_press("A", Modifiers::SHIFT | Modifiers::CAPSLOCK)
                .key()
                .as_deref(),
            Some("a")
        );
        assert_eq!(key_press("A", Modifiers::SHIFT).key().as_deref(), Some("A"));
        assert_eq!(
            key_press("A", Modifiers::CAPSLOCK).key().as_deref(),
            Some("A")
        );
    }

    #[test]
    fn test_key_non_letters_pass_through() {
        assert_eq!(
            key_press(keys::SPACE, Modifiers::SHIFT).key().as_deref(),
            Some("SPACE")
        );
        assert_eq!(
            key_press("_1", Modifiers::empty()).key().as_deref(),
            Some("_1")
        );
        assert!(!key_press(keys::TAB, Modifiers::empty()).is_letter());
    }

    #[test]
    fn test_modifier_keys_are_not_processed() {
        for symbol in keys::MODIFIER_KEYS {
            assert!(!key_press(symbol, Modifiers::empty()).should_be_processed());
        }
        assert!(key_press("A", Modifiers::empty()).should_be_processed());
        assert!(key_press(keys::ESCAPE, Modifiers::empty()).should_be_processed());
    }

    #[test]
    fn test_missing_modifiers_read_as_false() {
        let scroll = Event::MouseScroll {
            x: 1.0,
            y: 2.0,
            scroll_x: 0.0,
            scroll_y: -3.0,
        };
        assert_eq!(scroll.modifiers(), None);
        assert!(!scroll.control_pressed());
        assert!(!scroll.shift_pressed());
        assert!(!scroll.alt_pressed());
        assert!(!scroll.caps_lock_on());
        assert!(scroll.should_be_processed());
        assert_eq!(scroll.scroll_clicks(), Some(-3.0));
        assert_eq!(scroll.position(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_drag_geometry_and_buttons() {
        let drag = Event::MouseDrag {
            x: 10.0,
            y: 20.0,
            dx: 3.0,
            dy: -4.0,
            buttons: MouseButtons::LEFT | MouseButtons::RIGHT,
            modifiers: Modifiers::CTRL,
        };
        assert_eq!(drag.kind(), EventKind::MouseDrag);
        assert_eq!(drag.initial_location(), Some((10.0, 20.0)));
        assert_eq!(drag.final_location(), Some((13.0, 16.0)));
        assert_eq!(drag.vector(), Some((3.0, -4.0)));
        assert!(drag.left_button_dragged());
        assert!(!drag.middle_button_dragged());
        assert!(drag.right_button_dragged());
        assert!(drag.control_pressed());
        assert_eq!(drag.location(), None);
    }

    #[test]
    fn test_click_buttons() {
        let click = Event::MouseClick {
            x: 5.0,
            y: 6.0,
            button: MouseButtons::MIDDLE,
            modifiers: Modifiers::empty(),
        };
        assert_eq!(click.location(), Some((5.0, 6.0)));
        assert!(click.middle_button_pressed());
        assert!(!click.left_button_pressed());
        assert!(!click.right_button_pressed());
        assert_eq!(click.key(), None);
    }

    #[test]
    fn test_event_serde_shape() {
        let json = serde_json::to_value(key_press("Q", Modifiers::SHIFT)).expect("serialize");
        assert_eq!(json["type"], "KeyPress");
        assert_eq!(json["data"]["symbol"], "Q");
        assert_eq!(json["data"]["modifiers"], 1);
    }
}
