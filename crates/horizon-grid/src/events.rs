//! Input events delivered to the grid by its host.
//!
//! The grid has no window of its own. The host translates its platform
//! events into [`PointerEvent`] and [`KeyEvent`] values and feeds them to
//! the [`DataGrid`](crate::DataGrid) handlers, which report whether the
//! event was consumed.

use horizon_grid_core::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    pub shift: bool,
    pub control: bool,
    /// Option on macOS.
    pub alt: bool,
    /// Cmd on macOS, the Windows key elsewhere.
    pub meta: bool,
}

impl KeyboardModifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    pub const CTRL: Self = Self {
        control: true,
        ..Self::NONE
    };
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        ..Self::NONE
    };

    pub fn none(&self) -> bool {
        *self == Self::NONE
    }

    /// The shortcut modifier: Control, or Cmd on macOS.
    ///
    /// Either key is accepted so shortcuts behave the same whatever keyboard
    /// the host forwards.
    pub fn command(&self) -> bool {
        self.control || self.meta
    }
}

/// Keys the grid reacts to.
///
/// Printable input arrives as [`Key::Character`]; anything else can be
/// forwarded as [`Key::Other`] and is left unconsumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    F2,
    Character(char),
    Other,
}

impl Key {
    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight
        )
    }

    /// Whether the key types `c`, ignoring ASCII case.
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Character(k) if k.eq_ignore_ascii_case(&c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// A typed character without modifiers.
    pub fn character(c: char) -> Self {
        Self::new(Key::Character(c), KeyboardModifiers::NONE)
    }

    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer press, move or release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Ignored for moves.
    pub button: PointerButton,
    /// In the same space as the viewport's outer rectangle.
    pub position: Point,
    pub modifiers: KeyboardModifiers,
}

impl PointerEvent {
    pub fn new(button: PointerButton, position: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            position,
            modifiers,
        }
    }

    pub fn primary(x: f32, y: f32) -> Self {
        Self::new(PointerButton::Primary, Point::new(x, y), KeyboardModifiers::NONE)
    }

    pub fn secondary(x: f32, y: f32) -> Self {
        Self::new(PointerButton::Secondary, Point::new(x, y), KeyboardModifiers::NONE)
    }

    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this press opens the context menu instead of selecting.
    ///
    /// Secondary clicks always do, and so does Control+primary, the
    /// single-button trackpad convention.
    pub fn is_context_click(&self) -> bool {
        self.button == PointerButton::Secondary
            || (self.button == PointerButton::Primary && self.modifiers.control)
    }
}

/// Direction in which keyboard focus leaves the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    /// Tab past the last cell.
    Next,
    /// Shift+Tab before the first cell.
    Previous,
}
