//! Input abstraction layer.
//!
//! The host translates its chart-library events into `InputEvent`s before
//! they reach the editor. Positions are already in data space, and every
//! pointer event carries a hit-tolerance rect scaled for the current zoom.

use kurbo::{Point, Rect};
pub use roi_core::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Button pressed.
    Press {
        at: Point,
        area: Rect,
        button: Button,
        modifiers: Modifiers,
    },

    /// Pointer moved with a button held.
    Drag {
        at: Point,
        area: Rect,
        modifiers: Modifiers,
    },

    /// Pointer moved with no button held.
    Move {
        at: Point,
        area: Rect,
        modifiers: Modifiers,
    },

    /// Button released.
    Release {
        at: Point,
        area: Rect,
        modifiers: Modifiers,
    },

    /// Press and release without intermediate drag. `count` is 2 for a
    /// double click.
    Click {
        at: Point,
        area: Rect,
        button: Button,
        count: u8,
        modifiers: Modifiers,
    },

    /// Keyboard shortcut.
    Key { key: String, modifiers: Modifiers },
}

/// Square tolerance area of half-size `radius` centred on `at`.
pub fn area_around(at: Point, radius: f64) -> Rect {
    Rect::from_center_size(at, (2.0 * radius, 2.0 * radius))
}

impl InputEvent {
    pub fn press(at: impl Into<Point>, radius: f64) -> Self {
        let at = at.into();
        Self::Press {
            at,
            area: area_around(at, radius),
            button: Button::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn drag(at: impl Into<Point>, radius: f64) -> Self {
        let at = at.into();
        Self::Drag {
            at,
            area: area_around(at, radius),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn hover(at: impl Into<Point>, radius: f64) -> Self {
        let at = at.into();
        Self::Move {
            at,
            area: area_around(at, radius),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn release(at: impl Into<Point>, radius: f64) -> Self {
        let at = at.into();
        Self::Release {
            at,
            area: area_around(at, radius),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn click(at: impl Into<Point>, radius: f64) -> Self {
        let at = at.into();
        Self::Click {
            at,
            area: area_around(at, radius),
            button: Button::Primary,
            count: 1,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn double_click(at: impl Into<Point>, radius: f64) -> Self {
        let at = at.into();
        Self::Click {
            at,
            area: area_around(at, radius),
            button: Button::Primary,
            count: 2,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn secondary_click(at: impl Into<Point>, radius: f64) -> Self {
        let at = at.into();
        Self::Click {
            at,
            area: area_around(at, radius),
            button: Button::Secondary,
            count: 1,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Same event with `modifiers` replaced.
    pub fn with_modifiers(mut self, new: Modifiers) -> Self {
        match &mut self {
            Self::Press { modifiers, .. }
            | Self::Drag { modifiers, .. }
            | Self::Move { modifiers, .. }
            | Self::Release { modifiers, .. }
            | Self::Click { modifiers, .. }
            | Self::Key { modifiers, .. } => *modifiers = new,
        }
        self
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Press { at, .. }
            | Self::Drag { at, .. }
            | Self::Move { at, .. }
            | Self::Release { at, .. }
            | Self::Click { at, .. } => Some(*at),
            Self::Key { .. } => None,
        }
    }

    pub fn area(&self) -> Option<Rect> {
        match self {
            Self::Press { area, .. }
            | Self::Drag { area, .. }
            | Self::Move { area, .. }
            | Self::Release { area, .. }
            | Self::Click { area, .. } => Some(*area),
            Self::Key { .. } => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Press { modifiers, .. }
            | Self::Drag { modifiers, .. }
            | Self::Move { modifiers, .. }
            | Self::Release { modifiers, .. }
            | Self::Click { modifiers, .. }
            | Self::Key { modifiers, .. } => *modifiers,
        }
    }
}
