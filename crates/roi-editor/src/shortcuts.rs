//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. `key` is the
//! host's key name (`"Escape"`, `"h"`, ...).

use roi_core::{CurveKind, Modifiers};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Construction ──
    /// Discard the curve being drawn.
    CancelConstruction,
    FinishConstruction,

    // ── Edit ──
    /// Remove every highlighted curve.
    DeleteHighlighted,
    /// Flip the visibility broadcast for all curves.
    ToggleVisibility,

    // ── Tool switching ──
    Kind(CurveKind),
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        // Command combos belong to the host.
        if modifiers.ctrl || modifiers.meta || modifiers.alt {
            return None;
        }

        match key {
            "Escape" => Some(ShortcutAction::CancelConstruction),
            "Enter" => Some(ShortcutAction::FinishConstruction),
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteHighlighted),
            "h" | "H" => Some(ShortcutAction::ToggleVisibility),
            "." => Some(ShortcutAction::Kind(CurveKind::Point)),
            "l" | "L" => Some(ShortcutAction::Kind(CurveKind::Line)),
            "g" | "G" => Some(ShortcutAction::Kind(CurveKind::Polygon)),
            "c" | "C" => Some(ShortcutAction::Kind(CurveKind::Composite)),
            _ => None,
        }
    }
}
