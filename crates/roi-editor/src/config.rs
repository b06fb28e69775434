use roi_core::CurveKind;
use roi_core::geometry::DEFAULT_FLATTEN_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Editor preferences. Hosts load this from their own preference store;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Kind of curve started by a click on empty space.
    pub default_kind: CurveKind,
    /// Flattening tolerance used when measuring curves.
    pub flatten_tolerance: f64,
    /// Visibility the registry starts with.
    pub initial_visibility: bool,
    /// Whether Shift locks drags and construction to the dominant axis.
    pub constrain_with_shift: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_kind: CurveKind::default(),
            flatten_tolerance: DEFAULT_FLATTEN_TOLERANCE,
            initial_visibility: true,
            constrain_with_shift: true,
        }
    }
}
