//! Error types for the geometry kernel and the curve registry.

use crate::id::CurveKey;
use thiserror::Error;

/// Errors raised by the shape-descriptor kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// A curved segment reached the straight-segment path without flattening.
    #[error("unsupported curved segment at element {index}; flatten the path first")]
    UnsupportedSegment { index: usize },
}

impl GeometryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }
}

/// Errors raised by registry operations that cannot be tolerated as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("curve {key} is already under construction")]
    ConstructionInProgress { key: CurveKey },

    /// No key above `key` is left to issue.
    #[error("curve key {key} leaves no successor key")]
    KeysExhausted { key: CurveKey },
}

pub type Result<T, E = GeometryError> = std::result::Result<T, E>;
