pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod model;
pub mod registry;

pub use descriptor::ShapeDescriptor;
pub use error::{GeometryError, RegistryError, Result};
pub use geometry::{Shape, compute_shape_descriptor};
pub use hit::{Hit, curve_for_point, hit_test};
pub use id::CurveKey;
pub use model::*;
pub use registry::{CurveRegistry, Notification, NullObserver, RegistryObserver};

// Re-export kurbo geometry types so downstream crates share one version
pub use kurbo::{BezPath, Point, Rect, Vec2};
