//! Hit testing: tolerance area → curve lookup.
//!
//! Walks finished curves most-recent first (last drawn = topmost). For each
//! curve the anchor test runs before the body test, so a vertex handle sitting
//! on top of another curve's body still wins for its own curve.
//!
//! The tolerance area comes from the host already scaled for the current
//! zoom, so everything here works in data space.

use crate::id::CurveKey;
use crate::model::{AnchorKind, AnchorRef, Curve, CurveKind};
use crate::registry::CurveRegistry;
use kurbo::{Line, ParamCurve, ParamCurveNearest, Point, Rect, Shape};

/// Outcome of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A vertex, edge handle, or whole-curve handle.
    Anchor(AnchorRef),
    /// The curve's boundary or interior, away from any handle.
    Body(CurveKey),
    Miss,
}

impl Hit {
    pub fn key(&self) -> Option<CurveKey> {
        match self {
            Self::Anchor(anchor) => Some(anchor.key),
            Self::Body(key) => Some(*key),
            Self::Miss => None,
        }
    }
}

/// Find the topmost visible curve under `area`.
pub fn hit_test(registry: &CurveRegistry, area: Rect) -> Hit {
    let area = area.abs();
    for curve in registry.curves_most_recent_first().filter(|c| c.visible) {
        if let Some(kind) = anchor_at(curve, area) {
            log::trace!("hit anchor {kind:?} of curve {}", curve.key);
            return Hit::Anchor(AnchorRef {
                key: curve.key,
                kind,
            });
        }
        if body_hit(curve, area) {
            log::trace!("hit body of curve {}", curve.key);
            return Hit::Body(curve.key);
        }
    }
    Hit::Miss
}

/// Key of the topmost curve under `area`, through either a handle or its body.
pub fn curve_for_point(registry: &CurveRegistry, area: Rect) -> Option<CurveKey> {
    hit_test(registry, area).key()
}

/// All visible curves touching `rect`, most recent first.
/// Used for marquee selection.
pub fn curves_in_rect(registry: &CurveRegistry, rect: Rect) -> Vec<CurveKey> {
    let rect = rect.abs();
    registry
        .curves_most_recent_first()
        .filter(|c| c.visible && touches(c, rect))
        .map(|c| c.key)
        .collect()
}

/// Whether `area` lies on the boundary zone of the curve under construction.
pub fn construction_hot_zone(registry: &CurveRegistry, area: Rect) -> bool {
    registry
        .construction()
        .is_some_and(|c| touches(c, area.abs()))
}

/// Handle of `curve` inside `area`, if any. Later vertices win over earlier
/// ones; vertices win over edge handles.
pub fn anchor_at(curve: &Curve, area: Rect) -> Option<AnchorKind> {
    let vertex = curve
        .vertices
        .iter()
        .rposition(|v| covers(area, v.point));
    if let Some(index) = vertex {
        return Some(match curve.kind {
            CurveKind::Point => AnchorKind::WholeCurve,
            _ => AnchorKind::Vertex(index),
        });
    }
    (0..curve.segment_count())
        .find(|&i| curve.segment(i).is_some_and(|s| covers(area, s.p0.midpoint(s.p1))))
        .map(AnchorKind::Edge)
}

/// Boundary within `area`, or `area`'s center inside a closed curve.
pub fn body_hit(curve: &Curve, area: Rect) -> bool {
    if curve.segments().any(|s| segment_hits_rect(s, area)) {
        return true;
    }
    curve.kind.is_closed() && curve.len() >= 3 && curve.to_bez_path().contains(area.center())
}

fn touches(curve: &Curve, area: Rect) -> bool {
    curve.points().any(|p| covers(area, p)) || body_hit(curve, area)
}

/// Segment index and the closest boundary point to `point`.
pub fn nearest_segment(curve: &Curve, point: Point) -> Option<(usize, Point)> {
    curve
        .segments()
        .enumerate()
        .map(|(i, s)| {
            let nearest = s.nearest(point, 1e-9);
            (i, s.eval(nearest.t), nearest.distance_sq)
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(i, p, _)| (i, p))
}

/// Inclusive containment, so a zero-size tolerance still hits exact points.
fn covers(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Liang–Barsky clip of a segment against an axis-aligned rect.
fn segment_hits_rect(line: Line, rect: Rect) -> bool {
    let d = line.p1 - line.p0;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let edges = [
        (-d.x, line.p0.x - rect.x0),
        (d.x, rect.x1 - line.p0.x),
        (-d.y, line.p0.y - rect.y0),
        (d.y, rect.y1 - line.p0.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }
    true
}
