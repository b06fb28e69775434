//! Shape-descriptor kernel.
//!
//! Pure functions deriving area, perimeter, centroid, Feret (caliper)
//! diameters, and bounding extents from primitive shapes and arbitrary
//! boundaries.
//!
//! - Polygons use the shoelace boundary integral for signed area and
//!   centroid, and rotating calipers on the convex hull for Feret values.
//! - Ellipse perimeters use Ramanujan's second approximation, exact for
//!   circles.
//! - Curved boundaries are flattened to straight segments within a caller
//!   supplied tolerance before measuring.
//!
//! ## Degenerate input
//!
//! Boundaries with fewer than three distinct vertices, or with zero
//! enclosed area, have no meaningful shoelace centroid. They are measured
//! with an explicit fallback instead:
//!
//! | Field      | Fallback value                                   |
//! |------------|--------------------------------------------------|
//! | area       | `0`                                              |
//! | perimeter  | sum of consecutive segment lengths               |
//! | centroid   | arithmetic mean of the vertices                  |
//! | feret_min  | `min(box_width, box_height)`                     |
//! | feret_max  | `hypot(box_width, box_height)`                   |

use crate::descriptor::ShapeDescriptor;
use crate::error::{GeometryError, Result};
use kurbo::{BezPath, PathEl, Point, Rect, Vec2};
use std::f64::consts::PI;

/// Flattening tolerance used when the caller has no better value.
pub const DEFAULT_FLATTEN_TOLERANCE: f64 = 0.1;

/// Relative threshold below which a signed area is treated as zero.
const AREA_EPSILON: f64 = 1e-12;

/// Any shape the kernel can measure.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rectangle(Rect),
    /// Axis-aligned ellipse inscribed in the rect.
    Ellipse(Rect),
    /// Closed polygon; the closing edge is implicit.
    Polygon(Vec<Point>),
    /// Open polyline.
    Polyline(Vec<Point>),
    /// Arbitrary path, possibly with curve segments.
    Path(BezPath),
}

/// Measure any [`Shape`]. `tolerance` only applies to [`Shape::Path`].
///
/// Primitive centroids are reported in the rect's coordinate frame.
pub fn compute_shape_descriptor(shape: &Shape, tolerance: f64) -> Result<ShapeDescriptor> {
    match shape {
        Shape::Rectangle(rect) => {
            let rect = checked_rect(rect)?;
            Ok(for_rectangle(rect.width(), rect.height())?.translated(rect.origin().to_vec2()))
        }
        Shape::Ellipse(rect) => {
            let rect = checked_rect(rect)?;
            Ok(for_ellipse(rect.width(), rect.height())?.translated(rect.origin().to_vec2()))
        }
        Shape::Polygon(points) => for_vertices(points),
        Shape::Polyline(points) => for_polyline(points),
        Shape::Path(path) => for_flattened_curve(path, tolerance),
    }
}

// ─── Primitives ──────────────────────────────────────────────────────────

/// Rectangle of the given extents, centroid in its local frame.
pub fn for_rectangle(width: f64, height: f64) -> Result<ShapeDescriptor> {
    check_extent(width, "width")?;
    check_extent(height, "height")?;
    Ok(ShapeDescriptor::new(
        width * height,
        2.0 * (width + height),
        Point::new(width / 2.0, height / 2.0),
        (width.min(height), (width * width + height * height).sqrt()),
        (width, height),
    ))
}

/// Axis-aligned ellipse with the given bounding extents.
pub fn for_ellipse(width: f64, height: f64) -> Result<ShapeDescriptor> {
    check_extent(width, "width")?;
    check_extent(height, "height")?;
    let a = width / 2.0;
    let b = height / 2.0;
    Ok(ShapeDescriptor::new(
        PI * a * b,
        ramanujan_perimeter(a, b),
        Point::new(a, b),
        (width.min(height), width.max(height)),
        (width, height),
    ))
}

/// Ramanujan's second approximation of an ellipse perimeter.
fn ramanujan_perimeter(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0.0 {
        return 0.0;
    }
    let h = ((a - b) / sum).powi(2);
    PI * sum * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

// ─── Polygons ────────────────────────────────────────────────────────────

/// Closed polygon given as a vertex list.
pub fn for_vertices(points: &[Point]) -> Result<ShapeDescriptor> {
    for &p in points {
        check_point(p)?;
    }
    measure_rings(&[points.to_vec()])
}

/// Straight-segment path. Each subpath is a closed ring, whether or not it
/// ends in `ClosePath`; rings accumulate by winding, so an oppositely wound
/// inner ring subtracts.
///
/// Curve segments are rejected with [`GeometryError::UnsupportedSegment`];
/// use [`for_flattened_curve`] for those.
pub fn for_polygon(path: &BezPath) -> Result<ShapeDescriptor> {
    let rings = rings_from_elements(path.elements().iter().copied())?;
    measure_rings(&rings)
}

/// Flatten curved segments to lines within `tolerance`, then measure as a
/// polygon.
pub fn for_flattened_curve(path: &BezPath, tolerance: f64) -> Result<ShapeDescriptor> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(GeometryError::invalid(format!(
            "flattening tolerance must be positive, got {tolerance}"
        )));
    }
    for el in path.elements() {
        check_element(el)?;
    }
    let mut flat = Vec::with_capacity(path.elements().len());
    path.flatten(tolerance, |el| flat.push(el));
    let rings = rings_from_elements(flat)?;
    measure_rings(&rings)
}

/// Open polyline: no enclosed area, perimeter is the open length.
pub fn for_polyline(points: &[Point]) -> Result<ShapeDescriptor> {
    for &p in points {
        check_point(p)?;
    }
    if points.is_empty() {
        return Err(GeometryError::invalid("no vertices"));
    }
    if distinct_count(points) < 3 {
        return Ok(degenerate(&[points]));
    }
    let bounds = extent(points);
    let hull = convex_hull(points);
    Ok(ShapeDescriptor::new(
        0.0,
        open_length(points),
        mean(points),
        feret_diameters(&hull),
        (bounds.width(), bounds.height()),
    ))
}

/// Raw shoelace sum `½·Σ(xᵢyᵢ₊₁ − xᵢ₊₁yᵢ)` of a closed ring.
///
/// Positive for counter-clockwise rings in a y-up frame.
pub fn signed_area(ring: &[Point]) -> f64 {
    ring_moments(ring).signed_area
}

struct RingMoments {
    signed_area: f64,
    /// `Σ(xᵢ+xᵢ₊₁)·cᵢ` and `Σ(yᵢ+yᵢ₊₁)·cᵢ` with `cᵢ` the shoelace term.
    first_moment: Vec2,
    perimeter: f64,
}

fn ring_moments(ring: &[Point]) -> RingMoments {
    let mut twice_area = 0.0;
    let mut first_moment = Vec2::ZERO;
    let mut perimeter = 0.0;
    for (i, &p) in ring.iter().enumerate() {
        let q = ring[(i + 1) % ring.len()];
        let c = p.x * q.y - q.x * p.y;
        twice_area += c;
        first_moment += Vec2::new((p.x + q.x) * c, (p.y + q.y) * c);
        perimeter += p.distance(q);
    }
    RingMoments {
        signed_area: twice_area / 2.0,
        first_moment,
        perimeter,
    }
}

fn measure_rings(rings: &[Vec<Point>]) -> Result<ShapeDescriptor> {
    let rings: Vec<Vec<Point>> = rings
        .iter()
        .map(|r| clean_ring(r))
        .filter(|r| !r.is_empty())
        .collect();
    let all: Vec<Point> = rings.iter().flatten().copied().collect();
    if all.is_empty() {
        return Err(GeometryError::invalid("no vertices"));
    }
    if distinct_count(&all) < 3 {
        return Ok(degenerate(&rings));
    }

    let mut signed = 0.0;
    let mut first_moment = Vec2::ZERO;
    let mut perimeter = 0.0;
    for ring in &rings {
        let m = ring_moments(ring);
        signed += m.signed_area;
        first_moment += m.first_moment;
        perimeter += m.perimeter;
    }

    let bounds = extent(&all);
    let scale = bounds.width().max(bounds.height());
    if signed.abs() <= AREA_EPSILON * scale * scale {
        // Collinear or self-cancelling boundary: no shoelace centroid.
        return Ok(degenerate(&rings));
    }

    let hull = convex_hull(&all);
    Ok(ShapeDescriptor::new(
        signed.abs(),
        perimeter,
        (first_moment / (6.0 * signed)).to_point(),
        feret_diameters(&hull),
        (bounds.width(), bounds.height()),
    ))
}

/// Drop consecutive duplicates and a repeated closing vertex.
fn clean_ring(ring: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(ring.len());
    for &p in ring {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

fn rings_from_elements(elements: impl IntoIterator<Item = PathEl>) -> Result<Vec<Vec<Point>>> {
    let mut rings = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for (index, el) in elements.into_iter().enumerate() {
        match el {
            PathEl::MoveTo(p) => {
                check_point(p)?;
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
                current.push(p);
            }
            PathEl::LineTo(p) => {
                check_point(p)?;
                current.push(p);
            }
            PathEl::ClosePath => {
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
            }
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {
                return Err(GeometryError::UnsupportedSegment { index });
            }
        }
    }
    if !current.is_empty() {
        rings.push(current);
    }
    Ok(rings)
}

// ─── Degenerate fallback ─────────────────────────────────────────────────

/// Fallback over one or more rings. Each ring contributes its own open
/// length; no segment bridges two rings.
fn degenerate<R: AsRef<[Point]>>(rings: &[R]) -> ShapeDescriptor {
    let all: Vec<Point> = rings
        .iter()
        .flat_map(|r| {
            let ring: &[Point] = r.as_ref();
            ring.iter().copied()
        })
        .collect();
    let bounds = extent(&all);
    let (w, h) = (bounds.width(), bounds.height());
    ShapeDescriptor::new(
        0.0,
        rings.iter().map(|r| open_length(r.as_ref())).sum(),
        mean(&all),
        (w.min(h), w.hypot(h)),
        (w, h),
    )
}

fn open_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

fn mean(points: &[Point]) -> Point {
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / points.len() as f64).to_point()
}

fn extent(points: &[Point]) -> Rect {
    let first = points.first().copied().unwrap_or(Point::ZERO);
    points
        .iter()
        .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p))
}

fn distinct_count(points: &[Point]) -> usize {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    sorted.len()
}

// ─── Convex hull & calipers ──────────────────────────────────────────────

/// Convex hull by Andrew's monotone chain, counter-clockwise, without
/// collinear points. Fewer than three distinct inputs are returned as-is.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let turn = |o: Point, a: Point, b: Point| (a - o).cross(b - o);
    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// `(min, max)` caliper widths of a convex hull.
///
/// Rotates a support line along each hull edge; the antipodal vertex
/// advances monotonically, so the whole sweep is linear in the hull size.
pub fn feret_diameters(hull: &[Point]) -> (f64, f64) {
    match hull.len() {
        0 | 1 => return (0.0, 0.0),
        2 => return (0.0, hull[0].distance(hull[1])),
        _ => {}
    }

    let n = hull.len();
    let mut min_width = f64::INFINITY;
    let mut max_width: f64 = 0.0;
    let mut j = 1;
    for i in 0..n {
        let a = hull[i];
        let b = hull[(i + 1) % n];
        let edge = b - a;
        while edge.cross(hull[(j + 1) % n] - a).abs() > edge.cross(hull[j] - a).abs() {
            j = (j + 1) % n;
        }
        min_width = min_width.min(edge.cross(hull[j] - a).abs() / edge.hypot());
        for p in [hull[j], hull[(j + 1) % n]] {
            max_width = max_width.max(a.distance(p)).max(b.distance(p));
        }
    }
    (min_width, max_width)
}

// ─── Validation ──────────────────────────────────────────────────────────

fn check_point(p: Point) -> Result<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::invalid(format!(
            "non-finite coordinate ({}, {})",
            p.x, p.y
        )))
    }
}

fn check_element(el: &PathEl) -> Result<()> {
    match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => check_point(p),
        PathEl::QuadTo(p1, p2) => check_point(p1).and(check_point(p2)),
        PathEl::CurveTo(p1, p2, p3) => check_point(p1)
            .and(check_point(p2))
            .and(check_point(p3)),
        PathEl::ClosePath => Ok(()),
    }
}

fn check_extent(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() {
        return Err(GeometryError::invalid(format!("non-finite {what} {value}")));
    }
    if value < 0.0 {
        return Err(GeometryError::invalid(format!("negative {what} {value}")));
    }
    Ok(())
}

fn checked_rect(rect: &Rect) -> Result<Rect> {
    check_point(Point::new(rect.x0, rect.y0))?;
    check_point(Point::new(rect.x1, rect.y1))?;
    Ok(rect.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
            Point::new(0.0, 3.0),
        ]
    }

    #[test]
    fn rectangle_exact() {
        let d = for_rectangle(4.0, 3.0).unwrap();
        assert_eq!(d.area, 12.0);
        assert_eq!(d.perimeter, 14.0);
        assert_eq!(d.feret_min, 3.0);
        assert_eq!(d.feret_max, 5.0);
        assert_eq!(d.centroid(), Point::new(2.0, 1.5));
    }

    #[test]
    fn ellipse_perimeter_matches_reference() {
        // a = 5, b = 3: Ramanujan II gives 25.5269988627...
        let d = for_ellipse(10.0, 6.0).unwrap();
        assert!((d.perimeter - 25.526_998_862_8).abs() < 1e-6, "{}", d.perimeter);
        assert!(close(d.area, PI * 15.0));
        assert_eq!((d.feret_min, d.feret_max), (6.0, 10.0));
    }

    #[test]
    fn flat_ellipse_has_zero_area() {
        let d = for_ellipse(0.0, 0.0).unwrap();
        assert_eq!(d.perimeter, 0.0);
        assert_eq!(d.area, 0.0);
    }

    #[test]
    fn negative_extent_rejected() {
        assert!(matches!(
            for_rectangle(-1.0, 2.0),
            Err(GeometryError::InvalidGeometry { .. })
        ));
        assert!(for_ellipse(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn polygon_matches_rectangle() {
        let d = for_vertices(&square()).unwrap();
        assert!(close(d.area, 12.0));
        assert!(close(d.perimeter, 14.0));
        assert!(close(d.centroid_x, 2.0) && close(d.centroid_y, 1.5));
        assert!(close(d.feret_min, 3.0));
        assert!(close(d.feret_max, 5.0));
    }

    #[test]
    fn closing_duplicate_is_ignored() {
        let mut ring = square();
        ring.push(Point::new(0.0, 0.0));
        let d = for_vertices(&ring).unwrap();
        assert!(close(d.perimeter, 14.0));
    }

    #[test]
    fn two_vertices_fall_back() {
        let d = for_vertices(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]).unwrap();
        assert_eq!(d.area, 0.0);
        assert_eq!(d.perimeter, 5.0);
        assert_eq!(d.centroid(), Point::new(1.5, 2.0));
        assert_eq!(d.feret_min, 3.0);
        assert_eq!(d.feret_max, 5.0);
    }

    #[test]
    fn single_vertex_is_a_point() {
        let d = for_vertices(&[Point::new(2.0, 7.0)]).unwrap();
        assert_eq!(d.perimeter, 0.0);
        assert_eq!(d.centroid(), Point::new(2.0, 7.0));
        assert_eq!(d.feret_max, 0.0);
    }

    #[test]
    fn collinear_ring_has_zero_area_and_finite_centroid() {
        let d = for_vertices(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ])
        .unwrap();
        assert_eq!(d.area, 0.0);
        assert!(d.centroid_x.is_finite() && d.centroid_y.is_finite());
        assert!(close(d.centroid_x, 1.0));
        // Open length, bounding-box calipers.
        assert!(close(d.perimeter, 8f64.sqrt()));
        assert!(close(d.feret_min, 2.0));
        assert!(close(d.feret_max, 8f64.sqrt()));
    }

    #[test]
    fn degenerate_rings_are_not_bridged() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((3.0, 0.0));
        path.move_to((10.0, 0.0));
        path.line_to((13.0, 0.0));
        let d = for_polygon(&path).unwrap();
        assert_eq!(d.area, 0.0);
        assert!(close(d.perimeter, 6.0));
        assert!(close(d.feret_max, 13.0));
    }

    #[test]
    fn empty_polygon_rejected() {
        assert!(for_vertices(&[]).is_err());
    }

    #[test]
    fn non_finite_vertex_rejected() {
        let err = for_vertices(&[Point::new(0.0, 0.0), Point::new(f64::INFINITY, 1.0)]);
        assert!(matches!(err, Err(GeometryError::InvalidGeometry { .. })));
    }

    #[test]
    fn curve_segment_rejected_by_polygon_path() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.quad_to((10.0, 10.0), (0.0, 10.0));
        path.close_path();
        assert_eq!(
            for_polygon(&path),
            Err(GeometryError::UnsupportedSegment { index: 2 })
        );
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let mut pts = square();
        pts.push(Point::new(2.0, 1.0));
        pts.push(Point::new(2.0, 0.0));
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(signed_area(&hull) > 0.0);
    }

    #[test]
    fn triangle_feret() {
        // Equilateral triangle with side 2: min width is the height √3.
        let hull = convex_hull(&[
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 3f64.sqrt()),
        ]);
        let (min, max) = feret_diameters(&hull);
        assert!(close(min, 3f64.sqrt()));
        assert!(close(max, 2.0));
    }

    #[test]
    fn primitive_centroid_uses_rect_origin() {
        let d = compute_shape_descriptor(
            &Shape::Rectangle(Rect::new(10.0, 20.0, 14.0, 23.0)),
            DEFAULT_FLATTEN_TOLERANCE,
        )
        .unwrap();
        assert_eq!(d.centroid(), Point::new(12.0, 21.5));
        assert_eq!(d.area, 12.0);
    }

    #[test]
    fn polyline_is_open() {
        let d = for_polyline(&[
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(d.area, 0.0);
        assert_eq!(d.perimeter, 7.0);
        assert!(close(d.feret_max, 5.0));
    }
}
