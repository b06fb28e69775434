//! Curve data model.
//!
//! A [`Curve`] is an ordered vertex list tagged with a [`CurveKind`]. The kind
//! carries the per-type policies the editor consults: whether construction
//! needs an explicit finish gesture, whether the first press is a real vertex,
//! and whether clicks on the body reshape it.

use crate::descriptor::ShapeDescriptor;
use crate::error::Result;
use crate::geometry::{self, Shape};
use crate::id::CurveKey;
use kurbo::{BezPath, Line, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Modifiers ───────────────────────────────────────────────────────────

/// Keyboard modifier state at the time of a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

/// Snap `point` onto the horizontal or vertical line through `anchor`,
/// whichever axis dominates the offset.
pub fn constrain_to_axis(anchor: Point, point: Point) -> Point {
    let d = point - anchor;
    if d.x.abs() > d.y.abs() {
        Point::new(point.x, anchor.y)
    } else {
        Point::new(anchor.x, point.y)
    }
}

// ─── Curve kinds ─────────────────────────────────────────────────────────

/// Shape family of a curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// A single marker point.
    Point,
    /// Open two-vertex segment.
    Line,
    /// Closed polygon region.
    #[default]
    Polygon,
    /// Open multi-segment polyline.
    Composite,
}

/// What the press that begins construction contributes to the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    /// The seed is committed as vertex 0.
    Vertex,
    /// The seed is a provisional placeholder; the first placed vertex
    /// replaces it.
    Placeholder,
}

impl CurveKind {
    /// Complex kinds keep accepting vertices until an explicit finish
    /// gesture; simple kinds finish on the next click.
    pub fn is_complex(self) -> bool {
        matches!(self, Self::Polygon | Self::Composite)
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::Polygon)
    }

    /// Fewest committed vertices a finished curve of this kind keeps.
    pub fn min_vertices(self) -> usize {
        match self {
            Self::Point => 1,
            Self::Line | Self::Composite => 2,
            Self::Polygon => 3,
        }
    }

    pub fn max_vertices(self) -> Option<usize> {
        match self {
            Self::Point => Some(1),
            Self::Line => Some(2),
            Self::Polygon | Self::Composite => None,
        }
    }

    pub fn seed_policy(self) -> SeedPolicy {
        match self {
            Self::Composite => SeedPolicy::Placeholder,
            Self::Point | Self::Line | Self::Polygon => SeedPolicy::Vertex,
        }
    }

    /// Whether clicks on the body may insert or remove control vertices.
    pub fn reshapes_on_click(self) -> bool {
        matches!(self, Self::Polygon | Self::Composite)
    }
}

// ─── Anchors ─────────────────────────────────────────────────────────────

/// Hit-testable handle of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorKind {
    /// A single vertex, dragged freely.
    Vertex(usize),
    /// Midpoint handle of segment `i`; dragging moves both endpoints.
    Edge(usize),
    /// The curve as a whole; dragging translates it.
    WholeCurve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorRef {
    pub key: CurveKey,
    pub kind: AnchorKind,
}

// ─── Curve ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub point: Point,
    /// Set while the vertex follows the pointer during construction.
    pub provisional: bool,
}

impl Vertex {
    pub const fn committed(point: Point) -> Self {
        Self {
            point,
            provisional: false,
        }
    }

    pub const fn provisional(point: Point) -> Self {
        Self {
            point,
            provisional: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub key: CurveKey,
    pub kind: CurveKind,
    pub vertices: SmallVec<[Vertex; 4]>,
    pub finished: bool,
    pub highlighted: bool,
    pub visible: bool,
}

impl Curve {
    /// A finished curve through `points`, all committed.
    pub fn new(key: CurveKey, kind: CurveKind, points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            key,
            kind,
            vertices: points.into_iter().map(Vertex::committed).collect(),
            finished: true,
            highlighted: false,
            visible: true,
        }
    }

    /// An unfinished curve seeded at `anchor` according to the kind's
    /// [`SeedPolicy`].
    pub fn seeded(key: CurveKey, kind: CurveKind, anchor: Point) -> Self {
        let seed = match kind.seed_policy() {
            SeedPolicy::Vertex => Vertex::committed(anchor),
            SeedPolicy::Placeholder => Vertex::provisional(anchor),
        };
        let mut vertices = SmallVec::new();
        vertices.push(seed);
        Self {
            key,
            kind,
            vertices,
            finished: false,
            highlighted: false,
            visible: true,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().map(|v| v.point)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn last_committed(&self) -> Option<Point> {
        self.vertices
            .iter()
            .rev()
            .find(|v| !v.provisional)
            .map(|v| v.point)
    }

    // ─── Construction ────────────────────────────────────────────────────

    /// Reposition the trailing provisional vertex, or append one.
    /// Shift constrains the new position to the axis through the last
    /// committed vertex.
    pub fn extend(&mut self, point: Point, modifiers: Modifiers) {
        let point = match self.last_committed() {
            Some(anchor) if modifiers.shift => constrain_to_axis(anchor, point),
            _ => point,
        };
        if let Some(last) = self.vertices.last_mut().filter(|v| v.provisional) {
            last.point = point;
            return;
        }
        if self.kind.max_vertices().is_some_and(|max| self.len() >= max) {
            return;
        }
        self.vertices.push(Vertex::provisional(point));
    }

    /// Commit a vertex at `point`, consuming the provisional one if any.
    /// Returns `false` when the kind is already full.
    pub fn place(&mut self, point: Point) -> bool {
        if let Some(last) = self.vertices.last_mut().filter(|v| v.provisional) {
            *last = Vertex::committed(point);
            return true;
        }
        if self.kind.max_vertices().is_some_and(|max| self.len() >= max) {
            return false;
        }
        self.vertices.push(Vertex::committed(point));
        true
    }

    /// Drop provisional vertices (or commit them, when the kind would
    /// otherwise fall short of its minimum) and mark the curve finished.
    pub fn finalize(&mut self) {
        let committed = self.vertices.iter().filter(|v| !v.provisional).count();
        if committed >= self.kind.min_vertices() {
            self.vertices.retain(|v| !v.provisional);
        }
        for v in &mut self.vertices {
            v.provisional = false;
        }
        self.finished = true;
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    pub fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            v.point += delta;
        }
    }

    pub fn move_vertex(&mut self, index: usize, point: Point) -> bool {
        match self.vertices.get_mut(index) {
            Some(v) => {
                v.point = point;
                true
            }
            None => false,
        }
    }

    /// Translate both endpoints of segment `index`.
    pub fn move_edge(&mut self, index: usize, delta: Vec2) -> bool {
        let Some((a, b)) = self.edge_indices(index) else {
            return false;
        };
        self.vertices[a].point += delta;
        self.vertices[b].point += delta;
        true
    }

    /// Insert a committed vertex so it becomes index `index`.
    pub fn insert_vertex(&mut self, index: usize, point: Point) -> bool {
        if index > self.len() || self.kind.max_vertices().is_some_and(|max| self.len() >= max) {
            return false;
        }
        self.vertices.insert(index, Vertex::committed(point));
        true
    }

    /// Remove vertex `index` unless that would drop below the kind's minimum.
    pub fn remove_vertex(&mut self, index: usize) -> bool {
        if index >= self.len() || self.len() <= self.kind.min_vertices() {
            return false;
        }
        self.vertices.remove(index);
        true
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Number of boundary segments, including the closing edge of a
    /// closed curve with at least three vertices.
    pub fn segment_count(&self) -> usize {
        match self.len() {
            0 | 1 => 0,
            n if self.kind.is_closed() && n >= 3 => n,
            n => n - 1,
        }
    }

    fn edge_indices(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.segment_count()).then(|| (index, (index + 1) % self.len()))
    }

    pub fn segment(&self, index: usize) -> Option<Line> {
        self.edge_indices(index)
            .map(|(a, b)| Line::new(self.vertices[a].point, self.vertices[b].point))
    }

    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.segment_count()).filter_map(|i| self.segment(i))
    }

    pub fn bounding_box(&self) -> Rect {
        let mut points = self.points();
        let Some(first) = points.next() else {
            return Rect::ZERO;
        };
        points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p))
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points();
        if let Some(first) = points.next() {
            path.move_to(first);
            for p in points {
                path.line_to(p);
            }
            if self.kind.is_closed() {
                path.close_path();
            }
        }
        path
    }

    pub fn shape(&self) -> Shape {
        let points = self.points().collect();
        if self.kind.is_closed() {
            Shape::Polygon(points)
        } else {
            Shape::Polyline(points)
        }
    }

    pub fn descriptor(&self, tolerance: f64) -> Result<ShapeDescriptor> {
        geometry::compute_shape_descriptor(&self.shape(), tolerance)
    }
}
