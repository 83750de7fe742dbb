//! Corner geometry for stroked outlines
//!
//! Pure functions that turn a corner of a stroked polyline into the pair of
//! offset points the quad strokers stitch together. Nothing here touches the
//! staging buffer; the strokers in [`crate::line`], [`crate::polygon`] and
//! [`crate::path`] decide what to do with the points.
//!
//! A *pointy* join extends both edges to their miter intersection, so a
//! corner is watertight with a single point pair. A *smooth* join instead
//! offsets perpendicular to one edge at a time; the wedge left between the
//! two edge rectangles is filled separately (see
//! [`crate::polygon::draw_smooth_join_fill`]).

use nib_geom::{is_fuzzy_zero, Vec2, FUZZY_EPSILON};

/// How corners between adjacent edges are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JoinType {
    /// Edges are drawn independently; cheapest, corners may crack or overlap.
    #[default]
    None,
    /// Mitered: edges meet at their offset intersection. Unbounded for very
    /// sharp corners.
    Pointy,
    /// Bevel-like: each edge keeps its own perpendicular end and the gap is
    /// filled with a triangle.
    Smooth,
}

/// The two stroke-boundary points computed for one corner.
///
/// `d` lies on the clockwise-perpendicular side of the incoming edge and `e`
/// on the counter-clockwise side, so for a right-bending corner
/// (`bends_left == false`) `d` is the outside point and `e` the inside
/// point, and vice versa.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Join {
    pub d: Vec2,
    pub e: Vec2,
    pub bends_left: bool,
}

impl Join {
    /// The point on the outer side of the bend.
    pub fn outside(&self) -> Vec2 {
        if self.bends_left {
            self.e
        } else {
            self.d
        }
    }

    /// The point on the inner side of the bend.
    pub fn inside(&self) -> Vec2 {
        if self.bends_left {
            self.d
        } else {
            self.e
        }
    }
}

/// Whether a stroke of `thickness` is wide enough on screen for joins to be
/// worth the extra quads. Below the threshold the edges overlap within a
/// couple of pixels anyway.
pub fn is_join_necessary(thickness: f32, pixel_size: f32) -> bool {
    thickness > 3.0 * pixel_size
}

/// Miter join at `b` between edges `a -> b` and `b -> c`, for a stroke of
/// half-width `half`. Degenerates to [`prepare_straight_join`] when the
/// three points are collinear.
pub fn prepare_pointy_join(a: Vec2, b: Vec2, c: Vec2, half: f32) -> Join {
    let ab = b - a;
    let bc = c - b;
    let angle = ab.angle_to(bc);
    if is_fuzzy_zero(angle, FUZZY_EPSILON) {
        return prepare_straight_join(b, ab, half);
    }

    // Distance from b to the offset intersection along each edge direction.
    // Magnitude only: the side swap below handles the bend direction.
    let len = (half / angle.sin()).abs();
    let ab = ab.with_length(len);
    let bc = bc.with_length(len);
    let bends_left = angle < 0.0;

    let inside = b - ab + bc;
    let outside = b + ab - bc;
    if bends_left {
        Join { d: inside, e: outside, bends_left }
    } else {
        Join { d: outside, e: inside, bends_left }
    }
}

/// Bevel join at `b`. The offset is perpendicular to a single edge: the
/// outgoing edge `b -> c` when `start_of_edge` is set, otherwise the
/// incoming edge `a -> b`. Call once per edge end and fill the wedge between
/// the two results.
pub fn prepare_smooth_join(a: Vec2, b: Vec2, c: Vec2, half: f32, start_of_edge: bool) -> Join {
    let ab = b - a;
    let bc = c - b;
    let angle = ab.angle_to(bc);
    let bends_left = angle < 0.0;

    let edge = if start_of_edge { bc } else { ab };
    let edge = edge.with_length(half);
    let outside_offset = if bends_left {
        edge.perp_ccw()
    } else {
        edge.perp_cw()
    };

    let outside = b + outside_offset;
    let inside = b - outside_offset;
    if bends_left {
        Join { d: inside, e: outside, bends_left }
    } else {
        Join { d: outside, e: inside, bends_left }
    }
}

/// Perpendicular offsets at `b` for an edge running along `dir`, used where
/// no bend exists (collinear corners, ends of no-join strokes).
pub fn prepare_straight_join(b: Vec2, dir: Vec2, half: f32) -> Join {
    let offset = dir.with_length(half);
    Join {
        d: b + offset.perp_cw(),
        e: b + offset.perp_ccw(),
        bends_left: true,
    }
}

/// Square cap at `end` of the edge arriving from `path_point`. Returns the
/// `(d, e)` boundary points, `d` on the clockwise-perpendicular side.
pub fn prepare_flat_endpoint(path_point: Vec2, end: Vec2, half: f32) -> (Vec2, Vec2) {
    let v = (end - path_point).with_length(half);
    (end + v.perp_cw(), end + v.perp_ccw())
}

/// Cap for arc endpoints: offsets `a` radially away from and towards the
/// center (the origin; callers work center-relative).
pub fn prepare_radial_endpoint(a: Vec2, half: f32) -> (Vec2, Vec2) {
    let offset = a.with_length(half);
    (a + offset, a - offset)
}
