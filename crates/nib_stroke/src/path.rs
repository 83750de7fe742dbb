//! Arbitrary polyline stroker
//!
//! Strokes an open or closed chain of user points. Input is deduplicated
//! first (consecutive points closer than the fuzzy tolerance collapse into
//! one) because zero-length edges would blow up the join math. A path that
//! collapses to two points degrades to a single [`crate::line`] quad.
//!
//! The join-mode walk keeps one quad pending across iterations: the corner
//! pair computed at step `i` becomes the leading pair of step `i + 1`'s
//! quad, so the strip shares corner geometry exactly like the polygon
//! stroker does.

use nib_geom::{is_fuzzy_equal, Vec2, FUZZY_EPSILON};
use smallvec::SmallVec;

use crate::batch::BatchManager;
use crate::join::{
    prepare_flat_endpoint, prepare_pointy_join, prepare_smooth_join, JoinType,
};
use crate::line::line;
use crate::polygon::draw_smooth_join_fill;
use crate::sink::DrawSink;

type PathPoints = SmallVec<[Vec2; 32]>;

/// Stroke the polyline `points`. `open` leaves the ends square-capped;
/// otherwise the last point joins back to the first.
pub fn path<S: DrawSink>(
    batch: &mut BatchManager<S>,
    points: &[Vec2],
    thickness: f32,
    join: JoinType,
    open: bool,
) {
    if points.len() < 2 {
        return;
    }

    let mut pts: PathPoints = SmallVec::new();
    pts.push(points[0]);
    for pair in points.windows(2) {
        let same = is_fuzzy_equal(pair[0].x, pair[1].x, FUZZY_EPSILON)
            && is_fuzzy_equal(pair[0].y, pair[1].y, FUZZY_EPSILON);
        if !same {
            pts.push(pair[1]);
        }
    }
    if pts.len() < 2 {
        return;
    }
    if pts.len() == 2 {
        line(batch, pts[0], pts[1], thickness, false);
        return;
    }

    let was_caching = batch.start_caching();
    if join == JoinType::None {
        draw_path_no_join(batch, &pts, thickness, open);
    } else {
        draw_path_with_join(batch, &pts, thickness, open, join == JoinType::Pointy);
    }
    if !was_caching {
        batch.end_caching();
    }
}

fn draw_path_no_join<S: DrawSink>(
    batch: &mut BatchManager<S>,
    points: &[Vec2],
    thickness: f32,
    open: bool,
) {
    let n = points.len();
    let segments = if open { n - 1 } else { n };
    for i in 0..segments {
        line(batch, points[i], points[(i + 1) % n], thickness, false);
    }
}

fn draw_path_with_join<S: DrawSink>(
    batch: &mut BatchManager<S>,
    points: &[Vec2],
    thickness: f32,
    open: bool,
    pointy: bool,
) {
    let n = points.len();
    let half = 0.5 * thickness;
    let color = batch.color_bits();
    batch.ensure_space_for_quad();

    // Leading corner pair of the first quad, needed again by the closing
    // quad of a closed path.
    let mut first_pair = (Vec2::ZERO, Vec2::ZERO);

    for i in 1..n - 1 {
        let a = points[i - 1];
        let b = points[i];
        let c = points[i + 1];

        let corner = if pointy {
            prepare_pointy_join(a, b, c, half)
        } else {
            prepare_smooth_join(a, b, c, half, false)
        };
        batch.set_vert_v(2, corner.d);
        batch.set_vert_v(3, corner.e);

        if i == 1 {
            if open {
                let (d, e) = prepare_flat_endpoint(points[1], points[0], half);
                batch.set_vert_v(0, e);
                batch.set_vert_v(1, d);
            } else {
                let last = points[n - 1];
                let start_corner = if pointy {
                    prepare_pointy_join(last, a, b, half)
                } else {
                    prepare_smooth_join(last, a, b, half, true)
                };
                first_pair = (start_corner.d, start_corner.e);
                batch.set_vert_v(0, start_corner.e);
                batch.set_vert_v(1, start_corner.d);
            }
        }

        // Pair carried into the next quad: for a pointy join the corner is
        // shared as-is, for a smooth join the next edge starts on its own
        // perpendicular.
        let carry = if pointy {
            corner
        } else {
            prepare_smooth_join(a, b, c, half, true)
        };

        batch.set_quad_color(color);
        batch.push_quad();
        if !pointy {
            draw_smooth_join_fill(batch, a, b, c, Vec2::ZERO, 1.0, 0.0, half);
        }
        batch.ensure_space_for_quad();
        batch.set_vert_v(0, carry.e);
        batch.set_vert_v(1, carry.d);
    }

    let b = points[n - 2];
    let c = points[n - 1];
    if open {
        let (d, e) = prepare_flat_endpoint(b, c, half);
        batch.set_vert_v(2, e);
        batch.set_vert_v(3, d);
        batch.set_quad_color(color);
        batch.push_quad();
    } else if pointy {
        let first = points[0];
        let end_corner = prepare_pointy_join(b, c, first, half);
        batch.set_vert_v(2, end_corner.d);
        batch.set_vert_v(3, end_corner.e);
        batch.set_quad_color(color);
        batch.push_quad();

        // Close the loop back onto the first corner pair.
        batch.ensure_space_for_quad();
        batch.set_vert_v(0, end_corner.d);
        batch.set_vert_v(1, end_corner.e);
        batch.set_vert_v(2, first_pair.1);
        batch.set_vert_v(3, first_pair.0);
        batch.set_quad_color(color);
        batch.push_quad();
    } else {
        let a = b;
        let b = c;
        let c = points[0];
        let end_corner = prepare_smooth_join(a, b, c, half, false);
        batch.set_vert_v(2, end_corner.d);
        batch.set_vert_v(3, end_corner.e);
        batch.set_quad_color(color);
        batch.push_quad();
        draw_smooth_join_fill(batch, a, b, c, Vec2::ZERO, 1.0, 0.0, half);

        // Close the loop: from this corner's outgoing perpendicular to the
        // first point's incoming one, plus the first corner's wedge.
        batch.ensure_space_for_quad();
        let out_corner = prepare_smooth_join(a, b, c, half, true);
        batch.set_vert_v(2, out_corner.e);
        batch.set_vert_v(3, out_corner.d);
        let a = points[1];
        let close_corner = prepare_smooth_join(b, c, a, half, false);
        batch.set_vert_v(0, close_corner.d);
        batch.set_vert_v(1, close_corner.e);
        batch.set_quad_color(color);
        batch.push_quad();
        draw_smooth_join_fill(batch, b, c, a, Vec2::ZERO, 1.0, 0.0, half);
    }
}
