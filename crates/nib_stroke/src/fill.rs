//! Filled primitives
//!
//! Solid rectangles, triangles and regular-polygon sectors. Regular-polygon
//! fills are fans around the center; adjacent fan triangles are paired into
//! one quad so a full shape costs roughly half the records a naive fan
//! would. Arbitrary polygons are filled from caller-supplied triangle
//! indices; this crate does not triangulate.

use std::f32::consts::TAU;

use nib_geom::{is_fuzzy_equal, Vec2, FUZZY_EPSILON};

use crate::batch::BatchManager;
use crate::sink::DrawSink;

/// Axis-aligned position/size rectangle, rotated around its center. One
/// packed color per corner, counter-clockwise from the top-right.
pub fn filled_rectangle<S: DrawSink>(
    batch: &mut BatchManager<S>,
    position: Vec2,
    size: Vec2,
    rotation: f32,
    colors: [f32; 4],
) {
    let caching = batch.caching_draws();
    batch.ensure_space_for_quad();
    let (sin, cos) = rotation.sin_cos();
    let half = size * 0.5;
    let center = position + half;
    batch.set_vert(0, half.x * cos - half.y * sin + center.x, half.x * sin + half.y * cos + center.y);
    batch.set_vert(1, -half.x * cos - half.y * sin + center.x, -half.x * sin + half.y * cos + center.y);
    batch.set_vert(2, -half.x * cos + half.y * sin + center.x, -half.x * sin - half.y * cos + center.y);
    batch.set_vert(3, half.x * cos + half.y * sin + center.x, half.x * sin - half.y * cos + center.y);
    for (i, color) in colors.into_iter().enumerate() {
        batch.set_color(i, color);
    }
    batch.push_quad();
    if !caching {
        batch.flush();
    }
}

/// Solid triangle with one packed color per corner.
pub fn filled_triangle<S: DrawSink>(
    batch: &mut BatchManager<S>,
    p1: Vec2,
    p2: Vec2,
    p3: Vec2,
    colors: [f32; 3],
) {
    let caching = batch.caching_draws();
    batch.ensure_space_for_triangle();
    batch.set_vert_v(0, p1);
    batch.set_vert_v(1, p2);
    batch.set_vert_v(2, p3);
    for (i, color) in colors.into_iter().enumerate() {
        batch.set_color(i, color);
    }
    batch.push_triangle();
    if !caching {
        batch.flush();
    }
}

/// Filled regular-polygon sector: a fan from `center` over the same angular
/// lattice the outline stroker walks. `inner_color` sits on the center
/// vertex and `outer_color` on the rim, giving radial gradients for free.
#[allow(clippy::too_many_arguments)]
pub fn filled_polygon<S: DrawSink>(
    batch: &mut BatchManager<S>,
    center: Vec2,
    sides: u32,
    radius: Vec2,
    rotation: f32,
    start_angle: f32,
    sweep: f32,
    inner_color: f32,
    outer_color: f32,
) {
    if sweep <= 0.0 {
        return;
    }
    let sweep = sweep.min(TAU);

    let was_caching = batch.start_caching();

    let angle_interval = TAU / sides as f32;
    let end_angle = start_angle + sweep;
    let (sin, cos) = angle_interval.sin_cos();
    let (sin_rot, cos_rot) = rotation.sin_cos();

    let mut start = (sides as f32 * (start_angle / TAU)).ceil() as i32;
    if is_fuzzy_equal(start as f32 * angle_interval, start_angle, FUZZY_EPSILON) {
        start += 1;
    }
    let end = (sides as f32 * (end_angle / TAU)).floor() as i32 + 1;

    let mut b = Vec2::from_angle(start_angle).scale(radius);
    let mut dir = Vec2::ZERO;
    let mut c = Vec2::ZERO;

    // Fan points between start and end angle, the two ends included.
    let n = end - start + 1;
    if n < 2 {
        // The sweep crosses no lattice step: one triangle from start angle
        // straight to end angle.
        batch.ensure_space_for_triangle();
        let a = Vec2::from_angle(start_angle).scale(radius);
        let b = Vec2::from_angle(end_angle).scale(radius);
        batch.set_vert_v(0, center);
        batch.set_vert_v(1, transformed(a, cos_rot, sin_rot, center));
        batch.set_vert_v(2, transformed(b, cos_rot, sin_rot, center));
        batch.set_color(0, inner_color);
        batch.set_color(1, outer_color);
        batch.set_color(2, outer_color);
        batch.push_triangle();
    } else {
        dir = Vec2::from_angle((start as f32 * angle_interval).min(end_angle));
        c = dir.scale(radius);
    }

    for i in 0..n - 1 {
        let a = b;
        b = c;
        if i < n - 2 {
            dir = Vec2::new(dir.x * cos - dir.y * sin, dir.x * sin + dir.y * cos);
            c = dir.scale(radius);
        } else {
            c = Vec2::from_angle(end_angle).scale(radius);
        }

        if i % 2 == 0 {
            // Pair this fan triangle with the next one as a single quad.
            batch.ensure_space_for_quad();
            batch.set_vert_v(0, center);
            batch.set_vert_v(1, transformed(a, cos_rot, sin_rot, center));
            batch.set_vert_v(2, transformed(b, cos_rot, sin_rot, center));
            batch.set_vert_v(3, transformed(c, cos_rot, sin_rot, center));
            batch.set_color(0, inner_color);
            batch.set_color(1, outer_color);
            batch.set_color(2, outer_color);
            batch.set_color(3, outer_color);
            batch.push_quad();
        } else if i == n - 2 {
            // Odd leftover at the end of the sweep.
            batch.ensure_space_for_triangle();
            batch.set_vert_v(0, center);
            batch.set_vert_v(1, transformed(b, cos_rot, sin_rot, center));
            batch.set_vert_v(2, transformed(c, cos_rot, sin_rot, center));
            batch.set_color(0, inner_color);
            batch.set_color(1, outer_color);
            batch.set_color(2, outer_color);
            batch.push_triangle();
        }
    }

    if !was_caching {
        batch.end_caching();
    }
}

/// Fill an arbitrary polygon from pre-triangulated indices: `triangles`
/// holds index triples into `vertices`.
pub fn filled_polygon_indexed<S: DrawSink>(
    batch: &mut BatchManager<S>,
    vertices: &[Vec2],
    triangles: &[u16],
    color: f32,
) {
    let caching = batch.caching_draws();
    for triple in triangles.chunks_exact(3) {
        batch.ensure_space_for_triangle();
        for (i, &index) in triple.iter().enumerate() {
            batch.set_vert_v(i, vertices[index as usize]);
            batch.set_color(i, color);
        }
        batch.push_triangle();
    }
    if !caching {
        batch.flush();
    }
}

fn transformed(v: Vec2, cos_rot: f32, sin_rot: f32, center: Vec2) -> Vec2 {
    Vec2::new(
        v.x * cos_rot - v.y * sin_rot + center.x,
        v.x * sin_rot + v.y * cos_rot + center.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::recording_batch;
    use crate::VERTEX_SIZE;

    fn positions(data: &[f32]) -> Vec<Vec2> {
        data.chunks_exact(VERTEX_SIZE)
            .map(|record| Vec2::new(record[0], record[1]))
            .collect()
    }

    #[test]
    fn test_filled_rectangle_corners() {
        let mut batch = recording_batch();
        filled_rectangle(
            &mut batch,
            Vec2::ZERO,
            Vec2::new(10.0, 6.0),
            0.0,
            [1.0, 2.0, 3.0, 4.0],
        );
        let subs = &batch.sink().submissions;
        assert_eq!(subs.len(), 1);
        let verts = positions(&subs[0].1);
        assert_eq!(verts[0], Vec2::new(10.0, 6.0));
        assert_eq!(verts[1], Vec2::new(0.0, 6.0));
        assert_eq!(verts[2], Vec2::new(0.0, 0.0));
        assert_eq!(verts[3], Vec2::new(10.0, 0.0));
        let colors: Vec<f32> = subs[0].1.chunks_exact(VERTEX_SIZE).map(|r| r[4]).collect();
        assert_eq!(colors, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_filled_rectangle_rotation_preserves_center() {
        let mut batch = recording_batch();
        batch.start_caching();
        filled_rectangle(
            &mut batch,
            Vec2::new(2.0, 2.0),
            Vec2::new(4.0, 4.0),
            std::f32::consts::FRAC_PI_4,
            [0.0; 4],
        );
        let center = Vec2::new(4.0, 4.0);
        for v in batch.staged() {
            let r = (Vec2::new(v.x, v.y) - center).length();
            assert!((r - 8.0_f32.sqrt()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_filled_triangle_is_degenerate_quad() {
        let mut batch = recording_batch();
        filled_triangle(
            &mut batch,
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(2.0, 3.0),
            [1.0, 1.0, 1.0],
        );
        let subs = &batch.sink().submissions;
        assert_eq!(subs.len(), 1);
        let verts = positions(&subs[0].1);
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[3], verts[2]);
    }

    #[test]
    fn test_filled_hexagon_fan_pairs_triangles() {
        let mut batch = recording_batch();
        filled_polygon(
            &mut batch,
            Vec2::ZERO,
            6,
            Vec2::new(10.0, 10.0),
            0.0,
            0.0,
            TAU,
            7.0,
            9.0,
        );
        let subs = &batch.sink().submissions;
        assert_eq!(subs.len(), 1);
        let verts = positions(&subs[0].1);
        // Three quads covering two fan segments each, plus the (degenerate)
        // closing triangle at the end of the sweep.
        assert_eq!(verts.len(), 16);
        for v in &verts {
            let r = v.length();
            assert!(r < 1e-5 || (r - 10.0).abs() < 1e-3, "unexpected radius {r}");
        }
        // Center vertices carry the inner color, rim ones the outer color.
        for record in subs[0].1.chunks_exact(VERTEX_SIZE) {
            let expected = if Vec2::new(record[0], record[1]).length() < 1e-5 { 7.0 } else { 9.0 };
            assert_eq!(record[4], expected);
        }
    }

    #[test]
    fn test_filled_sliver_is_single_triangle() {
        let mut batch = recording_batch();
        filled_polygon(
            &mut batch,
            Vec2::ZERO,
            6,
            Vec2::new(10.0, 10.0),
            0.0,
            0.1,
            0.2,
            1.0,
            1.0,
        );
        let subs = &batch.sink().submissions;
        assert_eq!(subs.len(), 1);
        let verts = positions(&subs[0].1);
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[0], Vec2::ZERO);
        assert!(verts[1].fuzzy_eq(Vec2::from_angle(0.1) * 10.0, 1e-4));
        assert!(verts[2].fuzzy_eq(Vec2::from_angle(0.3) * 10.0, 1e-4));
    }

    #[test]
    fn test_zero_sweep_is_noop() {
        let mut batch = recording_batch();
        filled_polygon(&mut batch, Vec2::ZERO, 6, Vec2::new(10.0, 10.0), 0.0, 0.0, 0.0, 1.0, 1.0);
        assert!(batch.sink().submissions.is_empty());
    }

    #[test]
    fn test_indexed_polygon_respects_caching() {
        let quad = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let triangles = [0u16, 1, 2, 0, 2, 3];

        let mut batch = recording_batch();
        filled_polygon_indexed(&mut batch, &quad, &triangles, 1.0);
        assert_eq!(batch.sink().submissions.len(), 1);
        assert_eq!(batch.sink().submissions[0].1.len(), 2 * 4 * VERTEX_SIZE);

        batch.start_caching();
        filled_polygon_indexed(&mut batch, &quad, &triangles, 1.0);
        assert_eq!(batch.sink().submissions.len(), 1);
        batch.end_caching();
        assert_eq!(batch.sink().submissions.len(), 2);
    }
}
