//! Single-segment stroker
//!
//! One segment in, one quad out. This is the hot path of the whole engine:
//! the no-join polygon stroker and the thin-stroke fallbacks all funnel
//! through [`push_line`].

use nib_geom::Vec2;

use crate::batch::BatchManager;
use crate::sink::DrawSink;

/// Stroke the segment `a -> b` with the batch's current color, flushing
/// afterwards unless a caching run is active.
pub fn line<S: DrawSink>(batch: &mut BatchManager<S>, a: Vec2, b: Vec2, thickness: f32, snap: bool) {
    let color = batch.color_bits();
    push_line(batch, a, b, thickness, snap, color, color);
    if !batch.caching_draws() {
        batch.flush();
    }
}

/// Stage the quad for one stroked segment. `color1` is stamped on the two
/// corners at `a` and `color2` on the two at `b`, so a gradient along the
/// segment comes for free. Does not flush.
///
/// With `snap` set, both endpoints are rounded to pixel centers and then
/// pulled slightly apart along the segment, so chains of snapped segments
/// overlap by a hair instead of leaving seams.
pub fn push_line<S: DrawSink>(
    batch: &mut BatchManager<S>,
    a: Vec2,
    b: Vec2,
    thickness: f32,
    snap: bool,
    color1: f32,
    color2: f32,
) {
    batch.ensure_space_for_quad();

    let (mut a, mut b) = (a, b);
    if snap {
        let pixel_size = batch.pixel_size();
        let half_pixel = batch.half_pixel_size();
        let offset = batch.snap_offset();
        let dir = b - a;
        a.x = snap_pixel(a.x, pixel_size, half_pixel) - offset * zero_sign(dir.x);
        a.y = snap_pixel(a.y, pixel_size, half_pixel) - offset * zero_sign(dir.y);
        b.x = snap_pixel(b.x, pixel_size, half_pixel) + offset * zero_sign(dir.x);
        b.y = snap_pixel(b.y, pixel_size, half_pixel) + offset * zero_sign(dir.y);
    }

    let half = 0.5 * thickness;
    let d = b - a;
    let (px, py) = if d.y == 0.0 {
        (0.0, half)
    } else if d.x == 0.0 {
        (half, 0.0)
    } else {
        let scale = half / d.length();
        (d.y * scale, d.x * scale)
    };

    batch.set_vert(0, a.x + px, a.y - py);
    batch.set_vert(1, a.x - px, a.y + py);
    batch.set_vert(2, b.x - px, b.y + py);
    batch.set_vert(3, b.x + px, b.y - py);
    batch.set_color(0, color1);
    batch.set_color(1, color1);
    batch.set_color(2, color2);
    batch.set_color(3, color2);
    batch.push_quad();
}

/// Nearest pixel center: a multiple of the pixel size plus half a pixel.
fn snap_pixel(coord: f32, pixel_size: f32, half_pixel: f32) -> f32 {
    (coord / pixel_size).round() * pixel_size + half_pixel
}

/// Like `signum` but 0 for 0, so axis-aligned segments are not nudged
/// sideways.
fn zero_sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::recording_batch;

    fn corners(staged: &[crate::Vertex]) -> Vec<(f32, f32)> {
        staged.iter().map(|v| (v.x, v.y)).collect()
    }

    #[test]
    fn test_horizontal_line_quad() {
        let mut batch = recording_batch();
        push_line(
            &mut batch,
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            4.0,
            false,
            1.0,
            2.0,
        );
        assert_eq!(
            corners(batch.staged()),
            vec![(0.0, -2.0), (0.0, 2.0), (10.0, 2.0), (10.0, -2.0)]
        );
        let colors: Vec<f32> = batch.staged().iter().map(|v| v.color).collect();
        assert_eq!(colors, vec![1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_vertical_line_quad() {
        let mut batch = recording_batch();
        push_line(
            &mut batch,
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 8.0),
            2.0,
            false,
            0.0,
            0.0,
        );
        assert_eq!(
            corners(batch.staged()),
            vec![(6.0, 0.0), (4.0, 0.0), (4.0, 8.0), (6.0, 8.0)]
        );
    }

    #[test]
    fn test_diagonal_offset_is_perpendicular() {
        let mut batch = recording_batch();
        // 3-4-5 triangle: length 5, half-width 5 gives px = 4, py = 3.
        push_line(
            &mut batch,
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 4.0),
            10.0,
            false,
            0.0,
            0.0,
        );
        let staged = corners(batch.staged());
        assert_eq!(staged[0], (4.0, -3.0));
        assert_eq!(staged[1], (-4.0, 3.0));
        assert_eq!(staged[2], (-1.0, 7.0));
        assert_eq!(staged[3], (7.0, 1.0));
    }

    #[test]
    fn test_snap_rounds_to_pixel_centers_and_extends() {
        let mut batch = recording_batch();
        batch.set_pixel_size(1.0);
        push_line(
            &mut batch,
            Vec2::new(0.3, 0.0),
            Vec2::new(10.2, 0.0),
            2.0,
            true,
            0.0,
            0.0,
        );
        let staged = corners(batch.staged());
        // x snaps to 0.5 / 10.5 and the endpoints pull apart by the nudge;
        // y snaps to 0.5 with no nudge (dy == 0).
        assert!((staged[0].0 - 0.499).abs() < 1e-6);
        assert!((staged[2].0 - 10.501).abs() < 1e-6);
        assert!((staged[0].1 - -0.5).abs() < 1e-6);
        assert!((staged[1].1 - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_line_flushes_unless_caching() {
        let mut batch = recording_batch();
        line(&mut batch, Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0, false);
        assert_eq!(batch.sink().submissions.len(), 1);

        batch.start_caching();
        line(&mut batch, Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0, false);
        assert_eq!(batch.sink().submissions.len(), 1);
        batch.end_caching();
        assert_eq!(batch.sink().submissions.len(), 2);
    }
}
