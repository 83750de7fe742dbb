//! Regular-polygon and arc stroker
//!
//! Outlines of regular polygons, circles and ellipses (a circle is just a
//! polygon with enough sides), full or partial sweep. Two algorithms:
//!
//! * no-join: each edge is an independent quad through [`crate::line`];
//!   corners overlap or gap by up to the stroke thickness, invisible for
//!   thin strokes,
//! * join: a sliding three-point window feeds [`crate::join`] so adjacent
//!   quads share their corner points exactly, with radial caps at the open
//!   ends of a partial arc and an extra wedge triangle per smooth corner.
//!
//! All geometry is computed center-relative on the unit circle, scaled by
//! the per-axis radius, then rotated and translated into place.

use std::f32::consts::TAU;

use nib_geom::{is_fuzzy_equal, Vec2, FUZZY_EPSILON};

use crate::batch::BatchManager;
use crate::join::{
    is_join_necessary, prepare_pointy_join, prepare_radial_endpoint, prepare_smooth_join,
    JoinType,
};
use crate::line::push_line;
use crate::sink::DrawSink;

/// A regular-polygon (or arc) outline description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polygon {
    pub center: Vec2,
    pub sides: u32,
    /// Per-axis radius; unequal components give an ellipse-like shape.
    pub radius: Vec2,
    /// Rotation of the whole shape around its center, radians.
    pub rotation: f32,
    pub thickness: f32,
    pub join: JoinType,
    /// Where the sweep starts on the perimeter, radians.
    pub start_angle: f32,
    /// Angular extent, radians. Values beyond a full turn are capped.
    pub sweep: f32,
}

impl Polygon {
    pub fn new(center: Vec2, sides: u32, radius: Vec2) -> Self {
        Self {
            center,
            sides,
            radius,
            rotation: 0.0,
            thickness: 1.0,
            join: JoinType::None,
            start_angle: 0.0,
            sweep: TAU,
        }
    }
}

/// Stroke a polygon outline. The whole shape goes out as one cached run
/// unless the caller already holds a caching scope open.
pub fn polygon<S: DrawSink>(batch: &mut BatchManager<S>, shape: &Polygon) {
    if shape.sweep <= 0.0 {
        return;
    }
    let sweep = shape.sweep.min(TAU);

    let was_caching = batch.start_caching();
    if shape.join == JoinType::None {
        draw_polygon_with_no_join(
            batch,
            shape.center,
            shape.sides,
            shape.thickness,
            shape.rotation,
            shape.radius,
            shape.start_angle,
            sweep,
        );
    } else {
        draw_polygon_with_join(
            batch,
            shape.center,
            shape.sides,
            0.5 * shape.thickness,
            shape.rotation,
            shape.radius,
            shape.start_angle,
            sweep,
            shape.join == JoinType::Smooth,
        );
    }
    if !was_caching {
        batch.end_caching();
    }
}

/// Circle outline. Side count comes from [`estimate_sides_required`] and the
/// join from the thickness/pixel-size heuristic.
pub fn circle<S: DrawSink>(
    batch: &mut BatchManager<S>,
    center: Vec2,
    radius: f32,
    rotation: f32,
    thickness: f32,
) {
    ellipse(batch, center, Vec2::new(radius, radius), rotation, thickness);
}

/// Ellipse outline, `radius` holding the two semi-axes.
pub fn ellipse<S: DrawSink>(
    batch: &mut BatchManager<S>,
    center: Vec2,
    radius: Vec2,
    rotation: f32,
    thickness: f32,
) {
    let mut shape = Polygon::new(
        center,
        estimate_sides_required(batch.pixel_size(), radius.x, radius.y) as u32,
        radius,
    );
    shape.rotation = rotation;
    shape.thickness = thickness;
    shape.join = if is_join_necessary(thickness, batch.pixel_size()) {
        JoinType::Smooth
    } else {
        JoinType::None
    };
    polygon(batch, &shape);
}

/// Sides needed for a polygon of the given radii to read as a smooth curve
/// at the current zoom: one side per ~16 pixels of circumference, padded for
/// eccentric ellipses, never fewer than 20.
pub fn estimate_sides_required(pixel_size: f32, rx: f32, ry: f32) -> u32 {
    let circumference = TAU * ((rx * rx + ry * ry) * 0.5).sqrt();
    let mut sides = (circumference / (16.0 * pixel_size)) as i32;
    let (minor, major) = if rx < ry { (rx, ry) } else { (ry, rx) };
    let eccentricity = (1.0 - (minor * minor) / (major * major)).sqrt();
    sides += ((sides as f32) * eccentricity) as i32 / 16;
    sides.max(20) as u32
}

fn transformed(v: Vec2, cos_rot: f32, sin_rot: f32, center: Vec2) -> Vec2 {
    Vec2::new(
        v.x * cos_rot - v.y * sin_rot + center.x,
        v.x * sin_rot + v.y * cos_rot + center.y,
    )
}

/// One independent stroked quad per edge.
#[allow(clippy::too_many_arguments)]
pub fn draw_polygon_with_no_join<S: DrawSink>(
    batch: &mut BatchManager<S>,
    center: Vec2,
    sides: u32,
    thickness: f32,
    rotation: f32,
    radius: Vec2,
    start_angle: f32,
    sweep: f32,
) {
    let angle_interval = TAU / sides as f32;
    let end_angle = start_angle + sweep;
    let (sin, cos) = angle_interval.sin_cos();
    let (sin_rot, cos_rot) = rotation.sin_cos();

    // First and last lattice step inside the sweep. A start landing exactly
    // on the start angle would emit a zero-length leading segment; an end
    // exactly on the lattice would emit a trailing one.
    let mut start = (sides as f32 * (start_angle / TAU)).ceil() as i32;
    if is_fuzzy_equal(start as f32 * angle_interval, start_angle, FUZZY_EPSILON) {
        start += 1;
    }
    let mut end = (sides as f32 * (end_angle / TAU)).floor() as i32;
    if !is_fuzzy_equal(end as f32 * angle_interval, end_angle, FUZZY_EPSILON) {
        end += 1;
    }

    let mut dir = Vec2::from_angle((start as f32 * angle_interval).min(end_angle));
    let mut a = Vec2::from_angle(start_angle).scale(radius);
    let mut b = dir.scale(radius);
    for i in start..=end {
        let p1 = transformed(a, cos_rot, sin_rot, center);
        let p2 = transformed(b, cos_rot, sin_rot, center);
        let color = batch.color_bits();
        push_line(batch, p1, p2, thickness, false, color, color);
        if i < end - 1 {
            a = b;
            dir = Vec2::new(dir.x * cos - dir.y * sin, dir.x * sin + dir.y * cos);
            b = dir.scale(radius);
        } else if i == end - 1 {
            a = b;
            b = Vec2::from_angle(end_angle).scale(radius);
        }
    }
}

/// Continuous mitered strip: each step emits one quad whose leading corner
/// pair is the trailing pair of the previous step.
#[allow(clippy::too_many_arguments)]
pub fn draw_polygon_with_join<S: DrawSink>(
    batch: &mut BatchManager<S>,
    center: Vec2,
    sides: u32,
    half_thickness: f32,
    rotation: f32,
    radius: Vec2,
    start_angle: f32,
    sweep: f32,
    smooth: bool,
) {
    let full = is_fuzzy_equal(sweep, TAU, FUZZY_EPSILON);

    let angle_interval = TAU / sides as f32;
    let end_angle = start_angle + sweep;
    let (sin, cos) = angle_interval.sin_cos();
    let (sin_rot, cos_rot) = rotation.sin_cos();

    let start: i32;
    let end: i32;
    let mut dir;
    let mut a;
    let mut b;
    let mut c;
    if full {
        // Closed loop: start at step 1 with the window pre-seeded one step
        // back, so step `sides` closes onto step 1's leading corner exactly.
        start = 1;
        end = sides as i32;
        dir = Vec2::from_angle(start as f32 * angle_interval);
        a = Vec2::from_angle((start - 2) as f32 * angle_interval).scale(radius);
        c = dir.scale(radius);
        b = Vec2::from_angle((start - 1) as f32 * angle_interval).scale(radius);
    } else {
        let mut s = (sides as f32 * (start_angle / TAU)).ceil() as i32;
        if is_fuzzy_equal(s as f32 * angle_interval, start_angle, FUZZY_EPSILON) {
            s += 1;
        }
        start = s;
        end = ((sides as f32 * (end_angle / TAU)).floor() as i32 + 1).min(start + sides as i32);
        dir = Vec2::from_angle((start as f32 * angle_interval).min(end_angle));
        a = Vec2::from_angle((start - 1) as f32 * angle_interval).scale(radius);
        b = Vec2::from_angle(start_angle).scale(radius);
        c = dir.scale(radius);
    }

    for i in start..=end {
        batch.ensure_space_for_quad();

        let (d, e) = if !full && i == start {
            prepare_radial_endpoint(b, half_thickness)
        } else {
            let join = if smooth {
                prepare_smooth_join(a, b, c, half_thickness, true)
            } else {
                prepare_pointy_join(a, b, c, half_thickness)
            };
            (join.d, join.e)
        };
        batch.set_vert_v(0, transformed(e, cos_rot, sin_rot, center));
        batch.set_vert_v(1, transformed(d, cos_rot, sin_rot, center));

        if full || i < end {
            a = b;
            b = c;
            dir = Vec2::new(dir.x * cos - dir.y * sin, dir.x * sin + dir.y * cos);
            c = dir.scale(radius);
        } else {
            b = Vec2::from_angle(end_angle).scale(radius);
        }

        let (d, e) = if full || i < end {
            let join = if smooth {
                prepare_smooth_join(a, b, c, half_thickness, false)
            } else {
                prepare_pointy_join(a, b, c, half_thickness)
            };
            (join.d, join.e)
        } else {
            prepare_radial_endpoint(b, half_thickness)
        };
        batch.set_vert_v(2, transformed(d, cos_rot, sin_rot, center));
        batch.set_vert_v(3, transformed(e, cos_rot, sin_rot, center));

        batch.set_quad_color(batch.color_bits());
        batch.push_quad();

        if smooth && (full || i < end) {
            draw_smooth_join_fill(batch, a, b, c, center, cos_rot, sin_rot, half_thickness);
        }
    }
}

/// The triangle that fills the outer wedge a smooth join leaves open at
/// corner `b`: both edge-perpendicular outside points plus the shared
/// inside point.
pub(crate) fn draw_smooth_join_fill<S: DrawSink>(
    batch: &mut BatchManager<S>,
    a: Vec2,
    b: Vec2,
    c: Vec2,
    offset: Vec2,
    cos_rot: f32,
    sin_rot: f32,
    half_thickness: f32,
) {
    batch.ensure_space_for_triangle();
    let incoming = prepare_smooth_join(a, b, c, half_thickness, false);
    batch.set_vert_v(0, transformed(incoming.outside(), cos_rot, sin_rot, offset));
    batch.set_vert_v(1, transformed(incoming.inside(), cos_rot, sin_rot, offset));
    let outgoing = prepare_smooth_join(a, b, c, half_thickness, true);
    batch.set_vert_v(2, transformed(outgoing.outside(), cos_rot, sin_rot, offset));
    for i in 0..3 {
        batch.set_color(i, batch.color_bits());
    }
    batch.push_triangle();
}
