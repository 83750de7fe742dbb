//! Vertex staging and flush management
//!
//! [`BatchManager`] owns a flat, growable `f32` buffer of interleaved vertex
//! records and decides when the staged run is handed to the [`DrawSink`]. All
//! strokers write through it; it is the only component that talks to the
//! sink, so submission order is exactly write order.
//!
//! A record is 5 floats: `x, y, u, v, packed color`. Every record shares the
//! `u,v` pair stamped from the texture slice center (shapes sample a single
//! white pixel), so the uv fields are pre-filled across the whole buffer and
//! never written per vertex.

use nib_geom::Vec2;

use crate::sink::{DrawSink, TextureSlice};

/// Floats per vertex record.
pub const VERTEX_SIZE: usize = 5;

const X: usize = 0;
const Y: usize = 1;
const U: usize = 2;
const V: usize = 3;
const C: usize = 4;

/// Floats reserved per quad.
const QUAD_PUSH_SIZE: usize = 4 * VERTEX_SIZE;

/// Default staging capacity in floats (400 records / 100 quads).
const DEFAULT_CACHE_SIZE: usize = 2000;

/// One staged vertex record. The staging buffer itself is flat `f32`s; this
/// is the typed read view over it (see [`BatchManager::staged`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
    pub color: f32,
}

/// Owns the vertex staging store and the draw sink.
///
/// Shape calls address the four corners of the quad at the current cursor
/// through [`set_vert`](Self::set_vert) / [`set_color`](Self::set_color),
/// then advance with [`push_quad`](Self::push_quad) or
/// [`push_triangle`](Self::push_triangle). Capacity is transparent: a
/// reservation that no longer fits flushes the pending run, and one that
/// exceeds the whole buffer grows it (flushing first, so nothing staged is
/// ever lost).
pub struct BatchManager<S: DrawSink> {
    sink: S,
    slice: TextureSlice,
    verts: Vec<f32>,
    vertex_count: usize,
    color_bits: f32,
    pixel_size: f32,
    caching_draws: bool,
}

impl<S: DrawSink> BatchManager<S> {
    pub fn new(sink: S, slice: TextureSlice) -> Self {
        Self::with_capacity(sink, slice, DEFAULT_CACHE_SIZE / VERTEX_SIZE)
    }

    /// `capacity` is in vertex records. Mostly useful to make the growth path
    /// observable; [`new`](Self::new) picks a size that fits 100 quads.
    pub fn with_capacity(sink: S, slice: TextureSlice, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "capacity must be at least one record");
        let mut manager = Self {
            sink,
            slice,
            verts: vec![0.0; capacity * VERTEX_SIZE],
            vertex_count: 0,
            color_bits: nib_geom::Color::WHITE.to_bits(),
            pixel_size: 1.0,
            caching_draws: false,
        };
        manager.stamp_uv();
        manager
    }

    /// The packed color strokers stamp on the quads they emit.
    pub fn color_bits(&self) -> f32 {
        self.color_bits
    }

    pub fn set_color_bits(&mut self, bits: f32) {
        self.color_bits = bits;
    }

    /// World units covered by one screen pixel along the x-axis.
    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    pub fn set_pixel_size(&mut self, pixel_size: f32) {
        self.pixel_size = pixel_size;
    }

    /// Recompute the pixel size from the camera's combined
    /// projection x transform x-scale and the viewport width in pixels. Must
    /// be called by the owner whenever either changes; the engine never
    /// observes the camera itself.
    pub fn update_pixel_size(&mut self, view_projection_scale_x: f32, screen_width: f32) {
        let world_width = 2.0 / view_projection_scale_x;
        self.pixel_size = world_width / screen_width;
    }

    pub fn half_pixel_size(&self) -> f32 {
        self.pixel_size * 0.5
    }

    /// Sub-pixel nudge used by pixel snapping to keep adjacent snapped
    /// segments from opening seams.
    pub fn snap_offset(&self) -> f32 {
        0.001 * self.pixel_size
    }

    pub fn caching_draws(&self) -> bool {
        self.caching_draws
    }

    /// Enter caching mode: strokers stop flushing after each shape so many
    /// shapes share one submission. Returns the prior state so nested shape
    /// calls can restore it instead of flushing out from under their caller.
    pub fn start_caching(&mut self) -> bool {
        let was_caching = self.caching_draws;
        self.caching_draws = true;
        was_caching
    }

    /// Leave caching mode and submit anything pending.
    pub fn end_caching(&mut self) {
        self.caching_draws = false;
        if self.vertex_count > 0 {
            self.flush();
        }
    }

    pub fn push_vertex(&mut self) {
        self.vertex_count += 1;
    }

    pub fn push_quad(&mut self) {
        self.vertex_count += 4;
    }

    /// Triangles are staged as degenerate quads: the third corner is
    /// duplicated into the fourth slot (position and color) so the flush
    /// path stays uniform over 4-record groups.
    pub fn push_triangle(&mut self) {
        let (x, y) = self.vert(2);
        self.set_vert(3, x, y);
        let base = self.cursor();
        self.verts[base + 3 * VERTEX_SIZE + C] = self.verts[base + 2 * VERTEX_SIZE + C];
        self.push_quad();
    }

    pub fn ensure_space_for_quad(&mut self) {
        self.ensure_space(4);
    }

    /// Triangles reserve a full quad, matching their degenerate-quad staging.
    pub fn ensure_space_for_triangle(&mut self) {
        self.ensure_space(4);
    }

    /// Guarantee room for `vertices` more records. Grows (doubling) when the
    /// request exceeds the whole buffer, otherwise flushes when the free tail
    /// is too small. Growth flushes the pending run *before* the backing
    /// storage is replaced.
    pub fn ensure_space(&mut self, vertices: usize) {
        if vertices * VERTEX_SIZE > self.verts.len() {
            self.grow(vertices * VERTEX_SIZE);
        } else if self.vertices_remaining() < vertices {
            self.flush();
        }
    }

    /// Submit the staged run to the sink and reset the cursor. No-op when
    /// nothing is staged.
    pub fn flush(&mut self) {
        if self.vertex_count == 0 {
            return;
        }
        let end = self.vertex_count * VERTEX_SIZE;
        tracing::trace!(records = self.vertex_count, "flushing shape batch");
        self.sink.submit(self.slice.texture, &self.verts, 0, end);
        self.vertex_count = 0;
    }

    /// Corner `i` (0..4) of the quad at the cursor.
    #[inline]
    pub fn set_vert(&mut self, i: usize, x: f32, y: f32) {
        let base = self.cursor() + i * VERTEX_SIZE;
        self.verts[base + X] = x;
        self.verts[base + Y] = y;
    }

    #[inline]
    pub fn set_vert_v(&mut self, i: usize, v: Vec2) {
        self.set_vert(i, v.x, v.y);
    }

    #[inline]
    pub fn vert(&self, i: usize) -> (f32, f32) {
        let base = self.cursor() + i * VERTEX_SIZE;
        (self.verts[base + X], self.verts[base + Y])
    }

    #[inline]
    pub fn set_color(&mut self, i: usize, bits: f32) {
        let base = self.cursor() + i * VERTEX_SIZE;
        self.verts[base + C] = bits;
    }

    /// Stamp one packed color on all four corners.
    pub fn set_quad_color(&mut self, bits: f32) {
        for i in 0..4 {
            self.set_color(i, bits);
        }
    }

    /// Records staged since the last flush.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Total capacity in records.
    pub fn capacity(&self) -> usize {
        self.verts.len() / VERTEX_SIZE
    }

    /// Typed view of the staged records.
    pub fn staged(&self) -> &[Vertex] {
        bytemuck::cast_slice(&self.verts[..self.vertex_count * VERTEX_SIZE])
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn cursor(&self) -> usize {
        self.vertex_count * VERTEX_SIZE
    }

    fn vertices_remaining(&self) -> usize {
        self.capacity() - self.vertex_count
    }

    fn grow(&mut self, min_floats: usize) {
        // Pending vertices must reach the sink before the old storage goes
        // away; the swap below invalidates everything staged.
        self.flush();
        let mut new_size = self.verts.len();
        while min_floats > new_size {
            new_size *= 2;
        }
        tracing::debug!(
            from = self.verts.len(),
            to = new_size,
            "growing vertex staging buffer"
        );
        self.verts = vec![0.0; new_size];
        self.stamp_uv();
    }

    fn stamp_uv(&mut self) {
        let (u, v) = self.slice.uv_center();
        for record in self.verts.chunks_exact_mut(VERTEX_SIZE) {
            record[U] = u;
            record[V] = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{recording_batch, white_slice, RecordingSink};
    use crate::TextureId;

    fn push_tagged_quad(batch: &mut BatchManager<RecordingSink>, tag: f32) {
        batch.ensure_space_for_quad();
        batch.set_vert(0, tag, 0.0);
        batch.set_vert(1, tag, 1.0);
        batch.set_vert(2, tag, 2.0);
        batch.set_vert(3, tag, 3.0);
        batch.set_quad_color(tag);
        batch.push_quad();
    }

    #[test]
    fn test_flush_per_quad_without_caching() {
        let mut batch = recording_batch();
        for tag in 0..3 {
            push_tagged_quad(&mut batch, tag as f32);
            batch.flush();
        }
        let subs = &batch.sink().submissions;
        assert_eq!(subs.len(), 3);
        for (i, (texture, data)) in subs.iter().enumerate() {
            assert_eq!(*texture, TextureId::new(7));
            assert_eq!(data.len(), QUAD_PUSH_SIZE);
            assert_eq!(data[0], i as f32);
        }
    }

    #[test]
    fn test_caching_accumulates_into_one_submission() {
        let mut batch = recording_batch();
        let was_caching = batch.start_caching();
        assert!(!was_caching);
        for tag in 0..5 {
            push_tagged_quad(&mut batch, tag as f32);
        }
        assert!(batch.sink().submissions.is_empty());
        batch.end_caching();
        let subs = &batch.sink().submissions;
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].1.len(), 5 * QUAD_PUSH_SIZE);
        // push order preserved
        for tag in 0..5 {
            assert_eq!(subs[0].1[tag * QUAD_PUSH_SIZE], tag as f32);
        }
    }

    #[test]
    fn test_nested_caching_restores_outer_scope() {
        let mut batch = recording_batch();
        batch.start_caching();
        push_tagged_quad(&mut batch, 0.0);
        // A nested shape call observes caching and must not end it.
        let was_caching = batch.start_caching();
        assert!(was_caching);
        push_tagged_quad(&mut batch, 1.0);
        assert!(batch.sink().submissions.is_empty());
        batch.end_caching();
        assert_eq!(batch.sink().submissions.len(), 1);
    }

    #[test]
    fn test_full_buffer_flushes_before_next_quad() {
        // Room for exactly two quads.
        let mut batch = BatchManager::with_capacity(RecordingSink::default(), white_slice(), 8);
        batch.start_caching();
        push_tagged_quad(&mut batch, 0.0);
        push_tagged_quad(&mut batch, 1.0);
        assert!(batch.sink().submissions.is_empty());
        // Third quad does not fit; ensure_space flushes, no growth.
        push_tagged_quad(&mut batch, 2.0);
        assert_eq!(batch.sink().submissions.len(), 1);
        assert_eq!(batch.capacity(), 8);
        assert_eq!(batch.sink().submissions[0].1.len(), 2 * QUAD_PUSH_SIZE);
        batch.end_caching();
        assert_eq!(batch.sink().submissions.len(), 2);
    }

    #[test]
    fn test_growth_flushes_pending_then_doubles() {
        let mut batch = BatchManager::with_capacity(RecordingSink::default(), white_slice(), 4);
        batch.start_caching();
        push_tagged_quad(&mut batch, 9.0);
        // A reservation larger than the whole buffer forces growth; the
        // staged quad must be submitted before the storage is replaced.
        batch.ensure_space(8);
        assert_eq!(batch.sink().submissions.len(), 1);
        let flushed = &batch.sink().submissions[0].1;
        assert_eq!(flushed.len(), QUAD_PUSH_SIZE);
        assert_eq!(flushed[0], 9.0);
        assert_eq!(flushed[C], 9.0);
        assert_eq!(batch.capacity(), 8);
        assert_eq!(batch.vertex_count(), 0);
    }

    #[test]
    fn test_growth_restamps_uv_everywhere() {
        let slice = TextureSlice::new(TextureId::new(3), 0.0, 0.0, 0.5, 0.25);
        let mut batch = BatchManager::with_capacity(RecordingSink::default(), slice, 4);
        batch.ensure_space(16);
        assert_eq!(batch.capacity(), 16);
        push_tagged_quad(&mut batch, 1.0);
        batch.push_quad(); // expose four untouched records through staged()
        for vertex in batch.staged() {
            assert_eq!(vertex.u, 0.25);
            assert_eq!(vertex.v, 0.125);
        }
    }

    #[test]
    fn test_push_triangle_stages_degenerate_quad() {
        let mut batch = recording_batch();
        batch.ensure_space_for_triangle();
        batch.set_vert(0, 0.0, 0.0);
        batch.set_vert(1, 4.0, 0.0);
        batch.set_vert(2, 2.0, 3.0);
        for i in 0..3 {
            batch.set_color(i, 0.5);
        }
        batch.push_triangle();
        assert_eq!(batch.vertex_count(), 4);
        let staged = batch.staged();
        assert_eq!(staged[3].x, staged[2].x);
        assert_eq!(staged[3].y, staged[2].y);
        assert_eq!(staged[3].color, staged[2].color);
    }

    #[test]
    fn test_update_pixel_size() {
        let mut batch = recording_batch();
        batch.update_pixel_size(0.5, 800.0);
        assert!((batch.pixel_size() - 0.005).abs() < 1e-9);
        assert!((batch.half_pixel_size() - 0.0025).abs() < 1e-9);
        assert!((batch.snap_offset() - 0.000005).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_zero_capacity_is_rejected() {
        // Growth doubles the buffer; a zero-record buffer could never grow.
        let _ = BatchManager::with_capacity(RecordingSink::default(), white_slice(), 0);
    }

    #[test]
    fn test_flush_on_empty_is_noop() {
        let mut batch = recording_batch();
        batch.flush();
        assert!(batch.sink().submissions.is_empty());
    }
}
