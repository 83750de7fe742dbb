//! Draw-sink boundary types
//!
//! The engine never touches the GPU; it hands finished vertex runs to a
//! [`DrawSink`] supplied by the renderer. The sink sees the same flat float
//! layout the staging buffer uses (see [`crate::batch`]).

/// Opaque handle to a texture owned by the external batching layer. The
/// engine only forwards it, never resolves it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A uv sub-rectangle of a texture. Shape strokes sample a single point of
/// it (generally the center of a 1x1 white pixel), so only the center of the
/// rect ever reaches the vertex stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureSlice {
    pub texture: TextureId,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
}

impl TextureSlice {
    pub const fn new(texture: TextureId, u: f32, v: f32, u2: f32, v2: f32) -> Self {
        Self { texture, u, v, u2, v2 }
    }

    /// The full texture, for single-color slices.
    pub const fn solid(texture: TextureId) -> Self {
        Self::new(texture, 0.0, 0.0, 1.0, 1.0)
    }

    pub fn uv_center(&self) -> (f32, f32) {
        (0.5 * (self.u + self.u2), 0.5 * (self.v + self.v2))
    }
}

/// Receives finished vertex runs, exactly once per flush.
///
/// `vertices[from..to]` is a whole number of 4-record quads in the engine's
/// interleaved layout; `from` and `to` are float offsets. Implementations
/// typically copy the range into a GPU staging buffer
/// (`bytemuck::cast_slice` gives the byte view) and record a draw call.
pub trait DrawSink {
    fn submit(&mut self, texture: TextureId, vertices: &[f32], from: usize, to: usize);
}
