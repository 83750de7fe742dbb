//! Nib stroking engine
//!
//! Converts shape descriptions (lines, regular polygons, circles/ellipses,
//! arbitrary polylines) into colored quads written into a shared, growable
//! vertex staging buffer that is flushed to an injected [`DrawSink`].
//!
//! The engine is built around a single mutable context, the [`BatchManager`]:
//! it owns the staging buffer, the current packed color and the world-space
//! pixel size, and it is the only component that talks to the sink. The
//! strokers ([`line`], [`polygon`], [`path`], [`fill`]) are free functions
//! over `&mut BatchManager`, and corner geometry comes from the pure
//! functions in [`join`].
//!
//! ```
//! use nib_geom::{Color, Vec2};
//! use nib_stroke::{polygon, BatchManager, DrawSink, JoinType, TextureId, TextureSlice};
//!
//! struct NullSink;
//! impl DrawSink for NullSink {
//!     fn submit(&mut self, _texture: TextureId, _vertices: &[f32], _from: usize, _to: usize) {}
//! }
//!
//! let slice = TextureSlice::solid(TextureId::new(0));
//! let mut batch = BatchManager::new(NullSink, slice);
//! batch.set_color_bits(Color::WHITE.to_bits());
//!
//! let mut hexagon = polygon::Polygon::new(Vec2::ZERO, 6, Vec2::new(10.0, 10.0));
//! hexagon.thickness = 2.0;
//! hexagon.join = JoinType::Pointy;
//! polygon::polygon(&mut batch, &hexagon);
//! ```

pub mod batch;
pub mod fill;
pub mod join;
pub mod line;
pub mod path;
pub mod polygon;
pub mod sink;

pub use batch::{BatchManager, Vertex, VERTEX_SIZE};
pub use join::{Join, JoinType};
pub use sink::{DrawSink, TextureId, TextureSlice};
