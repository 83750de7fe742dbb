//! Nib geometry primitives
//!
//! Leaf crate shared by the stroking engine and its consumers:
//!
//! - [`Vec2`]: a copy-friendly 2D vector with the rotation and offset
//!   operations corner mitering needs
//! - [`Color`]: f32 RGBA with packing into a single float for interleaved
//!   vertex buffers
//! - fuzzy float comparison helpers used for degenerate-geometry checks

pub mod color;
pub mod scalar;
pub mod vec2;

pub use color::Color;
pub use scalar::{is_fuzzy_equal, is_fuzzy_zero, FUZZY_EPSILON};
pub use vec2::Vec2;
