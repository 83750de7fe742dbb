//! Color types and packing

/// RGBA color with f32 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const RED: Color = Color {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const GREEN: Color = Color {
        r: 0.0,
        g: 1.0,
        b: 0.0,
        a: 1.0,
    };
    pub const BLUE: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Pack into a single float for interleaved vertex buffers.
    ///
    /// The channels are clamped, quantized to 8 bits, laid out as abgr8888 and
    /// bit-cast to `f32`. The top two mantissa-adjacent alpha bits are masked
    /// off (`0xfeff_ffff`) so the result can never be a NaN that gets
    /// canonicalized on the way through the GPU.
    pub fn to_bits(self) -> f32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0) as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0) as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0) as u32;
        let a = (self.a.clamp(0.0, 1.0) * 255.0) as u32;
        f32::from_bits(((a << 24) | (b << 16) | (g << 8) | r) & 0xfeff_ffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let bits = Color::RED.to_bits().to_bits();
        assert_eq!(bits, 0xfe00_00ff);
        let bits = Color::GREEN.to_bits().to_bits();
        assert_eq!(bits, 0xfe00_ff00);
    }

    #[test]
    fn test_pack_never_nan() {
        assert!(!Color::WHITE.to_bits().is_nan());
        assert!(!Color::TRANSPARENT.to_bits().is_nan());
    }

    #[test]
    fn test_pack_clamps() {
        let hot = Color::new(2.0, -1.0, 0.0, 1.0);
        assert_eq!(hot.to_bits().to_bits(), Color::RED.to_bits().to_bits());
    }
}
