//! Fuzzy float comparison

/// Default tolerance for degenerate-geometry checks, in world units or
/// radians depending on the call site.
pub const FUZZY_EPSILON: f32 = 1e-3;

pub fn is_fuzzy_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

pub fn is_fuzzy_zero(a: f32, epsilon: f32) -> bool {
    a.abs() <= epsilon
}
