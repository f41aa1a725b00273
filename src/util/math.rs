//! Math type re-exports and small color helpers used by the film.

// Re-export glam types
pub use glam::{Vec2, Vec3, Vec4};

/// Mean of the three color channels.
#[inline]
pub fn average(v: Vec3) -> f32 {
    (v.x + v.y + v.z) * (1.0 / 3.0)
}

/// Component-wise `a / b`, yielding 0 where `b` is 0.
#[inline]
pub fn safe_divide_color(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        if b.x != 0.0 { a.x / b.x } else { 0.0 },
        if b.y != 0.0 { a.y / b.y } else { 0.0 },
        if b.z != 0.0 { a.z / b.z } else { 0.0 },
    )
}
