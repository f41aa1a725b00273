//! Overwrite-or-accumulate writes into a pixel's float region.
//!
//! Every pass write goes through [`write_pass`]: sample 0 seeds the slot,
//! later samples add to it. Offsets come from a validated
//! [`PassLayout`](super::PassLayout) and are not checked in release builds.

use crate::util::{Vec3, Vec4};

/// A value that occupies `WIDTH` consecutive floats in the render buffer.
pub trait PassValue: Copy + std::ops::Add<Output = Self> {
    const WIDTH: usize;

    /// Read from the first `WIDTH` floats of `src`.
    fn load(src: &[f32]) -> Self;

    /// Store into the first `WIDTH` floats of `dst`.
    fn store(self, dst: &mut [f32]);
}

impl PassValue for f32 {
    const WIDTH: usize = 1;

    #[inline]
    fn load(src: &[f32]) -> Self {
        src[0]
    }

    #[inline]
    fn store(self, dst: &mut [f32]) {
        dst[0] = self;
    }
}

impl PassValue for Vec3 {
    const WIDTH: usize = 3;

    #[inline]
    fn load(src: &[f32]) -> Self {
        Vec3::from_slice(src)
    }

    #[inline]
    fn store(self, dst: &mut [f32]) {
        self.write_to_slice(dst);
    }
}

impl PassValue for Vec4 {
    const WIDTH: usize = 4;

    #[inline]
    fn load(src: &[f32]) -> Self {
        Vec4::from_slice(src)
    }

    #[inline]
    fn store(self, dst: &mut [f32]) {
        self.write_to_slice(dst);
    }
}

/// Write `value` at `offset` on sample 0, add it to the stored value otherwise.
///
/// The slot is loaded and stored as one packed value.
#[inline]
pub fn write_pass<T: PassValue>(buffer: &mut [f32], offset: usize, sample: u32, value: T) {
    debug_assert!(
        offset + T::WIDTH <= buffer.len(),
        "pass slot {}..{} outside pixel region of {} floats",
        offset,
        offset + T::WIDTH,
        buffer.len()
    );
    let slot = &mut buffer[offset..offset + T::WIDTH];
    let out = if sample == 0 { value } else { T::load(slot) + value };
    out.store(slot);
}

#[inline]
pub fn write_scalar(buffer: &mut [f32], offset: usize, sample: u32, value: f32) {
    write_pass(buffer, offset, sample, value);
}

#[inline]
pub fn write_vec3(buffer: &mut [f32], offset: usize, sample: u32, value: Vec3) {
    write_pass(buffer, offset, sample, value);
}

#[inline]
pub fn write_vec4(buffer: &mut [f32], offset: usize, sample: u32, value: Vec4) {
    write_pass(buffer, offset, sample, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_overwrite_then_add() {
        let mut buf = [7.0f32; 4];
        write_scalar(&mut buf, 1, 0, 2.0);
        assert_eq!(buf[1], 2.0);
        write_scalar(&mut buf, 1, 1, 3.0);
        write_scalar(&mut buf, 1, 2, 0.5);
        assert_eq!(buf[1], 5.5);
        // Neighbours untouched
        assert_eq!(buf[0], 7.0);
        assert_eq!(buf[2], 7.0);
    }

    #[test]
    fn test_sample_zero_discards_stale_contents() {
        let mut buf = [100.0f32; 3];
        write_vec3(&mut buf, 0, 0, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(buf, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_vec3_accumulates_k_times() {
        let mut buf = [0.0f32; 5];
        let v = Vec3::new(0.25, -1.0, 2.0);
        for sample in 0..8 {
            write_vec3(&mut buf, 2, sample, v);
        }
        assert_eq!(Vec3::from_slice(&buf[2..]), v * 8.0);
        assert_eq!(&buf[..2], &[0.0, 0.0]);
    }

    #[test]
    fn test_vec4_overwrite_then_add() {
        let mut buf = [0.0f32; 4];
        write_vec4(&mut buf, 0, 0, Vec4::new(1.0, 2.0, 3.0, 4.0));
        write_vec4(&mut buf, 0, 3, Vec4::ONE);
        assert_eq!(buf, [2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_sum_matches_seed_plus_rest() {
        let values = [0.3f32, 1.7, -0.2, 4.0, 0.0, 2.25];
        let mut buf = [0.0f32; 1];
        for (i, &v) in values.iter().enumerate() {
            write_scalar(&mut buf, 0, i as u32, v);
        }
        let expected: f32 = values.iter().sum();
        assert!((buf[0] - expected).abs() < 1e-5);
    }

    #[test]
    #[should_panic]
    fn test_out_of_region_panics() {
        let mut buf = [0.0f32; 3];
        write_vec4(&mut buf, 0, 0, Vec4::ONE);
    }
}
