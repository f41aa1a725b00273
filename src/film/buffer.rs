//! Render buffers: the flat float storage behind every pass of an image.
//!
//! Pixels are stored row-major, each as a region of `pass_stride` floats laid
//! out by the film's [`PassLayout`]. Regions never overlap, so the buffer can
//! be split into one mutable slice per pixel and sampled in parallel without
//! locks.

use rayon::prelude::*;

use super::layout::PassLayout;
use crate::util::{Error, Result};

/// Accumulation storage for a `width × height` image.
#[derive(Clone, Debug)]
pub struct RenderBuffers {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<f32>,
    /// Number of completed samples.
    samples: u32,
}

impl RenderBuffers {
    /// Allocate zeroed buffers for `layout`.
    #[tracing::instrument(skip(layout), fields(stride = layout.pass_stride()))]
    pub fn new(width: u32, height: u32, layout: &PassLayout) -> Result<Self> {
        let stride = layout.pass_stride();
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(stride))
            .filter(|&n| n > 0)
            .ok_or(Error::InvalidDimensions { width, height })?;

        Ok(Self { width, height, stride, data: vec![0.0; len], samples: 0 })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Floats per pixel.
    #[inline]
    pub fn pass_stride(&self) -> usize {
        self.stride
    }

    /// Completed samples recorded by [`accumulate_sample`](Self::accumulate_sample).
    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    #[inline]
    fn pixel_range(&self, x: u32, y: u32) -> std::ops::Range<usize> {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        let start = (y as usize * self.width as usize + x as usize) * self.stride;
        start..start + self.stride
    }

    /// Pass region of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        &self.data[self.pixel_range(x, y)]
    }

    /// Mutable pass region of pixel `(x, y)`.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [f32] {
        let range = self.pixel_range(x, y);
        &mut self.data[range]
    }

    /// All pixel regions, in parallel. Yields `(pixel_index, region)`.
    pub fn par_pixels_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [f32])> {
        self.data.par_chunks_mut(self.stride).enumerate()
    }

    /// Run `f(x, y, region)` for every pixel in parallel, then count the
    /// sample as completed.
    ///
    /// All pixels finish `sample` before this returns, so the next call sees a
    /// consistent buffer.
    #[tracing::instrument(skip(self, f), fields(width = self.width, height = self.height))]
    pub fn accumulate_sample<F>(&mut self, sample: u32, f: F)
    where
        F: Fn(u32, u32, &mut [f32]) + Sync + Send,
    {
        let width = self.width as usize;
        self.par_pixels_mut().for_each(|(i, pixel)| {
            f((i % width) as u32, (i / width) as u32, pixel);
        });
        self.samples = self.samples.max(sample.saturating_add(1));
    }

    /// Zero all passes and forget completed samples.
    pub fn reset(&mut self) {
        self.data.fill(0.0);
        self.samples = 0;
    }

    /// Raw accumulated floats.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw accumulated floats as bytes (native endian), e.g. for upload or dump.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}
