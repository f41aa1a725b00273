//! Export of resolved passes to float image files (OpenEXR, Radiance HDR).

use std::path::Path;

use image::{DynamicImage, Rgba32FImage};

use super::buffer::RenderBuffers;
use super::config::FilmConfig;
use super::pass::PassType;
use super::resolve::resolve_pass;
use crate::util::{Error, Result};

/// Expand resolved pass values to RGBA: scalars go to all three color
/// channels, missing alpha is 1.
fn to_rgba(values: &[f32], comps: usize) -> Vec<f32> {
    let mut rgba = Vec::with_capacity(values.len() / comps * 4);
    for px in values.chunks_exact(comps) {
        match comps {
            1 => rgba.extend_from_slice(&[px[0], px[0], px[0], 1.0]),
            3 => rgba.extend_from_slice(&[px[0], px[1], px[2], 1.0]),
            _ => rgba.extend_from_slice(&px[..4]),
        }
    }
    rgba
}

/// Resolve `pass` and write it to `path`. The format follows the extension
/// (`.exr` keeps alpha, `.hdr` drops it).
#[tracing::instrument(skip(buffers, config, path), fields(path = %path.as_ref().display()))]
pub fn export_pass(
    buffers: &RenderBuffers,
    config: &FilmConfig,
    pass: PassType,
    samples: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let values = resolve_pass(buffers, config, pass, samples)?;
    let rgba = to_rgba(&values, pass.components());

    let img = Rgba32FImage::from_raw(buffers.width(), buffers.height(), rgba)
        .ok_or_else(|| Error::Image("resolved pass does not match image size".into()))?;

    let is_hdr = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("hdr"));
    let img = if is_hdr {
        DynamicImage::ImageRgb32F(DynamicImage::ImageRgba32F(img).to_rgb32f())
    } else {
        DynamicImage::ImageRgba32F(img)
    };

    img.save(path).map_err(|e| Error::Image(e.to_string()))?;
    tracing::debug!(%pass, "pass exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgba_expansion() {
        assert_eq!(to_rgba(&[0.5, 2.0], 1), vec![0.5, 0.5, 0.5, 1.0, 2.0, 2.0, 2.0, 1.0]);
        assert_eq!(to_rgba(&[1.0, 2.0, 3.0], 3), vec![1.0, 2.0, 3.0, 1.0]);
        assert_eq!(to_rgba(&[1.0, 2.0, 3.0, 0.5], 4), vec![1.0, 2.0, 3.0, 0.5]);
    }
}
