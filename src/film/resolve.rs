//! Read-back of accumulated passes into displayable values.
//!
//! The writers only ever store running sums. Resolving divides by the sample
//! count (or a pass-specific weight) and applies exposure.

use rayon::prelude::*;

use super::buffer::RenderBuffers;
use super::config::FilmConfig;
use super::pass::PassType;
use crate::util::{safe_divide_color, Error, Result, Vec3, Vec4};

/// Depth reported for pixels where no surface was hit.
pub const DEPTH_MISS: f32 = 1e10;

/// Resolve one pass over the whole image.
///
/// Returns `width * height * pass.components()` floats, row-major.
#[tracing::instrument(
    skip(buffers, config),
    fields(width = buffers.width(), height = buffers.height())
)]
pub fn resolve_pass(
    buffers: &RenderBuffers,
    config: &FilmConfig,
    pass: PassType,
    samples: u32,
) -> Result<Vec<f32>> {
    let layout = &config.layout;
    let offset = layout.offset(pass).ok_or(Error::PassNotEnabled(pass))?;
    if samples == 0 {
        return Err(Error::NoSamples);
    }
    if layout.pass_stride() != buffers.pass_stride() {
        return Err(Error::config(format!(
            "layout stride {} does not match buffer stride {}",
            layout.pass_stride(),
            buffers.pass_stride()
        )));
    }

    let scale = if pass.filter() { 1.0 / samples as f32 } else { 1.0 };
    let exposure = if pass.exposure() { config.exposure } else { 1.0 };
    let scale_exposure = scale * exposure;

    let divide = pass.divide_by().and_then(|d| layout.offset(d));
    let motion_weight = match pass {
        PassType::Motion => layout.offset(PassType::MotionWeight),
        _ => None,
    };

    let comps = pass.components();
    let mut out = vec![0.0f32; buffers.pixel_count() * comps];

    out.par_chunks_mut(comps)
        .zip(buffers.data().par_chunks(buffers.pass_stride()))
        .for_each(|(dst, px)| {
            let src = &px[offset..offset + comps];
            match pass {
                PassType::Depth => {
                    dst[0] = if src[0] == 0.0 { DEPTH_MISS } else { src[0] * scale_exposure };
                }
                PassType::Mist => {
                    dst[0] = (src[0] * scale_exposure).clamp(0.0, 1.0);
                }
                PassType::Combined => {
                    // Exposure is rgb only; roulette can push coverage past 1
                    let f = Vec4::from_slice(src);
                    let alpha = (f.w * scale).clamp(0.0, 1.0);
                    (f.truncate() * scale_exposure).extend(alpha).write_to_slice(dst);
                }
                PassType::Shadow => {
                    let f = Vec4::from_slice(src);
                    let inv_w = if f.w > 0.0 { 1.0 / f.w } else { 1.0 };
                    (f.truncate() * inv_w).extend(1.0).write_to_slice(dst);
                }
                PassType::Motion => {
                    let f = Vec4::from_slice(src);
                    let inv_w = match motion_weight {
                        Some(w) if px[w] > 0.0 => 1.0 / px[w],
                        Some(_) => 0.0,
                        None => 1.0 / samples as f32,
                    };
                    (f * inv_w).write_to_slice(dst);
                }
                _ => match divide {
                    Some(d) => {
                        let color = Vec3::from_slice(&px[d..d + 3]);
                        safe_divide_color(Vec3::from_slice(src) * exposure, color)
                            .write_to_slice(dst);
                    }
                    None => {
                        for (o, &v) in dst.iter_mut().zip(src) {
                            *o = v * scale_exposure;
                        }
                    }
                },
            }
        });

    Ok(out)
}
