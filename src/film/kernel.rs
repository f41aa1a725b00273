//! Per-path pass writers.
//!
//! Called once per traced path vertex (data passes) and once per finished
//! path (light passes and the combined image). `buffer` is always the region
//! of a single pixel; the caller owns that pixel for its whole sample
//! sequence, so plain read-modify-write is enough.
//!
//! ```ignore
//! let mut radiance = PathRadiance::default();
//! write_data_passes(&config, pixel, &mut radiance, &hit, sample, PathFlags::CAMERA, throughput);
//! // ... integrator fills direct/indirect lighting ...
//! write_light_passes(&config, pixel, &radiance, sample);
//! write_combined(&config, pixel, sample, radiance_sum, transparency);
//! ```

use super::config::{FilmConfig, MistSettings};
use super::pass::{PassType, PathFlags};
use super::write::{write_scalar, write_vec3, write_vec4};
use crate::util::{average, Vec3, Vec4};

/// Shading results at a path vertex, supplied by the integrator.
///
/// The pass writers only read from it.
pub trait ShadingPoint {
    /// Distance from the camera to the shaded point.
    fn camera_distance(&self) -> f32;
    fn normal(&self) -> Vec3;
    fn uv(&self) -> Vec3;
    /// Screen space motion (previous xy, next xy).
    fn motion(&self) -> Vec4;
    fn object_pass_id(&self) -> f32;
    fn material_pass_id(&self) -> f32;
    fn bsdf_diffuse(&self) -> Vec3;
    fn bsdf_glossy(&self) -> Vec3;
    fn bsdf_transmission(&self) -> Vec3;
    fn bsdf_transparency(&self) -> Vec3;
}

/// Plain [`ShadingPoint`] holding precomputed values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShadingSample {
    pub camera_distance: f32,
    pub normal: Vec3,
    pub uv: Vec3,
    pub motion: Vec4,
    pub object_pass_id: f32,
    pub material_pass_id: f32,
    pub diffuse: Vec3,
    pub glossy: Vec3,
    pub transmission: Vec3,
    pub transparency: Vec3,
}

impl ShadingPoint for ShadingSample {
    #[inline]
    fn camera_distance(&self) -> f32 {
        self.camera_distance
    }
    #[inline]
    fn normal(&self) -> Vec3 {
        self.normal
    }
    #[inline]
    fn uv(&self) -> Vec3 {
        self.uv
    }
    #[inline]
    fn motion(&self) -> Vec4 {
        self.motion
    }
    #[inline]
    fn object_pass_id(&self) -> f32 {
        self.object_pass_id
    }
    #[inline]
    fn material_pass_id(&self) -> f32 {
        self.material_pass_id
    }
    #[inline]
    fn bsdf_diffuse(&self) -> Vec3 {
        self.diffuse
    }
    #[inline]
    fn bsdf_glossy(&self) -> Vec3 {
        self.glossy
    }
    #[inline]
    fn bsdf_transmission(&self) -> Vec3 {
        self.transmission
    }
    #[inline]
    fn bsdf_transparency(&self) -> Vec3 {
        self.transparency
    }
}

/// Radiance decomposition gathered along one path.
///
/// Lighting terms are filled by the integrator. The `color_*` albedo
/// accumulators and `mist` are filled by [`write_data_passes`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathRadiance {
    pub emission: Vec3,
    pub background: Vec3,
    pub ao: Vec3,

    pub direct_diffuse: Vec3,
    pub direct_glossy: Vec3,
    pub direct_transmission: Vec3,

    pub indirect_diffuse: Vec3,
    pub indirect_glossy: Vec3,
    pub indirect_transmission: Vec3,

    pub color_diffuse: Vec3,
    pub color_glossy: Vec3,
    pub color_transmission: Vec3,

    pub shadow: Vec4,
    pub mist: f32,
}

/// Shape a normalized mist distance with the falloff exponent.
///
/// Linear, quadratic and square root curves skip `powf`.
#[inline]
pub fn mist_falloff(mist: f32, falloff: f32) -> f32 {
    if falloff == 1.0 {
        mist
    } else if falloff == 2.0 {
        mist * mist
    } else if falloff == 0.5 {
        mist.sqrt()
    } else {
        mist.powf(falloff)
    }
}

/// Mist amount in [0, 1] at `depth`, after falloff.
#[inline]
pub fn mist_factor(mist: &MistSettings, depth: f32) -> f32 {
    let t = ((depth - mist.start) * mist.inv_depth).clamp(0.0, 1.0);
    mist_falloff(t, mist.falloff)
}

/// Write geometric data passes for a path vertex and feed the albedo and mist
/// accumulators of `radiance`.
///
/// Does nothing for non-camera paths and when no pass besides the combined
/// image is enabled. Depth and ids are seeded on sample 0 only; normal, UV and
/// motion accumulate on every sample until the path has gone through a
/// transparent surface.
pub fn write_data_passes<S: ShadingPoint + ?Sized>(
    config: &FilmConfig,
    buffer: &mut [f32],
    radiance: &mut PathRadiance,
    sd: &S,
    sample: u32,
    path_flags: PathFlags,
    throughput: Vec3,
) {
    if !path_flags.is_camera_path() {
        return;
    }

    let layout = &config.layout;
    let mut passes = layout.enabled();
    passes.remove(PassType::Combined);
    if passes.is_empty() {
        return;
    }

    if !path_flags.contains(PathFlags::TRANSPARENT) {
        if sample == 0 {
            if let Some(offset) = layout.offset(PassType::Depth) {
                write_scalar(buffer, offset, sample, sd.camera_distance());
            }
            if let Some(offset) = layout.offset(PassType::ObjectId) {
                write_scalar(buffer, offset, sample, sd.object_pass_id());
            }
            if let Some(offset) = layout.offset(PassType::MaterialId) {
                write_scalar(buffer, offset, sample, sd.material_pass_id());
            }
        }

        if let Some(offset) = layout.offset(PassType::Normal) {
            write_vec3(buffer, offset, sample, sd.normal());
        }
        if let Some(offset) = layout.offset(PassType::Uv) {
            write_vec3(buffer, offset, sample, sd.uv());
        }
        if let Some(offset) = layout.offset(PassType::Motion) {
            write_vec4(buffer, offset, sample, sd.motion());
            if let Some(weight) = layout.offset(PassType::MotionWeight) {
                write_scalar(buffer, weight, sample, 1.0);
            }
        }
    }

    if passes.any_of(&PassType::DIFFUSE) {
        radiance.color_diffuse += sd.bsdf_diffuse() * throughput;
    }
    if passes.any_of(&PassType::GLOSSY) {
        radiance.color_glossy += sd.bsdf_glossy() * throughput;
    }
    if passes.any_of(&PassType::TRANSMISSION) {
        radiance.color_transmission += sd.bsdf_transmission() * throughput;
    }

    if passes.contains(PassType::Mist) {
        let mist = mist_factor(&config.mist, sd.camera_distance());
        let alpha = throughput * (Vec3::ONE - sd.bsdf_transparency());
        radiance.mist += (1.0 - mist) * average(alpha);
    }
}

/// Write the light decomposition passes gathered in `radiance`.
///
/// Does nothing unless the film's light-pass switch is on. The shadow pass `w`
/// is replaced by the configured shadow scale.
pub fn write_light_passes(
    config: &FilmConfig,
    buffer: &mut [f32],
    radiance: &PathRadiance,
    sample: u32,
) {
    if !config.use_light_pass {
        return;
    }

    let layout = &config.layout;
    let color_passes = [
        (PassType::DiffuseIndirect, radiance.indirect_diffuse),
        (PassType::GlossyIndirect, radiance.indirect_glossy),
        (PassType::TransmissionIndirect, radiance.indirect_transmission),
        (PassType::DiffuseDirect, radiance.direct_diffuse),
        (PassType::GlossyDirect, radiance.direct_glossy),
        (PassType::TransmissionDirect, radiance.direct_transmission),
        (PassType::Emission, radiance.emission),
        (PassType::Background, radiance.background),
        (PassType::Ao, radiance.ao),
        (PassType::DiffuseColor, radiance.color_diffuse),
        (PassType::GlossyColor, radiance.color_glossy),
        (PassType::TransmissionColor, radiance.color_transmission),
    ];
    for (pass, value) in color_passes {
        if let Some(offset) = layout.offset(pass) {
            write_vec3(buffer, offset, sample, value);
        }
    }

    if let Some(offset) = layout.offset(PassType::Shadow) {
        let shadow = radiance.shadow.truncate().extend(config.shadow_scale);
        write_vec4(buffer, offset, sample, shadow);
    }
    if let Some(offset) = layout.offset(PassType::Mist) {
        write_scalar(buffer, offset, sample, radiance.mist);
    }
}

/// Write the main image: rgb radiance with `w = 1 - transparency`.
pub fn write_combined(
    config: &FilmConfig,
    buffer: &mut [f32],
    sample: u32,
    radiance: Vec3,
    transparency: f32,
) {
    if let Some(offset) = config.layout.offset(PassType::Combined) {
        write_vec4(buffer, offset, sample, radiance.extend(1.0 - transparency));
    }
}
