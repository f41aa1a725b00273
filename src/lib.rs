//! # film-passes
//!
//! Progressive render pass accumulation for path tracers.
//!
//! A film keeps one flat `f32` buffer per image. Every pixel owns a region of
//! `pass_stride` floats holding the combined image and any enabled auxiliary
//! passes (depth, normal, UV, ids, motion, light decomposition, shadow, mist).
//! Sample 0 seeds each pass, later samples add to it, and read-back divides
//! by the sample count.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math re-exports
//! - [`film`] - Pass layout, configuration, writers, buffers, resolve
//!
//! ## Example
//!
//! ```ignore
//! use film_passes::prelude::*;
//!
//! let config = FilmConfig::from_json_str(r#"{ "passes": ["depth", "normal", "mist"] }"#)?;
//! let mut buffers = RenderBuffers::new(640, 480, &config.layout)?;
//!
//! for sample in 0..16 {
//!     buffers.accumulate_sample(sample, |x, y, pixel| {
//!         let hit = trace_camera_ray(x, y, sample);
//!         let mut radiance = PathRadiance::default();
//!         let flags = PathFlags::CAMERA;
//!         write_data_passes(&config, pixel, &mut radiance, &hit, sample, flags, Vec3::ONE);
//!         write_light_passes(&config, pixel, &radiance, sample);
//!     });
//! }
//!
//! let normals = resolve_pass(&buffers, &config, PassType::Normal, buffers.samples())?;
//! ```

pub mod film;
pub mod util;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::film::*;
    pub use crate::util::{Error, Result, Vec3, Vec4};
}
