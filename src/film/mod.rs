//! Film: render pass layout, accumulation and read-back.
//!
//! ## Flow
//! ```text
//! FilmSettings (JSON) → FilmConfig { PassLayout, mist, shadow scale, exposure }
//!                     → RenderBuffers (width × height × pass_stride floats)
//! per sample, per pixel:  write_data_passes / write_light_passes / write_combined
//! after N samples:        resolve_pass → export_pass
//! ```

mod buffer;
mod config;
#[cfg(feature = "exr")]
mod export;
mod kernel;
mod layout;
mod pass;
mod resolve;
mod write;

pub use buffer::RenderBuffers;
pub use config::{FilmConfig, FilmSettings, MistParams, MistSettings};
#[cfg(feature = "exr")]
pub use export::export_pass;
pub use kernel::{
    mist_factor, mist_falloff, write_combined, write_data_passes, write_light_passes,
    PathRadiance, ShadingPoint, ShadingSample,
};
pub use layout::{PassEntry, PassLayout, PassLayoutBuilder};
pub use pass::{PassSet, PassType, PathFlags};
pub use resolve::{resolve_pass, DEPTH_MISS};
pub use write::{write_pass, write_scalar, write_vec3, write_vec4, PassValue};
