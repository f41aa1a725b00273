//! Utility types and functions shared across the film modules.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and color helpers

mod error;
mod math;

pub use error::*;
pub use math::*;
