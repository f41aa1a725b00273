//! Error types for film setup and read-back.
//!
//! The per-sample write path never fails; everything here is raised while a
//! layout or configuration is built, or when accumulated data is resolved.

use thiserror::Error;

use crate::film::PassType;

/// Main error type for film operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Two enabled passes share buffer slots
    #[error("Pass {first} [{first_range:?}] overlaps {second} [{second_range:?}]")]
    PassOverlap {
        first: PassType,
        first_range: std::ops::Range<usize>,
        second: PassType,
        second_range: std::ops::Range<usize>,
    },

    /// A pass region reaches past the per-pixel stride
    #[error("Pass {pass} ends at {end}, past pass stride {stride}")]
    PassOutOfStride { pass: PassType, end: usize, stride: usize },

    /// Same pass listed more than once in an explicit layout
    #[error("Duplicate pass: {0}")]
    DuplicatePass(PassType),

    /// Pass name not recognised in a configuration
    #[error("Unknown pass: {0}")]
    UnknownPass(String),

    /// Pass requested on read-back but absent from the layout
    #[error("Pass not enabled: {0}")]
    PassNotEnabled(PassType),

    /// Resolve requested before any sample was accumulated
    #[error("No samples accumulated")]
    NoSamples,

    /// Zero-sized or overflowing image dimensions
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Invalid configuration value
    #[error("Invalid film config: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding failed
    #[error("Image export failed: {0}")]
    Image(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias for film operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::PassOutOfStride { pass: PassType::Normal, end: 12, stride: 10 };
        let msg = e.to_string();
        assert!(msg.contains("normal"));
        assert!(msg.contains("12"));
        assert!(msg.contains("10"));

        let e = Error::UnknownPass("sparkle".into());
        assert!(e.to_string().contains("sparkle"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
