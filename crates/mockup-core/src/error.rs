//! Error types for mockup-core.
//!
//! # Usage
//!
//! ```rust
//! use mockup_core::{CoreError, CoreResult};
//!
//! fn check(width: u32, height: u32) -> CoreResult<()> {
//!     if width == 0 || height == 0 {
//!         return Err(CoreError::invalid_dimensions(width, height, "zero size"));
//!     }
//!     Ok(())
//! }
//! assert!(check(0, 10).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised while building surfaces or loading mockup definitions.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Surface or image dimensions are unusable.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Pixel buffer length does not match the declared dimensions.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSize {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },

    /// A mockup definition failed load-time validation.
    #[error("invalid mockup '{name}': {reason}")]
    InvalidMockup {
        /// Mockup name (may be empty when the name itself is the problem)
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// No mockup with this name exists in the registry.
    #[error("unknown mockup: {0}")]
    UnknownMockup(String),

    /// Registry YAML could not be parsed.
    #[error("registry parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error while reading a registry file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Creates a [`CoreError::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates a [`CoreError::InvalidMockup`] error.
    #[inline]
    pub fn invalid_mockup(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMockup {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_message() {
        let err = CoreError::invalid_dimensions(0, 480, "zero width");
        let msg = err.to_string();
        assert!(msg.contains("0x480"));
        assert!(msg.contains("zero width"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.yaml");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
