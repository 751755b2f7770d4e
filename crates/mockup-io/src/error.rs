//! Error types for decoding and export.

use std::io;

use mockup_core::CoreError;
use thiserror::Error;

/// Decode, encode or sink error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input is not a supported image type.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoder rejected the bytes.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoder failed.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Malformed `data:` URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Surface construction failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

impl IoError {
    /// True for errors caused by the input bytes rather than the environment.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_) | Self::DecodeError(_) | Self::InvalidDataUrl(_)
        )
    }
}
