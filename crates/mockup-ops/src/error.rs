//! Error types for compositing.

use std::fmt;

use mockup_core::CoreError;
use mockup_io::IoError;
use thiserror::Error;

/// Which image of a render pass failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// Mockup background artwork
    Background,
    /// The user's screenshot
    UserImage,
    /// Mockup overlay layer
    Overlay,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Background => "background",
            Self::UserImage => "user image",
            Self::Overlay => "overlay",
        })
    }
}

/// Error type for render operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An image of the pass could not be loaded; the pass was aborted.
    #[error("failed to load {role}: {source}")]
    Decode {
        /// Which image failed
        role: ImageRole,
        /// Underlying decode error
        #[source]
        source: IoError,
    },

    /// Surface construction failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl OpsError {
    /// Wraps a loader error for `role`.
    pub fn decode(role: ImageRole, source: IoError) -> Self {
        Self::Decode { role, source }
    }

    /// The failed image, for decode errors.
    pub fn failed_role(&self) -> Option<ImageRole> {
        match self {
            Self::Decode { role, .. } => Some(*role),
            _ => None,
        }
    }
}

/// Result type for render operations.
pub type OpsResult<T> = Result<T, OpsError>;
