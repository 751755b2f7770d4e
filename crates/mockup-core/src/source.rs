//! Image sources.
//!
//! An [`ImageSource`] says where image bytes come from. Decoding lives in
//! `mockup-io`; this crate only describes and identifies sources.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::surface::Surface;

/// Where an image comes from.
///
/// Byte payloads are reference counted so a source can be cloned into
/// worker messages without copying the image.
#[derive(Clone)]
pub enum ImageSource {
    /// An image file on disk (relative paths resolve against the asset dir)
    File(PathBuf),
    /// Raw file bytes, e.g. from a dropped or picked file
    Memory {
        /// Original file name, used for format hints and logging
        name: String,
        /// Encoded image bytes
        bytes: Arc<[u8]>,
    },
    /// A `data:image/...;base64,...` URL
    DataUrl(Arc<str>),
    /// An already decoded surface
    Decoded(Arc<Surface>),
}

/// Stable identity of an [`ImageSource`], used as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey(String);

impl SourceKey {
    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ImageSource {
    /// Source for a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Source for in-memory encoded bytes.
    pub fn memory(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Source for a data URL.
    pub fn data_url(url: impl Into<Arc<str>>) -> Self {
        Self::DataUrl(url.into())
    }

    /// Source for a surface that is already decoded.
    pub fn decoded(surface: Surface) -> Self {
        Self::Decoded(Arc::new(surface))
    }

    /// Cache key. Equal sources give equal keys; byte payloads are hashed.
    ///
    /// ```rust
    /// use mockup_core::ImageSource;
    ///
    /// let a = ImageSource::memory("a.png", vec![1u8, 2, 3]);
    /// let b = ImageSource::memory("a.png", vec![1u8, 2, 3]);
    /// assert_eq!(a.key(), b.key());
    /// assert_ne!(a.key(), ImageSource::file("a.png").key());
    /// ```
    pub fn key(&self) -> SourceKey {
        match self {
            Self::File(path) => SourceKey(format!("file:{}", path.display())),
            Self::Memory { name, bytes } => {
                SourceKey(format!("mem:{name}:{}:{:016x}", bytes.len(), hash_of(&bytes[..])))
            }
            Self::DataUrl(url) => SourceKey(format!("data:{}:{:016x}", url.len(), hash_of(&url[..]))),
            Self::Decoded(surface) => SourceKey(format!(
                "decoded:{:p}:{}x{}",
                Arc::as_ptr(surface),
                surface.width(),
                surface.height()
            )),
        }
    }

    /// Human-readable label for logs and the UI.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => file_label(path),
            Self::Memory { name, .. } => name.clone(),
            Self::DataUrl(_) => "data URL".to_string(),
            Self::Decoded(s) => format!("{}x{} surface", s.width(), s.height()),
        }
    }

    /// File name or path, for format hints.
    pub fn name_hint(&self) -> Option<&str> {
        match self {
            Self::File(path) => path.file_name().and_then(|n| n.to_str()),
            Self::Memory { name, .. } => Some(name),
            Self::DataUrl(_) | Self::Decoded(_) => None,
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Memory { name, bytes } => f
                .debug_struct("Memory")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
            Self::DataUrl(url) => f.debug_tuple("DataUrl").field(&url.len()).finish(),
            Self::Decoded(s) => f.debug_tuple("Decoded").field(s).finish(),
        }
    }
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_key_depends_on_bytes() {
        let a = ImageSource::memory("shot.png", vec![1u8, 2, 3]);
        let b = ImageSource::memory("shot.png", vec![1u8, 2, 4]);
        assert_ne!(a.key(), b.key());
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_decoded_key_is_identity() {
        let s = Surface::new(2, 2).unwrap();
        let a = ImageSource::decoded(s.clone());
        let b = ImageSource::decoded(s);
        assert_eq!(a.key(), a.clone().key());
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ImageSource::file("/tmp/shot.png").label(), "shot.png");
        assert_eq!(ImageSource::file("/tmp/shot.png").name_hint(), Some("shot.png"));
        assert_eq!(ImageSource::data_url("data:image/png;base64,").label(), "data URL");
    }
}
