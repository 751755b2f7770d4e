//! Image loaders.
//!
//! The compositor asks an [`ImageLoader`] for every decode. Mockup
//! backgrounds are tens of megapixels, so interactive use wraps the
//! decoder in a [`CachingLoader`] and decodes each background once.
//!
//! ```rust
//! use mockup_core::{ImageSource, Surface};
//! use mockup_io::{CachingLoader, DecodingLoader, ImageLoader};
//!
//! let loader = CachingLoader::new(DecodingLoader::new(), 8);
//! let source = ImageSource::decoded(Surface::new(2, 2).unwrap());
//! assert_eq!(loader.load(&source).unwrap().width(), 2);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use mockup_core::{ImageSource, SourceKey, Surface};
use tracing::{debug, trace};

use crate::decode::decode_source;
use crate::IoResult;

/// Default number of decoded images a [`CachingLoader`] keeps.
pub const DEFAULT_CACHE_ENTRIES: usize = 8;

/// Something that can produce a decoded surface for a source.
///
/// Implementations are shared between the UI and the render worker, so
/// they must be thread-safe.
pub trait ImageLoader: Send + Sync {
    /// Decodes (or fetches) the image for `source`.
    fn load(&self, source: &ImageSource) -> IoResult<Arc<Surface>>;
}

impl<L: ImageLoader + ?Sized> ImageLoader for Arc<L> {
    fn load(&self, source: &ImageSource) -> IoResult<Arc<Surface>> {
        (**self).load(source)
    }
}

impl<L: ImageLoader + ?Sized> ImageLoader for &L {
    fn load(&self, source: &ImageSource) -> IoResult<Arc<Surface>> {
        (**self).load(source)
    }
}

/// Decodes on every call.
#[derive(Debug, Clone, Default)]
pub struct DecodingLoader {
    base_dir: Option<PathBuf>,
}

impl DecodingLoader {
    /// Loader that resolves relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that resolves relative paths against `dir` (the asset directory).
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Asset directory, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }
}

impl ImageLoader for DecodingLoader {
    fn load(&self, source: &ImageSource) -> IoResult<Arc<Surface>> {
        decode_source(source, self.base_dir.as_deref())
    }
}

/// Hit/miss counters of a [`CachingLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to decode
    pub misses: u64,
    /// Entries currently held
    pub entries: usize,
}

struct Entry {
    surface: Arc<Surface>,
    last_access: u64,
}

/// Memoises another loader by [`SourceKey`], evicting the least recently
/// used entry once `capacity` is reached.
///
/// Decoding happens outside the lock; two threads missing on the same key
/// may both decode, and the later insert wins.
pub struct CachingLoader<L = DecodingLoader> {
    inner: L,
    capacity: usize,
    entries: Mutex<HashMap<SourceKey, Entry>>,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<L: ImageLoader> CachingLoader<L> {
    /// Wraps `inner`, keeping at most `capacity` (min 1) surfaces.
    pub fn new(inner: L, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The wrapped loader.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Drops every cached surface.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.lock().map(|e| e.len()).unwrap_or(0),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}

impl<L: ImageLoader> ImageLoader for CachingLoader<L> {
    fn load(&self, source: &ImageSource) -> IoResult<Arc<Surface>> {
        // Already decoded; caching would only pin memory.
        if let ImageSource::Decoded(surface) = source {
            return Ok(Arc::clone(surface));
        }

        let key = source.key();
        if let Ok(mut entries) = self.entries.lock() {
            if let Some(entry) = entries.get_mut(&key) {
                entry.last_access = self.tick();
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key = %key, "cache hit");
                return Ok(Arc::clone(&entry.surface));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let surface = self.inner.load(source)?;

        if let Ok(mut entries) = self.entries.lock() {
            while entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_access)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(k) => {
                        debug!(key = %k, "evicting cached image");
                        entries.remove(&k);
                    }
                    None => break,
                }
            }
            entries.insert(
                key,
                Entry {
                    surface: Arc::clone(&surface),
                    last_access: self.tick(),
                },
            );
        }
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Counts decodes and returns a surface whose width encodes the call number.
    struct CountingLoader(AtomicUsize);

    impl ImageLoader for CountingLoader {
        fn load(&self, _source: &ImageSource) -> IoResult<Arc<Surface>> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) as u32;
            Ok(Arc::new(Surface::new(n + 1, 1)?))
        }
    }

    fn counting() -> CachingLoader<CountingLoader> {
        CachingLoader::new(CountingLoader(AtomicUsize::new(0)), 2)
    }

    #[test]
    fn test_hits_after_first_decode() {
        let loader = counting();
        let src = ImageSource::file("bg.png");
        let a = loader.load(&src).unwrap();
        let b = loader.load(&src).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(
            loader.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let loader = counting();
        let a = ImageSource::file("a.png");
        let b = ImageSource::file("b.png");
        let c = ImageSource::file("c.png");

        loader.load(&a).unwrap();
        loader.load(&b).unwrap();
        loader.load(&a).unwrap(); // a is now newer than b
        loader.load(&c).unwrap(); // evicts b

        assert_eq!(loader.stats().entries, 2);
        assert_eq!(loader.inner().0.load(Ordering::SeqCst), 3);
        loader.load(&a).unwrap();
        assert_eq!(loader.inner().0.load(Ordering::SeqCst), 3);
        loader.load(&b).unwrap();
        assert_eq!(loader.inner().0.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_decoded_sources_bypass_cache() {
        let loader = counting();
        let src = ImageSource::decoded(Surface::new(5, 5).unwrap());
        assert_eq!(loader.load(&src).unwrap().width(), 5);
        assert_eq!(loader.stats().entries, 0);
        assert_eq!(loader.inner().0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let loader = CachingLoader::new(DecodingLoader::new(), 4);
        let src = ImageSource::memory("x.gif", vec![0u8; 4]);
        assert!(loader.load(&src).is_err());
        assert_eq!(loader.stats().entries, 0);
    }
}
