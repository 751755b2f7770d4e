//! Style-picker thumbnail cache.
//!
//! Thumbnails depend only on the mockup and the user image: they ignore the
//! scale factor, so moving the scale slider keeps them. Changing or
//! removing the user image invalidates all of them.

use std::collections::HashMap;

use mockup_core::{Registry, SourceKey, Surface};
use tracing::debug;

/// Thumbnails keyed by mockup name, valid for one user image.
#[derive(Debug, Clone)]
pub struct ThumbnailCache<T = Surface> {
    user_key: Option<SourceKey>,
    entries: HashMap<String, T>,
}

impl<T> Default for ThumbnailCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ThumbnailCache<T> {
    /// Empty cache for "no user image".
    pub fn new() -> Self {
        Self {
            user_key: None,
            entries: HashMap::new(),
        }
    }

    /// Points the cache at the current user image. Clears every entry and
    /// returns `true` when the image differs from the one cached for.
    pub fn sync_user_image(&mut self, key: Option<SourceKey>) -> bool {
        if self.user_key == key {
            return false;
        }
        debug!(old = ?self.user_key, new = ?key, dropped = self.entries.len(), "thumbnails invalidated");
        self.user_key = key;
        self.entries.clear();
        true
    }

    /// User image the entries were rendered for.
    pub fn user_key(&self) -> Option<&SourceKey> {
        self.user_key.as_ref()
    }

    /// Stores a thumbnail rendered for `user_key`. Results for another
    /// image are ignored; returns whether it was stored.
    pub fn insert(&mut self, name: impl Into<String>, user_key: Option<&SourceKey>, thumb: T) -> bool {
        if user_key != self.user_key.as_ref() {
            return false;
        }
        self.entries.insert(name.into(), thumb);
        true
    }

    /// Cached thumbnail of a mockup.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Names of registry mockups without a thumbnail, in registry order.
    pub fn missing<'r>(&self, registry: &'r Registry) -> Vec<&'r str> {
        registry
            .names()
            .filter(|name| !self.entries.contains_key(*name))
            .collect()
    }

    /// Number of cached thumbnails.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
