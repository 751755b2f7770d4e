//! Last-trigger-wins render slots.
//!
//! Renders can overlap: a slow render started for one mockup may finish
//! after a faster one started later. A [`RenderSlot`] stamps every trigger
//! with a [`Generation`] and only accepts results that are not older than
//! the newest trigger, so the surface shown is always the one the user
//! asked for last.
//!
//! ```rust
//! use mockup_ops::RenderSlot;
//!
//! let mut slot: RenderSlot<&str> = RenderSlot::new();
//! let first = slot.begin();
//! let second = slot.begin();
//! assert!(slot.commit(second, "second"));
//! assert!(!slot.commit(first, "first")); // late and stale
//! assert_eq!(slot.current(), Some(&"second"));
//! assert!(!slot.is_loading());
//! ```

use mockup_core::Surface;
use tracing::trace;

/// Monotonically increasing render-trigger number.
pub type Generation = u64;

/// Holds the most recently committed result of one render target.
#[derive(Debug, Clone)]
pub struct RenderSlot<T = Surface> {
    issued: Generation,
    shown: Option<(Generation, T)>,
    loading: bool,
}

impl<T> Default for RenderSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RenderSlot<T> {
    /// Empty slot; no generation issued yet.
    pub fn new() -> Self {
        Self {
            issued: 0,
            shown: None,
            loading: false,
        }
    }

    /// Issues a new generation for a render trigger and marks the slot
    /// as loading.
    pub fn begin(&mut self) -> Generation {
        self.issued += 1;
        self.loading = true;
        trace!(generation = self.issued, "render triggered");
        self.issued
    }

    /// Offers a finished result. Accepted only if `generation` is the
    /// newest issued; returns whether it was.
    pub fn commit(&mut self, generation: Generation, value: T) -> bool {
        if generation < self.issued {
            trace!(generation, newest = self.issued, "stale result dropped");
            return false;
        }
        self.issued = generation;
        self.shown = Some((generation, value));
        self.loading = false;
        true
    }

    /// Reports a failed render. Clears the loading flag if `generation` is
    /// the newest; the shown value is left untouched.
    pub fn fail(&mut self, generation: Generation) -> bool {
        if generation < self.issued {
            return false;
        }
        self.loading = false;
        true
    }

    /// Removes the shown value without issuing a generation.
    pub fn clear(&mut self) {
        self.shown = None;
    }

    /// Most recently accepted value.
    pub fn current(&self) -> Option<&T> {
        self.shown.as_ref().map(|(_, v)| v)
    }

    /// Generation of the shown value.
    pub fn shown_generation(&self) -> Option<Generation> {
        self.shown.as_ref().map(|(g, _)| *g)
    }

    /// Newest generation issued.
    pub fn latest(&self) -> Generation {
        self.issued
    }

    /// True while the newest trigger has neither committed nor failed.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True if a result for `generation` would still be accepted.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation >= self.issued
    }
}
