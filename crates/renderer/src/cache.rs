//! Lazily computed values with explicit invalidation.
//!
//! The palette and the drawing size are both derived from settings that
//! change rarely. They live next to the intensity buffer inside the repaint
//! lock, so invalidation and recompute never race.

/// Whether a cached value can be used as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Valid,
    Stale,
}

/// A value recomputed on first read after invalidation.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    value: Option<T>,
    rebuilds: u64,
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            rebuilds: 0,
        }
    }

    pub fn state(&self) -> CacheState {
        if self.value.is_some() {
            CacheState::Valid
        } else {
            CacheState::Stale
        }
    }

    /// Drop the current value; the next read recomputes it.
    pub fn invalidate(&mut self) {
        self.value = None;
    }

    /// Current value, computing it with `f` if stale.
    pub fn get_or_compute(&mut self, f: impl FnOnce() -> T) -> &T {
        if self.value.is_none() {
            self.rebuilds += 1;
        }
        self.value.get_or_insert_with(f)
    }

    /// Current value without recomputing.
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Number of times the value has been computed.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}
