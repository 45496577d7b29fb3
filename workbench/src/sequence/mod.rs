//! Per-type monotonic counters used to generate distinct sample values.
//!
//! Counters are keyed by [`TypeRef`], start at 1 and only ever move
//! forward until [`SequenceRegistry::reset_all`] clears them. A process-wide
//! instance backs every [`Builders`](crate::Builders) context unless one is
//! injected explicitly; it lives until the process exits and is cleared only
//! through [`crate::reset_counters`].

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use tracing::trace;

use crate::registry::TypeRef;

static GLOBAL: LazyLock<Arc<SequenceRegistry>> = LazyLock::new(Arc::default);

/// Mapping from a type to its last issued counter value.
#[derive(Debug, Default)]
pub struct SequenceRegistry {
    counters: Mutex<HashMap<TypeRef, u64>>,
}

impl SequenceRegistry {
    /// Creates an empty registry, independent of the global one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Increments and returns the counter for `ty`; the first call yields 1.
    pub fn next(&self, ty: &TypeRef) -> u64 {
        let mut counters = self.counters.lock();
        let counter = counters.entry(*ty).or_insert(0);
        *counter += 1;
        trace!(scope = ty.path(), value = *counter, "sequence advanced");
        *counter
    }

    /// Last value issued for `ty`, or 0 when none has been.
    #[must_use]
    pub fn current(&self, ty: &TypeRef) -> u64 {
        self.counters.lock().get(ty).copied().unwrap_or(0)
    }

    /// Clears every counter.
    pub fn reset_all(&self) {
        self.counters.lock().clear();
    }
}
