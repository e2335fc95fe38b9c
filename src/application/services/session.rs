use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::SessionGeneration;

/// Shared analysis-session counter.
///
/// Starting a new analysis bumps the generation; anything still pending under
/// an older generation (a late synthesis reply, a decoded buffer waiting to
/// play) is refused instead of applied. Cloning shares the counter.
#[derive(Clone)]
pub struct SessionCounter {
    current: Arc<AtomicU64>,
}

impl SessionCounter {
    pub fn new() -> Self {
        Self {
            current: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start a new session, invalidating all previous ones.
    pub fn begin(&self) -> SessionGeneration {
        SessionGeneration(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> SessionGeneration {
        SessionGeneration(self.current.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, generation: SessionGeneration) -> bool {
        self.current() == generation
    }
}

impl Default for SessionCounter {
    fn default() -> Self {
        Self::new()
    }
}
