//! Shared runtime state - the shutdown flag and activity clock shared by all tasks
//!
//! This replaces scattered globals with a single `Arc<RuntimeState>` passed to
//! each thread at construction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Process-wide state shared across the capture callback, the streaming
/// session, and the liveness monitor.
///
/// The shutdown flag has set-once semantics: once true it stays true for the
/// rest of the process. All loops poll it at iteration boundaries.
pub struct RuntimeState {
    /// Cooperative shutdown requested (signal, fatal error, or silence timeout)
    shutdown: AtomicBool,
    /// Unix ms of the last committed typing activity
    last_activity_ms: AtomicU64,
}

impl RuntimeState {
    /// Create shared state with the activity clock starting now.
    ///
    /// Starting at "now" means silence before any speech also counts toward
    /// the silence timeout.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            shutdown: AtomicBool::new(false),
            last_activity_ms: AtomicU64::new(now_ms()),
        })
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Record typing activity now. Called only when text was actually emitted.
    pub fn mark_activity(&self) {
        self.last_activity_ms.store(now_ms(), Ordering::SeqCst);
    }

    /// Time elapsed since the last committed activity.
    pub fn since_activity(&self) -> Duration {
        let last = self.last_activity_ms.load(Ordering::SeqCst);
        Duration::from_millis(now_ms().saturating_sub(last))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Type alias for shared state
pub type SharedState = Arc<RuntimeState>;
