//! Session-scoped state shared by every store built within one user session.
//!
//! The host keeps one [`SessionState`] per user session and hands a clone to
//! each store it constructs. Clones share the same underlying queues, so a
//! mutation queued in one evaluation cycle is still there in the next.

use crate::cookies::mutation::MutationQueue;
use dashmap::DashMap;
use std::sync::Arc;

/// Fixed session slot under which the mutation queue lives.
pub const QUEUE_SLOT: &str = "CookieManager.queue";

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    queues: Arc<DashMap<String, MutationQueue>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot key for a store prefix. The default empty prefix maps to [`QUEUE_SLOT`].
    pub fn slot_for_prefix(prefix: &str) -> String {
        format!("{}{}", QUEUE_SLOT, prefix)
    }

    /// Run `f` against the queue in `slot`, creating an empty one on first use.
    ///
    /// `f` must not call back into this session.
    pub fn with_queue<R>(&self, slot: &str, f: impl FnOnce(&mut MutationQueue) -> R) -> R {
        let mut entry = self.queues.entry(slot.to_string()).or_default();
        f(entry.value_mut())
    }

    /// Copy of the queue in `slot` (empty if never touched).
    pub fn queue(&self, slot: &str) -> MutationQueue {
        self.queues
            .get(slot)
            .map(|q| q.value().clone())
            .unwrap_or_default()
    }

    /// Number of pending mutations in `slot`.
    pub fn pending(&self, slot: &str) -> usize {
        self.queues.get(slot).map(|q| q.len()).unwrap_or(0)
    }

    /// Drop every queue, e.g. when the session ends.
    pub fn clear(&self) {
        self.queues.clear();
    }
}
