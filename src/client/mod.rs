//! The boundary between the server-side stores and the client.
//!
//! Each store construction makes one round-trip through a [`ClientBoundary`]:
//! it hands over the pending mutation queue, the client applies it to its
//! cookie jar, and (unless the request is save-only) reports the resulting
//! cookie string back. `Ok(None)` means the client has not reported yet.

pub mod document;

use crate::base::context::BoundaryResultExt;
use crate::base::cookieerror::Result;
use crate::cookies::mutation::MutationQueue;
use serde::Serialize;
use std::sync::Arc;

pub use document::DocumentJar;

/// Component key of the round-trip made on store construction.
pub const SYNC_KEY: &str = "CookieManager.sync_cookies";
/// Component key of the save-only flush.
pub const SAVE_KEY: &str = "CookieManager.sync_cookies.save";

/// Arguments for one round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncRequest {
    /// Component instance key; not part of the argument payload.
    #[serde(skip)]
    pub key: String,
    /// Pending mutations with the store prefix already attached.
    pub queue: MutationQueue,
    #[serde(rename = "saveOnly")]
    pub save_only: bool,
}

impl SyncRequest {
    pub fn new(key: impl Into<String>, queue: MutationQueue, save_only: bool) -> Self {
        Self {
            key: key.into(),
            queue,
            save_only,
        }
    }

    /// JSON arguments as the client component expects them:
    /// `{"queue": {...}, "saveOnly": bool}`.
    pub fn to_args(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).boundary_context(&self.key)
    }
}

/// Round-trip to the client.
///
/// Implementations must apply `request.queue` to the client jar on every
/// call, and return the client's raw cookie string unless `save_only` is set.
#[allow(async_fn_in_trait)]
pub trait ClientBoundary {
    async fn sync_cookies(&self, request: &SyncRequest) -> Result<Option<String>>;
}

impl<T: ClientBoundary + ?Sized> ClientBoundary for &T {
    async fn sync_cookies(&self, request: &SyncRequest) -> Result<Option<String>> {
        (**self).sync_cookies(request).await
    }
}

impl<T: ClientBoundary + ?Sized> ClientBoundary for Arc<T> {
    async fn sync_cookies(&self, request: &SyncRequest) -> Result<Option<String>> {
        (**self).sync_cookies(request).await
    }
}
