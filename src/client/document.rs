//! In-process client that behaves like the browser-side sync component.
//!
//! [`DocumentJar`] keeps a cookie jar the way `document.cookie` does: entries
//! are identified by name and path, set specs write a percent-encoded pair with
//! an expiry, delete specs expire the entry immediately, and reading renders
//! every live entry as `name=value; name2=value2`.
//!
//! It is what the tests and demos use in place of a real browser, and it is a
//! reference for hosts implementing [`ClientBoundary`] over a real channel.

use crate::base::cookieerror::Result;
use crate::client::{ClientBoundary, SyncRequest};
use crate::cookies::canonicalcookie::CanonicalCookie;
use crate::cookies::mutation::{MutationQueue, MutationSpec};
use crate::cookies::parser::encode_pair;
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;

#[derive(Debug, Default)]
struct JarState {
    cookies: Vec<CanonicalCookie>,
    mounted: bool,
    requests: Vec<SyncRequest>,
}

#[derive(Debug)]
pub struct DocumentJar {
    state: Mutex<JarState>,
}

impl Default for DocumentJar {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentJar {
    /// A jar whose component has already rendered: every sync reports back.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(JarState {
                mounted: true,
                ..JarState::default()
            }),
        }
    }

    /// A jar whose component has not rendered yet.
    ///
    /// The first non-save sync applies its queue but reports nothing, like a
    /// freshly mounted component whose value has not reached the server.
    pub fn unmounted() -> Self {
        Self {
            state: Mutex::new(JarState::default()),
        }
    }

    /// Preload a session cookie, as if set by some earlier page.
    pub fn with_cookie(self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    /// Write a session cookie with path `/` directly into the jar.
    pub fn insert(&self, name: &str, value: &str) {
        let mut state = self.lock();
        state.cookies.retain(|c| !c.same_identity(name, "/"));
        state.cookies.push(CanonicalCookie::session(name, value));
    }

    /// Decoded value of the first live cookie named `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        self.lock()
            .cookies
            .iter()
            .find(|c| c.name == name && !c.is_expired(now))
            .map(|c| c.value.clone())
    }

    /// Render the jar the way `document.cookie` reads.
    pub fn document_cookie(&self) -> String {
        render(&self.lock().cookies, OffsetDateTime::now_utc())
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<SyncRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    fn lock(&self) -> MutexGuard<'_, JarState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ClientBoundary for DocumentJar {
    async fn sync_cookies(&self, request: &SyncRequest) -> Result<Option<String>> {
        let mut state = self.lock();
        let now = OffsetDateTime::now_utc();

        apply_queue(&mut state.cookies, &request.queue, now);
        state.requests.push(request.clone());

        tracing::debug!(
            key = %request.key,
            mutations = request.queue.len(),
            save_only = request.save_only,
            "document jar applied queue"
        );

        if request.save_only {
            return Ok(None);
        }
        if !state.mounted {
            state.mounted = true;
            return Ok(None);
        }
        Ok(Some(render(&state.cookies, now)))
    }
}

fn apply_queue(cookies: &mut Vec<CanonicalCookie>, queue: &MutationQueue, now: OffsetDateTime) {
    for (name, spec) in queue.iter() {
        cookies.retain(|c| !c.same_identity(name, spec.path()));
        if let MutationSpec::Set {
            value,
            expires_at,
            path,
        } = spec
        {
            let cookie = CanonicalCookie::new(
                name.to_string(),
                value.clone(),
                path.clone(),
                now,
                Some(*expires_at),
            );
            if !cookie.is_expired(now) {
                cookies.push(cookie);
            }
        }
    }
    cookies.retain(|c| !c.is_expired(now));
}

fn render(cookies: &[CanonicalCookie], now: OffsetDateTime) -> String {
    cookies
        .iter()
        .filter(|c| !c.is_expired(now))
        .map(|c| encode_pair(&c.name, &c.value))
        .collect::<Vec<_>>()
        .join("; ")
}
