//! The plaintext cookie store.
//!
//! A [`CookieStore`] is built once per evaluation cycle. Construction makes a
//! single round-trip to the client, sending the session's pending queue and
//! receiving the client's cookie string. From then on:
//!
//! - reads see the client snapshot with the pending queue layered on top,
//!   so a write is readable immediately (read-your-writes);
//! - writes only touch the queue, which lives in the [`SessionState`] and is
//!   resent on every later construction until the client confirms it;
//! - [`CookieStore::save`] flushes the queue right away in save-only mode.

use crate::base::cookieerror::{CookieError, Result};
use crate::base::readystate::ReadyState;
use crate::client::{ClientBoundary, SyncRequest, SAVE_KEY, SYNC_KEY};
use crate::cookies::config::StoreConfig;
use crate::cookies::mapping::CookieMapping;
use crate::cookies::mutation::{MutationQueue, MutationSpec};
use crate::cookies::parser::parse_cookies;
use crate::cookies::session::SessionState;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use time::OffsetDateTime;

pub struct CookieStore<B: ClientBoundary> {
    boundary: B,
    session: SessionState,
    slot: String,
    config: StoreConfig,
    snapshot: Option<HashMap<String, String>>,
    default_expiry: OffsetDateTime,
}

impl<B: ClientBoundary> CookieStore<B> {
    /// Build the store for this cycle.
    ///
    /// Returns a NotReady store when the client has not reported yet; the
    /// caller should end the cycle and construct again on the next one.
    pub async fn connect(boundary: B, session: &SessionState, config: StoreConfig) -> Result<Self> {
        let slot = SessionState::slot_for_prefix(&config.prefix);
        let outgoing = session.queue(&slot).prefixed(&config.prefix);

        let raw = boundary
            .sync_cookies(&SyncRequest::new(SYNC_KEY, outgoing, false))
            .await?;

        let snapshot = match raw {
            Some(raw) => {
                let snapshot = parse_cookies(&raw)?;
                let confirmed = session.with_queue(&slot, |q| q.clean(&snapshot, &config.prefix));
                tracing::debug!(
                    cookies = snapshot.len(),
                    confirmed,
                    prefix = %config.prefix,
                    "client cookies received"
                );
                Some(snapshot)
            }
            None => {
                tracing::debug!(prefix = %config.prefix, "client has not reported cookies yet");
                None
            }
        };

        Ok(Self {
            boundary,
            session: session.clone(),
            slot,
            default_expiry: OffsetDateTime::now_utc() + config.expiry,
            config,
            snapshot,
        })
    }

    pub fn state(&self) -> ReadyState {
        if self.snapshot.is_some() {
            ReadyState::Ready
        } else {
            ReadyState::NotReady
        }
    }

    pub fn ready(&self) -> bool {
        self.state().is_ready()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn boundary(&self) -> &B {
        &self.boundary
    }

    /// Pending mutations, keyed by unprefixed name.
    pub fn pending(&self) -> MutationQueue {
        self.session.queue(&self.slot)
    }

    /// The logical view: the prefix-scoped client snapshot with every
    /// pending mutation applied.
    pub fn get_cookies(&self) -> Result<HashMap<String, String>> {
        let snapshot = self.snapshot.as_ref().ok_or(CookieError::NotReady)?;
        let prefix = self.config.prefix.as_str();

        let mut cookies: HashMap<String, String> = snapshot
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(prefix)
                    .map(|stripped| (stripped.to_string(), value.clone()))
            })
            .collect();

        for (name, spec) in self.pending().iter() {
            match spec.value() {
                Some(value) => {
                    cookies.insert(name.to_string(), value.to_string());
                }
                None => {
                    cookies.remove(name);
                }
            }
        }

        Ok(cookies)
    }

    pub fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get_cookies()?.remove(name))
    }

    /// Queue a write. No-op when the visible value already matches.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        if self.get(name)?.as_deref() == Some(value) {
            return Ok(());
        }
        let spec = MutationSpec::set(value, self.default_expiry, self.config.path.as_str());
        self.session.with_queue(&self.slot, |q| q.insert(name, spec));
        tracing::debug!(name = %name, "queued cookie write");
        Ok(())
    }

    /// Queue a delete. No-op when the name is not visible.
    pub fn delete(&self, name: &str) -> Result<()> {
        if !self.get_cookies()?.contains_key(name) {
            return Ok(());
        }
        let spec = MutationSpec::delete(self.config.path.as_str());
        self.session.with_queue(&self.slot, |q| q.insert(name, spec));
        tracing::debug!(name = %name, "queued cookie delete");
        Ok(())
    }

    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.get_cookies()?.into_keys().collect();
        names.sort();
        Ok(names)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.get_cookies()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Push pending mutations to the client now. No round-trip when nothing is pending.
    pub async fn save(&self) -> Result<()> {
        let queue = self.pending();
        if queue.is_empty() {
            return Ok(());
        }
        let count = queue.len();
        let outgoing = queue.prefixed(&self.config.prefix);
        self.boundary
            .sync_cookies(&SyncRequest::new(SAVE_KEY, outgoing, true))
            .await?;
        tracing::debug!(mutations = count, "flushed cookie queue");
        Ok(())
    }
}

impl<B: ClientBoundary> CookieMapping for CookieStore<B> {
    fn ready(&self) -> bool {
        CookieStore::ready(self)
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        CookieStore::get(self, name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        CookieStore::set(self, name, value)
    }

    fn delete(&self, name: &str) -> Result<()> {
        CookieStore::delete(self, name)
    }

    fn names(&self) -> Result<Vec<String>> {
        CookieStore::names(self)
    }

    fn len(&self) -> Result<usize> {
        CookieStore::len(self)
    }

    fn to_map(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.get_cookies()?.into_iter().collect())
    }

    async fn save(&self) -> Result<()> {
        CookieStore::save(self).await
    }
}

impl<B: ClientBoundary> fmt::Debug for CookieStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_cookies() {
            Ok(cookies) => {
                let sorted: BTreeMap<_, _> = cookies.into_iter().collect();
                write!(f, "<CookieStore: {:?}>", sorted)
            }
            Err(_) => f.write_str("<CookieStore: not ready>"),
        }
    }
}
