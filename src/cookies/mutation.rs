//! Pending cookie mutations (the write-behind queue).
//!
//! A [`MutationQueue`] outlives any single store: it lives in the session and
//! is resent to the client on every construction until the client snapshot
//! confirms each entry, at which point [`MutationQueue::clean`] drops it.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use time::OffsetDateTime;

/// One pending write or delete for a single cookie name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationSpec {
    Set {
        value: String,
        expires_at: OffsetDateTime,
        path: String,
    },
    Delete {
        path: String,
    },
}

impl MutationSpec {
    pub fn set(value: impl Into<String>, expires_at: OffsetDateTime, path: impl Into<String>) -> Self {
        MutationSpec::Set {
            value: value.into(),
            expires_at,
            path: path.into(),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        MutationSpec::Delete { path: path.into() }
    }

    /// Target value, `None` for deletes.
    pub fn value(&self) -> Option<&str> {
        match self {
            MutationSpec::Set { value, .. } => Some(value),
            MutationSpec::Delete { .. } => None,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            MutationSpec::Set { path, .. } | MutationSpec::Delete { path } => path,
        }
    }

    /// Whether the client already holds the state this spec asks for.
    pub fn is_applied(&self, observed: Option<&str>) -> bool {
        self.value() == observed
    }
}

/// Wire shape: `{"value", "expires_at", "path"}` or `{"value": null, "path"}`.
impl Serialize for MutationSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MutationSpec::Set {
                value,
                expires_at,
                path,
            } => {
                let mut s = serializer.serialize_struct("MutationSpec", 3)?;
                s.serialize_field("value", value)?;
                s.serialize_field("expires_at", &Rfc3339(expires_at))?;
                s.serialize_field("path", path)?;
                s.end()
            }
            MutationSpec::Delete { path } => {
                let mut s = serializer.serialize_struct("MutationSpec", 2)?;
                s.serialize_field("value", &Option::<&str>::None)?;
                s.serialize_field("path", path)?;
                s.end()
            }
        }
    }
}

struct Rfc3339<'a>(&'a OffsetDateTime);

impl Serialize for Rfc3339<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(self.0, serializer)
    }
}

/// Insertion-ordered map from unprefixed cookie name to its pending mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationQueue {
    entries: Vec<(String, MutationSpec)>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a mutation. Re-queuing a name replaces its spec in place.
    pub fn insert(&mut self, name: impl Into<String>, spec: MutationSpec) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = spec,
            None => self.entries.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MutationSpec> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<MutationSpec> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MutationSpec)> + '_ {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Drop every entry the client snapshot already reflects.
    ///
    /// `snapshot` is keyed by the full (prefixed) cookie name. Returns the
    /// number of entries removed.
    pub fn clean(&mut self, snapshot: &HashMap<String, String>, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(name, spec)| {
            let observed = snapshot.get(&format!("{}{}", prefix, name));
            !spec.is_applied(observed.map(String::as_str))
        });
        before - self.entries.len()
    }

    /// Copy of the queue with `prefix` attached to every name, as sent to the client.
    pub fn prefixed(&self, prefix: &str) -> MutationQueue {
        MutationQueue {
            entries: self
                .entries
                .iter()
                .map(|(n, s)| (format!("{}{}", prefix, n), s.clone()))
                .collect(),
        }
    }
}

/// Serialized as a JSON object in insertion order.
impl Serialize for MutationQueue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, spec) in &self.entries {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}
