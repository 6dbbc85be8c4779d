use time::OffsetDateTime;

/// A cookie as held by the client-side jar.
///
/// Unlike the name/value pairs the stores work with, jar entries carry the
/// path and expiry the client applies. Identity is `(name, path)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
}

impl CanonicalCookie {
    pub fn new(
        name: String,
        value: String,
        path: String,
        creation_time: OffsetDateTime,
        expiration_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name,
            value,
            path,
            creation_time,
            expiration_time,
        }
    }

    /// Session cookie (no expiry) with the root path.
    pub fn session(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            name.into(),
            value.into(),
            "/".to_string(),
            OffsetDateTime::now_utc(),
            None,
        )
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        if let Some(expiry) = self.expiration_time {
            expiry <= current_time
        } else {
            false
        }
    }

    pub fn same_identity(&self, name: &str, path: &str) -> bool {
        self.name == name && self.path == path
    }
}
