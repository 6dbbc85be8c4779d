//! Store configuration.

use crate::crypto::keyparams::DEFAULT_ITERATIONS;
use std::fmt;
use time::Duration;
use zeroize::Zeroizing;

/// Default cookie holding the encrypted store's key parameters.
pub const DEFAULT_KEY_PARAMS_COOKIE: &str = "EncryptedCookieManager.key_params";

/// Environment variable read by [`EncryptedStoreConfig::from_env`].
pub const PASSWORD_ENV: &str = "COOKIES_PASSWORD";

/// Settings for a plaintext [`CookieStore`](crate::cookies::store::CookieStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path attribute written with every mutation.
    pub path: String,
    /// Namespace prepended to every cookie name this store touches.
    pub prefix: String,
    /// Lifetime of written cookies, counted from store construction.
    pub expiry: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            prefix: String::new(),
            expiry: Duration::days(365),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_expiry_days(mut self, days: i64) -> Self {
        self.expiry = Duration::days(days);
        self
    }
}

/// Settings for an [`EncryptedCookieStore`](crate::cookies::encrypted::EncryptedCookieStore).
#[derive(Clone)]
pub struct EncryptedStoreConfig {
    password: Zeroizing<String>,
    /// Cookie (within the store prefix) holding the key parameters.
    pub key_params_cookie: String,
    /// Read undecryptable cookies as absent instead of failing.
    pub ignore_broken: bool,
    /// PBKDF2 iterations used when key parameters are first created.
    pub iterations: u32,
    pub store: StoreConfig,
}

impl EncryptedStoreConfig {
    pub fn new(password: &str) -> Self {
        Self {
            password: Zeroizing::new(password.to_string()),
            key_params_cookie: DEFAULT_KEY_PARAMS_COOKIE.to_string(),
            ignore_broken: true,
            iterations: DEFAULT_ITERATIONS,
            store: StoreConfig::default(),
        }
    }

    /// Read the password from `COOKIES_PASSWORD`.
    pub fn from_env() -> Option<Self> {
        let password = Zeroizing::new(std::env::var(PASSWORD_ENV).ok()?);
        Some(Self::new(&password))
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn with_key_params_cookie(mut self, name: &str) -> Self {
        self.key_params_cookie = name.to_string();
        self
    }

    pub fn with_ignore_broken(mut self, ignore: bool) -> Self {
        self.ignore_broken = ignore;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.store.prefix = prefix.to_string();
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.store.path = path.to_string();
        self
    }
}

impl fmt::Debug for EncryptedStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedStoreConfig")
            .field("password", &"<redacted>")
            .field("key_params_cookie", &self.key_params_cookie)
            .field("ignore_broken", &self.ignore_broken)
            .field("iterations", &self.iterations)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.path, "/");
        assert_eq!(config.prefix, "");
        assert_eq!(config.expiry, Duration::days(365));
    }

    #[test]
    fn test_store_builders() {
        let config = StoreConfig::new()
            .with_path("/app")
            .with_prefix("app.")
            .with_expiry_days(7);
        assert_eq!(config.path, "/app");
        assert_eq!(config.prefix, "app.");
        assert_eq!(config.expiry, Duration::days(7));
    }

    #[test]
    fn test_encrypted_defaults() {
        let config = EncryptedStoreConfig::new("pw");
        assert_eq!(config.password(), "pw");
        assert_eq!(config.key_params_cookie, DEFAULT_KEY_PARAMS_COOKIE);
        assert!(config.ignore_broken);
        assert_eq!(config.iterations, 390_000);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = EncryptedStoreConfig::new("hunter2").with_prefix("p.");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("p."));
    }
}
