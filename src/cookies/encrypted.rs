//! Transparently encrypted cookie store.
//!
//! [`EncryptedCookieStore`] wraps a [`CookieStore`] and stores every value as
//! a Fernet token. The key is derived from the caller's password and key
//! parameters kept in a dedicated cookie of the same store:
//!
//! 1. On the first encrypt or decrypt, read the key-params cookie.
//! 2. If it is missing or unparseable, generate fresh parameters and queue
//!    them like any other write.
//! 3. Derive the key through the [`KeyDerivationCache`], so later cycles with
//!    the same parameters and password skip PBKDF2 entirely.
//!
//! Regenerating parameters orphans every value encrypted under the old ones.
//! That only happens when the key-params cookie is lost or corrupted, and it
//! is logged at warn level.

use crate::base::cookieerror::{CookieError, Result};
use crate::client::ClientBoundary;
use crate::cookies::config::EncryptedStoreConfig;
use crate::cookies::mapping::CookieMapping;
use crate::cookies::session::SessionState;
use crate::cookies::store::CookieStore;
use crate::crypto::fernet::Fernet;
use crate::crypto::kdf::KeyDerivationCache;
use crate::crypto::keyparams::KeyParams;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

pub struct EncryptedCookieStore<B: ClientBoundary> {
    inner: CookieStore<B>,
    config: EncryptedStoreConfig,
    cache: KeyDerivationCache,
    fernet: OnceLock<Fernet>,
}

impl<B: ClientBoundary> EncryptedCookieStore<B> {
    /// Build the underlying store for this cycle and wrap it.
    pub async fn connect(
        boundary: B,
        session: &SessionState,
        config: EncryptedStoreConfig,
    ) -> Result<Self> {
        let inner = CookieStore::connect(boundary, session, config.store.clone()).await?;
        Ok(Self::wrap(inner, config))
    }

    /// Wrap an existing store, deriving keys through the process-wide cache.
    pub fn wrap(inner: CookieStore<B>, config: EncryptedStoreConfig) -> Self {
        Self {
            inner,
            config,
            cache: KeyDerivationCache::global(),
            fernet: OnceLock::new(),
        }
    }

    /// Use a private derivation cache instead of the process-wide one.
    pub fn with_cache(mut self, cache: KeyDerivationCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn inner(&self) -> &CookieStore<B> {
        &self.inner
    }

    pub fn ready(&self) -> bool {
        self.inner.ready()
    }

    pub async fn save(&self) -> Result<()> {
        self.inner.save().await
    }

    /// Decrypted value of `name`.
    ///
    /// A value that fails authentication (or is not UTF-8) reads as `None`
    /// when `ignore_broken` is set, and as
    /// [`CookieError::DecryptionFailed`] otherwise.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        let Some(token) = self.inner.get(name)? else {
            return Ok(None);
        };

        let fernet = self.fernet()?;
        let decrypted = fernet
            .decrypt(&token)
            .map_err(|e| e.to_string())
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));

        match decrypted {
            Ok(value) => Ok(Some(value)),
            Err(reason) if self.config.ignore_broken => {
                tracing::warn!(name = %name, reason = %reason, "ignoring undecryptable cookie");
                Ok(None)
            }
            Err(reason) => Err(CookieError::decryption_failed(name, reason)),
        }
    }

    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let token = self.fernet()?.encrypt(value.as_bytes())?;
        self.inner.set(name, &token)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.inner.delete(name)
    }

    pub fn names(&self) -> Result<Vec<String>> {
        self.inner.names()
    }

    pub fn len(&self) -> Result<usize> {
        self.inner.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.inner.is_empty()
    }

    /// Current key parameters, bootstrapping them if needed.
    pub fn key_params(&self) -> Result<KeyParams> {
        match self.read_key_params()? {
            Some(params) => Ok(params),
            None => self.initialize_key_params(),
        }
    }

    fn fernet(&self) -> Result<&Fernet> {
        if let Some(fernet) = self.fernet.get() {
            return Ok(fernet);
        }

        let params = self.key_params()?;
        let key = self
            .cache
            .derive(&params.salt, params.iterations, self.config.password())?;
        Ok(self.fernet.get_or_init(|| Fernet::new(&key)))
    }

    fn read_key_params(&self) -> Result<Option<KeyParams>> {
        let cookie = self.config.key_params_cookie.as_str();
        let raw = match self.inner.get(cookie)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };

        match KeyParams::parse(&raw) {
            Ok(params) => Ok(Some(params)),
            Err(e) => {
                tracing::warn!(
                    cookie = %cookie,
                    error = %e,
                    "key parameters unreadable; regenerating, existing encrypted cookies will not decrypt"
                );
                Ok(None)
            }
        }
    }

    fn initialize_key_params(&self) -> Result<KeyParams> {
        let params = KeyParams::generate(self.config.iterations)?;
        self.inner
            .set(&self.config.key_params_cookie, &params.encode())?;
        tracing::info!(
            cookie = %self.config.key_params_cookie,
            iterations = params.iterations,
            "created cookie key parameters"
        );
        Ok(params)
    }
}

impl<B: ClientBoundary> CookieMapping for EncryptedCookieStore<B> {
    fn ready(&self) -> bool {
        EncryptedCookieStore::ready(self)
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        EncryptedCookieStore::get(self, name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        EncryptedCookieStore::set(self, name, value)
    }

    fn delete(&self, name: &str) -> Result<()> {
        EncryptedCookieStore::delete(self, name)
    }

    fn names(&self) -> Result<Vec<String>> {
        EncryptedCookieStore::names(self)
    }

    fn len(&self) -> Result<usize> {
        EncryptedCookieStore::len(self)
    }

    /// Decrypted pairs, without the key-params cookie itself. `names` and
    /// `len` delegate to the plain store and still count it.
    fn to_map(&self) -> Result<BTreeMap<String, String>> {
        let mut map = BTreeMap::new();
        for name in self.names()? {
            if name == self.config.key_params_cookie {
                continue;
            }
            if let Some(value) = EncryptedCookieStore::get(self, &name)? {
                map.insert(name, value);
            }
        }
        Ok(map)
    }

    async fn save(&self) -> Result<()> {
        EncryptedCookieStore::save(self).await
    }
}

// Names only: rendering values would decrypt (and possibly bootstrap keys).
impl<B: ClientBoundary> fmt::Debug for EncryptedCookieStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.names() {
            Ok(names) => write!(f, "<EncryptedCookieStore: {:?}>", names),
            Err(_) => f.write_str("<EncryptedCookieStore: not ready>"),
        }
    }
}
