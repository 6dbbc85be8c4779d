//! Password-based key derivation with a process-wide memo.
//!
//! Stores are rebuilt on every evaluation cycle, and PBKDF2 at several hundred
//! thousand iterations is far too slow to repeat each time. Derived keys are
//! therefore cached by `(salt, iterations, password)` for the life of the
//! process. Entries are never evicted; a session typically has exactly one.

use crate::base::cookieerror::Result;
use boring::hash::MessageDigest;
use boring::pkcs5::pbkdf2_hmac;
use dashmap::DashMap;
use std::sync::{Arc, LazyLock};

/// Length of a derived key in bytes.
pub const KEY_LEN: usize = 32;

pub type DerivedKey = [u8; KEY_LEN];

/// Derive a 32-byte key with PBKDF2-HMAC-SHA256.
pub fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac(
        password,
        salt,
        iterations as usize,
        MessageDigest::sha256(),
        &mut key,
    )?;
    Ok(key)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    salt: Vec<u8>,
    iterations: u32,
    password: String,
}

/// Memoizing front of [`derive_key`].
#[derive(Clone, Default)]
pub struct KeyDerivationCache {
    entries: Arc<DashMap<CacheKey, DerivedKey>>,
}

static GLOBAL_CACHE: LazyLock<KeyDerivationCache> = LazyLock::new(KeyDerivationCache::new);

impl KeyDerivationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the process-wide cache.
    pub fn global() -> Self {
        GLOBAL_CACHE.clone()
    }

    pub fn derive(&self, salt: &[u8], iterations: u32, password: &str) -> Result<DerivedKey> {
        let key = CacheKey {
            salt: salt.to_vec(),
            iterations,
            password: password.to_string(),
        };

        if let Some(hit) = self.entries.get(&key) {
            return Ok(*hit.value());
        }

        tracing::debug!(iterations, "deriving cookie encryption key");
        let derived = derive_key(password.as_bytes(), salt, iterations)?;
        self.entries.insert(key, derived);
        Ok(derived)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for KeyDerivationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDerivationCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_known_vector() {
        // PBKDF2-HMAC-SHA256("password", "salt", 1, 32)
        let key = derive_key(b"password", b"salt", 1).unwrap();
        let expected: [u8; 32] = [
            0x12, 0x0f, 0xb6, 0xcf, 0xfc, 0xf8, 0xb3, 0x2c, 0x43, 0xe7, 0x22, 0x52, 0x56, 0xc4,
            0xf8, 0x37, 0xa8, 0x65, 0x48, 0xc9, 0x2c, 0xcc, 0x35, 0x48, 0x08, 0x05, 0x98, 0x7c,
            0xb7, 0x0b, 0xe1, 0x7b,
        ];
        assert_eq!(key, expected);
    }

    #[test]
    fn test_derive_key_depends_on_every_input() {
        let base = derive_key(b"pw", b"salt", 10).unwrap();
        assert_ne!(base, derive_key(b"pw2", b"salt", 10).unwrap());
        assert_ne!(base, derive_key(b"pw", b"salt2", 10).unwrap());
        assert_ne!(base, derive_key(b"pw", b"salt", 11).unwrap());
    }

    #[test]
    fn test_cache_is_deterministic_and_memoized() {
        let cache = KeyDerivationCache::new();
        let first = cache.derive(b"salt", 100, "secret").unwrap();
        let second = cache.derive(b"salt", 100, "secret").unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.derive(b"salt", 100, "other").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_global_cache_is_shared() {
        let a = KeyDerivationCache::global();
        let b = KeyDerivationCache::global();
        a.derive(b"global-test-salt", 7, "pw").unwrap();
        assert!(!b.is_empty());
    }
}
