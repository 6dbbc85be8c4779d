//! Key parameters persisted in a cookie.
//!
//! Wire format: `base64(salt) ":" decimal(iterations) ":" base64(magic)`, with
//! standard padded base64. `magic` is carried for compatibility with existing
//! cookies and is never checked.

use crate::base::cookieerror::{CookieError, Result};
use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ITERATIONS: u32 = 390_000;
pub const SALT_LEN: usize = 16;
pub const MAGIC_LEN: usize = 16;

#[derive(Clone, PartialEq, Eq)]
pub struct KeyParams {
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub magic: Vec<u8>,
}

impl KeyParams {
    /// Fresh random salt and magic.
    pub fn generate(iterations: u32) -> Result<Self> {
        let mut salt = vec![0u8; SALT_LEN];
        let mut magic = vec![0u8; MAGIC_LEN];
        boring::rand::rand_bytes(&mut salt)?;
        boring::rand::rand_bytes(&mut magic)?;
        Ok(Self {
            salt,
            iterations,
            magic,
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            general_purpose::STANDARD.encode(&self.salt),
            self.iterations,
            general_purpose::STANDARD.encode(&self.magic)
        )
    }

    /// Parse the cookie form. Any deviation is a
    /// [`CookieError::KeyParamsParseFailure`].
    pub fn parse(raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.split(':').collect();
        let [raw_salt, raw_iterations, raw_magic] = fields.as_slice() else {
            return Err(CookieError::key_params(format!(
                "expected 3 fields, found {}",
                fields.len()
            )));
        };

        let salt = general_purpose::STANDARD
            .decode(raw_salt)
            .map_err(|e| CookieError::key_params(format!("salt: {}", e)))?;
        let iterations: u32 = raw_iterations
            .trim()
            .parse()
            .map_err(|e| CookieError::key_params(format!("iterations: {}", e)))?;
        if iterations == 0 {
            return Err(CookieError::key_params("iterations must be positive"));
        }
        let magic = general_purpose::STANDARD
            .decode(raw_magic)
            .map_err(|e| CookieError::key_params(format!("magic: {}", e)))?;

        Ok(Self {
            salt,
            iterations,
            magic,
        })
    }
}

impl FromStr for KeyParams {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

// Salt and magic are not secret, but keep them out of logs anyway.
impl fmt::Debug for KeyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyParams")
            .field("salt_len", &self.salt.len())
            .field("iterations", &self.iterations)
            .field("magic_len", &self.magic.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::cookieerror::ErrorKind;

    #[test]
    fn test_generate_shape() {
        let params = KeyParams::generate(DEFAULT_ITERATIONS).unwrap();
        assert_eq!(params.salt.len(), SALT_LEN);
        assert_eq!(params.magic.len(), MAGIC_LEN);
        assert_eq!(params.iterations, 390_000);
    }

    #[test]
    fn test_generate_is_random() {
        let a = KeyParams::generate(1).unwrap();
        let b = KeyParams::generate(1).unwrap();
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn test_encode_known_values() {
        let params = KeyParams {
            salt: b"saltsaltsaltsalt".to_vec(),
            iterations: 390_000,
            magic: vec![0u8; 16],
        };
        assert_eq!(
            params.encode(),
            "c2FsdHNhbHRzYWx0c2FsdA==:390000:AAAAAAAAAAAAAAAAAAAAAA=="
        );
    }

    #[test]
    fn test_parse_encoded() {
        let params = KeyParams::generate(1234).unwrap();
        let parsed: KeyParams = params.encode().parse().unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in [
            "garbage",
            "a:b",
            "a:1:b:c",
            "!!!:1:AAAA",
            "AAAA:many:AAAA",
            "AAAA:-5:AAAA",
            "AAAA:0:AAAA",
            "AAAA:1:***",
        ] {
            let err = KeyParams::parse(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::KeyParamsParseFailure, "input {raw:?}");
        }
    }
}
