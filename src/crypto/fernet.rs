//! Fernet authenticated-encryption tokens.
//!
//! Token layout before URL-safe base64:
//!
//! | Field | Size |
//! |-------|------|
//! | version `0x80` | 1 |
//! | timestamp (seconds, big-endian) | 8 |
//! | IV | 16 |
//! | AES-128-CBC ciphertext (PKCS7) | 16·n |
//! | HMAC-SHA256 over everything above | 32 |
//!
//! The 32-byte key splits into a signing half and an encryption half, so
//! tokens interoperate with other Fernet implementations given the same key.

use crate::base::cookieerror::{CookieError, Result};
use crate::crypto::kdf::{DerivedKey, KEY_LEN};
use base64::{engine::general_purpose, Engine as _};
use boring::symm::{decrypt, encrypt, Cipher};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use time::OffsetDateTime;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

const VERSION: u8 = 0x80;
const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const MAC_LEN: usize = 32;
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;

/// Why a token was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidToken {
    #[error("token is not valid base64")]
    Encoding,
    #[error("token is too short or has an unknown version")]
    Format,
    #[error("token signature does not match")]
    Signature,
    #[error("token payload could not be decrypted")]
    Payload,
}

pub struct Fernet {
    signing_key: Zeroizing<[u8; 16]>,
    encryption_key: Zeroizing<[u8; 16]>,
}

impl Fernet {
    pub fn new(key: &DerivedKey) -> Self {
        let mut signing_key = Zeroizing::new([0u8; 16]);
        let mut encryption_key = Zeroizing::new([0u8; 16]);
        signing_key.copy_from_slice(&key[..16]);
        encryption_key.copy_from_slice(&key[16..]);
        Self {
            signing_key,
            encryption_key,
        }
    }

    /// Build from a URL-safe base64 key string, the usual way Fernet keys are shared.
    pub fn from_base64_key(key: &str) -> Result<Self> {
        let raw = Zeroizing::new(
            general_purpose::URL_SAFE
                .decode(key)
                .map_err(|e| CookieError::Crypto {
                    message: format!("fernet key: {}", e),
                })?,
        );
        let key: &DerivedKey = raw.as_slice().try_into().map_err(|_| CookieError::Crypto {
            message: format!("fernet key must be {} bytes, got {}", KEY_LEN, raw.len()),
        })?;
        Ok(Self::new(key))
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let mut iv = [0u8; IV_LEN];
        boring::rand::rand_bytes(&mut iv)?;
        let now = OffsetDateTime::now_utc().unix_timestamp().max(0) as u64;
        self.encrypt_with(plaintext, now, &iv)
    }

    /// Encrypt with an explicit timestamp and IV.
    pub fn encrypt_with(&self, plaintext: &[u8], timestamp: u64, iv: &[u8; IV_LEN]) -> Result<String> {
        let ciphertext = encrypt(
            Cipher::aes_128_cbc(),
            self.encryption_key.as_slice(),
            Some(iv.as_slice()),
            plaintext,
        )?;

        let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
        token.push(VERSION);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(iv);
        token.extend_from_slice(&ciphertext);

        let mut mac = self.mac().map_err(|_| CookieError::Crypto {
            message: "HMAC key rejected".to_string(),
        })?;
        mac.update(&token);
        token.extend_from_slice(&mac.finalize().into_bytes());

        Ok(general_purpose::URL_SAFE.encode(token))
    }

    pub fn decrypt(&self, token: &str) -> std::result::Result<Vec<u8>, InvalidToken> {
        let data = general_purpose::URL_SAFE
            .decode(token)
            .map_err(|_| InvalidToken::Encoding)?;

        if data.len() < HEADER_LEN + BLOCK_LEN + MAC_LEN || data[0] != VERSION {
            return Err(InvalidToken::Format);
        }

        let (signed, tag) = data.split_at(data.len() - MAC_LEN);
        let mut mac = self.mac().map_err(|_| InvalidToken::Signature)?;
        mac.update(signed);
        mac.verify_slice(tag).map_err(|_| InvalidToken::Signature)?;

        let iv = &signed[1 + TIMESTAMP_LEN..HEADER_LEN];
        let ciphertext = &signed[HEADER_LEN..];
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(InvalidToken::Payload);
        }

        decrypt(
            Cipher::aes_128_cbc(),
            self.encryption_key.as_slice(),
            Some(iv),
            ciphertext,
        )
        .map_err(|_| InvalidToken::Payload)
    }

    /// Issue time recorded in a token, without verifying it.
    pub fn timestamp(token: &str) -> std::result::Result<u64, InvalidToken> {
        let data = general_purpose::URL_SAFE
            .decode(token)
            .map_err(|_| InvalidToken::Encoding)?;
        if data.len() < 1 + TIMESTAMP_LEN || data[0] != VERSION {
            return Err(InvalidToken::Format);
        }
        let mut raw = [0u8; TIMESTAMP_LEN];
        raw.copy_from_slice(&data[1..1 + TIMESTAMP_LEN]);
        Ok(u64::from_be_bytes(raw))
    }

    fn mac(&self) -> std::result::Result<HmacSha256, hmac::digest::InvalidLength> {
        <HmacSha256 as Mac>::new_from_slice(self.signing_key.as_slice())
    }
}

impl std::fmt::Debug for Fernet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Fernet { .. }")
    }
}
