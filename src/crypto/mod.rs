//! Key derivation and authenticated encryption for cookie values.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`kdf`] | PBKDF2-HMAC-SHA256 with a process-wide memo |
//! | [`keyparams`] | Salt/iterations/magic persisted in a cookie |
//! | [`fernet`] | Fernet tokens (AES-128-CBC + HMAC-SHA256) |

pub mod fernet;
pub mod kdf;
pub mod keyparams;
