//! # cookiesync
//!
//! Browser cookie access for server-rendered, otherwise stateless apps.
//!
//! Apps built on a "re-run the whole script on every interaction" model have
//! no direct line to the browser's cookie jar. `cookiesync` gives them one
//! through a client component that reports `document.cookie` and applies
//! queued changes, and layers a mapping-like store on top of it.
//!
//! ## Features
//!
//! - **Write-behind queue**: writes are visible immediately and survive
//!   across cycles until the client confirms them
//! - **Explicit readiness**: a store is `NotReady` until the client reports
//! - **Prefixes**: independent stores can share one cookie jar
//! - **Encryption**: Fernet tokens keyed by PBKDF2 over a password and key
//!   parameters kept in a cookie, cached so cycles stay cheap
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cookiesync::client::DocumentJar;
//! use cookiesync::cookies::config::EncryptedStoreConfig;
//! use cookiesync::cookies::encrypted::EncryptedCookieStore;
//! use cookiesync::cookies::session::SessionState;
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = SessionState::new();
//!     let jar = DocumentJar::new();
//!     let config = EncryptedStoreConfig::new("My secret password");
//!
//!     let cookies = EncryptedCookieStore::connect(&jar, &session, config)
//!         .await
//!         .unwrap();
//!     if cookies.ready() {
//!         cookies.set("a-cookie", "value").unwrap();
//!         cookies.save().await.unwrap();
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and the readiness state
//! - [`client`] - The client round-trip boundary and an in-memory client
//! - [`cookies`] - Parser, mutation queue, session state and the stores
//! - [`crypto`] - Key derivation, key parameters and Fernet tokens

pub mod base;
pub mod client;
pub mod cookies;
pub mod crypto;
