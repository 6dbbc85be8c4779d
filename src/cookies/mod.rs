//! Cookie stores for server-rendered apps.
//!
//! This module provides the server side of browser cookie access when every
//! user interaction re-runs the app from scratch:
//!
//! - **Parsing**: raw `document.cookie` strings ([`parser`])
//! - **Write-behind queue**: pending mutations kept across cycles ([`mutation`], [`session`])
//! - **Store**: the reconciled view with read-your-writes ([`CookieStore`](store::CookieStore))
//! - **Encryption**: Fernet-encrypted values with self-bootstrapped keys
//!   ([`EncryptedCookieStore`](encrypted::EncryptedCookieStore))
//!
//! # Architecture
//!
//! | Piece | Type | Responsibility |
//! |-------|------|----------------|
//! | Parser | [`parse_cookies`](parser::parse_cookies) | Raw string to name/value map |
//! | Queue | [`MutationQueue`](mutation::MutationQueue) | Pending set/delete specs |
//! | Session | [`SessionState`](session::SessionState) | Keeps queues alive between cycles |
//! | Store | [`CookieStore`](store::CookieStore) | Snapshot + queue, readiness, flush |
//! | Encrypted | [`EncryptedCookieStore`](encrypted::EncryptedCookieStore) | Transparent Fernet layer |
//!
//! # One evaluation cycle
//!
//! ```rust,no_run
//! use cookiesync::client::DocumentJar;
//! use cookiesync::cookies::config::StoreConfig;
//! use cookiesync::cookies::session::SessionState;
//! use cookiesync::cookies::store::CookieStore;
//!
//! # async fn cycle(jar: &DocumentJar, session: &SessionState) -> cookiesync::base::cookieerror::Result<()> {
//! let cookies = CookieStore::connect(jar, session, StoreConfig::default()).await?;
//! if !cookies.ready() {
//!     // End this cycle; the next one will have the client's cookies.
//!     return Ok(());
//! }
//!
//! cookies.set("theme", "dark")?;
//! assert_eq!(cookies.get("theme")?.as_deref(), Some("dark"));
//! cookies.save().await?; // optional: apply now instead of next cycle
//! # Ok(())
//! # }
//! ```

pub mod canonicalcookie;
pub mod config;
pub mod encrypted;
pub mod mapping;
pub mod mutation;
pub mod parser;
pub mod session;
pub mod store;
