//! Base types and error handling.
//!
//! Provides foundational types shared by every store:
//! - [`CookieError`](cookieerror::CookieError): crate error with stable [`ErrorKind`](cookieerror::ErrorKind) codes
//! - [`ReadyState`](readystate::ReadyState): the NotReady/Ready state machine

pub mod context;
pub mod cookieerror;
pub mod readystate;
