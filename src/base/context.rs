//! Ergonomic error context helpers.
//!
//! Converts transport or marshaling failures from a client boundary into
//! context-rich [`CookieError::Boundary`] values.

use crate::base::cookieerror::CookieError;
use std::fmt::Display;

/// Extension trait for adding boundary context to foreign `Result`s.
pub trait BoundaryResultExt<T> {
    /// Tag an error with the component key of the round-trip that produced it.
    ///
    /// # Example
    /// ```ignore
    /// use cookiesync::base::context::BoundaryResultExt;
    ///
    /// let args = serde_json::to_value(&request)
    ///     .boundary_context("CookieManager.sync_cookies")?;
    /// // Error: "Client boundary failed: CookieManager.sync_cookies: ..."
    /// ```
    fn boundary_context(self, key: &str) -> Result<T, CookieError>;
}

impl<T, E: Display> BoundaryResultExt<T> for Result<T, E> {
    fn boundary_context(self, key: &str) -> Result<T, CookieError> {
        self.map_err(|e| CookieError::boundary(format!("{}: {}", key, e)))
    }
}
