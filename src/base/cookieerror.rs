use thiserror::Error;

/// Coarse classification of a [`CookieError`].
///
/// Codes are stable so hosts can forward them across an FFI or JS boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotReady,
    MalformedCookieSegment,
    KeyParamsParseFailure,
    DecryptionFailed,
    Boundary,
    Crypto,
    Unknown(i32),
}

impl ErrorKind {
    pub fn as_i32(&self) -> i32 {
        match self {
            ErrorKind::NotReady => -100,
            ErrorKind::MalformedCookieSegment => -200,
            ErrorKind::KeyParamsParseFailure => -300,
            ErrorKind::DecryptionFailed => -301,
            ErrorKind::Crypto => -302,
            ErrorKind::Boundary => -400,
            ErrorKind::Unknown(code) => *code,
        }
    }
}

impl From<i32> for ErrorKind {
    fn from(code: i32) -> Self {
        match code {
            -100 => ErrorKind::NotReady,
            -200 => ErrorKind::MalformedCookieSegment,
            -300 => ErrorKind::KeyParamsParseFailure,
            -301 => ErrorKind::DecryptionFailed,
            -302 => ErrorKind::Crypto,
            -400 => ErrorKind::Boundary,
            _ => ErrorKind::Unknown(code),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CookieError {
    /// The client has not reported its cookies yet.
    #[error("Cookies are not ready: the client has not reported back yet")]
    NotReady,

    #[error("Malformed cookie segment {segment:?}: {reason}")]
    MalformedCookieSegment { segment: String, reason: String },

    /// Only ever logged; the encrypted store regenerates parameters instead.
    #[error("Failed to parse key parameters: {reason}")]
    KeyParamsParseFailure { reason: String },

    #[error("Decryption failed for cookie {name:?}: {reason}")]
    DecryptionFailed { name: String, reason: String },

    #[error("Client boundary failed: {message}")]
    Boundary { message: String },

    #[error("Crypto library error: {message}")]
    Crypto { message: String },
}

impl CookieError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CookieError::NotReady => ErrorKind::NotReady,
            CookieError::MalformedCookieSegment { .. } => ErrorKind::MalformedCookieSegment,
            CookieError::KeyParamsParseFailure { .. } => ErrorKind::KeyParamsParseFailure,
            CookieError::DecryptionFailed { .. } => ErrorKind::DecryptionFailed,
            CookieError::Boundary { .. } => ErrorKind::Boundary,
            CookieError::Crypto { .. } => ErrorKind::Crypto,
        }
    }

    pub fn malformed_segment(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        CookieError::MalformedCookieSegment {
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    pub fn key_params(reason: impl Into<String>) -> Self {
        CookieError::KeyParamsParseFailure {
            reason: reason.into(),
        }
    }

    pub fn decryption_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CookieError::DecryptionFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn boundary(message: impl Into<String>) -> Self {
        CookieError::Boundary {
            message: message.into(),
        }
    }

    /// True for errors the caller recovers from by yielding the current cycle.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, CookieError::NotReady)
    }
}

impl From<boring::error::ErrorStack> for CookieError {
    fn from(err: boring::error::ErrorStack) -> Self {
        CookieError::Crypto {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CookieError>;
