//! API key authentication
//!
//! # Architecture
//!
//! - The gateway may be configured with a single shared API key
//! - Job requests carry the key in their `api_key` body field
//! - No configured key disables auth checking entirely
//!
//! Keys are compared through their SHA-256 digests so the comparison always
//! touches the same number of bytes regardless of the candidate's length.

use sha2::{Digest, Sha256};

// ========================================
// Error Types
// ========================================

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuthError {
    /// A key is configured but the request carried none
    MissingKey,

    /// The request's key does not match the configured one
    InvalidKey,
}

impl std::fmt::Display for ApiAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiAuthError::MissingKey => write!(f, "Missing api_key field"),
            ApiAuthError::InvalidKey => write!(f, "Invalid api_key"),
        }
    }
}

impl std::error::Error for ApiAuthError {}

// ========================================
// Shared Key
// ========================================

/// Configured API key, held only as a digest
#[derive(Clone)]
pub struct ApiKey {
    digest: [u8; 32],
}

impl ApiKey {
    /// Create a key from its plaintext value
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Create a key from an optional raw value
    ///
    /// Empty values are treated as "no key configured".
    ///
    /// # Examples
    ///
    /// ```
    /// use demucs_common::api::ApiKey;
    ///
    /// assert!(ApiKey::from_optional(None).is_none());
    /// assert!(ApiKey::from_optional(Some("")).is_none());
    /// assert!(ApiKey::from_optional(Some("s3cret")).is_some());
    /// ```
    pub fn from_optional(secret: Option<&str>) -> Option<Self> {
        secret.filter(|s| !s.is_empty()).map(Self::new)
    }

    /// Check a candidate key against this one
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Authorize a request against the configured key
///
/// `expected = None` disables auth checking: every request passes.
///
/// # Examples
///
/// ```
/// use demucs_common::api::{authorize, ApiAuthError, ApiKey};
///
/// let key = ApiKey::new("s3cret");
/// assert!(authorize(None, None).is_ok());
/// assert!(authorize(Some(&key), Some("s3cret")).is_ok());
/// assert_eq!(authorize(Some(&key), Some("nope")), Err(ApiAuthError::InvalidKey));
/// assert_eq!(authorize(Some(&key), None), Err(ApiAuthError::MissingKey));
/// ```
pub fn authorize(expected: Option<&ApiKey>, provided: Option<&str>) -> Result<(), ApiAuthError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    match provided {
        None => Err(ApiAuthError::MissingKey),
        Some(candidate) if expected.matches(candidate) => Ok(()),
        Some(_) => Err(ApiAuthError::InvalidKey),
    }
}
