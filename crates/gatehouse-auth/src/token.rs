//! The bearer token issued by the authentication service.
//!
//! Tokens are opaque to this crate and are never logged or displayed in full.

use std::fmt;

/// Opaque bearer token string.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token value, for handing to the session store.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a masked version for display.
    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({})", self.masked())
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}
