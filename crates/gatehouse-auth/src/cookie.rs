//! Session cookie policy.

use serde::{Deserialize, Serialize};

use crate::page::PageContext;
use crate::token::AuthToken;

/// Name of the session cookie the console reads.
pub const TOKEN_COOKIE_NAME: &str = "_token";

/// The session cookie written after a successful exchange.
///
/// `secure` mirrors the page's own transport: a cookie forced secure on a
/// plain-http page would be silently dropped by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub secure: bool,
}

impl TokenCookie {
    /// Builds the session cookie for a token issued on the given page.
    pub fn session(token: &AuthToken, page: &PageContext) -> Self {
        Self {
            name: TOKEN_COOKIE_NAME.to_string(),
            value: token.as_str().to_string(),
            path: "/".to_string(),
            secure: page.is_secure(),
        }
    }

    /// Renders the cookie as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut header = format!("{}={}; Path={}", self.name, self.value, self.path);
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}
