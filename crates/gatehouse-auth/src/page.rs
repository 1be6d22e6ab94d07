//! Page context: the browser-global inputs the login flow depends on.
//!
//! Origin, transport security, and the query string are passed in explicitly
//! rather than read from ambient state, so redirect validation and the
//! destination-reading step stay independently testable.

use anyhow::{Context, Result};
use url::Url;

/// Query parameter carrying the intended post-login destination.
const NEXT_PARAM: &str = "next";

/// Where the login page is running.
#[derive(Debug, Clone)]
pub struct PageContext {
    origin: Url,
    query: String,
}

impl PageContext {
    /// Creates a context from the page origin (e.g. `https://app.example`)
    /// and the raw query string, without the leading `?`.
    pub fn new(origin: &str, query: impl Into<String>) -> Result<Self> {
        let origin =
            Url::parse(origin).with_context(|| format!("Invalid page origin: {origin}"))?;
        Ok(Self {
            origin,
            query: query.into(),
        })
    }

    /// The page origin in serialized form (`scheme://host[:port]`).
    pub fn origin(&self) -> String {
        self.origin.origin().ascii_serialization()
    }

    /// Whether the page was served over a secure transport.
    ///
    /// Only plain `http` counts as insecure, mirroring the cookie policy.
    pub fn is_secure(&self) -> bool {
        self.origin.scheme() != "http"
    }

    /// The `next` query parameter, URL-decoded, if present.
    pub fn intended_destination(&self) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(key, _)| key == NEXT_PARAM)
            .map(|(_, value)| value.into_owned())
    }
}
