//! Redirect target validation.
//!
//! Decides whether a caller-supplied destination is safe to navigate to
//! after granting a session, so the login flow cannot be weaponized as an
//! open redirect.

use url::Url;

/// Destination used when none was requested or the requested one is unsafe.
pub const FALLBACK_DESTINATION: &str = "/";

/// Returns true if `candidate` resolves to the same origin as
/// `current_origin` over http or https.
///
/// Relative candidates are resolved against `current_origin`, so plain paths
/// always stay within the current origin. Anything that fails to parse is
/// rejected: fail closed, never fail open.
pub fn is_safe_redirect(candidate: &str, current_origin: &str) -> bool {
    let Ok(base) = Url::parse(current_origin) else {
        return false;
    };
    let Ok(target) = base.join(candidate) else {
        return false;
    };

    matches!(target.scheme(), "http" | "https") && target.origin() == base.origin()
}

/// Resolves the requested destination to one that is safe to navigate to.
///
/// An absent or unsafe candidate falls back to [`FALLBACK_DESTINATION`].
pub fn resolve_destination(candidate: Option<&str>, current_origin: &str) -> String {
    let candidate = candidate.unwrap_or(FALLBACK_DESTINATION);
    if is_safe_redirect(candidate, current_origin) {
        candidate.to_string()
    } else {
        tracing::debug!(candidate, "unsafe redirect target, using fallback");
        FALLBACK_DESTINATION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://app.example";

    /// Test: relative candidates always resolve within the current origin.
    #[test]
    fn test_relative_candidates_are_safe() {
        assert!(is_safe_redirect("", ORIGIN));
        assert!(is_safe_redirect("/", ORIGIN));
        assert!(is_safe_redirect("/admin", ORIGIN));
        assert!(is_safe_redirect("dags", ORIGIN));
        assert!(is_safe_redirect("/dags/run?search=x#top", ORIGIN));
    }

    /// Test: absolute same-origin candidates are safe.
    #[test]
    fn test_same_origin_absolute_is_safe() {
        assert!(is_safe_redirect("https://app.example", ORIGIN));
        assert!(is_safe_redirect("https://app.example/admin", ORIGIN));
    }

    /// Test: any other origin is rejected, including protocol-relative
    /// tricks and hosts that merely contain the legit host as a substring.
    #[test]
    fn test_cross_origin_is_rejected() {
        assert!(!is_safe_redirect("https://evil.example/x", ORIGIN));
        assert!(!is_safe_redirect("//evil.example/x", ORIGIN));
        assert!(!is_safe_redirect("https://app.example.evil.com", ORIGIN));
        assert!(!is_safe_redirect("http://app.example/x", ORIGIN));
        assert!(!is_safe_redirect("https://app.example:8443/x", ORIGIN));
    }

    /// Test: non-http(s) schemes are rejected even when an origin-like
    /// component appears in the string.
    #[test]
    fn test_non_http_schemes_are_rejected() {
        assert!(!is_safe_redirect("javascript:alert(1)", ORIGIN));
        assert!(!is_safe_redirect("data:text/html,<script></script>", ORIGIN));
        assert!(!is_safe_redirect("file:///etc/passwd", ORIGIN));
        assert!(!is_safe_redirect("ftp://app.example/x", ORIGIN));
    }

    /// Test: malformed input never throws, it just fails the check.
    #[test]
    fn test_malformed_input_fails_closed() {
        assert!(!is_safe_redirect("http://", ORIGIN));
        assert!(!is_safe_redirect("/admin", "not a url"));
        assert!(!is_safe_redirect("https://exa mple.com", ORIGIN));
    }

    /// Test: fallback composition.
    #[test]
    fn test_resolve_destination_fallback() {
        assert_eq!(resolve_destination(Some("/dashboard"), ORIGIN), "/dashboard");
        assert_eq!(resolve_destination(None, ORIGIN), "/");
        assert_eq!(
            resolve_destination(Some("https://evil.example/phish"), ORIGIN),
            "/"
        );
        assert_eq!(resolve_destination(Some("javascript:alert(1)"), ORIGIN), "/");
    }
}
