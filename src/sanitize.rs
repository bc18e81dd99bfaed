//! Redaction of internal details from client-visible error text.
//!
//! Production responses must not leak upstream URLs, addresses, or anything
//! that looks like a credential; the correlation id stays intact so operators
//! can still find the full detail in the logs.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s\x22']+").expect("valid url pattern"));

static IP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}(?::\d{1,5})?\b").expect("valid ip pattern"));

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(token|key|secret|password|authorization|cookie)\b\s*[=:]\s*[^\s,;\x22']+"#)
        .expect("valid token pattern")
});

/// Scrub URLs, IP addresses and key-like tokens from an error detail string.
pub fn sanitize_error_details(details: &str) -> String {
    let scrubbed = URL_PATTERN.replace_all(details, "[redacted-url]");
    let scrubbed = IP_PATTERN.replace_all(&scrubbed, "[redacted-address]");
    TOKEN_PATTERN
        .replace_all(&scrubbed, "$1=[redacted]")
        .into_owned()
}
