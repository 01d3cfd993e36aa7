//! PII redaction for log output.
//!
//! Raw database errors can echo row values (emails, password hashes, bearer
//! tokens). Everything that reaches a log line from such a source goes through
//! [`Redacted`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::unwrap_used)]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap());

// PHC strings as produced by argon2, e.g. `$argon2id$v=19$m=19456,t=2,p=1$salt$hash`
#[allow(clippy::unwrap_used)]
static PHC_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$argon2[a-z]*\$[^\s'\x22]+").unwrap());

// JWTs and other opaque base64-ish runs of 16+ chars
#[allow(clippy::unwrap_used)]
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z0-9+/_.-]{16,}={0,2}").unwrap());

/// Mask emails (keep first char and domain), password hashes and tokens.
///
/// Order matters: emails first so their domains are not eaten by the token rule.
pub fn redact(input: &str) -> String {
    let emails = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.find('@') {
            Some(0) | None => full.to_string(),
            Some(at) => {
                let first = full[..at].chars().next().map(String::from).unwrap_or_default();
                format!("{first}***{}", &full[at..])
            }
        }
    });

    let hashes = PHC_HASH.replace_all(&emails, "[REDACTED_HASH]");

    // Identifiers such as `players.nickname` have no digits and stay readable.
    TOKEN
        .replace_all(&hashes, |caps: &regex::Captures| {
            let m = &caps[0];
            let has_digit = m.chars().any(|c| c.is_ascii_digit());
            let has_alpha = m.chars().any(|c| c.is_ascii_alphabetic());
            if has_digit && has_alpha {
                "[REDACTED_TOKEN]".to_string()
            } else {
                m.to_string()
            }
        })
        .to_string()
}

/// Wrapper that redacts when formatted, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
