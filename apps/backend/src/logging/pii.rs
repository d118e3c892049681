use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Compiled redaction patterns, built once on first use.
struct Patterns {
    email: Regex,
    phone: Regex,
    base64_token: Regex,
    hex_token: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    email: compile(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b"),
    phone: compile(r"(?:\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{2}[\s.-]?\d{2}"),
    base64_token: compile(r"\b[A-Za-z0-9+/]{16,}={0,2}\b"),
    hex_token: compile(r"\b[A-Fa-f0-9]{16,}\b"),
});

/// Every pattern above is a literal; a failure to compile is a bug the first
/// redaction test catches.
fn compile(pattern: &str) -> Regex {
    #[allow(clippy::unwrap_used)]
    Regex::new(pattern).unwrap()
}

/// Masks personal data in free-form text before it reaches a log line.
///
/// Emails keep their first character and full domain (`u***@example.com`).
/// Phone numbers of ten or more digits become `[REDACTED_PHONE]`; shorter
/// digit runs such as order numbers pass through. Base64 or hex runs of
/// sixteen or more characters become `[REDACTED_TOKEN]`. Emails are masked
/// first so the token patterns never eat a local part.
pub fn redact(input: &str) -> String {
    let masked = mask_emails(input);
    let masked = PATTERNS.phone.replace_all(&masked, "[REDACTED_PHONE]");
    let masked = PATTERNS
        .base64_token
        .replace_all(&masked, "[REDACTED_TOKEN]");
    PATTERNS
        .hex_token
        .replace_all(&masked, "[REDACTED_TOKEN]")
        .into_owned()
}

fn mask_emails(input: &str) -> Cow<'_, str> {
    PATTERNS.email.replace_all(input, |caps: &regex::Captures| {
        let address = &caps[0];
        match address.split_once('@') {
            // The local part is ASCII per the pattern, so the one-byte slice
            // is always a char boundary.
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => address.to_string(),
        }
    })
}

/// Wraps a string so that formatting it, via `Display` or `Debug`, always
/// goes through [`redact`]. Lets call sites log user-supplied text without
/// thinking about what it might contain.
pub struct Redacted<'a>(pub &'a str);

impl<'a> fmt::Display for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl<'a> fmt::Debug for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
