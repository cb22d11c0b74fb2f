use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::errors::ValidationError;

fn http_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^https?://").expect("static regex"))
}

fn any_scheme_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("static regex"))
}

/// Normalizes a store or product URL typed by the user.
///
/// Bare domains get an `https://` prefix. The returned string is the input as
/// typed (plus the prefix), not the re-serialized URL, so `mystore.com`
/// becomes `https://mystore.com` without a trailing slash.
pub fn normalize_url(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let candidate = if http_prefix().is_match(trimmed) {
        trimmed.to_string()
    } else if any_scheme_prefix().is_match(trimmed) {
        return Err(ValidationError::UnsupportedScheme);
    } else {
        format!("https://{trimmed}")
    };

    let parsed = match Url::parse(&candidate) {
        Ok(u) => u,
        Err(_) if raw_host(&candidate).is_some_and(|h| h.starts_with('.') || h.ends_with('.')) => {
            return Err(ValidationError::IncompleteHostname);
        }
        Err(_) => return Err(ValidationError::InvalidFormat),
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme);
    }
    let host = parsed.host_str().unwrap_or_default();
    if host.is_empty() || !host.contains('.') || host.starts_with('.') || host.ends_with('.') {
        return Err(ValidationError::IncompleteHostname);
    }
    Ok(candidate)
}

/// Host part of `scheme://[user@]host[:port]/...` without parsing, used only to
/// classify inputs the URL parser rejected.
fn raw_host(candidate: &str) -> Option<&str> {
    let rest = candidate.split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?;
    (!host.is_empty() && !host.contains(char::is_whitespace)).then_some(host)
}
