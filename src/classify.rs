//! Turns freeform submitted text into structured fields: URLs, hashtag-style
//! tags, and the remaining note text.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// URL-shaped substrings: an http(s) or www. prefix, a dotted domain, and an
/// optional tail restricted to a safe character set.
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b((?:https?://|www\.)[\w\-]+(?:\.[\w\-]+)+(?:[\w\-.,@?^=%&:/~+#]*[\w\-@?^=%&/~+#])?)")
        .unwrap()
});

/// Every URL-shaped substring, left to right, duplicates included.
/// Reachability is not checked.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whitespace-delimited tokens starting with `#`, rejoined with single
/// spaces. Order and casing preserved.
pub fn extract_tags(text: &str) -> String {
    text.split_whitespace()
        .filter(|w| w.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The complementary tokens to [`extract_tags`]: everything that is not a
/// tag, rejoined with single spaces.
pub fn extract_note(text: &str) -> String {
    text.split_whitespace()
        .filter(|w| !w.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prefix `https://` when the matched URL carries no explicit scheme.
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Short display form: host without a leading `www.`, plus the path unless it
/// is empty or `/`. Display only, never used for storage or matching.
/// Falls back to the input unchanged when it does not parse as a URL.
pub fn prettify_url(url: &str) -> String {
    let candidate = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{url}")
    };

    let Ok(parsed) = Url::parse(&candidate) else {
        return url.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return url.to_string();
    };

    let host = host.strip_prefix("www.").unwrap_or(host);
    match parsed.path() {
        "" | "/" => host.to_string(),
        path => format!("{host}{path}"),
    }
}
