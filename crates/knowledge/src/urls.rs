//! URL helpers: domain canonicalization and wildcard path matching.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// Compiled pattern cache; the same handful of patterns is matched on every
/// knowledge load, so avoid recompiling per call.
static PATTERN_CACHE: Lazy<Mutex<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Canonical domain for a URL: lowercase hostname with any leading `www.`
/// stripped. Malformed URLs yield None rather than an error.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

/// Path component of a URL, `/` when absent or the URL is malformed.
pub fn extract_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path();
            if path.is_empty() {
                "/".to_string()
            } else {
                path.to_string()
            }
        }
        Err(_) => "/".to_string(),
    }
}

/// Whether `path` matches `pattern`, where each `*` in the pattern stands for
/// exactly one path segment (one or more non-slash characters). Exact string
/// equality short-circuits, so patterns containing regex metacharacters still
/// match themselves literally.
pub fn path_matches(path: &str, pattern: &str) -> bool {
    if path == pattern {
        return true;
    }
    let mut cache = match PATTERN_CACHE.lock() {
        Ok(c) => c,
        Err(poisoned) => poisoned.into_inner(),
    };
    let compiled = cache
        .entry(pattern.to_string())
        .or_insert_with(|| compile_pattern(pattern));
    match compiled {
        Some(re) => re.is_match(path),
        None => false,
    }
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    let escaped = regex::escape(pattern).replace(r"\*", "[^/]+");
    Regex::new(&format!("^{}$", escaped)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://www.Example.com/path"),
            Some("example.com".to_string())
        );
        assert_eq!(
            extract_domain("https://sub.example.com"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(extract_domain("not a url"), None);
        assert_eq!(extract_domain(""), None);
    }

    #[test]
    fn test_extract_path() {
        assert_eq!(extract_path("https://example.com"), "/");
        assert_eq!(extract_path("https://example.com/a/b?q=1"), "/a/b");
        assert_eq!(extract_path("garbage"), "/");
    }

    #[test]
    fn test_path_matches_wildcards() {
        assert!(path_matches("/user/123/profile", "/user/*/profile"));
        assert!(!path_matches("/user/profile", "/user/*/profile"));
        assert!(path_matches("/a/b/c", "/*/*/c"));
        assert!(!path_matches("/a/b/c/d", "/*/*/c"));
    }

    #[test]
    fn test_path_matches_exact_and_literal_metachars() {
        assert!(path_matches("/settings", "/settings"));
        assert!(!path_matches("/settings/x", "/settings"));
        // Dots in the pattern are literal, not regex wildcards.
        assert!(!path_matches("/fileXjson", "/file.json"));
        assert!(path_matches("/file.json", "/file.json"));
    }

    #[test]
    fn test_wildcard_spans_one_segment() {
        assert!(path_matches("/posts/drafts", "/posts/*"));
        assert!(!path_matches("/posts/", "/posts/*"));
        assert!(!path_matches("/posts/a/b", "/posts/*"));
    }
}
