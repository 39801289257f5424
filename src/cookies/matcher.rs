//! Domain and path matching predicates.
//!
//! Both are pure functions over strings. They are shared by every
//! [`CookieSpec`](crate::cookies::CookieSpec) so that all policies agree on what
//! "this cookie belongs to this request" means.

use std::net::IpAddr;

/// Returns `true` if a cookie scoped to `cookie_domain` applies to `request_host`.
///
/// - Host-only cookies (`domain_attribute_specified == false`) match their host
///   exactly.
/// - Domain cookies also match any subdomain, except that a single-label domain
///   (`"com"`, `"localhost"`) never matches anything but itself, and IP
///   addresses never match by suffix.
///
/// Comparison is case-insensitive; a leading dot on `cookie_domain` is ignored.
pub fn domain_matches(cookie_domain: &str, domain_attribute_specified: bool, request_host: &str) -> bool {
    debug_assert!(!cookie_domain.is_empty(), "cookie domain must not be empty");
    debug_assert!(!request_host.is_empty(), "request host must not be empty");

    let domain = cookie_domain.trim_start_matches('.');
    if domain.is_empty() || request_host.is_empty() {
        return false;
    }

    if !domain_attribute_specified {
        return domain.eq_ignore_ascii_case(request_host);
    }

    if domain.eq_ignore_ascii_case(request_host) {
        return true;
    }

    // Bare top-level labels would leak to every host sharing them
    if !domain.contains('.') {
        return false;
    }

    if request_host.parse::<IpAddr>().is_ok() {
        return false;
    }

    let host = request_host.as_bytes();
    let domain = domain.as_bytes();
    host.len() > domain.len()
        && host[host.len() - domain.len() - 1] == b'.'
        && host[host.len() - domain.len()..].eq_ignore_ascii_case(domain)
}

/// Returns `true` if a cookie scoped to `cookie_path` applies to `request_path`.
///
/// This is a prefix match on path-segment boundaries: `/foo` matches `/foo`,
/// `/foo/` and `/foo/bar`, but not `/foobar`.
pub fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    debug_assert!(!cookie_path.is_empty(), "cookie path must not be empty");

    if request_path == cookie_path {
        return true;
    }

    if !request_path.starts_with(cookie_path) {
        return false;
    }

    cookie_path.ends_with('/') || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_only_matches_exactly() {
        assert!(domain_matches("example.com", false, "example.com"));
        assert!(domain_matches("example.com", false, "EXAMPLE.com"));
        assert!(!domain_matches("example.com", false, "www.example.com"));
        assert!(!domain_matches("www.example.com", false, "example.com"));
    }

    #[test]
    fn domain_attribute_matches_subdomains() {
        assert!(domain_matches("example.com", true, "example.com"));
        assert!(domain_matches("example.com", true, "www.example.com"));
        assert!(domain_matches(".example.com", true, "a.b.example.com"));
        assert!(domain_matches("Example.COM", true, "www.example.com"));
    }

    #[test]
    fn suffix_must_be_on_label_boundary() {
        assert!(!domain_matches("example.com", true, "badexample.com"));
        assert!(!domain_matches("example.com", true, "example.com.evil.org"));
        assert!(!domain_matches("www.example.com", true, "example.com"));
    }

    #[test]
    fn single_label_domains_never_match_broadly() {
        assert!(!domain_matches("com", true, "example.com"));
        assert!(!domain_matches(".com", true, "example.com"));
        assert!(domain_matches("localhost", true, "localhost"));
    }

    #[test]
    fn ip_addresses_match_exactly_only() {
        assert!(domain_matches("1.2.3.4", false, "1.2.3.4"));
        assert!(domain_matches("2.3.4", true, "2.3.4"));
        assert!(!domain_matches("2.3.4", true, "1.2.3.4"));
    }

    #[test]
    fn path_prefix_on_segment_boundary() {
        assert!(path_matches("/", "/"));
        assert!(path_matches("/", "/anything"));
        assert!(path_matches("/foo", "/foo"));
        assert!(path_matches("/foo", "/foo/"));
        assert!(path_matches("/foo", "/foo/bar"));
        assert!(path_matches("/foo/", "/foo/bar"));
        assert!(!path_matches("/foo", "/foobar"));
        assert!(!path_matches("/foo/", "/foo"));
        assert!(!path_matches("/foo/bar", "/foo"));
    }

    #[test]
    fn path_is_case_sensitive() {
        assert!(!path_matches("/Foo", "/foo"));
    }
}
