use time::OffsetDateTime;

use super::{check_domain, check_size, default_path, domain_or_host, CookieSpec, SpecKind};
use crate::config::CookieLimits;
use crate::cookies::{Cookie, CookieOrigin, SetCookie};
use crate::errors::RejectReason;

/// HTTP state management as in RFC 6265.
///
/// `Max-Age` wins over `Expires`, a `Path` not starting with `/` is ignored,
/// and the cookie path is not checked against the request path. A single-label
/// `Domain` equal to the host degrades to a host-only cookie.
///
/// On top of RFC 6265 this applies the RFC 6265bis (section 5.6) hardening
/// that `Secure` cookies are only accepted over secure channels.
#[derive(Debug, Clone)]
pub struct Rfc6265Spec {
    limits: CookieLimits,
}

impl Rfc6265Spec {
    pub fn new(limits: CookieLimits) -> Self {
        Self { limits }
    }
}

impl CookieSpec for Rfc6265Spec {
    fn kind(&self) -> SpecKind {
        SpecKind::Rfc6265
    }

    fn limits(&self) -> &CookieLimits {
        &self.limits
    }

    fn make_cookie(&self, attrs: &SetCookie, origin: &CookieOrigin, now: OffsetDateTime) -> Result<Cookie, RejectReason> {
        let (domain, mut domain_specified) = domain_or_host(attrs, origin);
        if domain_specified && !domain.contains('.') && domain == origin.host() {
            domain_specified = false;
        }

        let (path, path_specified) = match attrs.path.as_deref().filter(|p| p.starts_with('/')) {
            Some(path) => (path.to_string(), true),
            None => (default_path(origin.path(), false), false),
        };

        Cookie::builder(attrs.name.as_str(), attrs.value.as_str())
            .domain(domain, domain_specified)
            .path(path, path_specified)
            .secure(attrs.secure)
            .http_only(attrs.http_only)
            .expiry(attrs.resolve_expiry(now, true))
            .version(0)
            .build()
    }

    fn validate(&self, cookie: &Cookie, origin: &CookieOrigin) -> Result<(), RejectReason> {
        check_size(&self.limits, cookie)?;

        // RFC 6265bis: insecure origins may not set Secure cookies
        if cookie.is_secure() && !origin.is_secure() {
            return Err(RejectReason::InvalidAttributeCombination(format!(
                "secure cookie {:?} received over an insecure channel",
                cookie.name()
            )));
        }

        check_domain(cookie, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    fn origin(host: &str, path: &str, secure: bool) -> CookieOrigin {
        CookieOrigin::new(host, path, secure).unwrap()
    }

    fn accept(attrs: SetCookie, origin: &CookieOrigin) -> Result<Cookie, RejectReason> {
        let spec = Rfc6265Spec::new(CookieLimits::default());
        let cookie = spec.make_cookie(&attrs, origin, now())?;
        spec.validate(&cookie, origin)?;
        Ok(cookie)
    }

    #[test]
    fn host_only_by_default() {
        let c = accept(SetCookie::new("a", "b"), &origin("www.example.com", "/a/b", false)).unwrap();
        assert_eq!(c.domain(), "www.example.com");
        assert!(!c.is_domain_attribute_specified());
        assert_eq!(c.path(), "/a");
    }

    #[test]
    fn parent_domain_is_accepted() {
        let c = accept(SetCookie::new("a", "b").domain(".example.com"), &origin("www.example.com", "/", false)).unwrap();
        assert_eq!(c.domain(), "example.com");
        assert!(c.is_domain_attribute_specified());
    }

    #[test]
    fn sibling_and_foreign_domains_are_rejected() {
        let o = origin("www.example.com", "/", false);
        for domain in ["api.example.com", "example.org", "ample.com"] {
            assert!(matches!(
                accept(SetCookie::new("a", "b").domain(domain), &o),
                Err(RejectReason::DomainMismatch { .. })
            ));
        }
    }

    #[test]
    fn single_label_domain() {
        let c = accept(SetCookie::new("a", "b").domain("localhost"), &origin("localhost", "/", false)).unwrap();
        assert!(!c.is_domain_attribute_specified());

        assert!(matches!(
            accept(SetCookie::new("a", "b").domain("com"), &origin("example.com", "/", false)),
            Err(RejectReason::DomainMismatch { .. })
        ));
    }

    #[test]
    fn relative_path_attribute_is_ignored() {
        let c = accept(SetCookie::new("a", "b").path("relative"), &origin("example.com", "/x/y", false)).unwrap();
        assert_eq!(c.path(), "/x");
        assert!(!c.is_path_attribute_specified());
    }

    #[test]
    fn path_is_not_checked_against_request() {
        let c = accept(SetCookie::new("a", "b").path("/elsewhere"), &origin("example.com", "/here", false)).unwrap();
        assert_eq!(c.path(), "/elsewhere");
        assert!(c.is_path_attribute_specified());
    }

    #[test]
    fn secure_cookie_needs_secure_channel() {
        assert!(matches!(
            accept(SetCookie::new("a", "b").secure(), &origin("example.com", "/", false)),
            Err(RejectReason::InvalidAttributeCombination(_))
        ));
        assert!(accept(SetCookie::new("a", "b").secure(), &origin("example.com", "/", true)).is_ok());
    }

    #[test]
    fn oversized_cookie_is_rejected() {
        let value = "x".repeat(5000);
        let err = accept(SetCookie::new("big", value), &origin("example.com", "/", false)).unwrap_err();
        assert_eq!(err, RejectReason::CookieTooLarge { size: 5003, limit: 4096 });
    }

    #[test]
    fn comment_and_version_are_dropped() {
        let c = accept(SetCookie::new("a", "b").comment("c").version(1), &origin("example.com", "/", false)).unwrap();
        assert_eq!(c.comment(), None);
        assert_eq!(c.version(), 0);
    }
}
