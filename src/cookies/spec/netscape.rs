use time::OffsetDateTime;

use super::{check_domain, check_path, check_size, default_path, domain_mismatch, domain_or_host, CookieSpec, SpecKind};
use crate::config::CookieLimits;
use crate::cookies::{Cookie, CookieOrigin, SetCookie};
use crate::errors::RejectReason;

/// Top-level domains for which two labels are enough in a `Domain` attribute.
const SPECIAL_DOMAINS: [&str; 7] = ["com", "edu", "net", "org", "gov", "mil", "int"];

/// The original vendor cookie draft.
///
/// Only `Expires` is understood (no `Max-Age`), comments are dropped and all
/// cookies are version 0. A `Domain` attribute needs two labels under one of
/// the special top-level domains and three anywhere else, so `example.com` is
/// fine while `co.uk` is not.
#[derive(Debug, Clone)]
pub struct NetscapeSpec {
    limits: CookieLimits,
}

impl NetscapeSpec {
    pub fn new(limits: CookieLimits) -> Self {
        Self { limits }
    }
}

impl CookieSpec for NetscapeSpec {
    fn kind(&self) -> SpecKind {
        SpecKind::Netscape
    }

    fn limits(&self) -> &CookieLimits {
        &self.limits
    }

    fn make_cookie(&self, attrs: &SetCookie, origin: &CookieOrigin, now: OffsetDateTime) -> Result<Cookie, RejectReason> {
        let (domain, domain_specified) = domain_or_host(attrs, origin);
        let (path, path_specified) = match attrs.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => (path.to_string(), true),
            None => (default_path(origin.path(), false), false),
        };

        Cookie::builder(attrs.name.as_str(), attrs.value.as_str())
            .domain(domain, domain_specified)
            .path(path, path_specified)
            .secure(attrs.secure)
            .http_only(attrs.http_only)
            .expiry(attrs.resolve_expiry(now, false))
            .version(0)
            .build()
    }

    fn validate(&self, cookie: &Cookie, origin: &CookieOrigin) -> Result<(), RejectReason> {
        check_size(&self.limits, cookie)?;
        check_domain(cookie, origin)?;

        if cookie.is_domain_attribute_specified() {
            let labels = cookie.domain().split('.').filter(|l| !l.is_empty()).count();
            let tld = cookie.domain().rsplit('.').next().unwrap_or_default();
            let required = if SPECIAL_DOMAINS.contains(&tld) { 2 } else { 3 };
            if labels < required {
                return Err(domain_mismatch(cookie, origin));
            }
        }

        check_path(cookie, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> NetscapeSpec {
        NetscapeSpec::new(CookieLimits::default())
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    fn origin(host: &str, path: &str) -> CookieOrigin {
        CookieOrigin::new(host, path, false).unwrap()
    }

    fn accept(attrs: SetCookie, origin: &CookieOrigin) -> Result<Cookie, RejectReason> {
        let spec = spec();
        let cookie = spec.make_cookie(&attrs, origin, now())?;
        spec.validate(&cookie, origin)?;
        Ok(cookie)
    }

    #[test]
    fn defaults_come_from_request() {
        let o = origin("www.example.com", "/docs/index.html");
        let c = accept(SetCookie::new("a", "b"), &o).unwrap();
        assert_eq!(c.domain(), "www.example.com");
        assert!(!c.is_domain_attribute_specified());
        assert_eq!(c.path(), "/docs");
        assert!(!c.is_path_attribute_specified());
        assert_eq!(c.version(), 0);
    }

    #[test]
    fn max_age_and_comment_are_ignored() {
        let o = origin("example.com", "/");
        let c = accept(SetCookie::new("a", "b").max_age(60).comment("hi").version(1), &o).unwrap();
        assert_eq!(c.expiry(), None);
        assert_eq!(c.comment(), None);
        assert_eq!(c.version(), 0);
    }

    #[test]
    fn special_domains_need_two_labels() {
        let o = origin("www.example.com", "/");
        assert!(accept(SetCookie::new("a", "b").domain(".example.com"), &o).is_ok());
        assert!(matches!(
            accept(SetCookie::new("a", "b").domain(".com"), &o),
            Err(RejectReason::DomainMismatch { .. })
        ));
    }

    #[test]
    fn other_domains_need_three_labels() {
        let o = origin("www.example.co.uk", "/");
        assert!(accept(SetCookie::new("a", "b").domain(".example.co.uk"), &o).is_ok());
        assert!(matches!(
            accept(SetCookie::new("a", "b").domain(".co.uk"), &o),
            Err(RejectReason::DomainMismatch { .. })
        ));
    }

    #[test]
    fn foreign_domain_is_rejected() {
        let o = origin("www.example.com", "/");
        let err = accept(SetCookie::new("a", "b").domain(".evil.com"), &o).unwrap_err();
        assert_eq!(
            err,
            RejectReason::DomainMismatch {
                domain: "evil.com".into(),
                host: "www.example.com".into()
            }
        );
    }

    #[test]
    fn path_must_match_request() {
        let o = origin("example.com", "/shop/cart");
        assert!(accept(SetCookie::new("a", "b").path("/shop"), &o).is_ok());
        assert!(matches!(
            accept(SetCookie::new("a", "b").path("/admin"), &o),
            Err(RejectReason::PathInvalid { .. })
        ));
    }
}
