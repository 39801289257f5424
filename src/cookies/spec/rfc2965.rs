use time::OffsetDateTime;

use super::{check_domain, check_path, check_size, default_path, domain_mismatch, domain_or_host, CookieSpec, SpecKind};
use crate::config::CookieLimits;
use crate::cookies::{Cookie, CookieOrigin, SetCookie};
use crate::errors::RejectReason;

/// `Set-Cookie2` semantics (RFC 2965).
///
/// Cookies must carry `Version=1` or higher. The default path keeps its
/// trailing slash, comments are kept, and a `Domain` attribute must both
/// contain an embedded dot and be no more than one label above the host.
#[derive(Debug, Clone)]
pub struct Rfc2965Spec {
    limits: CookieLimits,
}

impl Rfc2965Spec {
    pub fn new(limits: CookieLimits) -> Self {
        Self { limits }
    }
}

impl CookieSpec for Rfc2965Spec {
    fn kind(&self) -> SpecKind {
        SpecKind::Rfc2965
    }

    fn limits(&self) -> &CookieLimits {
        &self.limits
    }

    fn make_cookie(&self, attrs: &SetCookie, origin: &CookieOrigin, now: OffsetDateTime) -> Result<Cookie, RejectReason> {
        let version = attrs
            .version
            .filter(|v| *v >= 1)
            .ok_or_else(|| RejectReason::InvalidAttributeCombination(format!("cookie {:?} has no Version attribute", attrs.name)))?;

        let (domain, domain_specified) = domain_or_host(attrs, origin);
        let (path, path_specified) = match attrs.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => (path.to_string(), true),
            None => (default_path(origin.path(), true), false),
        };

        Cookie::builder(attrs.name.as_str(), attrs.value.as_str())
            .domain(domain, domain_specified)
            .path(path, path_specified)
            .comment(attrs.comment.clone())
            .secure(attrs.secure)
            .http_only(attrs.http_only)
            .expiry(attrs.resolve_expiry(now, true))
            .version(version)
            .build()
    }

    fn validate(&self, cookie: &Cookie, origin: &CookieOrigin) -> Result<(), RejectReason> {
        check_size(&self.limits, cookie)?;

        if cookie.version() < 1 {
            return Err(RejectReason::InvalidAttributeCombination(format!(
                "cookie {:?} has version {}, expected 1 or higher",
                cookie.name(),
                cookie.version()
            )));
        }

        check_domain(cookie, origin)?;

        if cookie.is_domain_attribute_specified() {
            if !cookie.domain().contains('.') {
                return Err(domain_mismatch(cookie, origin));
            }

            // The host may sit at most one label below the domain
            let prefix = origin
                .host()
                .strip_suffix(cookie.domain())
                .map(|p| p.trim_end_matches('.'))
                .unwrap_or_default();
            if prefix.contains('.') {
                return Err(domain_mismatch(cookie, origin));
            }
        }

        check_path(cookie, origin)
    }
}
