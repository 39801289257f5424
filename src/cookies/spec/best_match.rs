use time::OffsetDateTime;

use super::{CookieSpec, Rfc2965Spec, Rfc6265Spec, SpecKind};
use crate::config::CookieLimits;
use crate::cookies::{Cookie, CookieOrigin, SetCookie};
use crate::errors::RejectReason;

/// Picks a policy per cookie: RFC 2965 when the cookie carries a version of 1
/// or higher, RFC 6265 otherwise.
#[derive(Debug, Clone)]
pub struct BestMatchSpec {
    limits: CookieLimits,
    rfc2965: Rfc2965Spec,
    rfc6265: Rfc6265Spec,
}

impl BestMatchSpec {
    pub fn new(limits: CookieLimits) -> Self {
        Self {
            rfc2965: Rfc2965Spec::new(limits.clone()),
            rfc6265: Rfc6265Spec::new(limits.clone()),
            limits,
        }
    }

    fn for_version(&self, version: u32) -> &dyn CookieSpec {
        if version >= 1 {
            &self.rfc2965
        } else {
            &self.rfc6265
        }
    }
}

impl CookieSpec for BestMatchSpec {
    fn kind(&self) -> SpecKind {
        SpecKind::BestMatch
    }

    fn limits(&self) -> &CookieLimits {
        &self.limits
    }

    fn make_cookie(&self, attrs: &SetCookie, origin: &CookieOrigin, now: OffsetDateTime) -> Result<Cookie, RejectReason> {
        self.for_version(attrs.version.unwrap_or(0)).make_cookie(attrs, origin, now)
    }

    fn validate(&self, cookie: &Cookie, origin: &CookieOrigin) -> Result<(), RejectReason> {
        self.for_version(cookie.version()).validate(cookie, origin)
    }

    fn matches(&self, cookie: &Cookie, origin: &CookieOrigin) -> bool {
        self.for_version(cookie.version()).matches(cookie, origin)
    }
}
