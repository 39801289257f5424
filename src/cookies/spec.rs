//! Cookie specification policies.
//!
//! A **cookie spec** decides how a received attribute set becomes a [`Cookie`]
//! (defaults for missing `Domain` / `Path`, which attributes are meaningful),
//! whether the result may be stored for the origin that sent it, and how stored
//! cookies are matched and ordered for an outgoing request.
//!
//! Four policies are available, selected through [`SpecKind`]:
//! - [`NetscapeSpec`]: the original vendor draft (version 0).
//! - [`Rfc2965Spec`]: `Set-Cookie2` semantics (version 1).
//! - [`Rfc6265Spec`]: the current HTTP state management mechanism (default).
//! - [`BestMatchSpec`]: RFC 2965 for versioned cookies, RFC 6265 for the rest.
//!
//! All policies share the domain-injection check: a `Domain` attribute the
//! sending host does not domain-match is always rejected.
mod best_match;
mod netscape;
mod rfc2965;
mod rfc6265;

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::CookieLimits;
use crate::cookies::cookies::normalize_domain;
use crate::cookies::{domain_matches, path_matches, Cookie, CookieOrigin, SetCookie};
use crate::errors::{CookieError, RejectReason};

pub use best_match::BestMatchSpec;
pub use netscape::NetscapeSpec;
pub use rfc2965::Rfc2965Spec;
pub use rfc6265::Rfc6265Spec;

/// A rule set for accepting, matching and ordering cookies.
///
/// Implementations must be `Send + Sync` so a store can live behind a
/// [`CookieJarHandle`](crate::cookies::CookieJarHandle).
pub trait CookieSpec: fmt::Debug + Send + Sync {
    /// Which policy this is.
    fn kind(&self) -> SpecKind;

    /// The resource limits this policy enforces.
    fn limits(&self) -> &CookieLimits;

    /// Turns a received attribute set into a cookie, applying this policy's
    /// defaults for absent attributes.
    ///
    /// This does not check the cookie against its origin; see [`CookieSpec::validate`].
    fn make_cookie(&self, attrs: &SetCookie, origin: &CookieOrigin, now: OffsetDateTime) -> Result<Cookie, RejectReason>;

    /// Checks whether `cookie` may be stored when received over `origin`.
    fn validate(&self, cookie: &Cookie, origin: &CookieOrigin) -> Result<(), RejectReason>;

    /// Returns `true` if `cookie` should be sent with a request to `origin`.
    ///
    /// Expiry is not considered here; the store checks it against its `now`.
    fn matches(&self, cookie: &Cookie, origin: &CookieOrigin) -> bool {
        domain_matches(cookie.domain(), cookie.is_domain_attribute_specified(), origin.host())
            && path_matches(cookie.path(), origin.path())
            && (!cookie.is_secure() || origin.is_secure())
    }

    /// Orders cookies selected for one request: longer paths first, ties kept
    /// in their current (insertion) order.
    fn order(&self, cookies: &mut [Cookie]) {
        cookies.sort_by_key(|c| Reverse(c.path().len()));
    }
}

/// Selects a [`CookieSpec`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecKind {
    Netscape,
    Rfc2965,
    #[default]
    Rfc6265,
    BestMatch,
}

impl SpecKind {
    /// Creates the policy for this kind with the given limits.
    pub fn build(self, limits: CookieLimits) -> Box<dyn CookieSpec> {
        match self {
            SpecKind::Netscape => Box::new(NetscapeSpec::new(limits)),
            SpecKind::Rfc2965 => Box::new(Rfc2965Spec::new(limits)),
            SpecKind::Rfc6265 => Box::new(Rfc6265Spec::new(limits)),
            SpecKind::BestMatch => Box::new(BestMatchSpec::new(limits)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecKind::Netscape => "netscape",
            SpecKind::Rfc2965 => "rfc2965",
            SpecKind::Rfc6265 => "rfc6265",
            SpecKind::BestMatch => "best-match",
        }
    }
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecKind {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "netscape" => Ok(SpecKind::Netscape),
            "rfc2965" => Ok(SpecKind::Rfc2965),
            "rfc6265" => Ok(SpecKind::Rfc6265),
            "best-match" | "best_match" => Ok(SpecKind::BestMatch),
            _ => Err(CookieError::UnknownSpec(s.to_string())),
        }
    }
}

/// Domain from the `Domain` attribute if present and non-empty, otherwise the
/// request host as a host-only domain.
fn domain_or_host(attrs: &SetCookie, origin: &CookieOrigin) -> (String, bool) {
    match attrs.domain.as_deref().map(normalize_domain).filter(|d| !d.is_empty()) {
        Some(domain) => (domain, true),
        None => (origin.host().to_string(), false),
    }
}

/// The directory part of a request path.
///
/// With `inclusive` the trailing `/` is kept (`/a/b` -> `/a/`), otherwise it is
/// dropped (`/a/b` -> `/a`). Either way the result is never empty.
fn default_path(request_path: &str, inclusive: bool) -> String {
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) if inclusive => request_path[..=idx].to_string(),
        Some(idx) => request_path[..idx].to_string(),
    }
}

fn check_size(limits: &CookieLimits, cookie: &Cookie) -> Result<(), RejectReason> {
    let size = cookie.name().len() + cookie.value().len();
    if size > limits.max_cookie_size {
        return Err(RejectReason::CookieTooLarge {
            size,
            limit: limits.max_cookie_size,
        });
    }
    Ok(())
}

/// The sending host must domain-match the cookie domain. For host-only cookies
/// this means the domain is the host itself.
fn check_domain(cookie: &Cookie, origin: &CookieOrigin) -> Result<(), RejectReason> {
    if domain_matches(cookie.domain(), cookie.is_domain_attribute_specified(), origin.host()) {
        Ok(())
    } else {
        Err(domain_mismatch(cookie, origin))
    }
}

fn check_path(cookie: &Cookie, origin: &CookieOrigin) -> Result<(), RejectReason> {
    if path_matches(cookie.path(), origin.path()) {
        Ok(())
    } else {
        Err(RejectReason::PathInvalid {
            path: cookie.path().to_string(),
            request_path: origin.path().to_string(),
        })
    }
}

fn domain_mismatch(cookie: &Cookie, origin: &CookieOrigin) -> RejectReason {
    RejectReason::DomainMismatch {
        domain: cookie.domain().to_string(),
        host: origin.host().to_string(),
    }
}
