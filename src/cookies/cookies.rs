//! Cookie core types.
//!
//! This module defines the [`Cookie`] value type, its [`CookieBuilder`] and the
//! [`CookieIdentity`] triple used by the store to decide whether two cookies are
//! "the same" cookie.
//!
//! A cookie is built once and never mutated afterwards. Receiving a newer version
//! of the same cookie replaces the stored entry as a whole (see
//! [`CookieStore::add`](crate::cookies::CookieStore::add)).
//!
//! ```rust
//! use gosub_cookies::cookies::Cookie;
//!
//! let c = Cookie::builder("session", "abc123")
//!     .domain("Example.com", true)
//!     .path("/", false)
//!     .secure(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(c.domain(), "example.com");
//! assert!(!c.is_persistent());
//! ```

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::RejectReason;

/// A cookie as stored by the engine.
///
/// The two `*_attribute_specified` flags record whether the issuing response
/// carried an explicit `Domain` / `Path` attribute or whether the value was
/// defaulted from the request. They change matching semantics: a host-only
/// cookie (no `Domain` attribute) matches its host exactly, a domain cookie also
/// matches subdomains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCookie")]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    name: String,

    /// Raw cookie value (not URL-decoded).
    value: String,

    /// Informational comment (RFC 2965 only). Never affects matching.
    comment: Option<String>,

    /// Lowercase domain without a leading dot.
    domain: String,

    /// `true` if the domain came from a `Domain` attribute, `false` for host-only cookies.
    domain_attribute_specified: bool,

    /// Path scoping (e.g., `"/"`). Never empty.
    path: String,

    /// `true` if the path came from a `Path` attribute rather than the request path.
    path_attribute_specified: bool,

    /// If `true`, cookie is sent only over secure channels.
    secure: bool,

    /// If `true`, cookie must not be exposed to client-side scripts.
    http_only: bool,

    /// Absolute expiry. Session cookies have `None`.
    expiry: Option<OffsetDateTime>,

    /// Cookie specification version: 0 for legacy / RFC 6265, 1 for RFC 2965.
    version: u32,
}

impl Cookie {
    /// Starts building a cookie with the given name and value.
    pub fn builder(name: impl Into<String>, value: impl Into<String>) -> CookieBuilder {
        CookieBuilder::new(name, value)
    }

    /// Cookie name (case-sensitive).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw cookie value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Comment, if the policy that accepted the cookie keeps comments.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Lowercase domain without a leading dot.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether the domain came from an explicit `Domain` attribute.
    pub fn is_domain_attribute_specified(&self) -> bool {
        self.domain_attribute_specified
    }

    /// Path scoping, e.g. `"/"`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the path came from an explicit `Path` attribute.
    pub fn is_path_attribute_specified(&self) -> bool {
        self.path_attribute_specified
    }

    /// If `true`, cookie is sent only over secure channels.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// If `true`, cookie must not be exposed to client-side scripts.
    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    /// Absolute expiry; `None` for session cookies.
    pub fn expiry(&self) -> Option<OffsetDateTime> {
        self.expiry
    }

    /// Cookie specification version (0 legacy / RFC 6265, 1 RFC 2965).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns `true` if the cookie survives the end of the current session.
    pub fn is_persistent(&self) -> bool {
        self.expiry.is_some()
    }

    /// Returns `true` if the cookie has an expiry at or before `now`.
    ///
    /// Session cookies never expire by time; they are dropped by
    /// [`CookieStore::clear_session`](crate::cookies::CookieStore::clear_session).
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        matches!(self.expiry, Some(expiry) if expiry <= now)
    }

    /// Returns the `(name, domain, path)` triple identifying this cookie in a store.
    pub fn identity(&self) -> CookieIdentity {
        CookieIdentity {
            name: self.name.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
        }
    }

    pub(crate) fn has_identity(&self, identity: &CookieIdentity) -> bool {
        self.name == identity.name && self.domain == identity.domain && self.path == identity.path
    }
}

/// Serialized form of [`Cookie`]. Deserialization goes through
/// [`CookieBuilder::build`] so a stored snapshot cannot bypass its checks.
#[derive(Deserialize)]
struct RawCookie {
    name: String,
    value: String,
    #[serde(default)]
    comment: Option<String>,
    domain: String,
    domain_attribute_specified: bool,
    path: String,
    path_attribute_specified: bool,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    http_only: bool,
    #[serde(default)]
    expiry: Option<OffsetDateTime>,
    #[serde(default)]
    version: u32,
}

impl TryFrom<RawCookie> for Cookie {
    type Error = RejectReason;

    fn try_from(raw: RawCookie) -> Result<Self, Self::Error> {
        Cookie::builder(raw.name, raw.value)
            .comment(raw.comment)
            .domain(raw.domain, raw.domain_attribute_specified)
            .path(raw.path, raw.path_attribute_specified)
            .secure(raw.secure)
            .http_only(raw.http_only)
            .expiry(raw.expiry)
            .version(raw.version)
            .build()
    }
}

/// The identity of a cookie: two cookies with the same triple are the same
/// cookie, regardless of value, expiry or flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CookieIdentity {
    pub name: String,
    pub domain: String,
    pub path: String,
}

impl CookieIdentity {
    pub fn new(name: impl Into<String>, domain: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: normalize_domain(&domain.into()),
            path: path.into(),
        }
    }
}

/// Lowercases a domain and strips a leading dot.
pub(crate) fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Builder for [`Cookie`].
///
/// Setters are total; [`CookieBuilder::build`] only checks what every cookie
/// needs regardless of specification (a name, a domain and a path).
/// Specification rules are applied by a [`CookieSpec`](crate::cookies::CookieSpec).
#[derive(Debug, Clone)]
pub struct CookieBuilder {
    name: String,
    value: String,
    comment: Option<String>,
    domain: Option<(String, bool)>,
    path: Option<(String, bool)>,
    secure: bool,
    http_only: bool,
    expiry: Option<OffsetDateTime>,
    version: u32,
}

impl CookieBuilder {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: None,
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            expiry: None,
            version: 0,
        }
    }

    /// Sets the domain and whether it came from an explicit `Domain` attribute.
    pub fn domain(mut self, domain: impl Into<String>, attribute_specified: bool) -> Self {
        self.domain = Some((domain.into(), attribute_specified));
        self
    }

    /// Sets the path and whether it came from an explicit `Path` attribute.
    pub fn path(mut self, path: impl Into<String>, attribute_specified: bool) -> Self {
        self.path = Some((path.into(), attribute_specified));
        self
    }

    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn expiry(mut self, expiry: Option<OffsetDateTime>) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Finalizes the cookie.
    ///
    /// The domain is lowercased and stripped of its leading dot. A cookie without
    /// a name, with a reserved `$` name, or without a domain is rejected with
    /// [`RejectReason::InvalidAttributeCombination`]; one without a path with
    /// [`RejectReason::PathInvalid`].
    pub fn build(self) -> Result<Cookie, RejectReason> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RejectReason::InvalidAttributeCombination("cookie name is empty".into()));
        }
        if name.starts_with('$') {
            return Err(RejectReason::InvalidAttributeCombination(format!(
                "cookie name {name:?} uses the reserved '$' prefix"
            )));
        }

        let (domain, domain_attribute_specified) = self
            .domain
            .map(|(d, specified)| (normalize_domain(&d), specified))
            .filter(|(d, _)| !d.is_empty())
            .ok_or_else(|| RejectReason::InvalidAttributeCombination(format!("cookie {name:?} has no domain")))?;

        let (path, path_attribute_specified) = self
            .path
            .filter(|(p, _)| !p.is_empty())
            .ok_or_else(|| RejectReason::PathInvalid {
                path: String::new(),
                request_path: String::new(),
            })?;

        Ok(Cookie {
            name,
            value: self.value,
            comment: self.comment,
            domain,
            domain_attribute_specified,
            path,
            path_attribute_specified,
            secure: self.secure,
            http_only: self.http_only,
            expiry: self.expiry,
            version: self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn t(secs: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(secs).unwrap()
    }

    fn basic() -> CookieBuilder {
        Cookie::builder("sid", "abc").domain("example.com", false).path("/", false)
    }

    #[test]
    fn persistent_follows_expiry() {
        let session = basic().build().unwrap();
        assert!(!session.is_persistent());
        assert_eq!(session.expiry(), None);

        let persistent = basic().expiry(Some(t(1_000))).build().unwrap();
        assert!(persistent.is_persistent());
    }

    #[test]
    fn is_expired_is_inclusive_of_now() {
        let c = basic().expiry(Some(t(1_000))).build().unwrap();
        assert!(!c.is_expired(t(999)));
        assert!(c.is_expired(t(1_000)));
        assert!(c.is_expired(t(1_000) + Duration::seconds(1)));
    }

    #[test]
    fn session_cookie_never_expires_by_time() {
        let c = basic().build().unwrap();
        assert!(!c.is_expired(t(i32::MAX as i64)));
    }

    #[test]
    fn domain_is_normalized() {
        let c = Cookie::builder("a", "b").domain(".WWW.Example.COM", true).path("/", true).build().unwrap();
        assert_eq!(c.domain(), "www.example.com");
        assert!(c.is_domain_attribute_specified());
        assert!(c.is_path_attribute_specified());
    }

    #[test]
    fn missing_domain_is_rejected() {
        let err = Cookie::builder("a", "b").path("/", false).build().unwrap_err();
        assert!(matches!(err, RejectReason::InvalidAttributeCombination(_)));

        let err = Cookie::builder("a", "b").domain(".", true).path("/", false).build().unwrap_err();
        assert!(matches!(err, RejectReason::InvalidAttributeCombination(_)));
    }

    #[test]
    fn missing_path_is_rejected() {
        let err = Cookie::builder("a", "b").domain("example.com", false).build().unwrap_err();
        assert!(matches!(err, RejectReason::PathInvalid { .. }));
    }

    #[test]
    fn empty_and_reserved_names_are_rejected() {
        let err = Cookie::builder("  ", "b").domain("example.com", false).path("/", false).build().unwrap_err();
        assert!(matches!(err, RejectReason::InvalidAttributeCombination(_)));

        let err = Cookie::builder("$Version", "1").domain("example.com", false).path("/", false).build().unwrap_err();
        assert!(matches!(err, RejectReason::InvalidAttributeCombination(_)));
    }

    #[test]
    fn identity_ignores_value_and_flags() {
        let a = basic().build().unwrap();
        let b = Cookie::builder("sid", "other")
            .domain(".EXAMPLE.com", true)
            .path("/", true)
            .secure(true)
            .build()
            .unwrap();
        assert_eq!(a.identity(), b.identity());
        assert!(b.has_identity(&CookieIdentity::new("sid", ".example.com", "/")));
        assert!(!b.has_identity(&CookieIdentity::new("SID", "example.com", "/")));
    }

    #[test]
    fn deserialization_rejects_empty_path_and_domain() {
        let json = r#"{"name":"sid","value":"1","comment":null,"domain":"example.com","domain_attribute_specified":false,"path":"","path_attribute_specified":false,"secure":false,"http_only":false,"expiry":null,"version":0}"#;
        assert!(serde_json::from_str::<Cookie>(json).is_err());

        let json = r#"{"name":"sid","value":"1","domain":".","domain_attribute_specified":true,"path":"/","path_attribute_specified":false}"#;
        assert!(serde_json::from_str::<Cookie>(json).is_err());
    }

    #[test]
    fn deserialization_normalizes_domain() {
        let json = r#"{"name":"sid","value":"1","domain":".Example.COM","domain_attribute_specified":true,"path":"/","path_attribute_specified":true}"#;
        let c: Cookie = serde_json::from_str(json).unwrap();
        assert_eq!(c.domain(), "example.com");
        assert!(!c.is_persistent());
    }

    #[test]
    fn serializes_to_json() {
        let c = basic().comment(Some("tracking".into())).version(1).build().unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"domain_attribute_specified\":false"));
        let back: Cookie = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
