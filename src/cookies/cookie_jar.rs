//! Cookie jar abstraction and the in-memory [`CookieStore`] engine.
//!
//! A **cookie jar** holds the cookies of one logical client identity. The
//! transport layer hands it the cookies received with each response and asks
//! it which cookies to attach to each request.
//!
//! [`CookieStore`] is the reference implementation. It applies a
//! [`CookieSpec`] to every received cookie, replaces cookies by their
//! `(name, domain, path)` identity, and selects cookies for a request by domain,
//! path, channel security and expiry.
//!
//! ## Notes
//! - Nothing here reads a clock. Every time-dependent operation takes `now`.
//! - Nothing expires in the background. Call [`CookieJar::evict_expired`] at
//!   controlled points (e.g. before each select); expired cookies are never
//!   selected either way.
//! - This module is **not** internally synchronized. Share a jar through a
//!   [`CookieJarHandle`], taking the write lock for mutations and the read lock
//!   for [`CookieJar::select`], so a selection always sees a complete state.
//!
//! ```rust
//! use gosub_cookies::cookies::{CookieJar, CookieOrigin, CookieStore, SetCookie};
//! use time::OffsetDateTime;
//!
//! let now = OffsetDateTime::now_utc();
//! let mut jar = CookieStore::new(None);
//!
//! let origin = CookieOrigin::new("www.example.com", "/", true).unwrap();
//! jar.store_response_cookies(&[SetCookie::new("sid", "42").domain("example.com")], &origin, now);
//!
//! let request = CookieOrigin::new("api.example.com", "/v1", true).unwrap();
//! assert_eq!(jar.select(&request, now)[0].value(), "42");
//! ```

use std::sync::{Arc, RwLock};

use time::OffsetDateTime;

use crate::config::CookieConfig;
use crate::cookies::{Cookie, CookieIdentity, CookieOrigin, CookieSpec, SetCookie};
use crate::errors::RejectReason;

/// A handle to a cookie jar trait.
///
/// This is a reference-counted, read/write-locked pointer to a type-erased
/// [`CookieJar`]. Obtain a **read lock** for [`CookieJar::select`] and other
/// queries, and a **write lock** for mutations.
pub type CookieJarHandle = Arc<RwLock<dyn CookieJar + Send + Sync>>;

/// A cookie jar keeps the cookies for one client identity.
pub trait CookieJar: Send + Sync {
    /// Validates `cookie` against the origin it was received over and stores it,
    /// replacing any cookie with the same identity.
    ///
    /// A cookie that is already expired at `now` is not stored, but still removes
    /// the cookie it would have replaced.
    fn add(&mut self, cookie: Cookie, origin: &CookieOrigin, now: OffsetDateTime) -> Result<(), RejectReason>;

    /// Converts and stores every attribute set received with one response.
    ///
    /// Returns one outcome per attribute set, in order. A rejected cookie does not
    /// affect the others.
    fn store_response_cookies(
        &mut self,
        set_cookies: &[SetCookie],
        origin: &CookieOrigin,
        now: OffsetDateTime,
    ) -> Vec<Result<(), RejectReason>>;

    /// Returns the cookies to send with a request to `origin`, most specific
    /// path first.
    ///
    /// Calling this twice with the same arguments and no mutation in between
    /// returns the same cookies in the same order.
    fn select(&self, origin: &CookieOrigin, now: OffsetDateTime) -> Vec<Cookie>;

    /// Removes every cookie expired at `now`. Returns the number removed.
    fn evict_expired(&mut self, now: OffsetDateTime) -> usize;

    /// Removes every session (non-persistent) cookie. Returns the number removed.
    fn clear_session(&mut self) -> usize;

    /// Removes the cookie with the given identity, if any.
    fn remove(&mut self, identity: &CookieIdentity) -> Option<Cookie>;

    /// Removes all cookies from the jar.
    fn clear(&mut self);

    /// Returns all stored cookies in insertion order.
    ///
    /// This is primarily intended for diagnostics/inspection.
    fn cookies(&self) -> Vec<Cookie>;
}

/// In-memory cookie jar driven by a [`CookieSpec`].
///
/// Cookies are kept in insertion order; a replaced cookie moves to the end.
/// That order is the tie-break when two selected cookies have equally long
/// paths.
#[derive(Debug)]
pub struct CookieStore {
    spec: Box<dyn CookieSpec>,
    entries: Vec<Cookie>,
}

impl CookieStore {
    /// Creates an empty store. Uses the default configuration when `config` is `None`.
    pub fn new(config: Option<CookieConfig>) -> Self {
        let config = config.unwrap_or_default();
        Self::with_spec(config.spec.build(config.limits))
    }

    /// Creates an empty store that applies `spec`.
    pub fn with_spec(spec: Box<dyn CookieSpec>) -> Self {
        Self {
            spec,
            entries: Vec::new(),
        }
    }

    pub fn spec(&self) -> &dyn CookieSpec {
        self.spec.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rejects a new (non-replacing) cookie when the store or its domain is full.
    fn check_capacity(&self, cookie: &Cookie) -> Result<(), RejectReason> {
        let limits = self.spec.limits();

        if self.entries.len() >= limits.max_cookies {
            return Err(RejectReason::StoreFull {
                limit: limits.max_cookies,
            });
        }

        let per_domain = self.entries.iter().filter(|c| c.domain() == cookie.domain()).count();
        if per_domain >= limits.max_cookies_per_domain {
            return Err(RejectReason::StoreFull {
                limit: limits.max_cookies_per_domain,
            });
        }

        Ok(())
    }

    fn reject(cookie: &Cookie, origin: &CookieOrigin, reason: RejectReason) -> Result<(), RejectReason> {
        log::warn!(
            "Rejected cookie {:?} for {} from {}: {}",
            cookie.name(),
            cookie.domain(),
            origin.host(),
            reason
        );
        Err(reason)
    }
}

impl Default for CookieStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl From<CookieStore> for CookieJarHandle {
    fn from(store: CookieStore) -> Self {
        Arc::new(RwLock::new(store))
    }
}

impl CookieJar for CookieStore {
    fn add(&mut self, cookie: Cookie, origin: &CookieOrigin, now: OffsetDateTime) -> Result<(), RejectReason> {
        if let Err(reason) = self.spec.validate(&cookie, origin) {
            return Self::reject(&cookie, origin, reason);
        }

        let identity = cookie.identity();
        let existing = self.entries.iter().position(|c| c.has_identity(&identity));

        if cookie.is_expired(now) {
            if let Some(idx) = existing {
                self.entries.remove(idx);
                log::debug!("Cookie {:?} for {}{} deleted by expired update", cookie.name(), cookie.domain(), cookie.path());
            }
            return Ok(());
        }

        match existing {
            Some(idx) => {
                self.entries.remove(idx);
                log::debug!("Cookie {:?} for {}{} replaced", cookie.name(), cookie.domain(), cookie.path());
            }
            None => {
                if let Err(reason) = self.check_capacity(&cookie) {
                    return Self::reject(&cookie, origin, reason);
                }
                log::debug!("Cookie {:?} for {}{} stored", cookie.name(), cookie.domain(), cookie.path());
            }
        }

        self.entries.push(cookie);
        Ok(())
    }

    fn store_response_cookies(
        &mut self,
        set_cookies: &[SetCookie],
        origin: &CookieOrigin,
        now: OffsetDateTime,
    ) -> Vec<Result<(), RejectReason>> {
        set_cookies
            .iter()
            .map(|attrs| match self.spec.make_cookie(attrs, origin, now) {
                Ok(cookie) => self.add(cookie, origin, now),
                Err(reason) => {
                    log::warn!("Rejected cookie {:?} from {}: {}", attrs.name, origin.host(), reason);
                    Err(reason)
                }
            })
            .collect()
    }

    fn select(&self, origin: &CookieOrigin, now: OffsetDateTime) -> Vec<Cookie> {
        let mut selected: Vec<Cookie> = self
            .entries
            .iter()
            .filter(|c| !c.is_expired(now) && self.spec.matches(c, origin))
            .cloned()
            .collect();

        self.spec.order(&mut selected);
        selected
    }

    fn evict_expired(&mut self, now: OffsetDateTime) -> usize {
        let before = self.entries.len();
        self.entries.retain(|c| !c.is_expired(now));

        let evicted = before - self.entries.len();
        if evicted > 0 {
            log::debug!("Evicted {} expired cookie(s)", evicted);
        }
        evicted
    }

    fn clear_session(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|c| c.is_persistent());

        let cleared = before - self.entries.len();
        log::debug!("Cleared {} session cookie(s)", cleared);
        cleared
    }

    fn remove(&mut self, identity: &CookieIdentity) -> Option<Cookie> {
        let idx = self.entries.iter().position(|c| c.has_identity(identity))?;
        Some(self.entries.remove(idx))
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn cookies(&self) -> Vec<Cookie> {
        self.entries.clone()
    }
}
