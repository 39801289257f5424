use serde::{Deserialize, Serialize};

use crate::cookies::SpecKind;
use crate::errors::CookieError;

/// Upper bound for `name.len() + value.len()` of a single cookie.
const DEFAULT_MAX_COOKIE_SIZE: usize = 4096;
/// Upper bound for the number of cookies in one store.
const DEFAULT_MAX_COOKIES: usize = 3000;
/// Upper bound for the number of cookies sharing one domain.
const DEFAULT_MAX_COOKIES_PER_DOMAIN: usize = 50;

/// Resource limits enforced while accepting cookies.
///
/// These bound the memory a misbehaving server can make the store use.
/// Exceeding any of them rejects the offending cookie, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieLimits {
    /// Maximum size in bytes of name plus value
    pub max_cookie_size: usize,
    /// Maximum number of cookies in a store
    pub max_cookies: usize,
    /// Maximum number of cookies per (normalized) domain
    pub max_cookies_per_domain: usize,
}

impl Default for CookieLimits {
    fn default() -> Self {
        Self {
            max_cookie_size: DEFAULT_MAX_COOKIE_SIZE,
            max_cookies: DEFAULT_MAX_COOKIES,
            max_cookies_per_domain: DEFAULT_MAX_COOKIES_PER_DOMAIN,
        }
    }
}

/// Cookie store configuration.
///
/// Missing fields fall back to their defaults, so `{}` is a valid
/// configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Which specification policy the store applies
    pub spec: SpecKind,
    /// Size and count limits
    pub limits: CookieLimits,
}

impl CookieConfig {
    /// Reads a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CookieError> {
        serde_json::from_str(json).map_err(|e| CookieError::Config(e.to_string()))
    }
}
