use time::{Date, Duration, OffsetDateTime};

/// An already-tokenized `Set-Cookie` / `Set-Cookie2` attribute set.
///
/// Header parsing happens elsewhere; this is what the parser hands to the
/// engine. Every attribute besides name and value is optional, and the
/// [`CookieSpec`](crate::cookies::CookieSpec) in use decides what the absence
/// of each one means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// `Domain` attribute, verbatim (may carry a leading dot)
    pub domain: Option<String>,
    /// `Path` attribute, verbatim
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    /// `Expires` attribute, already parsed into an instant
    pub expires: Option<OffsetDateTime>,
    /// `Max-Age` attribute in seconds
    pub max_age: Option<i64>,
    /// `Version` attribute
    pub version: Option<u32>,
    /// `Comment` attribute
    pub comment: Option<String>,
}

impl SetCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    pub fn expires(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Resolves the absolute expiry, giving `Max-Age` precedence over `Expires`
    /// when `honor_max_age` is set.
    ///
    /// A non-positive `Max-Age` resolves to `now`, which makes the cookie expired
    /// on arrival. Values beyond the representable range saturate.
    pub(crate) fn resolve_expiry(&self, now: OffsetDateTime, honor_max_age: bool) -> Option<OffsetDateTime> {
        match self.max_age {
            Some(secs) if honor_max_age => {
                if secs <= 0 {
                    Some(now)
                } else {
                    Some(now.checked_add(Duration::seconds(secs)).unwrap_or_else(far_future))
                }
            }
            _ => self.expires,
        }
    }
}

fn far_future() -> OffsetDateTime {
    Date::MAX.midnight().assume_utc()
}
