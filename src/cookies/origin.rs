use url::Url;

use crate::errors::CookieError;

/// The request context a cookie is received over or selected for.
///
/// The transport layer builds one of these per request. Construction is where
/// the caller contract is enforced: there is no way to obtain an origin with an
/// empty host or a relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOrigin {
    host: String,
    path: String,
    secure: bool,
}

impl CookieOrigin {
    /// Creates an origin from its parts.
    ///
    /// The host is lowercased and a trailing dot is removed. An empty path is
    /// treated as `/`.
    pub fn new(host: &str, path: &str, secure: bool) -> Result<Self, CookieError> {
        let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return Err(CookieError::EmptyHost);
        }

        let path = if path.is_empty() { "/" } else { path };
        if !path.starts_with('/') {
            return Err(CookieError::InvalidPath(path.to_string()));
        }

        Ok(Self {
            host,
            path: path.to_string(),
            secure,
        })
    }

    /// Creates an origin from a request URL. `https` and `wss` count as secure.
    pub fn from_url(url: &Url) -> Result<Self, CookieError> {
        let host = url.host_str().ok_or(CookieError::EmptyHost)?;
        // IPv6 literals come back bracketed from host_str()
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let secure = matches!(url.scheme(), "https" | "wss");

        Self::new(host, url.path(), secure)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }
}
