/// Caller contract violations. These are bugs in the calling code (an origin
/// without a host, a relative request path, an unknown spec name) and are
/// reported before any cookie is looked at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
    #[error("Request host is empty")]
    EmptyHost,

    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    #[error("Unknown cookie specification: {0}")]
    UnknownSpec(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a single candidate cookie was not stored.
///
/// Rejections are local to one cookie. They are never fatal and never affect
/// other cookies received in the same response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("Domain {domain:?} is not valid for host {host:?}")]
    DomainMismatch { domain: String, host: String },

    #[error("Path {path:?} does not match request path {request_path:?}")]
    PathInvalid { path: String, request_path: String },

    #[error("Invalid attribute combination: {0}")]
    InvalidAttributeCombination(String),

    #[error("Cookie too large: {size} bytes (limit {limit})")]
    CookieTooLarge { size: usize, limit: usize },

    #[error("Cookie store full (limit {limit})")]
    StoreFull { limit: usize },
}
