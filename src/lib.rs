//! HTTP state-management cookies for the gosub engine.
//!
//! The crate decides, for every response, whether a received cookie may be
//! stored and what it replaces, and for every request, which stored cookies
//! apply. Header parsing, header formatting and persistence belong to the
//! transport layer; this crate works on already-tokenized attributes and
//! [`cookies::Cookie`] values.
//!
//! - [`cookies`]: the cookie type, matching predicates, specification
//!   policies and the [`cookies::CookieStore`] engine.
//! - [`config`]: store configuration and limits.
//! - [`errors`]: contract violations and per-cookie rejection reasons.

pub mod config;
pub mod cookies;
pub mod errors;

pub use config::{CookieConfig, CookieLimits};
pub use errors::{CookieError, RejectReason};
