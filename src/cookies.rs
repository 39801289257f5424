// src/cookies.rs
//! Cookies: [`Cookie`], [`CookieSpec`] policies and the [`CookieStore`] engine.

mod cookies;
mod cookie_jar;
mod matcher;
mod origin;
mod set_cookie;
mod spec;

pub use cookies::Cookie;
pub use cookies::CookieBuilder;
pub use cookies::CookieIdentity;

pub use cookie_jar::CookieJar;
pub use cookie_jar::CookieJarHandle;
pub use cookie_jar::CookieStore;

pub use matcher::domain_matches;
pub use matcher::path_matches;

pub use origin::CookieOrigin;
pub use set_cookie::SetCookie;

pub use spec::BestMatchSpec;
pub use spec::CookieSpec;
pub use spec::NetscapeSpec;
pub use spec::Rfc2965Spec;
pub use spec::Rfc6265Spec;
pub use spec::SpecKind;
