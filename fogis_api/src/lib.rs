//! Wire-level client for the FOGIS referee portal.
//!
//! The portal is an ASP.NET WebForms site without a public API. This crate
//! logs in by replaying the login form, keeps the resulting cookies, and
//! calls the site's JSON page methods, unwrapping their `{"d": ...}`
//! envelopes.

pub mod auth;
mod config;
mod endpoint;
mod errors;
mod query;
pub mod session;
mod transport;
pub mod types;
pub use self::auth::Authenticator;
pub use self::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use self::endpoint::{Endpoint, Method};
pub use self::errors::{Error, ErrorKind};
pub use self::query::{
    MatchListQuery, DEFAULT_AGE_CATEGORIES, DEFAULT_DAYS_AHEAD, DEFAULT_DAYS_BACK,
    DEFAULT_GENDERS, DEFAULT_STATUSES,
};
pub use self::session::{
    AuthState, Credentials, Session, SessionToken, AUTH_COOKIE, SESSION_COOKIE,
};
pub use self::transport::RpcTransport;
pub use self::types::{Payload, Record, Shape};
