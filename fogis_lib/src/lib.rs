//! Library layer for the FOGIS referee portal: typed operations, input
//! validation and match list filtering.
//!
//! Wraps the `fogis_api` wire crate, which handles login, cookies and the
//! page-method envelope.

pub mod client;
pub mod error;
pub mod filter;
pub mod validation;

pub use fogis_api;
pub use fogis_api::types;
pub use fogis_api::{
    AuthState, ClientConfig, Credentials, Endpoint, ErrorKind, MatchListQuery, Payload, Record,
    SessionToken, Shape, AUTH_COOKIE, SESSION_COOKIE,
};

pub use client::{FogisClient, MatchResult};
pub use error::FogisError;
pub use filter::{FieldFilter, MatchFilter, MatchListFilter};
pub use validation::IdInput;
