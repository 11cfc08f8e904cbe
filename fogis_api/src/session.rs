//! Credentials, session cookies and the authentication state they move through.

use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

use reqwest::cookie::Cookie;

use serde::{Deserialize, Serialize};

/// Cookie set by the portal on a successful login. Its presence is the only
/// reliable success signal.
pub const AUTH_COOKIE: &str = "FogisMobilDomarKlient.ASPXAUTH";

/// ASP.NET session identifier cookie.
pub const SESSION_COOKIE: &str = "ASP.NET_SessionId";

/// Cookie the portal's consent banner expects before it accepts a login post.
pub(crate) const CONSENT_COOKIE: (&str, &str) = ("cookieconsent_status", "dismiss");

/// Portal username and password. Passed through verbatim.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque cookie set that represents an authenticated session.
///
/// Nothing about expiry is tracked locally; a stale token is only noticed
/// when a later call fails.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(BTreeMap<String, String>);

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a cookie.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the token carries the portal's authentication cookie.
    pub fn is_authenticated(&self) -> bool {
        self.contains(AUTH_COOKIE)
    }

    /// Renders the cookies as the value of a `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Merges cookies set by a response into this token. A cookie the
    /// response clears is removed.
    pub(crate) fn absorb(&mut self, response: &reqwest::Response) {
        for cookie in response.cookies() {
            if is_cleared(&cookie) {
                self.0.remove(cookie.name());
            } else {
                self.insert(cookie.name(), cookie.value());
            }
        }
    }
}

/// Whether a `Set-Cookie` deletes the cookie instead of setting it: an empty
/// value, a zero max-age or an expiry in the past.
pub(crate) fn is_cleared(cookie: &Cookie<'_>) -> bool {
    cookie.value().is_empty()
        || cookie.max_age().is_some_and(|age| age.is_zero())
        || cookie.expires().is_some_and(|at| at <= SystemTime::now())
}

impl<K, V> FromIterator<(K, V)> for SessionToken
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// Cookie values are bearer secrets; only names are shown.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// Progress of the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    FetchingLoginForm,
    SubmittingCredentials,
    Authenticated,
    Failed,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AuthState::Unauthenticated => "unauthenticated",
                AuthState::FetchingLoginForm => "fetching-login-form",
                AuthState::SubmittingCredentials => "submitting-credentials",
                AuthState::Authenticated => "authenticated",
                AuthState::Failed => "failed",
            }
        )
    }
}

/// Session state owned by exactly one transport.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) state: AuthState,
    pub(crate) token: Option<SessionToken>,
}

impl Session {
    /// A session that still has to log in.
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    /// A session seeded with cookies from an earlier login. The cookies are
    /// not checked here; an expired set shows up on the first call.
    pub fn from_token(token: SessionToken) -> Self {
        Self {
            state: AuthState::Authenticated,
            token: Some(token),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }
}
