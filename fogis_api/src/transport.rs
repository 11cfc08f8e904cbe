//! Authenticated page-method calls with lazy login.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE, ORIGIN, REFERER};
use reqwest::redirect::Policy;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    auth::{truncate_body, Authenticator},
    config::ClientConfig,
    endpoint::Method,
    session::{AuthState, Credentials, Session, SessionToken},
    types::Payload,
    Error,
};

const JSON_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Issues page-method calls against the portal on behalf of one session.
///
/// The first call made without a session token logs in with the stored
/// credentials. The session sits behind an async mutex that is held for the
/// whole login, so concurrent first calls share one login instead of racing
/// to create two sessions. Every call is a single attempt.
pub struct RpcTransport {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: Option<Credentials>,
    authenticator: Authenticator,
    session: Mutex<Session>,
}

impl RpcTransport {
    /// Creates a transport that logs in lazily with `credentials`.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, Error> {
        Self::build(config, Some(credentials), Session::unauthenticated())
    }

    /// Creates a transport that reuses cookies from an earlier session.
    pub fn with_token(config: ClientConfig, token: SessionToken) -> Result<Self, Error> {
        Self::build(config, None, Session::from_token(token))
    }

    /// Creates a transport holding both: the cookies are used until the
    /// caller decides to log in again.
    pub fn with_credentials_and_token(
        config: ClientConfig,
        credentials: Credentials,
        token: SessionToken,
    ) -> Result<Self, Error> {
        Self::build(config, Some(credentials), Session::from_token(token))
    }

    fn build(
        config: ClientConfig,
        credentials: Option<Credentials>,
        session: Session,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::request("failed to build HTTP client", e)
            })?;
        let authenticator = Authenticator::new(http.clone(), config.clone());
        Ok(Self {
            http,
            config,
            credentials,
            authenticator,
            session: Mutex::new(session),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current authentication state.
    pub async fn state(&self) -> AuthState {
        self.session.lock().await.state()
    }

    /// Cookies of the current session, if any.
    pub async fn token(&self) -> Option<SessionToken> {
        self.session.lock().await.token.clone()
    }

    /// Logs in unless a session token is already held, and returns the token.
    pub async fn login(&self) -> Result<SessionToken, Error> {
        let mut session = self.session.lock().await;
        if let Some(token) = &session.token {
            tracing::debug!("Already authenticated, using existing cookies");
            return Ok(token.clone());
        }
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            tracing::error!("Login failed: no credentials provided and no cookies available");
            Error::Login("no credentials provided and no cookies available".to_string())
        })?;

        let token = self
            .authenticator
            .authenticate(credentials, &mut session.state)
            .await?;
        session.token = Some(token.clone());
        Ok(token)
    }

    /// Returns a usable token, logging in first when none is held.
    async fn ensure_token(&self) -> Result<SessionToken, Error> {
        let mut session = self.session.lock().await;
        if let Some(token) = &session.token {
            return Ok(token.clone());
        }

        tracing::info!("Not logged in, performing automatic login");
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            tracing::error!("Automatic login impossible: no credentials and no cookies");
            Error::Login("not authenticated and no credentials available".to_string())
        })?;
        let token = self
            .authenticator
            .authenticate(credentials, &mut session.state)
            .await
            .inspect_err(|e| tracing::error!("Automatic login failed: {}", e))?;
        if token.is_empty() {
            tracing::error!("Automatic login failed: no cookies were returned");
            session.state = AuthState::Failed;
            return Err(Error::Login("automatic login failed".to_string()));
        }
        session.token = Some(token.clone());
        Ok(token)
    }

    /// Calls a page method and returns its unwrapped payload.
    ///
    /// `path` is relative to the base URL (see [`crate::Endpoint::path`]).
    /// POST sends `payload` as the JSON body; GET sends the members of an
    /// object payload as query parameters.
    pub async fn call(
        &self,
        path: &str,
        payload: Option<&Value>,
        method: Method,
    ) -> Result<Payload, Error> {
        let token = self.ensure_token().await?;
        let url = self.config.url(path);

        tracing::debug!("Making {:?} request to {}", method, path);
        let request = match method {
            Method::Post => {
                let body = payload
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Default::default()));
                self.http.post(&url).json(&body)
            }
            Method::Get => self.http.get(&url).query(&query_pairs(payload)),
        };
        let resp = request
            .headers(self.rpc_headers(&token))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("API request to {} failed: {}", path, e);
                Error::request(format!("API request to {} failed", path), e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", path, e);
            Error::request(format!("failed to read response from {}", path), e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!(
                "Request to {} failed with status {}: {}",
                path,
                status,
                snippet
            );
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        if body.trim().is_empty() {
            tracing::debug!("Empty response body from {}", path);
            return Ok(Payload::Empty);
        }

        let parsed = serde_json::from_str::<Value>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!(
                "Failed to parse response from {}: {} | body: {}",
                path,
                e,
                snippet
            );
            Error::Data {
                message: format!("response from {} is not JSON", path),
                source: e,
            }
        })?;
        tracing::debug!("Received response from {}", path);

        Ok(Payload::from_envelope(parsed))
    }

    fn rpc_headers(&self, token: &SessionToken) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_ACCEPT));
        headers.insert(
            "x-requested-with",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        if let Ok(origin) = HeaderValue::from_str(&self.config.origin()) {
            headers.insert(ORIGIN, origin);
        }
        if let Ok(referer) = HeaderValue::from_str(&format!("{}/", self.config.base_url)) {
            headers.insert(REFERER, referer);
        }
        match HeaderValue::from_str(&token.cookie_header()) {
            Ok(cookie) => {
                headers.insert(COOKIE, cookie);
            }
            Err(_) => tracing::warn!("Session cookies contain characters not allowed in a header"),
        }
        headers
    }
}

/// Flattens an object payload into query parameters. Strings are sent
/// unquoted, everything else as its JSON text.
fn query_pairs(payload: Option<&Value>) -> Vec<(String, String)> {
    let Some(Value::Object(map)) = payload else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}
