//! Error types for the portal client.

/// Errors that can occur while logging in or calling a portal page method.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Credentials were rejected, the login form could not be found, or no
    /// session could be established.
    #[error("Login failed: {0}")]
    Login(String),
    /// The HTTP exchange itself failed (network error, timeout, bad URL).
    #[error("Request failed: {message}")]
    Request {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// The portal returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not valid JSON.
    #[error("Failed to parse response: {message}")]
    Data {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn request(message: impl Into<String>, source: reqwest::Error) -> Self {
        Error::Request {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Coarse classification used by callers that map errors onto their own
    /// status codes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Login(_) => ErrorKind::Login,
            Error::Request { .. } | Error::HttpStatus { .. } => ErrorKind::Request,
            Error::Data { .. } => ErrorKind::Data,
        }
    }
}

/// The four error categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not authenticated and unable to authenticate.
    Login,
    /// Transport failure or non-success HTTP status.
    Request,
    /// Remote data did not have the expected format.
    Data,
    /// Caller-supplied input was rejected before any request was made.
    Validation,
}

impl ErrorKind {
    /// HTTP status a gateway answers with when it surfaces this kind of error.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::Login => 401,
            ErrorKind::Request => 502,
            ErrorKind::Data | ErrorKind::Validation => 500,
        }
    }
}
