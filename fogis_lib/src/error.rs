//! Error types for the library layer.

use std::fmt;

use fogis_api::{ErrorKind, Shape};

/// Errors produced by the library layer, wrapping wire errors and adding
/// response-shape and caller-input failures.
#[derive(Debug)]
pub enum FogisError {
    /// An error from the underlying transport or login flow.
    Api(fogis_api::Error),
    /// The portal answered with a payload of the wrong shape for the endpoint.
    UnexpectedShape {
        endpoint: &'static str,
        expected: Shape,
        found: &'static str,
    },
    /// Caller-provided input failed validation. Raised before any request.
    InvalidInput(String),
    /// A match list filter had one or more invalid fields.
    InvalidFilter(Vec<String>),
}

impl FogisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(e) => e.kind(),
            Self::UnexpectedShape { .. } => ErrorKind::Data,
            Self::InvalidInput(_) | Self::InvalidFilter(_) => ErrorKind::Validation,
        }
    }
}

impl fmt::Display for FogisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::UnexpectedShape {
                endpoint,
                expected,
                found,
            } => write!(
                f,
                "Unexpected response from {}: expected {} but got {}",
                endpoint, expected, found
            ),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::InvalidFilter(problems) => write!(f, "Invalid filter: {}", problems.join("; ")),
        }
    }
}

impl std::error::Error for FogisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<fogis_api::Error> for FogisError {
    fn from(e: fogis_api::Error) -> Self {
        Self::Api(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_four_categories() {
        let login = FogisError::from(fogis_api::Error::Login("bad password".into()));
        assert_eq!(login.kind(), ErrorKind::Login);
        assert_eq!(login.kind().http_status(), 401);

        let shape = FogisError::UnexpectedShape {
            endpoint: "GetMatch",
            expected: Shape::Object,
            found: "list",
        };
        assert_eq!(shape.kind(), ErrorKind::Data);
        assert_eq!(
            shape.to_string(),
            "Unexpected response from GetMatch: expected object but got list"
        );

        let filter = FogisError::InvalidFilter(vec!["a".into(), "b".into()]);
        assert_eq!(filter.kind(), ErrorKind::Validation);
        assert_eq!(filter.to_string(), "Invalid filter: a; b");
    }

    #[test]
    fn api_errors_keep_their_source() {
        use std::error::Error as _;
        let err = FogisError::from(fogis_api::Error::HttpStatus {
            status: 502,
            body: String::new(),
        });
        assert!(err.source().is_some());
        assert_eq!(err.kind().http_status(), 502);
    }
}
