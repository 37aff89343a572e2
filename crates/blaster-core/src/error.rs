//! Error types for request handling.
//!
//! [`ContextError`] covers every way a [`Context`](crate::Context) helper can
//! fail: reading the body, parsing forms, looking up path values, converting
//! extracted text and writing the response.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`ContextError`].
pub type ContextResult<T> = Result<T, ContextError>;

/// Errors raised by context helpers and value conversions.
///
/// # Example
///
/// ```
/// use blaster_core::ContextError;
/// use http::StatusCode;
///
/// let err = ContextError::MissingParam("id".to_string());
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.to_string(), "path parameter 'id' not found");
/// ```
#[derive(Debug, Error)]
pub enum ContextError {
    /// The request carried no body.
    #[error("request body is empty")]
    MissingBody,

    /// The body was not valid JSON for the target type.
    #[error("invalid JSON body: {0}")]
    Json(#[source] serde_json::Error),

    /// The query string or urlencoded body could not be parsed.
    #[error("invalid form data: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// No path parameter was bound under the requested name.
    #[error("path parameter '{0}' not found")]
    MissingParam(String),

    /// Extracted text could not be parsed as the requested type.
    #[error("cannot convert '{value}' to {target}")]
    Conversion {
        /// The text that failed to parse.
        value: String,
        /// Name of the target type.
        target: &'static str,
    },

    /// A response value could not be serialized.
    #[error("failed to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A header name or value was not valid HTTP.
    #[error("invalid header '{name}'")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

impl ContextError {
    /// Creates a conversion error.
    #[must_use]
    pub fn conversion(value: impl Into<String>, target: &'static str) -> Self {
        Self::Conversion {
            value: value.into(),
            target,
        }
    }

    /// Returns the HTTP status a handler would typically answer with.
    ///
    /// Failures caused by the request map to 400, failures producing the
    /// response map to 500.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingBody
            | Self::Json(_)
            | Self::Form(_)
            | Self::MissingParam(_)
            | Self::Conversion { .. } => StatusCode::BAD_REQUEST,
            Self::Serialize(_) | Self::InvalidHeader { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ContextError::MissingBody.to_string(), "request body is empty");
        assert_eq!(
            ContextError::conversion("abc", "i64").to_string(),
            "cannot convert 'abc' to i64"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ContextError::MissingBody.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ContextError::InvalidHeader { name: "x".into() }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        assert_eq!(ContextError::Json(json_err).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_form_error_converts() {
        let form_err = serde_urlencoded::from_str::<Vec<(u8, u8)>>("a=b").unwrap_err();
        let err: ContextError = form_err.into();
        assert!(matches!(err, ContextError::Form(_)));
    }
}
