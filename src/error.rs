//! The errors returned by the client and its components

use crate::classifier::ErrorClass;
use crate::codec::Operation;

/// The payload sent back by the provider could not be turned into the expected structure.
///
/// This is never retried: it means the provider changed its contract or the schema is wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to decode {operation} response: {message}")]
pub struct DecodeError {
    pub operation: Operation,
    /// Wire path of the missing field, `None` when the payload is not valid JSON at all.
    pub field: Option<String>,
    pub message: String,
}

impl DecodeError {
    pub(crate) fn missing_field(operation: Operation, field: String) -> Self {
        Self {
            operation,
            message: format!("missing field `{field}`"),
            field: Some(field),
        }
    }

    pub(crate) fn malformed<M: std::fmt::Display>(operation: Operation, message: M) -> Self {
        Self {
            operation,
            field: None,
            message: message.to_string(),
        }
    }
}

/// The provider answered with a non success status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("remote error {status}: {message}")]
pub struct RemoteError {
    pub status: String,
    pub message: String,
    /// HTTP status code, only set when the response was not a 2xx.
    pub code: Option<u16>,
}

impl RemoteError {
    pub fn new<S: Into<String>, M: Into<String>>(status: S, message: M) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }
}

/// Failure of the transport layer, before a complete response could be read.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Unable to reach the server, the request was never delivered
    #[error("unable to connect: {0}")]
    Connect(String),
    /// No response arrived in time
    #[error("request timed out")]
    Timeout,
    /// The request could not be built or sent
    #[error("request failed: {0}")]
    Request(String),
    /// The response arrived but its body could not be read
    #[error("unable to read response body: {0}")]
    Body(String),
}

impl TransportError {
    /// Whether the failure happened before any response was received.
    ///
    /// Only those failures can be retried for operations that are not idempotent.
    pub fn is_before_response(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// All the failures a single attempt can produce
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The request parameters could not be serialized
    #[error("unable to encode request: {0}")]
    Encode(serde_json::Error),
    /// The caller aborted the operation
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// The final error returned by the [`Client`](crate::Client), once retries are over.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed after {attempts} attempt(s): {source}")]
pub struct ApiError {
    pub operation: Operation,
    /// Classification of the last failure, `None` when the operation was cancelled.
    pub class: Option<ErrorClass>,
    pub attempts: u32,
    #[source]
    pub source: Error,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        self.source.is_cancelled()
    }

    pub fn as_remote(&self) -> Option<&RemoteError> {
        self.source.as_remote()
    }
}
