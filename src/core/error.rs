//! Error taxonomy for talking to the exchange-rate API

use thiserror::Error;

/// Failure to obtain a well-formed response body for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint could not be composed into a valid URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The configured base URL is not a usable absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered outside the 2xx range.
    #[error("HTTP status code: {0}")]
    StatusCode(u16),

    /// No well-formed response came back (connect failure, timeout, truncated body).
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The server answered 2xx with an empty body.
    #[error("Empty response body")]
    EmptyData,

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Failure of a typed fetch: either the transport or the payload decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

impl FetchError {
    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }
}
