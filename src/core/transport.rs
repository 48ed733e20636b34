//! Raw transport abstraction

use super::endpoint::Endpoint;
use super::error::TransportError;
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET for `endpoint` and returns the raw 2xx body.
    async fn send(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError>;
}
