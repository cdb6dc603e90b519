//! Error types for the image server client.

use thiserror::Error;

/// Errors from the image server client.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// HTTP transport failure or non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The registration handshake failed; without a client id no images
    /// can be fetched.
    #[error("failed to register with image server: {0}")]
    Registration(String),

    /// The server answered with something the client cannot use.
    #[error("invalid server response: {0}")]
    InvalidResponse(String),
}
