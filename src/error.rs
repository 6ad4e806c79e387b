//! Error types for the time server.

use thiserror::Error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum Error {
    /// The time zone flag does not name a known zone.
    #[error("invalid time zone: {name}")]
    InvalidTimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },

    /// The listener could not be bound.
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a connection failed.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    /// The gRPC-only transport stopped with an error.
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}
