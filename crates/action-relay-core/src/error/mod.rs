use error_location::ErrorLocation;
use thiserror::Error;

/// Relay errors with source location tracking.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The TCP listener could not be bound.
    #[error("Failed to bind port {port}: {source} {location}")]
    Bind {
        /// Port that was requested.
        port: u16,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Socket or filesystem IO failed.
    #[error("IO error: {source} {location}")]
    Io {
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Catalog persistence failed.
    #[error("Catalog storage error: {reason} {location}")]
    Storage {
        /// Description of the storage failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A message could not be encoded or a peer broke the wire protocol.
    #[error("Protocol error: {reason} {location}")]
    Protocol {
        /// Description of the protocol failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An inbound line exceeded the frame size limit.
    #[error("Frame too large: more than {limit} bytes without a newline {location}")]
    FrameTooLarge {
        /// Maximum accepted frame size in bytes.
        limit: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The input-injection backend failed.
    #[error("Input injection failed: {reason} {location}")]
    Input {
        /// Description of the injection failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The relay event loop is no longer running.
    #[error("Relay service unavailable: {reason} {location}")]
    ServiceUnavailable {
        /// Why the request could not be delivered.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for RelayError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RelayError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`RelayError`].
pub type Result<T> = std::result::Result<T, RelayError>;
