//! Error types shared by the manager's collaborators.

use thiserror::Error;

/// Failures talking to the remote todo source.
///
/// Every variant means the same thing to the manager: the remote is
/// unavailable and local state stays authoritative.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("Remote request failed: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error("Remote returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("Remote response could not be decoded: {0}")]
    Decode(String),
}

/// Failures reading or writing persisted records.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// A record could not be encoded.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
