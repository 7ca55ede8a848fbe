use std::path::PathBuf;

/// Result type alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error types
///
/// Only the startup errors (`AlreadyStarted`, `Bind`, `ReadyFile`) ever
/// reach the lifecycle caller; the rest are contained where they occur.
/// A corrupt stream closes one connection, a bad image skips one frame.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Server started twice, or restarted after a stop
    #[error("server already started")]
    AlreadyStarted,

    /// Listening endpoint could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Readiness file could not be written after bind
    #[error("failed to write ready file {path}: {source}")]
    ReadyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Declared message length above the wire ceiling
    #[error("message length {len} exceeds the {max} byte limit")]
    OversizedMessage { len: usize, max: usize },

    /// Declared message length of zero (not even a tag byte)
    #[error("zero-length message envelope")]
    EmptyMessage,

    /// Payload of a recognized tag failed to deserialize
    #[error("malformed message payload: {0}")]
    MalformedPayload(#[from] postcard::Error),

    /// Frame bytes did not decode as an image
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
