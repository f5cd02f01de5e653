use std::array::TryFromSliceError;
use std::str::Utf8Error;

use thiserror::Error;

/// Everything that can go wrong while querying a single server.
///
/// Each query returns at most one of these; a failure for one server (or one
/// query kind) never propagates to any other.
#[derive(Debug, Error)]
pub enum SourceQueryError {
    #[error("could not resolve host: {0}")]
    AddressResolutionFailed(String),

    #[error("failed binding local socket: {0}")]
    FailedPortBind(#[source] std::io::Error),

    #[error("unreachable host: {0}")]
    UnreachableHost(#[source] std::io::Error),

    #[error("failed sending request: {0}")]
    SendError(#[source] std::io::Error),

    #[error("failed receiving response: {0}")]
    ReceiveError(#[source] std::io::Error),

    #[error("query deadline expired")]
    TimedOut(#[from] tokio::time::error::Elapsed),

    #[error("split packet not supported")]
    SplitPacket,

    #[error("unknown packet header: {0:#010x}")]
    UnknownPacketHeader(u32),

    #[error("unknown response type: {0:#04x}")]
    UnknownResponseType(u8),

    #[error("expected {expected} message, got {got}")]
    UnexpectedResponseType { expected: char, got: char },

    #[error("response truncated")]
    TruncatedData,

    #[error("string field is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("malformed field: {0}")]
    MalformedField(#[from] TryFromSliceError),

    #[error("no usable reply after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<SourceQueryError>,
    },

    #[error("query worker failed: {0}")]
    Worker(String),
}

impl SourceQueryError {
    /// True for failures worth another round inside the retry budget.
    /// Deadline expiry is final: once the shared deadline has passed no
    /// further attempt can succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SourceQueryError::TimedOut(_))
    }
}

/// Failure to load or parse the server list. The only fatal error class:
/// without a config there is nothing to query.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed parsing config: {0}")]
    Parse(#[from] serde_json::Error),
}
