//! Error types for the CyberGlove driver

use std::net::Ipv4Addr;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// CyberGlove driver error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Host address text is not an IPv4 address
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    /// Host address is not assigned to any local interface
    #[error("Address {0} is not assigned to any local network interface")]
    AddressNotLocal(Ipv4Addr),

    /// Waiting for the glove was aborted by the caller
    #[error("Waiting for glove connection was cancelled")]
    Cancelled,

    /// Glove connected but did not acknowledge with `o`
    #[error("Glove handshake failed: expected \"o\", got {received:?}")]
    HandshakeFailed {
        /// Bytes actually received as the first message
        received: Vec<u8>,
    },

    /// `connect` called while a connection is already held
    #[error("Glove is already connected")]
    AlreadyConnected,

    /// Operation needs a live connection but none is held
    #[error("No glove connected")]
    Disconnected,

    /// Peer closed the connection while a reply was expected
    #[error("Glove closed the connection (empty response)")]
    EmptyResponse,

    /// Transport fault
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or undersized reply to a query command
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Dataset frames stayed corrupted after every retransmission
    #[error("Dataset resynchronization failed after {attempts} retransmissions")]
    ResyncFailed {
        /// Number of retransmissions performed
        attempts: u32,
    },

    /// Command text is not 1-2 printable ASCII characters
    #[error("Invalid command: {0:?}")]
    InvalidCommand(String),

    /// Sampling already running on this session
    #[error("Sampling session is already running")]
    SessionActive,

    /// Dataset sink rejected a dataset
    #[error("Dataset sink error: {0}")]
    Sink(String),

    /// Background thread panicked
    #[error("Sampling thread panicked")]
    ThreadPanic,

    /// Configuration could not be parsed or written
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl Error {
    /// True for errors after which the connection can no longer be used
    pub fn is_fatal_to_link(&self) -> bool {
        matches!(self, Error::Io(_) | Error::EmptyResponse)
    }
}
