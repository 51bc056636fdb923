use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tunwire.
///
/// Every failure a tunnel endpoint can hit is a value the caller gets
/// back; nothing in this crate terminates the process.
#[derive(Debug, Error)]
pub enum Error {
    /// The tunnel control device or socket could not be opened.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(#[source] io::Error),

    /// The kernel rejected the tunnel interface configuration.
    #[error("tunnel interface registration failed: {0}")]
    RegistrationFailed(#[source] io::Error),

    /// Binding the socket to its local port failed.
    #[error("bind failed: {0}")]
    BindFailed(#[source] io::Error),

    /// Fixing the socket's remote peer failed at the syscall level.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] io::Error),

    /// The peer address text did not parse as a dotted-quad IPv4 address.
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),

    /// The requested interface name is too long or contains a NUL byte.
    #[error("invalid interface name: {0:?}")]
    InvalidName(String),

    /// The transport's peer is already fixed; reconnect is not supported.
    #[error("peer already set")]
    PeerAlreadySet,

    /// The descriptor is non-blocking and the operation would block.
    #[error("operation would block")]
    WouldBlock,

    /// A write made no progress before completing.
    #[error("partial write: {written} of {requested} bytes")]
    PartialWrite { written: usize, requested: usize },

    /// A read or write syscall reported failure.
    #[error("{op} failed: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}
