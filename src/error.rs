//! Error types for fws-ui.
//!
//! One [`Error`] enum covers everything a caller can observe: transport
//! failures, handshake problems, exhausted retries and misuse of an unbound
//! window. Wire-level decode failures have their own type,
//! [`DecodeError`](crate::protocol::DecodeError), because they are recovered
//! from internally and never reach the application.

use std::io;

use thiserror::Error;

/// Errors returned by the toolkit.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying I/O failure on the transport.
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),

    /// The window server answered the handshake with an unexpected token.
    #[error("handshake failed: expected READY, received {received:?}")]
    Handshake {
        /// The bytes the server sent, lossily decoded.
        received: String,
    },

    /// The server closed the connection while a reply was expected.
    #[error("connection closed by the window server")]
    ConnectionClosed,

    /// A request was written `attempts` times without an acknowledgement.
    #[error("no acknowledgement after {attempts} attempts")]
    Timeout {
        /// Number of writes performed.
        attempts: u32,
    },

    /// A frame header announced more bytes than the codec accepts.
    #[error("frame of {len} bytes exceeds the maximum frame length")]
    FrameTooLarge {
        /// Announced payload length.
        len: usize,
    },

    /// An outbound payload exceeds the maximum frame length. Nothing was
    /// written, so the connection is still usable.
    #[error("request payload of {len} bytes exceeds the maximum frame length")]
    PayloadTooLarge {
        /// Encoded payload length.
        len: usize,
    },

    /// The inbound classification loop died on an I/O error.
    #[error("transport failed: {reason}")]
    TransportFailed {
        /// Description of the failure.
        reason: String,
    },

    /// A window operation needed a layer id but the window is not bound.
    #[error("window is not bound to a layer")]
    NotBound,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error means the connection is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::ConnectionClosed | Self::FrameTooLarge { .. } | Self::TransportFailed { .. }
        )
    }
}
