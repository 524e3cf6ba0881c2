//! Typed errors for the protocol client.

use std::io;

use thiserror::Error;

use rig_grammar::ValidationError;

/// Errors surfaced by the protocol client.
///
/// Nothing is retried internally; the only local recovery is
/// [`crate::Connection::reconnect`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// A transport-level failure: connect, write, or read.
    #[error("connection error: {context}")]
    Connection {
        /// What the client was doing when the transport failed.
        context: String,
        /// The underlying IO error, when one exists.
        #[source]
        source: Option<io::Error>,
    },

    /// The daemon reported a non-empty error for the active frame.
    #[error("daemon error: {0}")]
    Command(String),

    /// The caller violated the streaming-drain discipline.
    ///
    /// Always recoverable by draining the queued frames first.
    #[error("protocol usage error: {0}")]
    ProtocolUsage(String),

    /// A payload did not match its expected textual format.
    #[error("parse failure in {context}: {detail}")]
    Parse {
        /// The directory or payload being parsed.
        context: String,
        /// The offending content.
        detail: String,
    },

    /// A named mirror entry does not exist locally.
    #[error("no such file entry '{name}'")]
    MissingEntry {
        /// The requested entry name.
        name: String,
    },

    /// A client-side argument-shape mismatch; never reaches the wire.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request could not be encoded as JSON.
    #[error("failed to encode request: {0}")]
    Encode(serde_json::Error),
}

impl ClientError {
    /// Builds a transport error without an underlying IO source.
    #[must_use]
    pub fn connection(context: impl Into<String>) -> Self {
        Self::Connection {
            context: context.into(),
            source: None,
        }
    }

    /// Builds a transport error wrapping an IO source.
    #[must_use]
    pub fn connection_io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Connection {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Builds a parse error for a payload within the given context.
    #[must_use]
    pub fn parse(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            detail: detail.into(),
        }
    }
}
