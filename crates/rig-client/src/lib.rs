//! Protocol client for a running rig orchestration daemon.
//!
//! The daemon listens on a Unix domain socket and speaks a compact JSON
//! protocol: each request is one `{"Command": .., "Args": [..]}` object
//! written without a length prefix or delimiter, and each response is one
//! JSON array of frames, framed only by the fact that the array as a whole
//! becomes valid JSON once fully received. [`Connection`] owns the socket
//! and the streaming-response state machine; [`FileMirror`] is a secondary
//! consumer that mirrors the daemon's hierarchical file listing.
//!
//! The client is single-connection, single-request-in-flight. There is no
//! retry policy at this layer: commands may have side effects on the
//! daemon, so every transport failure surfaces to the caller as a typed
//! [`ClientError`] and recovery is limited to [`Connection::reconnect`].

mod connection;
mod error;
mod files;
mod frame;

pub use connection::{Connection, DEFAULT_TIMEOUT, Drain};
pub use error::ClientError;
pub use files::{FileEntry, FileMirror};
pub use frame::Frame;

#[cfg(test)]
mod tests;
