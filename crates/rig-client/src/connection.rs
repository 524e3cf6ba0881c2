//! Socket session and streaming-response state machine.
//!
//! The wire protocol has no length prefix, so the only safe generic
//! strategy on receive is to keep appending bytes and retry a whole-buffer
//! parse; each complete JSON document parses atomically once fully
//! buffered. The O(n) re-parsing of the growing buffer is acceptable
//! because messages are small and interactive.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use socket2::{Domain, SockAddr, Socket, Type};
use tracing::{debug, trace, warn};

use crate::error::ClientError;
use crate::frame::Frame;

/// Idle timeout applied to the socket when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed chunk size for socket reads.
const READ_BLOCK_SIZE: usize = 4096;

#[derive(Serialize)]
struct Request<'a> {
    #[serde(rename = "Command")]
    command: &'a str,
    #[serde(rename = "Args")]
    args: &'a [String],
}

/// An exclusive session with the daemon over a Unix domain socket.
///
/// A connection has at most one request in flight and is not safe for
/// concurrent use; callers needing concurrent sessions open independent
/// connections. The socket's lifetime is the connection's lifetime.
#[derive(Debug)]
pub struct Connection {
    stream: UnixStream,
    path: Utf8PathBuf,
    timeout: Duration,
    pending: VecDeque<Frame>,
    streaming_outstanding: bool,
    more_expected: bool,
}

impl Connection {
    /// Connects to the daemon socket at `path` with the default idle
    /// timeout.
    pub fn connect(path: impl AsRef<Utf8Path>) -> Result<Self, ClientError> {
        Self::connect_with_timeout(path, DEFAULT_TIMEOUT)
    }

    /// Connects to the daemon socket at `path` with the given idle
    /// timeout.
    ///
    /// Socket errors are fatal to the attempt; nothing is retried.
    pub fn connect_with_timeout(
        path: impl AsRef<Utf8Path>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let socket_path = path.as_ref().to_path_buf();
        let stream = open_stream(&socket_path, timeout)?;
        debug!(socket = %socket_path, "connected to daemon");
        Ok(Self {
            stream,
            path: socket_path,
            timeout,
            pending: VecDeque::new(),
            streaming_outstanding: false,
            more_expected: false,
        })
    }

    /// Returns the socket path this connection was opened with.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the configured idle timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether streamed frames from a prior request remain
    /// unread.
    #[must_use]
    pub const fn streaming_outstanding(&self) -> bool {
        self.streaming_outstanding
    }

    /// Returns the number of frames currently queued.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Sends a command and returns the first response frame.
    ///
    /// When the response carries more than one frame, or its final frame
    /// signals continuation, the surplus frames are queued and
    /// [`Self::streaming_outstanding`] becomes true; they must be read
    /// through [`Self::drain`] before the next request. A non-empty error
    /// on the returned frame fails with [`ClientError::Command`]; queued
    /// frames keep their own error state for lazy inspection.
    pub fn run(&mut self, command: &str, args: &[String]) -> Result<Frame, ClientError> {
        self.send_request(command, args)?;
        let frames = self.receive_document()?;
        self.more_expected = frames.last().is_some_and(|frame| frame.more);
        let mut iter = frames.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| ClientError::connection("empty response document"))?;
        self.pending.extend(iter);
        if !self.pending.is_empty() || self.more_expected {
            self.streaming_outstanding = true;
        }
        first.into_result()
    }

    /// Sends a command with declared streaming intent.
    ///
    /// Nothing is returned synchronously; every frame of the response is
    /// queued for [`Self::drain`].
    pub fn run_streamed(&mut self, command: &str, args: &[String]) -> Result<(), ClientError> {
        self.send_request(command, args)?;
        let frames = self.receive_document()?;
        self.more_expected = frames.last().is_some_and(|frame| frame.more);
        self.pending.extend(frames);
        self.streaming_outstanding = true;
        Ok(())
    }

    /// Returns a lazy, finite, one-shot iterator over the queued frames.
    ///
    /// Frames are dequeued as they are yielded; while the last seen frame
    /// signals continuation, further response documents are read from the
    /// socket. Exhaustion clears the streaming-outstanding state. Calling
    /// this again on an empty queue yields an empty sequence; drained
    /// frames are never replayed.
    pub const fn drain(&mut self) -> Drain<'_> {
        Drain { connection: self }
    }

    /// Closes the current socket (ignoring close errors) and reconnects
    /// with the original path and timeout.
    ///
    /// Any undrained streamed output is discarded: callers must treat
    /// this as a data-loss event, not silent success.
    pub fn reconnect(&mut self) -> Result<(), ClientError> {
        if !self.pending.is_empty() || self.more_expected {
            warn!(
                discarded = self.pending.len(),
                "reconnect discarding undrained streamed output"
            );
        }
        self.pending.clear();
        self.streaming_outstanding = false;
        self.more_expected = false;
        // Dropping the old stream closes it; close errors are ignored.
        self.stream = open_stream(&self.path, self.timeout)?;
        debug!(socket = %self.path, "reconnected to daemon");
        Ok(())
    }

    /// Closes the connection.
    pub fn close(self) {
        drop(self);
    }

    /// Encodes and writes one request as a single send.
    fn send_request(&mut self, command: &str, args: &[String]) -> Result<(), ClientError> {
        if self.streaming_outstanding && (!self.pending.is_empty() || self.more_expected) {
            return Err(ClientError::ProtocolUsage(String::from(
                "unread streamed output from a previous request; drain it first",
            )));
        }

        let encoded =
            serde_json::to_vec(&Request { command, args }).map_err(ClientError::Encode)?;
        let written = self
            .stream
            .write(&encoded)
            .map_err(|source| ClientError::connection_io("failed to write message", source))?;
        // Partial writes are never retried inline.
        if written != encoded.len() {
            return Err(ClientError::connection("failed to write message"));
        }
        Ok(())
    }

    /// Reads fixed-size chunks until the accumulated buffer parses as one
    /// JSON document.
    ///
    /// Bytes are buffered undecoded so a multi-byte character split across
    /// chunks cannot corrupt the accumulator; decoding happens inside the
    /// parse attempt. Failed attempts are expected: they only signal that
    /// more bytes are needed.
    fn receive_document(&mut self) -> Result<Vec<Frame>, ClientError> {
        let mut buffer: Vec<u8> = Vec::new();
        let mut chunk = [0u8; READ_BLOCK_SIZE];
        loop {
            let read = self
                .stream
                .read(&mut chunk)
                .map_err(|source| ClientError::connection_io("failed to read response", source))?;
            if read == 0 {
                return Err(ClientError::connection("socket closed"));
            }
            if let Some(filled) = chunk.get(..read) {
                buffer.extend_from_slice(filled);
            }
            match serde_json::from_slice::<Vec<Frame>>(&buffer) {
                Ok(frames) => return Ok(frames),
                Err(error) => {
                    trace!(
                        buffered = buffer.len(),
                        %error,
                        "response document incomplete; reading more"
                    );
                }
            }
        }
    }
}

fn open_stream(path: &Utf8Path, timeout: Duration) -> Result<UnixStream, ClientError> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)
        .map_err(|source| ClientError::connection_io("failed to create socket", source))?;
    let address = SockAddr::unix(path.as_std_path())
        .map_err(|source| ClientError::connection_io("invalid socket path", source))?;
    socket
        .connect_timeout(&address, timeout)
        .map_err(|source| {
            ClientError::connection_io(format!("failed to connect to {path}"), source)
        })?;
    let stream: UnixStream = socket.into();
    stream
        .set_read_timeout(Some(timeout))
        .map_err(|source| ClientError::connection_io("failed to set read timeout", source))?;
    stream
        .set_write_timeout(Some(timeout))
        .map_err(|source| ClientError::connection_io("failed to set write timeout", source))?;
    Ok(stream)
}

/// Lazy iterator over queued streamed frames.
///
/// Yields frames in arrival order; a frame's own error state is left for
/// the caller to inspect, while transport failures during continuation
/// reads surface as `Err` items.
#[derive(Debug)]
pub struct Drain<'a> {
    connection: &'a mut Connection,
}

impl Iterator for Drain<'_> {
    type Item = Result<Frame, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(frame) = self.connection.pending.pop_front() {
                return Some(Ok(frame));
            }
            if !self.connection.more_expected {
                self.connection.streaming_outstanding = false;
                return None;
            }
            match self.connection.receive_document() {
                Ok(frames) => {
                    self.connection.more_expected =
                        frames.last().is_some_and(|frame| frame.more);
                    self.connection.pending.extend(frames);
                }
                Err(error) => {
                    self.connection.more_expected = false;
                    self.connection.streaming_outstanding = false;
                    return Some(Err(error));
                }
            }
        }
    }
}
