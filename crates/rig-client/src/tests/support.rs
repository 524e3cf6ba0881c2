//! Scripted daemon harness for connection and mirror tests.
//!
//! Binds a real Unix socket in a temporary directory and serves canned
//! replies from a background thread, recording every decoded request so
//! tests can assert on the exact wire traffic.

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tempfile::TempDir;

use crate::frame::Frame;

/// Pause between scripted chunks, long enough for the client to observe
/// them as separate reads.
const CHUNK_PAUSE: Duration = Duration::from_millis(25);

/// One scripted reaction to a received request.
pub(crate) enum Reply {
    /// Write each chunk in order, pausing between chunks.
    Chunks(Vec<Vec<u8>>),
    /// Drop the connection without responding.
    Close,
}

impl Reply {
    /// A whole response document written as a single chunk.
    pub(crate) fn document(frames: &[Frame]) -> Self {
        Self::Chunks(vec![encode_document(frames)])
    }
}

/// Encodes frames as one compact response document.
pub(crate) fn encode_document(frames: &[Frame]) -> Vec<u8> {
    serde_json::to_vec(frames).expect("encode response document")
}

/// A scripted daemon behind a real Unix socket.
///
/// The serving thread consumes one [`Reply`] per received request and
/// exits once the script is exhausted; it accepts replacement connections
/// while scripted replies remain, which is what reconnect tests rely on.
pub(crate) struct StubDaemon {
    _dir: TempDir,
    socket_path: Utf8PathBuf,
    requests: Arc<Mutex<Vec<Value>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl StubDaemon {
    /// Spawns the daemon with the given reply script.
    pub(crate) fn spawn(script: Vec<Reply>) -> Result<Self> {
        let dir = tempfile::tempdir().context("create socket directory")?;
        let socket_path = Utf8PathBuf::from_path_buf(dir.path().join("rigd.sock"))
            .map_err(|path| anyhow!("non-utf8 socket path: {}", path.display()))?;
        let listener = UnixListener::bind(&socket_path).context("bind stub daemon")?;
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let requests_clone = Arc::clone(&requests);
        let handle = thread::spawn(move || serve(&listener, script, &requests_clone));
        Ok(Self {
            _dir: dir,
            socket_path,
            requests,
            handle: Some(handle),
        })
    }

    pub(crate) fn socket_path(&self) -> &Utf8Path {
        &self.socket_path
    }

    /// Waits for the script to finish and returns the decoded requests in
    /// arrival order.
    pub(crate) fn take_requests(&mut self) -> Result<Vec<Value>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("stub daemon thread panicked"))?
                .context("stub daemon failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }
}

impl Drop for StubDaemon {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(
    listener: &UnixListener,
    script: Vec<Reply>,
    requests: &Arc<Mutex<Vec<Value>>>,
) -> Result<()> {
    let mut replies = script.into_iter();
    let mut remaining = replies.len();
    while remaining > 0 {
        let (mut stream, _) = listener.accept().context("accept connection")?;
        while remaining > 0 {
            let Some(request) = read_request(&mut stream)? else {
                // Client went away; a reconnecting client gets the rest of
                // the script on its next connection.
                break;
            };
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(request);
            let Some(reply) = replies.next() else {
                return Err(anyhow!("received a request beyond the script"));
            };
            remaining -= 1;
            match reply {
                Reply::Chunks(chunks) => write_chunks(&mut stream, &chunks)?,
                Reply::Close => break,
            }
        }
    }
    Ok(())
}

fn write_chunks(stream: &mut UnixStream, chunks: &[Vec<u8>]) -> Result<()> {
    for (index, chunk) in chunks.iter().enumerate() {
        if index > 0 {
            thread::sleep(CHUNK_PAUSE);
        }
        stream.write_all(chunk).context("write reply chunk")?;
        stream.flush().context("flush reply chunk")?;
    }
    Ok(())
}

/// Reads one request document, or `None` when the client closed first.
fn read_request(stream: &mut UnixStream) -> Result<Option<Value>> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = stream.read(&mut chunk).context("read request")?;
        if read == 0 {
            if buffer.is_empty() {
                return Ok(None);
            }
            return Err(anyhow!("client closed mid-request"));
        }
        if let Some(filled) = chunk.get(..read) {
            buffer.extend_from_slice(filled);
        }
        if let Ok(value) = serde_json::from_slice::<Value>(&buffer) {
            return Ok(Some(value));
        }
    }
}
