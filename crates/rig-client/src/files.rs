//! Mirror of the daemon's hierarchical file listing.
//!
//! The daemon's `file` command family reports a directory listing as plain
//! text, one entry per line, with subdirectories marked by a `<dir> `
//! prefix. [`FileMirror`] snapshots that listing into a typed map and
//! offers transfer and deletion against it.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::frame::Frame;

/// One entry in a mirrored directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// A regular file with its size in bytes.
    File(u64),
    /// A subdirectory, mirrored recursively.
    Directory(FileMirror),
}

/// A snapshot of one remote directory served by the daemon.
///
/// The mirror is point-in-time: it reflects the listing at fetch and is
/// only mutated by successful deletions issued through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMirror {
    directory: Utf8PathBuf,
    entries: BTreeMap<String, FileEntry>,
}

impl FileMirror {
    /// Fetches the listing of `directory` from the daemon, recursing into
    /// subdirectories.
    ///
    /// A payload that is not text, and lines that match neither the file
    /// nor the directory shape, fail the whole fetch with a parse error
    /// naming the directory.
    pub fn fetch(
        connection: &mut Connection,
        directory: impl AsRef<Utf8Path>,
    ) -> Result<Self, ClientError> {
        let root = directory.as_ref().to_path_buf();
        let args = vec![String::from("list"), root.to_string()];
        let frame = connection.run("file", &args)?;
        let listing = frame
            .response_text()
            .ok_or_else(|| ClientError::parse(root.to_string(), "listing payload is not text"))?
            .to_owned();

        let mut entries = BTreeMap::new();
        for line in listing.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((is_dir, name, size)) = parse_listing_line(line) else {
                return Err(ClientError::parse(root.to_string(), line.to_owned()));
            };
            let entry = if is_dir {
                let nested = Self::fetch(connection, root.join(name))?;
                FileEntry::Directory(nested)
            } else {
                FileEntry::File(size)
            };
            entries.insert(name.to_owned(), entry);
        }
        debug!(directory = %root, entries = entries.len(), "mirrored listing");
        Ok(Self {
            directory: root,
            entries,
        })
    }

    /// Returns the remote directory this mirror reflects.
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    /// Lists the mirrored entries, keyed by name.
    #[must_use]
    pub const fn list(&self) -> &BTreeMap<String, FileEntry> {
        &self.entries
    }

    /// Looks up a single entry by name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&FileEntry> {
        self.entries.get(name)
    }

    /// Iterates over the mirrored entry names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of mirrored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the mirrored directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requests a transfer of the named entry from the daemon.
    ///
    /// Fails without touching the wire when the name is absent from the
    /// mirror.
    pub fn get(&self, connection: &mut Connection, name: &str) -> Result<Frame, ClientError> {
        self.require(name)?;
        let args = vec![String::from("get"), self.directory.join(name).to_string()];
        connection.run("file", &args)
    }

    /// Deletes the named entry remotely, then drops it from the mirror.
    ///
    /// The remote deletion runs first; a daemon failure leaves the local
    /// entry in place.
    pub fn delete(&mut self, connection: &mut Connection, name: &str) -> Result<(), ClientError> {
        self.require(name)?;
        let args = vec![
            String::from("delete"),
            self.directory.join(name).to_string(),
        ];
        connection.run("file", &args)?;
        self.entries.remove(name);
        Ok(())
    }

    /// Reports in-flight transfer status from the daemon.
    pub fn status(connection: &mut Connection) -> Result<Frame, ClientError> {
        let args = vec![String::from("status")];
        connection.run("file", &args)
    }

    fn require(&self, name: &str) -> Result<(), ClientError> {
        if self.entries.contains_key(name) {
            return Ok(());
        }
        Err(ClientError::MissingEntry {
            name: name.to_owned(),
        })
    }
}

/// Splits one listing line into its directory marker, name, and size.
///
/// File lines are indented; directory lines carry a literal `<dir> `
/// prefix instead. The size is the final whitespace-separated field.
fn parse_listing_line(line: &str) -> Option<(bool, &str, u64)> {
    let (is_dir, body) = line
        .strip_prefix("<dir> ")
        .map_or((false, line), |marked| (true, marked));
    let (raw_name, size_text) = body.trim().rsplit_once(char::is_whitespace)?;
    let size = size_text.parse::<u64>().ok()?;
    let name = raw_name.trim_end();
    if name.is_empty() {
        return None;
    }
    Some((is_dir, name, size))
}
