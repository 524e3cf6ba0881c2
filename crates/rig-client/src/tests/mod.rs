//! Unit tests for the rig-client crate.
#![expect(clippy::expect_used, reason = "tests use expect for clarity")]

mod support;

use crate::frame::Frame;

pub(crate) use support::{Reply, StubDaemon};

/// Builds a success frame carrying textual output.
pub(crate) fn text_frame(response: &str) -> Frame {
    Frame::text(response)
}

/// Builds a frame reporting a daemon-side error.
pub(crate) fn error_frame(error: &str) -> Frame {
    Frame {
        error: error.to_owned(),
        ..Frame::default()
    }
}

/// Builds a success frame flagged as having further documents to follow.
pub(crate) fn continued_frame(response: &str) -> Frame {
    Frame {
        more: true,
        ..Frame::text(response)
    }
}

/// Converts string literals into owned argument vectors.
pub(crate) fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}
