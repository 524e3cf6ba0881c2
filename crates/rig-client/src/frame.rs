//! Response frame model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// One self-contained unit of daemon response output.
///
/// A frame is independently parseable: it carries a response value and/or
/// error text, the reporting host when the daemon fans a command out, and a
/// continuation flag marking streamed output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    /// The response payload; a string for most commands.
    #[serde(rename = "Response")]
    pub response: Value,

    /// Error text reported by the daemon; empty on success.
    #[serde(rename = "Error")]
    pub error: String,

    /// Host that produced the frame, when reported.
    #[serde(rename = "Host", skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Whether further response documents follow for the same request.
    #[serde(rename = "More")]
    pub more: bool,
}

impl Frame {
    /// Builds a plain success frame carrying a textual response.
    #[must_use]
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: Value::String(response.into()),
            ..Self::default()
        }
    }

    /// Returns whether the daemon reported an error for this frame.
    #[must_use]
    pub fn is_err(&self) -> bool {
        !self.error.is_empty()
    }

    /// Returns the response payload as text when it is a JSON string.
    #[must_use]
    pub fn response_text(&self) -> Option<&str> {
        self.response.as_str()
    }

    /// Converts the frame into a result, failing when the daemon reported
    /// an error.
    pub fn into_result(self) -> Result<Self, ClientError> {
        if self.is_err() {
            return Err(ClientError::Command(self.error));
        }
        Ok(self)
    }
}
