//! Serde model of the daemon's self-described command grammar.
//!
//! The daemon dumps its CLI grammar as a JSON array of command descriptors.
//! The field names and the bitmask encoding are fixed by the daemon; this
//! module only mirrors them. Fields the bindings do not consume are ignored
//! rather than rejected so newer daemons remain readable.

use serde::Deserialize;

use crate::error::GrammarError;

/// One slot of an argument pattern as described by the daemon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PatternSlot {
    /// Bitmask encoding the slot kind and optionality.
    #[serde(rename = "type")]
    pub type_mask: u32,
    /// Identifier for the slot, usually the first word of the token.
    #[serde(default)]
    pub key: String,
    /// The original full text of the token.
    #[serde(default)]
    pub text: String,
    /// Declared options for multiple-choice slots.
    #[serde(default)]
    pub options: Vec<String>,
}

impl PatternSlot {
    /// Returns the slot's user-facing name.
    ///
    /// The daemon usually fills `key` with the first word of the token; the
    /// raw token text is the fallback for literal slots where `key` is
    /// omitted.
    #[must_use]
    pub fn name(&self) -> &str {
        if self.key.is_empty() {
            &self.text
        } else {
            &self.key
        }
    }
}

/// One acceptable call shape for a command, leading prefix words included.
pub type ArgumentPattern = Vec<PatternSlot>;

/// A flat command descriptor from the daemon's grammar dump.
///
/// Immutable once received; produced once per daemon version and consumed
/// by [`crate::CommandTree::build`].
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDescriptor {
    /// Literal leading words shared by every pattern of the command.
    pub shared_prefix: String,
    /// One-line help message.
    #[serde(default)]
    pub help_short: String,
    /// Long-form help message.
    #[serde(default)]
    pub help_long: String,
    /// Raw pattern strings as printed by the daemon.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Parsed argument patterns, one per acceptable call shape.
    #[serde(default)]
    pub parsed_patterns: Vec<ArgumentPattern>,
}

impl CommandDescriptor {
    /// Splits the shared prefix into its whitespace-separated words.
    #[must_use]
    pub fn prefix_words(&self) -> Vec<&str> {
        self.shared_prefix.split_whitespace().collect()
    }
}

/// Decodes a full grammar dump from JSON text.
pub fn parse_dump(input: &str) -> Result<Vec<CommandDescriptor>, GrammarError> {
    Ok(serde_json::from_str(input)?)
}
