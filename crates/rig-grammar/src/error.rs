//! Error types for grammar compilation and call validation.

use thiserror::Error;

use crate::classify::ArgKind;

/// Errors raised while compiling the daemon's command grammar.
///
/// These are generation-time failures: each one signals that the daemon's
/// grammar dump cannot be turned into a binding surface, so code generation
/// must abort rather than emit a partial API.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// An argument bitmask did not carry exactly one known kind bit.
    ///
    /// This usually means the daemon speaks a newer grammar revision than
    /// this crate understands.
    #[error("unknown argument type bitmask {mask:#x}")]
    UnknownArgumentType {
        /// The offending bitmask as received from the daemon.
        mask: u32,
    },

    /// Two descriptors collided on their entire prefix path.
    #[error("duplicate command '{name}' in grammar dump")]
    DuplicateCommand {
        /// The shared prefix both descriptors claimed.
        name: String,
    },

    /// A prefix word contained no alphabetic characters to build an
    /// identifier from.
    #[error("command prefix '{prefix}' contains a word with no alphabetic characters")]
    EmptyCommandWord {
        /// The full shared prefix of the offending descriptor.
        prefix: String,
    },

    /// The grammar dump was not valid JSON for the descriptor schema.
    #[error("failed to decode grammar dump: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A client-side argument-shape mismatch.
///
/// Raised when a call matches none of a command's candidate patterns. The
/// failing call never reaches the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required slot had no corresponding argument.
    #[error("missing required argument '{argument}' (expected {expected})")]
    Missing {
        /// Name of the unfilled slot.
        argument: String,
        /// Kind of value the slot accepts.
        expected: ArgKind,
    },

    /// An argument was present but did not fit its slot.
    #[error("argument '{argument}' expected {expected}, got '{value}'")]
    Mismatch {
        /// Name of the slot the value was checked against.
        argument: String,
        /// Description of the accepted values.
        expected: String,
        /// Textual form of the rejected value.
        value: String,
    },

    /// More arguments were supplied than any pattern accepts.
    #[error("unexpected extra argument '{value}'")]
    Unexpected {
        /// Textual form of the first surplus argument.
        value: String,
    },

    /// A list value was supplied where a single scalar is required.
    #[error("argument '{argument}' expected a single {expected}, got a list")]
    ScalarRequired {
        /// Name of the slot the list was checked against.
        argument: String,
        /// Kind of scalar the slot accepts.
        expected: ArgKind,
    },
}
