//! Command grammar compiler for the rig daemon bindings.
//!
//! The rig daemon describes its own command-line grammar as a flat JSON list
//! of command descriptors. Each descriptor carries a shared prefix (the
//! literal leading words that identify the command), one or more parsed
//! argument patterns (bitmask-typed slots), and help text. This crate turns
//! that flat list into a validated, hierarchical callable surface:
//!
//! - [`classify`] maps an argument bitmask to one of the fixed argument
//!   kinds and its optionality.
//! - [`CommandTree`] merges descriptors that share a prefix into a tree of
//!   tagged interior and leaf nodes keyed by sanitised identifiers.
//! - [`match_call`] checks a supplied argument sequence against a leaf's
//!   candidate patterns and produces the stringified token sequence to put
//!   on the wire, rejecting malformed calls before they are sent.
//!
//! The grammar is shape-aware but semantics-agnostic: nothing here knows
//! what a command does, only how it may be spelled.

mod call;
mod classify;
mod descriptor;
mod error;
mod tree;

pub use call::{ArgValue, match_call};
pub use classify::{ArgKind, ArgSlot, ArgSpec, OPTIONAL_BIT, classify, classify_slot};
pub use descriptor::{ArgumentPattern, CommandDescriptor, PatternSlot, parse_dump};
pub use error::{GrammarError, ValidationError};
pub use tree::{CommandNode, CommandTree, LeafCommand, SkipList, sanitise_word};

#[cfg(test)]
mod tests;
