//! Unit tests for the rig-grammar crate.
#![expect(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "tests unwrap and expect for clarity"
)]


use crate::descriptor::{CommandDescriptor, PatternSlot};

pub(crate) const LITERAL: u32 = 1 << 1;
pub(crate) const SUBCOMMAND: u32 = 1 << 2;
pub(crate) const STRING: u32 = 1 << 3;
pub(crate) const CHOICE: u32 = 1 << 4;
pub(crate) const LIST: u32 = 1 << 5;

pub(crate) fn literal_slot(text: &str) -> PatternSlot {
    PatternSlot {
        type_mask: LITERAL,
        key: String::new(),
        text: text.to_owned(),
        options: Vec::new(),
    }
}

pub(crate) fn typed_slot(mask: u32, key: &str) -> PatternSlot {
    PatternSlot {
        type_mask: mask,
        key: key.to_owned(),
        text: format!("<{key}>"),
        options: Vec::new(),
    }
}

pub(crate) fn choice_slot(mask: u32, key: &str, options: &[&str]) -> PatternSlot {
    PatternSlot {
        type_mask: mask,
        key: key.to_owned(),
        text: format!("<{}>", options.join(",")),
        options: options.iter().map(|option| (*option).to_owned()).collect(),
    }
}

pub(crate) fn descriptor(
    shared_prefix: &str,
    parsed_patterns: Vec<Vec<PatternSlot>>,
) -> CommandDescriptor {
    CommandDescriptor {
        shared_prefix: shared_prefix.to_owned(),
        help_short: format!("{shared_prefix} help"),
        help_long: String::new(),
        patterns: Vec::new(),
        parsed_patterns,
    }
}

/// Builds the pattern slots for a descriptor's literal prefix words.
pub(crate) fn prefix_slots(shared_prefix: &str) -> Vec<PatternSlot> {
    shared_prefix.split_whitespace().map(literal_slot).collect()
}
