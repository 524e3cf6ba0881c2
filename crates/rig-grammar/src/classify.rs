//! Classification of argument bitmasks into argument kinds.
//!
//! The daemon encodes each pattern slot as a bitmask: bit 0 marks the slot
//! optional and bits 1 to 5 each denote one mutually exclusive base kind.
//! The assignments are part of the wire format and cannot change without a
//! matching daemon release.

use std::fmt;

use crate::descriptor::PatternSlot;
use crate::error::GrammarError;

/// Bit 0 marks a slot as optional.
pub const OPTIONAL_BIT: u32 = 1 << 0;

/// Kind bits in their declared scan order.
const KIND_BITS: [(u32, ArgKind); 5] = [
    (1 << 1, ArgKind::Literal),
    (1 << 2, ArgKind::Subcommand),
    (1 << 3, ArgKind::Str),
    (1 << 4, ArgKind::Choice),
    (1 << 5, ArgKind::List),
];

/// The base kind of one argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A fixed keyword that must be supplied verbatim.
    Literal,
    /// A nested command consuming the rest of the call.
    Subcommand,
    /// A free-form string value.
    Str,
    /// One value out of a declared option set.
    Choice,
    /// A variadic list of values, one token per element.
    List,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Literal => "literal",
            Self::Subcommand => "subcommand",
            Self::Str => "string",
            Self::Choice => "choice",
            Self::List => "list",
        };
        formatter.write_str(name)
    }
}

/// The classified, user-facing shape of one argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    /// Base kind of the slot.
    pub kind: ArgKind,
    /// Whether the slot may be omitted.
    pub optional: bool,
}

/// Classifies a raw bitmask into an [`ArgSpec`].
///
/// Bit 0 is stripped first; the remaining bits are scanned in declared
/// order. Exactly one known kind bit must be set; zero or several signal a
/// daemon/grammar version mismatch and fail with
/// [`GrammarError::UnknownArgumentType`], which is fatal to generation.
pub fn classify(mask: u32) -> Result<ArgSpec, GrammarError> {
    let optional = mask & OPTIONAL_BIT != 0;
    let kind_mask = mask & !OPTIONAL_BIT;

    let mut found = None;
    for (bit, kind) in KIND_BITS {
        if kind_mask & bit != 0 {
            if found.is_some() {
                return Err(GrammarError::UnknownArgumentType { mask });
            }
            found = Some(kind);
        }
    }

    let kind = found.ok_or(GrammarError::UnknownArgumentType { mask })?;
    Ok(ArgSpec { kind, optional })
}

/// A fully classified argument slot, ready for call validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSlot {
    /// Classified kind and optionality.
    pub spec: ArgSpec,
    /// User-facing slot name, used in validation errors.
    pub name: String,
    /// Keyword text for literal slots.
    pub literal: Option<String>,
    /// Declared options for choice slots.
    pub choices: Vec<String>,
}

/// Classifies one daemon pattern slot into an [`ArgSlot`].
pub fn classify_slot(slot: &PatternSlot) -> Result<ArgSlot, GrammarError> {
    let spec = classify(slot.type_mask)?;
    let literal = match spec.kind {
        ArgKind::Literal => Some(slot.text.clone()),
        _ => None,
    };
    Ok(ArgSlot {
        spec,
        name: slot.name().to_owned(),
        literal,
        choices: slot.options.clone(),
    })
}

impl ArgSlot {
    fn new(kind: ArgKind, name: &str) -> Self {
        Self {
            spec: ArgSpec {
                kind,
                optional: false,
            },
            name: name.to_owned(),
            literal: None,
            choices: Vec::new(),
        }
    }

    /// Builds a required free-form string slot.
    #[must_use]
    pub fn string(name: &str) -> Self {
        Self::new(ArgKind::Str, name)
    }

    /// Builds a required literal keyword slot.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        let mut slot = Self::new(ArgKind::Literal, text);
        slot.literal = Some(text.to_owned());
        slot
    }

    /// Builds a required multiple-choice slot.
    #[must_use]
    pub fn choice(name: &str, options: &[&str]) -> Self {
        let mut slot = Self::new(ArgKind::Choice, name);
        slot.choices = options.iter().map(|option| (*option).to_owned()).collect();
        slot
    }

    /// Builds a required nested-command slot.
    #[must_use]
    pub fn subcommand(name: &str) -> Self {
        Self::new(ArgKind::Subcommand, name)
    }

    /// Builds a required variadic list slot.
    #[must_use]
    pub fn list(name: &str) -> Self {
        Self::new(ArgKind::List, name)
    }

    /// Marks the slot optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.spec.optional = true;
        self
    }
}
