//! Call-shape validation against candidate argument patterns.
//!
//! A leaf command accepts a call when the supplied arguments fit one of its
//! candidate patterns. Matching is positional; optional slots may be left
//! out. The first matching candidate wins and yields the stringified token
//! sequence to forward on the wire. When nothing matches, the error from
//! the candidate that consumed the most arguments is surfaced so the
//! message points at the slot the caller most plausibly got wrong.

use crate::classify::{ArgKind, ArgSlot};
use crate::error::ValidationError;

/// A caller-supplied argument value.
///
/// Scalars coerce to their textual representation; a list expands to one
/// token per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// A string value, passed through verbatim.
    Str(String),
    /// An integer, rendered in decimal.
    Int(i64),
    /// A boolean, rendered as `true` or `false`.
    Bool(bool),
    /// A sequence expanded to one token per element.
    List(Vec<String>),
}

impl ArgValue {
    /// Returns the single-token textual form, or `None` for a list.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Str(text) => Some(text.clone()),
            Self::Int(value) => Some(value.to_string()),
            Self::Bool(value) => Some(value.to_string()),
            Self::List(_) => None,
        }
    }

    /// Appends the value's wire tokens to `tokens`.
    fn expand_into(&self, tokens: &mut Vec<String>) {
        match self {
            Self::List(elements) => tokens.extend(elements.iter().cloned()),
            other => {
                if let Some(text) = other.scalar_text() {
                    tokens.push(text);
                }
            }
        }
    }

    /// Returns a human-readable rendering for error messages.
    fn display_text(&self) -> String {
        match self {
            Self::List(elements) => elements.join(" "),
            other => other.scalar_text().unwrap_or_default(),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Validates `args` against `candidates` and returns the wire tokens.
///
/// This is a purely client-side, pre-send check: a call that matches no
/// candidate never reaches the wire. Commands without declared patterns
/// accept only an empty argument list.
pub fn match_call(
    candidates: &[Vec<ArgSlot>],
    args: &[ArgValue],
) -> Result<Vec<String>, ValidationError> {
    if candidates.is_empty() {
        return args.first().map_or_else(
            || Ok(Vec::new()),
            |extra| {
                Err(ValidationError::Unexpected {
                    value: extra.display_text(),
                })
            },
        );
    }

    let mut best: Option<(usize, ValidationError)> = None;
    for pattern in candidates {
        match match_pattern(pattern, args) {
            Ok(tokens) => return Ok(tokens),
            Err((consumed, error)) => {
                if best.as_ref().is_none_or(|(seen, _)| consumed > *seen) {
                    best = Some((consumed, error));
                }
            }
        }
    }

    // A missing best error means an empty argument list against empty
    // patterns; every other successful match returned inside the loop.
    best.map_or_else(|| Ok(Vec::new()), |(_, error)| Err(error))
}

fn match_pattern(
    slots: &[ArgSlot],
    args: &[ArgValue],
) -> Result<Vec<String>, (usize, ValidationError)> {
    let mut tokens = Vec::new();
    let mut index = 0usize;

    for slot in slots {
        match slot.spec.kind {
            ArgKind::Literal | ArgKind::Choice => {
                index = match_keyword(slot, args, index, &mut tokens)?;
            }
            ArgKind::Str => {
                index = match_string(slot, args, index, &mut tokens)?;
            }
            ArgKind::Subcommand | ArgKind::List => {
                index = match_greedy(slot, args, index, &mut tokens)?;
            }
        }
    }

    match args.get(index) {
        None => Ok(tokens),
        Some(extra) => Err((
            index,
            ValidationError::Unexpected {
                value: extra.display_text(),
            },
        )),
    }
}

/// Matches a literal or choice slot, which both demand a specific spelling.
fn match_keyword(
    slot: &ArgSlot,
    args: &[ArgValue],
    index: usize,
    tokens: &mut Vec<String>,
) -> Result<usize, (usize, ValidationError)> {
    let Some(value) = args.get(index) else {
        if slot.spec.optional {
            return Ok(index);
        }
        return Err((index, missing(slot)));
    };

    let Some(text) = value.scalar_text() else {
        if slot.spec.optional {
            return Ok(index);
        }
        return Err((
            index,
            ValidationError::ScalarRequired {
                argument: slot.name.clone(),
                expected: slot.spec.kind,
            },
        ));
    };

    if keyword_accepts(slot, &text) {
        tokens.push(text);
        return Ok(index + 1);
    }
    if slot.spec.optional {
        return Ok(index);
    }
    Err((
        index,
        ValidationError::Mismatch {
            argument: slot.name.clone(),
            expected: keyword_expectation(slot),
            value: text,
        },
    ))
}

fn keyword_accepts(slot: &ArgSlot, text: &str) -> bool {
    match slot.spec.kind {
        ArgKind::Choice => slot.choices.iter().any(|option| option == text),
        _ => slot.literal.as_deref().unwrap_or(&slot.name) == text,
    }
}

fn keyword_expectation(slot: &ArgSlot) -> String {
    match slot.spec.kind {
        ArgKind::Choice => format!("one of [{}]", slot.choices.join(", ")),
        _ => format!("literal '{}'", slot.literal.as_deref().unwrap_or(&slot.name)),
    }
}

fn match_string(
    slot: &ArgSlot,
    args: &[ArgValue],
    index: usize,
    tokens: &mut Vec<String>,
) -> Result<usize, (usize, ValidationError)> {
    let Some(value) = args.get(index) else {
        if slot.spec.optional {
            return Ok(index);
        }
        return Err((index, missing(slot)));
    };
    let Some(text) = value.scalar_text() else {
        return Err((
            index,
            ValidationError::ScalarRequired {
                argument: slot.name.clone(),
                expected: slot.spec.kind,
            },
        ));
    };
    tokens.push(text);
    Ok(index + 1)
}

/// Matches a list or nested-command slot, both of which are greedy and
/// consume the rest of the call.
fn match_greedy(
    slot: &ArgSlot,
    args: &[ArgValue],
    index: usize,
    tokens: &mut Vec<String>,
) -> Result<usize, (usize, ValidationError)> {
    if index >= args.len() {
        if slot.spec.optional {
            return Ok(index);
        }
        return Err((index, missing(slot)));
    }
    for value in args.iter().skip(index) {
        value.expand_into(tokens);
    }
    Ok(args.len())
}

fn missing(slot: &ArgSlot) -> ValidationError {
    ValidationError::Missing {
        argument: slot.name.clone(),
        expected: slot.spec.kind,
    }
}
