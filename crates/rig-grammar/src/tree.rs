//! Command tree construction from flat descriptors.
//!
//! Descriptors sharing leading prefix words are merged into interior nodes;
//! the final word of each prefix carries the leaf. A prefix that is itself
//! invocable and also has longer commands beneath it becomes an interior
//! node with its own leaf command. Interior-versus-leaf is decided once at
//! build time and encoded in the [`CommandNode`] variant, never probed at
//! run time.

use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{ArgSlot, classify_slot};
use crate::descriptor::CommandDescriptor;
use crate::error::GrammarError;

/// Commands excluded from the binding surface.
///
/// Prefixes starting with the interface-local marker never enter the tree;
/// neither do explicitly skipped names. Both are explicit configuration
/// rather than module state so callers can widen or narrow the surface per
/// generation run.
#[derive(Debug, Clone)]
pub struct SkipList {
    names: BTreeSet<String>,
    marker: char,
}

impl Default for SkipList {
    /// Skips `help` (generated manually where needed) and `.`-prefixed
    /// interface-local commands.
    fn default() -> Self {
        let mut names = BTreeSet::new();
        names.insert(String::from("help"));
        Self { names, marker: '.' }
    }
}

impl SkipList {
    /// Adds a command name to skip.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Returns whether the given shared prefix is excluded.
    #[must_use]
    pub fn excludes(&self, shared_prefix: &str) -> bool {
        shared_prefix.starts_with(self.marker) || self.names.contains(shared_prefix)
    }
}

/// Reduces a command word to the alphabetic characters that shape its
/// identity.
///
/// Non-alphabetic separators are routing punctuation, not semantics; a word
/// with no alphabetic characters cannot name a node.
#[must_use]
pub fn sanitise_word(word: &str) -> String {
    word.chars().filter(|ch| ch.is_alphabetic()).collect()
}

/// A leaf command: the originating descriptor plus its candidate argument
/// patterns with the shared-prefix slots stripped.
#[derive(Debug, Clone)]
pub struct LeafCommand {
    /// The full command name as spoken on the wire.
    pub full_name: String,
    /// The daemon descriptor this leaf was built from.
    pub descriptor: CommandDescriptor,
    /// Candidate argument patterns, one per acceptable call shape.
    pub candidates: Vec<Vec<ArgSlot>>,
}

/// A node of the command tree.
#[derive(Debug, Clone)]
pub enum CommandNode {
    /// A namespace of further commands, optionally invocable itself.
    Interior {
        /// Child nodes keyed by sanitised identifier.
        children: BTreeMap<String, CommandNode>,
        /// The node's own command when the prefix is itself invocable.
        command: Option<LeafCommand>,
    },
    /// A directly invocable command with no children.
    Leaf(LeafCommand),
}

impl CommandNode {
    /// Returns the node's own command, if it is invocable.
    #[must_use]
    pub const fn command(&self) -> Option<&LeafCommand> {
        match self {
            Self::Interior { command, .. } => command.as_ref(),
            Self::Leaf(command) => Some(command),
        }
    }

    /// Returns the node's children, empty for leaves.
    #[must_use]
    pub const fn children(&self) -> Option<&BTreeMap<String, CommandNode>> {
        match self {
            Self::Interior { children, .. } => Some(children),
            Self::Leaf(_) => None,
        }
    }
}

/// The compiled command tree.
///
/// Built once per daemon version and read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    roots: BTreeMap<String, CommandNode>,
}

impl CommandTree {
    /// Builds the tree from the daemon's flat descriptor list.
    ///
    /// Descriptors excluded by the skip list never enter the tree. Two
    /// descriptors colliding on their entire prefix path fail with
    /// [`GrammarError::DuplicateCommand`]; the daemon's grammar is assumed
    /// prefix-unambiguous.
    pub fn build(
        descriptors: &[CommandDescriptor],
        skip: &SkipList,
    ) -> Result<Self, GrammarError> {
        let mut roots = BTreeMap::new();
        for descriptor in descriptors {
            if skip.excludes(&descriptor.shared_prefix) {
                continue;
            }
            let words = descriptor.prefix_words();
            let leaf = build_leaf(descriptor)?;
            insert(&mut roots, &words, leaf, &descriptor.shared_prefix)?;
        }
        Ok(Self { roots })
    }

    /// Returns the root nodes keyed by sanitised identifier.
    #[must_use]
    pub const fn roots(&self) -> &BTreeMap<String, CommandNode> {
        &self.roots
    }

    /// Looks up a node by its sanitised path segments.
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&CommandNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for segment in rest {
            node = node.children()?.get(*segment)?;
        }
        Some(node)
    }
}

/// Computes a leaf's candidate argument lists.
///
/// The leading slots of every pattern correspond to the literal prefix path
/// already encoded in the tree, not to user-supplied arguments, so a slot
/// count equal to the prefix word count is stripped before classification.
fn build_leaf(descriptor: &CommandDescriptor) -> Result<LeafCommand, GrammarError> {
    let prefix_len = descriptor.prefix_words().len();
    let mut candidates = Vec::with_capacity(descriptor.parsed_patterns.len());
    for pattern in &descriptor.parsed_patterns {
        let slots = pattern
            .iter()
            .skip(prefix_len)
            .map(classify_slot)
            .collect::<Result<Vec<_>, _>>()?;
        candidates.push(slots);
    }
    Ok(LeafCommand {
        full_name: descriptor.shared_prefix.clone(),
        descriptor: descriptor.clone(),
        candidates,
    })
}

fn insert(
    nodes: &mut BTreeMap<String, CommandNode>,
    words: &[&str],
    leaf: LeafCommand,
    prefix: &str,
) -> Result<(), GrammarError> {
    let Some((word, rest)) = words.split_first() else {
        return Err(GrammarError::EmptyCommandWord {
            prefix: prefix.to_owned(),
        });
    };
    let name = sanitise_word(word);
    if name.is_empty() {
        return Err(GrammarError::EmptyCommandWord {
            prefix: prefix.to_owned(),
        });
    }

    if rest.is_empty() {
        return attach_leaf(nodes, name, leaf, prefix);
    }

    let entry = nodes
        .entry(name)
        .or_insert_with(|| CommandNode::Interior {
            children: BTreeMap::new(),
            command: None,
        });
    // An existing leaf on the path becomes an interior node carrying its
    // own command.
    if matches!(entry, CommandNode::Leaf(_)) {
        let own = match std::mem::replace(
            entry,
            CommandNode::Interior {
                children: BTreeMap::new(),
                command: None,
            },
        ) {
            CommandNode::Leaf(command) => Some(command),
            CommandNode::Interior { command, .. } => command,
        };
        if let CommandNode::Interior { command, .. } = entry {
            *command = own;
        }
    }
    match entry {
        CommandNode::Interior { children, .. } => insert(children, rest, leaf, prefix),
        CommandNode::Leaf(_) => Err(GrammarError::DuplicateCommand {
            name: prefix.to_owned(),
        }),
    }
}

fn attach_leaf(
    nodes: &mut BTreeMap<String, CommandNode>,
    name: String,
    leaf: LeafCommand,
    prefix: &str,
) -> Result<(), GrammarError> {
    match nodes.get_mut(&name) {
        None => {
            nodes.insert(name, CommandNode::Leaf(leaf));
            Ok(())
        }
        Some(CommandNode::Interior { command, .. }) => {
            if command.is_some() {
                return Err(GrammarError::DuplicateCommand {
                    name: prefix.to_owned(),
                });
            }
            *command = Some(leaf);
            Ok(())
        }
        Some(CommandNode::Leaf(_)) => Err(GrammarError::DuplicateCommand {
            name: prefix.to_owned(),
        }),
    }
}
