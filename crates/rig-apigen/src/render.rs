//! Rendering of the generated bindings source.
//!
//! The output is a single self-contained Rust module: one namespace struct
//! per interior tree node, one method per command, each method validating
//! its arguments client-side before forwarding to the connection. Tree maps
//! are ordered, so rendering is deterministic for a given dump.

use std::collections::BTreeMap;

use rig_grammar::{ArgKind, ArgSlot, CommandNode, CommandTree, LeafCommand};

use crate::GeneratorConfig;

/// Reserved words that need a trailing underscore as method names.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "macro", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
    "try", "type", "unsafe", "use", "where", "while",
];

/// Renders the full bindings source for a compiled command tree.
pub(crate) fn render(tree: &CommandTree, config: &GeneratorConfig) -> String {
    let mut out = String::new();
    header(&mut out, config);
    root(&mut out, tree.roots());
    for (name, node) in tree.roots() {
        namespaces(&mut out, &[name.as_str()], node);
    }
    out
}

fn header(out: &mut String, config: &GeneratorConfig) {
    out.push_str("//! Command bindings for the rig daemon.\n//!\n");
    out.push_str(&format!(
        "//! Generated by rig-apigen {} against daemon version {}.\n",
        config.api_version, config.daemon_version,
    ));
    out.push_str("//! Regenerate from a fresh descriptor dump instead of editing.\n\n");
    out.push_str("use rig_client::{ClientError, Connection, Frame};\n");
    out.push_str("use rig_grammar::{ArgSlot, ArgValue, match_call};\n\n");
}

fn root(out: &mut String, roots: &BTreeMap<String, CommandNode>) {
    out.push_str("/// Entry point over an open daemon connection.\n");
    out.push_str("pub struct RigApi<'a> {\n    connection: &'a mut Connection,\n}\n\n");
    out.push_str("impl<'a> RigApi<'a> {\n");
    out.push_str("    /// Wraps an open connection.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub fn new(connection: &'a mut Connection) -> Self {\n");
    out.push_str("        Self { connection }\n    }\n");
    members(out, &[], roots);
    out.push_str("}\n");
}

/// Emits the struct and impl for one interior node, then recurses.
fn namespaces(out: &mut String, path: &[&str], node: &CommandNode) {
    let CommandNode::Interior { children, command } = node else {
        return;
    };
    let name = struct_name(path);
    let spoken = path.join(" ");
    out.push_str(&format!("\n/// Commands beneath `{spoken}`.\n"));
    out.push_str(&format!(
        "pub struct {name}<'a> {{\n    connection: &'a mut Connection,\n}}\n\n"
    ));
    out.push_str(&format!("impl {name}<'_> {{"));
    // A prefix that is itself invocable keeps its command reachable as
    // `call` alongside the namespace methods.
    if let Some(leaf) = command {
        method(out, "call", leaf);
    }
    members(out, path, children);
    out.push_str("}\n");

    for (child, child_node) in children {
        let mut child_path = path.to_vec();
        child_path.push(child);
        namespaces(out, &child_path, child_node);
    }
}

fn members(out: &mut String, path: &[&str], children: &BTreeMap<String, CommandNode>) {
    for (name, node) in children {
        match node {
            CommandNode::Leaf(leaf) => method(out, name, leaf),
            CommandNode::Interior { .. } => accessor(out, path, name),
        }
    }
}

fn accessor(out: &mut String, path: &[&str], name: &str) {
    let mut child_path = path.to_vec();
    child_path.push(name);
    let target = struct_name(&child_path);
    let ident = escape_identifier(name);
    out.push_str(&format!(
        "\n    /// Commands beneath `{}`.\n",
        child_path.join(" "),
    ));
    out.push_str(&format!("    pub fn {ident}(&mut self) -> {target}<'_> {{\n"));
    out.push_str(&format!(
        "        {target} {{\n            connection: &mut *self.connection,\n        }}\n"
    ));
    out.push_str("    }\n");
}

fn method(out: &mut String, name: &str, leaf: &LeafCommand) {
    out.push('\n');
    doc_comment(out, leaf);
    let ident = escape_identifier(name);
    out.push_str(&format!(
        "    pub fn {ident}(&mut self, args: &[ArgValue]) -> Result<Frame, ClientError> {{\n"
    ));
    if leaf.candidates.is_empty() {
        out.push_str("        let tokens = match_call(&[], args)?;\n");
    } else {
        out.push_str("        let candidates = vec![\n");
        for candidate in &leaf.candidates {
            let slots = candidate.iter().map(slot_expr).collect::<Vec<_>>();
            out.push_str(&format!("            vec![{}],\n", slots.join(", ")));
        }
        out.push_str("        ];\n");
        out.push_str("        let tokens = match_call(&candidates, args)?;\n");
    }
    out.push_str(&format!(
        "        self.connection.run({:?}, &tokens)\n    }}\n",
        leaf.full_name,
    ));
}

/// Reuses the daemon's own help text as the method documentation.
fn doc_comment(out: &mut String, leaf: &LeafCommand) {
    let short = leaf.descriptor.help_short.trim();
    if short.is_empty() {
        out.push_str(&format!("    /// Runs the `{}` command.\n", leaf.full_name));
    } else {
        out.push_str(&format!("    /// {short}\n"));
    }
    let long = leaf.descriptor.help_long.trim();
    if !long.is_empty() {
        out.push_str("    ///\n");
        for raw in long.lines() {
            let trimmed = raw.trim_end();
            if trimmed.is_empty() {
                out.push_str("    ///\n");
            } else {
                out.push_str(&format!("    /// {trimmed}\n"));
            }
        }
    }
}

/// Renders one argument slot as its constructor expression.
fn slot_expr(slot: &ArgSlot) -> String {
    let base = match slot.spec.kind {
        ArgKind::Literal => format!(
            "ArgSlot::literal({:?})",
            slot.literal.as_deref().unwrap_or(&slot.name),
        ),
        ArgKind::Str => format!("ArgSlot::string({:?})", slot.name),
        ArgKind::Choice => {
            let options = slot
                .choices
                .iter()
                .map(|option| format!("{option:?}"))
                .collect::<Vec<_>>();
            format!("ArgSlot::choice({:?}, &[{}])", slot.name, options.join(", "))
        }
        ArgKind::Subcommand => format!("ArgSlot::subcommand({:?})", slot.name),
        ArgKind::List => format!("ArgSlot::list({:?})", slot.name),
    };
    if slot.spec.optional {
        format!("{base}.optional()")
    } else {
        base
    }
}

fn struct_name(path: &[&str]) -> String {
    let mut name: String = path.iter().map(|segment| pascal(segment)).collect();
    name.push_str("Api");
    name
}

fn pascal(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn escape_identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_owned()
    }
}
