//! Tests for the rendered bindings source.

use rig_grammar::PatternSlot;
use rstest::rstest;

use crate::{GeneratorConfig, generate};

use super::{
    CHOICE, LIST, OPTIONAL, STRING, choice_slot, descriptor, literal_slot, prefix_slots,
    typed_slot,
};

fn sample_source() -> String {
    let mut info_pattern = prefix_slots("vm info");
    info_pattern.push(choice_slot(CHOICE | OPTIONAL, "summary", &["summary"]));
    let mut launch_pattern = prefix_slots("vm launch");
    launch_pattern.push(typed_slot(STRING, "name"));
    let descriptors = vec![
        descriptor("vm info", "Reports VM state", vec![info_pattern]),
        descriptor("vm launch", "Launches a VM", vec![launch_pattern]),
        descriptor("version", "Reports the daemon version", vec![vec![
            literal_slot("version"),
        ]]),
    ];
    let config = GeneratorConfig {
        daemon_version: String::from("1.2.3"),
        ..GeneratorConfig::default()
    };
    generate(&descriptors, &config).expect("generation succeeds")
}

#[test]
fn stamps_versions_into_the_header() {
    let source = sample_source();
    assert!(source.contains("Generated by rig-apigen 0.1.0 against daemon version 1.2.3."));
}

#[test]
fn renders_the_root_entry_point() {
    let source = sample_source();
    assert!(source.contains("pub struct RigApi<'a> {"));
    assert!(source.contains("pub fn new(connection: &'a mut Connection) -> Self {"));
    assert!(source.contains("pub fn version(&mut self, args: &[ArgValue])"));
    assert!(source.contains("self.connection.run(\"version\", &tokens)"));
}

#[test]
fn renders_a_namespace_struct_per_interior_node() {
    let source = sample_source();
    assert!(source.contains("pub fn vm(&mut self) -> VmApi<'_> {"));
    assert!(source.contains("pub struct VmApi<'a> {"));
    assert!(source.contains("pub fn info(&mut self, args: &[ArgValue])"));
    assert!(source.contains("self.connection.run(\"vm info\", &tokens)"));
    assert!(source.contains("self.connection.run(\"vm launch\", &tokens)"));
}

#[rstest]
#[case::optional_choice(
    choice_slot(CHOICE | OPTIONAL, "summary", &["summary"]),
    "ArgSlot::choice(\"summary\", &[\"summary\"]).optional()"
)]
#[case::string(typed_slot(STRING, "name"), "ArgSlot::string(\"name\")")]
#[case::literal(literal_slot("background"), "ArgSlot::literal(\"background\")")]
#[case::optional_list(
    typed_slot(LIST | OPTIONAL, "arguments"),
    "ArgSlot::list(\"arguments\").optional()"
)]
fn embeds_slot_constructor_expressions(#[case] slot: PatternSlot, #[case] expected: &str) {
    let mut pattern = prefix_slots("shell");
    pattern.push(slot);
    let descriptors = vec![descriptor("shell", "Runs a shell command", vec![pattern])];

    let source =
        generate(&descriptors, &GeneratorConfig::default()).expect("generation succeeds");

    assert!(source.contains(expected), "missing `{expected}`");
}

#[test]
fn reuses_daemon_help_text_as_documentation() {
    let source = sample_source();
    assert!(source.contains("/// Reports VM state"));
    assert!(source.contains("/// Launches a VM"));
}

#[test]
fn escapes_keyword_method_names() {
    let mut pattern = prefix_slots("vm move");
    pattern.push(typed_slot(STRING, "target"));
    let descriptors = vec![descriptor("vm move", "Migrates a VM", vec![pattern])];

    let source =
        generate(&descriptors, &GeneratorConfig::default()).expect("generation succeeds");

    assert!(source.contains("pub fn move_(&mut self, args: &[ArgValue])"));
    assert!(source.contains("self.connection.run(\"vm move\", &tokens)"));
}

#[test]
fn invocable_prefixes_render_a_call_method() {
    let descriptors = vec![
        descriptor("vm", "Summarises all VMs", vec![prefix_slots("vm")]),
        descriptor("vm info", "Reports VM state", vec![prefix_slots("vm info")]),
    ];

    let source =
        generate(&descriptors, &GeneratorConfig::default()).expect("generation succeeds");

    assert!(source.contains("pub fn call(&mut self, args: &[ArgValue])"));
    assert!(source.contains("self.connection.run(\"vm\", &tokens)"));
}

#[test]
fn skip_list_excludes_commands() {
    let descriptors = vec![
        descriptor("version", "Reports the daemon version", vec![prefix_slots(
            "version",
        )]),
        descriptor("quit", "Stops the daemon", vec![prefix_slots("quit")]),
    ];
    let mut config = GeneratorConfig::default();
    config.skip.insert("quit");

    let source = generate(&descriptors, &config).expect("generation succeeds");

    assert!(source.contains("pub fn version"));
    assert!(!source.contains("pub fn quit"));
}

#[test]
fn commands_without_patterns_accept_only_empty_calls() {
    let descriptors = vec![descriptor("quit", "Stops the daemon", Vec::new())];

    let source =
        generate(&descriptors, &GeneratorConfig::default()).expect("generation succeeds");

    assert!(source.contains("let tokens = match_call(&[], args)?;"));
}
