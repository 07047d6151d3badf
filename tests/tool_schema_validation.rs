//! Validates that every built-in tool exposes a well-formed schema and a
//! client-acceptable name.

mod support;

use std::sync::Arc;

use glif_mcp::tools::builtin::{core_tools, optional_groups};
use glif_mcp::tools::{SavedToolStore, Tool, is_valid_tool_name, validate_tool_schema};

use support::{MockApi, StubFetcher, runner};

fn all_builtin_tools(dir: &tempfile::TempDir) -> Vec<Arc<dyn Tool>> {
    let runner = runner(Arc::new(MockApi::new()), StubFetcher::default());
    let store = Arc::new(SavedToolStore::new(dir.path().join("tools.json")));

    let mut tools = core_tools(&runner);
    for group in optional_groups(&runner, &store) {
        tools.extend(group.tools);
    }
    tools
}

#[test]
fn all_builtin_tool_schemas_are_valid() {
    let dir = tempfile::tempdir().unwrap();
    let tools = all_builtin_tools(&dir);
    assert!(!tools.is_empty());

    let mut all_errors = Vec::new();
    for tool in &tools {
        let errors = validate_tool_schema(&tool.parameters_schema(), tool.name());
        if !errors.is_empty() {
            all_errors.push(format!(
                "Tool '{}' has schema errors:\n  {}",
                tool.name(),
                errors.join("\n  ")
            ));
        }
        if !is_valid_tool_name(tool.name()) {
            all_errors.push(format!("Tool name '{}' is not a valid identifier", tool.name()));
        }
        if tool.description().trim().is_empty() {
            all_errors.push(format!("Tool '{}' has no description", tool.name()));
        }
    }

    assert!(
        all_errors.is_empty(),
        "Tool schema validation failures:\n{}",
        all_errors.join("\n\n")
    );
}

/// Guards against a new tool being added without schema coverage.
#[test]
fn builtin_registration_covers_expected_tools() {
    let dir = tempfile::tempdir().unwrap();
    let mut names: Vec<String> = all_builtin_tools(&dir)
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    names.sort();

    let expected = &[
        "glif_info",
        "list_agents",
        "list_featured_glifs",
        "list_saved_glif_tools",
        "load_agent",
        "my_glifs",
        "my_user_info",
        "remove_all_glif_tools",
        "remove_glif_tool",
        "run_glif",
        "save_glif_as_tool",
        "search_glifs",
    ];

    assert_eq!(
        names, expected,
        "Built-in tool set changed. Update this test and ensure new tools have valid schemas."
    );
}

#[test]
fn group_names_are_stable() {
    let dir = tempfile::tempdir().unwrap();
    let runner = runner(Arc::new(MockApi::new()), StubFetcher::default());
    let store = Arc::new(SavedToolStore::new(dir.path().join("tools.json")));
    let names: Vec<_> = optional_groups(&runner, &store)
        .iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["discovery", "metaskill", "agents"]);
}
