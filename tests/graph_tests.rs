// ABOUTME: Integration tests for task discovery and dependency ordering
// ABOUTME: Exercises suite layouts, dependency file merging, and topological sorting

mod common;

use orderflow::engine::graph::{discover, load_dependencies, topo_sort};
use orderflow::engine::ExecutionError;
use serde_json::json;

use common::{OrderFixture, WorkflowFixture};

#[test]
fn test_discovery_across_suites_is_sorted() {
    let fixture = WorkflowFixture::new();
    fixture.add_order("beta", "late", &OrderFixture::clean("PO-1"));
    fixture.add_order("alpha", "second", &OrderFixture::clean("PO-2"));
    fixture.add_order("alpha", "first", &OrderFixture::clean("PO-3"));

    let tasks = discover(fixture.root(), None).unwrap();
    let ids: Vec<&String> = tasks.keys().collect();

    assert_eq!(ids, vec!["alpha/first", "alpha/second", "beta/late"]);
    for task in tasks.values() {
        assert!(task.dependencies.is_empty());
        assert!(task.document.is_none());
    }
}

#[test]
fn test_global_and_suite_dependency_merge() {
    let fixture = WorkflowFixture::new();
    fixture.add_order("alpha", "a", &OrderFixture::clean("PO-1"));
    fixture.add_order("alpha", "b", &OrderFixture::clean("PO-2"));
    fixture.add_order("beta", "c", &OrderFixture::clean("PO-3"));

    // The global file is keyed by full identity and may cross suites.
    fixture.write_global_dependencies(json!({
        "beta/c": ["alpha/a"],
        "alpha/b": ["alpha/a"],
    }));
    // The suite file overrides the global entry for alpha/b.
    fixture.write_suite_dependencies("alpha", json!({"b": []}));

    let tasks = discover(fixture.root(), None).unwrap();
    let ids: Vec<String> = tasks.keys().cloned().collect();
    let deps = load_dependencies(fixture.root(), &ids, None).unwrap();

    assert!(deps["alpha/b"].is_empty());
    assert_eq!(deps["beta/c"], vec!["alpha/a"]);
}

#[test]
fn test_unknown_dependency_names_are_dropped() {
    let fixture = WorkflowFixture::new();
    fixture.add_order("alpha", "a", &OrderFixture::clean("PO-1"));
    fixture.add_order("alpha", "b", &OrderFixture::clean("PO-2"));
    fixture.write_global_dependencies(json!({
        "alpha/b": ["alpha/a", "alpha/ghost", "other/missing"],
    }));

    let tasks = discover(fixture.root(), None).unwrap();
    let ids: Vec<String> = tasks.keys().cloned().collect();
    let deps = load_dependencies(fixture.root(), &ids, None).unwrap();

    assert_eq!(deps["alpha/b"], vec!["alpha/a"]);
}

#[test]
fn test_topo_sort_orders_dependencies_first() {
    let fixture = WorkflowFixture::new();
    for name in ["a", "b", "c", "d"] {
        fixture.add_order("s", name, &OrderFixture::clean(&format!("PO-{}", name)));
    }
    fixture.write_suite_dependencies(
        "s",
        json!({
            "d": ["b", "c"],
            "b": ["a"],
            "c": ["a"],
        }),
    );

    let mut tasks = discover(fixture.root(), None).unwrap();
    let ids: Vec<String> = tasks.keys().cloned().collect();
    let deps = load_dependencies(fixture.root(), &ids, None).unwrap();
    for (id, dependencies) in deps {
        if let Some(task) = tasks.get_mut(&id) {
            task.dependencies = dependencies;
        }
    }

    let order = topo_sort(&tasks).unwrap();
    assert_eq!(order, vec!["s/a", "s/b", "s/c", "s/d"]);

    let position = |id: &str| order.iter().position(|t| t == id).unwrap();
    for (task_id, task) in &tasks {
        for dep in &task.dependencies {
            assert!(position(dep) < position(task_id));
        }
    }
}

#[test]
fn test_cycle_is_detected() {
    let fixture = WorkflowFixture::new();
    fixture.add_order("s", "a", &OrderFixture::clean("PO-1"));
    fixture.add_order("s", "b", &OrderFixture::clean("PO-2"));
    fixture.write_suite_dependencies("s", json!({"a": ["b"], "b": ["a"]}));

    let mut tasks = discover(fixture.root(), None).unwrap();
    let ids: Vec<String> = tasks.keys().cloned().collect();
    let deps = load_dependencies(fixture.root(), &ids, None).unwrap();
    for (id, dependencies) in deps {
        if let Some(task) = tasks.get_mut(&id) {
            task.dependencies = dependencies;
        }
    }

    let result = topo_sort(&tasks);
    match result {
        Err(ExecutionError::CircularDependency { tasks }) => {
            assert_eq!(tasks, vec!["s/a", "s/b"]);
        }
        other => panic!("expected cycle error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_scoped_discovery_uses_local_dependency_file() {
    let fixture = WorkflowFixture::new();
    fixture.add_order("alpha", "a", &OrderFixture::clean("PO-1"));
    fixture.add_order("alpha", "b", &OrderFixture::clean("PO-2"));
    fixture.write_suite_dependencies("alpha", json!({"b": ["a"]}));

    let tasks = discover(fixture.root(), Some("alpha")).unwrap();
    let ids: Vec<String> = tasks.keys().cloned().collect();
    let deps = load_dependencies(fixture.root(), &ids, Some("alpha")).unwrap();

    assert_eq!(deps["alpha/b"], vec!["alpha/a"]);
}
