// ABOUTME: Task discovery, dependency loading, and deterministic topological ordering
// ABOUTME: Kahn's algorithm with a lexicographic tie-break for reproducible schedules

use indexmap::IndexMap;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::error::{ExecutionError, Result};
use super::task::Task;

/// Discover task inputs under a root directory, optionally scoped to one
/// suite. Each suite directory holds its order documents in `input/*.json`.
/// Enumeration is sorted so discovery order is stable across runs.
pub fn discover(root: &Path, suite: Option<&str>) -> Result<IndexMap<String, Task>> {
    let suite_dirs: Vec<PathBuf> = match suite {
        Some(name) => {
            let dir = root.join(name);
            if !dir.is_dir() {
                return Err(ExecutionError::SuiteNotFound {
                    suite: name.to_string(),
                    root: root.to_path_buf(),
                });
            }
            vec![dir]
        }
        None => read_dir_sorted(root)?
            .into_iter()
            .filter(|path| path.is_dir())
            .collect(),
    };

    let mut tasks = IndexMap::new();
    for suite_dir in suite_dirs {
        let suite_name = match suite_dir.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        let input_dir = suite_dir.join("input");
        if !input_dir.is_dir() {
            continue;
        }

        for path in read_dir_sorted(&input_dir)? {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let name = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let task = Task::new(suite_name.clone(), name, path);
            tasks.insert(task.id(), task);
        }
    }

    if tasks.is_empty() {
        return Err(ExecutionError::NoTasks {
            root: root.to_path_buf(),
        });
    }

    debug!("Discovered {} tasks under {}", tasks.len(), root.display());
    Ok(tasks)
}

/// Load declared dependencies for the discovered tasks.
///
/// The global `<root>/dependencies.json` is keyed by full `suite/name`
/// identity; each suite may add a `<suite>/dependencies.json` keyed by local
/// name, expanded to the qualified identity and overriding the global entry
/// for the same task. Dependencies naming an unknown task are dropped with a
/// warning rather than failing the run.
pub fn load_dependencies(
    root: &Path,
    task_ids: &[String],
    suite: Option<&str>,
) -> Result<HashMap<String, Vec<String>>> {
    let known: HashSet<&str> = task_ids.iter().map(String::as_str).collect();
    let mut dependencies: HashMap<String, Vec<String>> = task_ids
        .iter()
        .map(|id| (id.clone(), Vec::new()))
        .collect();

    let global_file = root.join("dependencies.json");
    if global_file.is_file() {
        for (task_id, declared) in read_dependency_file(&global_file)? {
            if !known.contains(task_id.as_str()) {
                continue;
            }
            dependencies.insert(task_id.clone(), keep_known(&task_id, declared, &known));
        }
    }

    let suites: HashSet<String> = match suite {
        Some(name) => [name.to_string()].into(),
        None => task_ids
            .iter()
            .filter_map(|id| id.split_once('/').map(|(suite, _)| suite.to_string()))
            .collect(),
    };

    for suite_name in suites {
        let suite_file = root.join(&suite_name).join("dependencies.json");
        if !suite_file.is_file() {
            continue;
        }
        for (local_name, declared) in read_dependency_file(&suite_file)? {
            let task_id = format!("{}/{}", suite_name, local_name);
            if !known.contains(task_id.as_str()) {
                continue;
            }
            let expanded: Vec<String> = declared
                .into_iter()
                .map(|dep| {
                    if dep.contains('/') {
                        dep
                    } else {
                        format!("{}/{}", suite_name, dep)
                    }
                })
                .collect();
            dependencies.insert(task_id.clone(), keep_known(&task_id, expanded, &known));
        }
    }

    Ok(dependencies)
}

/// Deterministic topological order over the task graph. Among all tasks with
/// zero remaining in-degree the lexicographically smallest identity runs
/// first, and the ready set is re-sorted after every removal, so identical
/// inputs always produce identical schedules.
pub fn topo_sort(tasks: &IndexMap<String, Task>) -> Result<Vec<String>> {
    let mut graph: Graph<String, ()> = Graph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

    for task_id in tasks.keys() {
        let node = graph.add_node(task_id.clone());
        indices.insert(task_id.as_str(), node);
    }

    for (task_id, task) in tasks {
        let task_node = indices[task_id.as_str()];
        for dependency in &task.dependencies {
            let dep_node = indices.get(dependency.as_str()).ok_or_else(|| {
                ExecutionError::UnknownDependency {
                    task: task_id.clone(),
                    dependency: dependency.clone(),
                }
            })?;
            graph.add_edge(*dep_node, task_node, ());
        }
    }

    let mut indegree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|node| {
            (
                node,
                graph.neighbors_directed(node, Direction::Incoming).count(),
            )
        })
        .collect();

    let mut ready: Vec<NodeIndex> = indegree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| *node)
        .collect();
    ready.sort_by(|a, b| graph[*a].cmp(&graph[*b]));

    let mut ordered = Vec::with_capacity(tasks.len());
    while !ready.is_empty() {
        let node = ready.remove(0);
        ordered.push(graph[node].clone());

        for child in graph.neighbors_directed(node, Direction::Outgoing) {
            if let Some(count) = indegree.get_mut(&child) {
                *count -= 1;
                if *count == 0 {
                    ready.push(child);
                }
            }
        }
        ready.sort_by(|a, b| graph[*a].cmp(&graph[*b]));
    }

    if ordered.len() != tasks.len() {
        let ordered_set: HashSet<&str> = ordered.iter().map(String::as_str).collect();
        let mut stuck: Vec<String> = tasks
            .keys()
            .filter(|id| !ordered_set.contains(id.as_str()))
            .cloned()
            .collect();
        stuck.sort();
        return Err(ExecutionError::CircularDependency { tasks: stuck });
    }

    Ok(ordered)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| ExecutionError::Discovery {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ExecutionError::Discovery {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn read_dependency_file(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    let raw = fs::read_to_string(path).map_err(|source| ExecutionError::DependencyFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ExecutionError::DependencyFormat {
        path: path.to_path_buf(),
        source,
    })
}

fn keep_known(task_id: &str, declared: Vec<String>, known: &HashSet<&str>) -> Vec<String> {
    declared
        .into_iter()
        .filter(|dep| {
            let keep = known.contains(dep.as_str());
            if !keep {
                warn!(
                    "Dropping dependency '{}' of task '{}': no such task discovered",
                    dep, task_id
                );
            }
            keep
        })
        .collect()
}
