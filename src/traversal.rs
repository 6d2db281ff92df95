//! Presentation walk-through ordering over the post-simulation graph.

use std::collections::{BTreeSet, HashMap, VecDeque};
use crate::graph::GraphEdge;

/// Shortest chain (by edge count) from `start` to the nearest node in
/// `targets`, using only edges whose endpoints are both in `reachable`.
///
/// Returns `[start]` when no target can be reached.
pub fn shortest_chain(
    start: &str,
    targets: &BTreeSet<String>,
    edges: &[GraphEdge],
    reachable: &BTreeSet<String>,
) -> Vec<String> {
    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        if reachable.contains(&edge.source) && reachable.contains(&edge.target) {
            outgoing.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
        }
    }

    let mut queue = VecDeque::new();
    let mut visited: HashMap<&str, Option<&str>> = HashMap::new(); // node -> parent

    queue.push_back(start);
    visited.insert(start, None);

    while let Some(current) = queue.pop_front() {
        if targets.contains(current) {
            let mut path = Vec::new();
            let mut cursor = Some(current);
            while let Some(node) = cursor {
                path.push(node.to_string());
                cursor = visited.get(node).copied().flatten();
            }
            path.reverse();
            return path;
        }

        for &next in outgoing.get(current).into_iter().flatten() {
            if !visited.contains_key(next) {
                visited.insert(next, Some(current));
                queue.push_back(next);
            }
        }
    }

    vec![start.to_string()]
}
