use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use crate::graph::AttackGraph;
use crate::models::{Reachability, SimulationReport, SimulationResult};
use crate::traversal::shortest_chain;
use super::aliases::AliasTable;

/// Remediation what-if over a built graph. Pure: the same graph and
/// selection always produce the same result.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    aliases: AliasTable,
}

impl SimulationEngine {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Mark every node whose free text mentions a selected id or one of its
    /// aliases (case-insensitive substring) as disrupted.
    pub fn simulate<S: AsRef<str>>(&self, graph: &AttackGraph, selected: impl IntoIterator<Item = S>) -> SimulationResult {
        let terms = self.aliases.expand(selected);

        let disrupted_path_ids: BTreeSet<String> = if terms.is_empty() {
            BTreeSet::new()
        } else {
            graph
                .nodes
                .iter()
                .filter(|node| {
                    let hay = node.text.to_uppercase();
                    terms.iter().any(|t| hay.contains(t.as_str()))
                })
                .map(|node| node.id.clone())
                .collect()
        };

        let paths_total = graph.nodes.len();
        let paths_disrupted = disrupted_path_ids.len();

        SimulationResult {
            paths_total,
            paths_disrupted,
            percent_reduction: percent_reduction(paths_disrupted, paths_total),
            disrupted_path_ids,
        }
    }

    /// Nodes still reachable from the entry node once `disrupted` nodes and
    /// their edges are removed.
    pub fn reachability(&self, graph: &AttackGraph, disrupted: &BTreeSet<String>) -> Reachability {
        let live: Vec<&str> = graph
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| !disrupted.contains(*id))
            .collect();

        let mut outgoing: HashMap<&str, Vec<&str>> = live.iter().map(|id| (*id, Vec::new())).collect();
        let mut in_degree: HashMap<&str, usize> = live.iter().map(|id| (*id, 0)).collect();
        for edge in &graph.edges {
            let (source, target) = (edge.source.as_str(), edge.target.as_str());
            if !outgoing.contains_key(source) || !outgoing.contains_key(target) {
                continue;
            }
            if let Some(targets) = outgoing.get_mut(source) {
                targets.push(target);
            }
            if let Some(d) = in_degree.get_mut(target) {
                *d += 1;
            }
        }

        let entry = live
            .iter()
            .find(|id| in_degree.get(**id) == Some(&0))
            .or_else(|| live.first())
            .copied();

        let mut reachable = BTreeSet::new();
        if let Some(start) = entry {
            let mut queue = VecDeque::from([start]);
            reachable.insert(start.to_string());
            while let Some(current) = queue.pop_front() {
                for &next in outgoing.get(current).into_iter().flatten() {
                    if reachable.insert(next.to_string()) {
                        queue.push_back(next);
                    }
                }
            }
        }

        let crown_jewels: BTreeMap<String, bool> = graph
            .crown_jewels()
            .map(|n| (n.id.clone(), reachable.contains(&n.id)))
            .collect();

        Reachability {
            entry: entry.map(str::to_string),
            reachable,
            crown_jewels,
        }
    }

    /// Simulation result, reachability and the presentation chain from the
    /// entry node to the nearest connected crown jewel (or, when none is
    /// connected, to any reachable node).
    pub fn report<S: AsRef<str>>(&self, graph: &AttackGraph, selected: impl IntoIterator<Item = S>) -> SimulationReport {
        let result = self.simulate(graph, selected);
        let reachability = self.reachability(graph, &result.disrupted_path_ids);

        let chain = match reachability.entry.as_deref() {
            Some(entry) => {
                let connected: BTreeSet<String> = reachability
                    .crown_jewels
                    .iter()
                    .filter(|(_, connected)| **connected)
                    .map(|(id, _)| id.clone())
                    .collect();
                let targets = if connected.is_empty() { &reachability.reachable } else { &connected };
                shortest_chain(entry, targets, &graph.edges, &reachability.reachable)
            }
            None => Vec::new(),
        };

        tracing::info!(
            paths_total = result.paths_total,
            paths_disrupted = result.paths_disrupted,
            percent_reduction = result.percent_reduction,
            reachable = reachability.reachable.len(),
            "Remediation simulated"
        );

        SimulationReport { result, reachability, chain }
    }
}

/// `disrupted / total` as a percentage rounded to one decimal, half away
/// from zero. Zero when `total` is zero.
pub fn percent_reduction(disrupted: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (disrupted as f64 * 1000.0 / total as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, GraphEdge, GraphNode};
    use crate::models::AttackPathRecord;

    fn node(id: &str, text: &str, crown_jewel: bool) -> GraphNode {
        GraphNode {
            id: id.into(),
            label: id.into(),
            severity: None,
            score: None,
            host: None,
            extracted_vuln_ids: BTreeSet::new(),
            is_crown_jewel: crown_jewel,
            crown_jewel_category: crown_jewel.then(|| "directory-services".to_string()),
            text: text.into(),
        }
    }

    fn chain_graph() -> AttackGraph {
        AttackGraph {
            nodes: vec![
                node("A", "phishing foothold", false),
                node("B", "lateral movement via CVE-2017-0144", false),
                node("C", "credential dump", false),
                node("D", "domain controller", true),
            ],
            edges: vec![GraphEdge::new("A", "B"), GraphEdge::new("B", "C"), GraphEdge::new("C", "D")],
            topology: "linear_chain".into(),
        }
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_percent_reduction() {
        assert_eq!(percent_reduction(13, 40), 32.5);
        assert_eq!(percent_reduction(1, 3), 33.3);
        assert_eq!(percent_reduction(2, 3), 66.7);
        assert_eq!(percent_reduction(0, 0), 0.0);
        assert_eq!(percent_reduction(5, 5), 100.0);
    }

    #[test]
    fn test_simulate_empty_graph() {
        let result = SimulationEngine::default().simulate(&AttackGraph::default(), ["CVE-2017-0144"]);
        assert_eq!(result.paths_total, 0);
        assert_eq!(result.percent_reduction, 0.0);
    }

    #[test]
    fn test_simulate_case_insensitive_match() {
        let result = SimulationEngine::default().simulate(&chain_graph(), ["cve-2017-0144"]);
        assert_eq!(result.disrupted_path_ids, set(&["B"]));
        assert_eq!(result.percent_reduction, 25.0);
    }

    #[test]
    fn test_empty_selection_disrupts_nothing() {
        let result = SimulationEngine::default().simulate(&chain_graph(), Vec::<String>::new());
        assert!(result.disrupted_path_ids.is_empty());
        let blank = SimulationEngine::default().simulate(&chain_graph(), [""]);
        assert!(blank.disrupted_path_ids.is_empty());
    }

    #[test]
    fn test_reachability_cut_at_disrupted_node() {
        let engine = SimulationEngine::default();
        let reach = engine.reachability(&chain_graph(), &set(&["B"]));
        assert_eq!(reach.entry.as_deref(), Some("A"));
        assert_eq!(reach.reachable, set(&["A"]));
        assert_eq!(reach.crown_jewels.get("D"), Some(&false));
    }

    #[test]
    fn test_reachability_without_disruption() {
        let reach = SimulationEngine::default().reachability(&chain_graph(), &BTreeSet::new());
        assert_eq!(reach.reachable, set(&["A", "B", "C", "D"]));
        assert_eq!(reach.crown_jewels.get("D"), Some(&true));
    }

    #[test]
    fn test_entry_falls_back_to_first_node_in_cycle() {
        let mut graph = chain_graph();
        graph.edges.push(GraphEdge::new("D", "A"));
        let reach = SimulationEngine::default().reachability(&graph, &BTreeSet::new());
        assert_eq!(reach.entry.as_deref(), Some("A"));
        assert_eq!(reach.reachable.len(), 4);
    }

    #[test]
    fn test_everything_disrupted() {
        let reach = SimulationEngine::default().reachability(&chain_graph(), &set(&["A", "B", "C", "D"]));
        assert_eq!(reach.entry, None);
        assert!(reach.reachable.is_empty());
        assert_eq!(reach.crown_jewels.get("D"), Some(&false));
    }

    #[test]
    fn test_report_chain_targets_connected_crown_jewel() {
        let report = SimulationEngine::default().report(&chain_graph(), ["CVE-2099-0001"]);
        assert_eq!(report.chain, vec!["A", "B", "C", "D"]);
        assert_eq!(report.result.paths_disrupted, 0);
    }

    #[test]
    fn test_report_chain_without_connected_crown_jewel() {
        let report = SimulationEngine::default().report(&chain_graph(), ["MS17-010", "CVE-2017-0144"]);
        assert_eq!(report.result.disrupted_path_ids, set(&["B"]));
        assert_eq!(report.chain, vec!["A"]);
    }

    #[test]
    fn test_simulate_over_built_graph() {
        let records = vec![
            AttackPathRecord {
                id: "p1".into(),
                attack_path_title: Some("Relay".into()),
                impact_description: Some("Abuses Zerologon against netlogon".into()),
                ..Default::default()
            },
            AttackPathRecord { id: "p2".into(), attack_path_title: Some("Unrelated".into()), ..Default::default() },
        ];
        let graph = GraphBuilder::default().build(&records);
        let result = SimulationEngine::default().simulate(&graph, ["CVE-2020-1472"]);
        assert_eq!(result.disrupted_path_ids, set(&["p1"]));
        assert_eq!(result.percent_reduction, 50.0);
    }
}
