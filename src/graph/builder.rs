use std::collections::{BTreeMap, BTreeSet};
use serde::Serialize;
use crate::models::AttackPathRecord;
use super::classify::CrownJewelTable;
use super::extract::extract_vuln_ids;
use super::topology::{LinearChain, TopologyStrategy};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub severity: Option<String>,
    pub score: Option<f64>,
    pub host: Option<String>,
    pub extracted_vuln_ids: BTreeSet<String>,
    pub is_crown_jewel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_jewel_category: Option<String>,
    /// Concatenated free text the node was classified from.
    #[serde(skip)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self { source: source.to_string(), target: target.to_string() }
    }
}

/// Node count per hostname and the first node seen on each host.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostStats {
    pub counts: BTreeMap<String, usize>,
    pub first_node: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttackGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub topology: String,
}

impl AttackGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn crown_jewels(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.is_crown_jewel)
    }

    pub fn host_stats(&self) -> HostStats {
        let mut stats = HostStats::default();
        for node in &self.nodes {
            let Some(host) = node.host.as_deref() else { continue };
            *stats.counts.entry(host.to_string()).or_default() += 1;
            stats.first_node.entry(host.to_string()).or_insert_with(|| node.id.clone());
        }
        stats
    }
}

/// Turns normalized records into an [`AttackGraph`]: one node per record,
/// edges from the configured topology strategy.
pub struct GraphBuilder {
    crown_jewels: CrownJewelTable,
    topology: Box<dyn TopologyStrategy>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(CrownJewelTable::default(), Box::new(LinearChain))
    }
}

impl GraphBuilder {
    pub fn new(crown_jewels: CrownJewelTable, topology: Box<dyn TopologyStrategy>) -> Self {
        Self { crown_jewels, topology }
    }

    pub fn crown_jewels(&self) -> &CrownJewelTable {
        &self.crown_jewels
    }

    pub fn build(&self, records: &[AttackPathRecord]) -> AttackGraph {
        let nodes: Vec<GraphNode> = records.iter().map(|r| self.node(r)).collect();
        let edges = self.topology.infer(records);

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            crown_jewels = nodes.iter().filter(|n| n.is_crown_jewel).count(),
            topology = self.topology.name(),
            "Graph built"
        );

        AttackGraph { nodes, edges, topology: self.topology.name().to_string() }
    }

    fn node(&self, record: &AttackPathRecord) -> GraphNode {
        let text = record.text_blob();
        let category = self.crown_jewels.classify(&text).map(str::to_string);
        let label = record.title().unwrap_or(&record.id).to_string();

        GraphNode {
            id: record.id.clone(),
            label,
            severity: record.severity.clone(),
            score: record.score,
            host: record.host_name.clone(),
            extracted_vuln_ids: extract_vuln_ids(&text),
            is_crown_jewel: category.is_some(),
            crown_jewel_category: category,
            text,
        }
    }
}
