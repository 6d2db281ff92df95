use std::collections::HashSet;
use crate::models::AttackPathRecord;
use super::builder::GraphEdge;

/// Infers edges between the nodes built from `records`.
pub trait TopologyStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn infer(&self, records: &[AttackPathRecord]) -> Vec<GraphEdge>;
}

/// Connects record i to record i+1 in received order. This is an
/// approximation used while the upstream exposes no path topology.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearChain;

impl TopologyStrategy for LinearChain {
    fn name(&self) -> &'static str {
        "linear_chain"
    }

    fn infer(&self, records: &[AttackPathRecord]) -> Vec<GraphEdge> {
        records
            .windows(2)
            .map(|pair| GraphEdge::new(&pair[0].id, &pair[1].id))
            .collect()
    }
}

/// Uses the `edges` the upstream attached to records. Falls back to
/// [`LinearChain`] when no edges were supplied or any endpoint is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEdges;

impl TopologyStrategy for ExplicitEdges {
    fn name(&self) -> &'static str {
        "explicit_edges"
    }

    fn infer(&self, records: &[AttackPathRecord]) -> Vec<GraphEdge> {
        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let raw: Vec<_> = records.iter().flat_map(|r| r.edges.iter()).collect();

        let resolves = !raw.is_empty()
            && raw.iter().all(|e| ids.contains(e.from_id.as_str()) && ids.contains(e.to_id.as_str()));
        if !resolves {
            tracing::debug!(supplied = raw.len(), "Explicit edges unusable, using linear chain");
            return LinearChain.infer(records);
        }

        let mut seen = HashSet::new();
        raw.into_iter()
            .filter(|e| seen.insert((e.from_id.as_str(), e.to_id.as_str())))
            .map(|e| GraphEdge::new(&e.from_id, &e.to_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawEdge;

    fn record(id: &str) -> AttackPathRecord {
        AttackPathRecord { id: id.into(), ..Default::default() }
    }

    fn edge(from: &str, to: &str) -> RawEdge {
        RawEdge { from_id: from.into(), to_id: to.into() }
    }

    #[test]
    fn test_linear_chain() {
        let edges = LinearChain.infer(&[record("a"), record("b"), record("c")]);
        assert_eq!(edges, vec![GraphEdge::new("a", "b"), GraphEdge::new("b", "c")]);
        assert!(LinearChain.infer(&[record("a")]).is_empty());
        assert!(LinearChain.infer(&[]).is_empty());
    }

    #[test]
    fn test_explicit_edges_used_when_resolvable() {
        let mut a = record("a");
        a.edges = vec![edge("a", "c"), edge("a", "b"), edge("a", "c")];
        let edges = ExplicitEdges.infer(&[a, record("b"), record("c")]);
        assert_eq!(edges, vec![GraphEdge::new("a", "c"), GraphEdge::new("a", "b")]);
    }

    #[test]
    fn test_explicit_edges_fall_back_on_unknown_endpoint() {
        let mut a = record("a");
        a.edges = vec![edge("a", "zz")];
        let edges = ExplicitEdges.infer(&[a, record("b")]);
        assert_eq!(edges, vec![GraphEdge::new("a", "b")]);
    }
}
