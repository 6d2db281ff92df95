pub mod builder;
pub mod classify;
pub mod extract;
pub mod topology;

pub use builder::{AttackGraph, GraphBuilder, GraphEdge, GraphNode, HostStats};
pub use classify::CrownJewelTable;
pub use extract::{extract_vuln_ids, tally_vuln_ids, MentionMatcher};
pub use topology::{ExplicitEdges, LinearChain, TopologyStrategy};
