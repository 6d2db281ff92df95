use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};

/// Effect of disrupting a set of vulnerabilities. Recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub paths_total: usize,
    pub paths_disrupted: usize,
    pub percent_reduction: f64,
    pub disrupted_path_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reachability {
    pub entry: Option<String>,
    pub reachable: BTreeSet<String>,
    /// Crown jewel id to whether it is still reachable from the entry node.
    pub crown_jewels: BTreeMap<String, bool>,
}

/// Simulation outcome plus the derived views the presentation layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    #[serde(flatten)]
    pub result: SimulationResult,
    pub reachability: Reachability,
    pub chain: Vec<String>,
}
