use serde::{Deserialize, Serialize};
use crate::models::{Host, ThreatActor, VulnCount};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub op_id: String,
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
    #[serde(default)]
    pub diagnostic: bool,
}

#[derive(Debug, Deserialize)]
pub struct TopVulnerabilitiesQuery {
    #[serde(default)]
    pub op_id: String,
    pub limit: Option<u32>,
    #[serde(default)]
    pub diagnostic: bool,
}

#[derive(Debug, Deserialize)]
pub struct VulnerabilityDetailsQuery {
    #[serde(default)]
    pub op_id: String,
    #[serde(default)]
    pub cve: String,
    #[serde(default)]
    pub diagnostic: bool,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub op_id: String,
    #[serde(default)]
    pub vuln_ids: Vec<String>,
    #[serde(default)]
    pub diagnostic: bool,
}

#[derive(Debug, Deserialize)]
pub struct HostsQuery {
    #[serde(default)]
    pub op_id: String,
    #[serde(default)]
    pub host_id: String,
    #[serde(default)]
    pub diagnostic: bool,
}

#[derive(Serialize)]
pub struct TopVulnerabilitiesResponse {
    pub op_id: String,
    pub items: Vec<VulnCount>,
}

#[derive(Serialize)]
pub struct HostsResponse {
    pub op_id: String,
    pub hosts: Vec<Host>,
}

#[derive(Serialize)]
pub struct ThreatActorsResponse {
    pub op_id: String,
    pub host_id: String,
    pub threat_actors: Vec<ThreatActor>,
}
