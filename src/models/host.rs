use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    pub hostname: Option<String>,
    pub ip: Option<String>,
}

/// A tripwire hit attributed to a threat actor on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatActor {
    pub actor: String,
    /// RFC 3339 timestamp of the tripwire, when reported.
    pub last_seen: Option<String>,
    pub severity: String,
    pub technique: Option<String>,
    pub description: Option<String>,
    pub rule_name: Option<String>,
}
