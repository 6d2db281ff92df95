use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnCount {
    pub id: String,
    pub count: u64,
}

/// Upstream advisory for a single vulnerability id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnAdvisory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cvss: Option<f64>,
    pub references: Vec<String>,
}

impl VulnAdvisory {
    pub fn unavailable(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: id.to_string(),
            description: "No details available".to_string(),
            cvss: None,
            references: Vec::new(),
        }
    }
}

/// One attack path that mentions a given vulnerability id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: String,
    pub uuid: Option<String>,
    pub title: Option<String>,
    pub impact_title: Option<String>,
    pub impact_description: Option<String>,
    pub context_score_description: Option<String>,
    pub context_score_description_md: Option<String>,
    pub hosts: Option<String>,
    pub created_at: Option<String>,
    pub severity: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceExample {
    pub id: String,
    pub title: Option<String>,
    pub hosts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceSummary {
    pub vuln_id: String,
    pub occurrence_count: usize,
    pub examples: Vec<OccurrenceExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityDetails {
    pub summary: OccurrenceSummary,
    pub occurrences: Vec<Occurrence>,
    pub advisory: VulnAdvisory,
}
