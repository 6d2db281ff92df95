use serde::{Deserialize, Serialize};

/// Directed relation reported by the backend inside an attack path, when it reports any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub from_id: String,
    pub to_id: String,
}

/// Canonical attack path record, independent of the query variant that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackPathRecord {
    /// Backend id, or a synthesized one when `id_synthesized` is set.
    pub id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub id_synthesized: bool,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub attack_path_title: Option<String>,
    pub severity: Option<String>,
    pub score: Option<f64>,
    pub host_name: Option<String>,
    pub host_text: Option<String>,
    pub ip: Option<String>,
    pub impact_title: Option<String>,
    pub impact_description: Option<String>,
    pub context_score_description: Option<String>,
    pub context_score_description_md: Option<String>,
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<RawEdge>,
}

impl AttackPathRecord {
    /// Display title: the attack path title, else the name.
    pub fn title(&self) -> Option<&str> {
        self.attack_path_title.as_deref().or(self.name.as_deref())
    }

    /// Free-text fields scanned for vulnerability ids, aliases and asset categories.
    pub fn free_text(&self) -> Vec<&str> {
        [
            &self.attack_path_title,
            &self.name,
            &self.impact_title,
            &self.impact_description,
            &self.context_score_description_md,
            &self.context_score_description,
            &self.host_text,
            &self.host_name,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .filter(|s| !s.is_empty())
        .collect()
    }

    pub fn text_blob(&self) -> String {
        self.free_text().join("  ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_next: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Name of the query variant that produced this page.
    #[serde(rename = "_variant")]
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPage {
    pub page_info: PageInfo,
    pub attack_paths: Vec<AttackPathRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_attack_path_title() {
        let record = AttackPathRecord {
            name: Some("fallback".into()),
            attack_path_title: Some("Domain admin via relay".into()),
            ..Default::default()
        };
        assert_eq!(record.title(), Some("Domain admin via relay"));

        let record = AttackPathRecord { name: Some("fallback".into()), ..Default::default() };
        assert_eq!(record.title(), Some("fallback"));
    }

    #[test]
    fn test_text_blob_skips_empty_fields() {
        let record = AttackPathRecord {
            attack_path_title: Some("Title".into()),
            impact_description: Some(String::new()),
            host_name: Some("dc01".into()),
            ..Default::default()
        };
        assert_eq!(record.text_blob(), "Title  dc01");
    }

    #[test]
    fn test_synthesized_flag_not_serialized_when_false() {
        let record = AttackPathRecord { id: "a".into(), ..Default::default() };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id_synthesized").is_none());
        assert!(json.get("edges").is_none());
    }
}
