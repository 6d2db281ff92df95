use serde_json::Value;
use crate::errors::CtemError;
use crate::models::{Host, ThreatActor, VulnAdvisory, VulnCount};
use super::fields::{first_text, number, text};
use super::page::{list_items, required};

/// List at `path` under `data`; the first segment must exist, deeper ones may be null.
pub fn list_at<'a>(data: &'a Value, path: &[&str]) -> Result<&'a [Value], CtemError> {
    let Some((first, rest)) = path.split_first() else {
        return list_items(data, "data");
    };
    let mut current = required(data, first)?;
    for key in rest {
        current = current.get(*key).unwrap_or(&Value::Null);
    }
    list_items(current, path.last().copied().unwrap_or(*first))
}

pub fn normalize_vuln_counts(items: &[Value], id_key: &str) -> Vec<VulnCount> {
    items.iter()
        .filter_map(|raw| {
            Some(VulnCount {
                id: text(raw, id_key)?.to_uppercase(),
                count: number(raw, &["count"]).map(|n| n.max(0.0) as u64).unwrap_or(0),
            })
        })
        .collect()
}

pub fn normalize_hosts(items: &[Value]) -> Vec<Host> {
    items.iter()
        .filter_map(|raw| {
            let hostname = text(raw, "hostname");
            let ip = text(raw, "ip");
            let id = text(raw, "id").or_else(|| hostname.clone()).or_else(|| ip.clone())?;
            Some(Host { id, hostname, ip })
        })
        .collect()
}

pub fn normalize_tripwires(items: &[Value]) -> Vec<ThreatActor> {
    items.iter()
        .map(|raw| ThreatActor {
            actor: first_text(raw, &["actor", "rule_name"]).unwrap_or_else(|| "Unknown".to_string()),
            last_seen: text(raw, "created_at"),
            severity: text(raw, "severity")
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|| "INFO".to_string()),
            technique: first_text(raw, &["technique_id", "technique"]),
            description: text(raw, "description"),
            rule_name: text(raw, "rule_name"),
        })
        .collect()
}

pub fn normalize_advisory(raw: &Value, requested: &str) -> VulnAdvisory {
    let id = first_text(raw, &["cve", "id"]).unwrap_or_else(|| requested.to_string());
    VulnAdvisory {
        title: text(raw, "title").unwrap_or_else(|| id.clone()),
        description: text(raw, "description").unwrap_or_else(|| "No details available".to_string()),
        cvss: number(raw, &["cvss"]),
        references: raw.get("references")
            .and_then(Value::as_array)
            .map(|refs| refs.iter().filter_map(|r| r.as_str().map(str::to_string)).collect())
            .unwrap_or_default(),
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_at_nested() {
        let data = json!({"hosts_page": {"hosts": [{"id": "h1"}]}});
        assert_eq!(list_at(&data, &["hosts_page", "hosts"]).unwrap().len(), 1);
    }

    #[test]
    fn test_list_at_missing_inner_is_empty() {
        let data = json!({"hosts_page": {}});
        assert!(list_at(&data, &["hosts_page", "hosts"]).unwrap().is_empty());
    }

    #[test]
    fn test_list_at_missing_root_fails() {
        let data = json!({});
        assert!(list_at(&data, &["hosts_page", "hosts"]).is_err());
    }

    #[test]
    fn test_vuln_counts_from_weakness_ids() {
        let items = [json!({"weakness_id": "cve-2020-1472", "count": 4}), json!({"count": 1})];
        let counts = normalize_vuln_counts(&items, "weakness_id");
        assert_eq!(counts, vec![VulnCount { id: "CVE-2020-1472".into(), count: 4 }]);
    }

    #[test]
    fn test_hosts_fall_back_to_hostname_for_id() {
        let items = [
            json!({"id": "h1", "hostname": "dc01", "ip": "10.0.0.1"}),
            json!({"hostname": "web01"}),
            json!({}),
        ];
        let hosts = normalize_hosts(&items);
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[1].id, "web01");
    }

    #[test]
    fn test_tripwire_defaults() {
        let items = [json!({
            "id": "t1",
            "created_at": "2024-05-01T10:00:00Z",
            "rule_name": "LSASS access",
            "technique_id": "T1003.001"
        })];
        let actors = normalize_tripwires(&items);
        assert_eq!(actors[0].actor, "LSASS access");
        assert_eq!(actors[0].severity, "INFO");
        assert_eq!(actors[0].technique.as_deref(), Some("T1003.001"));
        assert_eq!(actors[0].last_seen.as_deref(), Some("2024-05-01T10:00:00Z"));
    }

    #[test]
    fn test_advisory_defaults() {
        let advisory = normalize_advisory(&json!({"cvss": 9.8}), "CVE-2021-44228");
        assert_eq!(advisory.id, "CVE-2021-44228");
        assert_eq!(advisory.title, "CVE-2021-44228");
        assert_eq!(advisory.cvss, Some(9.8));
        assert!(advisory.references.is_empty());
    }
}
