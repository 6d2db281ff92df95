use std::collections::HashSet;
use serde_json::Value;
use uuid::Uuid;
use crate::models::{AttackPathRecord, RawEdge};
use super::fields::{first_text, number, text};
use tracing::debug;

/// Namespace for ids synthesized from natural keys.
const RECORD_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c1e_93a4_0b57_4d2e_9f6a_3e2b_c4d1_a870);

/// Map raw attack path objects to canonical records, synthesizing ids where the
/// backend omitted them. Ids depend only on this response and each record's position.
pub fn normalize_records(items: &[Value]) -> Vec<AttackPathRecord> {
    let mut records: Vec<AttackPathRecord> = items.iter().map(normalize_record).collect();

    let mut used: HashSet<String> = records.iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| r.id.clone())
        .collect();

    let mut synthesized = 0usize;
    for (position, (record, raw)) in records.iter_mut().zip(items).enumerate() {
        if !record.id.is_empty() {
            continue;
        }
        let id = synthesize_id(record, raw, position, &used);
        used.insert(id.clone());
        record.id = id;
        record.id_synthesized = true;
        synthesized += 1;
    }

    if synthesized > 0 {
        debug!(synthesized, total = records.len(), "Synthesized attack path ids");
    }
    records
}

/// Preference: unused `uuid` verbatim, else a v5 hash of name, ip or the whole
/// record, salted with the record's position.
fn synthesize_id(record: &AttackPathRecord, raw: &Value, position: usize, used: &HashSet<String>) -> String {
    if let Some(uuid) = record.uuid.as_deref() {
        if !used.contains(uuid) {
            return uuid.to_string();
        }
    }

    let key = if let Some(uuid) = &record.uuid {
        format!("uuid:{}", uuid)
    } else if let Some(name) = &record.name {
        format!("name:{}", name)
    } else if let Some(ip) = &record.ip {
        format!("ip:{}", ip)
    } else {
        format!("record:{}", raw)
    };

    Uuid::new_v5(&RECORD_ID_NAMESPACE, format!("{}#{}", key, position).as_bytes()).to_string()
}

fn normalize_record(raw: &Value) -> AttackPathRecord {
    AttackPathRecord {
        id: text(raw, "id").unwrap_or_default(),
        id_synthesized: false,
        uuid: text(raw, "uuid"),
        name: text(raw, "name"),
        attack_path_title: text(raw, "attack_path_title"),
        severity: text(raw, "severity").map(|s| s.to_uppercase()),
        score: number(raw, &["score", "base_score"]),
        host_name: first_text(raw, &["host_name", "affected_asset_short_text", "target_entity_short_text"]),
        host_text: text(raw, "host_text"),
        ip: text(raw, "ip"),
        impact_title: text(raw, "impact_title"),
        impact_description: text(raw, "impact_description"),
        context_score_description: text(raw, "context_score_description"),
        context_score_description_md: text(raw, "context_score_description_md"),
        created_at: text(raw, "created_at"),
        edges: raw.get("edges")
            .and_then(Value::as_array)
            .map(|edges| edges.iter().filter_map(normalize_edge).collect())
            .unwrap_or_default(),
    }
}

fn normalize_edge(raw: &Value) -> Option<RawEdge> {
    Some(RawEdge {
        from_id: first_text(raw, &["from_id", "source"])?,
        to_id: first_text(raw, &["to_id", "target"])?,
    })
}
