use std::sync::Arc;
use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub operation: String,
    pub variant: String,
}

/// Operation name to the variant that last succeeded for it. Entries are whole
/// replacements and never evicted; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct VariantCache {
    entries: Arc<DashMap<String, String>>,
}

impl VariantCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, operation: &str) -> Option<String> {
        self.entries.get(operation).map(|v| v.value().clone())
    }

    pub fn record(&self, operation: &str, variant: &str) {
        self.entries.insert(operation.to_string(), variant.to_string());
    }

    pub fn snapshot(&self) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> = self.entries.iter()
            .map(|e| CacheEntry { operation: e.key().clone(), variant: e.value().clone() })
            .collect();
        entries.sort_by(|a, b| a.operation.cmp(&b.operation));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
