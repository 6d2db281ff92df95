use std::collections::{BTreeMap, BTreeSet};

/// Colloquial names that operators and advisories use for well-known
/// vulnerabilities.
const DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("CVE-2017-0144", &["MS17-010", "EternalBlue", "ETERNAL BLUE"]),
    ("CVE-2020-1472", &["Zerologon", "ZERO LOGON"]),
    ("CVE-2021-34527", &["PrintNightmare", "PRINT NIGHTMARE"]),
    ("CVE-2022-26923", &["AD CS", "Active Directory Certificate Services"]),
    ("CVE-2021-42278", &["sAMAccountName spoof", "sAMAccountName Spoofing"]),
];

/// Vulnerability id to alias mapping. Keys and aliases are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (id, aliases) in DEFAULT_ALIASES {
            table.insert(id, aliases.iter().copied());
        }
        table
    }
}

impl AliasTable {
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    pub fn insert<'a>(&mut self, id: &str, aliases: impl IntoIterator<Item = &'a str>) {
        let key = id.trim().to_uppercase();
        if key.is_empty() {
            return;
        }
        let entry = self.entries.entry(key).or_default();
        entry.extend(
            aliases
                .into_iter()
                .map(|a| a.trim().to_uppercase())
                .filter(|a| !a.is_empty()),
        );
    }

    /// Add configured aliases on top of the current ones.
    pub fn merged(mut self, extra: &BTreeMap<String, Vec<String>>) -> Self {
        for (id, aliases) in extra {
            self.insert(id, aliases.iter().map(String::as_str));
        }
        self
    }

    pub fn aliases(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(&id.trim().to_uppercase())
    }

    /// Selected ids plus every alias, upper-cased. Blank ids are dropped.
    pub fn expand<S: AsRef<str>>(&self, selected: impl IntoIterator<Item = S>) -> BTreeSet<String> {
        let mut expanded = BTreeSet::new();
        for raw in selected {
            let id = raw.as_ref().trim().to_uppercase();
            if id.is_empty() {
                continue;
            }
            if let Some(aliases) = self.entries.get(&id) {
                expanded.extend(aliases.iter().cloned());
            }
            expanded.insert(id);
        }
        expanded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
