use regex::{Regex, RegexBuilder};
use crate::config::CrownJewelPattern;
use crate::errors::CtemError;

/// Asset categories treated as crown jewels, as (category, pattern) pairs.
const DEFAULT_CROWN_JEWELS: &[(&str, &str)] = &[
    ("directory-services", r"active\s*directory|domain\s*controller|\bdc\b|ad\s*ds|krbtgt"),
    ("object-storage", r"\bs3\b|object\s*storage|bucket"),
    ("secrets-management", r"\bkms\b|key\s*vault|hashicorp\s*vault"),
    ("database", r"\brds\b|sql\s*server|postgres|oracle\s*db|mongodb"),
    ("virtualization", r"vcenter|esxi|vmware"),
    ("mail-collaboration", r"exchange\s*server|o365|m365"),
];

#[derive(Debug, Clone)]
pub struct CrownJewelRule {
    pub category: String,
    pattern: Regex,
}

/// Ordered, replaceable table of crown jewel patterns. First match wins.
#[derive(Debug, Clone)]
pub struct CrownJewelTable {
    rules: Vec<CrownJewelRule>,
}

impl Default for CrownJewelTable {
    fn default() -> Self {
        let rules = DEFAULT_CROWN_JEWELS
            .iter()
            .filter_map(|(category, pattern)| compile(category, pattern).ok())
            .collect();
        Self { rules }
    }
}

impl CrownJewelTable {
    pub fn from_patterns(patterns: &[CrownJewelPattern]) -> Result<Self, CtemError> {
        let rules = patterns
            .iter()
            .map(|p| compile(&p.category, &p.pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Category of the first rule matching `text`.
    pub fn classify(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.pattern.is_match(text))
            .map(|r| r.category.as_str())
    }

    pub fn categories(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.category.as_str()).collect()
    }
}

fn compile(category: &str, pattern: &str) -> Result<CrownJewelRule, CtemError> {
    let pattern = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| CtemError::Config(format!("Invalid crown jewel pattern for '{}': {}", category, e)))?;
    Ok(CrownJewelRule { category: category.to_string(), pattern })
}
