use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use regex::Regex;

/// `CVE-YYYY-NNNN` with a 4 to 7 digit sequence number, any case. Unanchored:
/// ids glued to file names still count, and longer runs keep their first 7 digits.
pub static VULN_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)CVE-\d{4}-\d{4,7}").expect("valid vulnerability id pattern")
});

/// Distinct vulnerability ids in `text`, upper-cased.
pub fn extract_vuln_ids(text: &str) -> BTreeSet<String> {
    VULN_ID_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_uppercase())
        .collect()
}

/// Count every vulnerability id mention across `texts`, most frequent first.
pub fn tally_vuln_ids<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for text in texts {
        for m in VULN_ID_PATTERN.find_iter(text) {
            *counts.entry(m.as_str().to_uppercase()).or_default() += 1;
        }
    }
    let mut tally: Vec<(String, u64)> = counts.into_iter().collect();
    // Stable sort keeps ties in id order.
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}

/// Matches `vuln_id` as a whole word, ignoring case. Built once per lookup
/// and reused across every record scanned.
pub struct MentionMatcher {
    pattern: Regex,
}

impl MentionMatcher {
    pub fn new(vuln_id: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(vuln_id)))?;
        Ok(Self { pattern })
    }

    pub fn is_mentioned_in(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}
