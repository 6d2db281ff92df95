//! Maps divergent upstream response shapes onto the canonical models.

pub mod fields;
pub mod records;
pub mod page;
pub mod entities;

pub use page::{normalize_page, PageShape};
pub use records::normalize_records;
pub use entities::{list_at, normalize_advisory, normalize_hosts, normalize_tripwires, normalize_vuln_counts};
