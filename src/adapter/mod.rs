pub mod variant;
pub mod cache;
pub mod executor;
pub mod catalog;

pub use variant::{LogicalParams, QuerySpec, QueryVariant, VariantTable};
pub use cache::{CacheEntry, VariantCache};
pub use executor::{DiagnosticReport, QueryAdapter};
pub use catalog::VariantCatalog;
