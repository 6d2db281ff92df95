pub mod types;
pub mod classification;

pub use types::{CtemError, VariantAttempt};
pub use classification::ErrorClassification;
