pub mod commands;
pub mod query;
pub mod serve;

pub use commands::{Cli, Commands};

use std::path::Path;
use crate::config::{load_config, CtemConfig};
use crate::errors::CtemError;

pub async fn resolve_config(path: Option<&str>) -> Result<CtemConfig, CtemError> {
    load_config(path.map(Path::new)).await
}
