pub mod aliases;
pub mod engine;

pub use aliases::AliasTable;
pub use engine::{percent_reduction, SimulationEngine};
