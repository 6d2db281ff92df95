pub mod record;
pub mod host;
pub mod vulnerability;
pub mod simulation;

pub use record::*;
pub use host::*;
pub use vulnerability::*;
pub use simulation::*;
