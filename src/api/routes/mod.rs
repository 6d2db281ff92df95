pub mod health;
pub mod attack_paths;
pub mod vulnerabilities;
pub mod simulation;
pub mod hosts;
pub mod diagnostics;
