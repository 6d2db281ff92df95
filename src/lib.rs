pub mod adapter;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod models;
pub mod normalize;
pub mod service;
pub mod simulation;
pub mod traversal;
pub mod upstream;
pub mod utils;
