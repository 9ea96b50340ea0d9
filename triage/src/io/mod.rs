//! Side-effecting operations: configuration, process execution, engine transport.

pub mod config;
pub mod engine;
pub mod executor;
pub mod process;
