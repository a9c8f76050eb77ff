//! CLI subcommands.

pub mod batch;
pub mod config;
mod engine;
pub mod process;
