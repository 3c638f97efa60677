//! CLI module for douglas
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod apps;
pub mod browse;
pub mod commands;
pub mod db;

pub use commands::{Cli, Commands};
