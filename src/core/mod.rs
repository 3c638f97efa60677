//! Core functionality for douglas
//!
//! This module contains shared plumbing including:
//! - Settings resolution
//! - App declarations
//! - User-facing output

pub mod config;
pub mod registry;
pub mod reporter;

pub use config::{Config, Overrides, Settings};
pub use registry::{AppConfig, AppRegistry};
pub use reporter::Reporter;
