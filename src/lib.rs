//! douglas - run declaratively configured apps and browse their records
//!
//! This library provides the per-app local record store, the interactive
//! terminal browser built on it, and the CLI that drives both.

pub mod cli;
pub mod core;
pub mod error;
pub mod store;
pub mod tui;

pub use error::{DouglasError, Result};
